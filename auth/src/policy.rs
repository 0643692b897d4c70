/// Access requirement of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RoutePattern {
    Exact(String),
    // "/docs/**" matches "/docs" and everything below it.
    Prefix(String),
}

impl RoutePattern {
    fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix("/**") {
            Some(prefix) => RoutePattern::Prefix(prefix.to_string()),
            None => RoutePattern::Exact(pattern.to_string()),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            RoutePattern::Exact(exact) => path == exact,
            RoutePattern::Prefix(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// Ordered route access table. The first matching rule wins; unmatched paths
/// fall back to the default, which is `Authenticated` unless overridden.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<(RoutePattern, Access)>,
    fallback: Access,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            fallback: Access::Authenticated,
        }
    }

    /// Let anyone reach `pattern`.
    pub fn permit(self, pattern: &str) -> Self {
        self.rule(pattern, Access::Public)
    }

    /// Require an authenticated context for `pattern`.
    pub fn authenticate(self, pattern: &str) -> Self {
        self.rule(pattern, Access::Authenticated)
    }

    pub fn rule(mut self, pattern: &str, access: Access) -> Self {
        self.rules.push((RoutePattern::parse(pattern), access));
        self
    }

    pub fn otherwise(mut self, access: Access) -> Self {
        self.fallback = access;
        self
    }

    pub fn access_for(&self, path: &str) -> Access {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.matches(path))
            .map(|(_, access)| *access)
            .unwrap_or(self.fallback)
    }

    /// Whether a request to `path` may proceed given its authentication state.
    pub fn allows(&self, path: &str, authenticated: bool) -> bool {
        match self.access_for(path) {
            Access::Public => true,
            Access::Authenticated => authenticated,
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new()
    }
}
