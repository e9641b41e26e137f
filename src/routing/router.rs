//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in configuration order (acceptable for typical route counts)
//! - First match wins
//! - Explicit no-match rather than silent default

use axum::http::Uri;

use crate::config::{Mode, ProxyConfig, RouteConfig};
use crate::routing::matcher::{RouteError, RoutePattern, TargetTemplate};

/// A compiled proxy rule.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub target: TargetTemplate,
}

impl Route {
    pub fn compile(config: &RouteConfig) -> Result<Self, RouteError> {
        let pattern = RoutePattern::parse(&config.pattern)?;
        let target = TargetTemplate::parse(&config.proxy)?;

        if target.has_wildcard() && !pattern.is_wildcard() {
            return Err(RouteError::UncapturedWildcard {
                pattern: config.pattern.clone(),
                target: config.proxy.clone(),
            });
        }

        Ok(Self { pattern, target })
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'r, 'p> {
    pub route: &'r Route,
    /// Path remainder captured by a wildcard pattern (empty for exact matches).
    pub captured: &'p str,
}

impl RouteMatch<'_, '_> {
    /// Resolve the upstream URI, carrying the incoming query string along.
    pub fn upstream(&self, query: Option<&str>) -> Result<Uri, RouteError> {
        self.route.target.resolve(self.captured, query)
    }
}

/// Immutable set of proxy rules.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile rules, preserving their order.
    pub fn from_rules(rules: &[RouteConfig]) -> Result<Self, RouteError> {
        let routes = rules.iter().map(Route::compile).collect::<Result<Vec<_>, _>>()?;
        Ok(Self { routes })
    }

    /// Compile the rule set of the profile active in `mode`.
    pub fn for_mode(config: &ProxyConfig, mode: Mode) -> Result<Self, RouteError> {
        Self::from_rules(&config.profile(mode).routes)
    }

    /// Find the first route matching `path`.
    pub fn find<'r, 'p>(&'r self, path: &'p str) -> Option<RouteMatch<'r, 'p>> {
        self.routes.iter().find_map(|route| {
            route
                .pattern
                .capture(path)
                .map(|captured| RouteMatch { route, captured })
        })
    }

    /// Resolve the upstream URI for `uri`, or `None` when no rule applies.
    pub fn resolve(&self, uri: &Uri) -> Option<Result<Uri, RouteError>> {
        self.find(uri.path()).map(|m| m.upstream(uri.query()))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dev_router() -> Router {
        Router::for_mode(&ProxyConfig::default(), Mode::Development).unwrap()
    }

    fn resolve(router: &Router, uri: &str) -> Option<String> {
        router
            .resolve(&uri.parse().unwrap())
            .map(|r| r.unwrap().to_string())
    }

    #[test]
    fn api_suffix_is_preserved() {
        assert_eq!(
            resolve(&dev_router(), "/api/anything/here").as_deref(),
            Some("http://127.0.0.1:8000/anything/here")
        );
    }

    #[test]
    fn exact_routes_forward_verbatim() {
        let router = dev_router();
        for path in ["/docs", "/redoc", "/openapi.json"] {
            assert_eq!(
                resolve(&router, path),
                Some(format!("http://127.0.0.1:8000{}", path))
            );
        }
    }

    #[test]
    fn query_is_carried() {
        assert_eq!(
            resolve(&dev_router(), "/api/verse?book=gen&chapter=1").as_deref(),
            Some("http://127.0.0.1:8000/verse?book=gen&chapter=1")
        );
    }

    #[test]
    fn unmatched_paths_are_not_proxied() {
        let router = dev_router();
        for path in ["/about", "/", "/apix", "/docs/intro", "/openapi.yaml"] {
            assert!(resolve(&router, path).is_none(), "{} should not match", path);
        }
    }

    #[test]
    fn production_has_no_rules() {
        let router = Router::for_mode(&ProxyConfig::default(), Mode::Production).unwrap();
        assert!(router.is_empty());
        for path in ["/api/anything/here", "/docs", "/redoc", "/openapi.json", "/about"] {
            assert!(resolve(&router, path).is_none());
        }
    }

    #[test]
    fn first_match_wins() {
        let router = Router::from_rules(&[
            RouteConfig::new("/api/admin/**", "http://127.0.0.1:9001/**"),
            RouteConfig::new("/api/**", "http://127.0.0.1:9000/**"),
        ])
        .unwrap();

        assert_eq!(
            resolve(&router, "/api/admin/users").as_deref(),
            Some("http://127.0.0.1:9001/users")
        );
        assert_eq!(
            resolve(&router, "/api/users").as_deref(),
            Some("http://127.0.0.1:9000/users")
        );
    }

    #[test]
    fn wildcard_target_needs_wildcard_pattern() {
        let err = Router::from_rules(&[RouteConfig::new("/docs", "http://127.0.0.1:8000/**")])
            .unwrap_err();
        assert!(matches!(err, RouteError::UncapturedWildcard { .. }));
    }

    #[test]
    fn wildcard_pattern_may_target_fixed_url() {
        let router =
            Router::from_rules(&[RouteConfig::new("/legacy/**", "http://127.0.0.1:8000/gone")])
                .unwrap();
        assert_eq!(
            resolve(&router, "/legacy/a/b").as_deref(),
            Some("http://127.0.0.1:8000/gone")
        );
    }
}
