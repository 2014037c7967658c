//! Route lookup.
//!
//! # Responsibilities
//! - Store the prepared route set
//! - Look up the first route matching a request
//! - Let application code replace the route set through `prepare`
//!
//! # Design Decisions
//! - `prepare` builds a fresh set and swaps it in atomically
//! - O(n) path prefix scan (acceptable for typical route counts)
//! - Explicit no-match rather than silent default

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::Request;

use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// Name of the catch-all route appended by [`RouteBuilder::default_routes`].
pub const DEFAULT_ROUTE: &str = "default";

/// A named route.
#[derive(Debug)]
pub struct Route {
    pub name: String,
    matcher: Box<dyn Matcher>,
}

impl Route {
    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }
}

/// Collects routes in the order they should be tried.
#[derive(Debug, Default)]
pub struct RouteBuilder {
    routes: Vec<Route>,
}

impl RouteBuilder {
    /// Route every path under `prefix` to `name`.
    pub fn prefix(&mut self, name: impl Into<String>, prefix: impl Into<String>) -> &mut Self {
        self.routes.push(Route {
            name: name.into(),
            matcher: Box::new(PathPrefixMatcher::new(prefix)),
        });
        self
    }

    /// Append the catch-all default route.
    pub fn default_routes(&mut self) -> &mut Self {
        self.prefix(DEFAULT_ROUTE, "/")
    }
}

/// The application's route set.
#[derive(Debug)]
pub struct Router {
    routes: ArcSwap<Vec<Route>>,
}

impl Router {
    /// A router holding only the default routes.
    pub fn new() -> Self {
        let mut builder = RouteBuilder::default();
        builder.default_routes();
        Self {
            routes: ArcSwap::from_pointee(builder.routes),
        }
    }

    /// Replace the route set with whatever `f` builds.
    pub fn prepare(&self, f: impl FnOnce(&mut RouteBuilder)) {
        let mut builder = RouteBuilder::default();
        f(&mut builder);
        tracing::debug!(routes = builder.routes.len(), "Router prepared");
        self.routes.store(Arc::new(builder.routes));
    }

    /// Name of the first route matching `req`.
    pub fn match_request(&self, req: &Request<Body>) -> Option<String> {
        self.routes
            .load()
            .iter()
            .find(|route| route.matches(req))
            .map(|route| route.name.clone())
    }

    /// Route names in match order.
    pub fn route_names(&self) -> Vec<String> {
        self.routes.load().iter().map(|r| r.name.clone()).collect()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::default()).unwrap()
    }

    #[test]
    fn test_new_router_has_default_routes() {
        let router = Router::new();
        assert_eq!(router.route_names(), [DEFAULT_ROUTE]);
        assert_eq!(router.match_request(&request("/x")).as_deref(), Some(DEFAULT_ROUTE));
    }

    #[test]
    fn test_first_match_wins() {
        let router = Router::new();
        router.prepare(|r| {
            r.prefix("admin", "/admin").prefix("api", "/api").default_routes();
        });

        assert_eq!(router.match_request(&request("/admin/users")).as_deref(), Some("admin"));
        assert_eq!(router.match_request(&request("/api")).as_deref(), Some("api"));
        assert_eq!(router.match_request(&request("/other")).as_deref(), Some(DEFAULT_ROUTE));
    }

    #[test]
    fn test_prepare_without_defaults_can_miss() {
        let router = Router::new();
        router.prepare(|r| {
            r.prefix("api", "/api");
        });
        assert_eq!(router.match_request(&request("/other")), None);
    }
}
