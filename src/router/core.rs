use http::Method;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, info};

/// Maximum number of path/query parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Parameter storage for the hot path; names are shared with the route table.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

/// One entry of the routing table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMeta {
    pub method: Method,
    /// Pattern such as `/movies/{id}`
    pub path_pattern: String,
    /// Name the dispatcher looks the handler up by
    pub handler_name: String,
}

impl RouteMeta {
    pub fn new(
        method: Method,
        path_pattern: impl Into<String>,
        handler_name: impl Into<String>,
    ) -> Self {
        Self {
            method,
            path_pattern: path_pattern.into(),
            handler_name: handler_name.into(),
        }
    }
}

/// Result of successfully matching a request to a route
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<RouteMeta>,
    /// Percent-decoded path parameters, e.g. `{id}` → `("id", "123")`
    pub path_params: ParamVec,
    pub handler_name: String,
    /// Query string parameters (populated by the server)
    pub query_params: ParamVec,
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(Arc<str>),
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    meta: Arc<RouteMeta>,
    segments: Vec<Segment>,
    param_count: usize,
}

impl CompiledRoute {
    fn compile(meta: RouteMeta) -> Self {
        let segments: Vec<Segment> = split_path(&meta.path_pattern)
            .map(|seg| match seg.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
                Some(name) => Segment::Param(Arc::from(name)),
                None => Segment::Literal(seg.to_string()),
            })
            .collect();
        let param_count = segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count();
        Self {
            meta: Arc::new(meta),
            segments,
            param_count,
        }
    }

    fn matches(&self, parts: &[&str]) -> Option<ParamVec> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = ParamVec::new();
        for (seg, part) in self.segments.iter().zip(parts) {
            match seg {
                Segment::Literal(lit) if lit.as_str() == *part => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| (*part).to_string());
                    params.push((Arc::clone(name), value));
                }
            }
        }
        Some(params)
    }
}

fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Method + path matcher over a fixed route table.
///
/// Lookups are a linear scan over the table; the movie service has a
/// handful of routes so this stays well under a microsecond.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<CompiledRoute>,
}

impl Router {
    #[must_use]
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        let mut compiled: Vec<CompiledRoute> =
            routes.into_iter().map(CompiledRoute::compile).collect();
        // Stable: among equal-length patterns, literals beat placeholders.
        compiled.sort_by_key(|r| r.param_count);

        let routes_summary: Vec<String> = compiled
            .iter()
            .map(|r| format!("{} {}", r.meta.method, r.meta.path_pattern))
            .collect();
        info!(
            routes_count = compiled.len(),
            routes_summary = ?routes_summary,
            "Routing table loaded"
        );

        Self { routes: compiled }
    }

    /// Match a request. `path` must not include the query string.
    #[must_use]
    pub fn route(&self, method: Method, path: &str) -> Option<RouteMatch> {
        let parts: SmallVec<[&str; 8]> = split_path(path).collect();
        for route in self.routes.iter().filter(|r| r.meta.method == method) {
            if let Some(path_params) = route.matches(&parts) {
                debug!(
                    method = %method,
                    path = %path,
                    handler_name = %route.meta.handler_name,
                    path_params = ?path_params,
                    "Route matched"
                );
                return Some(RouteMatch {
                    route: Arc::clone(&route.meta),
                    path_params,
                    handler_name: route.meta.handler_name.clone(),
                    query_params: ParamVec::new(),
                });
            }
        }
        debug!(method = %method, path = %path, "No route matched");
        None
    }
}
