use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use http::Method;
use serde_json::{json, Value};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Request headers as `(lowercase name, value)` pairs.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Response headers as complete `Name: value` lines.
///
/// `may_minihttp` only accepts `&'static str` header lines, so every header
/// a handler or middleware can emit is either a literal or built once at
/// startup.
pub type ResponseHeaders = SmallVec<[&'static str; 4]>;

/// What the server made of the request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body, or a zero-length one
    Empty,
    Json(Value),
    /// Bytes were sent but did not parse as JSON
    Malformed(String),
}

impl RequestBody {
    /// JSON view of the body, with a missing body read as `{}`.
    pub fn json_or_empty_object(&self) -> Result<Value, String> {
        match self {
            RequestBody::Empty => Ok(json!({})),
            RequestBody::Json(v) => Ok(v.clone()),
            RequestBody::Malformed(e) => Err(e.clone()),
        }
    }
}

/// Request data passed to a handler
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Correlation id for logs
    pub request_id: RequestId,
    pub method: Method,
    /// Request path as received (without query string)
    pub path: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    /// Percent-decoded path parameters
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    /// Headers with lowercase names
    pub headers: HeaderVec,
    pub body: RequestBody,
}

impl HandlerRequest {
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Last occurrence wins for repeated keys
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response produced by a handler or a short-circuiting middleware
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: ResponseHeaders,
    /// JSON body; `None` for bodiless responses such as 204
    pub body: Option<Value>,
}

impl HandlerResponse {
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            headers: ResponseHeaders::new(),
            body: Some(body),
        }
    }

    #[must_use]
    pub fn ok(body: Value) -> Self {
        Self::json(200, body)
    }

    #[must_use]
    pub fn no_content() -> Self {
        Self {
            status: 204,
            headers: ResponseHeaders::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "error": message }))
    }

    /// Value of a header line by name (case-insensitive)
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim().eq_ignore_ascii_case(name).then(|| v.trim())
        })
    }

    /// Add a `Name: value` line, replacing any existing header of that name.
    pub fn set_header(&mut self, line: &'static str) {
        if let Some((name, _)) = line.split_once(':') {
            let name = name.trim();
            self.headers.retain(|existing| {
                existing
                    .split_once(':')
                    .map_or(true, |(k, _)| !k.trim().eq_ignore_ascii_case(name))
            });
        }
        self.headers.push(line);
    }
}

/// A request handler. Handlers run synchronously on the connection's coroutine.
pub type Handler = Arc<dyn Fn(&HandlerRequest) -> HandlerResponse + Send + Sync>;

/// Registry of named handlers plus the middleware chain around them.
#[derive(Clone, Default)]
pub struct Dispatcher {
    pub handlers: HashMap<String, Handler>,
    /// Applied in insertion order
    pub middlewares: Vec<Arc<dyn Middleware>>,
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler_fn` under `name`, replacing any previous handler.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F)
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + Sync + 'static,
    {
        if self
            .handlers
            .insert(name.to_string(), Arc::new(handler_fn))
            .is_some()
        {
            info!(handler_name = %name, "Replaced existing handler");
        } else {
            debug!(
                handler_name = %name,
                total_handlers = self.handlers.len(),
                "Handler registered"
            );
        }
    }

    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Run the handler for `route_match`. `None` when no handler has that name.
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        path: String,
        body: RequestBody,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let Some(handler) = self.handlers.get(&route_match.handler_name) else {
            let available_handlers: Vec<&String> = self.handlers.keys().collect();
            error!(
                request_id = %request_id,
                handler_name = %route_match.handler_name,
                available_handlers = ?available_handlers,
                "Handler not found"
            );
            return None;
        };

        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path,
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            body,
        };

        let early = self
            .middlewares
            .iter()
            .find_map(|mw| mw.before(&request));

        let (mut resp, latency) = match early {
            Some(resp) => {
                debug!(
                    request_id = %request.request_id,
                    status = resp.status,
                    "Middleware returned early response"
                );
                (resp, Duration::ZERO)
            }
            None => {
                let start = Instant::now();
                let resp = run_guarded(handler, &request);
                (resp, start.elapsed())
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }
        Some(resp)
    }
}

/// Run a handler, turning a panic into a 500 response.
fn run_guarded(handler: &Handler, request: &HandlerRequest) -> HandlerResponse {
    match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| handler(request))) {
        Ok(resp) => resp,
        Err(panic) => {
            let panic_message = panic
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!(
                request_id = %request.request_id,
                handler_name = %request.handler_name,
                panic_message = %panic_message,
                "Handler panicked"
            );
            HandlerResponse::error(500, "Handler panicked")
        }
    }
}
