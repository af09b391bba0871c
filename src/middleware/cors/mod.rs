mod error;

pub use error::CorsConfigError;

use std::time::Duration;

use http::Method;
use tracing::{debug, warn};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;
use crate::middleware::Middleware;

/// Methods advertised on preflight responses.
pub const PREFLIGHT_METHODS: [Method; 6] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::OPTIONS,
];

const VARY_ORIGIN: &str = "Vary: Origin";

/// Outcome of checking a request's `Origin` header against the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OriginCheck {
    /// No `Origin` header: same-origin or non-browser caller, no CORS headers
    Absent,
    /// Allowed; carries the prebuilt `Access-Control-Allow-Origin` line
    Allowed(&'static str),
    /// Origin present but not on the allow-list
    Denied,
}

#[derive(Debug)]
struct AllowedOrigin {
    origin: String,
    header_line: &'static str,
}

/// CORS policy gate.
///
/// Exact-match allow-list. Allowed origins are reflected back in
/// `Access-Control-Allow-Origin` (never `*`); preflight responses also carry
/// `Access-Control-Allow-Methods`. A request whose non-empty `Origin` is not
/// on the list is answered with 403 before its handler runs.
#[derive(Debug)]
pub struct CorsMiddleware {
    allowed: Vec<AllowedOrigin>,
    allow_methods_line: &'static str,
}

impl CorsMiddleware {
    /// Build the gate for `allowed_origins`, advertising `allowed_methods` on preflight.
    ///
    /// Header lines are built once here and live for the rest of the process.
    pub fn new(
        allowed_origins: &[String],
        allowed_methods: &[Method],
    ) -> Result<Self, CorsConfigError> {
        let mut allowed = Vec::with_capacity(allowed_origins.len());
        for origin in allowed_origins {
            let origin = origin.trim();
            validate_origin_format(origin)?;
            let line = format!("Access-Control-Allow-Origin: {origin}");
            allowed.push(AllowedOrigin {
                origin: origin.to_string(),
                header_line: Box::leak(line.into_boxed_str()),
            });
        }

        let methods: Vec<&str> = allowed_methods.iter().map(Method::as_str).collect();
        let allow_methods_line = format!("Access-Control-Allow-Methods: {}", methods.join(", "));

        debug!(
            allowed_origins = ?allowed.iter().map(|a| a.origin.as_str()).collect::<Vec<_>>(),
            allowed_methods = %methods.join(", "),
            "CORS policy configured"
        );

        Ok(Self {
            allowed,
            allow_methods_line: Box::leak(allow_methods_line.into_boxed_str()),
        })
    }

    /// Check an `Origin` header value. Empty values count as absent.
    #[must_use]
    pub fn check_origin(&self, origin: Option<&str>) -> OriginCheck {
        match origin.map(str::trim).filter(|o| !o.is_empty()) {
            None => OriginCheck::Absent,
            Some(origin) => self
                .allowed
                .iter()
                .find(|a| a.origin == origin)
                .map_or(OriginCheck::Denied, |a| OriginCheck::Allowed(a.header_line)),
        }
    }

    #[must_use]
    pub fn allowed_origins(&self) -> Vec<&str> {
        self.allowed.iter().map(|a| a.origin.as_str()).collect()
    }
}

fn validate_origin_format(origin: &str) -> Result<(), CorsConfigError> {
    if origin.chars().any(char::is_control) {
        return Err(CorsConfigError::ControlCharacters {
            origin: origin.to_string(),
        });
    }
    match url::Url::parse(origin) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(CorsConfigError::InvalidOriginFormat {
            origin: origin.to_string(),
        }),
    }
}

impl Middleware for CorsMiddleware {
    fn before(&self, req: &HandlerRequest) -> Option<HandlerResponse> {
        let origin = req.get_header("origin");
        match self.check_origin(origin) {
            OriginCheck::Denied => {
                let origin = origin.unwrap_or_default().to_string();
                warn!(
                    request_id = %req.request_id,
                    origin = %origin,
                    path = %req.path,
                    "Origin rejected by CORS policy"
                );
                Some(ApiError::OriginNotAllowed(origin).into())
            }
            OriginCheck::Absent | OriginCheck::Allowed(_) => None,
        }
    }

    fn after(&self, req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
        if let OriginCheck::Allowed(line) = self.check_origin(req.get_header("origin")) {
            res.set_header(line);
            res.set_header(VARY_ORIGIN);
            if req.method == Method::OPTIONS {
                res.set_header(self.allow_methods_line);
            }
        }
    }
}
