mod core;
mod cors;
mod tracing;

pub use self::core::Middleware;
pub use cors::{CorsConfigError, CorsMiddleware, OriginCheck, PREFLIGHT_METHODS};
pub use self::tracing::TracingMiddleware;
