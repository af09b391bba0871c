use thiserror::Error;

/// Returned by [`CorsMiddleware::new`](super::CorsMiddleware::new) for an unusable allow-list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorsConfigError {
    /// The origin is not an absolute `http`/`https` URL
    #[error(
        "CORS configuration error: invalid origin format '{origin}'. \
         Expected scheme://host[:port] (e.g. https://example.com)"
    )]
    InvalidOriginFormat { origin: String },
    /// A header value would contain a line break
    #[error("CORS configuration error: origin '{origin}' contains control characters")]
    ControlCharacters { origin: String },
}
