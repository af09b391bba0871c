use crate::dispatcher::{HeaderVec, RequestBody};
use crate::router::ParamVec;
use may_minihttp::Request;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the service needs from a raw `may_minihttp` request.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    pub method: String,
    /// Path without the query string
    pub path: String,
    /// Headers with lowercase names, in arrival order
    pub headers: HeaderVec,
    /// Decoded query string pairs
    pub query_params: ParamVec,
    pub body: RequestBody,
}

/// Decode the query string of `raw_path` (everything after `?`).
///
/// Names and values are percent/plus decoded; repeated keys are kept in order.
pub fn parse_query_params(raw_path: &str) -> ParamVec {
    match raw_path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (Arc::from(&*k), v.into_owned()))
            .collect(),
        None => ParamVec::new(),
    }
}

/// Classify raw body bytes. Whitespace-only bodies count as empty.
pub fn parse_body(bytes: &[u8]) -> RequestBody {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return RequestBody::Empty;
    }
    match serde_json::from_slice(bytes) {
        Ok(value) => RequestBody::Json(value),
        Err(e) => RequestBody::Malformed(e.to_string()),
    }
}

/// Pull method, path, headers, query and body out of `req`.
///
/// Headers are read before the body since reading the body consumes the request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path
        .split('?')
        .next()
        .filter(|p| !p.is_empty())
        .unwrap_or("/")
        .to_string();

    let headers: HeaderVec = req
        .headers()
        .iter()
        .map(|h| {
            (
                Arc::from(h.name.to_ascii_lowercase()),
                String::from_utf8_lossy(h.value).into_owned(),
            )
        })
        .collect();

    let query_params = parse_query_params(&raw_path);

    let mut bytes = Vec::new();
    let body = match req.body().read_to_end(&mut bytes) {
        Ok(_) => parse_body(&bytes),
        Err(e) => {
            warn!(error = %e, method = %method, path = %path, "Failed to read request body");
            RequestBody::Malformed(e.to_string())
        }
    };

    debug!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        query_count = query_params.len(),
        body_bytes = bytes.len(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_query_params() {
        let q = parse_query_params("/movies?genre=Sci-Fi&x=a%20b&x=c+d");
        assert_eq!(q.len(), 3);
        assert_eq!(q[0].0.as_ref(), "genre");
        assert_eq!(q[0].1, "Sci-Fi");
        assert_eq!(q[1].1, "a b");
        assert_eq!(q[2].1, "c d");
        assert!(parse_query_params("/movies").is_empty());
    }

    #[test]
    fn test_parse_empty_genre_value() {
        let q = parse_query_params("/movies?genre=");
        assert_eq!(q.len(), 1);
        assert_eq!(q[0].1, "");
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b""), RequestBody::Empty);
        assert_eq!(parse_body(b" \r\n"), RequestBody::Empty);
        assert_eq!(parse_body(br#"{"rate":7}"#), RequestBody::Json(json!({"rate": 7})));
        assert!(matches!(parse_body(b"{nope"), RequestBody::Malformed(_)));
    }
}
