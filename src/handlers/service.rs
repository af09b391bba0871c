use serde_json::json;

use crate::dispatcher::{HandlerRequest, HandlerResponse};

/// `GET /`
pub fn root(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::ok(json!({ "message": "Hello World" }))
}

/// `GET /health`, liveness check.
pub fn health(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::ok(json!({ "status": "ok" }))
}
