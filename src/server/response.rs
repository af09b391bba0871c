use crate::dispatcher::HandlerResponse;
use may_minihttp::Response;
use serde_json::Value;
use tracing::error;

/// Reason phrase for the status codes this service emits.
pub fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        201 => "Created",
        204 => "No Content",
        400 => "Bad Request",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn write_json(res: &mut Response, body: &Value) {
    res.header("Content-Type: application/json");
    match serde_json::to_vec(body) {
        Ok(bytes) => res.body_vec(bytes),
        Err(e) => {
            error!(error = %e, "Failed to encode response body");
            res.status_code(500, "Internal Server Error");
            res.body_vec(br#"{"error":"Failed to encode response"}"#.to_vec());
        }
    }
}

/// Write a dispatcher response. Bodiless responses (204) get no content type.
pub fn write_handler_response(res: &mut Response, hr: &HandlerResponse) {
    res.status_code(usize::from(hr.status), status_reason(hr.status));
    for line in hr.headers.iter().copied() {
        res.header(line);
    }
    if let Some(body) = &hr.body {
        write_json(res, body);
    }
}

pub fn write_json_error(res: &mut Response, status: u16, body: Value) {
    res.status_code(usize::from(status), status_reason(status));
    write_json(res, &body);
}
