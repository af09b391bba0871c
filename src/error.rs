use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

use crate::dispatcher::HandlerResponse;
use crate::validator::ValidationErrors;

/// Errors a handler or middleware turns into an HTTP response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Payload failed schema validation (400)
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Body was present but not JSON (400)
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// No record with the requested id (404)
    #[error("{0}")]
    NotFound(&'static str),
    /// Browser origin outside the allow-list (403)
    #[error("origin '{0}' is not allowed by CORS")]
    OriginNotAllowed(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) | ApiError::MalformedBody(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::OriginNotAllowed(_) => 403,
        }
    }

    #[must_use]
    pub fn body(&self) -> Value {
        match self {
            ApiError::Validation(errors) => json!({ "error": errors }),
            ApiError::MalformedBody(detail) => json!({
                "error": [{
                    "field": "body",
                    "code": "invalid_json",
                    "message": format!("Request body must be valid JSON: {detail}"),
                }]
            }),
            ApiError::NotFound(message) => json!({ "message": message }),
            ApiError::OriginNotAllowed(_) => json!({ "error": "Not allowed by CORS" }),
        }
    }
}

impl From<ApiError> for HandlerResponse {
    fn from(err: ApiError) -> Self {
        HandlerResponse::json(err.status(), err.body())
    }
}

/// Failure to build the initial movie sequence.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("seed data is not a JSON array of movies: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("seed movie #{index} is invalid: {errors}")]
    InvalidMovie {
        index: usize,
        errors: ValidationErrors,
    },
    #[error("seed movie #{index} has a missing or duplicate id")]
    BadId { index: usize },
}
