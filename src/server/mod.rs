//! HTTP front end on top of `may_minihttp`.
//!
//! [`AppService`] turns raw requests into router matches and dispatcher calls;
//! [`HttpServer`] binds it to a socket and hands back a [`ServerHandle`].

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_body, parse_query_params, parse_request, ParsedRequest};
pub use response::{status_reason, write_handler_response, write_json_error};
pub use service::AppService;
