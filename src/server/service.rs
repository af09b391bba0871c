use super::request::{parse_request, ParsedRequest};
use super::response::{write_handler_response, write_json_error};
use crate::dispatcher::Dispatcher;
use crate::ids::RequestId;
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::{debug, error};

/// `may_minihttp` service: route, dispatch, write.
///
/// Cloned once per connection; router and dispatcher are shared.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
}

impl AppService {
    pub fn new(router: Arc<Router>, dispatcher: Arc<Dispatcher>) -> Self {
        Self { router, dispatcher }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            method,
            path,
            headers,
            query_params,
            body,
        } = parse_request(req);

        let route_opt = Method::from_bytes(method.as_bytes())
            .ok()
            .and_then(|m| self.router.route(m, &path));

        let Some(mut route_match) = route_opt else {
            debug!(method = %method, path = %path, "No route for request");
            write_json_error(
                res,
                404,
                json!({"error": "Not Found", "method": method, "path": path}),
            );
            return Ok(());
        };
        route_match.query_params = query_params;

        let request_id = RequestId::from_header_or_new(
            headers
                .iter()
                .find(|(k, _)| k.as_ref() == "x-request-id")
                .map(|(_, v)| v.as_str()),
        );

        match self
            .dispatcher
            .dispatch(route_match, path.clone(), body, headers, request_id)
        {
            Some(hr) => write_handler_response(res, &hr),
            None => {
                error!(
                    request_id = %request_id,
                    method = %method,
                    path = %path,
                    "No handler registered for route"
                );
                write_json_error(
                    res,
                    500,
                    json!({
                        "error": "Handler failed or not registered",
                        "method": method,
                        "path": path
                    }),
                );
            }
        }
        Ok(())
    }
}
