//! # movies-api
//!
//! A small JSON-over-HTTP catalogue of movies, served on the `may` coroutine
//! runtime through `may_minihttp`.
//!
//! ## Architecture
//!
//! - **[`movie`]** - the record type, genres and partial updates
//! - **[`validator`]** - full and partial payload validation with per-field errors
//! - **[`store`]** - the in-memory movie sequence behind a single lock
//! - **[`seed`]** - bundled and file-based initial datasets
//! - **[`router`]** - method + path matching with `{param}` placeholders
//! - **[`dispatcher`]** - named handlers wrapped in a middleware chain
//! - **[`middleware`]** - CORS policy gate and request logging
//! - **[`handlers`]** - one function per endpoint
//! - **[`registry`]** - the route table and handler registration
//! - **[`server`]** - `may_minihttp` service and server handle
//! - **[`config`]** / **[`telemetry`]** - flags, env vars and logging
//!
//! ## Request flow
//!
//! ```text
//! client -> HttpServer -> AppService::call
//!        -> Router::route        (404 when nothing matches)
//!        -> Dispatcher::dispatch
//!             -> CorsMiddleware::before   (403 for a disallowed Origin)
//!             -> handler(store, request)
//!             -> middleware after hooks   (CORS headers, access log)
//!        -> response writer
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use movies_api::{build_service, seed, store::InMemoryMovieStore, server::HttpServer};
//!
//! let store = Arc::new(InMemoryMovieStore::new(seed::bundled_movies().unwrap()));
//! let origins = vec!["http://localhost:8080".to_string()];
//! let service = build_service(store, &origins).unwrap();
//! let handle = HttpServer(service).start("127.0.0.1:1234").unwrap();
//! handle.join().unwrap();
//! ```

use std::sync::Arc;

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod handlers;
pub mod ids;
pub mod middleware;
pub mod movie;
pub mod registry;
pub mod router;
pub mod seed;
pub mod server;
pub mod store;
pub mod telemetry;
pub mod validator;

use dispatcher::Dispatcher;
use middleware::{CorsConfigError, CorsMiddleware, TracingMiddleware, PREFLIGHT_METHODS};
use router::Router;
use server::AppService;
use store::MovieStore;

/// Wire router, handlers and middleware around `store`.
///
/// # Errors
///
/// Fails when an entry of `allowed_origins` is not an `http(s)://host` origin.
pub fn build_service(
    store: Arc<dyn MovieStore>,
    allowed_origins: &[String],
) -> Result<AppService, CorsConfigError> {
    let router = Router::new(registry::movie_routes());

    let mut dispatcher = Dispatcher::new();
    registry::register_all(&mut dispatcher, store);
    dispatcher.add_middleware(Arc::new(TracingMiddleware));
    dispatcher.add_middleware(Arc::new(CorsMiddleware::new(
        allowed_origins,
        &PREFLIGHT_METHODS,
    )?));

    Ok(AppService::new(Arc::new(router), Arc::new(dispatcher)))
}
