//! # Dispatcher Module
//!
//! Runs the handler registered for a matched route, wrapped in the
//! middleware chain.
//!
//! ## Request Flow
//!
//! 1. The router matches an incoming request and yields a handler name
//! 2. The dispatcher builds a [`HandlerRequest`] and runs every middleware's
//!    `before` hook; the first hook that answers short-circuits the handler
//! 3. Otherwise the handler runs to completion on the connection's coroutine
//! 4. Every middleware's `after` hook sees the final [`HandlerResponse`]
//!
//! ## Error Handling
//!
//! - An unregistered handler name yields `None` (the server answers 500)
//! - A panicking handler is caught and answered with a 500 response

mod core;

pub use self::core::{
    Dispatcher, Handler, HandlerRequest, HandlerResponse, HeaderVec, RequestBody,
    ResponseHeaders, MAX_INLINE_HEADERS,
};
