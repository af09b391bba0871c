//! # Router Module
//!
//! Matches an HTTP method and request path against a fixed table of
//! [`RouteMeta`] entries and extracts path parameters.
//!
//! Patterns use `{name}` placeholders for a single path segment:
//!
//! ```rust
//! use http::Method;
//! use movies_api::router::{RouteMeta, Router};
//!
//! let router = Router::new(vec![
//!     RouteMeta::new(Method::GET, "/movies/{id}", "get_movie"),
//!     RouteMeta::new(Method::GET, "/movies/genre/{genre}", "list_movies_by_genre"),
//! ]);
//!
//! let m = router.route(Method::GET, "/movies/genre/Sci-Fi").unwrap();
//! assert_eq!(m.handler_name, "list_movies_by_genre");
//! assert_eq!(m.path_params[0].1, "Sci-Fi");
//! ```
//!
//! Parameter values are percent-decoded. A trailing slash is ignored, and
//! when two patterns of the same length both match, the one with fewer
//! placeholders wins.

mod core;

pub use self::core::{ParamVec, RouteMatch, RouteMeta, Router, MAX_INLINE_PARAMS};
