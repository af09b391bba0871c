//! Route table and handler registration for the movie service.

use std::sync::Arc;

use http::Method;

use crate::dispatcher::Dispatcher;
use crate::handlers;
use crate::router::RouteMeta;
use crate::store::MovieStore;

/// Every route the service answers, as `(method, pattern, handler name)`.
///
/// Literal segments take precedence over placeholders, so
/// `/movies/genre/{genre}` is never captured by `/movies/{id}`.
#[must_use]
pub fn movie_routes() -> Vec<RouteMeta> {
    vec![
        RouteMeta::new(Method::GET, "/", "root"),
        RouteMeta::new(Method::GET, "/health", "health"),
        RouteMeta::new(Method::GET, "/movies", "list_movies"),
        RouteMeta::new(Method::POST, "/movies", "create_movie"),
        RouteMeta::new(Method::OPTIONS, "/movies", "preflight"),
        RouteMeta::new(Method::GET, "/movies/{id}", "get_movie"),
        RouteMeta::new(Method::PATCH, "/movies/{id}", "update_movie"),
        RouteMeta::new(Method::DELETE, "/movies/{id}", "delete_movie"),
        RouteMeta::new(Method::OPTIONS, "/movies/{id}", "preflight"),
        RouteMeta::new(Method::GET, "/movies/genre/{genre}", "list_movies_by_genre"),
        RouteMeta::new(
            Method::GET,
            "/movies/director/{director}",
            "list_movies_by_director",
        ),
    ]
}

/// Register every movie handler against `store`.
pub fn register_all(dispatcher: &mut Dispatcher, store: Arc<dyn MovieStore>) {
    dispatcher.register_handler("root", handlers::root);
    dispatcher.register_handler("health", handlers::health);
    dispatcher.register_handler("preflight", handlers::preflight);

    macro_rules! with_store {
        ($name:literal, $handler:path) => {{
            let store = Arc::clone(&store);
            dispatcher.register_handler($name, move |req| $handler(&*store, req));
        }};
    }

    with_store!("list_movies", handlers::list_movies);
    with_store!("get_movie", handlers::get_movie);
    with_store!("list_movies_by_genre", handlers::list_movies_by_genre);
    with_store!("list_movies_by_director", handlers::list_movies_by_director);
    with_store!("create_movie", handlers::create_movie);
    with_store!("update_movie", handlers::update_movie);
    with_store!("delete_movie", handlers::delete_movie);
}
