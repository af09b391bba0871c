//! Request handlers.
//!
//! Each handler maps a [`HandlerRequest`](crate::dispatcher::HandlerRequest)
//! plus the movie store to a [`HandlerResponse`](crate::dispatcher::HandlerResponse).
//! They never touch the network; the server and dispatcher do that.

pub mod movies;
pub mod service;

pub use movies::{
    create_movie, delete_movie, get_movie, list_movies, list_movies_by_director,
    list_movies_by_genre, preflight, update_movie,
};
pub use service::{health, root};
