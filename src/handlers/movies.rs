use serde::Serialize;
use tracing::{error, info};

use crate::dispatcher::{HandlerRequest, HandlerResponse};
use crate::error::ApiError;
use crate::ids::new_movie_id;
use crate::movie::Movie;
use crate::store::MovieStore;
use crate::validator::{validate_movie, validate_partial_movie};

const MOVIE_NOT_FOUND: &str = "Movie not found";

fn json_response<T: Serialize>(status: u16, value: &T) -> HandlerResponse {
    match serde_json::to_value(value) {
        Ok(body) => HandlerResponse::json(status, body),
        Err(e) => {
            error!(error = %e, "Failed to serialize response body");
            HandlerResponse::error(500, "Failed to serialize response")
        }
    }
}

fn respond(result: Result<HandlerResponse, ApiError>) -> HandlerResponse {
    result.unwrap_or_else(HandlerResponse::from)
}

fn path_id(req: &HandlerRequest) -> &str {
    req.get_path_param("id").unwrap_or_default()
}

/// `GET /movies[?genre=..]`
pub fn list_movies(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    let movies = match req.get_query_param("genre").filter(|g| !g.is_empty()) {
        Some(genre) => store.filter_by_genre(genre),
        None => store.list(),
    };
    json_response(200, &movies)
}

/// `GET /movies/{id}`
pub fn get_movie(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    respond(
        store
            .find_by_id(path_id(req))
            .map(|movie| json_response(200, &movie))
            .ok_or(ApiError::NotFound(MOVIE_NOT_FOUND)),
    )
}

/// `GET /movies/genre/{genre}`; no match is an empty list, not an error.
pub fn list_movies_by_genre(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    let genre = req.get_path_param("genre").unwrap_or_default();
    json_response(200, &store.filter_by_genre(genre))
}

/// `GET /movies/director/{director}`
pub fn list_movies_by_director(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    let director = req.get_path_param("director").unwrap_or_default();
    json_response(200, &store.filter_by_director(director))
}

/// `POST /movies`
pub fn create_movie(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    respond(try_create(store, req))
}

fn try_create(store: &dyn MovieStore, req: &HandlerRequest) -> Result<HandlerResponse, ApiError> {
    let body = req
        .body
        .json_or_empty_object()
        .map_err(ApiError::MalformedBody)?;
    let new = validate_movie(&body)?;
    let movie = store.append(Movie::from_new(new_movie_id(), new));
    info!(
        request_id = %req.request_id,
        movie_id = %movie.id,
        title = %movie.title,
        "Movie created"
    );
    Ok(json_response(201, &movie))
}

/// `PATCH /movies/{id}`; the body is validated before the id is looked up.
pub fn update_movie(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    respond(try_update(store, req))
}

fn try_update(store: &dyn MovieStore, req: &HandlerRequest) -> Result<HandlerResponse, ApiError> {
    let body = req
        .body
        .json_or_empty_object()
        .map_err(ApiError::MalformedBody)?;
    let patch = validate_partial_movie(&body)?;
    let id = path_id(req);
    let movie = store
        .replace_at(id, patch)
        .ok_or(ApiError::NotFound(MOVIE_NOT_FOUND))?;
    info!(request_id = %req.request_id, movie_id = %id, "Movie updated");
    Ok(json_response(200, &movie))
}

/// `DELETE /movies/{id}`
pub fn delete_movie(store: &dyn MovieStore, req: &HandlerRequest) -> HandlerResponse {
    let id = path_id(req);
    if store.remove_by_id(id) {
        info!(request_id = %req.request_id, movie_id = %id, "Movie deleted");
        HandlerResponse::no_content()
    } else {
        ApiError::NotFound(MOVIE_NOT_FOUND).into()
    }
}

/// `OPTIONS /movies[/{id}]`. CORS headers are added by the CORS middleware.
pub fn preflight(_req: &HandlerRequest) -> HandlerResponse {
    HandlerResponse::no_content()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::{HeaderVec, RequestBody};
    use crate::ids::RequestId;
    use crate::movie::Genre;
    use crate::router::ParamVec;
    use crate::store::InMemoryMovieStore;
    use http::Method;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn store() -> InMemoryMovieStore {
        InMemoryMovieStore::new(vec![Movie {
            id: "m1".into(),
            title: "Heat".into(),
            year: 1995,
            director: "Michael Mann".into(),
            duration: 170,
            rate: 8.3,
            poster: "https://img.example.com/heat.jpg".into(),
            genre: vec![Genre::Crime, Genre::Drama],
        }])
    }

    fn req(
        method: Method,
        params: &[(&str, &str)],
        query: &[(&str, &str)],
        body: RequestBody,
    ) -> HandlerRequest {
        let to_vec = |pairs: &[(&str, &str)]| -> ParamVec {
            pairs
                .iter()
                .map(|(k, v)| (Arc::from(*k), (*v).to_string()))
                .collect()
        };
        HandlerRequest {
            request_id: RequestId::new(),
            method,
            path: "/movies".into(),
            handler_name: "test".into(),
            path_params: to_vec(params),
            query_params: to_vec(query),
            headers: HeaderVec::new(),
            body,
        }
    }

    fn body(resp: &HandlerResponse) -> &Value {
        resp.body.as_ref().unwrap()
    }

    #[test]
    fn test_list_with_and_without_genre() {
        let s = store();
        let all = list_movies(&s, &req(Method::GET, &[], &[], RequestBody::Empty));
        assert_eq!(body(&all).as_array().unwrap().len(), 1);

        let none = list_movies(
            &s,
            &req(Method::GET, &[], &[("genre", "comedy")], RequestBody::Empty),
        );
        assert_eq!(body(&none), &json!([]));

        let empty_filter = list_movies(
            &s,
            &req(Method::GET, &[], &[("genre", "")], RequestBody::Empty),
        );
        assert_eq!(body(&empty_filter).as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_get_found_and_missing() {
        let s = store();
        let found = get_movie(&s, &req(Method::GET, &[("id", "m1")], &[], RequestBody::Empty));
        assert_eq!(found.status, 200);
        assert_eq!(body(&found)["title"], "Heat");

        let missing = get_movie(&s, &req(Method::GET, &[("id", "zz")], &[], RequestBody::Empty));
        assert_eq!(missing.status, 404);
        assert_eq!(body(&missing), &json!({"message": "Movie not found"}));
    }

    #[test]
    fn test_create_assigns_id_and_default_rate() {
        let s = store();
        let payload = json!({
            "title": "X", "year": 2020, "director": "D", "duration": 90,
            "poster": "http://a.com/p.jpg", "genre": ["Action"], "id": "mine"
        });
        let resp = create_movie(&s, &req(Method::POST, &[], &[], RequestBody::Json(payload)));
        assert_eq!(resp.status, 201);
        let created = body(&resp);
        assert_eq!(created["rate"], json!(5.0));
        let id = created["id"].as_str().unwrap();
        assert_ne!(id, "mine");
        assert!(s.find_by_id(id).is_some());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_create_rejects_invalid_and_malformed() {
        let s = store();
        let resp = create_movie(&s, &req(Method::POST, &[], &[], RequestBody::Empty));
        assert_eq!(resp.status, 400);
        assert!(body(&resp)["error"].as_array().unwrap().len() >= 6);

        let resp = create_movie(
            &s,
            &req(Method::POST, &[], &[], RequestBody::Malformed("expected value".into())),
        );
        assert_eq!(resp.status, 400);
        assert_eq!(body(&resp)["error"][0]["code"], "invalid_json");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_update_merges_and_validates_first() {
        let s = store();
        let resp = update_movie(
            &s,
            &req(Method::PATCH, &[("id", "m1")], &[], RequestBody::Json(json!({"rate": 9}))),
        );
        assert_eq!(resp.status, 200);
        assert_eq!(body(&resp)["rate"], json!(9.0));
        assert_eq!(body(&resp)["title"], "Heat");

        // invalid body on a missing id: 400 wins
        let resp = update_movie(
            &s,
            &req(Method::PATCH, &[("id", "zz")], &[], RequestBody::Json(json!({"year": 3000}))),
        );
        assert_eq!(resp.status, 400);

        let resp = update_movie(
            &s,
            &req(Method::PATCH, &[("id", "zz")], &[], RequestBody::Json(json!({"rate": 1}))),
        );
        assert_eq!(resp.status, 404);
    }

    #[test]
    fn test_update_with_null_fields_is_rejected() {
        let s = store();
        let resp = update_movie(
            &s,
            &req(
                Method::PATCH,
                &[("id", "m1")],
                &[],
                RequestBody::Json(json!({"title": null, "year": null, "genre": null})),
            ),
        );
        assert_eq!(resp.status, 400);
        assert_eq!(body(&resp)["error"][0]["code"], "invalid_type");
        assert_eq!(s.find_by_id("m1").unwrap().title, "Heat");
    }

    #[test]
    fn test_create_with_null_rate_is_rejected() {
        let s = store();
        let payload = json!({
            "title": "X", "year": 2020, "director": "D", "duration": 90, "rate": null,
            "poster": "http://a.com/p.jpg", "genre": ["Action"]
        });
        let resp = create_movie(&s, &req(Method::POST, &[], &[], RequestBody::Json(payload)));
        assert_eq!(resp.status, 400);
        assert_eq!(body(&resp)["error"][0]["field"], "rate");
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_delete_twice() {
        let s = store();
        let delete = || req(Method::DELETE, &[("id", "m1")], &[], RequestBody::Empty);
        let first = delete_movie(&s, &delete());
        assert_eq!(first.status, 204);
        assert_eq!(first.body, None);
        let second = delete_movie(&s, &delete());
        assert_eq!(second.status, 404);
        assert!(s.is_empty());
    }

    #[test]
    fn test_by_director_and_genre() {
        let s = store();
        let hits = list_movies_by_director(
            &s,
            &req(Method::GET, &[("director", "mann")], &[], RequestBody::Empty),
        );
        assert_eq!(body(&hits).as_array().unwrap().len(), 1);
        let hits = list_movies_by_genre(
            &s,
            &req(Method::GET, &[("genre", "Comedy")], &[], RequestBody::Empty),
        );
        assert_eq!(body(&hits), &json!([]));
    }
}
