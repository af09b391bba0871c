//! Movie payload validation.
//!
//! Both entry points take the raw JSON body and return either typed data or
//! every field-level problem found. Unknown keys (including `id`) are
//! ignored, so clients can neither inject nor overwrite an id.
//!
//! | field      | type                  | rule                                   |
//! |------------|-----------------------|----------------------------------------|
//! | `title`    | string                | required, non-empty                    |
//! | `year`     | integer               | required, 1900..=2024                  |
//! | `director` | string                | required                               |
//! | `duration` | integer               | required, > 0                          |
//! | `rate`     | number                | optional, 0..=10, defaults to 5        |
//! | `poster`   | string                | required, absolute URL ending in .jpg  |
//! | `genre`    | array of [`Genre`]    | required, non-empty                    |

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use crate::movie::{
    Genre, MoviePatch, NewMovie, DEFAULT_RATE, MAX_RATE, MAX_YEAR, MIN_RATE, MIN_YEAR,
    POSTER_SUFFIX,
};

/// Machine-readable kind of a [`FieldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    InvalidType,
    TooSmall,
    TooBig,
    InvalidString,
    InvalidEnumValue,
    InvalidUrl,
}

/// One problem with one field of a movie payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub code: ErrorCode,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            code,
            message: message.into(),
        }
    }
}

/// Non-empty list of field errors for a rejected payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.field.as_str()).collect()
    }

    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a complete movie payload, applying the `rate` default.
pub fn validate_movie(input: &Value) -> Result<NewMovie, ValidationErrors> {
    let obj = as_object(input)?;
    let mut errors = Vec::new();
    let patch = collect_fields(obj, &mut errors);

    for field in ["title", "year", "director", "duration", "poster", "genre"] {
        if !obj.contains_key(field) {
            errors.push(FieldError::new(field, ErrorCode::Required, required_message(field)));
        }
    }

    match patch {
        MoviePatch {
            title: Some(title),
            year: Some(year),
            director: Some(director),
            duration: Some(duration),
            rate,
            poster: Some(poster),
            genre: Some(genre),
        } if errors.is_empty() => Ok(NewMovie {
            title,
            year,
            director,
            duration,
            rate: rate.unwrap_or(DEFAULT_RATE),
            poster,
            genre,
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

/// Validate a partial update: only present fields are checked, nothing is defaulted.
pub fn validate_partial_movie(input: &Value) -> Result<MoviePatch, ValidationErrors> {
    let obj = as_object(input)?;
    let mut errors = Vec::new();
    let patch = collect_fields(obj, &mut errors);
    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors(errors))
    }
}

fn as_object(input: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    input.as_object().ok_or_else(|| {
        ValidationErrors(vec![FieldError::new(
            "body",
            ErrorCode::InvalidType,
            "Movie payload must be a JSON object",
        )])
    })
}

fn required_message(field: &str) -> String {
    format!("Movie {field} is required")
}

/// Check every present field. Absent fields are left `None`; `null` is a wrong type.
fn collect_fields(obj: &Map<String, Value>, errors: &mut Vec<FieldError>) -> MoviePatch {
    let present = |name: &str| obj.get(name);
    let mut patch = MoviePatch::default();

    if let Some(v) = present("title") {
        patch.title = record(errors, check_title(v));
    }
    if let Some(v) = present("year") {
        patch.year = record(errors, check_year(v));
    }
    if let Some(v) = present("director") {
        patch.director = record(errors, check_string("director", v));
    }
    if let Some(v) = present("duration") {
        patch.duration = record(errors, check_duration(v));
    }
    if let Some(v) = present("rate") {
        patch.rate = record(errors, check_rate(v));
    }
    if let Some(v) = present("poster") {
        patch.poster = record(errors, check_poster(v));
    }
    if let Some(v) = present("genre") {
        patch.genre = record(errors, check_genre(v));
    }
    patch
}

fn record<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn check_string(field: &str, v: &Value) -> Result<String, FieldError> {
    v.as_str().map(str::to_string).ok_or_else(|| {
        FieldError::new(
            field,
            ErrorCode::InvalidType,
            format!("Movie {field} must be a string"),
        )
    })
}

fn check_title(v: &Value) -> Result<String, FieldError> {
    let title = check_string("title", v)?;
    if title.is_empty() {
        return Err(FieldError::new(
            "title",
            ErrorCode::TooSmall,
            "Movie title must not be empty",
        ));
    }
    Ok(title)
}

/// Integral JSON number, accepting `2020.0` but not `2020.5`.
fn as_integer(v: &Value) -> Option<i64> {
    if let Some(i) = v.as_i64() {
        return Some(i);
    }
    let f = v.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

fn check_year(v: &Value) -> Result<i64, FieldError> {
    if !v.is_number() {
        return Err(FieldError::new(
            "year",
            ErrorCode::InvalidType,
            "Movie year must be a number",
        ));
    }
    let year = as_integer(v).ok_or_else(|| {
        FieldError::new("year", ErrorCode::InvalidType, "Movie year must be an integer")
    })?;
    if year < MIN_YEAR {
        return Err(FieldError::new(
            "year",
            ErrorCode::TooSmall,
            format!("Movie year must be greater than or equal to {MIN_YEAR}"),
        ));
    }
    if year > MAX_YEAR {
        return Err(FieldError::new(
            "year",
            ErrorCode::TooBig,
            format!("Movie year must be less than or equal to {MAX_YEAR}"),
        ));
    }
    Ok(year)
}

fn check_duration(v: &Value) -> Result<u32, FieldError> {
    let duration = as_integer(v).ok_or_else(|| {
        FieldError::new(
            "duration",
            ErrorCode::InvalidType,
            "Movie duration must be an integer",
        )
    })?;
    if duration <= 0 {
        return Err(FieldError::new(
            "duration",
            ErrorCode::TooSmall,
            "Movie duration must be positive",
        ));
    }
    u32::try_from(duration).map_err(|_| {
        FieldError::new("duration", ErrorCode::TooBig, "Movie duration is too large")
    })
}

fn check_rate(v: &Value) -> Result<f64, FieldError> {
    let rate = v.as_f64().ok_or_else(|| {
        FieldError::new("rate", ErrorCode::InvalidType, "Movie rate must be a number")
    })?;
    if rate < MIN_RATE {
        return Err(FieldError::new(
            "rate",
            ErrorCode::TooSmall,
            format!("Movie rate must be greater than or equal to {MIN_RATE}"),
        ));
    }
    if rate > MAX_RATE {
        return Err(FieldError::new(
            "rate",
            ErrorCode::TooBig,
            format!("Movie rate must be less than or equal to {MAX_RATE}"),
        ));
    }
    Ok(rate)
}

fn check_poster(v: &Value) -> Result<String, FieldError> {
    let poster = check_string("poster", v)?;
    if url::Url::parse(&poster).is_err() {
        return Err(FieldError::new(
            "poster",
            ErrorCode::InvalidUrl,
            "Movie poster must be a valid url",
        ));
    }
    if !poster.ends_with(POSTER_SUFFIX) {
        return Err(FieldError::new(
            "poster",
            ErrorCode::InvalidString,
            format!("Movie poster must end with \"{POSTER_SUFFIX}\""),
        ));
    }
    Ok(poster)
}

fn check_genre(v: &Value) -> Result<Vec<Genre>, FieldError> {
    let items = v.as_array().ok_or_else(|| {
        FieldError::new(
            "genre",
            ErrorCode::InvalidType,
            "Movie genre must be an array of genres",
        )
    })?;
    if items.is_empty() {
        return Err(FieldError::new(
            "genre",
            ErrorCode::TooSmall,
            "Movie genre must contain at least one genre",
        ));
    }
    items
        .iter()
        .map(|item| {
            item.as_str()
                .and_then(|s| s.parse::<Genre>().ok())
                .ok_or_else(|| {
                    let expected: Vec<&str> = Genre::ALL.iter().map(|g| g.as_str()).collect();
                    FieldError::new(
                        "genre",
                        ErrorCode::InvalidEnumValue,
                        format!(
                            "Invalid genre {item}, expected one of: {}",
                            expected.join(", ")
                        ),
                    )
                })
        })
        .collect()
}
