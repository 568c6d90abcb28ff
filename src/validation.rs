//! Request validation.
//!
//! Field constraints are declared on the request DTOs with `validator` attributes and
//! evaluated in one pass. Every violation is collected into a [`FieldViolation`] list
//! rather than failing on the first one.

use std::borrow::Cow;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::ApiError;
use crate::models::EventStatus;

pub const DATE_PATTERN: &str = r"^\d{4}-\d{2}-\d{2}$";

/// One field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct FieldViolation {
    /// Location of the offending input, e.g. `["body", "capacity"]`
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl FieldViolation {
    pub fn new(loc: &[&str], msg: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| s.to_string()).collect(),
            msg: msg.into(),
            kind: kind.into(),
        }
    }
}

/// Checks the `YYYY-MM-DD` shape. Calendar validity is not checked.
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    let bytes = value.as_bytes();
    let matches = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });

    if matches {
        Ok(())
    } else {
        Err(ValidationError::new("string_pattern_mismatch").with_message(Cow::Owned(format!(
            "String should match pattern '{}'",
            DATE_PATTERN
        ))))
    }
}

pub fn validate_status(value: &str) -> Result<(), ValidationError> {
    if value.parse::<EventStatus>().is_ok() {
        return Ok(());
    }

    let allowed: Vec<String> = EventStatus::ALL
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect();
    Err(ValidationError::new("enum").with_message(Cow::Owned(format!(
        "Input should be {}",
        allowed.join(", ")
    ))))
}

/// Flatten `validator` errors into violations located under `location`
/// (`"body"` or `"query"`), sorted by location.
pub fn violations_from(location: &str, errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let name = wire_name(&field);
            errs.iter()
                .map(|err| {
                    let (kind, msg) = describe(err);
                    FieldViolation::new(&[location, name.as_str()], msg, kind)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    violations.sort_by(|a, b| a.loc.cmp(&b.loc));
    violations
}

/// Map a Rust field name to its JSON name (`event_id` -> `eventId`)
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

fn describe(err: &ValidationError) -> (String, String) {
    let param = |key: &str| err.params.get(key).and_then(|v| v.as_i64());

    match err.code.as_ref() {
        "required" => ("missing".to_string(), "Field required".to_string()),
        "length" => {
            let len = err
                .params
                .get("value")
                .and_then(|v| v.as_str())
                .map(|s| s.chars().count() as i64);
            match (len, param("min"), param("max")) {
                (Some(len), Some(min), _) if len < min => (
                    "string_too_short".to_string(),
                    format!("String should have at least {} {}", min, characters(min)),
                ),
                (_, _, Some(max)) => (
                    "string_too_long".to_string(),
                    format!("String should have at most {} {}", max, characters(max)),
                ),
                _ => (
                    "string_length".to_string(),
                    "String length is out of range".to_string(),
                ),
            }
        }
        // Only `exclusive_min` ranges are declared
        "range" => (
            "greater_than".to_string(),
            format!(
                "Input should be greater than {}",
                param("exclusive_min").unwrap_or(0)
            ),
        ),
        code => {
            let msg = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| code.to_string());
            (code.to_string(), msg)
        }
    }
}

fn characters(n: i64) -> &'static str {
    if n == 1 { "character" } else { "characters" }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let kind = match &rejection {
            JsonRejection::JsonDataError(_) => "json_type",
            JsonRejection::JsonSyntaxError(_) => "json_invalid",
            JsonRejection::MissingJsonContentType(_) => "content_type",
            _ => "body_read",
        };
        ApiError::Validation(vec![FieldViolation::new(
            &["body"],
            rejection.body_text(),
            kind,
        )])
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(vec![FieldViolation::new(
            &["query"],
            rejection.body_text(),
            "query_invalid",
        )])
    }
}

/// JSON body extractor that deserializes and then runs the declared constraints.
///
/// Both malformed JSON and constraint violations are rejected with
/// [`ApiError::Validation`].
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value
            .validate()
            .map_err(|errors| ApiError::Validation(violations_from("body", &errors)))?;
        Ok(ValidatedJson(value))
    }
}

/// Query string extractor with the same rejection shape as [`ValidatedJson`].
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value
            .validate()
            .map_err(|errors| ApiError::Validation(violations_from("query", &errors)))?;
        Ok(ValidatedQuery(value))
    }
}
