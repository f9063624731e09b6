use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::fmt;

use crate::repositories::DataError;

pub type HttpResult<T> = Result<T, HttpError>;

/// Error returned from handlers and services: a status code plus the JSON body
/// the client receives.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    status: StatusCode,
    body: Value,
}

impl HttpError {
    pub fn new(status: StatusCode, body: Value) -> Self {
        Self { status, body }
    }

    pub fn detail(status: StatusCode, detail: &str) -> Self {
        Self::new(status, json!({ "detail": detail }))
    }

    /// Body is a bare JSON string, used for the human readable like/photo messages.
    pub fn message(status: StatusCode, message: &str) -> Self {
        Self::new(status, Value::String(message.to_string()))
    }

    pub fn bad_request(message: &str) -> Self {
        Self::message(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::detail(StatusCode::NOT_FOUND, "Not found.")
    }

    pub fn not_authenticated() -> Self {
        Self::detail(
            StatusCode::UNAUTHORIZED,
            "Authentication credentials were not provided.",
        )
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, Value::Null)
    }

    pub fn forbidden() -> Self {
        Self::detail(
            StatusCode::FORBIDDEN,
            "You do not have permission to perform this action.",
        )
    }

    pub fn field(field: &str, message: &str) -> Self {
        let mut errors = FieldErrors::new();
        errors.add(field, message);
        errors.into_error()
    }

    pub fn internal(message: &str) -> Self {
        log::error!("Internal error: {}", message);
        Self::detail(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.body)
    }
}

impl std::error::Error for HttpError {}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.body.is_null() {
            return self.status.into_response();
        }
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DataError> for HttpError {
    fn from(error: DataError) -> Self {
        match error {
            DataError::NotFound => HttpError::not_found(),
            other => HttpError::internal(&other.to_string()),
        }
    }
}

impl From<anyhow::Error> for HttpError {
    fn from(error: anyhow::Error) -> Self {
        HttpError::internal(&format!("{:#}", error))
    }
}

/// Collects per-field validation messages, rendered as `{"field": ["msg", ...]}`.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> HttpError {
        let mut body = Map::new();
        for (field, messages) in self.errors {
            body.insert(field, json!(messages));
        }
        HttpError::new(StatusCode::BAD_REQUEST, Value::Object(body))
    }

    pub fn into_result(self) -> HttpResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}
