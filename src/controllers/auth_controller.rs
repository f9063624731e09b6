use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::app::AppState;
use crate::controllers::Controller;
use crate::dtos::auth_dtos::{
    TokenObtainRequest, TokenPairResponse, TokenRefreshRequest, TokenRefreshResponse,
};
use crate::http_error::{HttpError, HttpResult};

pub struct AuthController;

impl Controller for AuthController {
    fn routes() -> Router<AppState> {
        Router::new()
            .route("/auth/token/", post(obtain_token))
            .route("/auth/token/refresh/", post(refresh_token))
    }
}

async fn obtain_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<TokenPairResponse>> {
    let request: TokenObtainRequest = read_request(&state, &headers, body).await?;
    Ok(Json(state.auth.obtain(request).await?))
}

async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<TokenRefreshResponse>> {
    let request: TokenRefreshRequest = read_request(&state, &headers, body).await?;
    Ok(Json(state.auth.refresh(request)?))
}

// Token endpoints accept the same JSON or form bodies as the resource routes.
async fn read_request<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: Bytes,
) -> HttpResult<T> {
    let form = crate::controllers::request_extensions::read_form(state, headers, body).await?;
    let mut object = serde_json::Map::new();
    for key in ["username", "password", "refresh"] {
        if let Some(text) = form.text(key) {
            object.insert(key.to_string(), serde_json::Value::String(text));
        }
    }
    serde_json::from_value(serde_json::Value::Object(object))
        .map_err(|e| HttpError::detail(StatusCode::BAD_REQUEST, &e.to_string()))
}
