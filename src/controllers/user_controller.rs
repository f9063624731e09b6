use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;

use crate::app::AppState;
use crate::controllers::Controller;
use crate::controllers::identity::Identity;
use crate::controllers::request_extensions::{read_form, route_uuid};
use crate::dtos::user_dtos::UserDto;
use crate::http_error::HttpResult;

pub struct UserController;

impl Controller for UserController {
    fn routes() -> Router<AppState> {
        Router::new()
            .route("/users/", post(register_user))
            .route("/users/me/", get(current_user))
            .route("/users/:id/", get(get_user).patch(update_user))
    }
}

async fn register_user(
    State(state): State<AppState>,
    _identity: Identity,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<impl IntoResponse> {
    let form = read_form(&state, &headers, body).await?;
    let user = state.users.register(&form).await?;
    Ok((StatusCode::CREATED, Json(state.users.to_dto(user).await?)))
}

async fn current_user(
    State(state): State<AppState>,
    identity: Identity,
) -> HttpResult<Json<UserDto>> {
    let caller = identity.require_authenticated()?.clone();
    Ok(Json(state.users.to_dto(caller).await?))
}

async fn get_user(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
) -> HttpResult<Json<UserDto>> {
    let user = state.users.get_by_public_id(route_uuid(&id)?).await?;
    Ok(Json(state.users.to_dto(user).await?))
}

async fn update_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<UserDto>> {
    let caller = identity.require_authenticated()?;
    let public_id = route_uuid(&id)?;
    let form = read_form(&state, &headers, body).await?;

    let user = state.users.update(caller, public_id, &form).await?;
    Ok(Json(state.users.to_dto(user).await?))
}
