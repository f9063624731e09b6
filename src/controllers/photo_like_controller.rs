use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::app::AppState;
use crate::controllers::Controller;
use crate::controllers::identity::Identity;
use crate::controllers::request_extensions::route_uuid;
use crate::dtos::like_dtos::{CreatedLikeDto, LikeExistsDto};
use crate::http_error::HttpResult;

pub struct PhotoLikeController;

impl Controller for PhotoLikeController {
    fn routes() -> Router<AppState> {
        Router::new().route(
            "/places/:id/photos/:pid/likes/",
            post(like_photo).get(like_exists).delete(unlike_photo),
        )
    }
}

async fn like_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
) -> HttpResult<impl IntoResponse> {
    let caller = identity.require_authenticated()?;
    state
        .likes
        .like(caller, route_uuid(&id)?, route_uuid(&pid)?)
        .await?;
    Ok((StatusCode::CREATED, Json(CreatedLikeDto::default())))
}

async fn like_exists(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
) -> HttpResult<Json<LikeExistsDto>> {
    let caller = identity.require_authenticated()?;
    // Ids that do not parse cannot name a liked photo.
    let exists = match (route_uuid(&id), route_uuid(&pid)) {
        (Ok(place_id), Ok(photo_id)) => state.likes.exists(caller, place_id, photo_id).await?,
        _ => false,
    };
    Ok(Json(LikeExistsDto { exists }))
}

async fn unlike_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
) -> HttpResult<StatusCode> {
    let caller = identity.require_authenticated()?;
    state
        .likes
        .unlike(caller, route_uuid(&id)?, route_uuid(&pid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
