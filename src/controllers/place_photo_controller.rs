use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use std::collections::HashMap;

use crate::app::AppState;
use crate::controllers::Controller;
use crate::controllers::identity::Identity;
use crate::controllers::request_extensions::{
    base_query, ensure_page_exists, origin_point, page_request, read_form, route_uuid,
};
use crate::dtos::paginated_dto::PaginatedDto;
use crate::dtos::place_photo_dtos::PlacePhotoDto;
use crate::http_error::HttpResult;

pub struct PlacePhotoController;

impl Controller for PlacePhotoController {
    fn routes() -> Router<AppState> {
        Router::new()
            .route(
                "/places/:id/photos/",
                get(list_photos).post(create_photo),
            )
            .route(
                "/places/:id/photos/:pid/",
                get(get_photo).patch(update_photo).delete(delete_photo),
            )
    }
}

async fn list_photos(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
) -> HttpResult<Json<PaginatedDto<PlacePhotoDto>>> {
    let origin = origin_point(&headers)?;
    let search = query.get("search").map(String::as_str).filter(|term| !term.is_empty());

    let (place, photos) = state
        .photos
        .list(route_uuid(&id)?, search, page_request(&state, &query)?)
        .await?;
    ensure_page_exists(&photos)?;

    let photos = state
        .photos
        .to_dtos(photos, &place, identity.user(), origin)
        .await?;
    Ok(Json(PaginatedDto::from_page(
        photos,
        &base_query(raw_query.as_deref()),
    )))
}

async fn create_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<impl IntoResponse> {
    let caller = identity.require_authenticated()?;
    let origin = origin_point(&headers)?;
    let place_id = route_uuid(&id)?;
    let form = read_form(&state, &headers, body).await?;

    let (place, photo) = state.photos.create(caller, place_id, &form).await?;
    let dto = state
        .photos
        .to_dto(photo, place, Some(caller), origin)
        .await?;
    Ok((StatusCode::CREATED, Json(dto)))
}

async fn get_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
    headers: HeaderMap,
) -> HttpResult<Json<PlacePhotoDto>> {
    let origin = origin_point(&headers)?;
    let (place, photo) = state
        .photos
        .get(route_uuid(&id)?, route_uuid(&pid)?)
        .await?;
    let dto = state
        .photos
        .to_dto(photo, place, identity.user(), origin)
        .await?;
    Ok(Json(dto))
}

async fn update_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<PlacePhotoDto>> {
    let caller = identity.require_authenticated()?;
    let origin = origin_point(&headers)?;
    let (place_id, photo_id) = (route_uuid(&id)?, route_uuid(&pid)?);
    let form = read_form(&state, &headers, body).await?;

    let (place, photo) = state
        .photos
        .update(caller, place_id, photo_id, &form)
        .await?;
    let dto = state
        .photos
        .to_dto(photo, place, Some(caller), origin)
        .await?;
    Ok(Json(dto))
}

async fn delete_photo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, pid)): Path<(String, String)>,
) -> HttpResult<StatusCode> {
    let caller = identity.require_authenticated()?;
    state
        .photos
        .delete(caller, route_uuid(&id)?, route_uuid(&pid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
