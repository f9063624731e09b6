use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;

use crate::app::AppState;
use crate::controllers::Controller;
use crate::controllers::identity::Identity;
use crate::controllers::request_extensions::{
    base_query, ensure_page_exists, origin_point, page_request, read_form, route_uuid,
};
use crate::dtos::paginated_dto::PaginatedDto;
use crate::dtos::place_dtos::PlaceDto;
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::PlaceQuery;

pub struct PlaceController;

impl Controller for PlaceController {
    fn routes() -> Router<AppState> {
        Router::new()
            .route("/places/", post(create_place))
            .route("/places/search/", get(search_places))
            .route(
                "/places/:id/",
                get(get_place)
                    .put(replace_place)
                    .patch(patch_place)
                    .delete(delete_place),
            )
    }
}

async fn create_place(
    State(state): State<AppState>,
    identity: Identity,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<impl IntoResponse> {
    let caller = identity.require_admin()?;
    let origin = origin_point(&headers)?;
    let form = read_form(&state, &headers, body).await?;

    let place = state.places.create(caller, &form).await?;
    Ok((StatusCode::CREATED, Json(state.places.to_dto(place, origin))))
}

async fn get_place(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> HttpResult<Json<PlaceDto>> {
    let origin = origin_point(&headers)?;
    let place = state.places.get(route_uuid(&id)?).await?;
    Ok(Json(state.places.to_dto(place, origin)))
}

async fn search_places(
    State(state): State<AppState>,
    identity: Identity,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    RawQuery(raw_query): RawQuery,
) -> HttpResult<Json<PaginatedDto<PlaceDto>>> {
    identity.require_admin()?;
    let origin = origin_point(&headers)?;

    let within = match query.get("range").filter(|raw| !raw.is_empty()) {
        None => None,
        Some(raw) => {
            let Some(origin) = origin else {
                return Err(HttpError::new(
                    StatusCode::BAD_REQUEST,
                    json!({ "msg": "Point header is missing." }),
                ));
            };
            let radius = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|radius| radius.is_finite())
                .ok_or_else(|| HttpError::field("range", "A valid number is required."))?;
            Some((origin, radius))
        }
    };

    let filter = PlaceQuery {
        search: query.get("search").filter(|term| !term.is_empty()).cloned(),
        within,
    };
    let page = state
        .places
        .search(&filter, page_request(&state, &query)?)
        .await?;
    ensure_page_exists(&page)?;

    let page = page.map(|place| state.places.to_dto(place, origin));
    Ok(Json(PaginatedDto::from_page(
        page,
        &base_query(raw_query.as_deref()),
    )))
}

async fn replace_place(
    state: State<AppState>,
    identity: Identity,
    path: Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<PlaceDto>> {
    update_place(state, identity, path, headers, body, false).await
}

async fn patch_place(
    state: State<AppState>,
    identity: Identity,
    path: Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> HttpResult<Json<PlaceDto>> {
    update_place(state, identity, path, headers, body, true).await
}

async fn update_place(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
    partial: bool,
) -> HttpResult<Json<PlaceDto>> {
    identity.require_admin()?;
    let origin = origin_point(&headers)?;
    let public_id = route_uuid(&id)?;
    let form = read_form(&state, &headers, body).await?;

    let place = state.places.update(public_id, &form, partial).await?;
    Ok(Json(state.places.to_dto(place, origin)))
}

async fn delete_place(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<String>,
) -> HttpResult<StatusCode> {
    let caller = identity.require_admin()?;
    state.places.delete(caller, route_uuid(&id)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
