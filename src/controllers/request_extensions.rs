use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::app::AppState;
use crate::dtos::form::FormData;
use crate::entities::GeoPoint;
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::PageRequest;

pub const POINT_HEADER: &str = "point";

const WRONG_POINT_FORMAT: &str = "Wrong localization format. Use POINT(x y). ";

/// Path ids that are not uuids never match a record.
pub fn route_uuid(raw: &str) -> HttpResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| HttpError::not_found())
}

/// Reference point from the `Point` header; `None` when the header is absent.
pub fn origin_point(headers: &HeaderMap) -> HttpResult<Option<GeoPoint>> {
    let Some(raw) = headers.get(POINT_HEADER) else {
        return Ok(None);
    };
    let text = raw.to_str().map_err(|_| wrong_point_format())?;
    GeoPoint::parse(text)
        .map(Some)
        .map_err(|e| {
            log::debug!("Rejected Point header {:?}: {}", text, e);
            wrong_point_format()
        })
}

fn wrong_point_format() -> HttpError {
    HttpError::new(StatusCode::BAD_REQUEST, json!([WRONG_POINT_FORMAT]))
}

pub async fn read_form(state: &AppState, headers: &HeaderMap, body: Bytes) -> HttpResult<FormData> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok());
    state
        .uploads
        .parse_body(content_type, body)
        .await
        .map_err(|e| HttpError::detail(StatusCode::BAD_REQUEST, &e.to_string()))
}

pub fn page_request(state: &AppState, query: &HashMap<String, String>) -> HttpResult<PageRequest> {
    let page = match query.get("page").map(String::as_str) {
        None | Some("") => 1,
        Some(raw) => raw
            .parse::<u32>()
            .ok()
            .filter(|page| *page >= 1)
            .ok_or_else(invalid_page)?,
    };
    Ok(PageRequest::new(page, state.page_size))
}

/// A page past the end is only valid when it is the first one.
pub fn ensure_page_exists<T>(page: &crate::repositories::Page<T>) -> HttpResult<()> {
    if page.page > 1 && page.items.is_empty() {
        return Err(invalid_page());
    }
    Ok(())
}

fn invalid_page() -> HttpError {
    HttpError::detail(StatusCode::NOT_FOUND, "Invalid page.")
}

/// Query string without `page`, so pagination links keep the other filters.
pub fn base_query(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
        .collect::<Vec<_>>()
        .join("&")
}
