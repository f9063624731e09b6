use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::geo_point::GeoPoint;

#[cfg(feature = "postgres")]
use {
    sqlx::postgres::PgRow,
    sqlx::{FromRow, Row},
};

pub const DEFAULT_PLACE_IMAGE: &str = "defaults/places/default.png";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Place {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub main_image: String,
    pub added_by: i64,
    pub location: GeoPoint,
    pub is_active: bool,
    pub experience: i32,
}

#[derive(Debug, Clone)]
pub struct NewPlace {
    pub public_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub main_image: String,
    pub added_by: i64,
    pub location: GeoPoint,
    pub is_active: bool,
    pub experience: i32,
}

// Rows select the geography column as `longitude`/`latitude` via ST_X/ST_Y.
#[cfg(feature = "postgres")]
impl<'r> FromRow<'r, PgRow> for Place {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            public_id: row.try_get("public_id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            main_image: row.try_get("main_image")?,
            added_by: row.try_get("added_by")?,
            location: GeoPoint {
                longitude: row.try_get("longitude")?,
                latitude: row.try_get("latitude")?,
            },
            is_active: row.try_get("is_active")?,
            experience: row.try_get("experience")?,
        })
    }
}
