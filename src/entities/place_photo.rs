use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "postgres")]
use sqlx::FromRow;

#[cfg_attr(feature = "postgres", derive(FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacePhoto {
    pub id: i64,
    pub public_id: Uuid,
    pub place_id: i64,
    pub owner_id: i64,
    pub image: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewPlacePhoto {
    pub public_id: Uuid,
    pub place_id: i64,
    pub owner_id: i64,
    pub image: String,
    pub title: String,
    pub description: String,
}
