use serde::{Deserialize, Serialize};

#[cfg(feature = "postgres")]
use sqlx::FromRow;

#[cfg_attr(feature = "postgres", derive(FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacePhotoLike {
    pub id: i64,
    pub owner_id: i64,
    pub place_photo_id: i64,
}
