use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{GeoPoint, Place};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlaceDto {
    pub public_id: Uuid,
    pub name: String,
    pub main_image: String,
    pub location: GeoPoint,
    pub distance: i64,
    pub experience: i32,
    pub description: Option<String>,
    pub is_active: bool,
}

impl PlaceDto {
    pub fn new(place: Place, main_image_url: String, distance: i64) -> Self {
        Self {
            public_id: place.public_id,
            name: place.name,
            main_image: main_image_url,
            location: place.location,
            distance,
            experience: place.experience,
            description: place.description,
            is_active: place.is_active,
        }
    }
}
