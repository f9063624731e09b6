use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dtos::place_dtos::PlaceDto;
use crate::dtos::user_dtos::UserDto;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacePhotoDto {
    pub public_id: Uuid,
    pub owner: UserDto,
    pub place: PlaceDto,
    pub image: String,
    pub title: String,
    pub liked: bool,
    pub like_count: i64,
    pub description: String,
}
