use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::User;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserDto {
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub pfp: String,
    pub total_experience: i64,
}

impl UserDto {
    pub fn new(user: User, pfp_url: String, total_experience: i64) -> Self {
        Self {
            public_id: user.public_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            pfp: pfp_url,
            total_experience,
        }
    }
}
