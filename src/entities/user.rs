use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "postgres")]
use sqlx::FromRow;

pub const DEFAULT_PROFILE_PICTURE: &str = "defaults/users/default.png";

#[cfg_attr(feature = "postgres", derive(FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: i64,
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub pfp: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub public_id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub pfp: String,
    pub password_hash: String,
    pub is_staff: bool,
}
