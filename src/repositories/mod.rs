pub mod memory;
pub mod paging;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "postgres")]
pub mod schema;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{
    GeoPoint, NewPlace, NewPlacePhoto, NewUser, Place, PlacePhoto, PlacePhotoLike, User,
};

pub use memory::MemoryStore;
pub use paging::{Page, PageRequest};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DataError {
    #[error("record not found")]
    NotFound,
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("provider error: {0}")]
    Provider(String),
}

pub type DataResult<T> = Result<T, DataError>;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> DataResult<User>;
    async fn get(&self, id: i64) -> DataResult<Option<User>>;
    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<User>>;
    async fn get_by_username(&self, username: &str) -> DataResult<Option<User>>;
    /// True when another user (other than `except`) already holds the value.
    async fn username_taken(&self, username: &str, except: Option<i64>) -> DataResult<bool>;
    async fn email_taken(&self, email: &str, except: Option<i64>) -> DataResult<bool>;
    async fn update(&self, user: &User) -> DataResult<User>;
    /// Sum of `experience` over distinct places the user has photographed.
    async fn total_experience(&self, id: i64) -> DataResult<i64>;
}

/// Filters for place search. `within` keeps places strictly closer than the
/// radius (meters) to the point.
#[derive(Debug, Clone, Default)]
pub struct PlaceQuery {
    pub search: Option<String>,
    pub within: Option<(GeoPoint, f64)>,
}

#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn create(&self, place: NewPlace) -> DataResult<Place>;
    async fn get(&self, id: i64) -> DataResult<Option<Place>>;
    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<Place>>;
    async fn search(&self, query: &PlaceQuery, page: PageRequest) -> DataResult<Page<Place>>;
    async fn update(&self, place: &Place) -> DataResult<Place>;
    /// Removes the place together with its photos and their likes.
    async fn delete(&self, id: i64) -> DataResult<bool>;
}

#[async_trait]
pub trait PlacePhotoRepository: Send + Sync {
    async fn create(&self, photo: NewPlacePhoto) -> DataResult<PlacePhoto>;
    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<PlacePhoto>>;
    async fn list_for_place(
        &self,
        place_id: i64,
        search: Option<&str>,
        page: PageRequest,
    ) -> DataResult<Page<PlacePhoto>>;
    async fn update(&self, photo: &PlacePhoto) -> DataResult<PlacePhoto>;
    async fn delete(&self, id: i64) -> DataResult<bool>;
}

#[async_trait]
pub trait PlacePhotoLikeRepository: Send + Sync {
    /// Fails with `DataError::Conflict` when the pair is already recorded.
    async fn create(&self, owner_id: i64, place_photo_id: i64) -> DataResult<PlacePhotoLike>;
    async fn exists(&self, owner_id: i64, place_photo_id: i64) -> DataResult<bool>;
    async fn find(&self, owner_id: i64, place_photo_id: i64)
    -> DataResult<Option<PlacePhotoLike>>;
    async fn count_for_photo(&self, place_photo_id: i64) -> DataResult<i64>;
    async fn delete(&self, id: i64) -> DataResult<bool>;
}
