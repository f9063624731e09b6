use std::sync::Arc;
use uuid::Uuid;

use crate::entities::{PlacePhoto, PlacePhotoLike, User};
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::{DataError, PlacePhotoLikeRepository};
use crate::services::PlacePhotoService;

pub const DUPLICATE_LIKE_MESSAGE: &str = "You can not like the same photo twice. ";
pub const MISSING_LIKE_MESSAGE: &str = "You have to like the photo first. ";

pub struct PhotoLikeService {
    likes: Arc<dyn PlacePhotoLikeRepository>,
    photos: Arc<PlacePhotoService>,
}

impl PhotoLikeService {
    pub fn new(likes: Arc<dyn PlacePhotoLikeRepository>, photos: Arc<PlacePhotoService>) -> Self {
        Self { likes, photos }
    }

    pub async fn like(
        &self,
        caller: &User,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<PlacePhotoLike> {
        let (_, photo) = self.photos.get(place_public_id, photo_public_id).await?;

        if self.likes.exists(caller.id, photo.id).await? {
            return Err(HttpError::bad_request(DUPLICATE_LIKE_MESSAGE));
        }

        // The store rejects a pair that slipped in between the check and here.
        let like = match self.likes.create(caller.id, photo.id).await {
            Ok(like) => like,
            Err(DataError::Conflict(_)) => {
                return Err(HttpError::bad_request(DUPLICATE_LIKE_MESSAGE));
            }
            Err(other) => return Err(other.into()),
        };

        log::info!("{} liked photo {}", caller.username, photo.public_id);
        Ok(like)
    }

    pub async fn exists(
        &self,
        caller: &User,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<bool> {
        match self.resolve(place_public_id, photo_public_id).await? {
            Some(photo) => Ok(self.likes.exists(caller.id, photo.id).await?),
            None => Ok(false),
        }
    }

    pub async fn unlike(
        &self,
        caller: &User,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<()> {
        let like = match self.resolve(place_public_id, photo_public_id).await? {
            Some(photo) => self.likes.find(caller.id, photo.id).await?,
            None => None,
        };
        let Some(like) = like else {
            return Err(HttpError::bad_request(MISSING_LIKE_MESSAGE));
        };

        self.likes.delete(like.id).await?;
        log::info!("{} unliked photo {}", caller.username, photo_public_id);
        Ok(())
    }

    async fn resolve(
        &self,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<Option<PlacePhoto>> {
        match self.photos.get(place_public_id, photo_public_id).await {
            Ok((_, photo)) => Ok(Some(photo)),
            Err(error) if error.status() == axum::http::StatusCode::NOT_FOUND => Ok(None),
            Err(error) => Err(error),
        }
    }
}
