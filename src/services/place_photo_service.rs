use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::form::FormData;
use crate::dtos::place_photo_dtos::PlacePhotoDto;
use crate::entities::{GeoPoint, NewPlacePhoto, Place, PlacePhoto, User};
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::{Page, PageRequest, PlacePhotoLikeRepository, PlacePhotoRepository};
use crate::services::validation::FormValidator;
use crate::services::{ImageService, MediaStorage, PlaceService, UserService};

const TITLE_MAX_LENGTH: usize = 64;
const DESCRIPTION_MAX_LENGTH: usize = 256;
const IMAGE_PREFIX: &str = "place_photos";

pub const INACTIVE_PLACE_MESSAGE: &str = "You can not add photo for a place that is not active";

pub struct PlacePhotoService {
    photos: Arc<dyn PlacePhotoRepository>,
    likes: Arc<dyn PlacePhotoLikeRepository>,
    places: Arc<PlaceService>,
    users: Arc<UserService>,
    media: MediaStorage,
    images: ImageService,
}

impl PlacePhotoService {
    pub fn new(
        photos: Arc<dyn PlacePhotoRepository>,
        likes: Arc<dyn PlacePhotoLikeRepository>,
        places: Arc<PlaceService>,
        users: Arc<UserService>,
        media: MediaStorage,
        images: ImageService,
    ) -> Self {
        Self {
            photos,
            likes,
            places,
            users,
            media,
            images,
        }
    }

    pub async fn create(
        &self,
        caller: &User,
        place_public_id: Uuid,
        form: &FormData,
    ) -> HttpResult<(Place, PlacePhoto)> {
        let place = self.places.get(place_public_id).await?;
        if !place.is_active {
            return Err(HttpError::bad_request(INACTIVE_PLACE_MESSAGE));
        }

        let mut validator = FormValidator::new(form, false);
        let title = validator.string("title", TITLE_MAX_LENGTH, true);
        let description = validator.string("description", DESCRIPTION_MAX_LENGTH, false);
        let image = validator.image("image", true, &self.images);
        validator.finish()?;

        let (Some(title), Some(image)) = (title, image) else {
            return Err(HttpError::internal("validated photo is incomplete"));
        };

        let stored = self.media.save(IMAGE_PREFIX, image).await?;
        let created = self
            .photos
            .create(NewPlacePhoto {
                public_id: Uuid::new_v4(),
                place_id: place.id,
                owner_id: caller.id,
                image: stored.clone(),
                title,
                description: description.unwrap_or_default(),
            })
            .await;
        if created.is_err() {
            self.media.discard(&stored).await;
        }
        let photo = created?;

        log::info!(
            "Photo {} added to place {} by {}",
            photo.public_id,
            place.public_id,
            caller.username
        );
        Ok((place, photo))
    }

    /// Resolves a photo that must belong to the given place.
    pub async fn get(
        &self,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<(Place, PlacePhoto)> {
        let place = self.places.get(place_public_id).await?;
        let photo = self
            .photos
            .get_by_public_id(photo_public_id)
            .await?
            .filter(|photo| photo.place_id == place.id)
            .ok_or_else(HttpError::not_found)?;
        Ok((place, photo))
    }

    pub async fn list(
        &self,
        place_public_id: Uuid,
        search: Option<&str>,
        page: PageRequest,
    ) -> HttpResult<(Place, Page<PlacePhoto>)> {
        let place = self.places.get(place_public_id).await?;
        let photos = self.photos.list_for_place(place.id, search, page).await?;
        Ok((place, photos))
    }

    pub async fn update(
        &self,
        caller: &User,
        place_public_id: Uuid,
        photo_public_id: Uuid,
        form: &FormData,
    ) -> HttpResult<(Place, PlacePhoto)> {
        let (place, mut photo) = self.get(place_public_id, photo_public_id).await?;
        if photo.owner_id != caller.id {
            return Err(HttpError::unauthorized());
        }

        let mut validator = FormValidator::new(form, true);
        let title = validator.string("title", TITLE_MAX_LENGTH, true);
        let description = validator.string("description", DESCRIPTION_MAX_LENGTH, false);
        validator.finish()?;

        if let Some(title) = title {
            photo.title = title;
        }
        if let Some(description) = description {
            photo.description = description;
        }

        let updated = self.photos.update(&photo).await?;
        log::info!("Photo {} updated", updated.public_id);
        Ok((place, updated))
    }

    pub async fn delete(
        &self,
        caller: &User,
        place_public_id: Uuid,
        photo_public_id: Uuid,
    ) -> HttpResult<()> {
        let (_, photo) = self.get(place_public_id, photo_public_id).await?;
        if photo.owner_id != caller.id {
            return Err(HttpError::unauthorized());
        }

        self.photos.delete(photo.id).await?;
        log::info!("Photo {} deleted", photo.public_id);
        Ok(())
    }

    pub async fn to_dto(
        &self,
        photo: PlacePhoto,
        place: Place,
        caller: Option<&User>,
        origin: Option<GeoPoint>,
    ) -> HttpResult<PlacePhotoDto> {
        let owner = self.users.get(photo.owner_id).await?;
        let owner = self.users.to_dto(owner).await?;
        let like_count = self.likes.count_for_photo(photo.id).await?;
        let liked = match caller {
            Some(user) => self.likes.exists(user.id, photo.id).await?,
            None => false,
        };

        Ok(PlacePhotoDto {
            public_id: photo.public_id,
            owner,
            place: self.places.to_dto(place, origin),
            image: self.media.url(&photo.image),
            title: photo.title,
            liked,
            like_count,
            description: photo.description,
        })
    }

    pub async fn to_dtos(
        &self,
        photos: Page<PlacePhoto>,
        place: &Place,
        caller: Option<&User>,
        origin: Option<GeoPoint>,
    ) -> HttpResult<Page<PlacePhotoDto>> {
        let mut items = Vec::with_capacity(photos.items.len());
        for photo in photos.items {
            items.push(self.to_dto(photo, place.clone(), caller, origin).await?);
        }
        Ok(Page::new(items, photos.total, photos.page, photos.page_size))
    }
}
