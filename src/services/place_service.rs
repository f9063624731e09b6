use std::sync::Arc;
use uuid::Uuid;

use crate::dtos::form::FormData;
use crate::dtos::place_dtos::PlaceDto;
use crate::entities::place::DEFAULT_PLACE_IMAGE;
use crate::entities::{GeoPoint, NewPlace, Place, User};
use crate::http_error::{HttpError, HttpResult};
use crate::repositories::{Page, PageRequest, PlaceQuery, PlaceRepository};
use crate::services::validation::FormValidator;
use crate::services::{GeoDistanceService, ImageService, MediaStorage};

const NAME_MAX_LENGTH: usize = 64;
const DESCRIPTION_MAX_LENGTH: usize = 256;
const MAIN_IMAGE_PREFIX: &str = "places";

pub struct PlaceService {
    places: Arc<dyn PlaceRepository>,
    media: MediaStorage,
    images: ImageService,
}

impl PlaceService {
    pub fn new(places: Arc<dyn PlaceRepository>, media: MediaStorage, images: ImageService) -> Self {
        Self {
            places,
            media,
            images,
        }
    }

    pub async fn create(&self, caller: &User, form: &FormData) -> HttpResult<Place> {
        let mut validator = FormValidator::new(form, false);
        let name = validator.string("name", NAME_MAX_LENGTH, true);
        let description = validator.nullable_string("description", DESCRIPTION_MAX_LENGTH);
        let location = validator.point("location", true);
        let experience = validator.integer("experience", true);
        let is_active = validator.boolean("is_active");
        let main_image = validator.image("main_image", false, &self.images);
        validator.finish()?;

        let (Some(name), Some(location), Some(experience)) = (name, location, experience) else {
            return Err(HttpError::internal("validated place is incomplete"));
        };

        let stored = match main_image {
            Some(file) => Some(self.media.save(MAIN_IMAGE_PREFIX, file).await?),
            None => None,
        };
        let main_image = stored
            .clone()
            .unwrap_or_else(|| DEFAULT_PLACE_IMAGE.to_string());

        let created = self
            .places
            .create(NewPlace {
                public_id: Uuid::new_v4(),
                name,
                description: description.flatten(),
                main_image,
                added_by: caller.id,
                location,
                is_active: is_active.unwrap_or(true),
                experience,
            })
            .await;
        if created.is_err() {
            self.discard(stored.as_deref()).await;
        }
        let place = created?;

        log::info!("Place {} created by {}", place.public_id, caller.username);
        Ok(place)
    }

    pub async fn get(&self, public_id: Uuid) -> HttpResult<Place> {
        self.places
            .get_by_public_id(public_id)
            .await?
            .ok_or_else(HttpError::not_found)
    }

    pub async fn get_by_id(&self, id: i64) -> HttpResult<Place> {
        self.places.get(id).await?.ok_or_else(HttpError::not_found)
    }

    pub async fn search(&self, query: &PlaceQuery, page: PageRequest) -> HttpResult<Page<Place>> {
        log::debug!(
            "Searching places: search={:?} within={:?} page={}",
            query.search,
            query.within,
            page.page
        );
        Ok(self.places.search(query, page).await?)
    }

    /// `partial` keeps every field the form leaves out; otherwise the
    /// required fields must all be present.
    pub async fn update(&self, public_id: Uuid, form: &FormData, partial: bool) -> HttpResult<Place> {
        let mut place = self.get(public_id).await?;

        let mut validator = FormValidator::new(form, partial);
        let name = validator.string("name", NAME_MAX_LENGTH, true);
        let description = validator.nullable_string("description", DESCRIPTION_MAX_LENGTH);
        let location = validator.point("location", true);
        let experience = validator.integer("experience", true);
        let is_active = validator.boolean("is_active");
        let main_image = validator.image("main_image", false, &self.images);
        validator.finish()?;

        if let Some(name) = name {
            place.name = name;
        }
        if let Some(description) = description {
            place.description = description;
        }
        if let Some(location) = location {
            place.location = location;
        }
        if let Some(experience) = experience {
            place.experience = experience;
        }
        if let Some(is_active) = is_active {
            place.is_active = is_active;
        }
        let stored = match main_image {
            Some(file) => Some(self.media.save(MAIN_IMAGE_PREFIX, file).await?),
            None => None,
        };
        if let Some(path) = &stored {
            place.main_image = path.clone();
        }

        let updated = self.places.update(&place).await;
        if updated.is_err() {
            self.discard(stored.as_deref()).await;
        }
        let updated = updated?;
        log::info!("Place {} updated", updated.public_id);
        Ok(updated)
    }

    /// Only the admin who created the place may delete it; others get 401.
    pub async fn delete(&self, caller: &User, public_id: Uuid) -> HttpResult<()> {
        let place = self.get(public_id).await?;
        if place.added_by != caller.id {
            log::warn!(
                "User {} tried to delete place {} created by someone else",
                caller.username,
                place.public_id
            );
            return Err(HttpError::unauthorized());
        }

        self.places.delete(place.id).await?;
        log::info!("Place {} deleted", place.public_id);
        Ok(())
    }

    async fn discard(&self, stored: Option<&str>) {
        if let Some(relative) = stored {
            self.media.discard(relative).await;
        }
    }

    pub fn to_dto(&self, place: Place, origin: Option<GeoPoint>) -> PlaceDto {
        let distance = origin
            .map(|origin| GeoDistanceService::whole_meters(place.location, origin))
            .unwrap_or(0);
        let main_image = self.media.url(&place.main_image);
        PlaceDto::new(place, main_image, distance)
    }
}
