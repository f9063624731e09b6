use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

use super::{
    DataError, DataResult, Page, PageRequest, PlacePhotoLikeRepository, PlacePhotoRepository,
    PlaceQuery, PlaceRepository, UserRepository,
};
use crate::entities::{
    NewPlace, NewPlacePhoto, NewUser, Place, PlacePhoto, PlacePhotoLike, User,
};
use crate::services::GeoDistanceService;

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    places: BTreeMap<i64, Place>,
    photos: BTreeMap<i64, PlacePhoto>,
    likes: BTreeMap<i64, PlacePhotoLike>,
}

impl Tables {
    fn allocate_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn remove_photo_cascade(&mut self, photo_id: i64) -> bool {
        self.likes.retain(|_, like| like.place_photo_id != photo_id);
        self.photos.remove(&photo_id).is_some()
    }

    fn remove_place_cascade(&mut self, place_id: i64) -> bool {
        let photo_ids: Vec<i64> = self
            .photos
            .values()
            .filter(|photo| photo.place_id == place_id)
            .map(|photo| photo.id)
            .collect();
        for photo_id in photo_ids {
            self.remove_photo_cascade(photo_id);
        }
        self.places.remove(&place_id).is_some()
    }
}

/// In-process store implementing every repository trait over one set of
/// tables. Ids increase monotonically, so `BTreeMap` order is creation order.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> DataResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| DataError::Provider("memory store lock poisoned".to_string()))
    }

    pub fn place_count(&self) -> usize {
        self.tables().map(|t| t.places.len()).unwrap_or_default()
    }

    pub fn photo_count(&self) -> usize {
        self.tables().map(|t| t.photos.len()).unwrap_or_default()
    }

    pub fn like_count(&self) -> usize {
        self.tables().map(|t| t.likes.len()).unwrap_or_default()
    }
}

fn paginate<T: Clone>(items: Vec<&T>, page: PageRequest) -> Page<T> {
    let total = items.len() as u64;
    let selected = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .cloned()
        .collect();
    Page::new(selected, total, page.page, page.page_size)
}

fn unique_user_clash(
    tables: &Tables,
    username: &str,
    email: &str,
    except: Option<i64>,
) -> Option<&'static str> {
    let others = || tables.users.values().filter(move |u| Some(u.id) != except);
    if others().any(|u| u.username == username) {
        Some("username")
    } else if others().any(|u| u.email.eq_ignore_ascii_case(email)) {
        Some("email")
    } else {
        None
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: NewUser) -> DataResult<User> {
        let mut tables = self.tables()?;
        if let Some(column) = unique_user_clash(&tables, &user.username, &user.email, None) {
            return Err(DataError::Conflict(column.to_string()));
        }
        let id = tables.allocate_id();
        let created = User {
            id,
            public_id: user.public_id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            date_of_birth: user.date_of_birth,
            pfp: user.pfp,
            password_hash: user.password_hash,
            is_staff: user.is_staff,
            is_active: true,
        };
        tables.users.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> DataResult<Option<User>> {
        Ok(self.tables()?.users.get(&id).cloned())
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.public_id == public_id)
            .cloned())
    }

    async fn get_by_username(&self, username: &str) -> DataResult<Option<User>> {
        Ok(self
            .tables()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn username_taken(&self, username: &str, except: Option<i64>) -> DataResult<bool> {
        Ok(self
            .tables()?
            .users
            .values()
            .any(|u| u.username == username && Some(u.id) != except))
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> DataResult<bool> {
        Ok(self
            .tables()?
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email) && Some(u.id) != except))
    }

    async fn update(&self, user: &User) -> DataResult<User> {
        let mut tables = self.tables()?;
        if let Some(column) = unique_user_clash(&tables, &user.username, &user.email, Some(user.id)) {
            return Err(DataError::Conflict(column.to_string()));
        }
        let slot = tables.users.get_mut(&user.id).ok_or(DataError::NotFound)?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn total_experience(&self, id: i64) -> DataResult<i64> {
        let tables = self.tables()?;
        let mut place_ids: Vec<i64> = tables
            .photos
            .values()
            .filter(|photo| photo.owner_id == id)
            .map(|photo| photo.place_id)
            .collect();
        place_ids.sort_unstable();
        place_ids.dedup();

        Ok(place_ids
            .iter()
            .filter_map(|place_id| tables.places.get(place_id))
            .map(|place| place.experience as i64)
            .sum())
    }
}

#[async_trait]
impl PlaceRepository for MemoryStore {
    async fn create(&self, place: NewPlace) -> DataResult<Place> {
        let mut tables = self.tables()?;
        if !tables.users.contains_key(&place.added_by) {
            return Err(DataError::Provider("added_by references a missing user".into()));
        }
        let id = tables.allocate_id();
        let created = Place {
            id,
            public_id: place.public_id,
            name: place.name,
            description: place.description,
            main_image: place.main_image,
            added_by: place.added_by,
            location: place.location,
            is_active: place.is_active,
            experience: place.experience,
        };
        tables.places.insert(id, created.clone());
        Ok(created)
    }

    async fn get(&self, id: i64) -> DataResult<Option<Place>> {
        Ok(self.tables()?.places.get(&id).cloned())
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<Place>> {
        Ok(self
            .tables()?
            .places
            .values()
            .find(|p| p.public_id == public_id)
            .cloned())
    }

    async fn search(&self, query: &PlaceQuery, page: PageRequest) -> DataResult<Page<Place>> {
        let tables = self.tables()?;
        let matches: Vec<&Place> = tables
            .places
            .values()
            .filter(|place| match &query.search {
                Some(term) => contains_ignore_case(&place.name, term),
                None => true,
            })
            .filter(|place| match &query.within {
                Some((origin, radius)) => {
                    GeoDistanceService::meters(place.location, *origin) < *radius
                }
                None => true,
            })
            .collect();
        Ok(paginate(matches, page))
    }

    async fn update(&self, place: &Place) -> DataResult<Place> {
        let mut tables = self.tables()?;
        let slot = tables.places.get_mut(&place.id).ok_or(DataError::NotFound)?;
        *slot = place.clone();
        Ok(place.clone())
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        Ok(self.tables()?.remove_place_cascade(id))
    }
}

#[async_trait]
impl PlacePhotoRepository for MemoryStore {
    async fn create(&self, photo: NewPlacePhoto) -> DataResult<PlacePhoto> {
        let mut tables = self.tables()?;
        if !tables.places.contains_key(&photo.place_id) {
            return Err(DataError::Provider("place references a missing place".into()));
        }
        if !tables.users.contains_key(&photo.owner_id) {
            return Err(DataError::Provider("owner references a missing user".into()));
        }
        let id = tables.allocate_id();
        let created = PlacePhoto {
            id,
            public_id: photo.public_id,
            place_id: photo.place_id,
            owner_id: photo.owner_id,
            image: photo.image,
            title: photo.title,
            description: photo.description,
        };
        tables.photos.insert(id, created.clone());
        Ok(created)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<PlacePhoto>> {
        Ok(self
            .tables()?
            .photos
            .values()
            .find(|p| p.public_id == public_id)
            .cloned())
    }

    async fn list_for_place(
        &self,
        place_id: i64,
        search: Option<&str>,
        page: PageRequest,
    ) -> DataResult<Page<PlacePhoto>> {
        let tables = self.tables()?;
        let matches: Vec<&PlacePhoto> = tables
            .photos
            .values()
            .filter(|photo| photo.place_id == place_id)
            .filter(|photo| search.map_or(true, |term| contains_ignore_case(&photo.title, term)))
            .collect();
        Ok(paginate(matches, page))
    }

    async fn update(&self, photo: &PlacePhoto) -> DataResult<PlacePhoto> {
        let mut tables = self.tables()?;
        let slot = tables.photos.get_mut(&photo.id).ok_or(DataError::NotFound)?;
        *slot = photo.clone();
        Ok(photo.clone())
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        Ok(self.tables()?.remove_photo_cascade(id))
    }
}

#[async_trait]
impl PlacePhotoLikeRepository for MemoryStore {
    async fn create(&self, owner_id: i64, place_photo_id: i64) -> DataResult<PlacePhotoLike> {
        let mut tables = self.tables()?;
        let duplicate = tables
            .likes
            .values()
            .any(|like| like.owner_id == owner_id && like.place_photo_id == place_photo_id);
        if duplicate {
            return Err(DataError::Conflict("owner_id, place_photo_id".to_string()));
        }
        let id = tables.allocate_id();
        let like = PlacePhotoLike {
            id,
            owner_id,
            place_photo_id,
        };
        tables.likes.insert(id, like.clone());
        Ok(like)
    }

    async fn exists(&self, owner_id: i64, place_photo_id: i64) -> DataResult<bool> {
        Ok(self.find(owner_id, place_photo_id).await?.is_some())
    }

    async fn find(
        &self,
        owner_id: i64,
        place_photo_id: i64,
    ) -> DataResult<Option<PlacePhotoLike>> {
        Ok(self
            .tables()?
            .likes
            .values()
            .find(|like| like.owner_id == owner_id && like.place_photo_id == place_photo_id)
            .cloned())
    }

    async fn count_for_photo(&self, place_photo_id: i64) -> DataResult<i64> {
        Ok(self
            .tables()?
            .likes
            .values()
            .filter(|like| like.place_photo_id == place_photo_id)
            .count() as i64)
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        Ok(self.tables()?.likes.remove(&id).is_some())
    }
}
