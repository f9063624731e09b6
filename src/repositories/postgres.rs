use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    DataError, DataResult, Page, PageRequest, PlacePhotoLikeRepository, PlacePhotoRepository,
    PlaceQuery, PlaceRepository, UserRepository,
};
use crate::entities::{
    NewPlace, NewPlacePhoto, NewUser, Place, PlacePhoto, PlacePhotoLike, User,
};

const USER_COLUMNS: &str = "id, public_id, username, email, first_name, last_name, \
     date_of_birth, pfp, password_hash, is_staff, is_active";

const PLACE_COLUMNS: &str = "id, public_id, name, description, main_image, added_by, \
     ST_X(location::geometry) AS longitude, ST_Y(location::geometry) AS latitude, \
     is_active, experience";

const PHOTO_COLUMNS: &str = "id, public_id, place_id, owner_id, image, title, description";

// Both search queries share this filter; `$3`/`$4` are the origin lon/lat.
const PLACE_FILTER: &str = "($1::text IS NULL OR name ILIKE '%' || $1 || '%') \
     AND ($2::float8 IS NULL OR ST_Distance(location, \
         ST_SetSRID(ST_MakePoint($3::float8, $4::float8), 4326)::geography) < $2)";

pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn provider_error(error: sqlx::Error) -> DataError {
    if let sqlx::Error::Database(db) = &error {
        if db.is_unique_violation() {
            return DataError::Conflict(db.constraint().unwrap_or("unique").to_string());
        }
    }
    DataError::Provider(error.to_string())
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl UserRepository for PostgresStore {
    async fn create(&self, user: NewUser) -> DataResult<User> {
        let sql = format!(
            "INSERT INTO users (public_id, username, email, first_name, last_name, \
             date_of_birth, pfp, password_hash, is_staff) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.public_id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(&user.pfp)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get(&self, id: i64) -> DataResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE public_id = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get_by_username(&self, username: &str) -> DataResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn username_taken(&self, username: &str, except: Option<i64>) -> DataResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE username = $1 \
             AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(username)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .map_err(provider_error)
    }

    async fn email_taken(&self, email: &str, except: Option<i64>) -> DataResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM users WHERE lower(email) = lower($1) \
             AND ($2::bigint IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .map_err(provider_error)
    }

    async fn update(&self, user: &User) -> DataResult<User> {
        let sql = format!(
            "UPDATE users SET username = $2, email = $3, first_name = $4, last_name = $5, \
             date_of_birth = $6, pfp = $7, password_hash = $8, is_staff = $9, is_active = $10 \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.date_of_birth)
            .bind(&user.pfp)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .bind(user.is_active)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)?
            .ok_or(DataError::NotFound)
    }

    async fn total_experience(&self, id: i64) -> DataResult<i64> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(p.experience), 0)::BIGINT FROM places p \
             WHERE p.id IN (SELECT DISTINCT place_id FROM place_photos WHERE owner_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .map_err(provider_error)
    }
}

#[async_trait]
impl PlaceRepository for PostgresStore {
    async fn create(&self, place: NewPlace) -> DataResult<Place> {
        let sql = format!(
            "INSERT INTO places (public_id, name, description, main_image, added_by, location, \
             is_active, experience) \
             VALUES ($1, $2, $3, $4, $5, ST_SetSRID(ST_MakePoint($6, $7), 4326)::geography, $8, $9) \
             RETURNING {PLACE_COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&sql)
            .bind(place.public_id)
            .bind(&place.name)
            .bind(&place.description)
            .bind(&place.main_image)
            .bind(place.added_by)
            .bind(place.location.longitude)
            .bind(place.location.latitude)
            .bind(place.is_active)
            .bind(place.experience)
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get(&self, id: i64) -> DataResult<Option<Place>> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE id = $1");
        sqlx::query_as::<_, Place>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<Place>> {
        let sql = format!("SELECT {PLACE_COLUMNS} FROM places WHERE public_id = $1");
        sqlx::query_as::<_, Place>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn search(&self, query: &PlaceQuery, page: PageRequest) -> DataResult<Page<Place>> {
        let search = query.search.as_deref().map(escape_like);
        let radius = query.within.map(|(_, radius)| radius);
        let longitude = query.within.map(|(origin, _)| origin.longitude);
        let latitude = query.within.map(|(origin, _)| origin.latitude);

        let count_sql = format!("SELECT COUNT(*) FROM places WHERE {PLACE_FILTER}");
        let total: i64 = sqlx::query_scalar(&count_sql)
            .bind(&search)
            .bind(radius)
            .bind(longitude)
            .bind(latitude)
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)?;

        let sql = format!(
            "SELECT {PLACE_COLUMNS} FROM places WHERE {PLACE_FILTER} \
             ORDER BY id LIMIT $5 OFFSET $6"
        );
        let items = sqlx::query_as::<_, Place>(&sql)
            .bind(&search)
            .bind(radius)
            .bind(longitude)
            .bind(latitude)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(provider_error)?;

        Ok(Page::new(items, total as u64, page.page, page.page_size))
    }

    async fn update(&self, place: &Place) -> DataResult<Place> {
        let sql = format!(
            "UPDATE places SET name = $2, description = $3, main_image = $4, \
             location = ST_SetSRID(ST_MakePoint($5, $6), 4326)::geography, \
             is_active = $7, experience = $8 \
             WHERE id = $1 RETURNING {PLACE_COLUMNS}"
        );
        sqlx::query_as::<_, Place>(&sql)
            .bind(place.id)
            .bind(&place.name)
            .bind(&place.description)
            .bind(&place.main_image)
            .bind(place.location.longitude)
            .bind(place.location.latitude)
            .bind(place.is_active)
            .bind(place.experience)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)?
            .ok_or(DataError::NotFound)
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        let result = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(provider_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlacePhotoRepository for PostgresStore {
    async fn create(&self, photo: NewPlacePhoto) -> DataResult<PlacePhoto> {
        let sql = format!(
            "INSERT INTO place_photos (public_id, place_id, owner_id, image, title, description) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {PHOTO_COLUMNS}"
        );
        sqlx::query_as::<_, PlacePhoto>(&sql)
            .bind(photo.public_id)
            .bind(photo.place_id)
            .bind(photo.owner_id)
            .bind(&photo.image)
            .bind(&photo.title)
            .bind(&photo.description)
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn get_by_public_id(&self, public_id: Uuid) -> DataResult<Option<PlacePhoto>> {
        let sql = format!("SELECT {PHOTO_COLUMNS} FROM place_photos WHERE public_id = $1");
        sqlx::query_as::<_, PlacePhoto>(&sql)
            .bind(public_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn list_for_place(
        &self,
        place_id: i64,
        search: Option<&str>,
        page: PageRequest,
    ) -> DataResult<Page<PlacePhoto>> {
        let search = search.map(escape_like);
        let filter = "place_id = $1 AND ($2::text IS NULL OR title ILIKE '%' || $2 || '%')";

        let total: i64 =
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM place_photos WHERE {filter}"))
                .bind(place_id)
                .bind(&search)
                .fetch_one(&self.pool)
                .await
                .map_err(provider_error)?;

        let sql = format!(
            "SELECT {PHOTO_COLUMNS} FROM place_photos WHERE {filter} \
             ORDER BY id LIMIT $3 OFFSET $4"
        );
        let items = sqlx::query_as::<_, PlacePhoto>(&sql)
            .bind(place_id)
            .bind(&search)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(provider_error)?;

        Ok(Page::new(items, total as u64, page.page, page.page_size))
    }

    async fn update(&self, photo: &PlacePhoto) -> DataResult<PlacePhoto> {
        let sql = format!(
            "UPDATE place_photos SET image = $2, title = $3, description = $4 \
             WHERE id = $1 RETURNING {PHOTO_COLUMNS}"
        );
        sqlx::query_as::<_, PlacePhoto>(&sql)
            .bind(photo.id)
            .bind(&photo.image)
            .bind(&photo.title)
            .bind(&photo.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(provider_error)?
            .ok_or(DataError::NotFound)
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        let result = sqlx::query("DELETE FROM place_photos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(provider_error)?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlacePhotoLikeRepository for PostgresStore {
    async fn create(&self, owner_id: i64, place_photo_id: i64) -> DataResult<PlacePhotoLike> {
        sqlx::query_as::<_, PlacePhotoLike>(
            "INSERT INTO place_photo_likes (owner_id, place_photo_id) VALUES ($1, $2) \
             RETURNING id, owner_id, place_photo_id",
        )
        .bind(owner_id)
        .bind(place_photo_id)
        .fetch_one(&self.pool)
        .await
        .map_err(provider_error)
    }

    async fn exists(&self, owner_id: i64, place_photo_id: i64) -> DataResult<bool> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM place_photo_likes \
             WHERE owner_id = $1 AND place_photo_id = $2)",
        )
        .bind(owner_id)
        .bind(place_photo_id)
        .fetch_one(&self.pool)
        .await
        .map_err(provider_error)
    }

    async fn find(
        &self,
        owner_id: i64,
        place_photo_id: i64,
    ) -> DataResult<Option<PlacePhotoLike>> {
        sqlx::query_as::<_, PlacePhotoLike>(
            "SELECT id, owner_id, place_photo_id FROM place_photo_likes \
             WHERE owner_id = $1 AND place_photo_id = $2 ORDER BY id LIMIT 1",
        )
        .bind(owner_id)
        .bind(place_photo_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(provider_error)
    }

    async fn count_for_photo(&self, place_photo_id: i64) -> DataResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM place_photo_likes WHERE place_photo_id = $1")
            .bind(place_photo_id)
            .fetch_one(&self.pool)
            .await
            .map_err(provider_error)
    }

    async fn delete(&self, id: i64) -> DataResult<bool> {
        let result = sqlx::query("DELETE FROM place_photo_likes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(provider_error)?;
        Ok(result.rows_affected() > 0)
    }
}
