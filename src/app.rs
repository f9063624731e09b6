use axum::Router;
use axum::extract::DefaultBodyLimit;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::config::Configuration;
use crate::controllers::register_controllers;
use crate::middleware::log_requests;
use crate::repositories::{
    MemoryStore, PlacePhotoLikeRepository, PlacePhotoRepository, PlaceRepository, UserRepository,
};
use crate::services::{
    AuthService, ImageService, MediaStorage, PasswordService, PhotoLikeService, PlacePhotoService,
    PlaceService, TokenService, UploadService, UserService,
};

const DEFAULT_PAGE_SIZE: u32 = 10;
const DEFAULT_UPLOAD_LIMIT: usize = 10 * 1024 * 1024;

/// Everything a handler needs, shared across requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Configuration>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UserService>,
    pub places: Arc<PlaceService>,
    pub photos: Arc<PlacePhotoService>,
    pub likes: Arc<PhotoLikeService>,
    pub uploads: UploadService,
    pub media: MediaStorage,
    pub page_size: u32,
}

impl AppState {
    /// Wires the services over one store that implements every repository.
    pub fn new<S>(config: Configuration, store: Arc<S>) -> Self
    where
        S: UserRepository
            + PlaceRepository
            + PlacePhotoRepository
            + PlacePhotoLikeRepository
            + 'static,
    {
        let user_repo: Arc<dyn UserRepository> = store.clone();
        let place_repo: Arc<dyn PlaceRepository> = store.clone();
        let photo_repo: Arc<dyn PlacePhotoRepository> = store.clone();
        let like_repo: Arc<dyn PlacePhotoLikeRepository> = store;

        let media = MediaStorage::from_config(&config);
        let images = ImageService::new();
        let passwords = PasswordService::new();
        let tokens = TokenService::from_config(&config);

        let auth = Arc::new(AuthService::new(user_repo.clone(), passwords.clone(), tokens));
        let users = Arc::new(UserService::new(
            user_repo,
            passwords,
            media.clone(),
            images.clone(),
        ));
        let places = Arc::new(PlaceService::new(place_repo, media.clone(), images.clone()));
        let photos = Arc::new(PlacePhotoService::new(
            photo_repo,
            like_repo.clone(),
            places.clone(),
            users.clone(),
            media.clone(),
            images,
        ));
        let likes = Arc::new(PhotoLikeService::new(like_repo, photos.clone()));

        let page_size = config
            .parse_or("pagination.page_size", DEFAULT_PAGE_SIZE)
            .max(1);

        Self {
            config: Arc::new(config),
            auth,
            users,
            places,
            photos,
            likes,
            uploads: UploadService::new(),
            media,
            page_size,
        }
    }

    pub fn memory(config: Configuration) -> (Self, MemoryStore) {
        let store = MemoryStore::new();
        let state = Self::new(config, Arc::new(store.clone()));
        (state, store)
    }

    #[cfg(feature = "postgres")]
    pub fn postgres(config: Configuration, pool: sqlx::PgPool) -> Self {
        let store = crate::repositories::postgres::PostgresStore::new(pool);
        Self::new(config, Arc::new(store))
    }

    /// Seeds the admin account from `admin.*` when a password is configured.
    pub async fn seed_admin(&self) -> anyhow::Result<()> {
        let Some(password) = self.config.get("admin.password") else {
            log::debug!("admin.password not set, skipping admin seed");
            return Ok(());
        };
        let username = self.config.get_or("admin.username", "admin");
        let email = self.config.get_or("admin.email", "admin@example.com");
        self.users.ensure_admin(username, email, password).await
    }
}

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state
        .config
        .parse_or("upload.max_bytes", DEFAULT_UPLOAD_LIMIT);
    let media_root = state.media.root().to_path_buf();

    register_controllers(Router::new())
        .nest_service("/media", ServeDir::new(media_root))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(axum::middleware::from_fn(log_requests))
        .with_state(state)
}
