#![allow(dead_code)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use std::io::Cursor;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tower::ServiceExt;
use uuid::Uuid;

use digital_lurker::entities::user::DEFAULT_PROFILE_PICTURE;
use digital_lurker::entities::{
    GeoPoint, NewPlace, NewPlacePhoto, NewUser, Place, PlacePhoto, PlacePhotoLike, User,
};
use digital_lurker::repositories::{
    MemoryStore, PlacePhotoLikeRepository, PlacePhotoRepository, PlaceRepository, UserRepository,
};
use digital_lurker::services::TokenService;
use digital_lurker::{AppState, Configuration, build_router};

pub const BOUNDARY: &str = "lurker-test-boundary";

pub fn unique_temp_dir(label: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "digital_lurker_{}_{}_{}",
        label,
        std::process::id(),
        suffix
    ))
}

pub fn test_config(media_root: &PathBuf) -> Configuration {
    let mut config = Configuration::default();
    config.set("media.root", media_root.to_string_lossy().to_string());
    config.set("media.url", "/media/");
    config.set("jwt.secret", "test-secret");
    config
}

pub struct TestApp {
    pub state: AppState,
    pub store: MemoryStore,
    pub router: Router,
    pub media_root: PathBuf,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(|_| {})
    }

    pub fn with(configure: impl FnOnce(&mut Configuration)) -> Self {
        let media_root = unique_temp_dir("media");
        let mut config = test_config(&media_root);
        configure(&mut config);
        let (state, store) = AppState::memory(config);
        let router = build_router(state.clone());
        Self {
            state,
            store,
            router,
            media_root,
        }
    }

    pub async fn create_user(&self, username: &str, is_staff: bool) -> User {
        UserRepository::create(
            &self.store,
            NewUser {
                public_id: Uuid::new_v4(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                first_name: String::new(),
                last_name: String::new(),
                date_of_birth: None,
                pfp: DEFAULT_PROFILE_PICTURE.to_string(),
                password_hash: "not-a-real-hash".to_string(),
                is_staff,
            },
        )
        .await
        .expect("failed to create user")
    }

    pub fn token_for(&self, user: &User) -> String {
        TokenService::from_config(&self.state.config)
            .create_access_token(user.public_id)
            .expect("failed to create access token")
    }

    pub async fn create_place(
        &self,
        added_by: &User,
        name: &str,
        location: (f64, f64),
        experience: i32,
        is_active: bool,
    ) -> Place {
        PlaceRepository::create(
            &self.store,
            NewPlace {
                public_id: Uuid::new_v4(),
                name: name.to_string(),
                description: None,
                main_image: "defaults/places/default.png".to_string(),
                added_by: added_by.id,
                location: GeoPoint::new(location.0, location.1).expect("invalid test point"),
                is_active,
                experience,
            },
        )
        .await
        .expect("failed to create place")
    }

    pub async fn create_photo(&self, owner: &User, place: &Place, title: &str) -> PlacePhoto {
        PlacePhotoRepository::create(
            &self.store,
            NewPlacePhoto {
                public_id: Uuid::new_v4(),
                place_id: place.id,
                owner_id: owner.id,
                image: "place_photos/test.png".to_string(),
                title: title.to_string(),
                description: String::new(),
            },
        )
        .await
        .expect("failed to create photo")
    }

    pub async fn create_like(&self, owner: &User, photo: &PlacePhoto) -> PlacePhotoLike {
        PlacePhotoLikeRepository::create(&self.store, owner.id, photo.id)
            .await
            .expect("failed to create like")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router failed");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not json")
        };
        (status, body)
    }
}

pub struct RequestSpec {
    builder: axum::http::request::Builder,
}

pub fn request(method: &str, uri: &str) -> RequestSpec {
    RequestSpec {
        builder: Request::builder().method(method).uri(uri),
    }
}

impl RequestSpec {
    pub fn token(mut self, token: &str) -> Self {
        self.builder = self
            .builder
            .header(header::AUTHORIZATION, format!("Bearer {token}"));
        self
    }

    pub fn point(mut self, point: &str) -> Self {
        self.builder = self.builder.header("Point", point);
        self
    }

    pub fn json(self, body: Value) -> Request<Body> {
        self.builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request")
    }

    pub fn multipart(self, body: Vec<u8>) -> Request<Body> {
        self.builder
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("failed to build request")
    }

    pub fn empty(self) -> Request<Body> {
        self.builder
            .body(Body::empty())
            .expect("failed to build request")
    }
}

/// Builds a multipart body from text fields and `(field, file name, bytes)` files.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40]));
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("failed to encode png");
    bytes
}
