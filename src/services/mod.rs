pub mod auth_service;
pub mod geo_distance_service;
pub mod image_service;
pub mod media_storage;
pub mod password_service;
pub mod photo_like_service;
pub mod place_photo_service;
pub mod place_service;
pub mod token_service;
pub mod upload_service;
pub mod user_service;
pub mod validation;

pub use auth_service::AuthService;
pub use geo_distance_service::GeoDistanceService;
pub use image_service::ImageService;
pub use media_storage::MediaStorage;
pub use password_service::PasswordService;
pub use photo_like_service::PhotoLikeService;
pub use place_photo_service::PlacePhotoService;
pub use place_service::PlaceService;
pub use token_service::TokenService;
pub use upload_service::UploadService;
pub use user_service::UserService;
