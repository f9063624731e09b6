pub mod auth_controller;
pub mod identity;
pub mod photo_like_controller;
pub mod place_controller;
pub mod place_photo_controller;
pub mod request_extensions;
pub mod user_controller;

use axum::Router;

use crate::app::AppState;
use auth_controller::AuthController;
use photo_like_controller::PhotoLikeController;
use place_controller::PlaceController;
use place_photo_controller::PlacePhotoController;
use user_controller::UserController;

pub use identity::Identity;

pub trait Controller {
    fn routes() -> Router<AppState>;
}

pub fn register_controllers(router: Router<AppState>) -> Router<AppState> {
    router
        .merge(AuthController::routes())
        .merge(UserController::routes())
        .merge(PlaceController::routes())
        .merge(PlacePhotoController::routes())
        .merge(PhotoLikeController::routes())
}
