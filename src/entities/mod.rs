pub mod geo_point;
pub mod place;
pub mod place_photo;
pub mod place_photo_like;
pub mod user;

pub use geo_point::GeoPoint;
pub use place::{NewPlace, Place};
pub use place_photo::{NewPlacePhoto, PlacePhoto};
pub use place_photo_like::PlacePhotoLike;
pub use user::{NewUser, User};
