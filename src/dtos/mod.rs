pub mod auth_dtos;
pub mod form;
pub mod like_dtos;
pub mod paginated_dto;
pub mod place_dtos;
pub mod place_photo_dtos;
pub mod user_dtos;
