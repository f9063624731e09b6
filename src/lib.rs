pub mod app;
pub mod config;
pub mod controllers;
pub mod dtos;
pub mod entities;
pub mod http_error;
pub mod middleware;
pub mod repositories;
pub mod services;

pub use app::{AppState, build_router};
pub use config::Configuration;
pub use http_error::HttpError;
