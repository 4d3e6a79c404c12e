pub mod auth;
pub mod cache;
pub mod config;
pub mod dto;
pub mod errors;
pub mod fixtures;
pub mod media;
pub mod models;
pub mod pagination;
pub mod routes;
pub mod states;
pub mod store;
pub mod templates;
pub mod urls;

pub use states::AppState;
