pub mod app;
pub mod browse;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod omdb;

pub use catalog::MovieCatalog;
pub use error::MovieError;
pub use omdb::{MovieApi, OmdbClient};
