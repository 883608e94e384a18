pub mod admin;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod models;
pub mod query;
pub mod routes;
pub mod schema;

pub use config::Config;
pub use db::{create_pool, DbPool};
pub use error::{CatalogError, CatalogResult};
