use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

use crate::error::{CatalogError, CatalogResult};

pub const DEFAULT_DATABASE_URL: &str = "histamine.sqlite3";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    pub pool_size: u32,
}

impl Config {
    /// Reads the environment; call `dotenv` first to pick up a `.env` file.
    pub fn load() -> CatalogResult<Self> {
        Ok(Self {
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL)?,
            bind_address: try_load("BIND_ADDRESS", "127.0.0.1")?,
            port: try_load("PORT", "8080")?,
            pool_size: try_load("DB_POOL_SIZE", "8")?,
        })
    }
}

fn try_load<T: FromStr>(key: &str, default: &str) -> CatalogResult<T>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    raw.trim().parse().map_err(|e| {
        warn!("Invalid {key} value: {e}");
        CatalogError::Config(format!("invalid {key} value '{raw}': {e}"))
    })
}
