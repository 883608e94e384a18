use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::sql_types::Text;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use crate::error::{CatalogError, CatalogResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

diesel::define_sql_function! {
    /// Unicode-aware lowercase; SQLite's own `lower()` only folds ASCII.
    fn casefold(x: Text) -> Text;
}

#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        // cascade and set-null rules are only honoured with foreign keys on
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)?;
        casefold_utils::register_impl(conn, |x: String| x.to_lowercase())
            .map_err(r2d2::Error::QueryError)
    }
}

/// Builds the pool and brings the schema up to date.
///
/// An in-memory database exists once per connection, so `:memory:` urls
/// should be paired with `max_size = 1`.
pub fn create_pool(database_url: &str, max_size: u32) -> CatalogResult<DbPool> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(max_size)
        .connection_customizer(Box::new(ConnectionOptions))
        .build(manager)?;

    let mut conn = pool.get()?;
    run_migrations(&mut conn)?;
    log::info!("database ready at {}", database_url);

    Ok(pool)
}

pub fn run_migrations(conn: &mut SqliteConnection) -> CatalogResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| CatalogError::Migration(e.to_string()))?;
    for version in applied {
        log::info!("applied migration {}", version);
    }
    Ok(())
}
