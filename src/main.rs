use std::io;

use actix_web::{middleware, web, App, HttpServer};

use histamine_catalog::{create_pool, routes, Config};

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::load().map_err(io::Error::other)?;

    // set up database connection pool, migrations run before the first request
    let pool = create_pool(&config.database_url, config.pool_size).map_err(io::Error::other)?;

    log::info!(
        "starting HTTP server at http://{}:{}",
        config.bind_address,
        config.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .wrap(middleware::NormalizePath::trim())
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
