use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use foodgram::config::Config;
use foodgram::db::init_pool;
use foodgram::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().map_err(|e| {
        error!("{e}");
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = init_pool(&config.database_url, config.pool_size).map_err(|e| {
        error!(database_url = %config.database_url, "failed to open database: {e}");
        std::io::Error::other(e)
    })?;

    let bind = (config.host.clone(), config.port);
    let workers = config.workers;
    info!(host = %bind.0, port = bind.1, workers, "starting server");

    let pool_data = web::Data::new(pool);
    let config_data = web::Data::new(config);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .configure(routes::configure)
    })
    .bind(bind)?
    .workers(workers)
    .run()
    .await
}
