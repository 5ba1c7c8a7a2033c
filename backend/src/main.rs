use actix_web::{App, HttpServer, middleware::Logger, web};
use dotenv::dotenv;
use store::Store;

mod config;
mod routes;

use config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let store = Store::open(&config.database_path)
        .await
        .map_err(|e| std::io::Error::other(e.to_string()))?;
    let store_data = web::Data::new(store);

    log::info!(
        "Serving quotes from {} on {}:{}",
        config.database_path.display(),
        config.host,
        config.port
    );

    let server_data = store_data.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(server_data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    log::info!("Shutting down, closing database");
    if let Err(e) = store_data.close().await {
        log::error!("Failed to close database: {}", e);
    }
    Ok(())
}
