use actix_web::{App, HttpServer, middleware::Logger};
use backend::config::AppConfig;
use backend::{AppServices, build_cors, configure_app};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env();
    let services = AppServices::from_config(config.clone()).map_err(|e| {
        log::error!("Invalid processor configuration: {}", e);
        std::io::Error::other(e.to_string())
    })?;

    if let Err(e) = services.storage.ensure_root().await {
        log::error!("{}", e);
        return Err(std::io::Error::other(e.to_string()));
    }

    log::info!("Upload directory: {}", services.storage.root().display());
    log::info!("Environment: {}", config.environment);
    log::info!("Python Server: {}", services.relay.base_url());
    log::info!("CORS Origin: {}", config.cors_origin);
    log::info!("Max upload size: {}MB", config.max_file_size_mb());

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&services.config.cors_origin))
            .wrap(Logger::default())
            .configure(|cfg| configure_app(cfg, &services))
    })
    .bind(&bind_address)?
    .run()
    .await
}
