pub mod config;
pub mod error;
pub mod pyprocess;
pub mod routes;
pub mod storage;
pub mod upload;

use actix_cors::Cors;
use actix_web::{http::header, web};
use chrono::{SecondsFormat, Utc};

use config::AppConfig;
use pyprocess::{FallbackProcessor, RelayClient, RelayError, StatusProber};
use storage::LocalStorage;

/// Explicitly constructed service graph shared by every worker.
#[derive(Clone)]
pub struct AppServices {
    pub config: AppConfig,
    pub storage: LocalStorage,
    pub relay: RelayClient,
    pub prober: StatusProber,
}

impl AppServices {
    pub fn from_config(config: AppConfig) -> Result<Self, RelayError> {
        let storage = LocalStorage::new(config.upload_dir.clone());
        let fallback = FallbackProcessor::new(storage.clone());
        let relay = RelayClient::new(
            &config.python_server_url,
            config.process_timeout,
            config.health_timeout,
            storage.clone(),
            fallback,
        )?;
        let prober = StatusProber::new(relay.clone());

        Ok(Self {
            config,
            storage,
            relay,
            prober,
        })
    }
}

pub fn configure_app(cfg: &mut web::ServiceConfig, services: &AppServices) {
    cfg.app_data(web::Data::new(services.config.clone()))
        .app_data(web::Data::new(services.storage.clone()))
        .app_data(web::Data::new(services.relay.clone()))
        .app_data(web::Data::new(services.prober.clone()));

    routes::configure_routes(
        cfg,
        services.storage.root(),
        Some(services.config.frontend_dir.as_path()),
    );
}

pub fn build_cors(origin: &str) -> Cors {
    let cors = if origin.trim() == "*" {
        Cors::default().allow_any_origin()
    } else {
        Cors::default().allowed_origin(origin).supports_credentials()
    };

    cors.allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
        ])
        .max_age(3600)
}

/// RFC 3339 UTC with millisecond precision, e.g. `2024-05-01T12:00:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
