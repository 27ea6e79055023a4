use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use futures::FutureExt;
use log::info;
use serde_json::json;
use shared::{HealthResponse, ImageRef, ProcessingPhase, ProcessingResult};
use std::panic::AssertUnwindSafe;
use std::path::Path;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::pyprocess::{RelayClient, RelayOutcome, StatusProber};
use crate::storage::{LocalStorage, StoredImage, local_storage::PUBLIC_PREFIX};
use crate::upload::{UploadForm, UploadRules, ValidationError};

pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_dir: &Path, frontend_dir: Option<&Path>) {
    cfg.service(resource("/").route(web::get().to(root)))
        .service(resource("/api/health").route(web::get().to(health)))
        .service(resource("/api/process-image").route(web::post().to(process_image)))
        .service(resource("/api/python-status").route(web::get().to(python_status)))
        .service(Files::new(PUBLIC_PREFIX, upload_dir).default_handler(web::to(not_found)));

    if let Some(dir) = frontend_dir.filter(|d| d.is_dir()) {
        cfg.service(
            Files::new("/static", dir)
                .index_file("index.html")
                .default_handler(web::to(not_found)),
        );
    }

    cfg.default_service(web::to(not_found));
}

/// A known path hit with the wrong method is answered like an unknown route.
fn resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(not_found))
}

async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "MedTech Image Processing API",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": crate::timestamp(),
    }))
}

async fn health(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "Server is running".to_string(),
        timestamp: crate::timestamp(),
        environment: config.environment.clone(),
    })
}

async fn python_status(prober: web::Data<StatusProber>) -> HttpResponse {
    HttpResponse::Ok().json(prober.probe().await)
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "error": "Route not found",
        "path": req.uri().to_string(),
        "timestamp": crate::timestamp(),
    }))
}

async fn process_image(
    req: HttpRequest,
    payload: Multipart,
    config: web::Data<AppConfig>,
    storage: web::Data<LocalStorage>,
    relay: web::Data<RelayClient>,
) -> HttpResponse {
    let pipeline = run_pipeline(&req, payload, &config, &storage, &relay);

    // last line of defence: a panic anywhere below becomes a 500 envelope
    let result = match AssertUnwindSafe(pipeline).catch_unwind().await {
        Ok(result) => result,
        Err(_) => Err(ApiError::Unknown("request handler panicked".to_string())),
    };

    match result {
        Ok(body) => HttpResponse::Ok().json(body),
        Err(e) => e.to_response(config.is_production()),
    }
}

async fn run_pipeline(
    req: &HttpRequest,
    payload: Multipart,
    config: &AppConfig,
    storage: &LocalStorage,
    relay: &RelayClient,
) -> Result<ProcessingResult, ApiError> {
    let form = if is_multipart(req) {
        UploadForm::read(payload, config.max_file_size).await?
    } else {
        UploadForm::default()
    };

    let phase = UploadRules::new(config.max_file_size).validate(&form.candidate())?;
    let image = form.image.ok_or(ValidationError::MissingFile)?;

    let stored = storage.store_upload(&image.bytes, &image.file_name).await?;
    info!(
        "Processing image: {} ({} bytes) with phase: {}",
        stored.file_name, stored.size, phase
    );

    let outcome = relay.relay(&stored, phase).await?;
    Ok(build_result(&stored, phase, outcome))
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

fn build_result(stored: &StoredImage, phase: ProcessingPhase, outcome: RelayOutcome) -> ProcessingResult {
    let fallback = outcome.is_fallback();
    let response = outcome.into_response();
    let message = if fallback {
        format!("Image processed with {} phase using fallback processing", phase)
    } else {
        format!("Image successfully processed with {} phase", phase)
    };

    ProcessingResult {
        original_image: ImageRef::Url(stored.public_url()),
        processed_image: ImageRef::parse(&response.processed_image_url),
        phase,
        status: response.status,
        message: Some(message),
        fallback,
        processing_time_seconds: response.processing_time_seconds,
        original_size: response.original_size,
        processed_size: response.processed_size,
    }
}
