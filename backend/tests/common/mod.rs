#![allow(dead_code)]

use actix_web::{App, HttpResponse, HttpServer, web};
use backend::AppServices;
use backend::config::AppConfig;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

pub const BOUNDARY: &str = "----scanboundary7MA4YWxkTrZu0gW";

pub enum Part<'a> {
    Text { name: &'a str, value: &'a str },
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    (format!("multipart/form-data; boundary={}", BOUNDARY), body)
}

/// A PNG signature followed by filler, `size` bytes in total.
pub fn fake_png(size: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..size.saturating_sub(bytes.len())).map(|i| (i % 251) as u8));
    bytes
}

/// Port that was free a moment ago and has nothing listening on it.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Stand-in for the external processor: answers `/process` like the real
/// one would and reports healthy.
pub fn spawn_processor() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/process",
                web::post().to(|body: web::Json<Value>| async move {
                    let path = body["image_path"].as_str().unwrap_or_default().to_string();
                    let phase = body["phase"].as_str().unwrap_or_default().to_string();
                    let file_name = Path::new(&path)
                        .file_name()
                        .map(|f| f.to_string_lossy().to_string())
                        .unwrap_or_default();
                    HttpResponse::Ok().json(json!({
                        "processed_image_url": format!("/uploads/{}_{}", phase, file_name),
                        "phase": phase,
                        "status": "success",
                        "processing_time_seconds": 0.42
                    }))
                }),
            )
            .route(
                "/health",
                web::get().to(|| async {
                    HttpResponse::Ok().json(json!({"status": "Medical Image Processing Server is running"}))
                }),
            )
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Processor that accepts connections but answers with a server error.
pub fn spawn_broken_processor() -> String {
    let server = HttpServer::new(|| {
        App::new()
            .route(
                "/process",
                web::post().to(|| async {
                    HttpResponse::InternalServerError()
                        .json(json!({"error": "Internal server error: boom", "status": "error"}))
                }),
            )
            .route("/health", web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Processor that accepts connections and then never answers in time.
pub fn spawn_hung_processor() -> String {
    let server = HttpServer::new(|| {
        App::new().default_service(web::to(|| async {
            actix_web::rt::time::sleep(Duration::from_secs(30)).await;
            HttpResponse::Ok().finish()
        }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

/// Processor whose `/process` answers 200 with a fixed JSON body.
pub fn spawn_processor_replying(body: &'static str) -> String {
    let server = HttpServer::new(move || {
        App::new()
            .route(
                "/process",
                web::post().to(move || async move {
                    HttpResponse::Ok().content_type("application/json").body(body)
                }),
            )
            .route("/health", web::get().to(|| async { HttpResponse::Ok().finish() }))
    })
    .workers(1)
    .disable_signals()
    .bind(("127.0.0.1", 0))
    .unwrap();

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    format!("http://{}", addr)
}

pub async fn services(processor_url: &str, upload_dir: &Path) -> AppServices {
    let config = AppConfig {
        python_server_url: processor_url.to_string(),
        upload_dir: upload_dir.to_path_buf(),
        process_timeout: Duration::from_secs(5),
        health_timeout: Duration::from_secs(2),
        ..AppConfig::default()
    };
    let services = AppServices::from_config(config).unwrap();
    services.storage.ensure_root().await.unwrap();
    services
}

pub fn stored_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
