mod common;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use backend::configure_app;
use common::{
    Part, fake_png, multipart_body, services, spawn_broken_processor, spawn_hung_processor, spawn_processor,
    spawn_processor_replying, stored_files, unreachable_url,
};
use std::time::{Duration, Instant};
use serde_json::Value;

fn upload_request(parts: &[Part<'_>]) -> actix_web::test::TestRequest {
    let (content_type, body) = multipart_body(parts);
    test::TestRequest::post()
        .uri("/api/process-image")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body)
}

#[actix_web::test]
async fn healthy_processor_result_is_relayed() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&spawn_processor(), dir.path()).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let scan = fake_png(2 * 1024 * 1024);
    let req = upload_request(&[
        Part::Text { name: "phase", value: "arterial" },
        Part::File {
            name: "image",
            file_name: "scan.png",
            content_type: "image/png",
            bytes: &scan,
        },
    ])
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["phase"], "arterial");
    assert_eq!(body["fallback"], false);
    assert_eq!(body["processingTimeSeconds"], 0.42);

    let original = body["originalImage"].as_str().unwrap();
    let processed = body["processedImage"].as_str().unwrap();
    assert!(original.starts_with("/uploads/image-") && original.ends_with(".png"));
    assert_eq!(processed, format!("/uploads/arterial_{}", original.trim_start_matches("/uploads/")));

    // relayed path writes no fallback artifact
    let files = stored_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(!files[0].starts_with("fallback_"));
}

#[actix_web::test]
async fn unreachable_processor_yields_fallback_copy() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&unreachable_url(), dir.path()).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let scan = fake_png(2 * 1024 * 1024);
    let req = upload_request(&[
        Part::File {
            name: "image",
            file_name: "scan.png",
            content_type: "image/png",
            bytes: &scan,
        },
        Part::Text { name: "phase", value: "arterial" },
    ])
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["phase"], "arterial");
    assert_eq!(body["fallback"], true);
    assert!(body["message"].as_str().unwrap().contains("fallback"));

    let processed = body["processedImage"].as_str().unwrap();
    let original = body["originalImage"].as_str().unwrap();
    let processed_name = processed.trim_start_matches("/uploads/");
    let original_name = original.trim_start_matches("/uploads/");
    assert_eq!(processed_name, format!("fallback_arterial_{}", original_name));

    let processed_bytes = std::fs::read(dir.path().join(processed_name)).unwrap();
    let original_bytes = std::fs::read(dir.path().join(original_name)).unwrap();
    assert_eq!(processed_bytes, original_bytes);
    assert_eq!(original_bytes, scan);

    // stored artifacts are reachable over HTTP
    let req = test::TestRequest::get().uri(processed).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await.len(), scan.len());
}

#[actix_web::test]
async fn processor_error_status_also_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&spawn_broken_processor(), dir.path()).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let scan = fake_png(1024);
    let req = upload_request(&[
        Part::Text { name: "phase", value: "venous" },
        Part::File {
            name: "image",
            file_name: "scan.gif",
            content_type: "image/gif",
            bytes: &scan,
        },
    ])
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fallback"], true);
    assert_eq!(body["phase"], "venous");
}

#[actix_web::test]
async fn invalid_phase_is_rejected_without_storage() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&unreachable_url(), dir.path()).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let scan = fake_png(2048);
    let overlong = "x".repeat(300);
    let phases = ["lateral", "  arterial\n", " arterial", "venous ", "Venous", overlong.as_str()];

    for phase in phases {
        let req = upload_request(&[
            Part::Text { name: "phase", value: phase },
            Part::File {
                name: "image",
                file_name: "scan.png",
                content_type: "image/png",
                bytes: &scan,
            },
        ])
        .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{phase:?}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid phase selection", "{phase:?}");
        assert_eq!(body["details"], "Phase must be either \"arterial\" or \"venous\"");
        assert!(body["timestamp"].as_str().is_some());
    }
    assert!(stored_files(dir.path()).is_empty());
}

#[actix_web::test]
async fn unusable_processor_replies_fall_back() {
    let replies = [
        "this is not json",
        r#"{"status":"error","message":"model crashed","processed_image_url":"/uploads/x.png","phase":"arterial"}"#,
        r#"{"status":"success","processed_image_url":"","phase":"arterial"}"#,
    ];

    for reply in replies {
        let dir = tempfile::tempdir().unwrap();
        let services = services(&spawn_processor_replying(reply), dir.path()).await;
        let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

        let scan = fake_png(256);
        let req = upload_request(&[
            Part::Text { name: "phase", value: "arterial" },
            Part::File { name: "image", file_name: "scan.png", content_type: "image/png", bytes: &scan },
        ])
        .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{reply}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["fallback"], true, "{reply}");
        assert!(
            body["processedImage"]
                .as_str()
                .unwrap()
                .starts_with("/uploads/fallback_arterial_image-")
        );
    }
}

#[actix_web::test]
async fn hung_processor_falls_back_within_the_process_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&spawn_hung_processor(), dir.path()).await;
    let limit = services.config.process_timeout + Duration::from_secs(3);
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let scan = fake_png(512);
    let req = upload_request(&[
        Part::Text { name: "phase", value: "venous" },
        Part::File { name: "image", file_name: "scan.jpg", content_type: "image/jpeg", bytes: &scan },
    ])
    .to_request();

    let started = Instant::now();
    let resp = test::call_service(&app, req).await;
    assert!(started.elapsed() < limit, "took {:?}", started.elapsed());

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fallback"], true);
    assert_eq!(body["phase"], "venous");
}

#[actix_web::test]
async fn missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&unreachable_url(), dir.path()).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let req = upload_request(&[Part::Text { name: "phase", value: "arterial" }]).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No image file provided");
    assert_eq!(body["details"], "Please select an image file to upload");

    // a request that is not multipart at all has no file either
    let req = test::TestRequest::post()
        .uri("/api/process-image")
        .set_json(serde_json::json!({"phase": "arterial"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "No image file provided");
}

#[actix_web::test]
async fn upload_rule_violations_are_bad_requests() {
    let dir = tempfile::tempdir().unwrap();
    let mut services = services(&unreachable_url(), dir.path()).await;
    services.config.max_file_size = 1024 * 1024;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    let big = fake_png(1024 * 1024 + 1);
    let small = fake_png(64);

    let cases: Vec<(Vec<Part<'_>>, &str)> = vec![
        (
            vec![
                Part::Text { name: "phase", value: "arterial" },
                Part::File { name: "image", file_name: "big.pdf", content_type: "application/pdf", bytes: &big },
            ],
            "File too large. Please upload an image under 1MB.",
        ),
        (
            // reading stops at the oversize part, so the trailing part is never seen
            vec![
                Part::Text { name: "phase", value: "arterial" },
                Part::File { name: "image", file_name: "big.png", content_type: "image/png", bytes: &big },
                Part::File { name: "image", file_name: "b.png", content_type: "image/png", bytes: &small },
            ],
            "File too large. Please upload an image under 1MB.",
        ),
        (
            vec![
                Part::Text { name: "phase", value: "arterial" },
                Part::File { name: "image", file_name: "scan.webp", content_type: "image/webp", bytes: &small },
            ],
            "Invalid file type. Only JPEG, PNG, and GIF images are allowed.",
        ),
        (
            vec![
                Part::Text { name: "phase", value: "arterial" },
                Part::File { name: "image", file_name: "a.png", content_type: "image/png", bytes: &small },
                Part::File { name: "image", file_name: "b.png", content_type: "image/png", bytes: &small },
            ],
            "Too many files. Please upload only one image.",
        ),
        (
            vec![
                Part::Text { name: "phase", value: "arterial" },
                Part::File { name: "scan", file_name: "a.png", content_type: "image/png", bytes: &small },
            ],
            "Unexpected field. Please use \"image\" as the field name.",
        ),
    ];

    for (parts, details) in cases {
        let resp = test::call_service(&app, upload_request(&parts).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{details}");
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "File upload failed");
        assert_eq!(body["details"], details);
    }

    assert!(stored_files(dir.path()).is_empty());
}

#[actix_web::test]
async fn storage_failure_is_an_internal_error() {
    let dir = tempfile::tempdir().unwrap();
    let services = services(&unreachable_url(), &dir.path().join("uploads")).await;
    let app = test::init_service(App::new().configure(|cfg| configure_app(cfg, &services))).await;

    // upload directory disappears after startup
    std::fs::remove_dir_all(dir.path().join("uploads")).unwrap();

    let scan = fake_png(128);
    let req = upload_request(&[
        Part::Text { name: "phase", value: "arterial" },
        Part::File { name: "image", file_name: "scan.png", content_type: "image/png", bytes: &scan },
    ])
    .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to process image");
    assert!(body["details"].as_str().is_some());
}
