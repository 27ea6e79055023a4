use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use shared::{ErrorEnvelope, HealthResponse, ProcessingPhase, ProcessingResult, ServerStatus};

const CONNECTION_ERROR: &str = "Unable to connect to server. Please check your connection.";

/// Uploads the scan to the backend relay and waits for the comparison pair.
/// Errors are already phrased for display.
pub async fn process_image(file: &GlooFile, phase: ProcessingPhase) -> Result<ProcessingResult, String> {
    let form_data = web_sys::FormData::new().map_err(|_| "Failed to build upload form".to_string())?;
    form_data
        .append_with_blob_and_filename("image", file.as_ref(), &file.name())
        .map_err(|_| "Failed to attach image".to_string())?;
    form_data
        .append_with_str("phase", phase.as_ref())
        .map_err(|_| "Failed to attach phase".to_string())?;

    let request = Request::post("/api/process-image")
        .body(form_data)
        .map_err(|e| format!("Failed to build request: {}", e))?;

    let response = request.send().await.map_err(|e| {
        log::error!("Upload request failed: {}", e);
        CONNECTION_ERROR.to_string()
    })?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<ProcessingResult>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn backend_health() -> Result<HealthResponse, String> {
    let response = Request::get("/api/health")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(format!("Backend health check returned {}", response.status()));
    }
    response.json().await.map_err(|e| e.to_string())
}

pub async fn python_status() -> Result<ServerStatus, String> {
    let response = Request::get("/api/python-status")
        .send()
        .await
        .map_err(|e| e.to_string())?;
    response.json().await.map_err(|e| e.to_string())
}

async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorEnvelope>().await {
        Ok(envelope) => match envelope.details {
            Some(details) => format!("{}: {}", envelope.error, details),
            None => envelope.error,
        },
        Err(_) => format!("Server error: {}", status),
    }
}
