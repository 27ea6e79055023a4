pub mod session;

pub use strum::IntoEnumIterator;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Simulated contrast phase requested for a scan.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
    AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProcessingPhase {
    #[default]
    Arterial,
    Venous,
}

impl ProcessingPhase {
    pub fn label(&self) -> &'static str {
        match self {
            ProcessingPhase::Arterial => "Arterial",
            ProcessingPhase::Venous => "Venous",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProcessingPhase::Arterial => "Increased contrast simulation",
            ProcessingPhase::Venous => "Gaussian smoothing simulation",
        }
    }
}

/// Reference to image bytes: either a path/URL the server can serve, or an
/// inline `data:` payload. Travels over the wire as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageRef {
    Url(String),
    Inline { mime: String, data: String },
}

impl ImageRef {
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((mime, data)) = rest.split_once(";base64,") {
                return ImageRef::Inline {
                    mime: mime.to_string(),
                    data: data.to_string(),
                };
            }
        }
        ImageRef::Url(raw.to_string())
    }

    /// Value usable as an `<img src>`.
    pub fn to_src(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::Inline { mime, data } => format!("data:{};base64,{}", mime, data),
        }
    }

    pub fn is_inline(&self) -> bool {
        matches!(self, ImageRef::Inline { .. })
    }
}

impl From<String> for ImageRef {
    fn from(raw: String) -> Self {
        ImageRef::parse(&raw)
    }
}

impl From<ImageRef> for String {
    fn from(image: ImageRef) -> Self {
        image.to_src()
    }
}

/// Body returned by `POST /api/process-image`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingResult {
    pub original_image: ImageRef,
    pub processed_image: ImageRef,
    pub phase: ProcessingPhase,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_size: Option<u64>,
}

fn default_status() -> String {
    "success".to_string()
}

/// Reply of the external processor's `/process` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorResponse {
    pub processed_image_url: String,
    pub phase: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing_time_seconds: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    #[default]
    Disconnected,
}

/// Latest reachability reading of the external processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    pub status: ConnectionState,
    pub python_server_url: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ServerStatus {
    pub fn is_reachable(&self) -> bool {
        self.status == ConnectionState::Connected
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub environment: String,
}

/// Shape shared by every failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub timestamp: String,
}
