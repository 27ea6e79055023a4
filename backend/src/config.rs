use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings for the relay service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP port (default: 5000)
    pub port: u16,

    /// Base URL of the external image processor (default: http://localhost:8000)
    pub python_server_url: String,

    /// Origin allowed by CORS (default: http://localhost:3000)
    pub cors_origin: String,

    /// Maximum upload size in bytes (default: 10 MiB)
    pub max_file_size: usize,

    /// Directory holding uploads and fallback artifacts (default: uploads)
    pub upload_dir: PathBuf,

    /// Deployment environment name (default: development)
    pub environment: String,

    /// Timeout for a processing call to the external processor (default: 30 s)
    pub process_timeout: Duration,

    /// Timeout for the processor health probe (default: 5 s)
    pub health_timeout: Duration,

    /// Built frontend assets, served under /static when present
    pub frontend_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            python_server_url: "http://localhost:8000".to_string(),
            cors_origin: "http://localhost:3000".to_string(),
            max_file_size: 10 * 1024 * 1024,
            upload_dir: PathBuf::from("uploads"),
            environment: "development".to_string(),
            process_timeout: Duration::from_secs(30),
            health_timeout: Duration::from_secs(5),
            frontend_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../frontend/dist")),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            port: lookup("PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default.port),

            python_server_url: lookup("PYTHON_SERVER_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.python_server_url),

            cors_origin: lookup("CORS_ORIGIN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.cors_origin),

            max_file_size: parsed("MAX_FILE_SIZE")
                .map(|v| v as usize)
                .unwrap_or(default.max_file_size),

            upload_dir: lookup("UPLOAD_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            environment: lookup("APP_ENV")
                .or_else(|| lookup("NODE_ENV"))
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.environment),

            process_timeout: parsed("PROCESS_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.process_timeout),

            health_timeout: parsed("HEALTH_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(default.health_timeout),

            frontend_dir: lookup("FRONTEND_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.frontend_dir),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }

    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size.div_ceil(1024 * 1024)
    }
}
