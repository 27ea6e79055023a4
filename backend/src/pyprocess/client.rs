use log::{debug, info, warn};
use shared::{ProcessingPhase, ProcessorResponse};
use std::time::Duration;
use url::Url;

use super::fallback::FallbackProcessor;
use super::model::{ProcessRequest, RelayError, RelayOutcome};
use crate::storage::{LocalStorage, StorageError, StoredImage};

/// Forwards stored uploads to the external image processor.
///
/// A failed remote call is not retried: the request goes straight to the
/// fallback processor and the caller gets a `FallbackApplied` outcome.
#[derive(Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    process_timeout: Duration,
    health_timeout: Duration,
    storage: LocalStorage,
    fallback: FallbackProcessor,
}

impl RelayClient {
    pub fn new(
        base_url: &str,
        process_timeout: Duration,
        health_timeout: Duration,
        storage: LocalStorage,
        fallback: FallbackProcessor,
    ) -> Result<Self, RelayError> {
        let parsed = Url::parse(base_url).map_err(|source| RelayError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        let http = reqwest::Client::builder()
            .build()
            .map_err(RelayError::Client)?;

        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            process_timeout,
            health_timeout,
            storage,
            fallback,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Only a storage failure while writing the fallback artifact is an error.
    pub async fn relay(
        &self,
        stored: &StoredImage,
        phase: ProcessingPhase,
    ) -> Result<RelayOutcome, StorageError> {
        match self.request_processing(stored, phase).await {
            Ok(response) => {
                info!(
                    "Processor handled {} ({}) -> {}",
                    stored.file_name, phase, response.processed_image_url
                );
                Ok(RelayOutcome::Relayed(response))
            }
            Err(e) => {
                warn!("Python server error, using fallback: {}", e);
                self.fallback
                    .process(stored, phase)
                    .await
                    .map(RelayOutcome::FallbackApplied)
            }
        }
    }

    async fn request_processing(
        &self,
        stored: &StoredImage,
        phase: ProcessingPhase,
    ) -> Result<ProcessorResponse, RelayError> {
        let absolute = self
            .storage
            .absolute_path(stored)
            .await
            .map_err(|e| RelayError::Resolve(e.to_string()))?;
        let image_path = absolute.to_string_lossy();
        debug!("Processing image: {}, phase: {}", image_path, phase);

        let response = self
            .http
            .post(self.endpoint("process"))
            .timeout(self.process_timeout)
            .json(&ProcessRequest {
                image_path: &image_path,
                phase,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status.as_u16()));
        }

        let body: ProcessorResponse = response
            .json()
            .await
            .map_err(|e| RelayError::Malformed(e.to_string()))?;

        if body.status.eq_ignore_ascii_case("error") {
            return Err(RelayError::Rejected(
                body.message.unwrap_or_else(|| "no message".to_string()),
            ));
        }
        if body.processed_image_url.trim().is_empty() {
            return Err(RelayError::Malformed(
                "processed_image_url is empty".to_string(),
            ));
        }

        Ok(body)
    }

    /// Best-effort reachability check. Any failure, including a timeout, is `false`.
    pub async fn health_check(&self) -> bool {
        match self
            .http
            .get(self.endpoint("health"))
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Health check against {} failed: {}", self.base_url, e);
                false
            }
        }
    }
}
