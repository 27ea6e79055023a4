use shared::{ProcessingPhase, ProcessorResponse};

use crate::storage::{LocalStorage, StorageError, StoredImage};

pub const FALLBACK_MESSAGE: &str = "Fallback processing completed";

/// Local stand-in for the external processor: the "processed" image is a
/// verbatim copy of the upload.
#[derive(Clone)]
pub struct FallbackProcessor {
    storage: LocalStorage,
}

impl FallbackProcessor {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    /// Stored names are already unique, so prefixing keeps artifacts apart.
    pub fn artifact_name(stored: &StoredImage, phase: ProcessingPhase) -> String {
        format!("fallback_{}_{}", phase, stored.file_name)
    }

    pub async fn process(
        &self,
        stored: &StoredImage,
        phase: ProcessingPhase,
    ) -> Result<ProcessorResponse, StorageError> {
        let artifact = self
            .storage
            .copy_as(stored, &Self::artifact_name(stored, phase))
            .await?;

        log::info!(
            "Fallback artifact {} written for {}",
            artifact.file_name,
            stored.file_name
        );

        Ok(ProcessorResponse {
            processed_image_url: artifact.public_url(),
            phase: phase.to_string(),
            status: "success".to_string(),
            message: Some(FALLBACK_MESSAGE.to_string()),
            processing_time_seconds: None,
            original_size: Some(stored.size),
            processed_size: Some(artifact.size),
        })
    }
}
