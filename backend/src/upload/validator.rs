use shared::ProcessingPhase;
use std::str::FromStr;

pub const ALLOWED_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/gif"];

/// Reasons an upload is refused before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("No image file provided")]
    MissingFile,
    #[error("Invalid phase selection")]
    InvalidPhase,
    #[error("Invalid file type. Only JPEG, PNG, and GIF images are allowed.")]
    InvalidFileType,
    #[error("File too large. Please upload an image under {limit_mb}MB.")]
    FileTooLarge { limit_mb: usize },
    #[error("Too many files. Please upload only one image.")]
    TooManyFiles,
    #[error("Unexpected field. Please use \"image\" as the field name.")]
    UnexpectedField(String),
    #[error("Upload error: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Category reported in the `error` field of the envelope.
    pub fn category(&self) -> &'static str {
        match self {
            ValidationError::MissingFile => "No image file provided",
            ValidationError::InvalidPhase => "Invalid phase selection",
            _ => "File upload failed",
        }
    }

    pub fn details(&self) -> String {
        match self {
            ValidationError::MissingFile => "Please select an image file to upload".to_string(),
            ValidationError::InvalidPhase => {
                "Phase must be either \"arterial\" or \"venous\"".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// What the validator needs to know about a file part. No bytes.
#[derive(Debug, Clone, Copy)]
pub struct FileFacts<'a> {
    pub mime: &'a str,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UploadCandidate<'a> {
    pub file_count: usize,
    pub unexpected_field: Option<&'a str>,
    pub file: Option<FileFacts<'a>>,
    pub phase: Option<&'a str>,
    pub phase_overflow: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct UploadRules {
    pub max_file_size: usize,
}

impl UploadRules {
    pub fn new(max_file_size: usize) -> Self {
        Self { max_file_size }
    }

    pub fn validate(&self, candidate: &UploadCandidate<'_>) -> Result<ProcessingPhase, ValidationError> {
        if candidate.file_count > 1 {
            return Err(ValidationError::TooManyFiles);
        }
        if let Some(field) = candidate.unexpected_field {
            return Err(ValidationError::UnexpectedField(field.to_string()));
        }

        let file = candidate.file.ok_or(ValidationError::MissingFile)?;

        // size before type: oversize is reported as such whatever the MIME type
        if file.size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                limit_mb: self.limit_mb(),
            });
        }
        if !Self::is_allowed_mime(file.mime) {
            return Err(ValidationError::InvalidFileType);
        }

        if candidate.phase_overflow {
            return Err(ValidationError::InvalidPhase);
        }
        // exact literal match, surrounding whitespace included
        candidate
            .phase
            .and_then(|p| ProcessingPhase::from_str(p).ok())
            .ok_or(ValidationError::InvalidPhase)
    }

    /// Limit in whole megabytes, rounded up so small limits never read as 0.
    pub fn limit_mb(&self) -> usize {
        self.max_file_size.div_ceil(1024 * 1024)
    }

    pub fn is_allowed_mime(mime: &str) -> bool {
        ALLOWED_MIME_TYPES
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(mime.trim()))
    }
}
