//! Client-side state behind the comparison view.
//!
//! `P` is whatever handle keeps a local preview alive (an object URL in the
//! browser). Releasing a preview is dropping its handle.

use crate::{ConnectionState, ImageRef, ProcessingPhase, ProcessingResult};

pub const DEFAULT_CLIENT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Upload progress is not measured: it climbs by this step on every timer tick
/// while a request is in flight and never passes `PROGRESS_CAP` until the
/// response arrives.
pub const PROGRESS_STEP: u8 = 10;
pub const PROGRESS_CAP: u8 = 90;
pub const PROGRESS_TICK_MS: u32 = 200;
pub const STATUS_POLL_MS: u32 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please select a valid image file (JPG, PNG, GIF)")]
    NotAnImage,
    #[error("File size must be less than {limit_mb}MB")]
    TooLarge { limit_mb: u64 },
    #[error("Please select an image first")]
    NothingSelected,
}

#[derive(Debug)]
pub struct SelectedFile<P> {
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub preview: P,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub original: Option<ImageRef>,
    pub processed: Option<ImageRef>,
    pub phase: Option<ProcessingPhase>,
    pub message: Option<String>,
    pub fallback: bool,
}

pub const ORIGINAL_DOWNLOAD_NAME: &str = "original-image.jpg";

impl Comparison {
    /// Suggested file name when saving the processed image.
    pub fn processed_download_name(&self) -> String {
        match self.phase {
            Some(phase) => format!("processed-{}-image.jpg", phase),
            None => "processed-image.jpg".to_string(),
        }
    }

    pub fn has_images(&self) -> bool {
        self.original.is_some() || self.processed.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusSnapshot {
    pub checked: bool,
    pub backend_online: bool,
    pub processor: ConnectionState,
}

#[derive(Debug)]
pub struct Session<P> {
    max_file_size: u64,
    selected: Option<SelectedFile<P>>,
    phase: ProcessingPhase,
    comparison: Comparison,
    error: Option<String>,
    progress: u8,
    loading: bool,
    status: StatusSnapshot,
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT_MAX_FILE_SIZE)
    }
}

impl<P> Session<P> {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            max_file_size,
            selected: None,
            phase: ProcessingPhase::default(),
            comparison: Comparison::default(),
            error: None,
            progress: 0,
            loading: false,
            status: StatusSnapshot::default(),
        }
    }

    pub fn selected(&self) -> Option<&SelectedFile<P>> {
        self.selected.as_ref()
    }

    pub fn phase(&self) -> ProcessingPhase {
        self.phase
    }

    pub fn comparison(&self) -> &Comparison {
        &self.comparison
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status
    }

    /// Replaces the current selection. The previous preview, if any, is
    /// released. A rejected file leaves the current selection untouched.
    pub fn select_file(
        &mut self,
        name: impl Into<String>,
        size: u64,
        mime: impl Into<String>,
        preview: P,
    ) -> Result<(), SessionError> {
        let mime = mime.into();
        let outcome = if !mime.starts_with("image/") {
            Err(SessionError::NotAnImage)
        } else if size > self.max_file_size {
            Err(SessionError::TooLarge {
                limit_mb: self.max_file_size.div_ceil(1024 * 1024),
            })
        } else {
            Ok(())
        };

        match outcome {
            Ok(()) => {
                self.selected = Some(SelectedFile {
                    name: name.into(),
                    size,
                    mime,
                    preview,
                });
                self.error = None;
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_phase(&mut self, phase: ProcessingPhase) {
        self.phase = phase;
    }

    pub fn set_error(&mut self, message: Option<String>) {
        self.error = message;
    }

    pub fn begin_processing(&mut self) -> Result<(), SessionError> {
        if self.selected.is_none() {
            let e = SessionError::NothingSelected;
            self.error = Some(e.to_string());
            return Err(e);
        }
        self.loading = true;
        self.error = None;
        self.progress = 0;
        Ok(())
    }

    /// Advances the synthetic progress bar. Returns false once the cap is
    /// reached or nothing is in flight, so the caller can stop its timer.
    pub fn tick_progress(&mut self) -> bool {
        if !self.loading || self.progress >= PROGRESS_CAP {
            return false;
        }
        self.progress = (self.progress + PROGRESS_STEP).min(PROGRESS_CAP);
        self.progress < PROGRESS_CAP
    }

    pub fn complete(&mut self, result: ProcessingResult) {
        self.progress = 100;
        self.loading = false;
        self.comparison = Comparison {
            original: Some(result.original_image),
            processed: Some(result.processed_image),
            phase: Some(result.phase),
            message: result.message,
            fallback: result.fallback,
        };
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
        self.progress = 0;
    }

    pub fn update_status(&mut self, backend_online: bool, processor: ConnectionState) {
        self.status = StatusSnapshot {
            checked: true,
            backend_online,
            processor,
        };
    }

    /// Back to the initial empty state. Status readings survive since they
    /// describe the servers, not the session.
    pub fn reset(&mut self) {
        self.selected = None;
        self.phase = ProcessingPhase::default();
        self.comparison = Comparison::default();
        self.error = None;
        self.progress = 0;
        self.loading = false;
    }
}
