use actix_multipart::Multipart;
use futures::{StreamExt, TryStreamExt};

use super::validator::{FileFacts, UploadCandidate, ValidationError};

pub const IMAGE_FIELD: &str = "image";
pub const PHASE_FIELD: &str = "phase";

const MAX_TEXT_FIELD_LEN: usize = 256;

#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub content_type: String,
    /// Bytes seen. Once over the limit, reading stops and this is the count
    /// at that point.
    pub size: usize,
    /// Left empty when the part is over the size limit.
    pub bytes: Vec<u8>,
}

/// Buffered multipart form. Only the first `image` part within the size limit
/// keeps its bytes.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file_parts: usize,
    pub unexpected_field: Option<String>,
    pub image: Option<FilePart>,
    /// Raw `phase` value, untrimmed.
    pub phase: Option<String>,
    /// `phase` was longer than any accepted value could be.
    pub phase_overflow: bool,
}

impl UploadForm {
    /// Reading stops at the first file part that goes over `max_file_size`;
    /// the rest of the body is never consumed.
    pub async fn read(mut payload: Multipart, max_file_size: usize) -> Result<Self, ValidationError> {
        let mut form = UploadForm::default();

        while let Some(mut field) = payload
            .try_next()
            .await
            .map_err(|e| ValidationError::Malformed(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .filter(|f| !f.is_empty())
                .map(str::to_string);

            match file_name {
                Some(file_name) => {
                    form.file_parts += 1;
                    let keep = name == IMAGE_FIELD && form.image.is_none();
                    if name != IMAGE_FIELD && form.unexpected_field.is_none() {
                        form.unexpected_field = Some(name.clone());
                    }

                    let content_type = field
                        .content_type()
                        .map(|m| m.essence_str().to_string())
                        .unwrap_or_default();

                    let mut size = 0usize;
                    let mut bytes = Vec::new();
                    let mut oversize = false;
                    while let Some(chunk) = field.next().await {
                        let chunk = chunk.map_err(|e| ValidationError::Malformed(e.to_string()))?;
                        size += chunk.len();
                        if size > max_file_size {
                            oversize = true;
                            break;
                        }
                        if keep {
                            bytes.extend_from_slice(&chunk);
                        }
                    }

                    if keep {
                        form.image = Some(FilePart {
                            file_name,
                            content_type,
                            size,
                            bytes: if oversize { Vec::new() } else { bytes },
                        });
                    }
                    if oversize {
                        return Ok(form);
                    }
                }
                None => {
                    let mut value = Vec::new();
                    let mut seen = 0usize;
                    while let Some(chunk) = field.next().await {
                        let chunk = chunk.map_err(|e| ValidationError::Malformed(e.to_string()))?;
                        seen += chunk.len();
                        if seen <= MAX_TEXT_FIELD_LEN {
                            value.extend_from_slice(&chunk);
                        } else if seen > max_file_size {
                            break;
                        }
                    }

                    let overflow = seen > MAX_TEXT_FIELD_LEN;
                    if name == PHASE_FIELD {
                        form.phase_overflow = overflow;
                        form.phase = (!overflow).then(|| String::from_utf8_lossy(&value).into_owned());
                    }
                    if seen > max_file_size {
                        return Ok(form);
                    }
                }
            }
        }

        Ok(form)
    }

    pub fn candidate(&self) -> UploadCandidate<'_> {
        UploadCandidate {
            file_count: self.file_parts,
            unexpected_field: self.unexpected_field.as_deref(),
            file: self.image.as_ref().map(|f| FileFacts {
                mime: &f.content_type,
                size: f.size,
            }),
            phase: self.phase.as_deref(),
            phase_overflow: self.phase_overflow,
        }
    }
}
