use rand::Rng;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const PUBLIC_PREFIX: &str = "/uploads";

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to prepare upload directory: {0}")]
    Directory(#[source] std::io::Error),
    #[error("Failed to write {file_name}: {source}")]
    Write {
        file_name: String,
        source: std::io::Error,
    },
    #[error("Failed to copy {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        source: std::io::Error,
    },
    #[error("Failed to resolve {file_name}: {source}")]
    Resolve {
        file_name: String,
        source: std::io::Error,
    },
}

/// An artifact written under the upload directory. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub file_name: String,
    pub path: PathBuf,
    pub size: u64,
}

impl StoredImage {
    pub fn public_url(&self) -> String {
        LocalStorage::public_url(&self.file_name)
    }
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(StorageError::Directory)
    }

    /// Lower-cased alphanumeric extension of a client-supplied file name.
    pub fn extract_file_extension(original_name: &str) -> Option<String> {
        let base = original_name.rsplit(['/', '\\']).next().unwrap_or(original_name);
        let (stem, ext) = base.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() || ext.len() > 10 {
            return None;
        }
        if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    /// `image-{unix millis}-{random}{.ext}`; the client name only contributes
    /// its extension.
    pub fn generate_file_name(original_name: &str) -> String {
        let millis = chrono::Utc::now().timestamp_millis();
        let suffix: u32 = rand::rng().random_range(0..1_000_000_000);
        match Self::extract_file_extension(original_name) {
            Some(ext) => format!("image-{}-{}.{}", millis, suffix, ext),
            None => format!("image-{}-{}", millis, suffix),
        }
    }

    pub fn public_url(file_name: &str) -> String {
        format!("{}/{}", PUBLIC_PREFIX, file_name)
    }

    pub async fn store_upload(
        &self,
        image_data: &[u8],
        original_name: &str,
    ) -> Result<StoredImage, StorageError> {
        let file_name = Self::generate_file_name(original_name);
        let path = self.root.join(&file_name);
        let write_err = |source| StorageError::Write {
            file_name: file_name.clone(),
            source,
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(write_err)?;
        file.write_all(image_data).await.map_err(write_err)?;
        file.flush().await.map_err(write_err)?;

        Ok(StoredImage {
            file_name,
            path,
            size: image_data.len() as u64,
        })
    }

    /// Byte-for-byte copy of `source` named `file_name`. Re-running with the
    /// same arguments overwrites the earlier copy with identical bytes.
    pub async fn copy_as(
        &self,
        source: &StoredImage,
        file_name: &str,
    ) -> Result<StoredImage, StorageError> {
        let path = self.root.join(file_name);
        let size = tokio::fs::copy(&source.path, &path)
            .await
            .map_err(|e| StorageError::Copy {
                from: source.file_name.clone(),
                to: file_name.to_string(),
                source: e,
            })?;

        Ok(StoredImage {
            file_name: file_name.to_string(),
            path,
            size,
        })
    }

    pub async fn absolute_path(&self, stored: &StoredImage) -> Result<PathBuf, StorageError> {
        tokio::fs::canonicalize(&stored.path)
            .await
            .map_err(|e| StorageError::Resolve {
                file_name: stored.file_name.clone(),
                source: e,
            })
    }
}
