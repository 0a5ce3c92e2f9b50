//! Photo store implementation using Apache OpenDAL.

use std::fmt;

use opendal::{ErrorKind, Operator, services};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;
use crate::error::EngineError;
use crate::ports::FileStore;

/// Reference to a stored photo (its storage key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    /// The storage key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A photo to be stored.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Original filename.
    pub filename: String,
    /// MIME type as declared by the client.
    pub content_type: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

/// A photo reference together with whether the store actually holds it.
///
/// Existence is checked before the store transaction so no I/O happens under
/// the lock; the rules then decide on the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedPhoto {
    /// The reference supplied by the caller.
    pub photo: PhotoRef,
    /// Whether the file store holds it.
    pub stored: bool,
}

/// Evidence and proof-of-loan photo storage.
pub struct PhotoStore {
    operator: Operator,
    config: StorageConfig,
}

impl PhotoStore {
    /// Create a new photo store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::Memory => Ok(Operator::new(services::Memory::default())
                .map_err(|e| StorageError::Setup(e.to_string()))?
                .finish()),
            StorageProvider::LocalFs { root } => {
                let root = root
                    .to_str()
                    .ok_or_else(|| StorageError::Setup("root is not valid UTF-8".into()))?;
                Ok(Operator::new(services::Fs::default().root(root))
                    .map_err(|e| StorageError::Setup(e.to_string()))?
                    .finish())
            }
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::TooLarge {
                size,
                max: self.config.max_file_size,
            });
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::NotAnImage {
                content_type: content_type.to_string(),
            });
        }

        Ok(())
    }

    /// Generate a storage key for a photo.
    ///
    /// Format: `photos/{photo_id}/{sanitized_filename}`
    #[must_use]
    pub fn generate_storage_key(photo_id: Uuid, filename: &str) -> String {
        format!("photos/{photo_id}/{}", sanitize_filename(filename))
    }

    async fn store(&self, upload: PhotoUpload) -> Result<PhotoRef, StorageError> {
        let size = u64::try_from(upload.bytes.len()).unwrap_or(u64::MAX);
        self.validate_upload(&upload.content_type, size)?;

        let key = Self::generate_storage_key(Uuid::now_v7(), &upload.filename);
        self.operator
            .write(&key, upload.bytes)
            .await
            .map_err(StorageError::from)?;

        tracing::debug!(key = %key, size, "photo stored");
        Ok(PhotoRef(key))
    }
}

impl FileStore for PhotoStore {
    async fn put(&self, upload: PhotoUpload) -> Result<PhotoRef, EngineError> {
        Ok(self.store(upload).await?)
    }

    async fn exists(&self, photo: &PhotoRef) -> Result<bool, EngineError> {
        match self.operator.stat(photo.key()).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::from(e).into()),
        }
    }

    async fn read(&self, photo: &PhotoRef) -> Result<Vec<u8>, EngineError> {
        let buffer = self
            .operator
            .read(photo.key())
            .await
            .map_err(StorageError::from)?;
        Ok(buffer.to_vec())
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "photo".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> PhotoStore {
        PhotoStore::from_config(StorageConfig::new(StorageProvider::Memory))
            .expect("memory store")
    }

    fn upload(content_type: &str, size: usize) -> PhotoUpload {
        PhotoUpload {
            filename: "proof photo.jpg".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0xFF; size],
        }
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("proof.jpg"), "proof.jpg");
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename(""), "photo");
    }

    #[test]
    fn test_generate_storage_key() {
        let id = Uuid::parse_str("6ba7b811-9dad-11d1-80b4-00c04fd430c8").expect("valid uuid");
        let key = PhotoStore::generate_storage_key(id, "proof.jpg");
        assert_eq!(key, "photos/6ba7b811-9dad-11d1-80b4-00c04fd430c8/proof.jpg");
    }

    #[test]
    fn test_validate_upload() {
        let store = memory_store();
        assert!(store.validate_upload("image/png", 1024).is_ok());
        assert!(matches!(
            store.validate_upload("image/png", 3 * 1024 * 1024),
            Err(StorageError::TooLarge { .. })
        ));
        assert!(matches!(
            store.validate_upload("application/pdf", 10),
            Err(StorageError::NotAnImage { .. })
        ));
    }

    #[tokio::test]
    async fn test_put_exists_read() {
        let store = memory_store();
        let photo = store.put(upload("image/jpeg", 64)).await.expect("stored");
        assert!(photo.key().starts_with("photos/"));
        assert!(photo.key().ends_with("proof_photo.jpg"));
        assert!(store.exists(&photo).await.expect("stat"));
        assert_eq!(store.read(&photo).await.expect("read").len(), 64);

        let missing = PhotoRef("photos/none/none.jpg".to_string());
        assert!(!store.exists(&missing).await.expect("stat"));
    }

    #[tokio::test]
    async fn test_put_rejects_non_image() {
        let store = memory_store();
        let err = store.put(upload("text/plain", 8)).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_put_rejects_oversized() {
        let store = PhotoStore::from_config(
            StorageConfig::new(StorageProvider::Memory).with_max_file_size(16),
        )
        .expect("memory store");
        let err = store.put(upload("image/png", 17)).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
    }
}
