//! Photo storage errors.

use thiserror::Error;

/// Errors raised while validating, writing or reading a photo.
///
/// Upload rejections ([`TooLarge`](Self::TooLarge),
/// [`NotAnImage`](Self::NotAnImage)) are the caller's fault; the rest come
/// from the object store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Upload is bigger than the configured limit.
    #[error("photo is {size} bytes, limit is {max}")]
    TooLarge {
        /// Upload size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Upload content type is not an accepted image type.
    #[error("content type '{content_type}' is not an accepted image type")]
    NotAnImage {
        /// Declared content type.
        content_type: String,
    },

    /// No object under the key.
    #[error("photo not found: {0}")]
    Missing(String),

    /// The operator could not be built.
    #[error("photo store setup failed: {0}")]
    Setup(String),

    /// The object store failed.
    #[error("photo store failed: {0}")]
    Backend(String),
}

impl StorageError {
    /// Returns true for rejections caused by the upload itself.
    #[must_use]
    pub fn is_rejected_upload(&self) -> bool {
        matches!(self, Self::TooLarge { .. } | Self::NotAnImage { .. })
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        if err.kind() == opendal::ErrorKind::NotFound {
            Self::Missing(err.to_string())
        } else {
            Self::Backend(err.to_string())
        }
    }
}
