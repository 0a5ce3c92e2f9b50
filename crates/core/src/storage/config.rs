//! Storage configuration types.

use std::path::PathBuf;

use assetra_shared::config::StorageSettings;
use serde::{Deserialize, Serialize};

/// Storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// In-process memory (tests, one-shot tools).
    Memory,
    /// Local filesystem.
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Create local filesystem provider.
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Photo storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Storage provider configuration.
    pub provider: StorageProvider,
    /// Maximum file size in bytes.
    pub max_file_size: u64,
    /// Accepted MIME type prefix.
    pub allowed_mime_prefix: String,
}

impl StorageConfig {
    /// Default max photo size: 2 MiB.
    pub const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024;

    /// Create a new storage config with default settings.
    #[must_use]
    pub fn new(provider: StorageProvider) -> Self {
        Self {
            provider,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
            allowed_mime_prefix: "image/".to_string(),
        }
    }

    /// Build from application settings.
    #[must_use]
    pub fn from_settings(settings: &StorageSettings) -> Self {
        let provider = settings
            .root
            .clone()
            .map_or(StorageProvider::Memory, StorageProvider::local_fs);
        Self::new(provider).with_max_file_size(settings.max_photo_bytes)
    }

    /// Set maximum file size.
    #[must_use]
    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Check if a MIME type is allowed.
    #[must_use]
    pub fn is_mime_type_allowed(&self, mime_type: &str) -> bool {
        let mime = mime_type.trim().to_ascii_lowercase();
        mime.len() > self.allowed_mime_prefix.len() && mime.starts_with(&self.allowed_mime_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert_eq!(config.max_file_size, 2 * 1024 * 1024);
        assert_eq!(config.provider.name(), "memory");
    }

    #[test]
    fn test_mime_type_validation() {
        let config = StorageConfig::new(StorageProvider::Memory);
        assert!(config.is_mime_type_allowed("image/png"));
        assert!(config.is_mime_type_allowed("IMAGE/JPEG"));
        assert!(!config.is_mime_type_allowed("image/"));
        assert!(!config.is_mime_type_allowed("application/pdf"));
        assert!(!config.is_mime_type_allowed("text/html"));
    }

    #[test]
    fn test_from_settings() {
        let settings = StorageSettings {
            root: Some(PathBuf::from("/var/lib/assetra")),
            max_photo_bytes: 512,
        };
        let config = StorageConfig::from_settings(&settings);
        assert_eq!(config.provider.name(), "local");
        assert_eq!(config.max_file_size, 512);

        let config = StorageConfig::from_settings(&StorageSettings::default());
        assert_eq!(config.provider.name(), "memory");
    }
}
