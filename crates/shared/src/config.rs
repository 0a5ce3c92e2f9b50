//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Evidence/proof photo storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Organizational units to register at startup.
    #[serde(default)]
    pub units: Vec<UnitSeed>,
    /// Report configuration.
    #[serde(default)]
    pub report: ReportSettings,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Photo storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Root directory for the local filesystem provider. When absent an
    /// in-process memory store is used.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Maximum accepted photo size in bytes.
    #[serde(default = "default_max_photo_bytes")]
    pub max_photo_bytes: u64,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            root: None,
            max_photo_bytes: default_max_photo_bytes(),
        }
    }
}

fn default_max_photo_bytes() -> u64 {
    2 * 1024 * 1024 // 2 MiB
}

/// A unit declared in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitSeed {
    /// Unit number (>= 1).
    pub id: i64,
    /// Short code, e.g. "FIN".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Whether the unit accepts incoming transfers.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Report configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportSettings {
    /// Currency label attached to monetary report columns.
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

fn default_currency() -> String {
    "IDR".to_string()
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "assetra=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("ASSETRA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_sources() {
        let config = temp_env::with_vars_unset(
            ["ASSETRA__STORAGE__MAX_PHOTO_BYTES", "ASSETRA__REPORT__CURRENCY"],
            AppConfig::load,
        )
        .expect("defaults load");

        assert_eq!(config.storage.max_photo_bytes, 2 * 1024 * 1024);
        assert!(config.storage.root.is_none());
        assert_eq!(config.report.currency, "IDR");
        assert_eq!(config.logging.filter, "assetra=info");
    }

    #[test]
    fn test_environment_overrides() {
        let config = temp_env::with_vars(
            [
                ("ASSETRA__STORAGE__MAX_PHOTO_BYTES", Some("1024")),
                ("ASSETRA__REPORT__CURRENCY", Some("USD")),
            ],
            AppConfig::load,
        )
        .expect("env config loads");

        assert_eq!(config.storage.max_photo_bytes, 1024);
        assert_eq!(config.report.currency, "USD");
    }

    #[test]
    fn test_unit_seed_defaults_to_active() {
        let seed: UnitSeed =
            serde_json::from_str(r#"{"id": 3, "code": "WH", "name": "Warehouse"}"#).unwrap();
        assert!(seed.active);
        assert_eq!(seed.id, 3);
    }
}
