//! # API Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TCO_API_PORT=9090                                                  │
//! │     TCO_API_BIND_ADDR=127.0.0.1                                        │
//! │     TCO_CATALOG_PATH=/etc/tco/catalog.toml                             │
//! │     TCO_HYPERSCALE_LIMITS=true                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $TCO_API_CONFIG, or ./tco-api.toml                                 │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     0.0.0.0:8080, reference catalog, standard limits                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [engine]
//! catalog_path = "catalog.toml"   # optional replacement pricing
//! hyperscale_limits = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use tco_core::{Calculator, EquipmentCatalog, ValidationLimits};

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "tco-api.toml";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidValue(String),
}

// =============================================================================
// Server Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            bind_addr: default_bind_addr(),
            port: default_port(),
        }
    }
}

impl ServerSettings {
    /// Returns the full bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

// =============================================================================
// Engine Settings
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Replacement equipment catalog (TOML). The reference catalog is used
    /// when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Accept up to 10 000 racks and 10⁹ kW.
    #[serde(default)]
    pub hyperscale_limits: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub engine: EngineSettings,
}

impl ApiConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, `$TCO_API_CONFIG`, or `tco-api.toml`)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let path = config_path
            .or_else(|| std::env::var_os("TCO_API_CONFIG").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = if path.exists() {
            info!(?path, "Loading API config from file");
            Self::from_file(&path)?
        } else {
            debug!(?path, "Config file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = read(path)?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "server.bind_addr must not be empty".into(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue(
                "server.port must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("TCO_API_PORT") {
            match port.parse::<u16>() {
                Ok(p) => {
                    debug!(port = p, "Overriding port from environment");
                    self.server.port = p;
                }
                Err(_) => warn!(port = %port, "Ignoring invalid TCO_API_PORT"),
            }
        }

        if let Ok(addr) = std::env::var("TCO_API_BIND_ADDR") {
            debug!(addr = %addr, "Overriding bind address from environment");
            self.server.bind_addr = addr;
        }

        if let Ok(path) = std::env::var("TCO_CATALOG_PATH") {
            debug!(path = %path, "Overriding catalog path from environment");
            self.engine.catalog_path = Some(PathBuf::from(path));
        }

        if let Ok(flag) = std::env::var("TCO_HYPERSCALE_LIMITS") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.engine.hyperscale_limits = true,
                "0" | "false" | "no" | "off" => self.engine.hyperscale_limits = false,
                _ => warn!(flag = %flag, "Ignoring invalid TCO_HYPERSCALE_LIMITS"),
            }
        }
    }

    // =========================================================================
    // Engine Construction
    // =========================================================================

    pub fn limits(&self) -> ValidationLimits {
        if self.engine.hyperscale_limits {
            ValidationLimits::hyperscale()
        } else {
            ValidationLimits::default()
        }
    }

    /// Loads the configured catalog, or the reference catalog.
    pub fn load_catalog(&self) -> Result<EquipmentCatalog, ConfigError> {
        let Some(path) = &self.engine.catalog_path else {
            return Ok(EquipmentCatalog::default());
        };

        let contents = read(path)?;
        let catalog: EquipmentCatalog =
            toml::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;

        catalog.check().map_err(|err| {
            ConfigError::InvalidValue(format!("catalog {}: {}", path.display(), err))
        })?;

        info!(?path, version = %catalog.version, "Loaded equipment catalog");
        Ok(catalog)
    }

    pub fn build_calculator(&self) -> Result<Calculator, ConfigError> {
        Ok(Calculator::new(self.load_catalog()?, self.limits()))
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert_eq!(config.server.bind_address(), "0.0.0.0:8080");
        assert!(config.engine.catalog_path.is_none());
        assert!(!config.engine.hyperscale_limits);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ApiConfig::from_toml(
            r#"
            [server]
            port = 9090

            [engine]
            hyperscale_limits = true
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.bind_addr, "0.0.0.0");
        assert_eq!(config.limits(), ValidationLimits::hyperscale());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ApiConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config.server.port = 8080;
        config.server.bind_addr = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_reference_catalog_without_path() {
        let catalog = ApiConfig::default().load_catalog().unwrap();
        assert_eq!(catalog, EquipmentCatalog::default());
    }

    #[test]
    fn test_catalog_toml_round_trip() {
        let path = std::env::temp_dir().join(format!("tco-catalog-{}.toml", std::process::id()));
        let mut catalog = EquipmentCatalog::default();
        catalog.version = "site-2025".to_string();
        std::fs::write(&path, toml::to_string(&catalog).unwrap()).unwrap();

        let mut config = ApiConfig::default();
        config.engine.catalog_path = Some(path.clone());
        let loaded = config.load_catalog().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, catalog);
    }

    #[test]
    fn test_catalog_with_unusable_values_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "tco-catalog-invalid-{}.toml",
            std::process::id()
        ));
        let mut catalog = EquipmentCatalog::default();
        catalog.auto_optimize_power_density_kw_per_u = 0.0;
        std::fs::write(&path, toml::to_string(&catalog).unwrap()).unwrap();

        let mut config = ApiConfig::default();
        config.engine.catalog_path = Some(path.clone());
        let result = config.load_catalog();
        std::fs::remove_file(&path).ok();

        match result {
            Err(ConfigError::InvalidValue(message)) => {
                assert!(message.contains("auto_optimize_power_density_kw_per_u"), "{message}");
            }
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_with_negative_price_is_rejected() {
        let path = std::env::temp_dir().join(format!(
            "tco-catalog-negative-{}.toml",
            std::process::id()
        ));
        let mut catalog = EquipmentCatalog::default();
        catalog.hvac[0].cost_per_kw_usd = -800.0;
        std::fs::write(&path, toml::to_string(&catalog).unwrap()).unwrap();

        let mut config = ApiConfig::default();
        config.engine.catalog_path = Some(path.clone());
        let result = config.build_calculator();
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_missing_catalog_file_is_read_error() {
        let mut config = ApiConfig::default();
        config.engine.catalog_path = Some(PathBuf::from("/nonexistent/tco/catalog.toml"));
        assert!(matches!(
            config.build_calculator(),
            Err(ConfigError::Read { .. })
        ));
    }
}
