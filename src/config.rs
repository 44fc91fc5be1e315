//! Configuration management
//!
//! Config file is `surface-link.toml` in the working directory; every field
//! is optional and falls back to defaults matching the reference deployment
//! (two pages of ten devices, eight controls each, port 60123).

use crate::constants::{
    CONNECT_TIMEOUT_MS, DEFAULT_CONTROLS_PER_DEVICE, DEFAULT_DEVICE_COUNT, DEFAULT_HOST,
    DEFAULT_PORT, RECONNECT_DELAY_MS,
};
use crate::error::{Result, SurfaceError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE: &str = "surface-link.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub link: LinkConfig,
    pub surface: SurfaceConfig,
}

// =============================================================================
// Link Configuration
// =============================================================================

/// TCP link settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// DAW host to connect to
    pub host: String,
    /// TCP port of the DAW controller extension
    pub port: u16,
    /// Delay between reconnection attempts (milliseconds)
    pub reconnect_delay_ms: u64,
    /// Timeout for a single connect attempt (milliseconds)
    pub connect_timeout_ms: u64,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            reconnect_delay_ms: RECONNECT_DELAY_MS,
            connect_timeout_ms: CONNECT_TIMEOUT_MS,
        }
    }
}

impl LinkConfig {
    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

// =============================================================================
// Surface Layout Configuration
// =============================================================================

/// Size of the mirrored control grid, fixed at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Number of device slots mirrored from the DAW
    pub devices: usize,
    /// Number of controls (knobs) per device
    pub controls_per_device: usize,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            devices: DEFAULT_DEVICE_COUNT,
            controls_per_device: DEFAULT_CONTROLS_PER_DEVICE,
        }
    }
}

impl Config {
    /// Reject configurations the sync core cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.link.host.is_empty() {
            return Err(SurfaceError::ConfigValidation {
                field: "link.host",
                reason: "must not be empty".into(),
            });
        }
        if self.link.port == 0 {
            return Err(SurfaceError::ConfigValidation {
                field: "link.port",
                reason: "must not be 0".into(),
            });
        }
        if self.surface.devices == 0 {
            return Err(SurfaceError::ConfigValidation {
                field: "surface.devices",
                reason: "must be at least 1".into(),
            });
        }
        if self.surface.controls_per_device == 0 {
            return Err(SurfaceError::ConfigValidation {
                field: "surface.controls_per_device",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Load configuration
///
/// With an explicit path, read errors are fatal. Without one, a missing or
/// broken `surface-link.toml` falls back to defaults with a warning.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(|e| SurfaceError::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| SurfaceError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
        }
        None => {
            let path = Path::new(CONFIG_FILE);
            if !path.exists() {
                return Ok(Config::default());
            }
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => Ok(config),
                    Err(e) => {
                        warn!("Config parse error in {:?}: {}, using defaults", path, e);
                        Ok(Config::default())
                    }
                },
                Err(e) => {
                    warn!("Failed to read config {:?}: {}, using defaults", path, e);
                    Ok(Config::default())
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();

        assert_eq!(config.link.host, DEFAULT_HOST);
        assert_eq!(config.link.port, DEFAULT_PORT);
        assert_eq!(config.link.reconnect_delay_ms, RECONNECT_DELAY_MS);
        assert_eq!(config.link.connect_timeout_ms, CONNECT_TIMEOUT_MS);
        assert_eq!(config.surface.devices, DEFAULT_DEVICE_COUNT);
        assert_eq!(
            config.surface.controls_per_device,
            DEFAULT_CONTROLS_PER_DEVICE
        );
    }

    #[test]
    fn test_partial_link_section() {
        let partial = r#"
[link]
host = "192.168.2.102"
"#;
        let config: Config = toml::from_str(partial).unwrap();

        assert_eq!(config.link.host, "192.168.2.102");
        assert_eq!(config.link.port, DEFAULT_PORT);
        assert_eq!(config.surface.devices, DEFAULT_DEVICE_COUNT);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.link.port, DEFAULT_PORT);
        assert_eq!(config.surface.controls_per_device, DEFAULT_CONTROLS_PER_DEVICE);
    }

    #[test]
    fn test_roundtrip() {
        let mut config = Config::default();
        config.link.host = "10.0.0.7".to_string();
        config.link.port = 61000;
        config.surface.devices = 5;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(restored.link.host, "10.0.0.7");
        assert_eq!(restored.link.port, 61000);
        assert_eq!(restored.surface.devices, 5);
        assert_eq!(restored.surface.controls_per_device, DEFAULT_CONTROLS_PER_DEVICE);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.link.host = String::new();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.link.port = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.surface.devices = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.surface.controls_per_device = 0;
        assert!(config.validate().is_err());

        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let result = load(Some(Path::new("/nonexistent/surface-link.toml")));
        assert!(matches!(result, Err(SurfaceError::ConfigRead { .. })));
    }
}
