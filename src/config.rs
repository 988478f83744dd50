use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::geo::MAX_RESOLUTION;

/// Top-level application configuration. Every section has a default, so
/// a partial file (or no file at all) still yields a runnable service.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub geo: GeoConfig,
    pub audit: AuditConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Storage backend selection
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    Sqlite {
        path: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Cell resolution used for every registration.
    pub cell_resolution: u8,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self { cell_resolution: 7 }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AuditConfig {
    /// Bounded audit queue capacity. Absent means unbounded; when set,
    /// events enqueued against a full queue are dropped, never blocking
    /// or failing the triggering operation.
    pub queue_capacity: Option<usize>,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.geo.cell_resolution > MAX_RESOLUTION {
            return Err(format!(
                "geo.cell_resolution must be at most {}, got {}",
                MAX_RESOLUTION, self.geo.cell_resolution
            ));
        }

        if let StorageConfig::Sqlite { path } = &self.storage {
            if path.is_empty() {
                return Err("storage.path must not be empty for the sqlite backend".to_string());
            }
        }

        if let Some(0) = self.audit.queue_capacity {
            return Err("audit.queue_capacity must be at least 1 when set".to_string());
        }

        Ok(())
    }
}

/// Load configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig, String> {
    let path = path.as_ref();
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config file '{}': {}", path.display(), e))?;

    let config: AppConfig = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse YAML config: {}", e))?;

    config.validate()?;

    Ok(config)
}

/// Load configuration with fallback options: CONFIG_PATH first, then the
/// conventional file names, then built-in defaults.
pub fn load_config_with_fallback() -> AppConfig {
    if let Ok(config_path) = std::env::var("CONFIG_PATH") {
        match load_config(&config_path) {
            Ok(config) => return config,
            Err(e) => warn!(
                "Failed to load config from CONFIG_PATH ({}): {}",
                config_path, e
            ),
        }
    }

    for path in ["config.yaml", "config.yml"] {
        if Path::new(path).exists() {
            match load_config(path) {
                Ok(config) => return config,
                Err(e) => warn!("Failed to load config from '{}': {}", path, e),
            }
        }
    }

    info!("No configuration file found, using built-in defaults");
    AppConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let yaml = r#"
server:
  bind_addr: "127.0.0.1:8080"
storage:
  backend: sqlite
  path: "data/civic.db"
geo:
  cell_resolution: 9
audit:
  queue_capacity: 1024
"#;

        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.geo.cell_resolution, 9);
        assert_eq!(config.audit.queue_capacity, Some(1024));
        assert!(matches!(config.storage, StorageConfig::Sqlite { .. }));
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: AppConfig = serde_yaml::from_str("server:\n  bind_addr: \"0.0.0.0:4000\"\n").unwrap();
        assert_eq!(config.server.bind_addr, "0.0.0.0:4000");
        assert_eq!(config.geo.cell_resolution, 7);
        assert_eq!(config.audit.queue_capacity, None);
        assert!(matches!(config.storage, StorageConfig::Memory));
    }

    #[test]
    fn defaults_are_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn excessive_resolution_is_rejected() {
        let mut config = AppConfig::default();
        config.geo.cell_resolution = 13;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("cell_resolution"));
    }

    #[test]
    fn empty_sqlite_path_is_rejected() {
        let mut config = AppConfig::default();
        config.storage = StorageConfig::Sqlite {
            path: String::new(),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_queue_capacity_is_rejected() {
        let mut config = AppConfig::default();
        config.audit.queue_capacity = Some(0);
        assert!(config.validate().is_err());
    }
}
