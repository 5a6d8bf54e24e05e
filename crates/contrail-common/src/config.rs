//! Configuration model for the reconciler.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ContrailError, Result};

/// When the metadata cache enumerates existing containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BootstrapMode {
    /// On first cache access. Enumeration failures leave the cache empty.
    #[default]
    Lazy,
    /// At construction. Enumeration failures are returned to the caller.
    Eager,
}

/// What the pipeline does with a notification whose phase tag is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPhasePolicy {
    /// Stop processing the stream and report the error.
    #[default]
    Abort,
    /// Log the notification and continue with the next one.
    Skip,
}

/// Root configuration for the reconciler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContrailConfig {
    /// Root of the Docker daemon's on-disk state.
    pub docker_root: PathBuf,
    /// Metadata cache bootstrap strategy.
    pub bootstrap: BootstrapMode,
    /// Handling of unrecognized phase tags.
    pub invalid_phase: InvalidPhasePolicy,
    /// Capacity of the notification and envelope channels.
    pub channel_capacity: usize,
}

impl Default for ContrailConfig {
    fn default() -> Self {
        Self {
            docker_root: PathBuf::from(crate::constants::DEFAULT_DOCKER_ROOT),
            bootstrap: BootstrapMode::default(),
            invalid_phase: InvalidPhasePolicy::default(),
            channel_capacity: crate::constants::DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ContrailConfig {
    /// Loads a configuration from a JSON file. Absent keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading configuration");
        let content = std::fs::read_to_string(path).map_err(|e| ContrailError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values that serde cannot constrain.
    ///
    /// # Errors
    ///
    /// Returns [`ContrailError::Config`] if a value is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.channel_capacity == 0 {
            return Err(ContrailError::Config {
                message: "channel_capacity must be greater than zero".into(),
            });
        }
        if self.docker_root.as_os_str().is_empty() {
            return Err(ContrailError::Config {
                message: "docker_root must not be empty".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ContrailConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bootstrap, BootstrapMode::Lazy);
        assert_eq!(config.invalid_phase, InvalidPhasePolicy::Abort);
    }

    #[test]
    fn load_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contrail.json");
        std::fs::write(&path, r#"{"bootstrap": "eager", "invalid_phase": "skip"}"#).unwrap();

        let config = ContrailConfig::load(&path).expect("should load");
        assert_eq!(config.bootstrap, BootstrapMode::Eager);
        assert_eq!(config.invalid_phase, InvalidPhasePolicy::Skip);
        assert_eq!(config.channel_capacity, crate::constants::DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn load_rejects_zero_capacity() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("contrail.json");
        std::fs::write(&path, r#"{"channel_capacity": 0}"#).unwrap();

        let err = ContrailConfig::load(&path).unwrap_err();
        assert!(matches!(err, ContrailError::Config { .. }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = ContrailConfig::load(Path::new("/nonexistent/contrail.json")).unwrap_err();
        assert!(matches!(err, ContrailError::Io { .. }));
    }
}
