//! Raw lifecycle notifications as delivered by the event source.

use std::fmt;
use std::str::FromStr;

use contrail_common::error::{ContrailError, Result};
use contrail_common::types::ContainerId;
use serde::{Deserialize, Serialize};

/// Lifecycle phase reported by a raw notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationPhase {
    /// The container was created.
    Created,
    /// The container process was started.
    Started,
    /// The container process stopped.
    Stopped,
    /// The container was removed.
    Removed,
}

impl NotificationPhase {
    /// Returns the wire tag for this phase.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Started => "started",
            Self::Stopped => "stopped",
            Self::Removed => "removed",
        }
    }
}

impl fmt::Display for NotificationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationPhase {
    type Err = ContrailError;

    fn from_str(tag: &str) -> Result<Self> {
        [Self::Created, Self::Started, Self::Stopped, Self::Removed]
            .into_iter()
            .find(|phase| phase.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ContrailError::UnrecognizedPhase {
                tag: tag.to_string(),
            })
    }
}

/// A single per-container notification from one of the runtime subsystems.
///
/// The phase is kept as its textual tag so that malformed input survives
/// deserialization and is rejected by the translator instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawContainerNotification {
    /// Container the notification is about.
    pub id: ContainerId,
    /// Lifecycle phase tag.
    pub phase: String,
    /// Declared container name.
    pub name: String,
    /// Image ID.
    pub image_id: String,
    /// Image name.
    pub image_name: String,
    /// Host process ID, 0 if unknown.
    pub pid: u32,
    /// Docker-style configuration JSON, may be empty.
    pub docker_config: String,
    /// OCI runtime configuration JSON, may be empty.
    pub oci_config: String,
    /// Exit code, meaningful only for `stopped`.
    pub exit_code: i32,
}

impl RawContainerNotification {
    /// Creates a notification with only an ID and phase set.
    #[must_use]
    pub fn new(id: impl Into<String>, phase: NotificationPhase) -> Self {
        Self {
            id: ContainerId::new(id),
            phase: phase.as_str().to_string(),
            ..Self::default()
        }
    }

    /// Parses the phase tag.
    ///
    /// # Errors
    ///
    /// Returns [`ContrailError::UnrecognizedPhase`] for tags outside the
    /// four known phases.
    pub fn phase(&self) -> Result<NotificationPhase> {
        self.phase.parse()
    }

    /// Sets the container name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the image ID and name.
    #[must_use]
    pub fn with_image(mut self, image_id: impl Into<String>, image_name: impl Into<String>) -> Self {
        self.image_id = image_id.into();
        self.image_name = image_name.into();
        self
    }

    /// Sets the host process ID.
    #[must_use]
    pub const fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    /// Sets the Docker-style configuration blob.
    #[must_use]
    pub fn with_docker_config(mut self, config: impl Into<String>) -> Self {
        self.docker_config = config.into();
        self
    }

    /// Sets the OCI configuration blob.
    #[must_use]
    pub fn with_oci_config(mut self, config: impl Into<String>) -> Self {
        self.oci_config = config.into();
        self
    }

    /// Sets the exit code.
    #[must_use]
    pub const fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_tags_parse_case_insensitively() {
        assert_eq!("created".parse::<NotificationPhase>().unwrap(), NotificationPhase::Created);
        assert_eq!("Started".parse::<NotificationPhase>().unwrap(), NotificationPhase::Started);
        assert_eq!("STOPPED".parse::<NotificationPhase>().unwrap(), NotificationPhase::Stopped);
        assert_eq!("removed".parse::<NotificationPhase>().unwrap(), NotificationPhase::Removed);
    }

    #[test]
    fn unknown_phase_tag_is_rejected() {
        let err = "paused".parse::<NotificationPhase>().unwrap_err();
        assert!(matches!(err, ContrailError::UnrecognizedPhase { tag } if tag == "paused"));
    }

    #[test]
    fn notification_deserializes_with_missing_fields() {
        let n: RawContainerNotification =
            serde_json::from_str(r#"{"id":"c1","phase":"stopped","exit_code":2}"#).unwrap();
        assert_eq!(n.id.as_str(), "c1");
        assert_eq!(n.phase().unwrap(), NotificationPhase::Stopped);
        assert_eq!(n.exit_code, 2);
        assert_eq!(n.pid, 0);
        assert!(n.docker_config.is_empty());
    }

    #[test]
    fn builder_sets_fields() {
        let n = RawContainerNotification::new("c1", NotificationPhase::Started)
            .with_pid(42)
            .with_oci_config("{}");
        assert_eq!(n.phase, "started");
        assert_eq!(n.pid, 42);
        assert_eq!(n.oci_config, "{}");
    }
}
