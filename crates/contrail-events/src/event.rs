//! Canonical container lifecycle events.

use contrail_common::types::EventPhase;
use contrail_runtime::introspect::ContainerMetadata;
use serde::{Deserialize, Serialize};

/// A reconciled container lifecycle event, also the metadata cache value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerEvent {
    /// Lifecycle phase.
    pub phase: EventPhase,
    /// Declared container name.
    pub name: String,
    /// Image ID.
    pub image_id: String,
    /// Image name.
    pub image_name: String,
    /// Host process ID, 0 if unknown.
    pub host_pid: u32,
    /// Docker-style configuration JSON.
    pub docker_config_json: String,
    /// OCI runtime configuration JSON.
    pub oci_config_json: String,
    /// Exit code of the container process.
    pub exit_code: i32,
}

impl ContainerEvent {
    /// Creates an event carrying only a phase.
    #[must_use]
    pub fn new(phase: EventPhase) -> Self {
        Self {
            phase,
            ..Self::default()
        }
    }

    /// Builds an `Unknown`-phase entry from a single-container lookup.
    ///
    /// The image ID loses any `sha256:` prefix.
    #[must_use]
    pub fn from_metadata(meta: &ContainerMetadata) -> Self {
        Self {
            image_id: meta.image_id.without_digest_prefix().to_string(),
            ..Self::from_enumeration(meta)
        }
    }

    /// Builds an `Unknown`-phase entry from a full container enumeration.
    ///
    /// The image ID is kept exactly as the runtime reports it.
    #[must_use]
    pub fn from_enumeration(meta: &ContainerMetadata) -> Self {
        Self {
            phase: EventPhase::Unknown,
            name: meta.name.clone(),
            image_id: meta.image_id.as_str().to_string(),
            image_name: meta.image_ref.clone(),
            ..Self::default()
        }
    }

    /// Keeps whichever Docker configuration blob is longer.
    pub(crate) fn merge_docker_config_longest(&mut self, blob: &str) {
        if blob.len() > self.docker_config_json.len() {
            self.docker_config_json = blob.to_string();
        }
    }

    /// Replaces the Docker configuration blob unless `blob` is empty.
    pub(crate) fn overwrite_docker_config(&mut self, blob: &str) {
        if !blob.is_empty() {
            self.docker_config_json = blob.to_string();
        }
    }

    /// Replaces the OCI configuration blob unless `blob` is empty.
    pub(crate) fn overwrite_oci_config(&mut self, blob: &str) {
        if !blob.is_empty() {
            self.oci_config_json = blob.to_string();
        }
    }

    /// Replaces the host PID unless `pid` is 0.
    pub(crate) const fn overwrite_host_pid(&mut self, pid: u32) {
        if pid != 0 {
            self.host_pid = pid;
        }
    }
}
