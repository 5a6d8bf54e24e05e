//! Runtime introspection abstraction.

use std::sync::Arc;

use contrail_common::config::ContrailConfig;
use contrail_common::error::Result;
use contrail_common::types::{ContainerId, ImageId};

use crate::docker::DockerStateDir;

/// Static metadata of a container as declared to the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerMetadata {
    /// Unique identifier.
    pub id: ContainerId,
    /// Declared container name.
    pub name: String,
    /// Content-addressed image ID, possibly `sha256:`-prefixed.
    pub image_id: ImageId,
    /// Image reference the container was created from, e.g. `nginx:1.27`.
    pub image_ref: String,
}

/// Read-only view of the containers known to a runtime.
///
/// Implementations perform blocking I/O and must be shareable across
/// threads; the metadata cache calls them without holding its lock.
pub trait RuntimeIntrospector: Send + Sync {
    /// Enumerates every container currently known to the runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime state cannot be read.
    fn list_containers(&self) -> Result<Vec<ContainerMetadata>>;

    /// Resolves the static metadata of a single container.
    ///
    /// # Errors
    ///
    /// Returns [`ContrailError::NotFound`](contrail_common::error::ContrailError::NotFound)
    /// if the container does not exist, or an I/O or parse error.
    fn get_container(&self, id: &ContainerId) -> Result<ContainerMetadata>;
}

/// Builds the introspector described by the configuration.
#[must_use]
pub fn from_config(config: &ContrailConfig) -> Arc<dyn RuntimeIntrospector> {
    Arc::new(DockerStateDir::new(config.docker_root.clone()))
}
