//! Docker state-directory introspection.
//!
//! Reads the `config.v2.json` files the Docker daemon keeps for every
//! container under `<root>/containers/<id>/`, without talking to the daemon.

use std::io;
use std::path::{Path, PathBuf};

use contrail_common::constants::{DOCKER_CONFIG_FILE, DOCKER_CONTAINERS_DIR};
use contrail_common::error::{ContrailError, Result};
use contrail_common::types::{ContainerId, ImageId};
use serde::Deserialize;

use crate::introspect::{ContainerMetadata, RuntimeIntrospector};

/// Subset of Docker's per-container configuration file.
#[derive(Debug, Deserialize)]
struct DockerConfig {
    #[serde(rename = "ID")]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Image", default)]
    image: String,
    #[serde(rename = "Config", default)]
    config: DockerContainerConfig,
}

#[derive(Debug, Default, Deserialize)]
struct DockerContainerConfig {
    #[serde(rename = "Image", default)]
    image: String,
}

impl From<DockerConfig> for ContainerMetadata {
    fn from(dc: DockerConfig) -> Self {
        Self {
            id: ContainerId::new(dc.id),
            name: dc.name.trim_start_matches('/').to_string(),
            image_id: ImageId::new(dc.image),
            image_ref: dc.config.image,
        }
    }
}

/// Introspector backed by a Docker daemon's on-disk state.
#[derive(Debug, Clone)]
pub struct DockerStateDir {
    root: PathBuf,
}

impl DockerStateDir {
    /// Creates an introspector rooted at the given Docker data directory.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn containers_dir(&self) -> PathBuf {
        self.root.join(DOCKER_CONTAINERS_DIR)
    }

    fn read_config(path: &Path) -> Result<DockerConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| ContrailError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl RuntimeIntrospector for DockerStateDir {
    fn list_containers(&self) -> Result<Vec<ContainerMetadata>> {
        let dir = self.containers_dir();
        tracing::debug!(dir = %dir.display(), "enumerating docker containers");
        let entries = std::fs::read_dir(&dir).map_err(|e| ContrailError::Io {
            path: dir.clone(),
            source: e,
        })?;

        let mut containers = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| ContrailError::Io {
                path: dir.clone(),
                source: e,
            })?;
            let config_path = entry.path().join(DOCKER_CONFIG_FILE);
            match Self::read_config(&config_path) {
                Ok(dc) => containers.push(ContainerMetadata::from(dc)),
                Err(e) => {
                    tracing::debug!(path = %config_path.display(), error = %e, "skipping container entry");
                }
            }
        }
        containers.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(containers)
    }

    fn get_container(&self, id: &ContainerId) -> Result<ContainerMetadata> {
        let not_found = || ContrailError::NotFound {
            kind: "container",
            id: id.to_string(),
        };
        let raw = id.as_str();
        if raw.is_empty() || raw.contains('/') || raw.contains("..") {
            return Err(not_found());
        }

        let config_path = self.containers_dir().join(raw).join(DOCKER_CONFIG_FILE);
        tracing::debug!(id = %id, "reading docker container config");
        match Self::read_config(&config_path) {
            Ok(dc) => Ok(ContainerMetadata::from(dc)),
            Err(ContrailError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                Err(not_found())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_container(root: &Path, id: &str, name: &str, image: &str, image_ref: &str) {
        let dir = root.join(DOCKER_CONTAINERS_DIR).join(id);
        std::fs::create_dir_all(&dir).unwrap();
        let config = serde_json::json!({
            "ID": id,
            "Name": name,
            "Image": image,
            "Config": { "Image": image_ref, "Hostname": "ignored" },
            "State": { "Running": true, "Pid": 4242 },
        });
        std::fs::write(dir.join(DOCKER_CONFIG_FILE), config.to_string()).unwrap();
    }

    #[test]
    fn get_container_reads_config() {
        let root = tempfile::tempdir().expect("tempdir");
        write_container(root.path(), "abc123", "/web", "sha256:feed", "nginx:1.27");

        let docker = DockerStateDir::new(root.path().to_path_buf());
        let meta = docker.get_container(&ContainerId::new("abc123")).expect("lookup");
        assert_eq!(meta.id.as_str(), "abc123");
        assert_eq!(meta.name, "web");
        assert_eq!(meta.image_id.as_str(), "sha256:feed");
        assert_eq!(meta.image_ref, "nginx:1.27");
    }

    #[test]
    fn get_container_missing_is_not_found() {
        let root = tempfile::tempdir().expect("tempdir");
        let docker = DockerStateDir::new(root.path().to_path_buf());
        let err = docker.get_container(&ContainerId::new("nope")).unwrap_err();
        assert!(matches!(err, ContrailError::NotFound { kind: "container", .. }));
    }

    #[test]
    fn get_container_unreadable_config_is_io_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let config_path = root
            .path()
            .join(DOCKER_CONTAINERS_DIR)
            .join("odd")
            .join(DOCKER_CONFIG_FILE);
        std::fs::create_dir_all(&config_path).unwrap();

        let docker = DockerStateDir::new(root.path().to_path_buf());
        let err = docker.get_container(&ContainerId::new("odd")).unwrap_err();
        assert!(matches!(err, ContrailError::Io { path, .. } if path == config_path));
    }

    #[test]
    fn get_container_rejects_path_traversal() {
        let root = tempfile::tempdir().expect("tempdir");
        write_container(root.path(), "abc123", "/web", "sha256:feed", "nginx");
        let docker = DockerStateDir::new(root.path().to_path_buf());
        let err = docker
            .get_container(&ContainerId::new("../containers/abc123"))
            .unwrap_err();
        assert!(matches!(err, ContrailError::NotFound { .. }));
    }

    #[test]
    fn get_container_corrupt_config_is_serialization_error() {
        let root = tempfile::tempdir().expect("tempdir");
        let dir = root.path().join(DOCKER_CONTAINERS_DIR).join("bad");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(DOCKER_CONFIG_FILE), "{not json").unwrap();

        let docker = DockerStateDir::new(root.path().to_path_buf());
        let err = docker.get_container(&ContainerId::new("bad")).unwrap_err();
        assert!(matches!(err, ContrailError::Serialization { .. }));
    }

    #[test]
    fn list_containers_skips_unreadable_entries() {
        let root = tempfile::tempdir().expect("tempdir");
        write_container(root.path(), "bbb", "/db", "sha256:02", "postgres:16");
        write_container(root.path(), "aaa", "/web", "sha256:01", "nginx:1.27");
        std::fs::create_dir_all(root.path().join(DOCKER_CONTAINERS_DIR).join("empty")).unwrap();

        let docker = DockerStateDir::new(root.path().to_path_buf());
        let list = docker.list_containers().expect("list");
        let ids: Vec<_> = list.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["aaa", "bbb"]);
        assert_eq!(list[1].image_ref, "postgres:16");
    }

    #[test]
    fn list_containers_without_state_dir_fails() {
        let root = tempfile::tempdir().expect("tempdir");
        let docker = DockerStateDir::new(root.path().join("missing"));
        assert!(matches!(
            docker.list_containers().unwrap_err(),
            ContrailError::Io { .. }
        ));
    }
}
