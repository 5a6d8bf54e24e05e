//! Domain primitive types used across the contrail workspace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SHA256_PREFIX;

/// Unique identifier for a container instance, as reported by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContainerId(String);

impl ContainerId {
    /// Creates a new container ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first twelve characters, the form `docker ps` shows.
    #[must_use]
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a container image, possibly carrying a digest prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageId(String);

impl ImageId {
    /// Creates a new image ID from a string value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the ID with a leading `sha256:` removed, if present.
    #[must_use]
    pub fn without_digest_prefix(&self) -> &str {
        self.0.strip_prefix(SHA256_PREFIX).unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical lifecycle phase of a container event.
///
/// `Unknown` is reserved for metadata cache entries seeded from an
/// enumeration of existing containers, before any transition is observed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventPhase {
    /// Container has been created but not yet started.
    Created,
    /// Container is running.
    Running,
    /// Container process has exited.
    Exited,
    /// Container has been removed from the host.
    Destroyed,
    /// No lifecycle transition observed yet.
    #[default]
    Unknown,
}

impl fmt::Display for EventPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::Running => write!(f, "running"),
            Self::Exited => write!(f, "exited"),
            Self::Destroyed => write!(f, "destroyed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
