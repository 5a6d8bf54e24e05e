//! System-wide constants and default paths.

/// Default root of the Docker daemon's on-disk state.
pub const DEFAULT_DOCKER_ROOT: &str = "/var/lib/docker";

/// Directory under the Docker root holding one subdirectory per container.
pub const DOCKER_CONTAINERS_DIR: &str = "containers";

/// Per-container configuration file written by the Docker daemon.
pub const DOCKER_CONFIG_FILE: &str = "config.v2.json";

/// Digest algorithm prefix carried by content-addressed image IDs.
pub const SHA256_PREFIX: &str = "sha256:";

/// Default capacity of the notification and envelope channels.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "CONTRAIL_CONFIG";
