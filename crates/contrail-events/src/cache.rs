//! Container metadata cache.
//!
//! Maps container IDs to the most recently known [`ContainerEvent`]. The
//! cache is seeded once from a full runtime enumeration and then updated by
//! the translator on every lifecycle transition. Misses fall through to a
//! single-container lookup whose result is cached.
//!
//! All map access goes through one mutex, which is never held across
//! runtime I/O.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use contrail_common::config::{BootstrapMode, ContrailConfig};
use contrail_common::error::{ContrailError, Result};
use contrail_common::types::ContainerId;
use contrail_runtime::introspect::{ContainerMetadata, RuntimeIntrospector};

use crate::event::ContainerEvent;

/// Result of the one-time enumeration of existing containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Enumeration succeeded and seeded this many entries.
    Seeded(usize),
    /// Enumeration failed; the cache started empty.
    Degraded,
}

/// Thread-safe, bootstrapped-once container metadata cache.
pub struct MetadataCache {
    introspector: Arc<dyn RuntimeIntrospector>,
    bootstrap: OnceLock<BootstrapOutcome>,
    entries: Mutex<HashMap<ContainerId, ContainerEvent>>,
}

impl fmt::Debug for MetadataCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataCache")
            .field("bootstrap", &self.bootstrap.get())
            .field("entries", &self.lock().len())
            .finish_non_exhaustive()
    }
}

impl MetadataCache {
    /// Creates a cache that enumerates existing containers on first access.
    ///
    /// Concurrent first accesses block until the single enumeration is done.
    /// An enumeration failure is logged and leaves the cache empty; see
    /// [`is_degraded`](Self::is_degraded).
    #[must_use]
    pub fn lazy(introspector: Arc<dyn RuntimeIntrospector>) -> Self {
        Self {
            introspector,
            bootstrap: OnceLock::new(),
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Creates a cache and enumerates existing containers immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ContrailError::Bootstrap`] if the enumeration fails.
    pub fn bootstrap(introspector: Arc<dyn RuntimeIntrospector>) -> Result<Self> {
        let containers = introspector
            .list_containers()
            .map_err(|e| ContrailError::Bootstrap {
                message: e.to_string(),
            })?;
        let cache = Self::lazy(introspector);
        let seeded = cache.seed(containers);
        let _ = cache.bootstrap.set(BootstrapOutcome::Seeded(seeded));
        tracing::info!(seeded, "metadata cache bootstrapped");
        Ok(cache)
    }

    /// Creates a cache using the configured bootstrap mode.
    ///
    /// # Errors
    ///
    /// Returns an error only in [`BootstrapMode::Eager`], if enumeration fails.
    pub fn from_config(
        config: &ContrailConfig,
        introspector: Arc<dyn RuntimeIntrospector>,
    ) -> Result<Self> {
        match config.bootstrap {
            BootstrapMode::Lazy => Ok(Self::lazy(introspector)),
            BootstrapMode::Eager => Self::bootstrap(introspector),
        }
    }

    /// Returns the cached entry for `id`, resolving it from the runtime on a miss.
    ///
    /// # Errors
    ///
    /// Returns the introspector's error if the container is not cached and
    /// cannot be resolved. Nothing is cached in that case.
    pub fn get(&self, id: &ContainerId) -> Result<ContainerEvent> {
        let _ = self.ensure_bootstrapped();
        let cached = self.lock().get(id).cloned();
        if let Some(event) = cached {
            return Ok(event);
        }

        tracing::debug!(id = %id, "metadata cache miss, resolving container");
        let meta = self.introspector.get_container(id)?;
        let resolved = ContainerEvent::from_metadata(&meta);
        // A transition recorded while the lookup ran is newer than static metadata.
        let event = self.lock().entry(id.clone()).or_insert(resolved).clone();
        Ok(event)
    }

    /// Returns the cached entry for `id` without consulting the runtime.
    #[must_use]
    pub fn peek(&self, id: &ContainerId) -> Option<ContainerEvent> {
        let _ = self.ensure_bootstrapped();
        self.lock().get(id).cloned()
    }

    /// Records the latest known event for `id`, replacing any previous entry.
    pub fn put(&self, id: ContainerId, event: ContainerEvent) {
        let _ = self.ensure_bootstrapped();
        let _ = self.lock().insert(id, event);
    }

    /// Returns all entries sorted by container ID.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(ContainerId, ContainerEvent)> {
        let _ = self.ensure_bootstrapped();
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(id, event)| (id.clone(), event.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        let _ = self.ensure_bootstrapped();
        self.lock().len()
    }

    /// Returns whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Outcome of the bootstrap, or `None` if it has not run yet.
    #[must_use]
    pub fn bootstrap_outcome(&self) -> Option<BootstrapOutcome> {
        self.bootstrap.get().copied()
    }

    /// Returns whether the bootstrap enumeration failed.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        matches!(self.bootstrap.get(), Some(BootstrapOutcome::Degraded))
    }

    fn ensure_bootstrapped(&self) -> BootstrapOutcome {
        *self.bootstrap.get_or_init(|| match self.introspector.list_containers() {
            Ok(containers) => {
                let seeded = self.seed(containers);
                tracing::info!(seeded, "metadata cache bootstrapped");
                BootstrapOutcome::Seeded(seeded)
            }
            Err(e) => {
                tracing::warn!(error = %e, "metadata cache bootstrap failed, starting empty");
                BootstrapOutcome::Degraded
            }
        })
    }

    fn seed(&self, containers: Vec<ContainerMetadata>) -> usize {
        let mut entries = self.lock();
        let count = containers.len();
        for meta in containers {
            let event = ContainerEvent::from_enumeration(&meta);
            let _ = entries.entry(meta.id).or_insert(event);
        }
        count
    }

    // Entries are plain data, so a panic mid-update cannot break an invariant.
    fn lock(&self) -> MutexGuard<'_, HashMap<ContainerId, ContainerEvent>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use contrail_common::types::{EventPhase, ImageId};

    use super::*;

    #[derive(Default)]
    struct FakeRuntime {
        containers: Vec<ContainerMetadata>,
        fail_list: bool,
        lists: AtomicUsize,
        gets: AtomicUsize,
    }

    fn meta(id: &str, name: &str) -> ContainerMetadata {
        ContainerMetadata {
            id: ContainerId::new(id),
            name: name.into(),
            image_id: ImageId::new(format!("sha256:{id}-image")),
            image_ref: format!("{name}:latest"),
        }
    }

    impl RuntimeIntrospector for FakeRuntime {
        fn list_containers(&self) -> Result<Vec<ContainerMetadata>> {
            let _ = self.lists.fetch_add(1, Ordering::SeqCst);
            if self.fail_list {
                return Err(ContrailError::Config {
                    message: "runtime unavailable".into(),
                });
            }
            Ok(self.containers.clone())
        }

        fn get_container(&self, id: &ContainerId) -> Result<ContainerMetadata> {
            let _ = self.gets.fetch_add(1, Ordering::SeqCst);
            self.containers
                .iter()
                .find(|m| m.id == *id)
                .cloned()
                .ok_or_else(|| ContrailError::NotFound {
                    kind: "container",
                    id: id.to_string(),
                })
        }
    }

    #[test]
    fn lazy_cache_does_not_bootstrap_until_used() {
        let runtime = Arc::new(FakeRuntime::default());
        let cache = MetadataCache::lazy(runtime.clone());
        assert_eq!(cache.bootstrap_outcome(), None);
        assert_eq!(runtime.lists.load(Ordering::SeqCst), 0);

        cache.put(ContainerId::new("c1"), ContainerEvent::new(EventPhase::Created));
        assert_eq!(cache.bootstrap_outcome(), Some(BootstrapOutcome::Seeded(0)));
        assert_eq!(runtime.lists.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn bootstrap_seeds_unknown_entries() {
        let runtime = Arc::new(FakeRuntime {
            containers: vec![meta("c1", "web"), meta("c2", "db")],
            ..FakeRuntime::default()
        });
        let cache = MetadataCache::bootstrap(runtime.clone()).expect("bootstrap");
        assert_eq!(cache.len(), 2);

        let entry = cache.peek(&ContainerId::new("c2")).expect("seeded");
        assert_eq!(entry.phase, EventPhase::Unknown);
        assert_eq!(entry.name, "db");
        assert_eq!(entry.image_id, "sha256:c2-image");
        assert_eq!(entry.image_name, "db:latest");
        assert_eq!(runtime.lists.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lazy_bootstrap_keeps_digest_prefix_but_lookup_strips_it() {
        let runtime = Arc::new(FakeRuntime {
            containers: vec![meta("c1", "web")],
            ..FakeRuntime::default()
        });
        let cache = MetadataCache::lazy(runtime.clone());
        let seeded = cache.peek(&ContainerId::new("c1")).expect("seeded");
        assert_eq!(seeded.image_id, "sha256:c1-image");

        let degraded = MetadataCache::lazy(Arc::new(FakeRuntime {
            containers: vec![meta("c1", "web")],
            fail_list: true,
            ..FakeRuntime::default()
        }));
        let resolved = degraded.get(&ContainerId::new("c1")).expect("lookup");
        assert_eq!(resolved.image_id, "c1-image");
    }

    #[test]
    fn eager_bootstrap_failure_is_returned() {
        let runtime = Arc::new(FakeRuntime {
            fail_list: true,
            ..FakeRuntime::default()
        });
        let err = MetadataCache::bootstrap(runtime).unwrap_err();
        assert!(matches!(err, ContrailError::Bootstrap { .. }));
    }

    #[test]
    fn lazy_bootstrap_failure_degrades_to_lookups() {
        let runtime = Arc::new(FakeRuntime {
            containers: vec![meta("c1", "web")],
            fail_list: true,
            ..FakeRuntime::default()
        });
        let cache = MetadataCache::lazy(runtime.clone());

        let entry = cache.get(&ContainerId::new("c1")).expect("lookup");
        assert!(cache.is_degraded());
        assert_eq!(entry.name, "web");
        assert_eq!(runtime.gets.load(Ordering::SeqCst), 1);

        let _ = cache.get(&ContainerId::new("c1")).expect("cached");
        assert_eq!(runtime.lists.load(Ordering::SeqCst), 1);
        assert_eq!(runtime.gets.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_lookup_caches_nothing() {
        let runtime = Arc::new(FakeRuntime::default());
        let cache = MetadataCache::lazy(runtime);
        let err = cache.get(&ContainerId::new("ghost")).unwrap_err();
        assert!(matches!(err, ContrailError::NotFound { .. }));
        assert!(cache.is_empty());
    }

    #[test]
    fn put_replaces_entry() {
        let cache = MetadataCache::lazy(Arc::new(FakeRuntime::default()));
        let id = ContainerId::new("c1");
        cache.put(id.clone(), ContainerEvent::new(EventPhase::Created));
        cache.put(id.clone(), ContainerEvent::new(EventPhase::Running));
        assert_eq!(cache.peek(&id).map(|e| e.phase), Some(EventPhase::Running));
    }

    #[test]
    fn from_config_selects_mode() {
        let config = ContrailConfig {
            bootstrap: BootstrapMode::Eager,
            ..ContrailConfig::default()
        };
        let runtime = Arc::new(FakeRuntime::default());
        let cache = MetadataCache::from_config(&config, runtime).expect("eager");
        assert_eq!(cache.bootstrap_outcome(), Some(BootstrapOutcome::Seeded(0)));
    }
}
