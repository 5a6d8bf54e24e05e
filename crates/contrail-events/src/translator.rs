//! Raw notification to canonical event translation.
//!
//! Per phase:
//!   created → buffered on first sight, emitted as `Created` on the second
//!   started → buffered on first sight, emitted as `Running` on the second
//!   stopped → `Exited`, always emitted
//!   removed → `Destroyed`, always emitted, cache untouched
//!
//! Notifications for one container must arrive in order; the pairing logic
//! treats the first of each pair differently from the second.

use std::sync::Arc;

use contrail_common::error::Result;
use contrail_common::types::{ContainerId, EventPhase};

use crate::cache::MetadataCache;
use crate::envelope::{Envelope, EventStamp, build_envelope};
use crate::event::ContainerEvent;
use crate::merge::{MergeBuffers, MergeKind};
use crate::notification::{NotificationPhase, RawContainerNotification};

/// Stateful translator from raw notifications to envelopes.
///
/// Owns the merge buffers, so `translate` takes `&mut self`: a translator
/// is the single writer for the containers it sees. The metadata cache is
/// shared and may be read concurrently by other components.
#[derive(Debug)]
pub struct EventTranslator {
    cache: Arc<MetadataCache>,
    buffers: MergeBuffers,
}

impl EventTranslator {
    /// Creates a translator with empty merge buffers.
    #[must_use]
    pub fn new(cache: Arc<MetadataCache>) -> Self {
        Self {
            cache,
            buffers: MergeBuffers::new(),
        }
    }

    /// Returns the shared metadata cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<MetadataCache> {
        &self.cache
    }

    /// Number of notifications waiting for their duplicate.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffers.pending()
    }

    /// Returns whether `id` has a buffered notification of the given kind.
    #[must_use]
    pub fn is_pending(&self, kind: MergeKind, id: &ContainerId) -> bool {
        self.buffers.is_pending(kind, id)
    }

    /// Translates one notification.
    ///
    /// Returns `Ok(None)` when the notification was buffered awaiting its
    /// duplicate.
    ///
    /// # Errors
    ///
    /// Returns [`ContrailError::UnrecognizedPhase`](contrail_common::error::ContrailError::UnrecognizedPhase)
    /// if the phase tag is unknown. Buffers and cache are left untouched.
    pub fn translate(&mut self, notification: &RawContainerNotification) -> Result<Option<Envelope>> {
        let phase = notification.phase()?;
        let id = &notification.id;

        let event = match phase {
            NotificationPhase::Created => self.on_created(notification),
            NotificationPhase::Started => self.on_started(notification),
            NotificationPhase::Stopped => Some(exited_event(notification)),
            NotificationPhase::Removed => {
                tracing::debug!(id = %id, "container destroyed");
                let event = ContainerEvent::new(EventPhase::Destroyed);
                return Ok(Some(build_envelope(id, event, EventStamp::now())));
            }
        };

        let Some(mut event) = event else {
            tracing::debug!(id = %id, %phase, "buffered first notification of pair");
            return Ok(None);
        };

        if phase == NotificationPhase::Created {
            event.merge_docker_config_longest(&notification.docker_config);
        } else {
            event.overwrite_docker_config(&notification.docker_config);
        }
        event.overwrite_oci_config(&notification.oci_config);

        self.cache.put(id.clone(), event.clone());
        tracing::debug!(id = %id, phase = %event.phase, "emitting container event");
        Ok(Some(build_envelope(id, event, EventStamp::now())))
    }

    fn on_created(&mut self, n: &RawContainerNotification) -> Option<ContainerEvent> {
        if let Some(mut event) = self.buffers.take(MergeKind::Created, &n.id) {
            event.merge_docker_config_longest(&n.docker_config);
            return Some(event);
        }

        let mut event = ContainerEvent {
            phase: EventPhase::Created,
            name: n.name.clone(),
            image_id: n.image_id.clone(),
            image_name: n.image_name.clone(),
            ..ContainerEvent::default()
        };
        event.merge_docker_config_longest(&n.docker_config);
        event.overwrite_oci_config(&n.oci_config);
        self.cache.put(n.id.clone(), event.clone());
        self.buffers.hold(MergeKind::Created, n.id.clone(), event);
        None
    }

    fn on_started(&mut self, n: &RawContainerNotification) -> Option<ContainerEvent> {
        let buffered = self.buffers.take(MergeKind::Started, &n.id);
        let second = buffered.is_some();
        let mut event = buffered.unwrap_or_else(|| ContainerEvent::new(EventPhase::Running));

        event.overwrite_host_pid(n.pid);
        event.overwrite_docker_config(&n.docker_config);
        event.overwrite_oci_config(&n.oci_config);

        if second {
            return Some(event);
        }
        self.cache.put(n.id.clone(), event.clone());
        self.buffers.hold(MergeKind::Started, n.id.clone(), event);
        None
    }
}

fn exited_event(n: &RawContainerNotification) -> ContainerEvent {
    let mut event = ContainerEvent {
        phase: EventPhase::Exited,
        name: n.name.clone(),
        image_id: n.image_id.clone(),
        image_name: n.image_name.clone(),
        exit_code: n.exit_code,
        ..ContainerEvent::default()
    };
    event.overwrite_host_pid(n.pid);
    event.overwrite_docker_config(&n.docker_config);
    event
}
