//! In-flight buffers pairing duplicate `created` and `started` notifications.
//!
//! Both runtime subsystems report these two transitions, so every container
//! produces two notifications for each. The first is parked here until the
//! second arrives; the entry is gone once the merged event is emitted.

use std::collections::HashMap;

use contrail_common::types::ContainerId;

use crate::event::ContainerEvent;

/// Transition whose notifications arrive in pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeKind {
    /// Paired `created` notifications.
    Created,
    /// Paired `started` notifications.
    Started,
}

/// Per-container holding area for the first notification of a pair.
///
/// Not synchronized. The owning translator is the single writer.
#[derive(Debug, Default)]
pub struct MergeBuffers {
    created: HashMap<ContainerId, ContainerEvent>,
    started: HashMap<ContainerId, ContainerEvent>,
}

impl MergeBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn buffer_mut(&mut self, kind: MergeKind) -> &mut HashMap<ContainerId, ContainerEvent> {
        match kind {
            MergeKind::Created => &mut self.created,
            MergeKind::Started => &mut self.started,
        }
    }

    /// Removes and returns the in-flight event for `id`, if any.
    pub fn take(&mut self, kind: MergeKind, id: &ContainerId) -> Option<ContainerEvent> {
        self.buffer_mut(kind).remove(id)
    }

    /// Parks the first event of a pair.
    pub fn hold(&mut self, kind: MergeKind, id: ContainerId, event: ContainerEvent) {
        if self.buffer_mut(kind).insert(id.clone(), event).is_some() {
            tracing::warn!(id = %id, ?kind, "replaced an in-flight merge entry");
        }
    }

    /// Returns whether `id` has an in-flight entry of the given kind.
    #[must_use]
    pub fn is_pending(&self, kind: MergeKind, id: &ContainerId) -> bool {
        match kind {
            MergeKind::Created => self.created.contains_key(id),
            MergeKind::Started => self.started.contains_key(id),
        }
    }

    /// Total number of in-flight entries across both buffers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.created.len() + self.started.len()
    }
}

#[cfg(test)]
mod tests {
    use contrail_common::types::EventPhase;

    use super::*;

    #[test]
    fn hold_then_take_empties_buffer() {
        let mut buffers = MergeBuffers::new();
        let id = ContainerId::new("c1");
        buffers.hold(MergeKind::Created, id.clone(), ContainerEvent::new(EventPhase::Created));
        assert!(buffers.is_pending(MergeKind::Created, &id));
        assert_eq!(buffers.pending(), 1);

        let event = buffers.take(MergeKind::Created, &id).expect("in flight");
        assert_eq!(event.phase, EventPhase::Created);
        assert_eq!(buffers.pending(), 0);
        assert!(buffers.take(MergeKind::Created, &id).is_none());
    }

    #[test]
    fn kinds_are_independent() {
        let mut buffers = MergeBuffers::new();
        let id = ContainerId::new("c1");
        buffers.hold(MergeKind::Started, id.clone(), ContainerEvent::new(EventPhase::Running));
        assert!(!buffers.is_pending(MergeKind::Created, &id));
        assert!(buffers.take(MergeKind::Created, &id).is_none());
        assert!(buffers.is_pending(MergeKind::Started, &id));
    }
}
