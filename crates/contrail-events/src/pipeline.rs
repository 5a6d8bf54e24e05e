//! Single-consumer reconciliation stage.
//!
//! Runs one [`EventTranslator`] on a blocking task fed by a channel. Having
//! exactly one consumer keeps notifications for each container in arrival
//! order, which the pairing logic depends on.

use contrail_common::config::InvalidPhasePolicy;
use contrail_common::error::{ContrailError, Result};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::envelope::Envelope;
use crate::notification::RawContainerNotification;
use crate::translator::EventTranslator;

/// Counters reported when the notification stream ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Notifications read from the input channel.
    pub received: u64,
    /// Envelopes forwarded downstream.
    pub emitted: u64,
    /// Notifications buffered awaiting their duplicate.
    pub suppressed: u64,
    /// Notifications dropped for an unrecognized phase tag.
    pub skipped: u64,
}

/// Spawns the reconciliation stage.
///
/// The task ends when the notification channel closes and resolves to the
/// run's counters.
///
/// # Errors
///
/// The task resolves to an error if the envelope receiver is dropped, or
/// on an unrecognized phase tag under [`InvalidPhasePolicy::Abort`].
pub fn spawn(
    mut translator: EventTranslator,
    mut notifications: mpsc::Receiver<RawContainerNotification>,
    envelopes: mpsc::Sender<Envelope>,
    policy: InvalidPhasePolicy,
) -> JoinHandle<Result<PipelineStats>> {
    tokio::task::spawn_blocking(move || {
        let mut stats = PipelineStats::default();
        while let Some(notification) = notifications.blocking_recv() {
            stats.received += 1;
            match translator.translate(&notification) {
                Ok(Some(envelope)) => {
                    envelopes
                        .blocking_send(envelope)
                        .map_err(|_| ContrailError::ChannelClosed)?;
                    stats.emitted += 1;
                }
                Ok(None) => stats.suppressed += 1,
                Err(ContrailError::UnrecognizedPhase { tag })
                    if policy == InvalidPhasePolicy::Skip =>
                {
                    tracing::warn!(id = %notification.id, tag = %tag, "skipping notification with unrecognized phase");
                    stats.skipped += 1;
                }
                Err(e) => {
                    tracing::error!(id = %notification.id, error = %e, "aborting notification stream");
                    return Err(e);
                }
            }
        }
        tracing::info!(
            received = stats.received,
            emitted = stats.emitted,
            pending = translator.pending(),
            "notification stream drained"
        );
        Ok(stats)
    })
}
