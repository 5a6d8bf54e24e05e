//! # contrail-events
//!
//! Reconciles raw, duplicated container lifecycle notifications into a
//! single canonical event stream.
//!
//! Two runtime subsystems report the same container transitions
//! independently. This crate pairs their duplicate `created` and `started`
//! notifications, keeps a metadata cache seeded from the runtime, and wraps
//! every canonical event in an [`Envelope`](envelope::Envelope):
//!
//! ```text
//!  RawContainerNotification
//!            │
//!            ▼
//!   ┌──────────────────┐     ┌──────────────┐
//!   │ EventTranslator  │◄───►│ MergeBuffers │
//!   │                  │     └──────────────┘
//!   │                  │     ┌───────────────┐    ┌────────────────────┐
//!   │                  │◄───►│ MetadataCache │───►│ RuntimeIntrospector│
//!   └────────┬─────────┘     └───────────────┘    └────────────────────┘
//!            ▼
//!        Envelope
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use contrail_events::cache::MetadataCache;
//! use contrail_events::notification::{NotificationPhase, RawContainerNotification};
//! use contrail_events::translator::EventTranslator;
//! use contrail_runtime::docker::DockerStateDir;
//!
//! let introspector = Arc::new(DockerStateDir::new("/var/lib/docker".into()));
//! let cache = Arc::new(MetadataCache::lazy(introspector));
//! let mut translator = EventTranslator::new(cache);
//!
//! let stopped = RawContainerNotification::new("c1", NotificationPhase::Stopped).with_exit_code(137);
//! let envelope = translator.translate(&stopped)?;
//! assert!(envelope.is_some());
//! # Ok::<(), contrail_common::error::ContrailError>(())
//! ```

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod cache;
pub mod envelope;
pub mod event;
pub mod merge;
pub mod notification;
pub mod pipeline;
pub mod translator;
