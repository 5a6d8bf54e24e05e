//! Runtime introspection for the contrail reconciler.
//!
//! The reconciler never talks to a container runtime directly. It asks a
//! [`RuntimeIntrospector`](introspect::RuntimeIntrospector) which containers
//! exist and what image and name a given container was declared with.

#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod docker;
pub mod introspect;
