// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Collaborator contract for pose-tracking services.
//!
//! The tracking engine itself (sensor fusion, motion estimation) is not part
//! of this workspace — it is an external service the session controller
//! drives through [`TrackingService`] and that reports back through a
//! registered [`PoseListener`]. Real integrations wrap a native SDK;
//! `parallax_harness` provides a scripted implementation for tests and
//! demos.
//!
//! # Callback registration
//!
//! The service never learns a concrete consumer type: it receives an
//! `Arc<dyn PoseListener>` at [`start`](TrackingService::start) and delivers
//! poses and events through it from its own thread. The
//! [`TransformCache`](crate::cache::TransformCache) is the listener in the
//! standard wiring.
//!
//! # Threading
//!
//! [`PoseListener`] methods are called from the service's callback thread
//! and must not block. Everything on [`TrackingService`] is called from the
//! session controller under its transition lock; implementations must not
//! call back into the listener synchronously from `stop`/`shutdown` in a way
//! that could wait on a consumer.

use core::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::event::TrackingEvent;
use crate::pose::Pose;
use crate::session::SessionConfig;

/// Receives asynchronous pose and event deliveries from the service.
///
/// Implementations must be cheap and non-blocking; they run on the service's
/// callback thread.
pub trait PoseListener: Send + Sync {
    /// A new pose is available. Latest-wins; there is no delivery queue.
    fn on_pose(&self, pose: Pose);

    /// A lifecycle event occurred.
    fn on_event(&self, event: TrackingEvent);
}

/// Version of the installed tracking service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceVersion {
    /// API version number used for compatibility checks.
    pub api: u32,
    /// Human-readable version string for the debug UI.
    pub description: String,
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (api {})", self.description, self.api)
    }
}

/// Errors reported by a tracking-service implementation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service is not installed or cannot be reached.
    #[error("tracking service unavailable: {0}")]
    Unavailable(String),
    /// The service rejected the call or failed internally.
    #[error("tracking service error: {0}")]
    Internal(String),
}

/// The external pose-tracking service.
///
/// The session controller is the only caller and serializes every call
/// behind its transition lock, so implementations need not be re-entrant.
pub trait TrackingService: Send {
    /// Queries the installed service version.
    ///
    /// Must be callable before any session exists.
    fn version(&self) -> Result<ServiceVersion, ServiceError>;

    /// Applies the session configuration (auto-recovery and friends).
    fn configure(&mut self, config: &SessionConfig) -> Result<(), ServiceError>;

    /// Starts the pose pipeline, delivering to `listener` until
    /// [`stop`](Self::stop).
    fn start(&mut self, listener: Arc<dyn PoseListener>) -> Result<(), ServiceError>;

    /// Stops pose delivery and releases per-session resources. Idempotent.
    fn stop(&mut self);

    /// Re-initializes pose estimation without tearing the session down.
    ///
    /// Only called while started.
    fn reset(&mut self) -> Result<(), ServiceError>;

    /// Releases everything. The service will not be called again.
    fn shutdown(&mut self);
}
