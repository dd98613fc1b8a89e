// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session lifecycle around the tracking service.
//!
//! The [`SessionController`] owns the [`TrackingService`] collaborator and
//! gates every call to it behind a state machine:
//!
//! ```text
//! Uninitialized ──configure──► Configured ──connect──► Connected
//!                                                        │   ▲ │
//!                                             disconnect │   │ │ reset_tracking
//!                                                        ▼   │ ▼
//!                                                   Disconnected ──destroy──► Destroyed
//! ```
//!
//! `connect`/`disconnect` are re-entrant between `Connected` and
//! `Disconnected`; `reset_tracking` is a self-loop on `Connected`; `destroy`
//! is terminal from anywhere.
//!
//! # Serialization
//!
//! All transitions run under one `Mutex`, so `connect`, `disconnect`,
//! `reset_tracking`, and `destroy` never interleave. Pose deliveries race
//! transitions freely: the controller closes the cache's accept gate
//! *before* tearing the service down, so late callbacks are dropped at the
//! cache boundary instead of being synchronized against. No lock ordering
//! ever requires a pose callback to wait on the transition lock.

use std::sync::Arc;

use core::fmt;

use parking_lot::Mutex;
use thiserror::Error;

use crate::cache::TransformCache;
use crate::event::{TrackingEvent, TrackingEventKind};
use crate::service::{ServiceError, TrackingService};
use crate::trace::{SessionTransition, Tracer};

/// Session lifecycle state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No configuration exists yet.
    Uninitialized,
    /// Configured but not connected.
    Configured,
    /// Pose pipeline running.
    Connected,
    /// Torn down but reconnectable.
    Disconnected,
    /// Terminal; every further operation fails.
    Destroyed,
}

impl SessionState {
    /// Short label for diagnostics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Configured => "configured",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
            Self::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Session configuration handed to the service at `configure` time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Ask the service to recover from tracking loss on its own instead of
    /// surfacing a fatal event.
    pub auto_recovery: bool,
}

impl Default for SessionConfig {
    /// Auto-recovery on.
    fn default() -> Self {
        Self {
            auto_recovery: true,
        }
    }
}

/// Errors returned synchronously by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The installed service is older than the required version.
    #[error("tracking service api {installed} is older than required {required}")]
    Incompatible {
        /// Version reported by the service.
        installed: u32,
        /// Minimum version the caller demanded.
        required: u32,
    },
    /// The operation is not allowed from the current state.
    #[error("cannot {operation} while {from}")]
    InvalidTransition {
        /// State the session was in.
        from: SessionState,
        /// Name of the rejected operation.
        operation: &'static str,
    },
    /// The session was destroyed; no operation can succeed.
    #[error("session is destroyed")]
    Destroyed,
    /// The service itself failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Sentinel shown when the service version cannot be queried.
pub const VERSION_UNAVAILABLE: &str = "version unavailable";

struct Inner {
    state: SessionState,
    config: Option<SessionConfig>,
    service: Box<dyn TrackingService>,
}

/// Orchestrates connect/disconnect/reset of the tracking session.
///
/// Owns the service collaborator and the shared [`TransformCache`]; hands
/// the cache to the service as the pose listener on `connect`.
pub struct SessionController {
    inner: Mutex<Inner>,
    cache: Arc<TransformCache>,
    tracer: Tracer,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates a controller in `Uninitialized` over the given service.
    #[must_use]
    pub fn new(service: Box<dyn TrackingService>) -> Self {
        Self::with_tracer(service, Tracer::disabled())
    }

    /// Creates a controller that reports to the given trace sink.
    #[must_use]
    pub fn with_tracer(service: Box<dyn TrackingService>, tracer: Tracer) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Uninitialized,
                config: None,
                service,
            }),
            cache: Arc::new(TransformCache::with_tracer(tracer.clone())),
            tracer,
        }
    }

    /// The shared transform cache. Clone the `Arc` for the frame loop and
    /// the debug UI.
    #[must_use]
    pub fn cache(&self) -> Arc<TransformCache> {
        Arc::clone(&self.cache)
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// The active configuration, once [`configure`](Self::configure) has
    /// succeeded.
    #[must_use]
    pub fn config(&self) -> Option<SessionConfig> {
        self.inner.lock().config
    }

    /// Whether the installed service is at least `min_api`.
    ///
    /// Fails closed: an absent or unqueryable service is incompatible.
    /// Callable from any state except `Destroyed`.
    #[must_use]
    pub fn check_compatibility(&self, min_api: u32) -> bool {
        let inner = self.inner.lock();
        if inner.state == SessionState::Destroyed {
            return false;
        }
        match inner.service.version() {
            Ok(version) => version.api >= min_api,
            Err(_) => false,
        }
    }

    /// Service version string for the debug UI.
    #[must_use]
    pub fn version_string(&self) -> String {
        let inner = self.inner.lock();
        if inner.state == SessionState::Destroyed {
            return VERSION_UNAVAILABLE.to_owned();
        }
        match inner.service.version() {
            Ok(version) => version.to_string(),
            Err(_) => VERSION_UNAVAILABLE.to_owned(),
        }
    }

    /// Builds the session configuration. Only valid in `Uninitialized`.
    pub fn configure(&self, config: SessionConfig) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Uninitialized => {}
            SessionState::Destroyed => return Err(SessionError::Destroyed),
            from => {
                return Err(SessionError::InvalidTransition {
                    from,
                    operation: "configure",
                });
            }
        }
        inner.service.configure(&config)?;
        inner.config = Some(config);
        self.transition(&mut inner, SessionState::Configured);
        Ok(())
    }

    /// Starts the pose pipeline. Valid from `Configured` and
    /// `Disconnected`; a no-op returning `Ok(true)` when already
    /// `Connected`.
    ///
    /// Cached pose and event state from a previous connection is discarded
    /// before delivery resumes; in particular, the fatal event that forced
    /// a disconnect does not survive into the fresh session.
    pub fn connect(&self) -> Result<bool, SessionError> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Connected => return Ok(true),
            SessionState::Configured | SessionState::Disconnected => {}
            SessionState::Destroyed => return Err(SessionError::Destroyed),
            from => {
                return Err(SessionError::InvalidTransition {
                    from,
                    operation: "connect",
                });
            }
        }
        let listener: Arc<TransformCache> = Arc::clone(&self.cache);
        // Discard leftovers before the gate opens so nothing delivered by
        // the fresh session can be wiped.
        self.cache.clear();
        self.cache.set_accepting(true);
        if let Err(err) = inner.service.start(listener) {
            // Failed starts leave the gate closed and the state unchanged.
            self.cache.set_accepting(false);
            return Err(err.into());
        }
        self.transition(&mut inner, SessionState::Connected);
        Ok(true)
    }

    /// Stops the pipeline and releases session resources. Safe to call
    /// repeatedly from any live state; a no-op before `configure` has
    /// applied a config, so an unconfigured session stays unconfigured.
    pub fn disconnect(&self) {
        let mut inner = self.inner.lock();
        if matches!(
            inner.state,
            SessionState::Destroyed | SessionState::Uninitialized
        ) {
            return;
        }
        // Gate first: pose callbacks racing this teardown are dropped at
        // the cache, not synchronized against.
        self.cache.set_accepting(false);
        inner.service.stop();
        if inner.state != SessionState::Disconnected {
            self.transition(&mut inner, SessionState::Disconnected);
        }
    }

    /// Re-initializes pose estimation without tearing down the session.
    ///
    /// Clears the cache, so `latest_pose_text` reports the unavailable
    /// sentinel until the next pose arrives. Only valid in `Connected`.
    pub fn reset_tracking(&self) -> Result<(), SessionError> {
        let mut inner = self.inner.lock();
        match inner.state {
            SessionState::Connected => {}
            SessionState::Destroyed => return Err(SessionError::Destroyed),
            from => {
                return Err(SessionError::InvalidTransition {
                    from,
                    operation: "reset_tracking",
                });
            }
        }
        inner.service.reset()?;
        self.cache.clear();
        self.transition(&mut inner, SessionState::Connected);
        Ok(())
    }

    /// Terminal teardown. Invalidates the session; all further operations
    /// fail with [`SessionError::Destroyed`].
    pub fn destroy(&self) {
        let mut inner = self.inner.lock();
        if inner.state == SessionState::Destroyed {
            return;
        }
        self.cache.set_accepting(false);
        inner.service.stop();
        inner.service.shutdown();
        self.transition(&mut inner, SessionState::Destroyed);
    }

    /// Polls the latest tracking event and applies the failure policy.
    ///
    /// Meant to be called once per frame from the render/UI context. A
    /// [`FatalError`](TrackingEventKind::FatalError) event forces
    /// [`disconnect`](Self::disconnect); recoverable events are returned
    /// for display only. Returns the event that was inspected, if any.
    pub fn process_tracking_events(&self) -> Option<TrackingEvent> {
        let event = self.cache.latest_event()?;
        if event.kind == TrackingEventKind::FatalError && self.state() == SessionState::Connected {
            self.disconnect();
        }
        Some(event)
    }

    fn transition(&self, inner: &mut Inner, to: SessionState) {
        let from = inner.state;
        inner.state = to;
        self.tracer.session_transition(SessionTransition {
            from,
            to,
        });
    }
}
