// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the engine.
//!
//! [`TraceSink`] has one method per event with no-op defaults, so sinks
//! implement only the events they care about. [`Tracer`] wraps an optional
//! shared sink; every method is a single `Option` branch when tracing is
//! off.
//!
//! Concrete sinks live in `parallax_debug` (pretty printer, recorder with
//! JSON export). Sinks may be called from the service's callback thread and
//! from the render context concurrently, hence `Send + Sync`.

use core::fmt;
use std::sync::Arc;

use crate::camera::CameraMode;
use crate::event::TrackingEventKind;
use crate::pose::{FramePair, PoseTimestamp};
use crate::session::SessionState;

/// Why the cache refused a pose delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoseDropReason {
    /// The accept gate was closed (disconnect/destroy in progress).
    GateClosed,
    /// The pose was older than the cached pose for the same frame pair.
    Stale,
}

impl PoseDropReason {
    /// Short label for diagnostics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GateClosed => "gate-closed",
            Self::Stale => "stale",
        }
    }
}

/// Emitted on every session state transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTransition {
    /// State before the transition.
    pub from: SessionState,
    /// State after the transition.
    pub to: SessionState,
}

/// Emitted when the cache accepts or drops a pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseUpdate {
    /// Timestamp of the delivered pose.
    pub timestamp: PoseTimestamp,
    /// Frame pair of the delivered pose.
    pub frames: FramePair,
}

/// Emitted when the cache stores a tracking event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingEventRecord {
    /// Kind of the stored event.
    pub kind: TrackingEventKind,
    /// Timestamp of the stored event.
    pub timestamp: PoseTimestamp,
}

/// Emitted once per rendered (or skipped) frame by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRender {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Whether a pose was available for this frame.
    pub had_pose: bool,
    /// Camera mode the frame was built for.
    pub camera_mode: CameraMode,
    /// Whether the renderer drew the frame (false: draw error, frame
    /// skipped).
    pub drawn: bool,
}

/// Which gesture the input router derived from a touch batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GestureKind {
    /// One-pointer drag: orbit.
    Orbit,
    /// Two-pointer pinch: zoom.
    Pinch,
    /// Two-pointer drag: pan.
    Pan,
    /// Explicit camera-mode selection.
    ModeSelect,
}

/// Emitted when the input router applies a gesture to the rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GestureEvent {
    /// The derived gesture.
    pub kind: GestureKind,
    /// Camera mode after the gesture.
    pub camera_mode: CameraMode,
}

/// Receives engine trace events. All methods default to no-ops.
pub trait TraceSink: Send + Sync {
    /// The session controller changed state.
    fn on_session_transition(&self, event: &SessionTransition) {
        let _ = event;
    }

    /// The cache stored a pose.
    fn on_pose_accepted(&self, event: &PoseUpdate) {
        let _ = event;
    }

    /// The cache refused a pose.
    fn on_pose_dropped(&self, event: &PoseUpdate, reason: PoseDropReason) {
        let _ = (event, reason);
    }

    /// The cache stored a tracking event.
    fn on_tracking_event(&self, event: &TrackingEventRecord) {
        let _ = event;
    }

    /// The frame loop finished a frame.
    fn on_frame_rendered(&self, event: &FrameRender) {
        let _ = event;
    }

    /// The input router applied a gesture.
    fn on_gesture(&self, event: &GestureEvent) {
        let _ = event;
    }
}

/// Cheap, cloneable handle to an optional [`TraceSink`].
///
/// Always compiled in, no feature gate; every method is one branch when
/// disabled and none of these paths are per-frame hot loops.
#[derive(Clone, Default)]
pub struct Tracer {
    sink: Option<Arc<dyn TraceSink>>,
}

impl fmt::Debug for Tracer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracer(enabled: {})", self.sink.is_some())
    }
}

impl Tracer {
    /// A tracer that forwards to `sink`.
    #[must_use]
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink: Some(sink) }
    }

    /// A tracer that drops every event.
    #[must_use]
    pub fn disabled() -> Self {
        Self { sink: None }
    }

    /// Whether a sink is attached.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Reports a session transition.
    pub fn session_transition(&self, event: SessionTransition) {
        if let Some(sink) = &self.sink {
            sink.on_session_transition(&event);
        }
    }

    /// Reports an accepted pose.
    pub fn pose_accepted(&self, event: PoseUpdate) {
        if let Some(sink) = &self.sink {
            sink.on_pose_accepted(&event);
        }
    }

    /// Reports a dropped pose.
    pub fn pose_dropped(&self, event: PoseUpdate, reason: PoseDropReason) {
        if let Some(sink) = &self.sink {
            sink.on_pose_dropped(&event, reason);
        }
    }

    /// Reports a stored tracking event.
    pub fn tracking_event(&self, event: TrackingEventRecord) {
        if let Some(sink) = &self.sink {
            sink.on_tracking_event(&event);
        }
    }

    /// Reports a finished frame.
    pub fn frame_rendered(&self, event: FrameRender) {
        if let Some(sink) = &self.sink {
            sink.on_frame_rendered(&event);
        }
    }

    /// Reports an applied gesture.
    pub fn gesture(&self, event: GestureEvent) {
        if let Some(sink) = &self.sink {
            sink.on_gesture(&event);
        }
    }
}
