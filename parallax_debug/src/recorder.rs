// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory event recording.
//!
//! [`RecorderSink`] implements [`TraceSink`] and stores every event as an
//! owned [`RecordedEvent`], in arrival order. Events arrive from the
//! service's callback thread and the render context concurrently; the
//! record list is behind a mutex held only for the push.

use parking_lot::Mutex;

use parallax_core::trace::{
    FrameRender, GestureEvent, PoseDropReason, PoseUpdate, SessionTransition, TraceSink,
    TrackingEventRecord,
};

/// One recorded trace event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecordedEvent {
    /// Session controller state change.
    SessionTransition(SessionTransition),
    /// Pose stored by the cache.
    PoseAccepted(PoseUpdate),
    /// Pose refused by the cache.
    PoseDropped(PoseUpdate, PoseDropReason),
    /// Tracking event stored by the cache.
    TrackingEvent(TrackingEventRecord),
    /// Frame finished by the frame loop.
    FrameRendered(FrameRender),
    /// Gesture applied by the input router.
    Gesture(GestureEvent),
}

/// A [`TraceSink`] that collects owned events in memory.
#[derive(Debug, Default)]
pub struct RecorderSink {
    records: Mutex<Vec<RecordedEvent>>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of everything recorded so far, in arrival order.
    #[must_use]
    pub fn records(&self) -> Vec<RecordedEvent> {
        self.records.lock().clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Discards all records.
    pub fn clear(&self) {
        self.records.lock().clear();
    }

    fn push(&self, record: RecordedEvent) {
        self.records.lock().push(record);
    }
}

impl TraceSink for RecorderSink {
    fn on_session_transition(&self, event: &SessionTransition) {
        self.push(RecordedEvent::SessionTransition(*event));
    }

    fn on_pose_accepted(&self, event: &PoseUpdate) {
        self.push(RecordedEvent::PoseAccepted(*event));
    }

    fn on_pose_dropped(&self, event: &PoseUpdate, reason: PoseDropReason) {
        self.push(RecordedEvent::PoseDropped(*event, reason));
    }

    fn on_tracking_event(&self, event: &TrackingEventRecord) {
        self.push(RecordedEvent::TrackingEvent(*event));
    }

    fn on_frame_rendered(&self, event: &FrameRender) {
        self.push(RecordedEvent::FrameRendered(*event));
    }

    fn on_gesture(&self, event: &GestureEvent) {
        self.push(RecordedEvent::Gesture(*event));
    }
}
