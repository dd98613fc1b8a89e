// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Latest-wins shared snapshot of pose and event state.
//!
//! The [`TransformCache`] is the single piece of state shared between the
//! service's callback thread (writer) and the render/UI context (readers).
//! It holds at most one pose and one event: a single-slot overwrite, not a
//! queue. The newest write always wins and older unread values are silently
//! discarded; only the latest state matters for display.
//!
//! # Atomicity
//!
//! `Pose` is `Copy`; readers take the `RwLock` only long enough to copy the
//! slot out, so they can never observe a torn pose, and writers are blocked
//! only for that bounded copy. No lock is held while formatting or while
//! calling into any other component, so pose delivery can never deadlock
//! against the renderer.
//!
//! # Gate
//!
//! The session controller closes the accept gate before `disconnect` and
//! `destroy` begin tearing the service down, so callbacks that race the
//! teardown are dropped instead of resurrecting stale state.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::event::TrackingEvent;
use crate::pose::{FramePair, Pose};
use crate::service::PoseListener;
use crate::trace::{PoseDropReason, PoseUpdate, Tracer, TrackingEventRecord};

/// Sentinel returned by [`TransformCache::latest_pose_text`] before any pose
/// arrives (and again after [`TransformCache::clear`]).
pub const POSE_UNAVAILABLE: &str = "pose unavailable";

/// Sentinel returned by [`TransformCache::latest_event_text`] before any
/// event arrives.
pub const NO_EVENTS: &str = "no events";

/// Single-writer, multi-reader cache of the most recent pose and event.
#[derive(Debug, Default)]
pub struct TransformCache {
    pose: RwLock<Option<Pose>>,
    event: RwLock<Option<TrackingEvent>>,
    accepting: AtomicBool,
    tracer: Tracer,
}

impl TransformCache {
    /// Creates an empty cache with the accept gate closed.
    ///
    /// The session controller opens the gate on `connect`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that reports accepts and drops to `tracer`.
    #[must_use]
    pub fn with_tracer(tracer: Tracer) -> Self {
        Self {
            tracer,
            ..Self::default()
        }
    }

    /// Opens or closes the accept gate.
    pub fn set_accepting(&self, accepting: bool) {
        self.accepting.store(accepting, Ordering::SeqCst);
    }

    /// Whether deliveries are currently accepted.
    #[must_use]
    pub fn is_accepting(&self) -> bool {
        self.accepting.load(Ordering::SeqCst)
    }

    /// Stores a pose, unless the gate is closed or the pose is stale.
    ///
    /// A pose is stale when the cached pose relates the same [`FramePair`]
    /// and carries a strictly newer timestamp. Poses for a different pair
    /// always replace the slot — each pair is its own stream and the cache
    /// keeps one slot total.
    ///
    /// Returns whether the pose was stored.
    pub fn store_pose(&self, pose: Pose) -> bool {
        let update = PoseUpdate {
            timestamp: pose.timestamp,
            frames: pose.frames,
        };
        if !self.is_accepting() {
            self.tracer.pose_dropped(update, PoseDropReason::GateClosed);
            return false;
        }
        {
            let mut slot = self.pose.write();
            if let Some(current) = *slot
                && current.frames == pose.frames
                && pose.timestamp < current.timestamp
            {
                drop(slot);
                self.tracer.pose_dropped(update, PoseDropReason::Stale);
                return false;
            }
            *slot = Some(pose);
        }
        self.tracer.pose_accepted(update);
        true
    }

    /// Stores an event, unless the gate is closed. Latest-only.
    ///
    /// Returns whether the event was stored.
    pub fn store_event(&self, event: TrackingEvent) -> bool {
        if !self.is_accepting() {
            return false;
        }
        let record = TrackingEventRecord {
            kind: event.kind,
            timestamp: event.timestamp,
        };
        *self.event.write() = Some(event);
        self.tracer.tracking_event(record);
        true
    }

    /// Returns an atomic snapshot of the latest pose, if any.
    #[must_use]
    pub fn latest_pose(&self) -> Option<Pose> {
        *self.pose.read()
    }

    /// Returns a clone of the latest event, if any.
    #[must_use]
    pub fn latest_event(&self) -> Option<TrackingEvent> {
        self.event.read().clone()
    }

    /// Formats the latest pose for the debug UI.
    #[must_use]
    pub fn latest_pose_text(&self) -> String {
        // Copy out first; formatting happens outside the lock.
        match self.latest_pose() {
            Some(pose) => pose.display_text(),
            None => POSE_UNAVAILABLE.to_owned(),
        }
    }

    /// Formats the latest event for the debug UI.
    #[must_use]
    pub fn latest_event_text(&self) -> String {
        match self.latest_event() {
            Some(event) => event.to_string(),
            None => NO_EVENTS.to_owned(),
        }
    }

    /// Resets both slots to the not-yet-available sentinel state.
    ///
    /// Called by `reset_tracking`, and by `connect` so a fresh session never
    /// starts out holding the previous session's last pose or event.
    pub fn clear(&self) {
        *self.pose.write() = None;
        *self.event.write() = None;
    }

    /// The frame pair of the cached pose, if any. Diagnostic helper.
    #[must_use]
    pub fn cached_frames(&self) -> Option<FramePair> {
        self.pose.read().map(|p| p.frames)
    }
}

impl PoseListener for TransformCache {
    fn on_pose(&self, pose: Pose) {
        self.store_pose(pose);
    }

    fn on_event(&self, event: TrackingEvent) {
        self.store_event(event);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    use super::*;
    use crate::event::TrackingEventKind;
    use crate::pose::{PoseTimestamp, Quaternion, ReferenceFrame};

    fn pose_at(t: f64) -> Pose {
        Pose::new(PoseTimestamp(t), [t, 0.0, 0.0], Quaternion::IDENTITY)
    }

    fn open_cache() -> TransformCache {
        let cache = TransformCache::new();
        cache.set_accepting(true);
        cache
    }

    #[test]
    fn sentinel_before_first_pose() {
        let cache = TransformCache::new();
        assert_eq!(cache.latest_pose_text(), POSE_UNAVAILABLE);
        assert_eq!(cache.latest_event_text(), NO_EVENTS);
        assert_eq!(cache.latest_pose(), None);
    }

    #[test]
    fn gate_closed_drops_deliveries() {
        let cache = TransformCache::new();
        assert!(!cache.store_pose(pose_at(1.0)));
        assert!(!cache.store_event(TrackingEvent::new(
            TrackingEventKind::ServiceConnected,
            PoseTimestamp(0.0),
            "up",
        )));
        assert_eq!(cache.latest_pose(), None);
        assert_eq!(cache.latest_event(), None);
    }

    #[test]
    fn latest_wins() {
        let cache = open_cache();
        assert!(cache.store_pose(pose_at(1.0)));
        assert!(cache.store_pose(pose_at(2.0)));
        assert_eq!(cache.latest_pose().unwrap().timestamp, PoseTimestamp(2.0));
    }

    #[test]
    fn stale_pose_same_pair_dropped() {
        let cache = open_cache();
        assert!(cache.store_pose(pose_at(5.0)));
        assert!(!cache.store_pose(pose_at(4.0)), "older timestamp, same pair");
        assert_eq!(cache.latest_pose().unwrap().timestamp, PoseTimestamp(5.0));

        // Equal timestamps overwrite (non-decreasing, not strictly increasing).
        assert!(cache.store_pose(pose_at(5.0)));
    }

    #[test]
    fn different_pair_replaces_regardless_of_timestamp() {
        let cache = open_cache();
        assert!(cache.store_pose(pose_at(5.0)));

        let mut other = pose_at(1.0);
        other.frames = FramePair {
            base: ReferenceFrame::AreaDescription,
            target: ReferenceFrame::Device,
        };
        assert!(cache.store_pose(other), "new stream starts its own watermark");
        assert_eq!(cache.latest_pose().unwrap().frames, other.frames);
    }

    #[test]
    fn clear_restores_sentinels() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.0));
        cache.store_event(TrackingEvent::new(
            TrackingEventKind::ServiceConnected,
            PoseTimestamp(0.0),
            "up",
        ));
        cache.clear();
        assert_eq!(cache.latest_pose_text(), POSE_UNAVAILABLE);
        assert_eq!(cache.latest_event_text(), NO_EVENTS);
    }

    #[test]
    fn pose_text_reflects_stored_pose() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.5));
        assert!(cache.latest_pose_text().contains("t=1.500s"));
    }

    // Writer thread races readers; every snapshot must be one of the poses
    // actually written, never a mix of two.
    #[test]
    fn concurrent_reads_never_tear() {
        let cache = Arc::new(open_cache());
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for i in 1..=10_000_u32 {
                    let t = f64::from(i);
                    // Marker: translation components all equal to the timestamp.
                    let pose = Pose::new(
                        PoseTimestamp(t),
                        [t, t, t],
                        Quaternion::IDENTITY,
                    );
                    cache.store_pose(pose);
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let reader = {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last_seen = 0.0_f64;
                while !done.load(Ordering::SeqCst) {
                    if let Some(p) = cache.latest_pose() {
                        let t = p.timestamp.seconds();
                        assert_eq!(p.translation, [t, t, t], "torn pose snapshot");
                        assert!(t >= last_seen, "pose went backwards");
                        last_seen = t;
                    }
                }
            })
        };

        writer.join().unwrap();
        reader.join().unwrap();
        assert_eq!(
            cache.latest_pose().unwrap().timestamp,
            PoseTimestamp(10_000.0)
        );
    }
}
