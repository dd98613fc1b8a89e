// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pose scripts: what a [`ScriptedService`](crate::service::ScriptedService)
//! replays.

use std::time::Duration;

use parallax_core::event::{TrackingEvent, TrackingEventKind};
use parallax_core::pose::{Pose, PoseTimestamp, Quaternion};

/// One entry in a pose script.
#[derive(Clone, Debug, PartialEq)]
pub enum ScriptStep {
    /// Deliver this pose to the listener.
    Pose(Pose),
    /// Deliver this lifecycle event to the listener.
    Event(TrackingEvent),
    /// Pause delivery, as a real service does between sensor samples.
    Wait(Duration),
}

/// An ordered sequence of deliveries for the scripted service.
///
/// Scripts are cheap to clone; the service replays a fresh copy on every
/// start so a stop/start cycle sees the same deliveries again.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PoseScript {
    steps: Vec<ScriptStep>,
}

impl PoseScript {
    /// Creates an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pose delivery.
    #[must_use]
    pub fn pose(mut self, pose: Pose) -> Self {
        self.steps.push(ScriptStep::Pose(pose));
        self
    }

    /// Appends a lifecycle event delivery.
    #[must_use]
    pub fn event(
        mut self,
        kind: TrackingEventKind,
        timestamp: f64,
        message: impl Into<String>,
    ) -> Self {
        self.steps.push(ScriptStep::Event(TrackingEvent::new(
            kind,
            PoseTimestamp(timestamp),
            message,
        )));
        self
    }

    /// Appends a pause between deliveries.
    #[must_use]
    pub fn wait(mut self, duration: Duration) -> Self {
        self.steps.push(ScriptStep::Wait(duration));
        self
    }

    /// Appends another script's steps to this one.
    #[must_use]
    pub fn then(mut self, other: Self) -> Self {
        self.steps.extend(other.steps);
        self
    }

    /// Number of steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the script has no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The script's steps, in delivery order.
    #[must_use]
    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub(crate) fn into_steps(self) -> Vec<ScriptStep> {
        self.steps
    }

    /// A device walking a circle of `radius` meters at eye height, facing
    /// along its direction of travel.
    ///
    /// Produces `samples` poses with timestamps spaced `1.0 / rate_hz`
    /// seconds apart, starting at t = 0. No `Wait` steps are inserted;
    /// chain [`wait`](Self::wait) or replay flat-out for tests.
    #[must_use]
    pub fn circular_walk(samples: usize, radius: f64, rate_hz: f64) -> Self {
        let dt = 1.0 / rate_hz;
        let mut script = Self::new();
        for i in 0..samples {
            let t = i as f64 * dt;
            // One full lap over the whole script.
            let angle = core::f64::consts::TAU * i as f64 / samples.max(1) as f64;
            let translation = [radius * angle.sin(), 1.4, radius * angle.cos()];
            let orientation = Quaternion::from_axis_angle([0.0, 1.0, 0.0], angle);
            script = script.pose(Pose::new(PoseTimestamp(t), translation, orientation));
        }
        script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_preserves_order() {
        let script = PoseScript::new()
            .event(TrackingEventKind::ServiceConnected, 0.0, "up")
            .pose(Pose::new(PoseTimestamp(0.1), [0.0; 3], Quaternion::IDENTITY))
            .wait(Duration::from_millis(5));
        assert_eq!(script.len(), 3);
        assert!(matches!(script.steps()[0], ScriptStep::Event(_)));
        assert!(matches!(script.steps()[1], ScriptStep::Pose(_)));
        assert!(matches!(script.steps()[2], ScriptStep::Wait(_)));
    }

    #[test]
    fn circular_walk_timestamps_increase() {
        let script = PoseScript::circular_walk(10, 2.0, 30.0);
        assert_eq!(script.len(), 10);
        let mut last = f64::NEG_INFINITY;
        for step in script.steps() {
            let ScriptStep::Pose(pose) = step else {
                panic!("walk scripts contain only poses, got {step:?}");
            };
            assert!(pose.timestamp.0 > last, "timestamps must increase");
            assert!(pose.is_finite(), "{pose:?}");
            last = pose.timestamp.0;
        }
    }

    #[test]
    fn circular_walk_stays_on_radius() {
        let script = PoseScript::circular_walk(8, 3.0, 60.0);
        for step in script.steps() {
            let ScriptStep::Pose(pose) = step else {
                panic!("unexpected step {step:?}");
            };
            let r = (pose.translation[0].powi(2) + pose.translation[2].powi(2)).sqrt();
            assert!((r - 3.0).abs() < 1e-9, "r = {r}");
        }
    }
}
