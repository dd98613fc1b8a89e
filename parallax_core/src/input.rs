// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch-to-camera gesture routing.
//!
//! The display system delivers raw touch batches of up to two pointers; the
//! [`InputRouter`] turns pointer deltas into [`CameraRig`] adjustments:
//!
//! - one pointer dragging → orbit (yaw/pitch)
//! - two pointers → pinch zoom plus midpoint pan
//!
//! Gesture state is ephemeral — it is rebuilt from each batch and cleared
//! whenever the pointer count changes or the touch ends, so a dropped `Up`
//! event cannot wedge the router. Batches claiming more than two pointers
//! are rejected with [`InputError::PointerCountOutOfRange`] and leave all
//! state untouched; silently truncating a third pointer would guess at
//! intent.
//!
//! Everything here runs on the render/UI context; there is no locking.

use kurbo::Point;

use crate::camera::{CameraMode, CameraRig};
use crate::error::InputError;
use crate::trace::{GestureEvent, GestureKind, Tracer};

/// Orbit sensitivity in radians per pixel of drag.
const ORBIT_PER_PIXEL: f64 = 0.008;

/// Pan sensitivity in meters per pixel of two-finger drag.
const PAN_PER_PIXEL: f64 = 0.004;

/// Where the current touch interaction stands.
#[derive(Clone, Copy, Debug, PartialEq)]
enum GestureState {
    Idle,
    OnePointer { last: Point },
    TwoPointer { last0: Point, last1: Point },
}

/// What the display system reported for a touch batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// A pointer went down (or the pointer set changed).
    Down,
    /// Pointers moved.
    Move,
    /// The interaction ended.
    Up,
}

/// Maps touch batches to camera-rig adjustments.
#[derive(Debug)]
pub struct InputRouter {
    rig: CameraRig,
    gesture: GestureState,
    tracer: Tracer,
}

impl Default for InputRouter {
    fn default() -> Self {
        Self::new(CameraRig::default())
    }
}

impl InputRouter {
    /// Creates a router over the given starting rig.
    #[must_use]
    pub fn new(rig: CameraRig) -> Self {
        Self {
            rig,
            gesture: GestureState::Idle,
            tracer: Tracer::disabled(),
        }
    }

    /// Creates a router that reports applied gestures to `tracer`.
    #[must_use]
    pub fn with_tracer(rig: CameraRig, tracer: Tracer) -> Self {
        Self {
            rig,
            gesture: GestureState::Idle,
            tracer,
        }
    }

    /// The rig the frame loop reads each frame.
    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Explicit camera-mode selection. Last writer wins; resets the rig to
    /// the mode's defaults and abandons any in-flight gesture.
    pub fn set_camera_mode(&mut self, mode: CameraMode) {
        self.rig.set_mode(mode);
        self.gesture = GestureState::Idle;
        self.tracer.gesture(GestureEvent {
            kind: GestureKind::ModeSelect,
            camera_mode: mode,
        });
    }

    /// Routes one touch batch.
    ///
    /// `pointer_count` must be 0, 1, or 2; `p1` is ignored unless the count
    /// is 2. Counts above 2 are an input error and leave the rig, mode, and
    /// gesture state unchanged.
    pub fn on_touch_batch(
        &mut self,
        phase: TouchPhase,
        pointer_count: u8,
        p0: Point,
        p1: Point,
    ) -> Result<(), InputError> {
        if pointer_count > 2 {
            return Err(InputError::PointerCountOutOfRange(pointer_count));
        }
        if pointer_count == 0 || phase == TouchPhase::Up {
            self.gesture = GestureState::Idle;
            return Ok(());
        }

        match (pointer_count, self.gesture) {
            (1, GestureState::OnePointer { last }) if phase == TouchPhase::Move => {
                let delta = p0 - last;
                if self.rig.accepts_gestures() && delta != kurbo::Vec2::ZERO {
                    // Dragging right orbits right; dragging up tilts up.
                    self.rig
                        .orbit(delta.x * ORBIT_PER_PIXEL, -delta.y * ORBIT_PER_PIXEL);
                    self.tracer.gesture(GestureEvent {
                        kind: GestureKind::Orbit,
                        camera_mode: self.rig.mode,
                    });
                }
                self.gesture = GestureState::OnePointer { last: p0 };
            }
            (1, _) => {
                self.gesture = GestureState::OnePointer { last: p0 };
            }
            (2, GestureState::TwoPointer { last0, last1 }) if phase == TouchPhase::Move => {
                if self.rig.accepts_gestures() {
                    self.apply_two_pointer(last0, last1, p0, p1);
                }
                self.gesture = GestureState::TwoPointer {
                    last0: p0,
                    last1: p1,
                };
            }
            (2, _) => {
                self.gesture = GestureState::TwoPointer {
                    last0: p0,
                    last1: p1,
                };
            }
            // pointer_count was validated above.
            _ => unreachable!("pointer_count is 1 or 2 here"),
        }
        Ok(())
    }

    fn apply_two_pointer(&mut self, last0: Point, last1: Point, p0: Point, p1: Point) {
        let prev_span = last0.distance(last1);
        let span = p0.distance(p1);
        if prev_span > f64::EPSILON && span > f64::EPSILON {
            // Fingers moving apart shrink the orbit distance (zoom in).
            self.rig.zoom(prev_span / span);
            self.tracer.gesture(GestureEvent {
                kind: GestureKind::Pinch,
                camera_mode: self.rig.mode,
            });
        }

        let prev_mid = last0.midpoint(last1);
        let mid = p0.midpoint(p1);
        let delta = mid - prev_mid;
        if delta != kurbo::Vec2::ZERO {
            // Screen y grows downward; world pan y grows upward.
            self.rig.pan_by(kurbo::Vec2::new(
                delta.x * PAN_PER_PIXEL,
                -delta.y * PAN_PER_PIXEL,
            ));
            self.tracer.gesture(GestureEvent {
                kind: GestureKind::Pan,
                camera_mode: self.rig.mode,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> InputRouter {
        InputRouter::new(CameraRig::for_mode(CameraMode::ThirdPerson))
    }

    #[test]
    fn three_pointers_rejected_without_side_effects() {
        let mut r = router();
        let before = *r.rig();
        let err = r
            .on_touch_batch(TouchPhase::Move, 3, Point::ZERO, Point::ZERO)
            .unwrap_err();
        assert_eq!(err, InputError::PointerCountOutOfRange(3));
        assert_eq!(*r.rig(), before, "rig must be untouched");
        assert_eq!(r.rig().mode, CameraMode::ThirdPerson);
    }

    #[test]
    fn one_pointer_drag_orbits() {
        let mut r = router();
        r.on_touch_batch(TouchPhase::Down, 1, Point::new(100.0, 100.0), Point::ZERO)
            .unwrap();
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(150.0, 100.0), Point::ZERO)
            .unwrap();
        assert!(r.rig().yaw > 0.0, "drag right orbits right");
        assert_eq!(r.rig().pitch, 0.0);

        r.on_touch_batch(TouchPhase::Move, 1, Point::new(150.0, 60.0), Point::ZERO)
            .unwrap();
        assert!(r.rig().pitch > 0.0, "drag up tilts up");
    }

    #[test]
    fn first_batch_establishes_anchor_without_moving() {
        let mut r = router();
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(500.0, 500.0), Point::ZERO)
            .unwrap();
        assert_eq!(r.rig().yaw, 0.0, "no previous anchor, no delta");
    }

    #[test]
    fn pinch_apart_zooms_in() {
        let mut r = router();
        let d0 = r.rig().distance;
        r.on_touch_batch(
            TouchPhase::Down,
            2,
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
        )
        .unwrap();
        r.on_touch_batch(
            TouchPhase::Move,
            2,
            Point::new(50.0, 100.0),
            Point::new(250.0, 100.0),
        )
        .unwrap();
        assert!(r.rig().distance < d0, "fingers apart should zoom in");
    }

    #[test]
    fn two_pointer_drag_pans() {
        let mut r = router();
        r.on_touch_batch(
            TouchPhase::Down,
            2,
            Point::new(100.0, 100.0),
            Point::new(200.0, 100.0),
        )
        .unwrap();
        r.on_touch_batch(
            TouchPhase::Move,
            2,
            Point::new(110.0, 90.0),
            Point::new(210.0, 90.0),
        )
        .unwrap();
        let pan = r.rig().pan;
        assert!(pan.x > 0.0, "pan follows midpoint x: {pan:?}");
        assert!(pan.y > 0.0, "screen-up pans world-up: {pan:?}");
    }

    #[test]
    fn up_or_empty_batch_ends_gesture() {
        let mut r = router();
        r.on_touch_batch(TouchPhase::Down, 1, Point::new(10.0, 10.0), Point::ZERO)
            .unwrap();
        r.on_touch_batch(TouchPhase::Up, 1, Point::new(10.0, 10.0), Point::ZERO)
            .unwrap();
        // New drag must re-anchor rather than jump from the stale point.
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(500.0, 500.0), Point::ZERO)
            .unwrap();
        assert_eq!(r.rig().yaw, 0.0);

        r.on_touch_batch(TouchPhase::Move, 0, Point::ZERO, Point::ZERO)
            .unwrap();
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(900.0, 0.0), Point::ZERO)
            .unwrap();
        assert_eq!(r.rig().yaw, 0.0, "count 0 also clears the anchor");
    }

    #[test]
    fn pointer_count_change_reanchors() {
        let mut r = router();
        r.on_touch_batch(TouchPhase::Down, 1, Point::new(100.0, 100.0), Point::ZERO)
            .unwrap();
        // Second finger lands; must not orbit from the one-pointer anchor.
        r.on_touch_batch(
            TouchPhase::Move,
            2,
            Point::new(300.0, 300.0),
            Point::new(400.0, 300.0),
        )
        .unwrap();
        assert_eq!(r.rig().yaw, 0.0);
        assert_eq!(r.rig().distance, CameraRig::for_mode(CameraMode::ThirdPerson).distance);
    }

    #[test]
    fn first_person_ignores_gestures() {
        let mut r = router();
        r.set_camera_mode(CameraMode::FirstPerson);
        r.on_touch_batch(TouchPhase::Down, 1, Point::new(0.0, 0.0), Point::ZERO)
            .unwrap();
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(100.0, 0.0), Point::ZERO)
            .unwrap();
        assert_eq!(r.rig().yaw, 0.0, "first person follows the pose directly");
    }

    #[test]
    fn mode_select_resets_rig_and_gesture() {
        let mut r = router();
        r.on_touch_batch(TouchPhase::Down, 1, Point::new(0.0, 0.0), Point::ZERO)
            .unwrap();
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(80.0, 0.0), Point::ZERO)
            .unwrap();
        assert!(r.rig().yaw != 0.0);

        r.set_camera_mode(CameraMode::TopDown);
        assert_eq!(*r.rig(), CameraRig::for_mode(CameraMode::TopDown));
        // In-flight gesture was abandoned; next move re-anchors.
        r.on_touch_batch(TouchPhase::Move, 1, Point::new(300.0, 0.0), Point::ZERO)
            .unwrap();
        assert_eq!(r.rig().yaw, 0.0);
    }
}
