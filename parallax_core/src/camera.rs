// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Camera viewpoint modes and the orbit rig.
//!
//! [`CameraMode`] is the user-selected viewpoint style; [`CameraRig`] carries
//! the gesture-adjustable parameters (yaw, pitch, distance, pan) the frame
//! loop combines with the tracked pose to build a view matrix. Selecting a
//! mode resets the rig to that mode's defaults, as a camera button in a
//! viewer UI would.

use kurbo::Vec2;

/// The viewpoint style used by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Render exactly from the tracked device pose.
    FirstPerson,
    /// Orbit around the tracked device at a gesture-controlled distance.
    ThirdPerson,
    /// Overhead view looking straight down at the device.
    TopDown,
}

impl CameraMode {
    /// Short label for diagnostics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstPerson => "first-person",
            Self::ThirdPerson => "third-person",
            Self::TopDown => "top-down",
        }
    }
}

impl Default for CameraMode {
    /// Viewers start in third person.
    fn default() -> Self {
        Self::ThirdPerson
    }
}

/// Pitch is clamped short of the poles to keep the view matrix invertible.
const PITCH_LIMIT: f64 = core::f64::consts::FRAC_PI_2 - 0.05;

/// Distance bounds for pinch zoom, in meters.
const MIN_DISTANCE: f64 = 0.5;
const MAX_DISTANCE: f64 = 20.0;

/// Gesture-adjustable camera parameters.
///
/// Mutated by the [`InputRouter`](crate::input::InputRouter) on the UI
/// context and read once per frame by the frame loop; both run on the render
/// context, so no locking is involved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraRig {
    /// Current viewpoint style.
    pub mode: CameraMode,
    /// Orbit azimuth in radians.
    pub yaw: f64,
    /// Orbit elevation in radians, clamped within ±[`PITCH_LIMIT`].
    pub pitch: f64,
    /// Distance from the followed pose, in meters.
    pub distance: f64,
    /// Screen-space pan offset applied to the orbit target, in meters.
    pub pan: Vec2,
}

impl CameraRig {
    /// Creates a rig at the given mode's default parameters.
    #[must_use]
    pub fn for_mode(mode: CameraMode) -> Self {
        let distance = match mode {
            CameraMode::FirstPerson => 0.0,
            CameraMode::ThirdPerson => 3.0,
            CameraMode::TopDown => 6.0,
        };
        let pitch = match mode {
            CameraMode::FirstPerson | CameraMode::ThirdPerson => 0.0,
            // Looking straight down, pulled just inside the clamp.
            CameraMode::TopDown => -PITCH_LIMIT,
        };
        Self {
            mode,
            yaw: 0.0,
            pitch,
            distance,
            pan: Vec2::ZERO,
        }
    }

    /// Switches mode, resetting parameters to the new mode's defaults.
    pub fn set_mode(&mut self, mode: CameraMode) {
        *self = Self::for_mode(mode);
    }

    /// Whether gestures may adjust this rig.
    ///
    /// First person follows the tracked pose directly; orbit parameters are
    /// ignored there, so gestures are dropped rather than accumulated
    /// invisibly.
    #[must_use]
    pub const fn accepts_gestures(&self) -> bool {
        !matches!(self.mode, CameraMode::FirstPerson)
    }

    /// Applies an orbit delta in radians, clamping pitch.
    pub fn orbit(&mut self, d_yaw: f64, d_pitch: f64) {
        self.yaw += d_yaw;
        self.pitch = (self.pitch + d_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scales the orbit distance, clamping to the zoom bounds.
    pub fn zoom(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        }
    }

    /// Applies a pan delta in meters.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::for_mode(CameraMode::default())
    }
}
