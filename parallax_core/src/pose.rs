// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pose, orientation, and reference-frame types.
//!
//! A [`Pose`] is the position and orientation of the device camera in a pair
//! of reference frames, stamped with the tracking service's clock. Poses are
//! small `Copy` values so the transform cache can hand out whole snapshots
//! under a read lock.
//!
//! [`Quaternion`] covers the subset of quaternion math the engine actually
//! needs (normalization, conjugate, vector rotation) without pulling in a
//! full linear-algebra crate.

use core::fmt;

/// A timestamp in seconds on the tracking service's clock.
///
/// The service promises timestamps are monotonically non-decreasing per
/// frame-pair stream; the transform cache drops violations rather than
/// trusting that blindly.
#[derive(Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct PoseTimestamp(pub f64);

impl PoseTimestamp {
    /// Returns the raw value in seconds.
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> f64 {
        self.0
    }
}

impl fmt::Debug for PoseTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PoseTimestamp({}s)", self.0)
    }
}

/// A unit quaternion representing an orientation.
///
/// Always normalized: [`Quaternion::new`] renormalizes its input, and the
/// remaining constructors only produce unit values. Layout is `(x, y, z, w)`
/// with `w` the scalar part.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quaternion {
    /// X component of the vector part.
    pub x: f64,
    /// Y component of the vector part.
    pub y: f64,
    /// Z component of the vector part.
    pub z: f64,
    /// Scalar part.
    pub w: f64,
}

impl Quaternion {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    /// Creates a quaternion from raw components, normalizing to unit length.
    ///
    /// A zero-length input yields the identity rather than NaN components.
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        let norm = (x * x + y * y + z * z + w * w).sqrt();
        if norm <= f64::EPSILON {
            return Self::IDENTITY;
        }
        Self {
            x: x / norm,
            y: y / norm,
            z: z / norm,
            w: w / norm,
        }
    }

    /// Creates a rotation of `radians` around the given (not necessarily
    /// unit) axis. A zero axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: [f64; 3], radians: f64) -> Self {
        let len = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
        if len <= f64::EPSILON {
            return Self::IDENTITY;
        }
        let (s, c) = (radians * 0.5).sin_cos();
        Self::new(
            axis[0] / len * s,
            axis[1] / len * s,
            axis[2] / len * s,
            c,
        )
    }

    /// Returns the inverse rotation. For unit quaternions this is the
    /// conjugate.
    #[inline]
    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
            w: self.w,
        }
    }

    /// Rotates a 3-vector by this quaternion.
    #[must_use]
    pub fn rotate(self, v: [f64; 3]) -> [f64; 3] {
        // v' = v + w * t + cross(q.xyz, t)  where  t = 2 * cross(q.xyz, v)
        let q = [self.x, self.y, self.z];
        let c = cross(q, v);
        let t = [2.0 * c[0], 2.0 * c[1], 2.0 * c[2]];
        let u = cross(q, t);
        [
            v[0] + self.w * t[0] + u[0],
            v[1] + self.w * t[1] + u[1],
            v[2] + self.w * t[2] + u[2],
        ]
    }

    /// Is every component [finite](f64::is_finite)?
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

impl Default for Quaternion {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// A coordinate frame the tracking service can express poses in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReferenceFrame {
    /// World origin fixed at the moment tracking started.
    StartOfService,
    /// Origin anchored to a previously learned area description.
    AreaDescription,
    /// The device body frame.
    Device,
    /// The color camera frame.
    CameraColor,
}

impl ReferenceFrame {
    /// Short label for diagnostics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::StartOfService => "start-of-service",
            Self::AreaDescription => "area-description",
            Self::Device => "device",
            Self::CameraColor => "camera-color",
        }
    }
}

/// A (base, target) reference-frame pair.
///
/// A pose with frames `{base, target}` maps points in the target frame into
/// the base frame. Each pair is an independent stream for timestamp
/// monotonicity purposes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FramePair {
    /// The frame the pose is expressed in.
    pub base: ReferenceFrame,
    /// The frame being located.
    pub target: ReferenceFrame,
}

impl FramePair {
    /// Start-of-service → device, the pair the viewer renders from.
    pub const START_TO_DEVICE: Self = Self {
        base: ReferenceFrame::StartOfService,
        target: ReferenceFrame::Device,
    };
}

/// A timestamped 6-DOF camera pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// When the pose was measured, on the service's clock.
    pub timestamp: PoseTimestamp,
    /// Translation of the target frame's origin, in meters.
    pub translation: [f64; 3],
    /// Orientation of the target frame.
    pub orientation: Quaternion,
    /// Which frame pair this pose relates.
    pub frames: FramePair,
}

impl Pose {
    /// Creates a pose for the default start-of-service → device pair.
    #[must_use]
    pub const fn new(
        timestamp: PoseTimestamp,
        translation: [f64; 3],
        orientation: Quaternion,
    ) -> Self {
        Self {
            timestamp,
            translation,
            orientation,
            frames: FramePair::START_TO_DEVICE,
        }
    }

    /// Is every numeric field [finite](f64::is_finite)?
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.timestamp.0.is_finite()
            && self.translation[0].is_finite()
            && self.translation[1].is_finite()
            && self.translation[2].is_finite()
            && self.orientation.is_finite()
    }

    /// Formats the pose for the debug UI, one line.
    #[must_use]
    pub fn display_text(&self) -> String {
        format!(
            "t={:.3}s pos=({:.3}, {:.3}, {:.3}) quat=({:.3}, {:.3}, {:.3}, {:.3}) [{} -> {}]",
            self.timestamp.0,
            self.translation[0],
            self.translation[1],
            self.translation[2],
            self.orientation.x,
            self.orientation.y,
            self.orientation.z,
            self.orientation.w,
            self.frames.base.label(),
            self.frames.target.label(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes() {
        let q = Quaternion::new(0.0, 0.0, 0.0, 2.0);
        assert_eq!(q, Quaternion::IDENTITY);

        let q = Quaternion::new(1.0, 1.0, 1.0, 1.0);
        let norm = (q.x * q.x + q.y * q.y + q.z * q.z + q.w * q.w).sqrt();
        assert!((norm - 1.0).abs() < 1e-12, "should be unit length");
    }

    #[test]
    fn zero_input_yields_identity() {
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0), Quaternion::IDENTITY);
        assert_eq!(
            Quaternion::from_axis_angle([0.0, 0.0, 0.0], 1.0),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn rotate_identity_is_noop() {
        let v = [1.0, 2.0, 3.0];
        let r = Quaternion::IDENTITY.rotate(v);
        assert_eq!(r, v);
    }

    #[test]
    fn rotate_quarter_turn_about_z() {
        let q = Quaternion::from_axis_angle([0.0, 0.0, 1.0], core::f64::consts::FRAC_PI_2);
        let r = q.rotate([1.0, 0.0, 0.0]);
        let eps = 1e-9;
        assert!((r[0] - 0.0).abs() < eps, "x should rotate to y: {r:?}");
        assert!((r[1] - 1.0).abs() < eps, "x should rotate to y: {r:?}");
        assert!(r[2].abs() < eps, "z should be unchanged: {r:?}");
    }

    #[test]
    fn conjugate_reverses_rotation() {
        let q = Quaternion::from_axis_angle([0.3, -0.4, 0.9], 1.1);
        let v = [0.5, -2.0, 3.5];
        let back = q.conjugate().rotate(q.rotate(v));
        let eps = 1e-9;
        assert!((back[0] - v[0]).abs() < eps);
        assert!((back[1] - v[1]).abs() < eps);
        assert!((back[2] - v[2]).abs() < eps);
    }

    #[test]
    fn display_text_reflects_fields() {
        let pose = Pose::new(PoseTimestamp(1.5), [0.1, 0.2, 0.3], Quaternion::IDENTITY);
        let text = pose.display_text();
        assert!(text.contains("t=1.500s"), "{text}");
        assert!(text.contains("pos=(0.100, 0.200, 0.300)"), "{text}");
        assert!(text.contains("start-of-service -> device"), "{text}");
    }

    #[test]
    fn non_finite_detected() {
        let mut pose = Pose::new(PoseTimestamp(0.0), [0.0; 3], Quaternion::IDENTITY);
        assert!(pose.is_finite());
        pose.translation[1] = f64::NAN;
        assert!(!pose.is_finite());
    }
}
