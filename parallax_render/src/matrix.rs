// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal column-major 4×4 matrix.
//!
//! Covers the subset of 3-D math the frame loop needs (identity, multiply,
//! translation, quaternion rotation, look-at, perspective) without pulling
//! in a full linear-algebra crate. Right-handed, y-up, OpenGL clip-space
//! conventions.

use core::ops::Mul;

use parallax_core::pose::Quaternion;
use parallax_core::render::ColumnMatrix;

/// A column-major 4×4 matrix stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column*, matching the memory layout GPU APIs
/// take directly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4 {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Mat4 {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a pure translation matrix.
    #[inline]
    #[must_use]
    pub const fn from_translation(t: [f64; 3]) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [t[0], t[1], t[2], 1.0],
            ],
        }
    }

    /// Creates a rotation matrix from a unit quaternion.
    #[must_use]
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (wx, wy, wz) = (w * x, w * y, w * z);
        Self {
            cols: [
                [1.0 - 2.0 * (yy + zz), 2.0 * (xy + wz), 2.0 * (xz - wy), 0.0],
                [2.0 * (xy - wz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz + wx), 0.0],
                [2.0 * (xz + wy), 2.0 * (yz - wx), 1.0 - 2.0 * (xx + yy), 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Builds a right-handed view matrix looking from `eye` toward
    /// `target`.
    ///
    /// Falls back to the identity when `eye` and `target` coincide or `up`
    /// is parallel to the view direction, so a degenerate rig cannot poison
    /// the frame with NaNs.
    #[must_use]
    pub fn look_at(eye: [f64; 3], target: [f64; 3], up: [f64; 3]) -> Self {
        let forward = sub(target, eye);
        let Some(f) = normalize(forward) else {
            return Self::IDENTITY;
        };
        let Some(s) = normalize(cross(f, up)) else {
            return Self::IDENTITY;
        };
        let u = cross(s, f);
        Self {
            cols: [
                [s[0], u[0], -f[0], 0.0],
                [s[1], u[1], -f[1], 0.0],
                [s[2], u[2], -f[2], 0.0],
                [-dot(s, eye), -dot(u, eye), dot(f, eye), 1.0],
            ],
        }
    }

    /// Builds an OpenGL-convention perspective projection.
    ///
    /// `fovy` is the vertical field of view in radians; `aspect` is
    /// width/height.
    #[must_use]
    pub fn perspective(fovy: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fovy * 0.5).tan();
        let nf = 1.0 / (near - far);
        Self {
            cols: [
                [f / aspect, 0.0, 0.0, 0.0],
                [0.0, f, 0.0, 0.0],
                [0.0, 0.0, (far + near) * nf, -1.0],
                [0.0, 0.0, 2.0 * far * near * nf, 0.0],
            ],
        }
    }

    /// The view matrix for a camera *at* the given rigid pose: the inverse
    /// of rotation-then-translation.
    #[must_use]
    pub fn view_from_pose(translation: [f64; 3], orientation: Quaternion) -> Self {
        let inv_t = [-translation[0], -translation[1], -translation[2]];
        Self::from_quaternion(orientation.conjugate()) * Self::from_translation(inv_t)
    }

    /// Transforms a point (w = 1), returning the xyz of the result.
    #[must_use]
    pub fn transform_point(&self, p: [f64; 3]) -> [f64; 3] {
        let c = &self.cols;
        [
            c[0][0] * p[0] + c[1][0] * p[1] + c[2][0] * p[2] + c[3][0],
            c[0][1] * p[0] + c[1][1] * p[1] + c[2][1] * p[2] + c[3][1],
            c[0][2] * p[0] + c[1][2] * p[1] + c[2][2] * p[2] + c[3][2],
        ]
    }

    /// Flattens to the `[f64; 16]` layout renderers upload.
    #[must_use]
    pub const fn to_column_matrix(self) -> ColumnMatrix {
        let c = self.cols;
        [
            c[0][0], c[0][1], c[0][2], c[0][3], //
            c[1][0], c[1][1], c[1][2], c[1][3], //
            c[2][0], c[2][1], c[2][2], c[2][3], //
            c[3][0], c[3][1], c[3][2], c[3][3],
        ]
    }
}

impl Default for Mat4 {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        for j in 0..4 {
            for i in 0..4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
            }
        }
        Self { cols: out }
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> Option<[f64; 3]> {
    let len = dot(v, v).sqrt();
    if len <= f64::EPSILON {
        None
    } else {
        Some([v[0] / len, v[1] / len, v[2] / len])
    }
}
