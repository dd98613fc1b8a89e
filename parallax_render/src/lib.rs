// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame-loop driver and camera matrices for parallax.
//!
//! The platform delivers a per-frame render trigger; on each trigger the
//! application calls [`FrameLoop::render_frame`], which:
//!
//! 1. snapshots the latest pose from the
//!    [`TransformCache`](parallax_core::cache::TransformCache) (never
//!    blocking on pose arrival — an empty cache renders a pose-less scene);
//! 2. builds view/projection matrices from the pose and the
//!    [`CameraRig`](parallax_core::camera::CameraRig);
//! 3. hands the assembled
//!    [`FrameInput`](parallax_core::render::FrameInput) to the
//!    [`SceneRenderer`](parallax_core::render::SceneRenderer).
//!
//! **[`matrix`]** — Minimal column-major 4×4 matrix: multiply, look-at,
//! perspective, quaternion rotation. Covers what the frame loop needs
//! without a linear-algebra dependency.
//!
//! **[`frame_loop`]** — The [`FrameLoop`] itself, plus
//! [`FrameOutcome`].

pub mod frame_loop;
pub mod matrix;

pub use frame_loop::{FrameLoop, FrameOutcome};
pub use matrix::Mat4;
