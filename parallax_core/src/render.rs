// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer contract for GPU-side integrations.
//!
//! Parallax never touches the graphics context itself. The frame loop in
//! `parallax_render` assembles per-frame input (latest pose, camera
//! matrices, viewport) and hands it to a [`SceneRenderer`], which owns all
//! GPU state. Side effects are confined to the renderer: no other component
//! may touch the graphics context, and all renderer calls happen on one
//! context (the rendering thread), never concurrently with each other.
//!
//! Real implementations wrap a GL/Vulkan scene; tests and demos use
//! recording doubles.

use crate::camera::CameraMode;
use crate::error::RenderError;
use crate::pose::Pose;

/// A render-target size in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Creates a viewport.
    #[inline]
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width / height, treating a degenerate viewport as square.
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Draws the AR scene. Implemented by GPU-side collaborators.
///
/// # Contract
///
/// - [`init`](Self::init) runs on the rendering thread after a graphics
///   context exists. On failure the renderer must not be left in a
///   partially-usable state; the frame pipeline treats the failure as
///   fatal.
/// - [`set_viewport`](Self::set_viewport) may be called any number of
///   times, including before `init` and before the first pose arrives.
/// - [`draw`](Self::draw) must never block waiting for a pose; with
///   `input.pose == None` it draws a pose-less scene.
/// - [`release`](Self::release) frees all GPU allocations and must be a
///   safe no-op when `init` never ran.
pub trait SceneRenderer {
    /// Allocates GPU-side resources.
    fn init(&mut self) -> Result<(), RenderError>;

    /// Reconfigures the projection for a new target size.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Draws one frame.
    fn draw(&mut self, input: &FrameInput) -> Result<(), RenderError>;

    /// Frees GPU-side resources.
    fn release(&mut self);
}

/// A column-major 4×4 matrix as flat `[f64; 16]`, the layout GPU APIs take
/// directly.
pub type ColumnMatrix = [f64; 16];

/// Everything a renderer needs for one frame.
///
/// Assembled by the frame loop in `parallax_render`; the matrices are
/// already combined with the camera rig, so renderers only upload and draw.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameInput {
    /// Monotonic frame counter.
    pub frame_index: u64,
    /// Current render-target size.
    pub viewport: Viewport,
    /// Latest pose snapshot, if one has arrived since the last reset.
    pub pose: Option<Pose>,
    /// View matrix for the current camera mode.
    pub view: ColumnMatrix,
    /// Projection matrix for the current viewport.
    pub projection: ColumnMatrix,
    /// Camera mode the matrices were built for.
    pub camera_mode: CameraMode,
}
