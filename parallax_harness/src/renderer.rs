// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`SceneRenderer`] that records what it is asked to draw.

use parallax_core::error::RenderError;
use parallax_core::render::{FrameInput, SceneRenderer, Viewport};

/// Records every frame instead of drawing it.
///
/// Failure injection covers the two seams a real GPU backend can fail at:
/// resource allocation in `init` and per-frame drawing. Scenario tests flip
/// the flags mid-run through the frame loop's renderer accessor.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    /// When set, `init` fails with a resource-allocation error.
    pub fail_init: bool,
    /// When set, `draw` fails and the frame is skipped.
    pub fail_draw: bool,
    frames: Vec<FrameInput>,
    viewport: Option<Viewport>,
    init_calls: u32,
    release_calls: u32,
}

impl RecordingRenderer {
    /// Creates a renderer that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every frame drawn so far, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[FrameInput] {
        &self.frames
    }

    /// The most recently drawn frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&FrameInput> {
        self.frames.last()
    }

    /// The most recently configured viewport.
    #[must_use]
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Number of `init` calls, successful or not.
    #[must_use]
    pub fn init_calls(&self) -> u32 {
        self.init_calls
    }

    /// Number of `release` calls.
    #[must_use]
    pub fn release_calls(&self) -> u32 {
        self.release_calls
    }
}

impl SceneRenderer for RecordingRenderer {
    fn init(&mut self) -> Result<(), RenderError> {
        self.init_calls += 1;
        if self.fail_init {
            Err(RenderError::ResourceAllocation(
                "recording renderer told to fail init".into(),
            ))
        } else {
            Ok(())
        }
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn draw(&mut self, input: &FrameInput) -> Result<(), RenderError> {
        if self.fail_draw {
            return Err(RenderError::Draw(
                "recording renderer told to fail draw".into(),
            ));
        }
        self.frames.push(*input);
        Ok(())
    }

    fn release(&mut self) {
        self.release_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use parallax_core::camera::CameraMode;
    use parallax_core::render::ColumnMatrix;

    use super::*;

    const IDENTITY: ColumnMatrix = [
        1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0,
    ];

    fn frame(index: u64) -> FrameInput {
        FrameInput {
            frame_index: index,
            viewport: Viewport::new(320, 240),
            pose: None,
            view: IDENTITY,
            projection: IDENTITY,
            camera_mode: CameraMode::ThirdPerson,
        }
    }

    #[test]
    fn records_frames_in_order() {
        let mut renderer = RecordingRenderer::new();
        renderer.init().unwrap();
        renderer.draw(&frame(0)).unwrap();
        renderer.draw(&frame(1)).unwrap();
        assert_eq!(renderer.frames().len(), 2);
        assert_eq!(renderer.last_frame().map(|f| f.frame_index), Some(1));
    }

    #[test]
    fn failure_flags_inject_errors() {
        let mut renderer = RecordingRenderer {
            fail_init: true,
            ..RecordingRenderer::default()
        };
        assert!(renderer.init().is_err());
        assert_eq!(renderer.init_calls(), 1);

        renderer.fail_init = false;
        renderer.fail_draw = true;
        renderer.init().unwrap();
        assert!(renderer.draw(&frame(0)).is_err());
        assert!(renderer.frames().is_empty(), "failed draws are not recorded");
    }
}
