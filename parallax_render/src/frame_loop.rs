// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-refresh frame loop.
//!
//! One [`FrameLoop`] per render target, living on the rendering thread. The
//! loop is the only component that calls the [`SceneRenderer`]; GPU side
//! effects stay confined behind that seam, and render failures never reach
//! the session state machine — a failed draw produces
//! [`FrameOutcome::Skipped`] and the next tick tries again.

use std::sync::Arc;

use parallax_core::cache::TransformCache;
use parallax_core::camera::{CameraMode, CameraRig};
use parallax_core::error::RenderError;
use parallax_core::pose::Pose;
use parallax_core::render::{FrameInput, SceneRenderer, Viewport};
use parallax_core::trace::{FrameRender, Tracer};

use crate::matrix::Mat4;

/// Vertical field of view, radians. The viewer renders with a fixed lens;
/// viewport changes only adjust the aspect.
const FOV_Y: f64 = core::f64::consts::FRAC_PI_4;

const NEAR: f64 = 0.1;
const FAR: f64 = 100.0;

/// What happened to one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The renderer drew the frame.
    Rendered {
        /// Whether a pose was available; `false` means the pose-less scene
        /// was drawn.
        had_pose: bool,
    },
    /// The draw failed; the frame was skipped. Fatal to this frame only.
    Skipped,
    /// GPU resources are not initialized ([`FrameLoop::init_gl`] has not
    /// succeeded).
    NotReady,
}

/// Drives a [`SceneRenderer`] from the transform cache and camera rig.
#[derive(Debug)]
pub struct FrameLoop<R> {
    cache: Arc<TransformCache>,
    renderer: R,
    viewport: Viewport,
    frame_index: u64,
    gl_ready: bool,
    tracer: Tracer,
}

impl<R: SceneRenderer> FrameLoop<R> {
    /// Creates a loop reading poses from `cache` and drawing with
    /// `renderer`.
    #[must_use]
    pub fn new(cache: Arc<TransformCache>, renderer: R) -> Self {
        Self::with_tracer(cache, renderer, Tracer::disabled())
    }

    /// Creates a loop that reports per-frame events to `tracer`.
    #[must_use]
    pub fn with_tracer(cache: Arc<TransformCache>, renderer: R, tracer: Tracer) -> Self {
        Self {
            cache,
            renderer,
            viewport: Viewport::default(),
            frame_index: 0,
            gl_ready: false,
            tracer,
        }
    }

    /// Allocates GPU resources. Must run on the rendering thread after a
    /// graphics context exists.
    ///
    /// On failure the renderer is released again so no partial-resource
    /// state is left usable, and the loop stays
    /// [`NotReady`](FrameOutcome::NotReady).
    pub fn init_gl(&mut self) -> Result<(), RenderError> {
        match self.renderer.init() {
            Ok(()) => {
                self.gl_ready = true;
                Ok(())
            }
            Err(err) => {
                self.renderer.release();
                self.gl_ready = false;
                Err(err)
            }
        }
    }

    /// Reconfigures the projection. Callable any number of times, including
    /// before [`init_gl`](Self::init_gl) and before the first pose arrives.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.renderer.set_viewport(self.viewport);
    }

    /// Renders one frame from the latest cached pose and the given rig.
    ///
    /// Never blocks on pose arrival: with an empty cache the renderer draws
    /// a pose-less scene with an identity view.
    pub fn render_frame(&mut self, rig: &CameraRig) -> FrameOutcome {
        if !self.gl_ready {
            return FrameOutcome::NotReady;
        }

        let pose = self.cache.latest_pose();
        let view = view_matrix(pose.as_ref(), rig);
        let projection = Mat4::perspective(FOV_Y, self.viewport.aspect_ratio(), NEAR, FAR);

        let input = FrameInput {
            frame_index: self.frame_index,
            viewport: self.viewport,
            pose,
            view: view.to_column_matrix(),
            projection: projection.to_column_matrix(),
            camera_mode: rig.mode,
        };
        self.frame_index += 1;

        let drawn = self.renderer.draw(&input).is_ok();
        self.tracer.frame_rendered(FrameRender {
            frame_index: input.frame_index,
            had_pose: pose.is_some(),
            camera_mode: rig.mode,
            drawn,
        });
        if drawn {
            FrameOutcome::Rendered {
                had_pose: pose.is_some(),
            }
        } else {
            FrameOutcome::Skipped
        }
    }

    /// Frees GPU resources. Safe to call repeatedly, and a no-op when
    /// [`init_gl`](Self::init_gl) never ran.
    pub fn release_gl(&mut self) {
        if self.gl_ready {
            self.renderer.release();
            self.gl_ready = false;
        }
    }

    /// Number of frames attempted so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// The wrapped renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the wrapped renderer.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

/// Builds the view matrix for the current camera mode.
///
/// Without a pose every mode falls back to the identity view; the renderer
/// draws the pose-less scene rather than blocking or crashing.
fn view_matrix(pose: Option<&Pose>, rig: &CameraRig) -> Mat4 {
    let Some(pose) = pose else {
        return Mat4::IDENTITY;
    };
    match rig.mode {
        CameraMode::FirstPerson => Mat4::view_from_pose(pose.translation, pose.orientation),
        CameraMode::ThirdPerson => {
            let target = [
                pose.translation[0] + rig.pan.x,
                pose.translation[1] + rig.pan.y,
                pose.translation[2],
            ];
            let (sy, cy) = rig.yaw.sin_cos();
            let (sp, cp) = rig.pitch.sin_cos();
            let eye = [
                target[0] + rig.distance * cp * sy,
                target[1] + rig.distance * sp,
                target[2] + rig.distance * cp * cy,
            ];
            Mat4::look_at(eye, target, [0.0, 1.0, 0.0])
        }
        CameraMode::TopDown => {
            let target = [
                pose.translation[0] + rig.pan.x,
                pose.translation[1],
                pose.translation[2] + rig.pan.y,
            ];
            let eye = [target[0], target[1] + rig.distance, target[2]];
            // Straight down; -z is "screen up".
            Mat4::look_at(eye, target, [0.0, 0.0, -1.0])
        }
    }
}

#[cfg(test)]
mod tests {
    use parallax_core::pose::{PoseTimestamp, Quaternion};

    use super::*;

    /// Renderer double that records calls and can be told to fail.
    #[derive(Debug, Default)]
    struct TestRenderer {
        init_fails: bool,
        draw_fails: bool,
        init_calls: u32,
        release_calls: u32,
        viewports: Vec<Viewport>,
        frames: Vec<FrameInput>,
    }

    impl SceneRenderer for TestRenderer {
        fn init(&mut self) -> Result<(), RenderError> {
            self.init_calls += 1;
            if self.init_fails {
                Err(RenderError::ResourceAllocation("no context".into()))
            } else {
                Ok(())
            }
        }

        fn set_viewport(&mut self, viewport: Viewport) {
            self.viewports.push(viewport);
        }

        fn draw(&mut self, input: &FrameInput) -> Result<(), RenderError> {
            if self.draw_fails {
                return Err(RenderError::Draw("lost context".into()));
            }
            self.frames.push(*input);
            Ok(())
        }

        fn release(&mut self) {
            self.release_calls += 1;
        }
    }

    fn open_cache() -> Arc<TransformCache> {
        let cache = Arc::new(TransformCache::new());
        cache.set_accepting(true);
        cache
    }

    fn pose_at(t: f64, translation: [f64; 3]) -> Pose {
        Pose::new(PoseTimestamp(t), translation, Quaternion::IDENTITY)
    }

    #[test]
    fn not_ready_before_init() {
        let mut fl = FrameLoop::new(open_cache(), TestRenderer::default());
        assert_eq!(
            fl.render_frame(&CameraRig::default()),
            FrameOutcome::NotReady
        );
        assert_eq!(fl.frame_index(), 0);
    }

    #[test]
    fn empty_cache_renders_poseless_scene() {
        let mut fl = FrameLoop::new(open_cache(), TestRenderer::default());
        fl.init_gl().unwrap();
        fl.set_viewport(640, 480);

        let outcome = fl.render_frame(&CameraRig::default());
        assert_eq!(outcome, FrameOutcome::Rendered { had_pose: false });

        let frame = &fl.renderer().frames[0];
        assert_eq!(frame.pose, None);
        assert_eq!(frame.view, Mat4::IDENTITY.to_column_matrix());
    }

    #[test]
    fn viewport_before_init_is_allowed() {
        let mut fl = FrameLoop::new(open_cache(), TestRenderer::default());
        fl.set_viewport(800, 600);
        fl.set_viewport(1024, 768);
        assert_eq!(
            fl.renderer().viewports,
            vec![Viewport::new(800, 600), Viewport::new(1024, 768)]
        );
    }

    #[test]
    fn failed_init_releases_and_stays_not_ready() {
        let mut fl = FrameLoop::new(
            open_cache(),
            TestRenderer {
                init_fails: true,
                ..TestRenderer::default()
            },
        );
        let err = fl.init_gl().unwrap_err();
        assert!(matches!(err, RenderError::ResourceAllocation(_)), "{err}");
        assert_eq!(fl.renderer().release_calls, 1, "no partial state survives");
        assert_eq!(
            fl.render_frame(&CameraRig::default()),
            FrameOutcome::NotReady
        );
    }

    #[test]
    fn draw_failure_skips_frame_only() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.0, [0.0; 3]));
        let mut fl = FrameLoop::new(
            cache,
            TestRenderer {
                draw_fails: true,
                ..TestRenderer::default()
            },
        );
        fl.init_gl().unwrap();

        assert_eq!(fl.render_frame(&CameraRig::default()), FrameOutcome::Skipped);

        // Recovery: the next frame draws normally.
        fl.renderer_mut().draw_fails = false;
        assert_eq!(
            fl.render_frame(&CameraRig::default()),
            FrameOutcome::Rendered { had_pose: true }
        );
        assert_eq!(fl.frame_index(), 2);
    }

    #[test]
    fn release_without_init_is_noop() {
        let mut fl = FrameLoop::new(open_cache(), TestRenderer::default());
        fl.release_gl();
        assert_eq!(fl.renderer().release_calls, 0);

        fl.init_gl().unwrap();
        fl.release_gl();
        fl.release_gl();
        assert_eq!(fl.renderer().release_calls, 1, "second release is a no-op");
        assert_eq!(
            fl.render_frame(&CameraRig::default()),
            FrameOutcome::NotReady
        );
    }

    #[test]
    fn first_person_view_centers_camera_pose() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.0, [2.0, 1.0, -3.0]));
        let mut fl = FrameLoop::new(cache, TestRenderer::default());
        fl.init_gl().unwrap();

        let mut rig = CameraRig::default();
        rig.set_mode(CameraMode::FirstPerson);
        fl.render_frame(&rig);

        let frame = fl.renderer().frames[0];
        let view = Mat4 {
            cols: unflatten(frame.view),
        };
        let mapped = view.transform_point([2.0, 1.0, -3.0]);
        for c in mapped {
            assert!(c.abs() < 1e-9, "camera position should map to origin: {mapped:?}");
        }
    }

    #[test]
    fn third_person_eye_sits_at_distance() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.0, [0.0; 3]));
        let mut fl = FrameLoop::new(cache, TestRenderer::default());
        fl.init_gl().unwrap();

        let rig = CameraRig::for_mode(CameraMode::ThirdPerson);
        fl.render_frame(&rig);

        let frame = fl.renderer().frames[0];
        let view = Mat4 {
            cols: unflatten(frame.view),
        };
        // Default rig: yaw 0, pitch 0, distance 3 → eye at (0, 0, 3).
        let mapped = view.transform_point([0.0, 0.0, 3.0]);
        for c in mapped {
            assert!(c.abs() < 1e-9, "eye should map to origin: {mapped:?}");
        }
        // Target ends up in front of the camera.
        let target = view.transform_point([0.0, 0.0, 0.0]);
        assert!(target[2] < 0.0, "{target:?}");
    }

    #[test]
    fn frame_inputs_carry_mode_and_index() {
        let cache = open_cache();
        cache.store_pose(pose_at(1.0, [0.0; 3]));
        let mut fl = FrameLoop::new(cache, TestRenderer::default());
        fl.init_gl().unwrap();

        let rig = CameraRig::for_mode(CameraMode::TopDown);
        fl.render_frame(&rig);
        fl.render_frame(&rig);

        let frames = &fl.renderer().frames;
        assert_eq!(frames[0].frame_index, 0);
        assert_eq!(frames[1].frame_index, 1);
        assert_eq!(frames[0].camera_mode, CameraMode::TopDown);
    }

    fn unflatten(m: [f64; 16]) -> [[f64; 4]; 4] {
        let mut cols = [[0.0; 4]; 4];
        for (j, col) in cols.iter_mut().enumerate() {
            for (i, v) in col.iter_mut().enumerate() {
                *v = m[j * 4 + i];
            }
        }
        cols
    }
}
