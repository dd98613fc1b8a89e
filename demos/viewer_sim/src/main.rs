// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless AR viewer simulation.
//!
//! Replays a scripted tracking session through the session controller, the
//! transform cache, the input router, and the frame loop, with a
//! [`RecordingRenderer`](parallax_harness::renderer::RecordingRenderer)
//! standing in for the GPU. Trace events go to a
//! [`PrettyPrintSink`](parallax_debug::pretty::PrettyPrintSink) on stdout and
//! to a [`RecorderSink`](parallax_debug::recorder::RecorderSink), which is
//! exported as `trace.json` at the end of the run.

use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use kurbo::Point;

use parallax_core::camera::{CameraMode, CameraRig};
use parallax_core::event::TrackingEventKind;
use parallax_core::input::{InputRouter, TouchPhase};
use parallax_core::session::{SessionConfig, SessionController, SessionState};
use parallax_core::trace::{
    FrameRender, GestureEvent, PoseDropReason, PoseUpdate, SessionTransition, TraceSink,
    Tracer, TrackingEventRecord,
};

use parallax_debug::json;
use parallax_debug::pretty::PrettyPrintSink;
use parallax_debug::recorder::RecorderSink;

use parallax_harness::hud::HudModel;
use parallax_harness::renderer::RecordingRenderer;
use parallax_harness::script::{PoseScript, ScriptStep};
use parallax_harness::service::{SCRIPTED_API, ScriptedService};

use parallax_render::{FrameLoop, FrameOutcome};

const FRAME_COUNT: u64 = 120;
/// ~60 Hz refresh.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Forwards every event to both attached sinks.
struct Fanout(Arc<PrettyPrintSink>, Arc<RecorderSink>);

impl TraceSink for Fanout {
    fn on_session_transition(&self, event: &SessionTransition) {
        self.0.on_session_transition(event);
        self.1.on_session_transition(event);
    }

    fn on_pose_accepted(&self, event: &PoseUpdate) {
        self.1.on_pose_accepted(event);
    }

    fn on_pose_dropped(&self, event: &PoseUpdate, reason: PoseDropReason) {
        self.0.on_pose_dropped(event, reason);
        self.1.on_pose_dropped(event, reason);
    }

    fn on_tracking_event(&self, event: &TrackingEventRecord) {
        self.0.on_tracking_event(event);
        self.1.on_tracking_event(event);
    }

    fn on_frame_rendered(&self, event: &FrameRender) {
        self.1.on_frame_rendered(event);
    }

    fn on_gesture(&self, event: &GestureEvent) {
        self.0.on_gesture(event);
        self.1.on_gesture(event);
    }
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let pretty = Arc::new(PrettyPrintSink::new(Box::new(std::io::stdout())));
    let recorder = Arc::new(RecorderSink::new());
    let tracer = Tracer::new(Arc::new(Fanout(pretty, recorder.clone())));

    // -- scripted session --------------------------------------------------
    // A circular walk with a mid-run tracking loss and a fatal failure near
    // the end, paced at roughly the script's own 60 Hz.
    let walk = PoseScript::circular_walk(90, 2.0, 60.0);
    let script = PoseScript::new()
        .event(TrackingEventKind::ServiceConnected, 0.0, "service up")
        .then(paced(walk))
        .event(TrackingEventKind::TrackingLost, 1.5, "feature-poor scene")
        .wait(Duration::from_millis(100))
        .event(TrackingEventKind::Recovered, 1.6, "features reacquired")
        .wait(Duration::from_millis(300))
        .event(TrackingEventKind::FatalError, 1.9, "sensor dropout");

    let session = SessionController::with_tracer(
        Box::new(ScriptedService::new(script)),
        tracer.clone(),
    );
    if !session.check_compatibility(SCRIPTED_API) {
        eprintln!("tracking service too old: {}", session.version_string());
        return;
    }
    println!("service: {}", session.version_string());

    session
        .configure(SessionConfig {
            // Let the scripted fatal error reach the session so the
            // forced-disconnect path runs.
            auto_recovery: false,
        })
        .expect("configure on a fresh session");
    session.connect().expect("connect after configure");

    // -- render side -------------------------------------------------------
    let mut frame_loop = FrameLoop::with_tracer(
        session.cache(),
        RecordingRenderer::new(),
        tracer.clone(),
    );
    frame_loop.init_gl().expect("recording renderer init");
    frame_loop.set_viewport(1280, 720);

    let mut router = InputRouter::with_tracer(CameraRig::default(), tracer);

    // -- frame loop --------------------------------------------------------
    let mut drawn = 0_u64;
    for frame in 0..FRAME_COUNT {
        simulate_touches(&mut router, frame);

        if matches!(
            frame_loop.render_frame(router.rig()),
            FrameOutcome::Rendered { .. }
        ) {
            drawn += 1;
        }

        if let Some(event) = session.process_tracking_events()
            && !event.kind.is_recoverable()
        {
            println!("-- fatal event, session forced to {}", session.state());
        }

        if frame % 30 == 0 {
            println!("-- frame {frame}\n{}", HudModel::snapshot(&session));
        }

        if session.state() == SessionState::Disconnected {
            break;
        }
        thread::sleep(FRAME_INTERVAL);
    }

    println!("-- final\n{}", HudModel::snapshot(&session));
    session.destroy();
    frame_loop.release_gl();

    // -- export ------------------------------------------------------------
    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    json::export(&recorder.records(), &mut writer).expect("failed to write trace JSON");

    println!(
        "Wrote {path} ({} trace events, {drawn} frames drawn)",
        recorder.len()
    );
}

/// Interleaves short pauses so the walk plays out in roughly real time.
fn paced(walk: PoseScript) -> PoseScript {
    let mut paced = PoseScript::new();
    for step in walk.steps() {
        if let ScriptStep::Pose(pose) = step {
            paced = paced.pose(*pose).wait(Duration::from_millis(16));
        }
    }
    paced
}

/// A canned gesture track: an orbit drag, then a pinch, then a mode switch.
fn simulate_touches(router: &mut InputRouter, frame: u64) {
    let result = match frame {
        10 => router.on_touch_batch(TouchPhase::Down, 1, Point::new(400.0, 400.0), Point::ZERO),
        11..=20 => {
            let x = 400.0 + (frame - 10) as f64 * 12.0;
            router.on_touch_batch(TouchPhase::Move, 1, Point::new(x, 400.0), Point::ZERO)
        }
        21 => router.on_touch_batch(TouchPhase::Up, 0, Point::ZERO, Point::ZERO),
        40 => router.on_touch_batch(
            TouchPhase::Down,
            2,
            Point::new(500.0, 400.0),
            Point::new(700.0, 400.0),
        ),
        41..=50 => {
            let spread = (frame - 40) as f64 * 8.0;
            router.on_touch_batch(
                TouchPhase::Move,
                2,
                Point::new(500.0 - spread, 400.0),
                Point::new(700.0 + spread, 400.0),
            )
        }
        51 => router.on_touch_batch(TouchPhase::Up, 0, Point::ZERO, Point::ZERO),
        70 => {
            router.set_camera_mode(CameraMode::TopDown);
            Ok(())
        }
        _ => Ok(()),
    };
    if let Err(err) = result {
        eprintln!("input rejected: {err}");
    }
}
