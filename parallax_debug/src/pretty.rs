// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per
//! event to a [`Write`](std::io::Write) destination (default: stderr).
//! Write errors are swallowed; a broken diagnostics pipe must never take the
//! engine down.

use std::io::Write;

use parking_lot::Mutex;

use parallax_core::trace::{
    FrameRender, GestureEvent, GestureKind, PoseDropReason, PoseUpdate, SessionTransition,
    TraceSink, TrackingEventRecord,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write)
/// destination.
///
/// The writer sits behind a mutex because events arrive from the callback
/// thread and the render context concurrently; the lock is held for one
/// line at a time, so interleaved events stay on separate lines.
pub struct PrettyPrintSink<W: Write + Send = Box<dyn Write + Send>> {
    writer: Mutex<W>,
}

impl<W: Write + Send> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Consumes the sink and returns the writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer.into_inner()
    }

    fn line(&self, text: &str) {
        let mut writer = self.writer.lock();
        let _ = writeln!(writer, "{text}");
    }
}

impl<W: Write + Send> TraceSink for PrettyPrintSink<W> {
    fn on_session_transition(&self, event: &SessionTransition) {
        self.line(&format!("session  {} -> {}", event.from, event.to));
    }

    fn on_pose_accepted(&self, event: &PoseUpdate) {
        self.line(&format!(
            "pose +   t={:.3}s [{} -> {}]",
            event.timestamp.seconds(),
            event.frames.base.label(),
            event.frames.target.label(),
        ));
    }

    fn on_pose_dropped(&self, event: &PoseUpdate, reason: PoseDropReason) {
        self.line(&format!(
            "pose -   t={:.3}s ({})",
            event.timestamp.seconds(),
            reason.label(),
        ));
    }

    fn on_tracking_event(&self, event: &TrackingEventRecord) {
        self.line(&format!(
            "event    {} at t={:.3}s",
            event.kind.label(),
            event.timestamp.seconds(),
        ));
    }

    fn on_frame_rendered(&self, event: &FrameRender) {
        self.line(&format!(
            "frame    #{} {} pose={} {}",
            event.frame_index,
            event.camera_mode.label(),
            if event.had_pose { "yes" } else { "no" },
            if event.drawn { "drawn" } else { "skipped" },
        ));
    }

    fn on_gesture(&self, event: &GestureEvent) {
        let kind = match event.kind {
            GestureKind::Orbit => "orbit",
            GestureKind::Pinch => "pinch",
            GestureKind::Pan => "pan",
            GestureKind::ModeSelect => "mode-select",
        };
        self.line(&format!("gesture  {kind} ({})", event.camera_mode.label()));
    }
}

#[cfg(test)]
mod tests {
    use parallax_core::pose::{FramePair, PoseTimestamp};
    use parallax_core::session::SessionState;

    use super::*;

    #[test]
    fn one_line_per_event() {
        let sink = PrettyPrintSink::with_writer(Vec::new());
        sink.on_session_transition(&SessionTransition {
            from: SessionState::Configured,
            to: SessionState::Connected,
        });
        sink.on_pose_accepted(&PoseUpdate {
            timestamp: PoseTimestamp(1.25),
            frames: FramePair::START_TO_DEVICE,
        });
        sink.on_pose_dropped(
            &PoseUpdate {
                timestamp: PoseTimestamp(1.0),
                frames: FramePair::START_TO_DEVICE,
            },
            PoseDropReason::GateClosed,
        );

        let out = String::from_utf8(sink.into_writer()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "session  configured -> connected");
        assert!(lines[1].contains("t=1.250s"), "{}", lines[1]);
        assert!(lines[2].contains("gate-closed"), "{}", lines[2]);
    }
}
