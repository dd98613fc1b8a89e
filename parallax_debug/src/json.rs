// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON export of recorded events.
//!
//! [`export`] writes records from a
//! [`RecorderSink`](crate::recorder::RecorderSink) as a JSON array of
//! self-describing objects, one per event, suitable for ad-hoc analysis
//! with any JSON tooling.

use std::io::{self, Write};

use serde_json::{Value, json};

use crate::recorder::RecordedEvent;

/// Writes recorded events as a pretty-printed JSON array.
pub fn export(records: &[RecordedEvent], writer: &mut dyn Write) -> io::Result<()> {
    let values: Vec<Value> = records.iter().map(to_value).collect();
    serde_json::to_writer_pretty(&mut *writer, &values)?;
    writer.write_all(b"\n")
}

/// Converts one record to its JSON object form.
#[must_use]
pub fn to_value(record: &RecordedEvent) -> Value {
    match record {
        RecordedEvent::SessionTransition(e) => json!({
            "type": "session-transition",
            "from": e.from.label(),
            "to": e.to.label(),
        }),
        RecordedEvent::PoseAccepted(e) => json!({
            "type": "pose-accepted",
            "timestamp": e.timestamp.seconds(),
            "base": e.frames.base.label(),
            "target": e.frames.target.label(),
        }),
        RecordedEvent::PoseDropped(e, reason) => json!({
            "type": "pose-dropped",
            "timestamp": e.timestamp.seconds(),
            "reason": reason.label(),
        }),
        RecordedEvent::TrackingEvent(e) => json!({
            "type": "tracking-event",
            "kind": e.kind.label(),
            "timestamp": e.timestamp.seconds(),
        }),
        RecordedEvent::FrameRendered(e) => json!({
            "type": "frame",
            "frame_index": e.frame_index,
            "had_pose": e.had_pose,
            "camera_mode": e.camera_mode.label(),
            "drawn": e.drawn,
        }),
        RecordedEvent::Gesture(e) => json!({
            "type": "gesture",
            "kind": format!("{:?}", e.kind),
            "camera_mode": e.camera_mode.label(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use parallax_core::pose::{FramePair, PoseTimestamp};
    use parallax_core::session::SessionState;
    use parallax_core::trace::{FrameRender, PoseUpdate, SessionTransition};
    use parallax_core::camera::CameraMode;

    use super::*;

    #[test]
    fn exports_a_json_array() {
        let records = [
            RecordedEvent::SessionTransition(SessionTransition {
                from: SessionState::Uninitialized,
                to: SessionState::Configured,
            }),
            RecordedEvent::PoseAccepted(PoseUpdate {
                timestamp: PoseTimestamp(2.5),
                frames: FramePair::START_TO_DEVICE,
            }),
            RecordedEvent::FrameRendered(FrameRender {
                frame_index: 4,
                had_pose: true,
                camera_mode: CameraMode::TopDown,
                drawn: true,
            }),
        ];

        let mut out = Vec::new();
        export(&records, &mut out).unwrap();
        let parsed: Vec<Value> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[0]["type"], "session-transition");
        assert_eq!(parsed[0]["to"], "configured");
        assert_eq!(parsed[1]["timestamp"], 2.5);
        assert_eq!(parsed[2]["frame_index"], 4);
        assert_eq!(parsed[2]["camera_mode"], "top-down");
    }
}
