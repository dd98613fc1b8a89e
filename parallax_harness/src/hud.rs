// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plain-text diagnostics overlay.
//!
//! Service version, session state, latest pose, and latest event, each on
//! its own line. Formatting lives here so the demo and tests render the
//! same text.

use core::fmt;

use parallax_core::session::{SessionController, SessionState};

/// Snapshot of everything the diagnostics overlay shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HudModel {
    /// Installed service version, or the unavailable sentinel.
    pub service_version: String,
    /// Current session state.
    pub state: SessionState,
    /// Latest pose line, or the no-pose sentinel.
    pub pose: String,
    /// Latest lifecycle event line, or the no-events sentinel.
    pub event: String,
}

impl HudModel {
    /// Captures the overlay contents from a live session.
    #[must_use]
    pub fn snapshot(session: &SessionController) -> Self {
        let cache = session.cache();
        Self {
            service_version: session.version_string(),
            state: session.state(),
            pose: cache.latest_pose_text(),
            event: cache.latest_event_text(),
        }
    }

    /// The overlay lines, top to bottom.
    #[must_use]
    pub fn lines(&self) -> [String; 4] {
        [
            format!("service: {}", self.service_version),
            format!("session: {}", self.state),
            format!("pose:    {}", self.pose),
            format!("event:   {}", self.event),
        ]
    }
}

impl fmt::Display for HudModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines = self.lines();
        let mut first = true;
        for line in &lines {
            if !first {
                writeln!(f)?;
            }
            f.write_str(line)?;
            first = false;
        }
        Ok(())
    }
}
