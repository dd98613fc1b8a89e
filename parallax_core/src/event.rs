// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracking lifecycle events.
//!
//! The tracking service reports lifecycle changes (connected, lost,
//! recovered, fatal) alongside poses. Consumers only need the most recent
//! event — the cache retains latest-only, no history.

use core::fmt;

use crate::pose::PoseTimestamp;

/// What kind of lifecycle change the service reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackingEventKind {
    /// The service connection is up and producing poses.
    ServiceConnected,
    /// Tracking was lost; recoverable, possibly automatically.
    TrackingLost,
    /// Tracking recovered after a loss.
    Recovered,
    /// Unrecoverable failure; the session must disconnect.
    FatalError,
}

impl TrackingEventKind {
    /// Short label for diagnostics output.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ServiceConnected => "service-connected",
            Self::TrackingLost => "tracking-lost",
            Self::Recovered => "recovered",
            Self::FatalError => "fatal-error",
        }
    }

    /// Whether the session can keep running after this event.
    #[must_use]
    pub const fn is_recoverable(self) -> bool {
        !matches!(self, Self::FatalError)
    }
}

/// A lifecycle event reported by the tracking service.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackingEvent {
    /// The kind of change.
    pub kind: TrackingEventKind,
    /// When the event occurred, on the service's clock.
    pub timestamp: PoseTimestamp,
    /// Free-text diagnostic from the service.
    pub message: String,
}

impl TrackingEvent {
    /// Creates an event.
    #[must_use]
    pub fn new(kind: TrackingEventKind, timestamp: PoseTimestamp, message: impl Into<String>) -> Self {
        Self {
            kind,
            timestamp,
            message: message.into(),
        }
    }
}

impl fmt::Display for TrackingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at t={:.3}s: {}",
            self.kind.label(),
            self.timestamp.seconds(),
            self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_format() {
        let ev = TrackingEvent::new(
            TrackingEventKind::TrackingLost,
            PoseTimestamp(2.25),
            "feature-poor scene",
        );
        assert_eq!(ev.to_string(), "tracking-lost at t=2.250s: feature-poor scene");
    }

    #[test]
    fn only_fatal_is_unrecoverable() {
        assert!(TrackingEventKind::ServiceConnected.is_recoverable());
        assert!(TrackingEventKind::TrackingLost.is_recoverable());
        assert!(TrackingEventKind::Recovered.is_recoverable());
        assert!(!TrackingEventKind::FatalError.is_recoverable());
    }
}
