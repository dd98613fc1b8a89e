// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types shared across component seams.
//!
//! Session and service errors live next to their modules
//! ([`SessionError`](crate::session::SessionError),
//! [`ServiceError`](crate::service::ServiceError)); this module holds the
//! taxonomy for the render and input seams.

use thiserror::Error;

/// Errors from the GPU-side renderer collaborator.
///
/// Render failures are fatal to the current frame only — the frame loop
/// never propagates them into the session state machine.
#[derive(Debug, Error)]
pub enum RenderError {
    /// GPU resource setup failed; the frame pipeline is unusable.
    #[error("GPU resource allocation failed: {0}")]
    ResourceAllocation(String),
    /// Drawing a single frame failed.
    #[error("frame draw failed: {0}")]
    Draw(String),
}

/// Errors from malformed input batches.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The touch batch claimed more pointers than the router supports.
    #[error("touch batch with {0} pointers; at most 2 are supported")]
    PointerCountOutOfRange(u8),
}
