// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types and lifecycle machinery for pose-tracked AR viewers.
//!
//! `parallax_core` sits between two external collaborators: a native
//! pose-tracking service that delivers timestamped 6-DOF camera poses on its
//! own callback thread, and a GPU scene renderer that consumes the latest
//! pose once per display refresh. Both are represented by traits so the
//! engine can be driven by real platform integrations or by the scripted
//! doubles in `parallax_harness`.
//!
//! # Architecture
//!
//! ```text
//!   TrackingService (callback thread)
//!       │ on_pose / on_event
//!       ▼
//!   TransformCache  ◄── SessionController (connect/disconnect/reset)
//!       │ latest_pose
//!       ▼
//!   FrameLoop (render thread) ──► SceneRenderer::draw
//!       ▲
//!       │ camera rig
//!   InputRouter ◄── touch batches
//! ```
//!
//! **[`pose`]** — Pose, quaternion, and reference-frame types.
//!
//! **[`event`]** — Tracking lifecycle events (connected, lost, recovered,
//! fatal), retained latest-only for the debug UI.
//!
//! **[`cache`]** — The [`TransformCache`](cache::TransformCache): a
//! single-slot, latest-wins snapshot shared between the callback thread and
//! the render thread. Readers never observe a torn pose; writers are never
//! blocked by slow readers beyond a bounded copy.
//!
//! **[`service`]** — The [`TrackingService`](service::TrackingService) and
//! [`PoseListener`](service::PoseListener) collaborator traits.
//!
//! **[`session`]** — The [`SessionController`](session::SessionController)
//! state machine gating every service call.
//!
//! **[`camera`]** / **[`input`]** — Camera modes, orbit rig, and the touch
//! gesture router.
//!
//! **[`render`]** — The [`SceneRenderer`](render::SceneRenderer) seam the
//! frame loop in `parallax_render` drives.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! engine instrumentation, with the single-branch [`Tracer`](trace::Tracer)
//! wrapper.

pub mod cache;
pub mod camera;
pub mod error;
pub mod event;
pub mod input;
pub mod pose;
pub mod render;
pub mod service;
pub mod session;
pub mod trace;
