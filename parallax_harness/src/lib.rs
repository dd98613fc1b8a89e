// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scripted doubles for the Parallax engine.
//!
//! Real deployments pair `parallax_core` with a native tracking SDK and a
//! GPU renderer. This crate replaces both seams with deterministic,
//! dependency-free stand-ins so the whole pipeline runs headless:
//!
//! **[`script`]** — [`PoseScript`](script::PoseScript), an ordered list of
//! poses, lifecycle events, and pauses, with a canned circular-walk
//! generator.
//!
//! **[`service`]** — [`ScriptedService`](service::ScriptedService), a
//! [`TrackingService`](parallax_core::service::TrackingService) that replays
//! a script from its own worker thread, exactly like a real service
//! delivering on a callback thread.
//!
//! **[`renderer`]** — [`RecordingRenderer`](renderer::RecordingRenderer), a
//! [`SceneRenderer`](parallax_core::render::SceneRenderer) that records every
//! frame it is asked to draw.
//!
//! **[`hud`]** — A plain-text model of the on-screen diagnostics overlay.

pub mod hud;
pub mod renderer;
pub mod script;
pub mod service;
