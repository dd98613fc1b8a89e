// Copyright 2026 the Parallax Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A [`TrackingService`] that replays a [`PoseScript`] from a worker thread.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError, bounded};

use parallax_core::event::{TrackingEvent, TrackingEventKind};
use parallax_core::service::{PoseListener, ServiceError, ServiceVersion, TrackingService};
use parallax_core::session::SessionConfig;

use crate::script::{PoseScript, ScriptStep};

/// API version the scripted service reports.
pub const SCRIPTED_API: u32 = 3;

struct Worker {
    stop_tx: Sender<()>,
    handle: JoinHandle<()>,
}

/// Replays a pose script to the registered listener from its own thread.
///
/// Deliveries arrive off the caller's thread, exactly like a real tracking
/// SDK's callback thread, so tests driven by this service exercise the same
/// cross-thread paths as production wiring. A stop/start cycle replays the
/// script from the beginning.
pub struct ScriptedService {
    version: ServiceVersion,
    script: PoseScript,
    config: SessionConfig,
    worker: Option<Worker>,
    resets: u32,
}

impl ScriptedService {
    /// Creates a service that will replay `script` on each start.
    #[must_use]
    pub fn new(script: PoseScript) -> Self {
        Self {
            version: ServiceVersion {
                api: SCRIPTED_API,
                description: "parallax scripted service".into(),
            },
            script,
            config: SessionConfig::default(),
            worker: None,
            resets: 0,
        }
    }

    /// Overrides the reported API version, for compatibility-check tests.
    #[must_use]
    pub fn with_api(mut self, api: u32) -> Self {
        self.version.api = api;
        self
    }

    /// Whether a replay thread has been started and not yet stopped.
    ///
    /// Stays true after the script runs out; a real service keeps its
    /// session open even when no poses are flowing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// How many times [`reset`](TrackingService::reset) has been called.
    #[must_use]
    pub fn resets(&self) -> u32 {
        self.resets
    }
}

impl TrackingService for ScriptedService {
    fn version(&self) -> Result<ServiceVersion, ServiceError> {
        Ok(self.version.clone())
    }

    fn configure(&mut self, config: &SessionConfig) -> Result<(), ServiceError> {
        log::debug!("scripted service configured, auto_recovery={}", config.auto_recovery);
        self.config = *config;
        Ok(())
    }

    fn start(&mut self, listener: Arc<dyn PoseListener>) -> Result<(), ServiceError> {
        self.stop();
        let (stop_tx, stop_rx) = bounded(1);
        let steps = self.script.clone().into_steps();
        let auto_recovery = self.config.auto_recovery;
        let handle = thread::Builder::new()
            .name("parallax-scripted-delivery".into())
            .spawn(move || replay(&steps, auto_recovery, &*listener, &stop_rx))
            .map_err(|err| ServiceError::Internal(format!("spawn delivery thread: {err}")))?;
        self.worker = Some(Worker { stop_tx, handle });
        log::debug!("scripted delivery started");
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            // The thread may already have finished the script; a failed send
            // just means nobody is listening anymore.
            let _ = worker.stop_tx.send(());
            if worker.handle.join().is_err() {
                log::error!("scripted delivery thread panicked");
            }
            log::debug!("scripted delivery stopped");
        }
    }

    fn reset(&mut self) -> Result<(), ServiceError> {
        self.resets += 1;
        log::debug!("scripted service reset ({} total)", self.resets);
        Ok(())
    }

    fn shutdown(&mut self) {
        self.stop();
        log::debug!("scripted service shut down");
    }
}

impl Drop for ScriptedService {
    fn drop(&mut self) {
        self.stop();
    }
}

impl core::fmt::Debug for ScriptedService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ScriptedService")
            .field("version", &self.version)
            .field("script", &self.script)
            .field("config", &self.config)
            .field("running", &self.worker.is_some())
            .field("resets", &self.resets)
            .finish_non_exhaustive()
    }
}

fn replay(
    steps: &[ScriptStep],
    auto_recovery: bool,
    listener: &dyn PoseListener,
    stop_rx: &Receiver<()>,
) {
    for step in steps {
        match step {
            ScriptStep::Wait(duration) => {
                // Also wakes immediately on stop.
                match stop_rx.recv_timeout(*duration) {
                    Err(RecvTimeoutError::Timeout) => {}
                    _ => return,
                }
            }
            ScriptStep::Pose(pose) => {
                if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                    return;
                }
                listener.on_pose(*pose);
            }
            ScriptStep::Event(event) => {
                if !matches!(stop_rx.try_recv(), Err(TryRecvError::Empty)) {
                    return;
                }
                if event.kind == TrackingEventKind::FatalError && auto_recovery {
                    // With auto-recovery on, the service absorbs the failure
                    // internally and reports a loss/recovery pair instead.
                    listener.on_event(TrackingEvent::new(
                        TrackingEventKind::TrackingLost,
                        event.timestamp,
                        event.message.clone(),
                    ));
                    listener.on_event(TrackingEvent::new(
                        TrackingEventKind::Recovered,
                        event.timestamp,
                        "recovered in service",
                    ));
                } else {
                    listener.on_event(event.clone());
                }
            }
        }
    }
    log::debug!("script exhausted after {} steps", steps.len());
}
