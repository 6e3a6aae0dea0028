//! Background worker driving the capture-analyze-publish loop.
//!
//! The worker owns the capture device and the detector for its whole life
//! and talks to the overlay only through the latest-only channel and two
//! level-triggered atomic flags (pause, stop). Lifecycle:
//! `Starting -> Running <-> Paused -> Stopped`. Cancellation is cooperative:
//! flags are observed between ticks, so worst-case shutdown latency is one
//! tick plus the tick sleep.

use crate::analyzer::FrameAnalyzer;
use crate::capture::{Camera, FrameSource};
use crate::channel::LatestOnlyChannel;
use crate::config::Config;
use crate::detection::PoseDetector;
use crate::landmarks::LandmarkSource;
use crate::status::StatusMessage;
use crate::Result;
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Channel type carrying one tick's worth of status messages
pub type StatusChannel = LatestOnlyChannel<Vec<StatusMessage>>;

/// Cloneable handle for pausing and stopping the worker.
///
/// Both flags are level-triggered: a toggle observed mid-tick simply takes
/// effect on the next tick.
#[derive(Debug, Clone, Default)]
pub struct WorkerControls {
    paused: Arc<AtomicBool>,
    stopped: Arc<AtomicBool>,
}

impl WorkerControls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suspend capturing and publishing until [`resume`](Self::resume)
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
    }

    /// Resume the tick loop; smoothing windows are untouched by a pause
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
    }

    /// Request a cooperative shutdown; idempotent
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Relaxed)
    }
}

/// The capture-analyze-publish loop, generic over its two device seams
pub struct PostureWorker<S, D> {
    source: S,
    detector: D,
    analyzer: FrameAnalyzer,
    channel: Arc<StatusChannel>,
    controls: WorkerControls,
    tick_sleep: Duration,
    pause_poll: Duration,
}

impl<S: FrameSource, D: LandmarkSource> PostureWorker<S, D> {
    /// Build a worker around already-opened devices
    pub fn new(source: S, detector: D, config: &Config, channel: Arc<StatusChannel>, controls: WorkerControls) -> Self {
        Self {
            source,
            detector,
            analyzer: FrameAnalyzer::new(config.posture.clone()),
            channel,
            controls,
            tick_sleep: config.timing.worker_tick(),
            pause_poll: config.timing.pause_poll(),
        }
    }

    /// Run the tick loop until the stop flag is set.
    ///
    /// Consumes the worker; the capture device and the model session are
    /// dropped (and released) on every exit path.
    pub fn run(mut self) {
        info!("Posture worker running");

        while !self.controls.is_stopped() {
            if self.controls.is_paused() {
                thread::sleep(self.pause_poll);
                continue;
            }

            self.tick();
            thread::sleep(self.tick_sleep);
        }

        info!("Posture worker stopped");
    }

    /// One capture-analyze-publish iteration; never fails
    fn tick(&mut self) {
        let (width, height) = self.source.frame_size();

        let messages = match self.source.read() {
            Ok(frame) => match self.detector.detect(&frame) {
                Ok(detection) => self.analyzer.analyze(width, height, detection.as_ref()),
                Err(e) => {
                    debug!("Detection failed, degrading to warning: {e}");
                    vec![StatusMessage::move_into_frame()]
                }
            },
            Err(e) => {
                debug!("Frame read failed: {e}");
                vec![StatusMessage::camera_read_failed()]
            }
        };

        self.channel.publish(messages);
    }

    /// Move the loop onto its own thread
    pub fn spawn(self) -> JoinHandle<()>
    where
        S: Send + 'static,
        D: Send + 'static,
    {
        thread::spawn(move || self.run())
    }
}

/// Spawn a worker that opens its devices inside the thread.
///
/// Failure to open either is fatal for the worker: a single warning is
/// published and the thread exits (the overlay keeps running).
pub fn spawn_worker_with<S, D, FS, FD>(
    config: Config,
    channel: Arc<StatusChannel>,
    controls: WorkerControls,
    open_source: FS,
    open_detector: FD,
) -> JoinHandle<()>
where
    S: FrameSource + Send + 'static,
    D: LandmarkSource + Send + 'static,
    FS: FnOnce(&Config) -> Result<S> + Send + 'static,
    FD: FnOnce(&Config) -> Result<D> + Send + 'static,
{
    thread::spawn(move || {
        let source = match open_source(&config) {
            Ok(source) => source,
            Err(e) => {
                error!("Camera open failed: {e}");
                channel.publish(vec![StatusMessage::camera_not_detected()]);
                return;
            }
        };

        let detector = match open_detector(&config) {
            Ok(detector) => detector,
            Err(e) => {
                error!("Pose model load failed: {e}");
                channel.publish(vec![StatusMessage::internal_error()]);
                return;
            }
        };

        PostureWorker::new(source, detector, &config, channel, controls).run();
    })
}

/// Production entry point: webcam capture plus the ONNX pose model
#[must_use]
pub fn spawn_posture_worker(config: Config, channel: Arc<StatusChannel>, controls: WorkerControls) -> JoinHandle<()> {
    spawn_worker_with(
        config,
        channel,
        controls,
        |config| Camera::open(&config.camera),
        |config| PoseDetector::new(&config.model.pose_model),
    )
}
