//! Posture coaching library for continuous ergonomic feedback.
//!
//! This library turns webcam frames into stable, human-readable posture
//! signals using:
//! - ONNX Runtime for body-landmark inference
//! - `OpenCV` for capture and the overlay window
//! - Median/majority smoothing windows to suppress per-frame jitter
//!
//! The pipeline runs on a dedicated worker thread:
//! 1. Grab a frame from the capture device
//! 2. Detect 33 body landmarks with per-point visibility
//! 3. Estimate elbow angle, camera distance and gaze direction
//! 4. Smooth each estimate over a short trailing window
//! 5. Publish an ordered message list through a single-slot channel
//!
//! The overlay polls that channel on its own timer; only the newest
//! analysis ever survives, so the display can never fall behind.
//!
//! # Examples
//!
//! ## Driving the analyzer directly
//!
//! ```no_run
//! use sit_smart_coach::analyzer::FrameAnalyzer;
//! use sit_smart_coach::capture::{Camera, FrameSource};
//! use sit_smart_coach::config::Config;
//! use sit_smart_coach::detection::PoseDetector;
//! use sit_smart_coach::landmarks::LandmarkSource;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let mut camera = Camera::open(&config.camera)?;
//! let mut detector = PoseDetector::new(&config.model.pose_model)?;
//! let mut analyzer = FrameAnalyzer::new(config.posture.clone());
//!
//! let frame = camera.read()?;
//! let detection = detector.detect(&frame)?;
//! let (width, height) = camera.frame_size();
//! for message in analyzer.analyze(width, height, detection.as_ref()) {
//!     println!("{}", message.text);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Running the full worker
//!
//! ```no_run
//! use sit_smart_coach::config::Config;
//! use sit_smart_coach::worker::{spawn_posture_worker, StatusChannel, WorkerControls};
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let channel = Arc::new(StatusChannel::new());
//! let controls = WorkerControls::new();
//!
//! let handle = spawn_posture_worker(config, Arc::clone(&channel), controls.clone());
//!
//! // ... poll `channel` from the UI timer ...
//!
//! controls.stop();
//! handle.join().unwrap();
//! ```

/// Body landmark types and the detector contract
pub mod landmarks;

/// Body landmark detection using ONNX Runtime
pub mod detection;

/// Webcam frame acquisition
pub mod capture;

/// Pure geometric estimators: elbow angle, distance, gaze
pub mod geometry;

/// Sliding-window median and majority smoothing
pub mod smoothing;

/// Status messages published to the overlay
pub mod status;

/// Per-frame posture analysis
pub mod analyzer;

/// Single-slot latest-wins channel
pub mod channel;

/// Background worker lifecycle
pub mod worker;

/// Overlay application
pub mod app;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

/// Utility functions
pub mod utils;

pub use error::{Error, Result};
