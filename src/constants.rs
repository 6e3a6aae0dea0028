//! Constants used throughout the application

use std::time::Duration;

/// Number of body landmarks produced by the pose model (`BlazePose` full-body layout)
pub const NUM_POSE_LANDMARKS: usize = 33;

/// Acceptable elbow angle range in degrees
pub const ELBOW_MIN_DEG: f64 = 50.0;
pub const ELBOW_MAX_DEG: f64 = 180.0;

/// Acceptable camera distance range in centimeters
pub const DIST_MIN_CM: f64 = 70.0;
pub const DIST_MAX_CM: f64 = 100.0;

/// Assumed average shoulder width used by the pinhole distance estimate
pub const AVG_SHOULDER_WIDTH_CM: f64 = 30.0;

/// Assumed webcam focal length in pixels
pub const FOCAL_LENGTH_PX: f64 = 650.0;

/// Sliding window size for median/majority smoothing
pub const SMOOTH_WINDOW: usize = 7;

/// Symmetric dead-zone around the shoulder midpoint for gaze classification
pub const GAZE_DEAD_ZONE: f64 = 0.03;

/// Minimum per-landmark visibility required to trust a frame
pub const VISIBILITY_FLOOR: f32 = 0.5;

/// Requested capture resolution
pub const FRAME_WIDTH: i32 = 640;
pub const FRAME_HEIGHT: i32 = 480;

/// Sleep between worker ticks, bounds CPU use
pub const WORKER_TICK: Duration = Duration::from_millis(50);

/// Poll interval while the worker is paused
pub const PAUSE_POLL: Duration = Duration::from_millis(100);

/// Overlay refresh period in milliseconds
pub const UI_REFRESH_MS: i32 = 400;

/// Selectable rest-reminder intervals in minutes
pub const REST_INTERVAL_CHOICES_MIN: [u64; 4] = [30, 45, 60, 120];

/// Default rest-reminder interval in minutes
pub const DEFAULT_REST_INTERVAL_MIN: u64 = 30;

/// Pixel separations below this are treated as degenerate
pub const DEGENERATE_SEPARATION_PX: f64 = 1e-6;
