//! Configuration management for the posture coach application

use crate::constants::{
    AVG_SHOULDER_WIDTH_CM, DEFAULT_REST_INTERVAL_MIN, DIST_MAX_CM, DIST_MIN_CM, ELBOW_MAX_DEG, ELBOW_MIN_DEG,
    FOCAL_LENGTH_PX, FRAME_HEIGHT, FRAME_WIDTH, GAZE_DEAD_ZONE, PAUSE_POLL, REST_INTERVAL_CHOICES_MIN,
    SMOOTH_WINDOW, UI_REFRESH_MS, VISIBILITY_FLOOR, WORKER_TICK,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Capture device configuration
    pub camera: CameraConfig,

    /// Model file configuration
    pub model: ModelConfig,

    /// Posture analysis thresholds
    pub posture: PostureConfig,

    /// Worker and overlay timing
    pub timing: TimingConfig,
}

/// Capture device parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Camera device index
    pub index: i32,

    /// Requested frame width in pixels
    pub frame_width: i32,

    /// Requested frame height in pixels
    pub frame_height: i32,
}

/// Model file paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the pose landmark ONNX model
    pub pose_model: PathBuf,
}

/// Posture analysis thresholds and tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostureConfig {
    /// Lower acceptable elbow angle in degrees
    pub elbow_min_deg: f64,

    /// Upper acceptable elbow angle in degrees
    pub elbow_max_deg: f64,

    /// Lower acceptable camera distance in centimeters
    pub dist_min_cm: f64,

    /// Upper acceptable camera distance in centimeters
    pub dist_max_cm: f64,

    /// Assumed average shoulder width in centimeters
    pub shoulder_width_cm: f64,

    /// Assumed webcam focal length in pixels
    pub focal_length_px: f64,

    /// Smoothing window size for all three channels
    pub smooth_window: usize,

    /// Symmetric gaze dead-zone around the shoulder midpoint
    pub gaze_dead_zone: f64,

    /// Minimum landmark visibility to trust a frame (0.0-1.0)
    pub visibility_floor: f32,
}

/// Worker loop and overlay timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Sleep between worker ticks in milliseconds
    pub worker_tick_ms: u64,

    /// Poll interval while paused in milliseconds
    pub pause_poll_ms: u64,

    /// Overlay refresh period in milliseconds
    pub ui_refresh_ms: i32,

    /// Rest-reminder interval in minutes
    pub rest_interval_min: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            model: ModelConfig::default(),
            posture: PostureConfig::default(),
            timing: TimingConfig::default(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pose_model: PathBuf::from("assets/pose_landmarks.onnx"),
        }
    }
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            elbow_min_deg: ELBOW_MIN_DEG,
            elbow_max_deg: ELBOW_MAX_DEG,
            dist_min_cm: DIST_MIN_CM,
            dist_max_cm: DIST_MAX_CM,
            shoulder_width_cm: AVG_SHOULDER_WIDTH_CM,
            focal_length_px: FOCAL_LENGTH_PX,
            smooth_window: SMOOTH_WINDOW,
            gaze_dead_zone: GAZE_DEAD_ZONE,
            visibility_floor: VISIBILITY_FLOOR,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            worker_tick_ms: WORKER_TICK.as_millis() as u64,
            pause_poll_ms: PAUSE_POLL.as_millis() as u64,
            ui_refresh_ms: UI_REFRESH_MS,
            rest_interval_min: DEFAULT_REST_INTERVAL_MIN,
        }
    }
}

impl TimingConfig {
    /// Sleep between worker ticks
    #[must_use]
    pub fn worker_tick(&self) -> Duration {
        Duration::from_millis(self.worker_tick_ms)
    }

    /// Poll interval while paused
    #[must_use]
    pub fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    /// Rest-reminder interval
    #[must_use]
    pub fn rest_interval(&self) -> Duration {
        Duration::from_secs(self.rest_interval_min * 60)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the file write fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid field found.
    pub fn validate(&self) -> Result<()> {
        if self.posture.elbow_min_deg >= self.posture.elbow_max_deg {
            return Err(Error::ConfigError(
                "Elbow angle bounds must satisfy min < max".to_string(),
            ));
        }
        if self.posture.dist_min_cm >= self.posture.dist_max_cm {
            return Err(Error::ConfigError("Distance bounds must satisfy min < max".to_string()));
        }
        if self.posture.shoulder_width_cm <= 0.0 || self.posture.focal_length_px <= 0.0 {
            return Err(Error::ConfigError(
                "Shoulder width and focal length must be positive".to_string(),
            ));
        }
        if self.posture.smooth_window == 0 {
            return Err(Error::ConfigError(
                "Smoothing window size must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.posture.visibility_floor) {
            return Err(Error::ConfigError(
                "Visibility floor must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=0.5).contains(&self.posture.gaze_dead_zone) {
            return Err(Error::ConfigError(
                "Gaze dead-zone must be between 0.0 and 0.5".to_string(),
            ));
        }
        if self.timing.worker_tick_ms == 0 || self.timing.ui_refresh_ms <= 0 {
            return Err(Error::ConfigError("Timing intervals must be positive".to_string()));
        }
        if !REST_INTERVAL_CHOICES_MIN.contains(&self.timing.rest_interval_min) {
            return Err(Error::ConfigError(format!(
                "Rest interval must be one of {REST_INTERVAL_CHOICES_MIN:?} minutes"
            )));
        }
        if self.camera.frame_width <= 0 || self.camera.frame_height <= 0 {
            return Err(Error::ConfigError("Frame dimensions must be positive".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Sit Smart Coach Configuration

# Capture device
camera:
  index: 0
  frame_width: 640
  frame_height: 480

# Model paths
model:
  pose_model: "assets/pose_landmarks.onnx"

# Posture analysis
posture:
  elbow_min_deg: 50.0
  elbow_max_deg: 180.0
  dist_min_cm: 70.0
  dist_max_cm: 100.0
  shoulder_width_cm: 30.0
  focal_length_px: 650.0
  smooth_window: 7
  gaze_dead_zone: 0.03
  visibility_floor: 0.5

# Timing
timing:
  worker_tick_ms: 50
  pause_poll_ms: 100
  ui_refresh_ms: 400
  rest_interval_min: 30
"#;
