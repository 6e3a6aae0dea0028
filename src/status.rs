//! Status messages published by the analysis pipeline.
//!
//! Each message carries an explicit severity tag so the overlay never has to
//! infer styling from the text content.

use crate::geometry::GazeDirection;

/// What a message is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Elbow,
    Distance,
    Gaze,
    Warning,
}

/// How a message should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Posture is fine
    Ok,
    /// Needs attention
    Warning,
    /// Neutral information
    Info,
}

/// One line of feedback for the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub topic: Topic,
    pub severity: Severity,
    pub text: String,
}

impl StatusMessage {
    pub fn elbow_ok() -> Self {
        Self {
            topic: Topic::Elbow,
            severity: Severity::Ok,
            text: "Elbow OK".to_string(),
        }
    }

    pub fn adjust_elbow() -> Self {
        Self {
            topic: Topic::Elbow,
            severity: Severity::Warning,
            text: "Adjust elbow".to_string(),
        }
    }

    pub fn distance_ok() -> Self {
        Self {
            topic: Topic::Distance,
            severity: Severity::Ok,
            text: "Distance OK".to_string(),
        }
    }

    pub fn too_close() -> Self {
        Self {
            topic: Topic::Distance,
            severity: Severity::Warning,
            text: "Too close to screen".to_string(),
        }
    }

    pub fn too_far() -> Self {
        Self {
            topic: Topic::Distance,
            severity: Severity::Warning,
            text: "Too far from screen".to_string(),
        }
    }

    pub fn gaze(direction: GazeDirection) -> Self {
        Self {
            topic: Topic::Gaze,
            severity: Severity::Info,
            text: direction.to_string(),
        }
    }

    /// Generic detection-gap warning, used for missing bodies, low
    /// confidence and degenerate geometry alike
    pub fn move_into_frame() -> Self {
        Self {
            topic: Topic::Warning,
            severity: Severity::Warning,
            text: "Move into frame".to_string(),
        }
    }

    pub fn camera_read_failed() -> Self {
        Self {
            topic: Topic::Warning,
            severity: Severity::Warning,
            text: "Unable to read from camera".to_string(),
        }
    }

    /// Fatal startup warning, published once before the worker stops
    pub fn camera_not_detected() -> Self {
        Self {
            topic: Topic::Warning,
            severity: Severity::Warning,
            text: "Camera not detected".to_string(),
        }
    }

    /// Fatal startup warning for a broken analysis backend
    pub fn internal_error() -> Self {
        Self {
            topic: Topic::Warning,
            severity: Severity::Warning,
            text: "Internal error, see log".to_string(),
        }
    }
}
