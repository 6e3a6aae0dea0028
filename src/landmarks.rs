//! Body landmark types and the detector-facing contract.
//!
//! A [`LandmarkFrame`] is the per-frame output of a pose detector: a set of
//! named 2-D keypoints in normalized image coordinates with a per-point
//! visibility confidence. The analysis pipeline depends only on the
//! [`LandmarkSource`] trait, not on any particular detector backend.

use crate::constants::NUM_POSE_LANDMARKS;
use opencv::core::Mat;

use crate::Result;

/// A single 2-D body keypoint in normalized `[0, 1]` image coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Detector confidence that the point is visible, in `[0, 1]`
    pub visibility: f32,
}

/// Body parts required by the posture analysis.
///
/// Indices follow the 33-point `BlazePose` full-body layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyPart {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    LeftWrist,
}

impl BodyPart {
    /// Index of this part in the pose model's output tensor
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            BodyPart::Nose => 0,
            BodyPart::LeftShoulder => 11,
            BodyPart::RightShoulder => 12,
            BodyPart::LeftElbow => 13,
            BodyPart::LeftWrist => 15,
        }
    }

    /// All parts the analyzer requires, in index order
    pub const REQUIRED: [BodyPart; 5] = [
        BodyPart::Nose,
        BodyPart::LeftShoulder,
        BodyPart::RightShoulder,
        BodyPart::LeftElbow,
        BodyPart::LeftWrist,
    ];
}

/// One frame's worth of detected body landmarks
#[derive(Debug, Clone)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    /// Build a frame from the full landmark list produced by the detector
    ///
    /// # Errors
    ///
    /// Returns an error if fewer points are supplied than the pose model
    /// layout defines.
    pub fn from_points(points: Vec<Landmark>) -> Result<Self> {
        if points.len() < NUM_POSE_LANDMARKS {
            return Err(crate::Error::ModelOutputError(format!(
                "Expected {} landmarks, got {}",
                NUM_POSE_LANDMARKS,
                points.len()
            )));
        }
        Ok(Self { points })
    }

    /// Look up a body part
    #[must_use]
    pub fn get(&self, part: BodyPart) -> Landmark {
        self.points[part.index()]
    }

    /// True if every required landmark meets the visibility floor
    #[must_use]
    pub fn all_visible(&self, floor: f32) -> bool {
        BodyPart::REQUIRED.iter().all(|&p| self.get(p).visibility >= floor)
    }
}

/// Contract for anything that can turn an image into body landmarks.
///
/// Returns `Ok(None)` when no body is present in the frame.
pub trait LandmarkSource {
    /// Detect body landmarks in a single frame
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying detector fails; detection gaps
    /// (no body found) are `Ok(None)`, not errors.
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkFrame>>;
}
