//! Per-frame posture analysis.
//!
//! [`FrameAnalyzer`] turns one frame's landmark detection into an ordered
//! list of status messages: elbow, distance, gaze. Detection gaps and any
//! failure inside the geometric stage degrade to a single "move into frame"
//! warning for that tick; nothing escapes a tick as a hard failure. The
//! smoothing windows deliberately survive dropouts so a brief occlusion does
//! not restart the medians.

use crate::config::PostureConfig;
use crate::geometry::{classify_gaze, elbow_angle, shoulder_distance_cm, GazeDirection};
use crate::landmarks::{BodyPart, LandmarkFrame};
use crate::smoothing::{MajorityWindow, MedianWindow};
use crate::status::StatusMessage;
use crate::{Error, Result};
use log::debug;

/// Stateful per-frame analyzer owning the three smoothing windows
pub struct FrameAnalyzer {
    config: PostureConfig,
    angles: MedianWindow,
    distances: MedianWindow,
    gazes: MajorityWindow<GazeDirection>,
}

impl FrameAnalyzer {
    /// Create an analyzer with fresh smoothing windows
    #[must_use]
    pub fn new(config: PostureConfig) -> Self {
        let window = config.smooth_window;
        Self {
            config,
            angles: MedianWindow::new(window),
            distances: MedianWindow::new(window),
            gazes: MajorityWindow::new(window),
        }
    }

    /// Analyze one frame's detection result.
    ///
    /// `frame_width`/`frame_height` are the capture dimensions in pixels,
    /// used to scale normalized landmarks for the distance estimate.
    /// Returns either a single warning or the fixed elbow/distance/gaze
    /// triple; never fails.
    pub fn analyze(
        &mut self,
        frame_width: i32,
        frame_height: i32,
        detection: Option<&LandmarkFrame>,
    ) -> Vec<StatusMessage> {
        let Some(frame) = detection else {
            return vec![StatusMessage::move_into_frame()];
        };

        if !frame.all_visible(self.config.visibility_floor) {
            return vec![StatusMessage::move_into_frame()];
        }

        match self.analyze_posture(frame_width, frame_height, frame) {
            Ok(messages) => messages,
            Err(e) => {
                debug!("Posture analysis degraded to warning: {e}");
                vec![StatusMessage::move_into_frame()]
            }
        }
    }

    /// The fallible geometric stage, collapsed to a warning by `analyze`
    fn analyze_posture(
        &mut self,
        frame_width: i32,
        frame_height: i32,
        frame: &LandmarkFrame,
    ) -> Result<Vec<StatusMessage>> {
        let nose = frame.get(BodyPart::Nose);
        let left_shoulder = frame.get(BodyPart::LeftShoulder);
        let right_shoulder = frame.get(BodyPart::RightShoulder);
        let left_elbow = frame.get(BodyPart::LeftElbow);
        let left_wrist = frame.get(BodyPart::LeftWrist);

        let mut messages = Vec::with_capacity(3);

        // Elbow
        let angle = elbow_angle(
            (f64::from(left_shoulder.x), f64::from(left_shoulder.y)),
            (f64::from(left_elbow.x), f64::from(left_elbow.y)),
            (f64::from(left_wrist.x), f64::from(left_wrist.y)),
        );
        if !angle.is_finite() {
            return Err(Error::LandmarkError("Non-finite elbow angle".to_string()));
        }
        self.angles.push(angle);
        let smoothed_angle = self
            .angles
            .median()
            .ok_or_else(|| Error::LandmarkError("Empty angle window".to_string()))?;
        if (self.config.elbow_min_deg..=self.config.elbow_max_deg).contains(&smoothed_angle) {
            messages.push(StatusMessage::elbow_ok());
        } else {
            messages.push(StatusMessage::adjust_elbow());
        }

        // Distance
        let left_px = (
            f64::from(left_shoulder.x) * f64::from(frame_width),
            f64::from(left_shoulder.y) * f64::from(frame_height),
        );
        let right_px = (
            f64::from(right_shoulder.x) * f64::from(frame_width),
            f64::from(right_shoulder.y) * f64::from(frame_height),
        );
        let distance_cm = shoulder_distance_cm(
            left_px,
            right_px,
            self.config.focal_length_px,
            self.config.shoulder_width_cm,
        );
        if distance_cm > 0.0 {
            self.distances.push(distance_cm);
            let smoothed = self
                .distances
                .median()
                .ok_or_else(|| Error::LandmarkError("Empty distance window".to_string()))?;
            if (self.config.dist_min_cm..=self.config.dist_max_cm).contains(&smoothed) {
                messages.push(StatusMessage::distance_ok());
            } else if smoothed < self.config.dist_min_cm {
                messages.push(StatusMessage::too_close());
            } else {
                messages.push(StatusMessage::too_far());
            }
        } else {
            // Degenerate geometry; window keeps its history
            messages.push(StatusMessage::move_into_frame());
        }

        // Gaze
        let direction = classify_gaze(
            f64::from(nose.x),
            f64::from(left_shoulder.x),
            f64::from(right_shoulder.x),
            self.config.gaze_dead_zone,
        );
        self.gazes.push(direction);
        let voted = self
            .gazes
            .majority()
            .ok_or_else(|| Error::LandmarkError("Empty gaze window".to_string()))?;
        messages.push(StatusMessage::gaze(voted));

        Ok(messages)
    }

    /// Number of samples currently held in the angle window
    #[must_use]
    pub fn angle_window_len(&self) -> usize {
        self.angles.len()
    }

    /// Number of samples currently held in the distance window
    #[must_use]
    pub fn distance_window_len(&self) -> usize {
        self.distances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_POSE_LANDMARKS;
    use crate::landmarks::Landmark;
    use crate::status::{Severity, Topic};

    const WIDTH: i32 = 640;
    const HEIGHT: i32 = 480;

    fn analyzer() -> FrameAnalyzer {
        FrameAnalyzer::new(PostureConfig::default())
    }

    /// Landmarks for a right-angle left elbow, shoulders roughly 85 cm from
    /// the camera and the nose on the shoulder midpoint.
    fn good_posture_points() -> Vec<Landmark> {
        let mut points = vec![
            Landmark {
                x: 0.5,
                y: 0.5,
                visibility: 0.9,
            };
            NUM_POSE_LANDMARKS
        ];
        let mut set = |part: BodyPart, x: f32, y: f32| {
            points[part.index()] = Landmark { x, y, visibility: 0.9 };
        };
        // 650 * 30 / 85 cm ~= 229 px separation at 640 px width
        set(BodyPart::LeftShoulder, 0.68, 0.5);
        set(BodyPart::RightShoulder, 0.32, 0.5);
        set(BodyPart::Nose, 0.5, 0.3);
        // Upper arm straight down, forearm horizontal: 90 degrees
        set(BodyPart::LeftElbow, 0.68, 0.7);
        set(BodyPart::LeftWrist, 0.8, 0.7);
        points
    }

    fn good_posture_frame() -> LandmarkFrame {
        LandmarkFrame::from_points(good_posture_points()).unwrap()
    }

    #[test]
    fn test_good_posture_emits_ordered_triple() {
        let mut analyzer = analyzer();
        let frame = good_posture_frame();
        let messages = analyzer.analyze(WIDTH, HEIGHT, Some(&frame));

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].topic, Topic::Elbow);
        assert_eq!(messages[0].severity, Severity::Ok);
        assert_eq!(messages[1].topic, Topic::Distance);
        assert_eq!(messages[2].topic, Topic::Gaze);
    }

    #[test]
    fn test_no_body_emits_single_warning() {
        let mut analyzer = analyzer();
        let messages = analyzer.analyze(WIDTH, HEIGHT, None);
        assert_eq!(messages, vec![StatusMessage::move_into_frame()]);
    }

    #[test]
    fn test_low_confidence_emits_single_warning() {
        let mut analyzer = analyzer();
        let mut points = good_posture_points();
        // One required landmark below the floor spoils the whole frame
        points[BodyPart::Nose.index()].visibility = 0.3;
        let frame = LandmarkFrame::from_points(points).unwrap();
        let messages = analyzer.analyze(WIDTH, HEIGHT, Some(&frame));
        assert_eq!(messages, vec![StatusMessage::move_into_frame()]);
    }

    #[test]
    fn test_dropout_preserves_window_history() {
        let mut analyzer = analyzer();
        let frame = good_posture_frame();
        for _ in 0..3 {
            analyzer.analyze(WIDTH, HEIGHT, Some(&frame));
        }
        assert_eq!(analyzer.angle_window_len(), 3);
        assert_eq!(analyzer.distance_window_len(), 3);

        for _ in 0..5 {
            let messages = analyzer.analyze(WIDTH, HEIGHT, None);
            assert_eq!(messages, vec![StatusMessage::move_into_frame()]);
        }
        // Windows unchanged by the dropout
        assert_eq!(analyzer.angle_window_len(), 3);
        assert_eq!(analyzer.distance_window_len(), 3);
    }

    #[test]
    fn test_degenerate_shoulders_warn_in_distance_slot() {
        let mut analyzer = analyzer();
        let mut points = vec![
            Landmark {
                x: 0.5,
                y: 0.5,
                visibility: 0.9,
            };
            NUM_POSE_LANDMARKS
        ];
        // Shoulders coincide: distance estimate unavailable
        points[BodyPart::LeftElbow.index()] = Landmark {
            x: 0.5,
            y: 0.7,
            visibility: 0.9,
        };
        points[BodyPart::LeftWrist.index()] = Landmark {
            x: 0.6,
            y: 0.7,
            visibility: 0.9,
        };
        let frame = LandmarkFrame::from_points(points).unwrap();
        let messages = analyzer.analyze(WIDTH, HEIGHT, Some(&frame));

        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1], StatusMessage::move_into_frame());
        assert_eq!(analyzer.distance_window_len(), 0);
    }

    #[test]
    fn test_determinism_over_fixed_sequence() {
        let frame = good_posture_frame();
        let run = || {
            let mut analyzer = FrameAnalyzer::new(PostureConfig::default());
            let mut published = Vec::new();
            for tick in 0..10 {
                let detection = if tick % 3 == 2 { None } else { Some(&frame) };
                published.push(analyzer.analyze(WIDTH, HEIGHT, detection));
            }
            published
        };
        assert_eq!(run(), run());
    }
}
