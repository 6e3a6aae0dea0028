//! Pure geometric estimators for posture analysis.
//!
//! All functions here are deterministic and stateless; smoothing of their
//! per-frame outputs lives in [`crate::smoothing`].

use crate::constants::DEGENERATE_SEPARATION_PX;
use std::fmt;

/// Which way the head is turned relative to the shoulders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GazeDirection {
    Left,
    Right,
    Center,
}

impl fmt::Display for GazeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GazeDirection::Left => write!(f, "Looking left"),
            GazeDirection::Right => write!(f, "Looking right"),
            GazeDirection::Center => write!(f, "Looking center"),
        }
    }
}

/// Angle in degrees at vertex `b` of the triangle `a-b-c`, folded to `[0, 180]`.
///
/// Computed from the signed difference of the two limb vectors' polar angles,
/// so it is symmetric under left/right mirroring. Three collinear points with
/// `b` between `a` and `c` yield exactly 180°.
#[must_use]
pub fn elbow_angle(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    let ang = (c.1 - b.1).atan2(c.0 - b.0) - (a.1 - b.1).atan2(a.0 - b.0);
    let ang = ang.to_degrees().abs();
    if ang > 180.0 {
        360.0 - ang
    } else {
        ang
    }
}

/// Pinhole-model distance estimate from shoulder separation in pixel space.
///
/// Returns `0.0` when the separation is degenerate (near-zero); callers must
/// treat 0 as "unavailable", never as a valid distance.
#[must_use]
pub fn shoulder_distance_cm(
    left_px: (f64, f64),
    right_px: (f64, f64),
    focal_length_px: f64,
    shoulder_width_cm: f64,
) -> f64 {
    let dx = left_px.0 - right_px.0;
    let dy = left_px.1 - right_px.1;
    let separation = dx.hypot(dy);
    if separation <= DEGENERATE_SEPARATION_PX {
        return 0.0;
    }
    focal_length_px * shoulder_width_cm / separation
}

/// Classify gaze from the nose offset relative to the shoulder midpoint.
///
/// All inputs are normalized `[0, 1]` x-coordinates. Offsets whose magnitude
/// is exactly the dead-zone threshold count as `Center` (inclusive dead-zone).
#[must_use]
pub fn classify_gaze(nose_x: f64, left_shoulder_x: f64, right_shoulder_x: f64, dead_zone: f64) -> GazeDirection {
    let midpoint = (left_shoulder_x + right_shoulder_x) / 2.0;
    let offset = nose_x - midpoint;
    if offset < -dead_zone {
        GazeDirection::Left
    } else if offset > dead_zone {
        GazeDirection::Right
    } else {
        GazeDirection::Center
    }
}
