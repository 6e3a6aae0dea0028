//! Body landmark detection using `ONNX` Runtime.
//!
//! [`PoseDetector`] runs a 33-point `BlazePose`-layout landmark model over a
//! full capture frame and produces a [`LandmarkFrame`] in normalized
//! coordinates, or `None` when no body is present.

use crate::constants::NUM_POSE_LANDMARKS;
use crate::landmarks::{Landmark, LandmarkFrame, LandmarkSource};
use crate::utils::safe_cast::usize_to_i32;
use crate::Result;
use ndarray::{Array1, Array4, CowArray};
use opencv::core::{Mat, Size, CV_32F};
use opencv::imgproc::{self, InterpolationFlags};
use opencv::prelude::*;
use ort::{Environment, Session, Value};
use std::path::Path;
use std::sync::Arc;

/// Default pose landmark model input size
const DEFAULT_POSE_INPUT_SIZE: i32 = 256;

/// Values per landmark in the model output: x, y, z, visibility
const VALUES_PER_LANDMARK: usize = 4;

/// Body presence score below which a frame counts as "no body"
const PRESENCE_THRESHOLD: f32 = 0.1;

/// Body landmark detector using `ONNX` Runtime
pub struct PoseDetector {
    session: Session,
    input_size: i32,
}

impl PoseDetector {
    /// Create a new pose detector from an `ONNX` model file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The ONNX model file cannot be loaded
    /// - The ONNX runtime environment cannot be created
    pub fn new<P: AsRef<Path>>(model_path: P) -> Result<Self> {
        log::info!(
            "Initializing PoseDetector with model: {}",
            model_path.as_ref().display()
        );
        let environment = Arc::new(
            Environment::builder()
                .with_name("pose_detector")
                .with_log_level(ort::LoggingLevel::Warning)
                .build()?,
        );

        let session = ort::SessionBuilder::new(&environment)?
            .with_optimization_level(ort::GraphOptimizationLevel::Level3)?
            .with_model_from_file(model_path)?;

        Ok(Self {
            session,
            input_size: DEFAULT_POSE_INPUT_SIZE,
        })
    }

    /// Preprocess a frame into the model's NCHW input tensor
    #[allow(clippy::cast_sign_loss)] // OpenCV dimensions are positive
    fn preprocess(&self, frame: &Mat) -> Result<Array4<f32>> {
        let size = self.input_size as usize;
        let channels = 3;

        // Resize to model input
        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            Size::new(self.input_size, self.input_size),
            0.0,
            0.0,
            InterpolationFlags::INTER_LINEAR as i32,
        )?;

        // Convert BGR to RGB
        let mut rgb_image = Mat::default();
        imgproc::cvt_color(&resized, &mut rgb_image, imgproc::COLOR_BGR2RGB, 0)?;

        // Convert to f32 and normalize to [0, 1]
        let mut float_image = Mat::default();
        rgb_image.convert_to(&mut float_image, CV_32F, 1.0 / 255.0, 0.0)?;

        let mut data = vec![0.0f32; size * size * channels];
        for row in 0..size {
            for col in 0..size {
                let pixel = float_image.at_2d::<opencv::core::Vec3f>(usize_to_i32(row)?, usize_to_i32(col)?)?;
                for ch in 0..channels {
                    data[ch * size * size + row * size + col] = pixel[ch];
                }
            }
        }

        Array4::from_shape_vec((1, channels, size, size), data)
            .map_err(|e| crate::Error::ModelDataFormatError(format!("Failed to create input array: {e}")))
    }

    /// Run forward pass through the model
    fn forward(&self, inputs: Array4<f32>) -> Result<Array1<f32>> {
        let cow_array = CowArray::from(inputs.into_dyn());
        let input_tensor = Value::from_array(self.session.allocator(), &cow_array)?;

        let outputs = self.session.run(vec![input_tensor])?;

        let landmark_output = outputs
            .into_iter()
            .next()
            .ok_or_else(|| crate::Error::ModelOutputError("No output from model".to_string()))?;

        let tensor = landmark_output.try_extract::<f32>()?;
        let view = tensor.view();
        let data = view
            .as_slice()
            .ok_or_else(|| crate::Error::ModelOutputError("Failed to get output data".to_string()))?;

        Ok(Array1::from(data.to_vec()))
    }

    /// Convert the raw output tensor into a landmark frame.
    ///
    /// Model coordinates are in input-image pixels; they are normalized here
    /// so downstream code never sees the model's input size.
    #[allow(clippy::cast_precision_loss)] // Precision loss acceptable for coordinates
    fn postprocess(&self, raw: &Array1<f32>) -> Result<Option<LandmarkFrame>> {
        if raw.len() < NUM_POSE_LANDMARKS * VALUES_PER_LANDMARK {
            return Err(crate::Error::ModelOutputError(format!(
                "Expected at least {} values, got {}",
                NUM_POSE_LANDMARKS * VALUES_PER_LANDMARK,
                raw.len()
            )));
        }

        let scale = self.input_size as f32;
        let mut points = Vec::with_capacity(NUM_POSE_LANDMARKS);
        let mut max_visibility = 0.0f32;

        for i in 0..NUM_POSE_LANDMARKS {
            let base = i * VALUES_PER_LANDMARK;
            let visibility = raw[base + 3].clamp(0.0, 1.0);
            max_visibility = max_visibility.max(visibility);
            points.push(Landmark {
                x: raw[base] / scale,
                y: raw[base + 1] / scale,
                visibility,
            });
        }

        // No point anywhere near visible means no body in frame
        if max_visibility < PRESENCE_THRESHOLD {
            return Ok(None);
        }

        LandmarkFrame::from_points(points).map(Some)
    }
}

impl LandmarkSource for PoseDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Option<LandmarkFrame>> {
        let input = self.preprocess(frame)?;
        let raw = self.forward(input)?;
        self.postprocess(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_tensor_layout() {
        assert_eq!(NUM_POSE_LANDMARKS * VALUES_PER_LANDMARK, 132);
    }

    #[test]
    fn test_default_input_size() {
        assert_eq!(DEFAULT_POSE_INPUT_SIZE, 256);
    }

    #[test]
    fn test_required_parts_within_model_range() {
        use crate::landmarks::BodyPart;
        for part in BodyPart::REQUIRED {
            assert!(part.index() < NUM_POSE_LANDMARKS);
        }
    }
}
