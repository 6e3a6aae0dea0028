//! Webcam frame acquisition.
//!
//! The worker depends on the [`FrameSource`] trait only; [`Camera`] is the
//! OpenCV-backed production implementation. Failure to open the device is
//! fatal to the worker, while per-frame read failures are transient and
//! retried on the next tick.

use crate::config::CameraConfig;
use crate::{Error, Result};
use log::info;
use opencv::{
    core::Mat,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};

/// Contract for anything that can produce capture frames
pub trait FrameSource {
    /// Read one frame
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraRead`] when a frame is temporarily
    /// unavailable; the caller retries on the next tick.
    fn read(&mut self) -> Result<Mat>;

    /// Capture dimensions as `(width, height)` in pixels
    fn frame_size(&self) -> (i32, i32);
}

/// OpenCV-backed webcam source
pub struct Camera {
    capture: VideoCapture,
    frame_width: i32,
    frame_height: i32,
}

impl Camera {
    /// Open the capture device described by `config`
    ///
    /// # Errors
    ///
    /// Returns [`Error::CameraOpen`] if the device cannot be opened; this is
    /// the only camera failure treated as fatal.
    pub fn open(config: &CameraConfig) -> Result<Self> {
        info!("Opening camera {}", config.index);
        let mut capture =
            VideoCapture::new(config.index, videoio::CAP_ANY).map_err(|e| Error::CameraOpen(e.to_string()))?;

        if !capture.is_opened()? {
            return Err(Error::CameraOpen(format!("Device {} is not available", config.index)));
        }

        // Best-effort hints; drivers may ignore them
        let _ = capture.set(CAP_PROP_FRAME_WIDTH, f64::from(config.frame_width));
        let _ = capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(config.frame_height));
        let _ = capture.set(CAP_PROP_BUFFERSIZE, 1.0);

        // The distance estimate scales normalized landmarks by these, so
        // they must reflect what the driver actually delivers
        let frame_width = delivered_dim(capture.get(CAP_PROP_FRAME_WIDTH)?, config.frame_width);
        let frame_height = delivered_dim(capture.get(CAP_PROP_FRAME_HEIGHT)?, config.frame_height);
        info!("Camera delivers {frame_width}x{frame_height}");

        Ok(Self {
            capture,
            frame_width,
            frame_height,
        })
    }
}

/// Dimension reported by the driver, falling back to the requested value
/// when the driver reports nothing usable
#[allow(clippy::cast_possible_truncation)]
fn delivered_dim(reported: f64, requested: i32) -> i32 {
    if reported >= 1.0 && reported <= f64::from(i32::MAX) {
        reported as i32
    } else {
        requested
    }
}

impl FrameSource for Camera {
    fn read(&mut self) -> Result<Mat> {
        let mut frame = Mat::default();
        let ok = self
            .capture
            .read(&mut frame)
            .map_err(|e| Error::CameraRead(e.to_string()))?;

        if !ok || frame.empty() {
            return Err(Error::CameraRead("Empty frame".to_string()));
        }

        Ok(frame)
    }

    fn frame_size(&self) -> (i32, i32) {
        (self.frame_width, self.frame_height)
    }
}

// VideoCapture releases the device when dropped, so every worker exit path
// (including panics unwinding through the thread) closes the camera.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivered_dim_prefers_driver_report() {
        // Driver ignored the 640 hint and delivers 1280
        assert_eq!(delivered_dim(1280.0, 640), 1280);
        assert_eq!(delivered_dim(720.0, 480), 720);
    }

    #[test]
    fn test_delivered_dim_falls_back_on_unusable_report() {
        assert_eq!(delivered_dim(0.0, 640), 640);
        assert_eq!(delivered_dim(-1.0, 480), 480);
    }
}
