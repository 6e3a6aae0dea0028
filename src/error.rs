//! Error types for the posture coach library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// `OpenCV` operation failed
    #[error("OpenCV error: {0}")]
    OpenCV(#[from] opencv::Error),

    /// `ONNX` Runtime inference failed
    #[error("ONNX Runtime error: {0}")]
    OnnxRuntime(#[from] ort::OrtError),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Capture device could not be opened (fatal for the worker)
    #[error("Camera open error: {0}")]
    CameraOpen(String),

    /// Frame could not be read from the capture device (transient)
    #[error("Camera read error: {0}")]
    CameraRead(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Model output processing error
    #[error("Model output error: {0}")]
    ModelOutputError(String),

    /// Model data shape or format error
    #[error("Model data format error: {0}")]
    ModelDataFormatError(String),

    /// A required body landmark is missing or unusable for this frame
    #[error("Landmark error: {0}")]
    LandmarkError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
