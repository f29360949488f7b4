use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by a face detection backend.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("detection service request failed: {0}")]
    Service(String),

    #[error("detection service returned malformed data: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("file {} not found", .0.display())]
    InputNotFound(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error(transparent)]
    Detection(#[from] DetectionError),

    #[error("failed to write CSV report: {0}")]
    Report(#[from] csv::Error),

    #[error("failed to encode annotated image: {0}")]
    Encode(#[source] image::ImageError),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io { path: path.into(), source }
    }
}
