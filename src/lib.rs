//! Face emotion analysis for a single photo: detect faces through a remote
//! service, draw numbered boxes on the image and export per-face emotion
//! scores with a smile aggregate as CSV.

pub mod annotate;
pub mod args;
pub mod config;
pub mod detector;
pub mod error;
pub mod font;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod scorer;
pub mod ttf;
pub mod types;

pub use error::{AnalysisError, DetectionError};
pub use pipeline::{AnalysisSummary, Analyzer};
pub use types::{AggregateRow, BoundingBox, Emotion, EmotionScore, FaceRecord, ReportRow, ScoreReport, Smile};
