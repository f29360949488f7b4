use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

use crate::annotate::Annotator;
use crate::config::OutputConfig;
use crate::detector::FaceDetector;
use crate::error::AnalysisError;
use crate::output::{encode_image, resolve_paths, OutputPaths};
use crate::report::render_csv;
use crate::scorer::score;
use crate::types::{AggregateRow, ScoreReport};

/// Outcome of one analyzed photo.
#[derive(Debug, Clone)]
pub struct AnalysisSummary {
    pub report: ScoreReport,
    pub paths: OutputPaths,
}

impl AnalysisSummary {
    pub fn faces(&self) -> usize {
        self.report.rows.len()
    }

    pub fn aggregate(&self) -> Option<&AggregateRow> {
        self.report.aggregate.as_ref()
    }
}

/// Read → detect → score → annotate → report → save.
///
/// Both artifacts are built in memory, staged as temp files and only renamed
/// into place once everything upstream succeeded, so a failed run leaves no
/// partial output files.
pub struct Analyzer {
    detector: Box<dyn FaceDetector>,
    annotator: Annotator,
    output: OutputConfig,
    show_progress: bool,
}

impl Analyzer {
    pub fn new(detector: Box<dyn FaceDetector>, annotator: Annotator, output: OutputConfig) -> Self {
        Self {
            detector,
            annotator,
            output,
            show_progress: true,
        }
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub async fn run(
        &self,
        input: &Path,
        csv: Option<&Path>,
        image: Option<&Path>,
    ) -> Result<AnalysisSummary, AnalysisError> {
        let bytes = fs::read(input).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AnalysisError::InputNotFound(input.to_path_buf()),
            _ => AnalysisError::io(input, e),
        })?;

        let format = image::guess_format(&bytes).map_err(AnalysisError::Decode)?;
        let source = image::load_from_memory_with_format(&bytes, format)
            .map_err(AnalysisError::Decode)?
            .to_rgb8();
        log::debug!(
            "Decoded {} ({}x{}, {:?})",
            input.display(),
            source.width(),
            source.height(),
            format
        );

        let faces = {
            let spinner = self.spinner();
            let result = self.detector.detect_faces(&bytes).await;
            spinner.finish_and_clear();
            result?
        };
        log::info!("{} reported {} face(s)", self.detector.name(), faces.len());

        let report = score(&faces);
        let annotated = self.annotator.annotate(&source, &faces);

        let paths = resolve_paths(input, csv, image, &self.output);
        let csv_data = render_csv(&report)?;
        let image_data = encode_image(&annotated, &paths.image, format, self.output.jpeg_quality)?;

        // Stage both next to their targets; dropped temp files delete themselves
        let staged_csv = stage(&paths.csv, &csv_data)?;
        let staged_image = stage(&paths.image, &image_data)?;

        commit(staged_csv, &paths.csv)?;
        if let Err(e) = commit(staged_image, &paths.image) {
            if let Err(cleanup) = fs::remove_file(&paths.csv) {
                log::warn!("Could not remove {}: {}", paths.csv.display(), cleanup);
            }
            return Err(e);
        }
        log::info!("Wrote {} and {}", paths.csv.display(), paths.image.display());

        Ok(AnalysisSummary { report, paths })
    }

    fn spinner(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Analyzing faces with {}...", self.detector.name()));
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }
}

/// Writes `data` to a temp file in the directory of `path`.
fn stage(path: &Path, data: &[u8]) -> Result<NamedTempFile, AnalysisError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir).map_err(|e| AnalysisError::io(path, e))?;
    file.write_all(data).map_err(|e| AnalysisError::io(path, e))?;
    file.as_file().sync_all().map_err(|e| AnalysisError::io(path, e))?;
    Ok(file)
}

/// Atomically moves a staged file onto `path`.
fn commit(file: NamedTempFile, path: &Path) -> Result<(), AnalysisError> {
    file.persist(path).map_err(|e| AnalysisError::io(path, e.error))?;
    Ok(())
}
