use async_trait::async_trait;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use facemood::annotate::Annotator;
use facemood::config::{AnnotationConfig, OutputConfig};
use facemood::detector::FaceDetector;
use facemood::{
    AnalysisError, Analyzer, BoundingBox, DetectionError, Emotion, EmotionScore, FaceRecord, Smile,
};

const GREY: Rgb<u8> = Rgb([120, 120, 120]);

/// Returns canned faces and counts how often it was asked.
struct FakeDetector {
    faces: Result<Vec<FaceRecord>, String>,
    calls: Arc<AtomicUsize>,
}

impl FakeDetector {
    fn new(faces: Vec<FaceRecord>) -> Self {
        Self { faces: Ok(faces), calls: Arc::new(AtomicUsize::new(0)) }
    }

    fn failing(message: &str) -> Self {
        Self { faces: Err(message.to_string()), calls: Arc::new(AtomicUsize::new(0)) }
    }
}

#[async_trait]
impl FaceDetector for FakeDetector {
    fn name(&self) -> String {
        "fake".to_string()
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceRecord>, DetectionError> {
        assert!(!image.is_empty());
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.faces.clone().map_err(DetectionError::Service)
    }
}

fn face(left: f32, top: f32, is_smiling: bool, confidence: f32) -> FaceRecord {
    FaceRecord {
        bounding_box: BoundingBox::new(left, top, 0.25, 0.25),
        smile: Smile { is_smiling, confidence },
        emotions: vec![
            EmotionScore { emotion: Emotion::Happy, confidence: if is_smiling { 95.0 } else { 2.0 } },
            EmotionScore { emotion: Emotion::Calm, confidence: 3.0 },
        ],
    }
}

fn analyzer(detector: FakeDetector) -> Analyzer {
    Analyzer::new(
        Box::new(detector),
        Annotator::with_bitmap_font(&AnnotationConfig::default()),
        OutputConfig::default(),
    )
    .show_progress(false)
}

fn write_photo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(160, 120, GREY).save(&path).unwrap();
    path
}

struct Outputs {
    csv: PathBuf,
    image: PathBuf,
}

fn outputs(dir: &Path) -> Outputs {
    Outputs { csv: dir.join("party_result.csv"), image: dir.join("party_result.png") }
}

#[tokio::test]
async fn smiling_and_neutral_face() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let out = outputs(dir.path());

    let summary = analyzer(FakeDetector::new(vec![face(0.1, 0.1, true, 90.0), face(0.6, 0.5, false, 10.0)]))
        .run(&input, Some(&out.csv), Some(&out.image))
        .await
        .unwrap();

    assert_eq!(summary.faces(), 2);
    let agg = summary.aggregate().unwrap();
    assert_eq!(agg.total, 90.0);
    assert_eq!(agg.score, Some(90.0));

    let csv = std::fs::read_to_string(&out.csv).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("NO,IS_SMILE,SMILE_CONFIDENTIAL,HAPPY,"));
    assert!(lines[0].ends_with(",SCORE,TOTAL"));
    assert!(lines[1].starts_with("1,true,90,95,"));
    assert!(lines[2].starts_with("2,false,10,2,"));
    assert!(lines[3].ends_with(",90,90"));

    let annotated = image::open(&out.image).unwrap().to_rgb8();
    assert_eq!(annotated.dimensions(), (160, 120));
    // Far corner lies outside both boxes and labels
    assert_eq!(annotated.get_pixel(155, 5), &GREY);
    // Bottom-right corners of the boxes
    assert_eq!(annotated.get_pixel(55, 41), &Rgb([0, 255, 0]));
    assert_eq!(annotated.get_pixel(135, 89), &Rgb([255, 0, 0]));
}

#[tokio::test]
async fn no_faces_gives_empty_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let out = outputs(dir.path());

    let summary = analyzer(FakeDetector::new(Vec::new()))
        .run(&input, Some(&out.csv), Some(&out.image))
        .await
        .unwrap();

    assert_eq!(summary.faces(), 0);
    assert!(summary.aggregate().is_none());

    let csv = std::fs::read_to_string(&out.csv).unwrap();
    assert_eq!(csv.lines().count(), 1);

    let annotated = image::open(&out.image).unwrap().to_rgb8();
    assert!(annotated.pixels().all(|p| *p == GREY));
}

#[tokio::test]
async fn missing_input_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("party.png");
    let out = outputs(dir.path());
    let detector = FakeDetector::new(vec![face(0.1, 0.1, true, 90.0)]);
    let calls = detector.calls.clone();

    let err = analyzer(detector)
        .run(&input, Some(&out.csv), Some(&out.image))
        .await
        .unwrap_err();

    assert!(matches!(&err, AnalysisError::InputNotFound(p) if p == &input));
    assert!(err.to_string().contains("not found"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!out.csv.exists());
    assert!(!out.image.exists());
}

#[tokio::test]
async fn service_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let out = outputs(dir.path());

    let err = analyzer(FakeDetector::failing("throttled"))
        .run(&input, Some(&out.csv), Some(&out.image))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Detection(DetectionError::Service(_))));
    assert!(!out.csv.exists());
    assert!(!out.image.exists());
}

#[tokio::test]
async fn undecodable_input_is_rejected_before_detection() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("party.png");
    std::fs::write(&input, b"definitely not an image").unwrap();
    let out = outputs(dir.path());
    let detector = FakeDetector::new(Vec::new());
    let calls = detector.calls.clone();

    let err = analyzer(detector)
        .run(&input, Some(&out.csv), Some(&out.image))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Decode(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!out.csv.exists());
}

#[tokio::test]
async fn unwritable_image_removes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let csv = dir.path().join("report.csv");
    let image = dir.path().join("missing_dir").join("out.png");

    let err = analyzer(FakeDetector::new(vec![face(0.1, 0.1, true, 80.0)]))
        .run(&input, Some(&csv), Some(&image))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Io { .. }));
    assert!(!csv.exists());
}

#[tokio::test]
async fn failed_run_keeps_previous_report_intact() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let csv = dir.path().join("report.csv");
    std::fs::write(&csv, "from an earlier run\n").unwrap();
    let image = dir.path().join("missing_dir").join("out.png");

    let err = analyzer(FakeDetector::new(vec![face(0.1, 0.1, true, 80.0)]))
        .run(&input, Some(&csv), Some(&image))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Io { .. }));
    assert_eq!(std::fs::read_to_string(&csv).unwrap(), "from an earlier run\n");

    // No staged temp files are left next to the outputs
    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["party.png", "report.csv"]);
}

#[tokio::test]
async fn image_rename_failure_removes_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_photo(dir.path(), "party.png");
    let csv = dir.path().join("report.csv");
    // A directory sitting on the image path makes the final rename fail
    let image = dir.path().join("out.png");
    std::fs::create_dir(&image).unwrap();

    let err = analyzer(FakeDetector::new(vec![face(0.1, 0.1, true, 80.0)]))
        .run(&input, Some(&csv), Some(&image))
        .await
        .unwrap_err();

    assert!(matches!(err, AnalysisError::Io { .. }));
    assert!(!csv.exists());
    assert!(image.is_dir());
}
