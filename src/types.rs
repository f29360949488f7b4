use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Emotion categories recorded in the report, in column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Confused,
    Disgusted,
    Surprised,
    Calm,
    Unknown,
    Fear,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Confused,
        Emotion::Disgusted,
        Emotion::Surprised,
        Emotion::Calm,
        Emotion::Unknown,
        Emotion::Fear,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "HAPPY",
            Emotion::Sad => "SAD",
            Emotion::Angry => "ANGRY",
            Emotion::Confused => "CONFUSED",
            Emotion::Disgusted => "DISGUSTED",
            Emotion::Surprised => "SURPRISED",
            Emotion::Calm => "CALM",
            Emotion::Unknown => "UNKNOWN",
            Emotion::Fear => "FEAR",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedEmotion(pub String);

impl fmt::Display for UnrecognizedEmotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized emotion type '{}'", self.0)
    }
}

impl std::error::Error for UnrecognizedEmotion {}

impl FromStr for Emotion {
    type Err = UnrecognizedEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnrecognizedEmotion(s.to_string()))
    }
}

/// Face location as fractions of the image size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Absolute pixel rectangle, always inside the image it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self { left, top, width, height }
    }

    /// Scales to pixels (`px = fraction * dimension`) and clips to the image.
    /// Returns `None` when nothing of the box is visible or a field is not finite.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> Option<PixelRect> {
        let fields = [self.left, self.top, self.width, self.height];
        if !fields.iter().all(|f| f.is_finite()) {
            return None;
        }

        let w = image_width as f32;
        let h = image_height as f32;

        let x0 = (self.left * w).max(0.0);
        let y0 = (self.top * h).max(0.0);
        let x1 = ((self.left + self.width) * w).min(w);
        let y1 = ((self.top + self.height) * h).min(h);

        if !(x1 > x0 && y1 > y0) {
            return None;
        }

        let x = x0 as u32;
        let y = y0 as u32;
        let width = ((x1 - x as f32).round() as u32).clamp(1, image_width - x);
        let height = ((y1 - y as f32).round() as u32).clamp(1, image_height - y);

        Some(PixelRect { x, y, width, height })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Smile {
    pub is_smiling: bool,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmotionScore {
    pub emotion: Emotion,
    pub confidence: f32,
}

/// One detected face as reported by the detection service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceRecord {
    pub bounding_box: BoundingBox,
    pub smile: Smile,
    pub emotions: Vec<EmotionScore>,
}

/// Per-face line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub no: usize,
    pub is_smile: bool,
    pub smile_confidence: f32,
    pub emotions: BTreeMap<Emotion, f32>,
}

/// Smile summary over all faces of one image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRow {
    /// Mean smile confidence over smiling faces; `None` if nobody smiles.
    pub score: Option<f32>,
    /// Sum of smile confidence over smiling faces.
    pub total: f32,
    pub smiling: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScoreReport {
    pub rows: Vec<ReportRow>,
    /// `None` only when no faces were detected.
    pub aggregate: Option<AggregateRow>,
}
