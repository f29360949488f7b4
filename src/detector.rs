use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types as sdk;
use aws_sdk_rekognition::Client;

use crate::error::DetectionError;
use crate::types::{BoundingBox, Emotion, EmotionScore, FaceRecord, Smile};

/// Remote face/emotion detection backend.
///
/// Implementations return one record per detected face, in the order the
/// service reported them.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    fn name(&self) -> String;

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceRecord>, DetectionError>;
}

/// AWS Rekognition `DetectFaces` with all facial attributes enabled.
pub struct RekognitionDetector {
    client: Client,
}

impl RekognitionDetector {
    /// Builds a client from the default AWS credential chain for `region`.
    pub async fn from_region(region: &str) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl FaceDetector for RekognitionDetector {
    fn name(&self) -> String {
        "AWS Rekognition".to_string()
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<Vec<FaceRecord>, DetectionError> {
        let output = self
            .client
            .detect_faces()
            .image(sdk::Image::builder().bytes(Blob::new(image.to_vec())).build())
            .attributes(sdk::Attribute::All)
            .send()
            .await
            .map_err(|e| DetectionError::Service(DisplayErrorContext(&e).to_string()))?;

        output.face_details().iter().map(face_from_detail).collect()
    }
}

fn face_from_detail(detail: &sdk::FaceDetail) -> Result<FaceRecord, DetectionError> {
    let bb = detail
        .bounding_box()
        .ok_or_else(|| DetectionError::Malformed("face without bounding box".to_string()))?;

    let bounding_box = BoundingBox::new(
        bb.left().unwrap_or(0.0),
        bb.top().unwrap_or(0.0),
        bb.width().unwrap_or(0.0),
        bb.height().unwrap_or(0.0),
    );

    let smile = match detail.smile() {
        Some(s) => Smile {
            is_smiling: s.value(),
            confidence: s.confidence().unwrap_or(0.0),
        },
        None => {
            log::warn!("Face without smile attribute, treating as not smiling");
            Smile::default()
        }
    };

    let emotions = detail
        .emotions()
        .iter()
        .filter_map(|e| {
            let name = e.r#type()?.as_str();
            match name.parse::<Emotion>() {
                Ok(emotion) => Some(EmotionScore {
                    emotion,
                    confidence: e.confidence().unwrap_or(0.0),
                }),
                Err(err) => {
                    log::debug!("Skipping {}", err);
                    None
                }
            }
        })
        .collect();

    Ok(FaceRecord { bounding_box, smile, emotions })
}
