use image::codecs::jpeg::JpegEncoder;
use image::{ImageFormat, RgbImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::config::OutputConfig;
use crate::error::AnalysisError;

/// Where the CSV report and the annotated image are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub image: PathBuf,
}

/// Explicit paths win. Otherwise both artifacts are named after the input,
/// `<stem>_<csv_suffix>` and `<stem>_<image_suffix>.<ext>`, in the working
/// directory.
pub fn resolve_paths(
    input: &Path,
    csv: Option<&Path>,
    image: Option<&Path>,
    config: &OutputConfig,
) -> OutputPaths {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let ext = input
        .extension()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".to_string());

    let csv = csv
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}_{}", stem, config.csv_suffix)));
    let image = image
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(format!("{}_{}.{}", stem, config.image_suffix, ext)));

    OutputPaths { csv, image }
}

/// Encodes in the format implied by `path`, or `fallback` when the extension
/// says nothing.
pub fn encode_image(
    img: &RgbImage,
    path: &Path,
    fallback: ImageFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>, AnalysisError> {
    let format = ImageFormat::from_path(path).unwrap_or(fallback);
    let mut buf = Vec::new();

    if format == ImageFormat::Jpeg {
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
        encoder.encode_image(img).map_err(AnalysisError::Encode)?;
    } else {
        img.write_to(&mut Cursor::new(&mut buf), format)
            .map_err(AnalysisError::Encode)?;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_default_paths() {
        let paths = resolve_paths(Path::new("photos/party.jpg"), None, None, &OutputConfig::default());
        assert_eq!(paths.csv, PathBuf::from("party_result.csv"));
        assert_eq!(paths.image, PathBuf::from("party_result.jpg"));
    }

    #[test]
    fn test_default_image_keeps_input_format() {
        let paths = resolve_paths(Path::new("group.shot.png"), None, None, &OutputConfig::default());
        assert_eq!(paths.csv, PathBuf::from("group.shot_result.csv"));
        assert_eq!(paths.image, PathBuf::from("group.shot_result.png"));
    }

    #[test]
    fn test_explicit_paths_win() {
        let paths = resolve_paths(
            Path::new("party.jpg"),
            Some(Path::new("out/report.csv")),
            Some(Path::new("out/boxes.png")),
            &OutputConfig::default(),
        );
        assert_eq!(paths.csv, PathBuf::from("out/report.csv"));
        assert_eq!(paths.image, PathBuf::from("out/boxes.png"));
    }

    #[test]
    fn test_custom_suffixes() {
        let config = OutputConfig {
            csv_suffix: "emotions.csv".to_string(),
            image_suffix: "faces".to_string(),
            ..OutputConfig::default()
        };
        let paths = resolve_paths(Path::new("a.jpeg"), None, None, &config);
        assert_eq!(paths.csv, PathBuf::from("a_emotions.csv"));
        assert_eq!(paths.image, PathBuf::from("a_faces.jpeg"));
    }

    #[test]
    fn test_encode_roundtrip_dimensions() {
        let img = RgbImage::from_pixel(37, 21, Rgb([10, 200, 30]));
        for name in ["x.png", "x.jpg"] {
            let data = encode_image(&img, Path::new(name), ImageFormat::Png, 100).unwrap();
            let decoded = image::load_from_memory(&data).unwrap();
            assert_eq!((decoded.width(), decoded.height()), (37, 21));
        }
    }

    #[test]
    fn test_unknown_extension_uses_fallback() {
        let img = RgbImage::new(4, 4);
        let data = encode_image(&img, Path::new("result.out"), ImageFormat::Png, 100).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Png);
    }
}
