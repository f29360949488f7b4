use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub detection: DetectionConfig,
    pub annotation: AnnotationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    pub region: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub font_family: String, // e.g. "Arial", looked up as <family>.ttf
    pub font_size_pt: u32,
    pub smile_color_hex: String,
    pub neutral_color_hex: String,
    pub line_thickness: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Appended as `<stem>_<csv_suffix>` when no CSV path is given.
    pub csv_suffix: String,
    /// Appended as `<stem>_<image_suffix>.<input ext>` when no image path is given.
    pub image_suffix: String,
    pub jpeg_quality: u8,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            region: "ap-northeast-1".to_string(),
        }
    }
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_string(),
            font_size_pt: 24,
            smile_color_hex: "#00FF00".to_string(),
            neutral_color_hex: "#FF0000".to_string(),
            line_thickness: 2,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_suffix: "result.csv".to_string(),
            image_suffix: "result".to_string(),
            jpeg_quality: 100,
        }
    }
}

impl AppConfig {
    pub const DEFAULT_PATH: &'static str = "facemood.json";

    /// Loads `path` if given (it must exist), otherwise `facemood.json` from the
    /// working directory when present, otherwise defaults. Never writes.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(Self::DEFAULT_PATH).exists() => {
                Self::from_file(Path::new(Self::DEFAULT_PATH))
            }
            None => {
                log::debug!("No configuration file, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        // Missing fields fall back to Default thanks to #[serde(default)]
        let config = serde_json::from_str::<AppConfig>(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

/// Parses `#RRGGBB`. Anything else falls back to red.
pub fn parse_hex(hex: &str) -> (u8, u8, u8) {
    if hex.len() == 7 && hex.starts_with('#') && hex.is_ascii() {
        let r = u8::from_str_radix(&hex[1..3], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[3..5], 16).unwrap_or(0);
        let b = u8::from_str_radix(&hex[5..7], 16).unwrap_or(0);
        (r, g, b)
    } else {
        (255, 0, 0)
    }
}
