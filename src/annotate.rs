use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

use crate::config::{parse_hex, AnnotationConfig};
use crate::font;
use crate::ttf::FontRenderer;
use crate::types::{FaceRecord, PixelRect};

/// Draws face boxes and `No.<n>` labels, green for smiling faces and red
/// for the rest.
pub struct Annotator {
    font: Option<FontRenderer>,
    font_size_pt: f32,
    smile_color: Rgb<u8>,
    neutral_color: Rgb<u8>,
    line_thickness: u32,
}

fn rgb(hex: &str) -> Rgb<u8> {
    let (r, g, b) = parse_hex(hex);
    Rgb([r, g, b])
}

impl Annotator {
    pub fn new(config: &AnnotationConfig) -> Self {
        let mut annotator = Self::with_bitmap_font(config);
        annotator.font = FontRenderer::try_load(&config.font_family);
        annotator
    }

    /// Same as [`Annotator::new`] but never touches the system fonts.
    pub fn with_bitmap_font(config: &AnnotationConfig) -> Self {
        Self {
            font: None,
            font_size_pt: config.font_size_pt as f32,
            smile_color: rgb(&config.smile_color_hex),
            neutral_color: rgb(&config.neutral_color_hex),
            line_thickness: config.line_thickness.max(1),
        }
    }

    pub fn color_for(&self, face: &FaceRecord) -> Rgb<u8> {
        if face.smile.is_smiling {
            self.smile_color
        } else {
            self.neutral_color
        }
    }

    /// Returns an annotated copy of `source` with the same dimensions.
    pub fn annotate(&self, source: &RgbImage, faces: &[FaceRecord]) -> RgbImage {
        let mut img = source.clone();
        let (width, height) = img.dimensions();

        for (idx, face) in faces.iter().enumerate() {
            let no = idx + 1;
            let Some(rect) = face.bounding_box.to_pixels(width, height) else {
                log::warn!("Face No.{} lies outside the image, not drawn", no);
                continue;
            };
            let color = self.color_for(face);

            self.draw_box(&mut img, rect, color);
            self.draw_label(&mut img, rect, &format!("No.{}", no), color);
        }

        img
    }

    fn draw_box(&self, img: &mut RgbImage, rect: PixelRect, color: Rgb<u8>) {
        // Thickness grows inward so the outer edge matches the detected box
        for i in 0..self.line_thickness {
            if rect.width <= 2 * i || rect.height <= 2 * i {
                break;
            }
            let r = Rect::at((rect.x + i) as i32, (rect.y + i) as i32)
                .of_size(rect.width - 2 * i, rect.height - 2 * i);
            draw_hollow_rect_mut(img, r, color);
        }
    }

    fn draw_label(&self, img: &mut RgbImage, rect: PixelRect, text: &str, color: Rgb<u8>) {
        let x = rect.x + self.line_thickness;
        let y = rect.y + self.line_thickness;

        match &self.font {
            Some(fr) => fr.draw_text(img, x, y, text, color, self.font_size_pt),
            None => font::draw_text_line(img, x, y, text, color, font::scale_for(self.font_size_pt)),
        }
    }
}
