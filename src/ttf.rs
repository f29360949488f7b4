use image::{Rgb, RgbImage};
use rusttype::{point, Font, Scale};
use std::fs;
use std::path::Path;

pub struct FontRenderer {
    font: Font<'static>,
}

impl FontRenderer {
    /// Looks for `<family>.ttf` in the common macOS/Linux/Windows font
    /// directories and the working directory.
    pub fn try_load(family: &str) -> Option<Self> {
        let paths = [
            format!("/Library/Fonts/{}.ttf", family),
            format!("/System/Library/Fonts/{}.ttf", family),
            format!("/System/Library/Fonts/Supplemental/{}.ttf", family),
            format!("/usr/share/fonts/truetype/{}.ttf", family),
            format!("/usr/share/fonts/truetype/msttcorefonts/{}.ttf", family),
            format!("C:\\Windows\\Fonts\\{}.ttf", family),
            format!("{}.ttf", family),
        ];

        for p in paths.iter() {
            if !Path::new(p).exists() {
                continue;
            }
            if let Ok(data) = fs::read(p) {
                if let Some(font) = Font::try_from_vec(data) {
                    log::debug!("Loaded font from {}", p);
                    return Some(Self { font });
                }
            }
        }

        log::warn!("Could not find font family '{}', falling back to bitmap font", family);
        None
    }

    /// Draws `text` with its top-left corner at (`x`, `y`).
    pub fn draw_text(&self, img: &mut RgbImage, x: u32, y: u32, text: &str, color: Rgb<u8>, size_pt: f32) {
        let (width, height) = img.dimensions();
        let scale = Scale::uniform(size_pt);
        let v_metrics = self.font.v_metrics(scale);

        let start = point(x as f32, y as f32 + v_metrics.ascent);

        for glyph in self.font.layout(text, scale, start) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                if v < 0.2 {
                    return;
                }
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    img.put_pixel(px as u32, py as u32, color);
                }
            });
        }
    }
}
