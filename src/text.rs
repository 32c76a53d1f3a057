use ab_glyph::{point, Font, FontVec, Glyph, PxScale, ScaleFont};
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::draw::blend_px;

/// Common sans-serif faces probed in order. The overlay text is decorative,
/// so the probe failing entirely only degrades the render, never fails it.
const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Rasterizes overlay text onto frames. Holds no font when none could be
/// located, in which case every draw is a no-op.
pub struct TextPainter {
    font: Option<FontVec>,
}

impl TextPainter {
    /// Loads the first usable face from the system font probe list.
    pub fn from_system_fonts() -> Self {
        for path in SYSTEM_FONT_PATHS {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match FontVec::try_from_vec(bytes) {
                Ok(font) => {
                    debug!(path, "loaded overlay font");
                    return Self { font: Some(font) };
                }
                Err(err) => warn!(path, %err, "font file exists but failed to parse"),
            }
        }

        warn!("no system font found, text overlays will be omitted");
        Self { font: None }
    }

    pub fn disabled() -> Self {
        Self { font: None }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Advance width of `text` at `px` pixels, 0.0 without a font.
    pub fn measure(&self, text: &str, px: f32) -> f32 {
        let Some(font) = &self.font else {
            return 0.0;
        };
        let sf = font.as_scaled(PxScale::from(px));

        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                width += sf.kern(prev, id);
            }
            width += sf.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Draws `text` with its top-left corner at (x, y), blending glyph
    /// coverage into the frame. Clipped at image bounds.
    pub fn draw(&self, img: &mut RgbaImage, x: f32, y: f32, px: f32, color: Rgba<u8>, text: &str) {
        let Some(font) = &self.font else {
            return;
        };
        let scale = PxScale::from(px);
        let sf = font.as_scaled(scale);

        let mut pen_x = x;
        let mut prev = None;
        for ch in text.chars() {
            let id = font.glyph_id(ch);
            if let Some(prev) = prev {
                pen_x += sf.kern(prev, id);
            }
            let glyph = Glyph {
                id,
                scale,
                position: point(pen_x, y + sf.ascent()),
            };
            pen_x += sf.h_advance(id);
            prev = Some(id);

            let Some(outline) = font.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outline.px_bounds();
            outline.draw(|gx, gy, cov| {
                if cov <= f32::EPSILON {
                    return;
                }
                let alpha = (cov * f32::from(color.0[3])).round().min(255.0) as u8;
                blend_px(
                    img,
                    (bounds.min.x + gx as f32) as i64,
                    (bounds.min.y + gy as f32) as i64,
                    Rgba([color.0[0], color.0[1], color.0[2], alpha]),
                );
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_painter_is_a_noop() {
        let painter = TextPainter::disabled();
        let mut img = RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 255]));
        let before = img.clone();

        painter.draw(&mut img, 2.0, 2.0, 12.0, Rgba([255, 255, 255, 255]), "hi");
        assert_eq!(img, before);
        assert_eq!(painter.measure("hi", 12.0), 0.0);
        assert!(!painter.has_font());
    }

    #[test]
    fn system_probe_never_panics() {
        // Whether or not this machine has any of the probed fonts, the
        // constructor must come back with a usable painter.
        let painter = TextPainter::from_system_fonts();
        let mut img = RgbaImage::from_pixel(64, 24, Rgba([0, 0, 0, 255]));
        painter.draw(&mut img, 2.0, 2.0, 14.0, Rgba([255, 255, 255, 255]), "Time: 0.00s");
    }

    #[test]
    fn drawing_with_a_font_marks_pixels() {
        let painter = TextPainter::from_system_fonts();
        if !painter.has_font() {
            return; // headless environment without fonts
        }

        let mut img = RgbaImage::from_pixel(64, 24, Rgba([0, 0, 0, 255]));
        painter.draw(&mut img, 2.0, 2.0, 16.0, Rgba([255, 255, 255, 255]), "X");

        let touched = img.pixels().any(|p| p.0[0] > 0);
        assert!(touched);
        assert!(painter.measure("X", 16.0) > 0.0);
    }
}
