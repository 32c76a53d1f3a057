//! Direct RGBA overlay primitives for gaze markers and text backings.
//!
//! Frames are opaque canvas clones, so blending is straight-alpha source over
//! opaque destination.

use image::{Rgba, RgbaImage};

pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
pub const RED: Rgba<u8> = Rgba([220, 30, 30, 255]);
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Blends `src` (straight alpha) over the pixel at (x, y). Out-of-bounds
/// coordinates are ignored.
pub fn blend_px(img: &mut RgbaImage, x: i64, y: i64, src: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(img.width()) || y >= i64::from(img.height()) {
        return;
    }
    let dst = img.get_pixel_mut(x as u32, y as u32);

    let a = u16::from(src.0[3]);
    if a == 0 {
        return;
    }
    if a == 255 {
        *dst = src;
        return;
    }

    let inv = 255u16 - a;
    for i in 0..3 {
        dst.0[i] = (mul_div255(u16::from(src.0[i]), a) + mul_div255(u16::from(dst.0[i]), inv))
            .min(255) as u8;
    }
    dst.0[3] = 255;
}

/// Filled disc centered at (cx, cy).
pub fn draw_disc(img: &mut RgbaImage, cx: i64, cy: i64, radius: i64, color: Rgba<u8>) {
    let r2 = radius * radius;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= r2 {
                blend_px(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Ring (annulus) centered at (cx, cy), `thickness` pixels deep inward from
/// `radius`.
pub fn draw_ring(img: &mut RgbaImage, cx: i64, cy: i64, radius: i64, thickness: i64, color: Rgba<u8>) {
    let outer2 = radius * radius;
    let inner = (radius - thickness).max(0);
    let inner2 = inner * inner;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d2 = dx * dx + dy * dy;
            if d2 <= outer2 && d2 > inner2 {
                blend_px(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line from (x0, y0) to (x1, y1), stamped with a disc of
/// `half_width` radius for thickness.
pub fn draw_line(
    img: &mut RgbaImage,
    (x0, y0): (i64, i64),
    (x1, y1): (i64, i64),
    half_width: i64,
    color: Rgba<u8>,
) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        if half_width <= 0 {
            blend_px(img, x, y, color);
        } else {
            draw_disc(img, x, y, half_width, color);
        }
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Axis-aligned filled rectangle, blended (use translucent colors for text
/// backings).
pub fn fill_rect(img: &mut RgbaImage, x: i64, y: i64, w: i64, h: i64, color: Rgba<u8>) {
    for py in y..y + h {
        for px in x..x + w {
            blend_px(img, px, py, color);
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u16 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u16
}
