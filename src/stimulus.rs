use std::path::{Path, PathBuf};

use image::{imageops, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::config::RenderConfig;

/// Fallback resolution when no stimulus asset can be located.
const PLACEHOLDER_SIZE: (u32, u32) = (1920, 1080);
const PLACEHOLDER_GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);
const CANVAS_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Ordered path rewrites tolerating the differing relative-path conventions
/// between the experiment log and the on-disk asset layout.
pub fn candidate_paths(stimulus_ref: &str) -> Vec<PathBuf> {
    vec![
        PathBuf::from(stimulus_ref),
        PathBuf::from(stimulus_ref.replacen("./assets/", "assets/", 1)),
        PathBuf::from(stimulus_ref.replacen("./assets/", "experiment-design/assets/", 1)),
        PathBuf::from(format!(
            "experiment-design/{}",
            stimulus_ref.trim_start_matches("./")
        )),
    ]
}

/// First candidate path that exists on disk, or None when the stimulus is
/// unresolvable. Kept separate from loading so the fallback policy stays
/// visible and testable.
pub fn resolve_stimulus(stimulus_ref: &str) -> Option<PathBuf> {
    candidate_paths(stimulus_ref)
        .into_iter()
        .find(|p| p.is_file())
}

/// Loads the stimulus and composites it onto a canvas-sized background:
/// scaled to exactly fill canvas height (aspect preserved, Lanczos3),
/// horizontally centered over black. A missing or undecodable asset is
/// replaced by a mid-gray placeholder; this function never fails.
pub fn compose_canvas(stimulus_ref: &str, cfg: &RenderConfig) -> RgbaImage {
    let stimulus = load_stimulus(stimulus_ref);

    let (src_w, src_h) = stimulus.dimensions();
    let scale = f64::from(cfg.canvas_height) / f64::from(src_h);
    let new_width = (f64::from(src_w) * scale).round().max(1.0) as u32;

    let resized = imageops::resize(
        &stimulus,
        new_width,
        cfg.canvas_height,
        imageops::FilterType::Lanczos3,
    );

    let mut canvas = RgbaImage::from_pixel(cfg.canvas_width, cfg.canvas_height, CANVAS_BLACK);

    // Centered offset may go negative for extra-wide stimuli; overlay clips
    // instead of erroring, cropping the image at the canvas bounds.
    imageops::overlay(&mut canvas, &resized, centered_offset(cfg.canvas_width, new_width), 0);

    canvas
}

/// Horizontal paste offset centering `image_width` on `canvas_width`.
/// Floor division, so an odd overflow crops one extra pixel on the left.
fn centered_offset(canvas_width: u32, image_width: u32) -> i64 {
    (i64::from(canvas_width) - i64::from(image_width)).div_euclid(2)
}

fn load_stimulus(stimulus_ref: &str) -> RgbaImage {
    if let Some(path) = resolve_stimulus(stimulus_ref) {
        match load_image(&path) {
            Ok(img) => {
                debug!(path = %path.display(), "resolved stimulus");
                return img;
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "stimulus exists but failed to decode");
            }
        }
    } else {
        warn!(stimulus = stimulus_ref, "stimulus not found, using placeholder");
    }

    RgbaImage::from_pixel(PLACEHOLDER_SIZE.0, PLACEHOLDER_SIZE.1, PLACEHOLDER_GRAY)
}

fn load_image(path: &Path) -> image::ImageResult<RgbaImage> {
    Ok(image::open(path)?.to_rgba8())
}
