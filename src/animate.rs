use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use image::{
    codecs::gif::{GifEncoder, Repeat},
    Delay, Frame, Rgba, RgbaImage,
};
use tracing::{info, warn};

use crate::{
    config::RenderConfig,
    draw::{draw_disc, draw_line, draw_ring, fill_rect, RED, YELLOW},
    error::{GazeError, GazeResult},
    model::{GazeSample, Trial, TrialStats},
    reduce::reduce_samples,
    stimulus::compose_canvas,
    text::TextPainter,
};

/// Trailing trajectory window: at most this many recent valid points are
/// connected on any frame.
pub const TRAIL_LEN: usize = 30;

const TRAJECTORY_YELLOW: Rgba<u8> = Rgba([255, 255, 0, 178]);
const BACKING_WHITE: Rgba<u8> = Rgba([255, 255, 255, 230]);
const BACKING_YELLOW: Rgba<u8> = Rgba([255, 230, 0, 230]);
const TEXT_BLACK: Rgba<u8> = Rgba([20, 20, 20, 255]);

/// Visual state of one frame, recomputed per frame from the sample stream.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameState {
    /// Last <= TRAIL_LEN valid points, oldest first.
    pub visible_trajectory: Vec<(f64, f64)>,
    pub current_point: Option<(f64, f64)>,
    pub lost: bool,
    pub elapsed_ms: i64,
}

/// Running trajectory accumulated across one trial's render pass. Owned by
/// the driver, reset for every trial, never shared across trials.
#[derive(Debug, Default)]
pub struct TrajectoryState {
    points: Vec<(f64, f64)>,
}

impl TrajectoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the next sample into the running trajectory and returns the
    /// frame's visual state. A lost sample contributes nothing to the trail;
    /// the existing trail stays visible and keeps aging out of the window on
    /// later valid frames.
    pub fn advance(&mut self, sample: &GazeSample, min_t_ms: i64) -> FrameState {
        let elapsed_ms = sample.t_ms - min_t_ms;

        let current_point = if sample.valid {
            self.points.push((sample.x_px, sample.y_px));
            Some((sample.x_px, sample.y_px))
        } else {
            None
        };

        let start = self.points.len().saturating_sub(TRAIL_LEN);
        FrameState {
            visible_trajectory: self.points[start..].to_vec(),
            current_point,
            lost: !sample.valid,
            elapsed_ms,
        }
    }
}

/// Strips known image extensions and parenthesis characters from an image
/// name for use in output filenames. Collision-tolerant, not collision-free.
pub fn sanitize_image_name(name: &str) -> String {
    let mut base = name;
    for ext in [".jpg", ".jpeg", ".png"] {
        if base.len() >= ext.len() && base[base.len() - ext.len()..].eq_ignore_ascii_case(ext) {
            base = &base[..base.len() - ext.len()];
            break;
        }
    }
    base.replace(['(', ')'], "")
}

/// Deterministic artifact path for one trial.
pub fn output_path(trial: &Trial, out_dir: &Path) -> PathBuf {
    out_dir.join(format!(
        "{}_{}_gaze.gif",
        trial.participant_id,
        sanitize_image_name(&trial.image_name)
    ))
}

/// Renders one trial to a looping GIF under `out_dir` and returns the
/// artifact path.
///
/// Frames are streamed into the encoder one at a time; the file is written
/// to a temporary sibling first and renamed on success, so a mid-encode
/// failure never leaves a partial artifact behind.
pub fn render_trial(
    trial: &Trial,
    cfg: &RenderConfig,
    out_dir: &Path,
    painter: &TextPainter,
) -> GazeResult<PathBuf> {
    trial.validate()?;

    // Stats describe the full recording; the frame budget only limits what
    // gets drawn.
    let stats = TrialStats::from_samples(&trial.samples)?;
    let samples = reduce_samples(trial.samples.clone(), cfg.max_frames);
    info!(
        participant = %trial.participant_id,
        image = %trial.image_name,
        duration_s = stats.duration_ms as f64 / 1000.0,
        frames = samples.len(),
        tracking = format!("{:.1}%", stats.tracking_rate * 100.0),
        "rendering trial"
    );

    let canvas = compose_canvas(&trial.stimulus_ref, cfg);
    let header = header_line(trial, &stats);

    let out_path = output_path(trial, out_dir);
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

    let tmp_path = out_path.with_extension("gif.part");
    let result = encode_frames(trial, cfg, painter, &samples, &stats, &canvas, &header, &tmp_path);

    match result {
        Ok(()) => {
            std::fs::rename(&tmp_path, &out_path)
                .with_context(|| format!("finalize artifact '{}'", out_path.display()))?;
            Ok(out_path)
        }
        Err(err) => {
            if let Err(rm_err) = std::fs::remove_file(&tmp_path) {
                warn!(path = %tmp_path.display(), %rm_err, "could not remove partial artifact");
            }
            Err(err)
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn encode_frames(
    trial: &Trial,
    cfg: &RenderConfig,
    painter: &TextPainter,
    samples: &[GazeSample],
    stats: &TrialStats,
    canvas: &RgbaImage,
    header: &str,
    tmp_path: &Path,
) -> GazeResult<()> {
    let file = File::create(tmp_path)
        .with_context(|| format!("create artifact '{}'", tmp_path.display()))?;
    // Quantizer speed 10 keeps full-canvas frames tractable; quality loss is
    // invisible on photographic stimuli.
    let mut encoder = GifEncoder::new_with_speed(BufWriter::new(file), 10);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| GazeError::encode(format!("set gif repeat: {e}")))?;

    let (delay_num, delay_den) = cfg.fps.frame_delay_ms();
    let mut trajectory = TrajectoryState::new();

    for sample in samples {
        let state = trajectory.advance(sample, stats.min_t_ms);
        let mut frame = canvas.clone();
        draw_overlay(&mut frame, cfg, painter, &state, stats, header);

        let frame = Frame::from_parts(frame, 0, 0, Delay::from_numer_denom_ms(delay_num, delay_den));
        encoder.encode_frame(frame).map_err(|e| {
            GazeError::encode(format!(
                "encode frame for '{}': {e}",
                trial.participant_id
            ))
        })?;
    }

    Ok(())
}

fn draw_overlay(
    frame: &mut RgbaImage,
    cfg: &RenderConfig,
    painter: &TextPainter,
    state: &FrameState,
    stats: &TrialStats,
    header: &str,
) {
    // Marker sizes scale with canvas height so overlays read the same at any
    // configured resolution.
    let unit = f64::from(cfg.canvas_height) / 1600.0;
    let text_px = (24.0 * unit) as f32;
    let pad = (8.0 * unit).round() as i64;

    if state.visible_trajectory.len() >= 2 {
        let half_width = (2.0 * unit).round().max(1.0) as i64;
        for pair in state.visible_trajectory.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            draw_line(
                frame,
                (x0.round() as i64, y0.round() as i64),
                (x1.round() as i64, y1.round() as i64),
                half_width,
                TRAJECTORY_YELLOW,
            );
        }
    }

    if let Some((x, y)) = state.current_point {
        let cx = x.round() as i64;
        let cy = y.round() as i64;
        draw_disc(frame, cx, cy, (10.0 * unit).round() as i64, RED);
        draw_ring(
            frame,
            cx,
            cy,
            (13.0 * unit).round() as i64,
            (2.0 * unit).round().max(1.0) as i64,
            YELLOW,
        );
    }

    if painter.has_font() {
        // Persistent header, constant across the whole artifact.
        let header_w = painter.measure(header, text_px) as i64;
        let hx = (i64::from(cfg.canvas_width) - header_w) / 2 - pad;
        fill_rect(frame, hx, 0, header_w + 2 * pad, text_px as i64 + 2 * pad, BACKING_WHITE);
        painter.draw(
            frame,
            (hx + pad) as f32,
            pad as f32,
            text_px,
            TEXT_BLACK,
            header,
        );

        // Per-frame time readout, top-left.
        let time_text = format!(
            "Time: {:.2}s / {:.1}s",
            state.elapsed_ms as f64 / 1000.0,
            stats.duration_ms as f64 / 1000.0
        );
        let time_y = text_px as i64 + 4 * pad;
        let time_w = painter.measure(&time_text, text_px) as i64;
        fill_rect(frame, pad, time_y, time_w + 2 * pad, text_px as i64 + 2 * pad, BACKING_WHITE);
        painter.draw(
            frame,
            (2 * pad) as f32,
            (time_y + pad) as f32,
            text_px,
            TEXT_BLACK,
            &time_text,
        );
    }

    if state.lost {
        // The banner itself does not depend on a font; the render must show
        // a lost state even when text is unavailable.
        let lost_px = (32.0 * unit) as f32;
        let text = "TRACKING LOST";
        let text_w = painter.measure(text, lost_px) as i64;
        let banner_w = if text_w > 0 { text_w + 4 * pad } else { (300.0 * unit) as i64 };
        let banner_h = lost_px as i64 + 2 * pad;
        let bx = (i64::from(cfg.canvas_width) - banner_w) / 2;
        let by = i64::from(cfg.canvas_height) - banner_h - (80.0 * unit) as i64;

        fill_rect(frame, bx, by, banner_w, banner_h, BACKING_YELLOW);
        painter.draw(frame, (bx + 2 * pad) as f32, (by + pad) as f32, lost_px, RED, text);
    }
}

fn header_line(trial: &Trial, stats: &TrialStats) -> String {
    let mut header = format!(
        "Participant: {} | Image: {}",
        trial.participant_id, trial.image_name
    );
    if let Some(rating) = &trial.rating {
        header.push_str(&format!(" | Rating: {rating}"));
    }
    header.push_str(&format!(
        " | Duration: {:.1}s | Tracking: {:.1}%",
        stats.duration_ms as f64 / 1000.0,
        stats.tracking_rate * 100.0
    ));
    header
}
