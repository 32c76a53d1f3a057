use tracing::warn;

use crate::{config::RenderConfig, error::GazeError, model::GazeSample};

#[derive(Debug, serde::Deserialize)]
struct RawPayload {
    samples: Option<Vec<RawSample>>,
}

#[derive(Debug, serde::Deserialize)]
struct RawSample {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    #[serde(default)]
    t: i64,
}

/// Parses one trial's embedded gaze payload into pixel-space samples.
///
/// The payload is `{"samples": [{"x", "y", "t"}, ...]}` with normalized
/// coordinates in [0, 1]; missing fields default to 0. A malformed payload or
/// a missing samples collection yields an empty sequence with a diagnostic —
/// the failure is absorbed here, never propagated.
///
/// Samples keep their source order. An exact (0, 0) normalized pair is the
/// recorder's tracking-loss sentinel and maps to `valid = false`.
pub fn parse_samples(payload: &str, cfg: &RenderConfig) -> Vec<GazeSample> {
    let parsed: RawPayload = match serde_json::from_str(payload) {
        Ok(p) => p,
        Err(err) => {
            let err = GazeError::payload(err.to_string());
            warn!(%err, "skipping trial samples");
            return Vec::new();
        }
    };

    let Some(raw) = parsed.samples else {
        let err = GazeError::payload("payload has no samples collection");
        warn!(%err, "skipping trial samples");
        return Vec::new();
    };

    raw.into_iter()
        .map(|s| GazeSample {
            x_px: s.x * f64::from(cfg.canvas_width),
            y_px: s.y * f64::from(cfg.canvas_height),
            t_ms: s.t,
            valid: s.x != 0.0 || s.y != 0.0,
        })
        .collect()
}
