use crate::error::{GazeError, GazeResult};

/// Trial-type tag of an image stimulus presentation row.
pub const TRIAL_TYPE_IMAGE: &str = "image-keyboard-response";
/// Trial-type tag of a rating row. Ratings always immediately follow their
/// stimulus trial in the source log.
pub const TRIAL_TYPE_RATING: &str = "custom-rating-scale";

/// One row of the experiment log. Column names are fixed by the upstream
/// recorder; columns we do not consume are ignored on deserialization.
#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct LogRow {
    #[serde(default)]
    pub trial_type: String,
    #[serde(default)]
    pub stimulus: String,
    #[serde(default)]
    pub participant_id: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub image_name: String,
    /// Serialized per-sample gaze recording, JSON embedded in the CSV cell.
    #[serde(default, rename = "cogix_eye_tracking")]
    pub gaze_payload: String,
}

/// One timestamped gaze reading, already converted to canvas pixel space.
///
/// `valid == false` marks a tracking dropout: the recorder encodes lost
/// tracking as an exact (0, 0) normalized coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GazeSample {
    pub x_px: f64,
    pub y_px: f64,
    pub t_ms: i64,
    pub valid: bool,
}

/// One stimulus presentation with its gaze recording and optional rating.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Trial {
    pub participant_id: String,
    pub stimulus_ref: String,
    pub image_name: String,
    pub rating: Option<String>,
    pub samples: Vec<GazeSample>,
}

impl Trial {
    /// A trial with no samples must never reach rendering.
    pub fn validate(&self) -> GazeResult<()> {
        if self.samples.is_empty() {
            return Err(GazeError::validation(format!(
                "trial '{}'/'{}' has no gaze samples",
                self.participant_id, self.image_name
            )));
        }
        Ok(())
    }
}

/// Per-trial statistics shown in the persistent overlay. Computed once,
/// constant across all frames of one artifact.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialStats {
    pub min_t_ms: i64,
    pub duration_ms: i64,
    /// Fraction of samples with valid tracking, in [0, 1].
    pub tracking_rate: f64,
}

impl TrialStats {
    pub fn from_samples(samples: &[GazeSample]) -> GazeResult<Self> {
        if samples.is_empty() {
            return Err(GazeError::validation(
                "cannot compute stats over zero samples (no data)",
            ));
        }

        let min_t_ms = samples.iter().map(|s| s.t_ms).min().unwrap_or(0);
        let max_t_ms = samples.iter().map(|s| s.t_ms).max().unwrap_or(0);
        let valid = samples.iter().filter(|s| s.valid).count();

        Ok(Self {
            min_t_ms,
            duration_ms: max_t_ms - min_t_ms,
            tracking_rate: valid as f64 / samples.len() as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(t_ms: i64, valid: bool) -> GazeSample {
        GazeSample {
            x_px: 10.0,
            y_px: 20.0,
            t_ms,
            valid,
        }
    }

    #[test]
    fn trial_with_zero_samples_is_invalid() {
        let trial = Trial {
            participant_id: "p1".to_string(),
            stimulus_ref: "./assets/a.jpg".to_string(),
            image_name: "a.jpg".to_string(),
            rating: None,
            samples: vec![],
        };
        assert!(trial.validate().is_err());
    }

    #[test]
    fn stats_cover_duration_and_tracking_rate() {
        let stats = TrialStats::from_samples(&[
            sample(100, true),
            sample(180, false),
            sample(260, true),
            sample(340, true),
        ])
        .unwrap();

        assert_eq!(stats.min_t_ms, 100);
        assert_eq!(stats.duration_ms, 240);
        assert!((stats.tracking_rate - 0.75).abs() < 1e-12);
    }

    #[test]
    fn stats_reject_empty_input() {
        assert!(TrialStats::from_samples(&[]).is_err());
    }

    #[test]
    fn stats_are_timestamp_order_independent() {
        // Payload order is not guaranteed sorted; min/max must not assume it.
        let stats = TrialStats::from_samples(&[sample(500, true), sample(100, true)]).unwrap();
        assert_eq!(stats.min_t_ms, 100);
        assert_eq!(stats.duration_ms, 400);
    }
}
