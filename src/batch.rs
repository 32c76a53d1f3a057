use std::path::Path;

use tracing::{info, warn};

use crate::{
    animate::render_trial,
    config::RenderConfig,
    error::{GazeError, GazeResult},
    model::LogRow,
    text::TextPainter,
    trials::assemble_trials,
};

/// Outcome counts for one batch run. Per-trial failures are reported here,
/// not through the process exit status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// Renders every eligible trial in the log, one at a time, end to end.
///
/// Finding zero eligible trials is the only fatal condition. Anything that
/// goes wrong inside a single trial (no samples, decode error, write error)
/// is logged and counted; the batch always continues with the next trial.
#[tracing::instrument(skip(rows, painter), fields(rows = rows.len()))]
pub fn run_batch(
    rows: &[LogRow],
    cfg: &RenderConfig,
    out_dir: &Path,
    limit: Option<usize>,
    painter: &TextPainter,
) -> GazeResult<BatchSummary> {
    cfg.validate()?;

    let trials = assemble_trials(rows, cfg, limit);
    if trials.is_empty() {
        return Err(GazeError::NoTrials);
    }

    let mut summary = BatchSummary::default();
    for trial in &trials {
        match render_trial(trial, cfg, out_dir, painter) {
            Ok(path) => {
                info!(path = %path.display(), "wrote artifact");
                summary.succeeded += 1;
            }
            Err(err) => {
                warn!(
                    participant = %trial.participant_id,
                    image = %trial.image_name,
                    %err,
                    "trial failed, continuing"
                );
                summary.failed += 1;
            }
        }
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch complete"
    );
    Ok(summary)
}
