use tracing::{debug, info};

use crate::{
    config::RenderConfig,
    model::{LogRow, Trial, TRIAL_TYPE_IMAGE, TRIAL_TYPE_RATING},
    samples::parse_samples,
};

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// True when the stimulus reference carries a recognized image extension,
/// case-insensitive.
pub fn is_image_stimulus(stimulus: &str) -> bool {
    let lower = stimulus.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

fn is_eligible(row: &LogRow) -> bool {
    row.trial_type == TRIAL_TYPE_IMAGE
        && is_image_stimulus(&row.stimulus)
        && !row.gaze_payload.is_empty()
}

/// Positional rating join: the rating for the stimulus row at `index` is the
/// response of row `index + 1` in the *unfiltered* log, taken only when that
/// row is a rating row. There is no shared key; the upstream recorder emits
/// the rating row directly after its stimulus.
//
// TODO: contract-test adjacency against real logs; an interleaved row between
// stimulus and rating would silently drop the rating.
pub fn correlate_rating(rows: &[LogRow], index: usize) -> Option<String> {
    let next = rows.get(index + 1)?;
    if next.trial_type == TRIAL_TYPE_RATING {
        Some(next.response.clone())
    } else {
        None
    }
}

/// Joins eligible stimulus rows with their adjacent rating rows and parses
/// each gaze payload into samples. With a `limit`, only the first N eligible
/// trials are returned (truncation in source order, not sampling).
pub fn assemble_trials(rows: &[LogRow], cfg: &RenderConfig, limit: Option<usize>) -> Vec<Trial> {
    let mut trials = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        if !is_eligible(row) {
            continue;
        }
        if let Some(limit) = limit {
            if trials.len() >= limit {
                break;
            }
        }

        let image_name = if row.image_name.is_empty() {
            basename(&row.stimulus).to_string()
        } else {
            row.image_name.clone()
        };

        let rating = correlate_rating(rows, index);
        let samples = parse_samples(&row.gaze_payload, cfg);
        debug!(
            participant = %row.participant_id,
            image = %image_name,
            samples = samples.len(),
            rating = rating.as_deref().unwrap_or("-"),
            "assembled trial"
        );

        trials.push(Trial {
            participant_id: row.participant_id.clone(),
            stimulus_ref: row.stimulus.clone(),
            image_name,
            rating,
            samples,
        });
    }

    info!(trials = trials.len(), "found image trials with gaze data");
    trials
}

fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_row(participant: &str, stimulus: &str, payload: &str) -> LogRow {
        LogRow {
            trial_type: TRIAL_TYPE_IMAGE.to_string(),
            stimulus: stimulus.to_string(),
            participant_id: participant.to_string(),
            gaze_payload: payload.to_string(),
            ..LogRow::default()
        }
    }

    fn rating_row(response: &str) -> LogRow {
        LogRow {
            trial_type: TRIAL_TYPE_RATING.to_string(),
            response: response.to_string(),
            ..LogRow::default()
        }
    }

    const PAYLOAD: &str = r#"{"samples":[{"x":0.5,"y":0.5,"t":0}]}"#;

    #[test]
    fn image_extension_match_is_case_insensitive() {
        assert!(is_image_stimulus("./assets/photo.JPG"));
        assert!(is_image_stimulus("./assets/photo.jpeg"));
        assert!(is_image_stimulus("scene.PNG"));
        assert!(!is_image_stimulus("./assets/clip.mp4"));
        assert!(!is_image_stimulus(""));
    }

    #[test]
    fn rating_comes_from_adjacent_row_only() {
        let rows = vec![
            image_row("p1", "./assets/a.jpg", PAYLOAD),
            rating_row("7"),
            image_row("p1", "./assets/b.jpg", PAYLOAD),
            image_row("p1", "./assets/c.jpg", PAYLOAD),
            rating_row("3"),
        ];

        assert_eq!(correlate_rating(&rows, 0).as_deref(), Some("7"));
        // Next row is another stimulus, not a rating: no inheritance from row 4.
        assert_eq!(correlate_rating(&rows, 2), None);
        assert_eq!(correlate_rating(&rows, 3).as_deref(), Some("3"));
        // Last row has no successor.
        assert_eq!(correlate_rating(&rows, 4), None);
    }

    #[test]
    fn assembles_only_eligible_rows() {
        let rows = vec![
            image_row("p1", "./assets/a.jpg", PAYLOAD),
            rating_row("7"),
            // Missing payload: skipped.
            image_row("p1", "./assets/b.jpg", ""),
            // Wrong trial type: skipped.
            LogRow {
                trial_type: "html-keyboard-response".to_string(),
                stimulus: "./assets/c.jpg".to_string(),
                gaze_payload: PAYLOAD.to_string(),
                ..LogRow::default()
            },
            // Non-image stimulus: skipped.
            image_row("p1", "instructions", PAYLOAD),
        ];

        let trials = assemble_trials(&rows, &RenderConfig::default(), None);
        assert_eq!(trials.len(), 1);
        assert_eq!(trials[0].image_name, "a.jpg");
        assert_eq!(trials[0].rating.as_deref(), Some("7"));
        assert_eq!(trials[0].samples.len(), 1);
    }

    #[test]
    fn limit_truncates_in_source_order() {
        let rows = vec![
            image_row("p1", "./assets/a.jpg", PAYLOAD),
            image_row("p1", "./assets/b.jpg", PAYLOAD),
            image_row("p1", "./assets/c.jpg", PAYLOAD),
        ];

        let trials = assemble_trials(&rows, &RenderConfig::default(), Some(2));
        assert_eq!(trials.len(), 2);
        assert_eq!(trials[0].image_name, "a.jpg");
        assert_eq!(trials[1].image_name, "b.jpg");
    }

    #[test]
    fn rating_correlation_uses_unfiltered_indices() {
        // An ineligible row sits between two eligible ones; the second
        // eligible row's rating still comes from its own immediate successor.
        let rows = vec![
            image_row("p1", "./assets/a.jpg", PAYLOAD),
            LogRow {
                trial_type: "html-keyboard-response".to_string(),
                ..LogRow::default()
            },
            image_row("p1", "./assets/b.jpg", PAYLOAD),
            rating_row("5"),
        ];

        let trials = assemble_trials(&rows, &RenderConfig::default(), None);
        assert_eq!(trials.len(), 2);
        assert_eq!(trials[0].rating, None);
        assert_eq!(trials[1].rating.as_deref(), Some("5"));
    }
}
