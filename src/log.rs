use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context as _;
use tracing::info;

use crate::{error::GazeResult, model::LogRow};

/// Reads the experiment log CSV into rows, preserving source order.
///
/// Row order is semantically significant: rating correlation is positional
/// (a rating row immediately follows its stimulus row).
pub fn read_log(path: &Path) -> GazeResult<Vec<LogRow>> {
    let file =
        File::open(path).with_context(|| format!("open experiment log '{}'", path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for (idx, record) in reader.deserialize::<LogRow>().enumerate() {
        let row =
            record.with_context(|| format!("parse log row {} in '{}'", idx + 1, path.display()))?;
        rows.push(row);
    }

    info!(rows = rows.len(), path = %path.display(), "loaded experiment log");
    Ok(rows)
}
