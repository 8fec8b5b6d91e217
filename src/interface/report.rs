//! Export of finished runs for external plotting and analysis.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::solvers::OptimizationResult;

#[derive(Debug, Serialize)]
struct HistoryRow {
    iteration: usize,
    best_value: f64,
}

#[derive(Debug, Serialize)]
struct PositionRow {
    snapshot: usize,
    firefly: usize,
    x: f64,
    y: f64,
}

/// Writes `iteration,best_value`, one row per iteration starting at 1.
pub fn write_history_csv<W: Write>(result: &OptimizationResult, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for (i, &best_value) in result.info.history_best.iter().enumerate() {
        wtr.serialize(HistoryRow {
            iteration: i + 1,
            best_value,
        })?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `snapshot,firefly,x,y` for every recorded 2D population state.
/// Snapshot 0 is the initial population.
pub fn write_positions_csv<W: Write>(result: &OptimizationResult, out: W) -> Result<()> {
    let Some(snapshots) = result.info.history_positions.as_ref() else {
        bail!("no position history recorded (requires d = 2 and position tracking)");
    };

    let mut wtr = csv::Writer::from_writer(out);
    for (snapshot, positions) in snapshots.iter().enumerate() {
        for (firefly, row) in positions.row_iter().enumerate() {
            wtr.serialize(PositionRow {
                snapshot,
                firefly,
                x: row[0],
                y: row[1],
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(result: &OptimizationResult, out: W) -> Result<()> {
    serde_json::to_writer_pretty(out, result)?;
    Ok(())
}

/// Opens `path` for writing and hands a buffered writer to `f`.
pub fn to_file<F>(path: &Path, f: F) -> Result<()>
where
    F: FnOnce(BufWriter<File>) -> Result<()>,
{
    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    f(BufWriter::new(file)).with_context(|| format!("Failed to write {}", path.display()))
}
