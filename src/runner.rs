//! Sequential batch processing of capture files.
//!
//! One capture is fully processed — loaded, parsed, all metrics
//! extracted, one row emitted — before the next begins. A failure aborts
//! only that capture's row; the failure is collected and reported after
//! the whole batch has been attempted.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::ExtractError;
use crate::metrics::{self, RunMetrics};
use crate::profile;
use crate::report::ReportWriter;

/// One capture that could not be processed.
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: ExtractError,
}

/// Outcome of one format's batch.
#[derive(Debug)]
pub struct BatchSummary {
    /// Rows written to the report.
    pub rows: usize,
    /// Captures attempted (rows + failures).
    pub attempted: usize,
    pub failures: Vec<FileFailure>,
}

/// JSON capture files directly under `dir`, sorted for deterministic row
/// order.
pub fn input_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    files.sort();
    Ok(files)
}

/// Processes every capture in order, appending one report row per
/// success and collecting failures.
///
/// A failed capture still consumes its row index, so surviving rows keep
/// their batch positions. Sink errors are environmental and abort the
/// batch, unlike per-capture extraction errors.
pub fn process_files<W: Write>(
    files: &[PathBuf],
    target_identity: &str,
    font_uris: &[String],
    report: &mut ReportWriter<W>,
) -> io::Result<BatchSummary> {
    let mut failures = Vec::new();
    let mut rows = 0;

    for (index, path) in files.iter().enumerate() {
        log::info!(
            "processing capture {}/{}: {}",
            index + 1,
            files.len(),
            path.display()
        );
        match extract_one(path, target_identity, font_uris) {
            Ok(metrics) => {
                report.append(index, &path.display().to_string(), &metrics)?;
                rows += 1;
            }
            Err(error) => {
                log::warn!("skipping {}: {error}", path.display());
                failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
            }
        }
    }
    report.flush()?;

    Ok(BatchSummary {
        rows,
        attempted: files.len(),
        failures,
    })
}

fn extract_one(
    path: &Path,
    target_identity: &str,
    font_uris: &[String],
) -> Result<RunMetrics, ExtractError> {
    let document = profile::load_profile(path)?;
    metrics::extract_run_metrics(&document, target_identity, font_uris)
}
