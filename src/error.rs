//! Typed errors for the extraction pipeline.
//!
//! Every failure mode a capture can produce is a variant here, so the
//! per-file loop can record it and keep going. Variants carry the data
//! needed for a useful diagnostic (both lengths for a parallel-sequence
//! mismatch, the lookup description for a missing marker or counter).

/// A fatal error while extracting metrics from a single capture.
///
/// Errors are never retried; inputs are static files. An error aborts the
/// current file's row only — the batch caller records it and continues.
#[derive(Debug)]
pub enum ExtractError {
    /// Parallel value/timestamp sequences with incompatible lengths.
    LengthMismatch { values: usize, times: usize },
    /// Two consecutive samples share a timestamp, so a per-ms rate is undefined.
    ZeroTimeDelta { index: usize },
    /// No thread in the capture carries the configured identity.
    ThreadNotFound { identity: String },
    /// No marker satisfied the field conditions.
    MarkerNotFound { lookup: String },
    /// No counter satisfied the field conditions.
    CounterNotFound { lookup: String },
    /// A located record is missing a field the pipeline needs.
    FieldNotFound { field: String },
    /// The capture file could not be read.
    Io(std::io::Error),
    /// The capture file is not valid JSON or lacks the expected skeleton.
    Json(serde_json::Error),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::LengthMismatch { values, times } => {
                write!(
                    f,
                    "parallel sequence lengths differ: {values} values vs {times} timestamps"
                )
            }
            ExtractError::ZeroTimeDelta { index } => {
                write!(f, "zero time delta before sample {index}")
            }
            ExtractError::ThreadNotFound { identity } => {
                write!(f, "no thread with identity {identity}")
            }
            ExtractError::MarkerNotFound { lookup } => {
                write!(f, "no marker matching {lookup}")
            }
            ExtractError::CounterNotFound { lookup } => {
                write!(f, "no counter matching {lookup}")
            }
            ExtractError::FieldNotFound { field } => {
                write!(f, "missing field {field}")
            }
            ExtractError::Io(err) => write!(f, "failed to read capture: {err}"),
            ExtractError::Json(err) => write!(f, "failed to parse capture: {err}"),
        }
    }
}

impl std::error::Error for ExtractError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExtractError::Io(err) => Some(err),
            ExtractError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err)
    }
}

impl From<serde_json::Error> for ExtractError {
    fn from(err: serde_json::Error) -> Self {
        ExtractError::Json(err)
    }
}
