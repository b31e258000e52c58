//! Metric extraction for one capture.
//!
//! Four independent extractors (CPU, memory, power, font load time) plus
//! the window extractor that scopes them, composed into one
//! [`RunMetrics`] per capture by [`extract_run_metrics`]. All
//! aggregation happens inside the `[DOMContentLoaded, load]` window of
//! the web content thread.

use crate::error::ExtractError;
use crate::profile::matcher::{self, Condition};
use crate::profile::{ProfileDocument, ProfileThread, navigate};
use crate::series;

const DOM_EVENT: &str = "DOMEvent";
const DOM_CONTENT_LOADED: &str = "DOMContentLoaded";
const LOAD_EVENT: &str = "load";
const DOCUMENT_TARGET: &str = "document";
const NETWORK_TYPE: &str = "Network";
const GET_METHOD: &str = "GET";
const MEMORY_CATEGORY: &str = "Memory";
const RAPL_PACKAGE_COUNTER: &str = "RAPL_Package0_PKG";

/// The `[DOMContentLoaded, load]` interval scoping all aggregation, in
/// capture-relative milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisWindow {
    pub start: f64,
    pub end: f64,
}

impl AnalysisWindow {
    /// Window length in ms, rounded to 3 decimals.
    pub fn length_ms(&self) -> f64 {
        series::round_decimals(self.end - self.start, 3)
    }
}

/// All metrics derived from one capture, in report order.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    /// CPU deltas summed over the window.
    pub cpu_total: f64,
    /// Trimmed mean (10% each tail) of per-ms memory counter rates.
    pub memory_rate_mean: f64,
    /// Windowed energy total scaled by 1e-12. See
    /// [`series::accumulate_energy`] for why this is not true wattage.
    pub power: f64,
    /// Length of the observation window in ms.
    pub window_ms: f64,
    /// One load duration per configured font, in input order.
    pub font_load_ms: Vec<f64>,
}

/// Locates the analysis window on the web content thread: the start
/// times of its `DOMContentLoaded` and `load` document events.
pub fn analysis_window(thread: &ProfileThread) -> Result<AnalysisWindow, ExtractError> {
    Ok(AnalysisWindow {
        start: document_event_time(thread, DOM_CONTENT_LOADED)?,
        end: document_event_time(thread, LOAD_EVENT)?,
    })
}

fn document_event_time(thread: &ProfileThread, event_type: &str) -> Result<f64, ExtractError> {
    let conditions = [
        Condition::new("type", DOM_EVENT),
        Condition::new("eventType", event_type),
        Condition::new("target", DOCUMENT_TARGET),
    ];
    let index =
        navigate::marker_index(thread, &conditions).ok_or_else(|| ExtractError::MarkerNotFound {
            lookup: matcher::describe(&conditions),
        })?;
    thread
        .markers
        .start_time
        .get(index)
        .copied()
        .ok_or_else(|| ExtractError::FieldNotFound {
            field: format!("markers.startTime[{index}]"),
        })
}

/// The thread's CPU deltas, filtered to the window.
///
/// The raw deltas are kept as-is; no per-ms normalization is applied in
/// the current pipeline, whatever the report column name suggests.
pub fn cpu_load(thread: &ProfileThread, window: &AnalysisWindow) -> Result<Vec<f64>, ExtractError> {
    series::filter_by_time(
        &thread.samples.thread_cpu_delta,
        &thread.samples.time,
        window.start,
        window.end,
    )
}

/// Per-ms memory counter rates for the thread's process, filtered to the
/// window.
pub fn memory_load(
    document: &ProfileDocument,
    thread: &ProfileThread,
    window: &AnalysisWindow,
) -> Result<Vec<f64>, ExtractError> {
    let conditions = [
        Condition::new("category", MEMORY_CATEGORY),
        Condition::new("pid", thread.pid.clone()),
    ];
    let samples = navigate::counter_samples(document, window.start, window.end, &conditions)
        .ok_or_else(|| ExtractError::CounterNotFound {
            lookup: matcher::describe(&conditions),
        })?;
    let (rates, times) = series::per_ms(&samples.count, &samples.time)?;
    series::filter_by_time(&rates, &times, window.start, window.end)
}

/// Windowed total of the package power counter, scaled by 1e-12.
pub fn power_consumption(
    document: &ProfileDocument,
    window: &AnalysisWindow,
) -> Result<f64, ExtractError> {
    let conditions = [Condition::new("description", RAPL_PACKAGE_COUNTER)];
    let samples = navigate::counter_samples(document, window.start, window.end, &conditions)
        .ok_or_else(|| ExtractError::CounterNotFound {
            lookup: matcher::describe(&conditions),
        })?;
    let energy = series::accumulate_energy(&samples.count, &samples.time)?;
    let in_window = series::filter_by_time(&energy, &samples.time, window.start, window.end)?;
    Ok(in_window.iter().sum::<f64>() * 1e-12)
}

/// Load duration for each font resource URI, in input order.
pub fn font_load_times(
    thread: &ProfileThread,
    font_uris: &[String],
) -> Result<Vec<f64>, ExtractError> {
    font_uris
        .iter()
        .map(|uri| {
            navigate::resource_load_time(
                thread,
                &[
                    Condition::new("URI", uri.as_str()),
                    Condition::new("type", NETWORK_TYPE),
                    Condition::new("requestMethod", GET_METHOD),
                ],
            )
        })
        .collect()
}

/// Runs every extractor against one capture and assembles the report row
/// values. Any missing field along the way fails the whole capture.
pub fn extract_run_metrics(
    document: &ProfileDocument,
    target_identity: &str,
    font_uris: &[String],
) -> Result<RunMetrics, ExtractError> {
    let thread = navigate::web_thread(document, target_identity).ok_or_else(|| {
        ExtractError::ThreadNotFound {
            identity: target_identity.to_string(),
        }
    })?;
    let window = analysis_window(thread)?;
    log::debug!(
        "analysis window [{}, {}] on pid {}",
        window.start,
        window.end,
        thread.pid
    );

    let cpu = cpu_load(thread, &window)?;
    let memory = memory_load(document, thread, &window)?;
    let power = power_consumption(document, &window)?;
    let font_load_ms = font_load_times(thread, font_uris)?;

    Ok(RunMetrics {
        cpu_total: cpu.iter().sum(),
        memory_rate_mean: series::trimmed_mean(&memory, 0.1),
        power,
        window_ms: window.length_ms(),
        font_load_ms,
    })
}
