//! Data model for Firefox Profiler captures.
//!
//! A capture is one JSON document per test run. Only the skeleton the
//! extraction pipeline walks is typed: threads with their sample and
//! marker tables, and counters with their sample groups. Marker data and
//! counter identity fields are arbitrary string-keyed mappings — a
//! marker's meaning is entirely determined by which fields it carries —
//! so those stay as raw JSON maps for predicate matching.
//!
//! Everything here is a read-only view into one parsed document,
//! discarded after the file's metrics are computed.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ExtractError;

pub mod matcher;
pub mod navigate;

pub use matcher::Condition;

/// The root of one parsed capture.
#[derive(Debug, Deserialize)]
pub struct ProfileDocument {
    pub threads: Vec<ProfileThread>,
    pub counters: Vec<CounterRecord>,
}

/// One thread's timeline within a capture.
#[derive(Debug, Deserialize)]
pub struct ProfileThread {
    /// Identity of the page the thread renders; used to select the web
    /// content thread. Absent on helper threads.
    #[serde(rename = "eTLD+1", default)]
    pub etld_plus_one: Option<String>,
    /// Owning process id. Kept as raw JSON because capture versions
    /// disagree on whether this is a number or a string; counter matching
    /// compares it structurally.
    pub pid: Value,
    pub samples: SampleTable,
    pub markers: MarkerTable,
}

/// Parallel CPU-delta/timestamp sequences sampled over a thread's life.
#[derive(Debug, Deserialize)]
pub struct SampleTable {
    #[serde(rename = "threadCPUDelta")]
    pub thread_cpu_delta: Vec<f64>,
    pub time: Vec<f64>,
}

/// A thread's marker timeline.
///
/// `data[i]` pairs with `start_time[i]`; entries are null for markers
/// that carry no payload. Resource stop times are read from the data
/// mapping's own `endTime` field, so the parallel end-time array is not
/// modeled.
#[derive(Debug, Deserialize)]
pub struct MarkerTable {
    pub data: Vec<Option<Map<String, Value>>>,
    #[serde(rename = "startTime")]
    pub start_time: Vec<f64>,
}

/// A named, sampled numeric series associated with a process.
#[derive(Debug, Deserialize)]
pub struct CounterRecord {
    #[serde(rename = "sampleGroups", default)]
    pub sample_groups: Vec<SampleGroup>,
    /// Identity fields (category, description, pid, ...) for predicate
    /// matching.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct SampleGroup {
    pub samples: CounterSamples,
}

/// Parallel count/timestamp sequences for one counter.
#[derive(Debug, Deserialize)]
pub struct CounterSamples {
    pub count: Vec<f64>,
    pub time: Vec<f64>,
}

/// Loads and parses one capture file.
pub fn load_profile(path: &Path) -> Result<ProfileDocument, ExtractError> {
    let file = File::open(path)?;
    let document = serde_json::from_reader(BufReader::new(file))?;
    Ok(document)
}
