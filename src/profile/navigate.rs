//! Lookups within a parsed capture: threads, markers, counters.
//!
//! Absence is an `Option`, never a fabricated record — callers decide
//! whether a missing thread or marker is fatal. Only
//! [`resource_load_time`], which has no meaningful partial result,
//! returns a typed error directly.

use crate::error::ExtractError;
use crate::profile::matcher::{self, Condition};
use crate::profile::{CounterSamples, ProfileDocument, ProfileThread};
use crate::series;

/// Marker status carried by resource-timing start markers.
pub const STATUS_START: &str = "STATUS_START";
/// Marker status carried by resource-timing stop markers.
pub const STATUS_STOP: &str = "STATUS_STOP";

/// First thread whose `eTLD+1` identity equals `identity`.
pub fn web_thread<'a>(
    document: &'a ProfileDocument,
    identity: &str,
) -> Option<&'a ProfileThread> {
    document
        .threads
        .iter()
        .find(|thread| thread.etld_plus_one.as_deref() == Some(identity))
}

/// Index of the first marker whose data satisfies the conditions.
/// Markers without a data payload are skipped.
pub fn marker_index(thread: &ProfileThread, conditions: &[Condition]) -> Option<usize> {
    thread.markers.data.iter().position(|data| {
        data.as_ref()
            .is_some_and(|record| matcher::matches(record, conditions))
    })
}

/// Sample series of the first counter satisfying the conditions.
///
/// `start`/`end` are accepted but not consulted during selection; callers
/// window-filter the returned samples themselves.
/// TODO: decide whether counter selection should pre-filter by the
/// analysis window — the bounds being ignored here looks like an upstream
/// defect, but current reports depend on predicate-only selection.
///
/// A matching counter with no sample groups is treated as absent.
pub fn counter_samples<'a>(
    document: &'a ProfileDocument,
    _start: f64,
    _end: f64,
    conditions: &[Condition],
) -> Option<&'a CounterSamples> {
    document
        .counters
        .iter()
        .find(|counter| matcher::matches(&counter.fields, conditions))
        .and_then(|counter| counter.sample_groups.first())
        .map(|group| &group.samples)
}

/// Duration between a resource's START and STOP markers, in ms, rounded
/// to 3 decimals.
///
/// Both markers are located by the same base conditions plus a `status`
/// requirement; the start time comes from the start marker's `startTime`
/// field and the end time from the stop marker's `endTime` field. A
/// missing marker or time field fails the capture.
pub fn resource_load_time(
    thread: &ProfileThread,
    conditions: &[Condition],
) -> Result<f64, ExtractError> {
    let start = marker_time(thread, conditions, STATUS_START, "startTime")?;
    let end = marker_time(thread, conditions, STATUS_STOP, "endTime")?;
    Ok(series::round_decimals(end - start, 3))
}

fn marker_time(
    thread: &ProfileThread,
    conditions: &[Condition],
    status: &str,
    field: &str,
) -> Result<f64, ExtractError> {
    let mut conditions = conditions.to_vec();
    conditions.push(Condition::new("status", status));

    let index = marker_index(thread, &conditions).ok_or_else(|| ExtractError::MarkerNotFound {
        lookup: matcher::describe(&conditions),
    })?;
    thread.markers.data[index]
        .as_ref()
        .and_then(|record| record.get(field))
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| ExtractError::FieldNotFound {
            field: format!("markers.data[{index}].{field}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> ProfileDocument {
        serde_json::from_value(json!({
            "threads": [
                {
                    "pid": 1,
                    "samples": { "threadCPUDelta": [], "time": [] },
                    "markers": { "data": [], "startTime": [] }
                },
                {
                    "eTLD+1": "http://fonts.test",
                    "pid": 42,
                    "samples": { "threadCPUDelta": [], "time": [] },
                    "markers": {
                        "data": [
                            null,
                            { "type": "DOMEvent", "eventType": "load" },
                            {
                                "type": "Network",
                                "URI": "http://fonts.test/a.woff2",
                                "status": "STATUS_START",
                                "startTime": 2.0
                            },
                            {
                                "type": "Network",
                                "URI": "http://fonts.test/a.woff2",
                                "status": "STATUS_STOP",
                                "endTime": 5.5
                            },
                            {
                                "type": "Network",
                                "URI": "http://fonts.test/b.woff2",
                                "status": "STATUS_START",
                                "startTime": 3.0
                            }
                        ],
                        "startTime": [0.0, 1.0, 2.0, 5.5, 3.0]
                    }
                }
            ],
            "counters": [
                {
                    "category": "Memory",
                    "pid": 42,
                    "sampleGroups": [
                        { "samples": { "count": [1.0, 2.0], "time": [0.0, 1.0] } }
                    ]
                },
                {
                    "category": "power",
                    "description": "RAPL_Package0_PKG",
                    "pid": 42,
                    "sampleGroups": [
                        { "samples": { "count": [3.0], "time": [0.0] } }
                    ]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn web_thread_finds_the_identity_match() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        assert_eq!(thread.pid, json!(42));
    }

    #[test]
    fn web_thread_absence_is_none() {
        assert!(web_thread(&document(), "http://elsewhere.test").is_none());
    }

    #[test]
    fn marker_index_skips_null_entries() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        let index = marker_index(
            thread,
            &[Condition::new("type", "DOMEvent"), Condition::new("eventType", "load")],
        );
        assert_eq!(index, Some(1));
    }

    #[test]
    fn marker_index_absence_is_none() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        assert_eq!(marker_index(thread, &[Condition::new("type", "Text")]), None);
    }

    #[test]
    fn counter_samples_selects_by_conditions_only() {
        let document = document();
        let conditions = [Condition::new("description", "RAPL_Package0_PKG")];
        // The window bounds do not participate in selection.
        let narrow = counter_samples(&document, 100.0, 200.0, &conditions).unwrap();
        let wide = counter_samples(&document, 0.0, 1e9, &conditions).unwrap();
        assert_eq!(narrow.count, vec![3.0]);
        assert_eq!(wide.count, vec![3.0]);
    }

    #[test]
    fn counter_samples_absence_is_none() {
        let conditions = [Condition::new("category", "Bandwidth")];
        assert!(counter_samples(&document(), 0.0, 1.0, &conditions).is_none());
    }

    #[test]
    fn counter_without_sample_groups_is_absent() {
        let document: ProfileDocument = serde_json::from_value(json!({
            "threads": [],
            "counters": [{ "category": "Memory", "pid": 1 }]
        }))
        .unwrap();
        let conditions = [Condition::new("category", "Memory")];
        assert!(counter_samples(&document, 0.0, 1.0, &conditions).is_none());
    }

    #[test]
    fn resource_load_time_spans_start_to_stop() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        let duration = resource_load_time(
            thread,
            &[
                Condition::new("URI", "http://fonts.test/a.woff2"),
                Condition::new("type", "Network"),
            ],
        )
        .unwrap();
        assert_eq!(duration, 3.5);
    }

    #[test]
    fn resource_load_time_without_a_stop_marker_fails() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        let err = resource_load_time(
            thread,
            &[Condition::new("URI", "http://fonts.test/b.woff2")],
        )
        .unwrap_err();
        match err {
            ExtractError::MarkerNotFound { lookup } => {
                assert!(lookup.contains("STATUS_STOP"))
            }
            other => panic!("expected MarkerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn resource_load_time_without_any_marker_fails() {
        let document = document();
        let thread = web_thread(&document, "http://fonts.test").unwrap();
        let err = resource_load_time(
            thread,
            &[Condition::new("URI", "http://fonts.test/missing.woff2")],
        )
        .unwrap_err();
        assert!(matches!(err, ExtractError::MarkerNotFound { .. }));
    }
}
