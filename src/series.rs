//! Utilities over parallel (value, timestamp) sequences.
//!
//! The capture format pairs `values[i]` with `times[i]` throughout:
//! CPU deltas, counter samples, energy readings. These helpers do the
//! time-window filtering, rate conversion and rescaling the extractors
//! compose. Length preconditions are enforced as typed errors, never as
//! silent truncation.

use crate::error::ExtractError;

/// Keeps the values whose *following* timestamp falls inside `[start, end]`.
///
/// `values[i]` is retained iff `start <= times[i + 1] <= end`. The
/// last value is never examined. This next-timestamp alignment is
/// load-bearing for report compatibility — see the boundary tests before
/// touching it.
///
/// `times` must be at least as long as `values`; the energy pipeline
/// passes a values sequence one element shorter than its timestamps.
pub fn filter_by_time(
    values: &[f64],
    times: &[f64],
    start: f64,
    end: f64,
) -> Result<Vec<f64>, ExtractError> {
    if times.len() < values.len() {
        return Err(ExtractError::LengthMismatch {
            values: values.len(),
            times: times.len(),
        });
    }
    let mut result = Vec::new();
    for (i, value) in values.iter().enumerate().take(values.len().saturating_sub(1)) {
        if start <= times[i + 1] && times[i + 1] <= end {
            result.push(*value);
        }
    }
    Ok(result)
}

/// Converts absolute per-sample values into per-millisecond rates.
///
/// Returns `(rates, times[1..])`: `rates[i - 1] = values[i] / (times[i] -
/// times[i - 1])`, one element shorter than the input. Equal consecutive
/// timestamps make the rate undefined and fail the capture.
pub fn per_ms(values: &[f64], times: &[f64]) -> Result<(Vec<f64>, Vec<f64>), ExtractError> {
    if values.len() != times.len() {
        return Err(ExtractError::LengthMismatch {
            values: values.len(),
            times: times.len(),
        });
    }
    let mut rates = Vec::with_capacity(values.len().saturating_sub(1));
    for i in 1..values.len() {
        let delta_ms = times[i] - times[i - 1];
        if delta_ms == 0.0 {
            return Err(ExtractError::ZeroTimeDelta { index: i });
        }
        rates.push(values[i] / delta_ms);
    }
    Ok((rates, times[1..].to_vec()))
}

/// Accumulates per-sample energy readings: returns `values[1..]` unchanged.
///
/// The per-sample wattage conversion used to be
/// `watts = pico_wh / (sample_time_delta_ms / 3.6) * 1e6`, but the report
/// consumers expect the raw accumulated readings, so the samples pass
/// through untouched. The "AVG Wattage" report column is therefore
/// summed picowatt-hour samples scaled by 1e-12, NOT true watt-hours.
pub fn accumulate_energy(values: &[f64], times: &[f64]) -> Result<Vec<f64>, ExtractError> {
    if values.len() != times.len() {
        return Err(ExtractError::LengthMismatch {
            values: values.len(),
            times: times.len(),
        });
    }
    Ok(values[1..].to_vec())
}

/// Rescales a sequence so its maximum becomes 100.
///
/// Nonzero elements are scaled proportionally and rounded to 2 decimal
/// places; zero elements are left untouched. Empty input is a no-op.
pub fn relative_to_max(values: &mut [f64]) {
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() || max == 0.0 {
        return;
    }
    for value in values.iter_mut() {
        if *value != 0.0 {
            *value = round_decimals(*value * 100.0 / max, 2);
        }
    }
}

/// Arithmetic mean after dropping `floor(n * proportion)` elements from
/// each tail of the sorted sequence. Returns NaN when nothing survives.
pub fn trimmed_mean(values: &[f64], proportion: f64) -> f64 {
    let cut = (values.len() as f64 * proportion).floor() as usize;
    if values.len() <= cut * 2 {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let kept = &sorted[cut..sorted.len() - cut];
    kept.iter().sum::<f64>() / kept.len() as f64
}

/// Rounds to the given number of decimal places.
pub(crate) fn round_decimals(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
