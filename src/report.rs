//! CSV report sink.
//!
//! One report per font format, one row per successfully processed
//! capture. The writer is an explicit value handed to the batch runner —
//! there is no ambient output state. Note that the "AVG Wattage" column
//! carries summed raw energy samples scaled by 1e-12, not true
//! watt-hours; see [`crate::series::accumulate_energy`].

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::metrics::RunMetrics;

/// Report header, in column order.
pub const COLUMNS: [&str; 9] = [
    "Index",
    "Filename",
    "AVG CPU Cycles / ms",
    "AVG MEM Changes / ms",
    "AVG Wattage",
    "Length of observation period",
    "AVG Raleway Load Time",
    "AVG Montserrat Load Time",
    "AVG SourceSans Load Time",
];

/// Row-oriented CSV writer; the header row is written once on
/// construction.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl ReportWriter<BufWriter<File>> {
    /// Creates (or replaces) the report file at `path`, creating parent
    /// directories as needed.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Self::from_writer(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> ReportWriter<W> {
    pub fn from_writer(out: W) -> io::Result<Self> {
        let mut writer = ReportWriter { out };
        writer.write_record(COLUMNS)?;
        Ok(writer)
    }

    /// Appends one row: the capture's position in the batch, its
    /// filename, and the extracted metrics in column order.
    pub fn append(&mut self, index: usize, filename: &str, metrics: &RunMetrics) -> io::Result<()> {
        let mut fields = vec![
            index.to_string(),
            filename.to_string(),
            metrics.cpu_total.to_string(),
            metrics.memory_rate_mean.to_string(),
            metrics.power.to_string(),
            metrics.window_ms.to_string(),
        ];
        fields.extend(metrics.font_load_ms.iter().map(f64::to_string));
        self.write_record(fields)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_record<I, S>(&mut self, fields: I) -> io::Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = fields
            .into_iter()
            .map(|field| escape_field(field.as_ref()).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        writeln!(self.out, "{line}")
    }
}

/// Quotes a field when it would break the row, doubling embedded quotes.
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}
