//! Run configuration: where captures live, where reports go, and which
//! page and font resources the extraction targets.
//!
//! Precedence: built-in defaults, then an optional `fontprof.toml` in the
//! working directory, then `FONTPROF_*` environment variables. CLI flags
//! override on top of the loaded value.
//!
//! ```toml
//! url = "http://192.168.178.43"
//! input = "input"
//! output = "output"
//! fonts = [
//!     "fonts/RalewayExtrabold/Raleway-ExtraBold",
//!     "fonts/MontserratSemibold/Montserrat-SemiBold",
//!     "fonts/SourceSansPro/SourceSans-Regular",
//! ]
//! ```

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::formats::FontFormat;

/// Address of the capture rig's web server; threads carrying this
/// identity are "the web content thread".
const DEFAULT_TARGET_URL: &str = "http://192.168.178.43";

/// Path stems of the three study fonts, relative to the target URL.
/// The report columns are fixed to these three families.
const DEFAULT_FONT_PATHS: [&str; 3] = [
    "fonts/RalewayExtrabold/Raleway-ExtraBold",
    "fonts/MontserratSemibold/Montserrat-SemiBold",
    "fonts/SourceSansPro/SourceSans-Regular",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontprofConfig {
    /// Identity of the web content thread.
    #[serde(rename = "url")]
    pub target_url: String,

    /// Root directory containing one capture directory per format.
    #[serde(rename = "input")]
    pub input_root: PathBuf,

    /// Directory receiving one CSV report per format.
    #[serde(rename = "output")]
    pub output_root: PathBuf,

    /// Font path stems, extended with the format's extension per run.
    #[serde(rename = "fonts")]
    pub font_paths: Vec<String>,
}

impl Default for FontprofConfig {
    fn default() -> Self {
        FontprofConfig {
            target_url: DEFAULT_TARGET_URL.to_string(),
            input_root: PathBuf::from("input"),
            output_root: PathBuf::from("output"),
            font_paths: DEFAULT_FONT_PATHS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl FontprofConfig {
    /// Load configuration with the following precedence (later wins):
    /// 1. Built-in defaults
    /// 2. `fontprof.toml` in the working directory, if present
    /// 3. Environment variables (`FONTPROF_*`)
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("url", defaults.target_url)?
            .set_default("input", defaults.input_root.to_string_lossy().to_string())?
            .set_default("output", defaults.output_root.to_string_lossy().to_string())?
            .set_default("fonts", defaults.font_paths)?;

        let config_path = PathBuf::from("fontprof.toml");
        if config_path.exists() {
            builder = builder.add_source(File::from(config_path));
        }

        builder = builder.add_source(Environment::with_prefix("FONTPROF"));

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.target_url.is_empty() {
            return Err(ConfigError::Message("url cannot be empty".into()));
        }
        if self.font_paths.len() != 3 {
            return Err(ConfigError::Message(
                "fonts must list exactly three path stems; the report columns are fixed".into(),
            ));
        }
        Ok(())
    }

    /// Capture directory for one format.
    pub fn input_dir(&self, format: FontFormat) -> PathBuf {
        self.input_root.join(format.dir_name())
    }

    /// Report file for one format.
    pub fn output_file(&self, format: FontFormat) -> PathBuf {
        self.output_root.join(format!("{format}.csv"))
    }

    /// The three font resource URIs for one format, in column order.
    pub fn font_uris(&self, format: FontFormat) -> Vec<String> {
        let base = self.target_url.trim_end_matches('/');
        let ext = format.extension();
        self.font_paths
            .iter()
            .map(|stem| format!("{base}/{stem}.{ext}"))
            .collect()
    }
}
