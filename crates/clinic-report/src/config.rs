//! Generator configuration

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::metrics::MAX_BAR_WIDTH;

/// Environment variable overriding [`ReportConfig::api_base_url`]
pub const ENV_API_URL: &str = "CLINIC_REPORT_API_URL";
/// Environment variable overriding [`ReportConfig::request_timeout_secs`]
pub const ENV_TIMEOUT_SECS: &str = "CLINIC_REPORT_TIMEOUT_SECS";
/// Environment variable overriding [`ReportConfig::max_bar_width`]
pub const ENV_BAR_WIDTH: &str = "CLINIC_REPORT_BAR_WIDTH";
/// Environment variable overriding [`ReportConfig::output_dir`]
pub const ENV_OUTPUT_DIR: &str = "CLINIC_REPORT_OUTPUT_DIR";

/// Accepted values of [`ReportConfig::max_bar_width`] when read from the environment or JSON
pub const BAR_WIDTH_RANGE: RangeInclusive<u32> = 1..=50;

/// Settings shared by every report generated with one [`ReportGenerator`](crate::ReportGenerator)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Base URL of the clinic REST API
    pub api_base_url: String,
    /// Timeout for the productivity request
    pub request_timeout_secs: u64,
    /// Number of cells a full (100%) distribution bar spans
    pub max_bar_width: u32,
    /// Directory reports are saved into
    pub output_dir: PathBuf,
    /// File extension of the rendered report
    pub file_extension: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000/api".to_string(),
            request_timeout_secs: 10,
            max_bar_width: MAX_BAR_WIDTH,
            output_dir: PathBuf::from("."),
            file_extension: "xlsx".to_string(),
        }
    }
}

impl ReportConfig {
    /// Defaults overlaid with `CLINIC_REPORT_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; unparsable numbers are ignored
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            match raw.trim().parse() {
                Ok(secs) => config.request_timeout_secs = secs,
                Err(_) => tracing::warn!(key = ENV_TIMEOUT_SECS, value = %raw, "ignoring invalid setting"),
            }
        }
        if let Some(raw) = lookup(ENV_BAR_WIDTH) {
            match raw.trim().parse::<u32>() {
                Ok(width) if BAR_WIDTH_RANGE.contains(&width) => config.max_bar_width = width,
                _ => tracing::warn!(key = ENV_BAR_WIDTH, value = %raw, "ignoring invalid setting"),
            }
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
            config.output_dir = PathBuf::from(dir);
        }

        config
    }

    /// Parse a JSON configuration document; missing keys keep their defaults
    ///
    /// A bar width outside [`BAR_WIDTH_RANGE`] is ignored with a warning.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut config: Self = serde_json::from_str(json)?;
        if !BAR_WIDTH_RANGE.contains(&config.max_bar_width) {
            tracing::warn!(
                key = "max_bar_width",
                value = config.max_bar_width,
                "ignoring invalid setting"
            );
            config.max_bar_width = MAX_BAR_WIDTH;
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
