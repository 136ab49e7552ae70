//! Error types for report generation

use thiserror::Error;

/// Result type for report generation
pub type ReportResult<T> = std::result::Result<T, ReportError>;

/// Fatal report-generation failures
///
/// Upstream fetch failures never surface here; the aggregator recovers from them.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The styled document could not be rendered to XLSX bytes
    #[error("Report generation failed: {0}")]
    Render(#[from] clinic_report_xlsx::XlsxError),

    /// The rendered file could not be saved
    #[error("Failed to save report {filename}: {source}")]
    Save {
        filename: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by a productivity data source
#[derive(Debug, Error)]
pub enum SourceError {
    /// Transport-level HTTP error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("Productivity API returned status {0}")]
    Status(u16),

    /// The response body was not a productivity payload
    #[error("Malformed productivity payload: {0}")]
    Malformed(String),
}
