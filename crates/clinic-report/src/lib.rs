//! # clinic-report
//!
//! Monthly productivity and attendance reports for clinic employees.
//!
//! The pipeline is strictly linear:
//!
//! 1. [`aggregator`] fetches the month's productivity from a [`ProductivitySource`]
//!    and summarizes attendance
//! 2. [`metrics`] derives rates, per-hour figures, the performance tier and the
//!    specialty distribution
//! 3. [`builder`] lays out the `Dashboard`, `Detalle de Citas` and `Estadísticas`
//!    sheets as an unstyled [`ReportDocument`](clinic_report_core::ReportDocument)
//! 4. [`resolver`] returns a styled copy of that document
//! 5. [`clinic_report_xlsx::XlsxWriter`] renders it and a [`FileSaver`] stores it
//!
//! [`ReportGenerator`] runs all of it for one [`ReportRequest`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use clinic_report::{ReportConfig, ReportGenerator, ReportRequest};
//!
//! # async fn example(request: ReportRequest) -> Result<(), Box<dyn std::error::Error>> {
//! let generator = ReportGenerator::from_config(ReportConfig::from_env())?;
//! let filename = generator.generate(&request).await?;
//! println!("wrote {filename}");
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod builder;
pub mod config;
pub mod delivery;
pub mod error;
pub mod generator;
pub mod metrics;
pub mod resolver;
pub mod source;

pub use aggregator::{aggregate, fold_shifts, summarize_attendance, AttendanceSummary, ReportData};
pub use builder::{build_document, ReportContext};
pub use config::ReportConfig;
pub use delivery::{report_filename, DirectorySaver, FileSaver, InMemorySaver};
pub use error::{ReportError, ReportResult, SourceError};
pub use generator::{ReportGenerator, ReportRequest};
pub use metrics::{
    attendance_rate, bar_width, classify, per_hour, specialty_distribution, Metrics,
    SpecialtyShare, MAX_BAR_WIDTH, TIER_TABLE,
};
pub use resolver::resolve_styles;
pub use source::{
    HttpProductivitySource, ProductivityPayload, ProductivitySource, StaticProductivitySource,
};
