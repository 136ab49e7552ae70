//! Report generation entry point

use chrono::NaiveDate;
use clinic_report_core::{AttendanceRecord, AttendanceStats, Employee, ProductivityPeriod, Shift};
use clinic_report_xlsx::XlsxWriter;
use serde::Deserialize;

use crate::aggregator::{aggregate, fold_shifts, summarize_attendance};
use crate::builder::{build_document, ReportContext};
use crate::config::ReportConfig;
use crate::delivery::{report_filename, DirectorySaver, FileSaver};
use crate::error::{ReportError, ReportResult, SourceError};
use crate::metrics::Metrics;
use crate::resolver::resolve_styles;
use crate::source::{HttpProductivitySource, ProductivitySource};

/// One report request
///
/// The reporting month is the month of `period_start`. Attendance comes from
/// `asistencias`, or from `turnos` folded per day when no records are given.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReportRequest {
    #[serde(rename = "empleado")]
    pub employee: Employee,
    #[serde(rename = "asistencias", default)]
    pub attendance: Vec<AttendanceRecord>,
    #[serde(rename = "turnos", default)]
    pub shifts: Vec<Shift>,
    #[serde(rename = "fechaInicio")]
    pub period_start: NaiveDate,
    #[serde(rename = "fechaFin")]
    pub period_end: NaiveDate,
    #[serde(rename = "estadisticas", default)]
    pub stats: Option<AttendanceStats>,
}

impl ReportRequest {
    /// Month and year the report covers
    pub fn month(&self) -> (u32, i32) {
        ProductivityPeriod::month_of(self.period_start)
    }

    /// Daily attendance records, folding shifts when no records were given
    pub fn attendance_records(&self) -> Vec<AttendanceRecord> {
        if self.attendance.is_empty() {
            fold_shifts(&self.shifts)
        } else {
            self.attendance.clone()
        }
    }

    /// Caller stats, or totals derived from `records` when none were sent
    pub fn attendance_stats(&self, records: &[AttendanceRecord]) -> AttendanceStats {
        self.stats.unwrap_or_else(|| AttendanceStats {
            total_hours: records
                .iter()
                .map(|r| r.hours)
                .filter(|h| h.is_finite())
                .sum(),
            days_worked: None,
        })
    }
}

/// Runs the whole pipeline: fetch, compute, build, style, render, save
#[derive(Debug)]
pub struct ReportGenerator<S, F> {
    source: S,
    saver: F,
    config: ReportConfig,
}

impl ReportGenerator<HttpProductivitySource, DirectorySaver> {
    /// Generator backed by the REST API, saving into `config.output_dir`
    pub fn from_config(config: ReportConfig) -> Result<Self, SourceError> {
        let source = HttpProductivitySource::new(&config.api_base_url, config.request_timeout())?;
        let saver = DirectorySaver::new(config.output_dir.clone());
        Ok(Self::new(source, saver, config))
    }
}

impl<S: ProductivitySource, F: FileSaver> ReportGenerator<S, F> {
    pub fn new(source: S, saver: F, config: ReportConfig) -> Self {
        Self {
            source,
            saver,
            config,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn saver(&self) -> &F {
        &self.saver
    }

    /// Generate and save a report, returning its file name
    ///
    /// An unavailable productivity source does not fail generation; the report
    /// is produced with zeroed figures instead. Nothing is saved if rendering fails.
    pub async fn generate(&self, request: &ReportRequest) -> ReportResult<String> {
        let employee = &request.employee;
        let (month, year) = request.month();
        tracing::info!(
            "Generating report for employee {} ({month:02}/{year})",
            employee.id
        );

        let data = aggregate(&self.source, employee, month, year).await;
        let records = request.attendance_records();
        let attendance = summarize_attendance(&records, &request.attendance_stats(&records));
        let metrics = Metrics::compute(&data, attendance.total_hours, self.config.max_bar_width);
        tracing::debug!(
            "Metrics for employee {}: rate {:.1}% ({}), {:.2} patients/h",
            employee.id,
            metrics.attendance_rate,
            metrics.tier.label(),
            metrics.patients_per_hour
        );

        let document = build_document(&ReportContext {
            employee,
            period_start: request.period_start,
            period_end: request.period_end,
            data: &data,
            attendance: &attendance,
            metrics: &metrics,
            max_bar_width: self.config.max_bar_width,
        });
        let styled = resolve_styles(&document);
        let bytes = XlsxWriter::to_bytes(&styled)?;

        let filename = report_filename(employee, month, year, &self.config.file_extension);
        let path = self
            .saver
            .save(&filename, &bytes)
            .map_err(|source| ReportError::Save {
                filename: filename.clone(),
                source,
            })?;

        tracing::info!(
            "Report for employee {} saved to {} ({} bytes{})",
            employee.id,
            path.display(),
            bytes.len(),
            if data.degraded { ", productivity unavailable" } else { "" }
        );
        Ok(filename)
    }
}
