//! Data aggregation
//!
//! Collects everything a report needs before any metric is derived: the
//! month's productivity (fetched from a [`ProductivitySource`]) and the
//! attendance summary (computed from caller-supplied records).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clinic_report_core::{
    AppointmentDetail, AttendanceRecord, AttendanceStats, Employee, ProductivityPeriod, Shift,
};

use crate::source::ProductivitySource;

/// Productivity data for one report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportData {
    pub period: ProductivityPeriod,
    /// Appointments in API order
    pub appointments: Vec<AppointmentDetail>,
    /// Set when the source failed and zeroed defaults were substituted
    pub degraded: bool,
}

impl ReportData {
    /// The all-zero data used when the source is unavailable
    pub fn degraded(month: u32, year: i32) -> Self {
        Self {
            period: ProductivityPeriod::zeroed(month, year),
            appointments: Vec::new(),
            degraded: true,
        }
    }
}

/// Fetch one employee's productivity for a month
///
/// Never fails: a source error is logged and replaced by a zeroed period.
pub async fn aggregate<S: ProductivitySource>(
    source: &S,
    employee: &Employee,
    month: u32,
    year: i32,
) -> ReportData {
    match source.fetch(employee.id, month, year).await {
        Ok(payload) => {
            let (period, appointments) = payload.into_parts(month, year);
            tracing::debug!(
                "Fetched productivity for employee {}: {} scheduled, {} completed, {} appointments",
                employee.id,
                period.scheduled,
                period.completed,
                appointments.len()
            );
            ReportData {
                period,
                appointments,
                degraded: false,
            }
        }
        Err(e) => {
            tracing::warn!(
                "Productivity unavailable for employee {} ({month:02}/{year}), using zeroed data: {e}",
                employee.id
            );
            ReportData::degraded(month, year)
        }
    }
}

/// Fold shifts into one attendance record per calendar day
///
/// Shifts are booked on their start date; inverted intervals add nothing.
pub fn fold_shifts(shifts: &[Shift]) -> Vec<AttendanceRecord> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for shift in shifts {
        *by_day.entry(shift.date()).or_insert(0.0) += shift.hours();
    }
    by_day
        .into_iter()
        .map(|(date, hours)| AttendanceRecord::new(date, hours))
        .collect()
}

/// Attendance figures for the statistics sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttendanceSummary {
    pub days_worked: u32,
    pub total_hours: f64,
    pub average_hours: f64,
    /// Day with the most hours; the earliest wins ties
    pub best_day: Option<AttendanceRecord>,
}

/// Summarize attendance records against the caller's precomputed stats
///
/// `stats.total_hours` is authoritative; `stats.days_worked` falls back to the
/// number of distinct dates in `records`.
pub fn summarize_attendance(
    records: &[AttendanceRecord],
    stats: &AttendanceStats,
) -> AttendanceSummary {
    let days_worked = stats.days_worked.unwrap_or_else(|| {
        let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates.len() as u32
    });

    let total_hours = if stats.total_hours.is_finite() {
        stats.total_hours.max(0.0)
    } else {
        0.0
    };
    let average_hours = if days_worked == 0 {
        0.0
    } else {
        total_hours / days_worked as f64
    };

    let best_day = records
        .iter()
        .filter(|r| r.hours.is_finite())
        .fold(None::<AttendanceRecord>, |best, r| match best {
            Some(b) if b.hours > r.hours || (b.hours == r.hours && b.date <= r.date) => Some(b),
            _ => Some(*r),
        });

    AttendanceSummary {
        days_worked,
        total_hours,
        average_hours,
        best_day,
    }
}
