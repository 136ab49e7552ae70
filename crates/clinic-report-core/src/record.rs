//! Domain records consumed by the report pipeline
//!
//! These are the caller-supplied and API-supplied inputs of a report, plus the two
//! classifications ([`AppointmentStatus`], [`PerformanceTier`]) that drive styling.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Placeholder shown for missing text values
pub const PLACEHOLDER: &str = "N/A";

/// An employee the report is generated for
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Employee {
    pub id: u64,
    #[cfg_attr(feature = "serde", serde(rename = "nombre", default))]
    pub first_name: String,
    #[cfg_attr(feature = "serde", serde(rename = "apellido", default))]
    pub last_name: String,
}

impl Employee {
    pub fn new<S: Into<String>>(id: u64, first_name: S, last_name: S) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// "First Last" with blank parts skipped; `N/A` when both are blank
    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|p| !p.is_empty())
            .collect();
        if parts.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Hours worked on one calendar day
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttendanceRecord {
    #[cfg_attr(feature = "serde", serde(rename = "fecha"))]
    pub date: NaiveDate,
    #[cfg_attr(feature = "serde", serde(rename = "horas_trabajadas", default))]
    pub hours: f64,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate, hours: f64) -> Self {
        Self { date, hours }
    }
}

/// A clock-in/clock-out interval ("turno")
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Shift {
    #[cfg_attr(feature = "serde", serde(rename = "hora_entrada"))]
    pub start: NaiveDateTime,
    #[cfg_attr(feature = "serde", serde(rename = "hora_salida"))]
    pub end: NaiveDateTime,
}

impl Shift {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The calendar day the shift is booked on (its start date)
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Length of the shift in hours; inverted intervals count as zero
    pub fn hours(&self) -> f64 {
        let seconds = (self.end - self.start).num_seconds();
        if seconds <= 0 {
            0.0
        } else {
            seconds as f64 / 3600.0
        }
    }
}

/// Attendance aggregates precomputed by the caller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttendanceStats {
    #[cfg_attr(feature = "serde", serde(rename = "totalHoras", default))]
    pub total_hours: f64,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "diasTrabajados", default, skip_serializing_if = "Option::is_none")
    )]
    pub days_worked: Option<u32>,
}

/// Monthly appointment and revenue aggregate for one employee
#[derive(Debug, Clone, PartialEq)]
pub struct ProductivityPeriod {
    pub month: u32,
    pub year: i32,
    pub scheduled: u32,
    pub completed: u32,
    pub revenue: f64,
    /// Specialty name -> completed appointments
    pub specialties: BTreeMap<String, u32>,
}

impl ProductivityPeriod {
    /// The all-zero period used when upstream data is unavailable
    pub fn zeroed(month: u32, year: i32) -> Self {
        Self {
            month,
            year,
            scheduled: 0,
            completed: 0,
            revenue: 0.0,
            specialties: BTreeMap::new(),
        }
    }

    /// The month containing `date`
    pub fn month_of(date: NaiveDate) -> (u32, i32) {
        (date.month(), date.year())
    }
}

/// Status of a single appointment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppointmentStatus {
    Completed,
    Confirmed,
    /// Any other upstream status, keeping its raw label
    Other(String),
}

impl AppointmentStatus {
    /// Classify an upstream status string (case-insensitive, Spanish or English)
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "completada" | "completado" | "completed" | "atendida" => AppointmentStatus::Completed,
            "confirmada" | "confirmado" | "confirmed" => AppointmentStatus::Confirmed,
            _ => AppointmentStatus::Other(label.trim().to_string()),
        }
    }

    /// Display label for the status column
    pub fn label(&self) -> &str {
        match self {
            AppointmentStatus::Completed => "Completada",
            AppointmentStatus::Confirmed => "Confirmada",
            AppointmentStatus::Other(raw) if raw.is_empty() => PLACEHOLDER,
            AppointmentStatus::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, AppointmentStatus::Completed)
    }
}

/// One appointment in the reporting period
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentDetail {
    /// `None` when the upstream timestamp could not be read
    pub timestamp: Option<NaiveDateTime>,
    pub patient: String,
    pub specialty: String,
    pub status: AppointmentStatus,
    pub amount: f64,
}

/// Performance classification derived from the attendance rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PerformanceTier {
    Excellent,
    Good,
    Regular,
    Low,
}

impl PerformanceTier {
    /// Badge text shown on the dashboard
    pub fn label(&self) -> &'static str {
        match self {
            PerformanceTier::Excellent => "EXCELENTE",
            PerformanceTier::Good => "BUENO",
            PerformanceTier::Regular => "REGULAR",
            PerformanceTier::Low => "BAJO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_employee_names() {
        let ana = Employee::new(7, "Ana", "Pérez");
        assert_eq!(ana.full_name(), "Ana Pérez");

        let no_surname = Employee::new(8, "Luis", "  ");
        assert_eq!(no_surname.full_name(), "Luis");

        let nameless = Employee::new(9, "", "");
        assert_eq!(nameless.full_name(), PLACEHOLDER);
    }

    #[test]
    fn test_shift_hours() {
        assert_eq!(Shift::new(at(3, 8, 0), at(3, 16, 30)).hours(), 8.5);
        assert_eq!(Shift::new(at(3, 16, 0), at(3, 8, 0)).hours(), 0.0);
        assert_eq!(
            Shift::new(at(3, 8, 0), at(3, 9, 0)).date(),
            NaiveDate::from_ymd_opt(2026, 10, 3).unwrap()
        );
    }

    #[test]
    fn test_status_from_label() {
        assert_eq!(
            AppointmentStatus::from_label("Completada"),
            AppointmentStatus::Completed
        );
        assert_eq!(
            AppointmentStatus::from_label(" CONFIRMED "),
            AppointmentStatus::Confirmed
        );
        let cancelled = AppointmentStatus::from_label("cancelada");
        assert_eq!(cancelled, AppointmentStatus::Other("cancelada".into()));
        assert_eq!(cancelled.label(), "cancelada");
        assert_eq!(AppointmentStatus::from_label("").label(), PLACEHOLDER);
    }

    #[test]
    fn test_zeroed_period() {
        let period = ProductivityPeriod::zeroed(10, 2026);
        assert_eq!(period.scheduled, 0);
        assert_eq!(period.completed, 0);
        assert_eq!(period.revenue, 0.0);
        assert!(period.specialties.is_empty());
        assert_eq!(
            ProductivityPeriod::month_of(NaiveDate::from_ymd_opt(2026, 2, 14).unwrap()),
            (2, 2026)
        );
    }
}
