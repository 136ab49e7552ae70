//! Productivity data sources
//!
//! A [`ProductivitySource`] answers "how did employee N do in month M?" with a
//! [`ProductivityPayload`]: the period totals plus the individual appointments.
//! [`HttpProductivitySource`] talks to the clinic REST API; [`StaticProductivitySource`]
//! serves a fixed answer and is what tests and offline hosts use.

use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use clinic_report_core::{AppointmentDetail, AppointmentStatus, ProductivityPeriod};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::SourceError;

/// Anything that can supply one employee's productivity for one month
pub trait ProductivitySource {
    fn fetch(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> impl Future<Output = Result<ProductivityPayload, SourceError>> + Send;
}

/// Productivity payload as returned by the API
///
/// Every field is optional on the wire. Numbers may arrive as JSON numbers or
/// numeric strings; anything else reads as zero.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductivityPayload {
    #[serde(rename = "total_citas", deserialize_with = "lenient_count")]
    pub scheduled: u32,
    #[serde(rename = "citas_completadas", deserialize_with = "lenient_count")]
    pub completed: u32,
    #[serde(rename = "total_ingresos", deserialize_with = "lenient_amount")]
    pub revenue: f64,
    #[serde(rename = "especialidades", deserialize_with = "lenient_counts")]
    pub specialties: BTreeMap<String, u32>,
    #[serde(rename = "citas")]
    pub appointments: Vec<AppointmentPayload>,
}

/// One appointment as returned by the API
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppointmentPayload {
    #[serde(rename = "fecha")]
    pub timestamp: String,
    #[serde(rename = "paciente")]
    pub patient: String,
    #[serde(rename = "especialidad")]
    pub specialty: String,
    #[serde(rename = "estado")]
    pub status: String,
    #[serde(rename = "monto", deserialize_with = "lenient_amount")]
    pub amount: f64,
}

impl ProductivityPayload {
    /// Parse a JSON response body
    pub fn from_json(body: &str) -> Result<Self, SourceError> {
        serde_json::from_str(body).map_err(|e| SourceError::Malformed(e.to_string()))
    }

    /// Split into the period aggregate and the appointment list
    pub fn into_parts(
        self,
        month: u32,
        year: i32,
    ) -> (ProductivityPeriod, Vec<AppointmentDetail>) {
        let period = ProductivityPeriod {
            month,
            year,
            scheduled: self.scheduled,
            completed: self.completed,
            revenue: self.revenue,
            specialties: self.specialties,
        };
        let appointments = self
            .appointments
            .into_iter()
            .map(AppointmentPayload::into_detail)
            .collect();
        (period, appointments)
    }
}

impl AppointmentPayload {
    pub fn into_detail(self) -> AppointmentDetail {
        AppointmentDetail {
            timestamp: parse_timestamp(&self.timestamp),
            patient: self.patient.trim().to_string(),
            specialty: self.specialty.trim().to_string(),
            status: AppointmentStatus::from_label(&self.status),
            amount: self.amount,
        }
    }
}

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Read an API timestamp; offsets are dropped and bare dates read as midnight
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn count_from_value(value: &Value) -> u32 {
    number_from_value(value)
        .filter(|n| *n > 0.0)
        .map(|n| n.round().min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

fn lenient_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(number_from_value).unwrap_or(0.0))
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(count_from_value).unwrap_or(0))
}

fn lenient_counts<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, u32>, D::Error> {
    let value = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(value
        .unwrap_or_default()
        .into_iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .map(|(name, count)| (name.trim().to_string(), count_from_value(&count)))
        .collect())
}

/// Productivity source backed by the clinic REST API
#[derive(Debug, Clone)]
pub struct HttpProductivitySource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpProductivitySource {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for one employee's productivity
    pub fn endpoint(&self, employee_id: u64) -> String {
        format!("{}/empleados/{employee_id}/productividad", self.base_url)
    }
}

impl ProductivitySource for HttpProductivitySource {
    async fn fetch(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> Result<ProductivityPayload, SourceError> {
        let url = self.endpoint(employee_id);
        tracing::debug!("GET {url} mes={month} anio={year}");

        let response = self
            .client
            .get(&url)
            .query(&[("mes", month.to_string()), ("anio", year.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        ProductivityPayload::from_json(&body)
    }
}

/// Source that always answers with the same payload, or always fails
#[derive(Debug, Clone, Default)]
pub struct StaticProductivitySource {
    payload: Option<ProductivityPayload>,
}

impl StaticProductivitySource {
    pub fn new(payload: ProductivityPayload) -> Self {
        Self {
            payload: Some(payload),
        }
    }

    /// A source whose every fetch fails with a 503
    pub fn unavailable() -> Self {
        Self { payload: None }
    }
}

impl ProductivitySource for StaticProductivitySource {
    async fn fetch(
        &self,
        _employee_id: u64,
        _month: u32,
        _year: i32,
    ) -> Result<ProductivityPayload, SourceError> {
        self.payload.clone().ok_or(SourceError::Status(503))
    }
}
