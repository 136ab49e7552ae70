//! Metric calculation
//!
//! Pure functions over aggregated data. The performance tier comes from a
//! single threshold table ([`TIER_TABLE`]) so thresholds live in one place.

use clinic_report_core::{Color, PerformanceTier, ProductivityPeriod};

use crate::aggregator::ReportData;

/// Default number of cells a 100% bar spans
pub const MAX_BAR_WIDTH: u32 = 5;

/// Minimum attendance rate (inclusive) for each tier, checked top-down
pub const TIER_TABLE: [(f64, PerformanceTier); 3] = [
    (90.0, PerformanceTier::Excellent),
    (75.0, PerformanceTier::Good),
    (60.0, PerformanceTier::Regular),
];

/// Classify an attendance rate (percent)
pub fn classify(rate: f64) -> PerformanceTier {
    TIER_TABLE
        .iter()
        .find(|(min, _)| rate >= *min)
        .map(|(_, tier)| *tier)
        .unwrap_or(PerformanceTier::Low)
}

/// Badge fill of a tier
pub fn tier_color(tier: PerformanceTier) -> Color {
    match tier {
        PerformanceTier::Excellent => Color::hex(0x00B050),
        PerformanceTier::Good => Color::hex(0x92D050),
        PerformanceTier::Regular => Color::hex(0xFFC000),
        PerformanceTier::Low => Color::hex(0xFF0000),
    }
}

/// Completed over scheduled, as a percentage in `[0, 100]`
pub fn attendance_rate(scheduled: u32, completed: u32) -> f64 {
    if scheduled == 0 {
        return 0.0;
    }
    (completed as f64 / scheduled as f64 * 100.0).clamp(0.0, 100.0)
}

/// `amount` per hour worked; zero when no hours were worked
pub fn per_hour(amount: f64, hours: f64) -> f64 {
    if hours.is_nan() || hours <= 0.0 || !amount.is_finite() {
        return 0.0;
    }
    amount / hours
}

/// Number of filled cells for a fraction in `[0, 1]`
pub fn bar_width(fraction: f64, max_width: u32) -> u32 {
    if fraction.is_nan() {
        return 0;
    }
    (fraction * max_width as f64).round().clamp(0.0, max_width as f64) as u32
}

/// One specialty's share of the month's appointments
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialtyShare {
    pub name: String,
    pub count: u32,
    /// Fraction in `[0, 1]`
    pub percentage: f64,
    pub bar_width: u32,
}

/// Specialty shares ordered by count (descending), then name
///
/// Shares are counts over scheduled appointments, all zero when nothing was
/// scheduled. When the listed counts exceed the scheduled total, their sum is
/// the denominator instead so the shares never add up to more than one.
pub fn specialty_distribution(period: &ProductivityPeriod, max_width: u32) -> Vec<SpecialtyShare> {
    let listed: u64 = period.specialties.values().map(|&c| c as u64).sum();
    let denominator = match period.scheduled {
        0 => 0,
        scheduled => listed.max(scheduled as u64),
    };

    let mut shares: Vec<SpecialtyShare> = period
        .specialties
        .iter()
        .map(|(name, &count)| {
            let percentage = if denominator == 0 {
                0.0
            } else {
                count as f64 / denominator as f64
            };
            SpecialtyShare {
                name: name.clone(),
                count,
                percentage,
                bar_width: bar_width(percentage, max_width),
            }
        })
        .collect();

    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    shares
}

/// Every derived figure shown in a report
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    /// Percent in `[0, 100]`
    pub attendance_rate: f64,
    pub patients_per_hour: f64,
    pub revenue_per_hour: f64,
    /// Revenue per completed appointment
    pub average_ticket: f64,
    pub tier: PerformanceTier,
    pub specialties: Vec<SpecialtyShare>,
}

impl Metrics {
    pub fn compute(data: &ReportData, total_hours: f64, max_width: u32) -> Self {
        let period = &data.period;
        let attendance_rate = attendance_rate(period.scheduled, period.completed);
        let average_ticket = if period.completed == 0 {
            0.0
        } else {
            period.revenue / period.completed as f64
        };

        Self {
            attendance_rate,
            patients_per_hour: per_hour(period.completed as f64, total_hours),
            revenue_per_hour: per_hour(period.revenue, total_hours),
            average_ticket,
            tier: classify(attendance_rate),
            specialties: specialty_distribution(period, max_width),
        }
    }
}
