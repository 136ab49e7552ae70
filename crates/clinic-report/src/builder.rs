//! Document model construction
//!
//! Builds the three report sheets as plain data: values, roles, merges and
//! layout. No styling happens here; see [`crate::resolver`].

use chrono::NaiveDate;
use clinic_report_core::record::PLACEHOLDER;
use clinic_report_core::{
    AppointmentDetail, Cell, CellRange, CellRole, Color, Employee, ReportDocument, Row, RowKind,
    Span, ValueFormat, Worksheet,
};

use crate::aggregator::{AttendanceSummary, ReportData};
use crate::metrics::Metrics;

pub const DASHBOARD_SHEET: &str = "Dashboard";
pub const DETAIL_SHEET: &str = "Detalle de Citas";
pub const STATISTICS_SHEET: &str = "Estadísticas";

pub const DASHBOARD_TAB: Color = Color::hex(0x1F4E78);
pub const DETAIL_TAB: Color = Color::hex(0x2E75B6);
pub const STATISTICS_TAB: Color = Color::hex(0x548235);

pub const KPI_HOURS: &str = "HORAS TRABAJADAS";
pub const KPI_PATIENTS: &str = "PACIENTES ATENDIDOS";
pub const KPI_REVENUE: &str = "INGRESOS GENERADOS";

/// Caption of the detail totals row
pub const TOTALS_LABEL: &str = "TOTALES";

/// Shown in metric rows that carry no tier badge
const NO_BADGE: &str = "-";

const BANNER_HEIGHT: f64 = 32.0;
const KPI_LABEL_HEIGHT: f64 = 22.0;
const KPI_VALUE_HEIGHT: f64 = 34.0;
const HEADER_HEIGHT: f64 = 20.0;
const NOTE_HEIGHT: f64 = 72.0;

const DASHBOARD_WIDTHS: [f64; 9] = [26.0, 14.0, 14.0, 18.0, 14.0, 6.0, 18.0, 16.0, 12.0];
const DETAIL_WIDTHS: [f64; 6] = [12.0, 8.0, 28.0, 20.0, 14.0, 14.0];
const STATISTICS_WIDTHS: [f64; 2] = [36.0, 22.0];

const MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

/// Spanish name of a 1-based month
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(i as usize))
        .copied()
        .unwrap_or(PLACEHOLDER)
}

/// Everything the builder reads
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub employee: &'a Employee,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub data: &'a ReportData,
    pub attendance: &'a AttendanceSummary,
    pub metrics: &'a Metrics,
    pub max_bar_width: u32,
}

impl ReportContext<'_> {
    fn month_label(&self) -> String {
        format!(
            "{} {}",
            month_name(self.data.period.month),
            self.data.period.year
        )
    }
}

/// Build the unstyled report: Dashboard, Detalle de Citas, Estadísticas
pub fn build_document(ctx: &ReportContext<'_>) -> ReportDocument {
    ReportDocument::new(vec![
        build_dashboard(ctx),
        build_detail(ctx),
        build_statistics(ctx),
    ])
}

fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn text_or_placeholder(s: &str) -> &str {
    if s.trim().is_empty() {
        PLACEHOLDER
    } else {
        s
    }
}

/// Place `cell` at `col` merged across `cols` columns
///
/// The covered cells carry the anchor's role so borders and fills reach
/// across the whole merged region.
fn with_merged(row: Row, col: u16, cell: Cell, cols: u16) -> Row {
    let role = cell.role.clone();
    let row = row.with_cell_at(col, cell.merged(Span::cols(cols)));
    (1..cols).fold(row, |row, i| {
        row.with_cell_at(col + i, Cell::styled_blank(role.clone()))
    })
}

fn banner_row(text: String, cols: u16) -> Row {
    let row = Row::new(RowKind::Banner).with_height(BANNER_HEIGHT);
    with_merged(row, 0, Cell::text(text, CellRole::Banner), cols)
}

fn subtitle_row(text: String, cols: u16) -> Row {
    with_merged(
        Row::new(RowKind::Subtitle),
        0,
        Cell::text(text, CellRole::Subtitle),
        cols,
    )
}

fn section_row(title: &str, cols: u16) -> Row {
    with_merged(
        Row::new(RowKind::SectionTitle),
        0,
        Cell::text(title, CellRole::SectionTitle),
        cols,
    )
}

fn header_row(titles: &[&str]) -> Row {
    titles.iter().fold(
        Row::new(RowKind::Header).with_height(HEADER_HEIGHT),
        |row, title| row.with_cell(Cell::text(*title, CellRole::Header)),
    )
}

fn value(v: f64, format: ValueFormat) -> Cell {
    Cell::number(v, CellRole::Value(format))
}

fn label(text: &str) -> Cell {
    Cell::text(text, CellRole::Label)
}

fn build_dashboard(ctx: &ReportContext<'_>) -> Worksheet {
    let bar_cells = ctx.max_bar_width.min(u16::MAX as u32 - 2) as u16;
    let mut sheet = Worksheet::new(DASHBOARD_SHEET)
        .with_tab_color(DASHBOARD_TAB)
        .with_column_widths(&DASHBOARD_WIDTHS);
    let full_width = (DASHBOARD_WIDTHS.len() as u16).max(bar_cells + 2);
    let period = &ctx.data.period;
    let metrics = ctx.metrics;

    sheet.push_row(banner_row(
        "REPORTE DE PRODUCTIVIDAD Y ASISTENCIA".to_string(),
        full_width,
    ));
    sheet.push_row(subtitle_row(
        format!("{} - {}", ctx.employee.full_name(), ctx.month_label()),
        full_width,
    ));
    sheet.push_row(subtitle_row(
        format!(
            "Período: {} al {}",
            format_date(ctx.period_start),
            format_date(ctx.period_end)
        ),
        full_width,
    ));
    sheet.push_row(Row::spacer());

    // KPI cards: label over value, two columns wide, at A, D and G
    let cards = [
        (KPI_HOURS, ctx.attendance.total_hours, ValueFormat::Hours),
        (KPI_PATIENTS, period.completed as f64, ValueFormat::Integer),
        (KPI_REVENUE, period.revenue, ValueFormat::Currency),
    ];
    let mut labels = Row::new(RowKind::Kpi).with_height(KPI_LABEL_HEIGHT);
    let mut values = Row::new(RowKind::Kpi).with_height(KPI_VALUE_HEIGHT);
    for (i, (caption, figure, format)) in cards.into_iter().enumerate() {
        let col = i as u16 * 3;
        labels = with_merged(labels, col, Cell::text(caption, CellRole::KpiLabel), 2);
        values = with_merged(
            values,
            col,
            Cell::number(figure, CellRole::KpiValue(format)),
            2,
        );
    }
    sheet.push_row(labels);
    sheet.push_row(values);
    sheet.push_row(Row::spacer());

    sheet.push_row(section_row("MÉTRICAS DE RENDIMIENTO", 3));
    sheet.push_row(header_row(&["Métrica", "Valor", "Estado"]));
    let badge = Cell::text(metrics.tier.label(), CellRole::TierBadge(metrics.tier));
    let metric_rows = [
        (
            "Tasa de Asistencia",
            value(metrics.attendance_rate / 100.0, ValueFormat::Percent),
            badge,
        ),
        (
            "Pacientes por Hora",
            value(metrics.patients_per_hour, ValueFormat::Rate),
            Cell::text(NO_BADGE, CellRole::Placeholder),
        ),
        (
            "Ingresos por Hora",
            value(metrics.revenue_per_hour, ValueFormat::Currency),
            Cell::text(NO_BADGE, CellRole::Placeholder),
        ),
        (
            "Citas Programadas",
            value(period.scheduled as f64, ValueFormat::Integer),
            Cell::text(NO_BADGE, CellRole::Placeholder),
        ),
        (
            "Citas Atendidas",
            value(period.completed as f64, ValueFormat::Integer),
            Cell::text(NO_BADGE, CellRole::Placeholder),
        ),
    ];
    for (index, (caption, figure, status)) in metric_rows.into_iter().enumerate() {
        sheet.push_row(
            Row::new(RowKind::Data { index })
                .with_cell(label(caption))
                .with_cell(figure)
                .with_cell(status),
        );
    }
    sheet.push_row(Row::spacer());

    sheet.push_row(section_row("DISTRIBUCIÓN POR ESPECIALIDAD", 3));
    sheet.push_row(header_row(&["Especialidad", "Citas", "Porcentaje"]));
    if metrics.specialties.is_empty() {
        sheet.push_row(
            Row::new(RowKind::Data { index: 0 })
                .with_cell(label(PLACEHOLDER))
                .with_cell(value(0.0, ValueFormat::Integer))
                .with_cell(value(0.0, ValueFormat::Percent)),
        );
    }
    for (index, share) in metrics.specialties.iter().enumerate() {
        sheet.push_row(
            Row::new(RowKind::Data { index })
                .with_cell(label(text_or_placeholder(&share.name)))
                .with_cell(value(share.count as f64, ValueFormat::Integer))
                .with_cell(value(share.percentage, ValueFormat::Percent)),
        );
    }
    sheet.push_row(Row::spacer());

    sheet.push_row(section_row("VISUALIZACIÓN", bar_cells + 2));
    if metrics.specialties.is_empty() {
        sheet.push_row(bar_row(PLACEHOLDER, 0, 0.0, bar_cells));
    }
    for share in &metrics.specialties {
        sheet.push_row(bar_row(
            text_or_placeholder(&share.name),
            share.bar_width,
            share.percentage,
            bar_cells,
        ));
    }

    sheet
}

/// Name, `cells` bar segments (the first `filled` colored), then the percentage
fn bar_row(name: &str, filled: u32, percentage: f64, cells: u16) -> Row {
    let row = Row::new(RowKind::Bar).with_cell(label(name));
    let row = (0..cells).fold(row, |row, i| {
        row.with_cell(Cell::styled_blank(CellRole::BarSegment {
            filled: (i as u32) < filled,
        }))
    });
    row.with_cell(value(percentage, ValueFormat::Percent))
}

fn appointment_row(index: usize, appointment: &AppointmentDetail) -> Row {
    let (date, time) = match appointment.timestamp {
        Some(ts) => (
            format_date(ts.date()),
            ts.format("%H:%M").to_string(),
        ),
        None => (PLACEHOLDER.to_string(), PLACEHOLDER.to_string()),
    };
    Row::new(RowKind::Data { index })
        .with_cell(Cell::text(date, CellRole::Value(ValueFormat::Text)))
        .with_cell(Cell::text(time, CellRole::Value(ValueFormat::Text)))
        .with_cell(label(text_or_placeholder(&appointment.patient)))
        .with_cell(label(text_or_placeholder(&appointment.specialty)))
        .with_cell(Cell::text(
            appointment.status.label(),
            CellRole::Status(appointment.status.clone()),
        ))
        .with_cell(value(
            if appointment.amount.is_finite() {
                appointment.amount
            } else {
                0.0
            },
            ValueFormat::Currency,
        ))
}

fn build_detail(ctx: &ReportContext<'_>) -> Worksheet {
    const HEADERS: [&str; 6] = ["Fecha", "Hora", "Paciente", "Especialidad", "Estado", "Monto"];

    let mut sheet = Worksheet::new(DETAIL_SHEET)
        .with_tab_color(DETAIL_TAB)
        .with_column_widths(&DETAIL_WIDTHS);
    let cols = HEADERS.len() as u16;

    sheet.push_row(banner_row(
        format!(
            "DETALLE DE CITAS - {} - {}",
            ctx.employee.full_name(),
            ctx.month_label()
        ),
        cols,
    ));
    let header = sheet.push_row(header_row(&HEADERS));

    let appointments = &ctx.data.appointments;
    let mut last_data = header;
    for (index, appointment) in appointments.iter().enumerate() {
        let rendered = appointment_row(index, appointment);
        last_data = sheet.push_row(rendered);
    }

    // totals read back the rendered rows so they always match them
    let (completed, amount) = sheet.rows()[(header + 1) as usize..]
        .iter()
        .fold((0u32, 0.0f64), |(completed, amount), row| {
            let done = matches!(row.cell(4).map(|c| &c.role), Some(CellRole::Status(s)) if s.is_completed());
            let monto = row.cell(5).and_then(|c| c.value.as_number()).unwrap_or(0.0);
            (completed + done as u32, amount + monto)
        });
    let totals = with_merged(
        Row::new(RowKind::Total),
        0,
        Cell::text(TOTALS_LABEL, CellRole::TotalLabel),
        4,
    );
    sheet.push_row(
        totals
            .with_cell(Cell::number(completed as f64, CellRole::Total(ValueFormat::Integer)))
            .with_cell(Cell::number(amount, CellRole::Total(ValueFormat::Currency))),
    );

    sheet.set_autofilter(CellRange::from_indices(header, 0, last_data, cols - 1));
    sheet.freeze_rows(header + 1);
    sheet
}

fn build_statistics(ctx: &ReportContext<'_>) -> Worksheet {
    let mut sheet = Worksheet::new(STATISTICS_SHEET)
        .with_tab_color(STATISTICS_TAB)
        .with_column_widths(&STATISTICS_WIDTHS);
    let cols = STATISTICS_WIDTHS.len() as u16;
    let attendance = ctx.attendance;
    let period = &ctx.data.period;

    sheet.push_row(banner_row(
        format!("ESTADÍSTICAS - {}", ctx.month_label().to_uppercase()),
        cols,
    ));
    sheet.push_row(Row::spacer());

    sheet.push_row(section_row("RESUMEN DE ASISTENCIA", cols));
    sheet.push_row(header_row(&["Concepto", "Valor"]));
    let best_day = match attendance.best_day {
        Some(day) => Cell::text(
            format!("{} ({:.1} h)", format_date(day.date), day.hours),
            CellRole::Value(ValueFormat::Text),
        ),
        None => Cell::text(PLACEHOLDER, CellRole::Value(ValueFormat::Text)),
    };
    let attendance_rows = [
        (
            "Días trabajados",
            value(attendance.days_worked as f64, ValueFormat::Integer),
        ),
        (
            "Horas totales",
            value(attendance.total_hours, ValueFormat::Hours),
        ),
        (
            "Promedio de horas por día",
            value(attendance.average_hours, ValueFormat::Hours),
        ),
        ("Día más productivo", best_day),
    ];
    for (index, (caption, figure)) in attendance_rows.into_iter().enumerate() {
        sheet.push_row(
            Row::new(RowKind::Data { index })
                .with_cell(label(caption))
                .with_cell(figure),
        );
    }
    sheet.push_row(Row::spacer());

    sheet.push_row(section_row("RESUMEN DE PRODUCTIVIDAD", cols));
    sheet.push_row(header_row(&["Concepto", "Valor"]));
    let productivity_rows = [
        (
            "Citas programadas",
            value(period.scheduled as f64, ValueFormat::Integer),
        ),
        (
            "Citas atendidas",
            value(period.completed as f64, ValueFormat::Integer),
        ),
        (
            "Tasa de asistencia",
            value(ctx.metrics.attendance_rate / 100.0, ValueFormat::Percent),
        ),
        (
            "Ingresos totales",
            value(period.revenue, ValueFormat::Currency),
        ),
        (
            "Ingreso promedio por cita atendida",
            value(ctx.metrics.average_ticket, ValueFormat::Currency),
        ),
    ];
    for (index, (caption, figure)) in productivity_rows.into_iter().enumerate() {
        sheet.push_row(
            Row::new(RowKind::Data { index })
                .with_cell(label(caption))
                .with_cell(figure),
        );
    }
    sheet.push_row(Row::spacer());

    let mut note = String::from(
        "Nota: solo las citas en estado \"Completada\" cuentan como atendidas para la tasa de \
         asistencia. Las citas confirmadas o en otro estado aparecen en el detalle pero no suman \
         como pacientes atendidos.",
    );
    if ctx.data.degraded {
        note.push_str(
            " Los datos de productividad no estuvieron disponibles al generar este reporte; \
             las cifras de citas e ingresos se muestran en cero.",
        );
    }
    sheet.push_row(with_merged(
        Row::new(RowKind::Note).with_height(NOTE_HEIGHT),
        0,
        Cell::text(note, CellRole::Note),
        cols,
    ));

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MAX_BAR_WIDTH;
    use clinic_report_core::{AppointmentStatus, ProductivityPeriod};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    struct Fixture {
        employee: Employee,
        data: ReportData,
        attendance: AttendanceSummary,
        metrics: Metrics,
    }

    impl Fixture {
        fn new(data: ReportData) -> Self {
            let attendance = AttendanceSummary {
                days_worked: 10,
                total_hours: 80.0,
                average_hours: 8.0,
                best_day: None,
            };
            let metrics = Metrics::compute(&data, attendance.total_hours, MAX_BAR_WIDTH);
            Self {
                employee: Employee::new(1, "Ana", "Pérez"),
                data,
                attendance,
                metrics,
            }
        }

        fn document(&self) -> ReportDocument {
            build_document(&ReportContext {
                employee: &self.employee,
                period_start: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
                period_end: NaiveDate::from_ymd_opt(2026, 10, 31).unwrap(),
                data: &self.data,
                attendance: &self.attendance,
                metrics: &self.metrics,
                max_bar_width: MAX_BAR_WIDTH,
            })
        }
    }

    fn appointment(hour: u32, status: AppointmentStatus, amount: f64) -> AppointmentDetail {
        AppointmentDetail {
            timestamp: NaiveDate::from_ymd_opt(2026, 10, 2)
                .unwrap()
                .and_hms_opt(hour, 0, 0),
            patient: "Juan Soto".into(),
            specialty: "Cardiología".into(),
            status,
            amount,
        }
    }

    fn ana() -> Fixture {
        Fixture::new(ReportData {
            period: ProductivityPeriod {
                scheduled: 10,
                completed: 8,
                revenue: 400000.0,
                specialties: BTreeMap::from([
                    ("Cardiología".to_string(), 5),
                    ("Pediatría".to_string(), 3),
                ]),
                ..ProductivityPeriod::zeroed(10, 2026)
            },
            appointments: vec![
                appointment(9, AppointmentStatus::Completed, 50000.0),
                appointment(10, AppointmentStatus::Confirmed, 40000.0),
                appointment(11, AppointmentStatus::Completed, 60000.0),
            ],
            degraded: false,
        })
    }

    fn number(sheet: &Worksheet, a1: &str) -> Option<f64> {
        sheet.cell(a1).unwrap().and_then(|c| c.value.as_number())
    }

    fn text<'a>(sheet: &'a Worksheet, a1: &str) -> Option<&'a str> {
        sheet.cell(a1).unwrap().and_then(|c| c.value.as_str())
    }

    #[test]
    fn test_sheet_names_and_order() {
        let document = ana().document();
        assert_eq!(
            document.sheet_names(),
            vec!["Dashboard", "Detalle de Citas", "Estadísticas"]
        );
        document.validate().unwrap();
    }

    #[test]
    fn test_kpi_cards() {
        let document = ana().document();
        let dashboard = document.worksheet_by_name(DASHBOARD_SHEET).unwrap();

        assert_eq!(text(dashboard, "A5"), Some(KPI_HOURS));
        assert_eq!(text(dashboard, "D5"), Some(KPI_PATIENTS));
        assert_eq!(text(dashboard, "G5"), Some(KPI_REVENUE));
        assert_eq!(number(dashboard, "A6"), Some(80.0));
        assert_eq!(number(dashboard, "D6"), Some(8.0));
        assert_eq!(number(dashboard, "G6"), Some(400000.0));

        let merges: Vec<String> = dashboard
            .merged_regions()
            .iter()
            .map(|r| r.to_string())
            .collect();
        for region in ["A5:B5", "D5:E5", "G5:H5", "A6:B6", "D6:E6", "G6:H6"] {
            assert!(merges.contains(&region.to_string()), "missing {region}");
        }
    }

    #[test]
    fn test_merged_regions_are_filled_with_role() {
        let document = ana().document();
        let dashboard = document.worksheet(0).unwrap();
        let detail = document.worksheet_by_name(DETAIL_SHEET).unwrap();
        let role = |sheet: &Worksheet, a1: &str| sheet.cell(a1).unwrap().unwrap().role.clone();

        assert_eq!(role(dashboard, "I1"), CellRole::Banner);
        assert_eq!(role(dashboard, "B5"), CellRole::KpiLabel);
        assert_eq!(role(dashboard, "E6"), CellRole::KpiValue(ValueFormat::Integer));
        assert_eq!(role(dashboard, "C8"), CellRole::SectionTitle);
        for a1 in ["B6", "C6", "D6"] {
            assert_eq!(role(detail, a1), CellRole::TotalLabel, "{a1}");
        }
        assert_eq!(text(detail, "B6"), None);

        let styled = crate::resolver::resolve_styles(&document);
        let detail = styled.worksheet_by_name(DETAIL_SHEET).unwrap();
        let anchor = &detail.cell("A6").unwrap().unwrap().style;
        let covered = &detail.cell("D6").unwrap().unwrap().style;
        assert!(covered.border.bottom.is_some());
        assert_eq!(covered.border, anchor.border);
        assert_eq!(covered.fill, anchor.fill);

        document.validate().unwrap();
    }

    #[test]
    fn test_metrics_table_badge_only_on_rate() {
        let document = ana().document();
        let dashboard = document.worksheet(0).unwrap();

        assert_eq!(text(dashboard, "A10"), Some("Tasa de Asistencia"));
        assert_eq!(number(dashboard, "B10"), Some(0.8));
        let badge = dashboard.cell("C10").unwrap().unwrap();
        assert_eq!(badge.value.as_str(), Some("BUENO"));
        assert!(matches!(badge.role, CellRole::TierBadge(_)));
        for a1 in ["C11", "C12", "C13", "C14"] {
            assert_eq!(text(dashboard, a1), Some("-"));
        }
    }

    #[test]
    fn test_bars() {
        let document = ana().document();
        let dashboard = document.worksheet(0).unwrap();
        let bars: Vec<&Row> = dashboard
            .rows()
            .iter()
            .filter(|r| r.kind == RowKind::Bar)
            .collect();

        assert_eq!(bars.len(), 2);
        let filled = |row: &Row| {
            row.cells
                .iter()
                .filter(|c| c.role == CellRole::BarSegment { filled: true })
                .count()
        };
        // 5/10 and 3/10 of five cells
        assert_eq!(filled(bars[0]), 3);
        assert_eq!(filled(bars[1]), 2);
        assert_eq!(bars[0].cells.len(), 2 + MAX_BAR_WIDTH as usize);
        assert_eq!(bars[0].cells.last().unwrap().value.as_number(), Some(0.5));
    }

    #[test]
    fn test_empty_specialties_placeholder() {
        let fixture = Fixture::new(ReportData::degraded(10, 2026));
        let document = fixture.document();
        let dashboard = document.worksheet(0).unwrap();

        let placeholder_rows = dashboard
            .rows()
            .iter()
            .filter(|r| r.cell(0).and_then(|c| c.value.as_str()) == Some(PLACEHOLDER))
            .count();
        assert_eq!(placeholder_rows, 2);
        assert_eq!(text(dashboard, "C10"), Some("BAJO"));
    }

    #[test]
    fn test_detail_totals_and_filter() {
        let document = ana().document();
        let detail = document.worksheet_by_name(DETAIL_SHEET).unwrap();

        assert_eq!(text(detail, "A2"), Some("Fecha"));
        assert_eq!(text(detail, "A3"), Some("02/10/2026"));
        assert_eq!(text(detail, "B3"), Some("09:00"));
        assert_eq!(text(detail, "E4"), Some("Confirmada"));

        assert_eq!(text(detail, "A6"), Some(TOTALS_LABEL));
        assert_eq!(number(detail, "E6"), Some(2.0));
        assert_eq!(number(detail, "F6"), Some(150000.0));

        assert_eq!(detail.autofilter().unwrap().to_string(), "A2:F5");
        assert_eq!(detail.frozen_rows(), 2);
    }

    #[test]
    fn test_detail_without_appointments() {
        let fixture = Fixture::new(ReportData::degraded(10, 2026));
        let document = fixture.document();
        let detail = document.worksheet(1).unwrap();

        assert_eq!(detail.autofilter().unwrap().to_string(), "A2:F2");
        assert_eq!(number(detail, "E3"), Some(0.0));
        assert_eq!(number(detail, "F3"), Some(0.0));
    }

    #[test]
    fn test_statistics() {
        let document = ana().document();
        let stats = document.worksheet_by_name(STATISTICS_SHEET).unwrap();

        assert_eq!(text(stats, "A1"), Some("ESTADÍSTICAS - OCTUBRE 2026"));
        assert_eq!(number(stats, "B5"), Some(10.0));
        assert_eq!(number(stats, "B7"), Some(8.0));
        assert_eq!(text(stats, "B8"), Some(PLACEHOLDER));
        assert_eq!(number(stats, "B14"), Some(0.8));
        assert_eq!(number(stats, "B16"), Some(50000.0));

        let note = stats.rows().last().unwrap();
        assert_eq!(note.kind, RowKind::Note);
        assert_eq!(note.cells[0].span, Some(Span::cols(2)));
    }

    #[test]
    fn test_month_name() {
        assert_eq!(month_name(1), "Enero");
        assert_eq!(month_name(12), "Diciembre");
        assert_eq!(month_name(0), PLACEHOLDER);
        assert_eq!(month_name(13), PLACEHOLDER);
    }
}
