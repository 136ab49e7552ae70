//! Style resolution
//!
//! Turns the roles recorded by the builder into concrete [`Style`]s. Rules are
//! applied in a fixed order: role style, then row banding, then status fill,
//! so a status color always shows through the banding. Each sheet's tab color
//! is its accent color. Cells that already carry a style are left alone.

use clinic_report_core::{
    AppointmentStatus, BorderLineStyle, BorderStyle, CellRole, Color, HorizontalAlignment,
    ReportDocument, RowKind, Style, ValueFormat, VerticalAlignment,
};

use crate::metrics::tier_color;

/// Fill of even-indexed data rows
pub const BAND_FILL: Color = Color::hex(0xF2F2F2);
/// Fill of unfilled bar segments
pub const BAR_EMPTY_FILL: Color = Color::hex(0xE7E6E6);

const KPI_VALUE_FILL: Color = Color::hex(0xDDEBF7);
const TOTAL_FILL: Color = Color::hex(0xD9E1F2);
const MUTED_TEXT: Color = Color::hex(0x595959);
const GRID: Color = Color::hex(0xBFBFBF);

pub const CURRENCY_FORMAT: &str = "\"$\"#,##0";
pub const PERCENT_FORMAT: &str = "0.0%";
pub const HOURS_FORMAT: &str = "0.0";
pub const INTEGER_FORMAT: &str = "0";
pub const RATE_FORMAT: &str = "0.00";

/// Number format code of a value format (`None` = General)
pub fn number_format_code(format: ValueFormat) -> Option<&'static str> {
    match format {
        ValueFormat::Text => None,
        ValueFormat::Integer => Some(INTEGER_FORMAT),
        ValueFormat::Currency => Some(CURRENCY_FORMAT),
        ValueFormat::Percent => Some(PERCENT_FORMAT),
        ValueFormat::Hours => Some(HOURS_FORMAT),
        ValueFormat::Rate => Some(RATE_FORMAT),
    }
}

/// Fill of an appointment status cell
pub fn status_color(status: &AppointmentStatus) -> Color {
    match status {
        AppointmentStatus::Completed => Color::hex(0xC6EFCE),
        AppointmentStatus::Confirmed => Color::hex(0xFFEB9C),
        AppointmentStatus::Other(_) => Color::hex(0xFFC7CE),
    }
}

/// Return a styled copy of `document`
pub fn resolve_styles(document: &ReportDocument) -> ReportDocument {
    let mut styled = document.clone();
    for sheet in styled.worksheets_mut() {
        let accent = sheet.tab_color();
        for row in sheet.rows_mut() {
            let kind = row.kind;
            for cell in row.cells.iter_mut().filter(|c| c.style.is_default()) {
                cell.style = resolve_cell(&cell.role, kind, accent);
            }
        }
    }
    styled
}

fn resolve_cell(role: &CellRole, kind: RowKind, accent: Color) -> Style {
    let mut style = role_style(role, accent);

    if is_banded(kind) && is_table_body(role) {
        style = style.fill_color(BAND_FILL);
    }
    if let CellRole::Status(status) = role {
        style = style.fill_color(status_color(status));
    }

    style
}

fn is_banded(kind: RowKind) -> bool {
    matches!(kind, RowKind::Data { index } if index % 2 == 0)
}

fn is_table_body(role: &CellRole) -> bool {
    matches!(
        role,
        CellRole::Label | CellRole::Value(_) | CellRole::Placeholder | CellRole::Status(_)
    )
}

fn thin_grid() -> BorderStyle {
    BorderStyle::all(BorderLineStyle::Thin, GRID)
}

fn with_format(style: Style, format: ValueFormat) -> Style {
    match number_format_code(format) {
        Some(code) => style.number_format(code),
        None => style,
    }
}

fn centered(style: Style) -> Style {
    style
        .horizontal_alignment(HorizontalAlignment::Center)
        .vertical_alignment(VerticalAlignment::Center)
}

fn role_style(role: &CellRole, accent: Color) -> Style {
    match role {
        CellRole::Plain => Style::new(),
        CellRole::Banner => centered(
            Style::new()
                .bold(true)
                .font_size(16.0)
                .font_color(Color::WHITE)
                .fill_color(accent),
        ),
        CellRole::Subtitle => centered(Style::new().italic(true).font_color(MUTED_TEXT)),
        CellRole::SectionTitle => Style::new()
            .bold(true)
            .font_size(12.0)
            .font_color(accent)
            .border(BorderStyle::new().with_bottom(BorderLineStyle::Medium, accent)),
        CellRole::Header => centered(
            Style::new()
                .bold(true)
                .font_color(Color::WHITE)
                .fill_color(accent)
                .border(BorderStyle::all(BorderLineStyle::Medium, accent)),
        ),
        CellRole::KpiLabel => centered(
            Style::new()
                .bold(true)
                .font_size(10.0)
                .font_color(Color::WHITE)
                .fill_color(accent)
                .border(thin_grid()),
        ),
        CellRole::KpiValue(format) => with_format(
            centered(
                Style::new()
                    .bold(true)
                    .font_size(18.0)
                    .font_color(accent)
                    .fill_color(KPI_VALUE_FILL)
                    .border(thin_grid()),
            ),
            *format,
        ),
        CellRole::Label => Style::new().border(thin_grid()),
        CellRole::Value(ValueFormat::Text) => {
            Style::new().border(thin_grid()).horizontal_alignment(HorizontalAlignment::Center)
        }
        CellRole::Value(format) => with_format(
            Style::new()
                .border(thin_grid())
                .horizontal_alignment(HorizontalAlignment::Right),
            *format,
        ),
        CellRole::Placeholder => centered(Style::new().font_color(MUTED_TEXT).border(thin_grid())),
        CellRole::TierBadge(tier) => centered(
            Style::new()
                .bold(true)
                .font_color(Color::WHITE)
                .fill_color(tier_color(*tier))
                .border(thin_grid()),
        ),
        CellRole::Status(_) => centered(Style::new().border(thin_grid())),
        CellRole::BarSegment { filled: true } => Style::new().fill_color(accent),
        CellRole::BarSegment { filled: false } => Style::new().fill_color(BAR_EMPTY_FILL),
        CellRole::TotalLabel => Style::new()
            .bold(true)
            .fill_color(TOTAL_FILL)
            .border(thin_grid().with_bottom(BorderLineStyle::Medium, accent)),
        CellRole::Total(format) => with_format(
            Style::new()
                .bold(true)
                .fill_color(TOTAL_FILL)
                .border(thin_grid().with_bottom(BorderLineStyle::Medium, accent))
                .horizontal_alignment(HorizontalAlignment::Right),
            *format,
        ),
        CellRole::Note => Style::new()
            .italic(true)
            .font_color(MUTED_TEXT)
            .wrap_text(true)
            .vertical_alignment(VerticalAlignment::Top),
    }
}
