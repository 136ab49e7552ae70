//! # clinic-report-core
//!
//! Core data structures for the clinic productivity report.
//!
//! This crate provides the types shared by every stage of the report pipeline:
//! - [`Employee`], [`AttendanceRecord`], [`ProductivityPeriod`], [`AppointmentDetail`] - the
//!   records the report is built from
//! - [`CellValue`], [`CellAddress`] and [`CellRange`] - cell values and addressing
//! - [`Style`] - cell formatting (fonts, fills, borders, number formats)
//! - [`ReportDocument`], [`Worksheet`], [`Row`], [`Cell`] - the format-agnostic document model
//!
//! ## Example
//!
//! ```rust
//! use clinic_report_core::{Cell, CellRole, ReportDocument, Row, RowKind, Worksheet};
//!
//! let mut sheet = Worksheet::new("Dashboard");
//! sheet.push_row(Row::new(RowKind::Banner).with_cell(Cell::text("REPORTE", CellRole::Banner)));
//!
//! let document = ReportDocument::new(vec![sheet]);
//! assert_eq!(document.sheet_count(), 1);
//! assert_eq!(
//!     document.worksheet(0).unwrap().cell("A1").unwrap().unwrap().value.as_str(),
//!     Some("REPORTE")
//! );
//! ```

pub mod cell;
pub mod document;
pub mod error;
pub mod record;
pub mod style;
pub mod worksheet;

pub use cell::{CellAddress, CellRange, CellValue};
pub use document::ReportDocument;
pub use error::{Error, Result};
pub use record::{
    AppointmentDetail, AppointmentStatus, AttendanceRecord, AttendanceStats, Employee,
    PerformanceTier, ProductivityPeriod, Shift,
};
pub use worksheet::{Cell, CellRole, Row, RowKind, Span, ValueFormat, Worksheet};

pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, FontStyle,
    HorizontalAlignment, NumberFormat, Style, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
