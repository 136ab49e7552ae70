//! # clinic-report-xlsx
//!
//! XLSX (Office Open XML) writer for clinic report documents.
//!
//! The writer only reads the document model; it never changes values or styles.

pub mod error;
pub mod writer;

mod styles;

pub use error::{XlsxError, XlsxResult};
pub use writer::XlsxWriter;

/// MIME type of the files produced by [`XlsxWriter`]
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
