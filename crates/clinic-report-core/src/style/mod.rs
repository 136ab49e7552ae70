//! Cell styling types
//!
//! This module contains types for cell formatting:
//! - [`Style`] - Complete cell style
//! - [`FontStyle`] - Font settings
//! - [`FillStyle`] - Background fill
//! - [`BorderStyle`] - Cell borders
//! - [`Alignment`] - Text alignment
//! - [`NumberFormat`] - Display format for numeric values
//! - [`Color`] - Color representation

mod alignment;
mod border;
mod color;
mod fill;
mod font;
mod number_format;

pub use alignment::{Alignment, HorizontalAlignment, VerticalAlignment};
pub use border::{BorderEdge, BorderLineStyle, BorderStyle};
pub use color::Color;
pub use fill::FillStyle;
pub use font::FontStyle;
pub use number_format::NumberFormat;

/// Complete cell style
///
/// Styles are plain values; the XLSX writer deduplicates them into its style table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Style {
    /// Font settings
    pub font: FontStyle,
    /// Fill/background settings
    pub fill: FillStyle,
    /// Border settings
    pub border: BorderStyle,
    /// Text alignment
    pub alignment: Alignment,
    /// Number format
    pub number_format: NumberFormat,
}

impl Style {
    /// Create a new default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.font.bold = bold;
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.font.italic = italic;
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    /// Set font color
    pub fn font_color(mut self, color: Color) -> Self {
        self.font.color = color;
        self
    }

    /// Set fill color (solid fill)
    pub fn fill_color(mut self, color: Color) -> Self {
        self.fill = FillStyle::Solid { color };
        self
    }

    /// Set the border on all four edges
    pub fn border(mut self, border: BorderStyle) -> Self {
        self.border = border;
        self
    }

    /// Set number format string
    pub fn number_format<S: Into<String>>(mut self, format: S) -> Self {
        self.number_format = NumberFormat::Custom(format.into());
        self
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.alignment.horizontal = align;
        self
    }

    /// Set vertical alignment
    pub fn vertical_alignment(mut self, align: VerticalAlignment) -> Self {
        self.alignment.vertical = align;
        self
    }

    /// Enable text wrapping
    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.alignment.wrap_text = wrap;
        self
    }

    /// Check whether this is the default (unstyled) style
    pub fn is_default(&self) -> bool {
        self == &Style::default()
    }
}
