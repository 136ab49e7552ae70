//! Worksheet, row and cell types of the document model
//!
//! A [`Worksheet`] is an ordered list of [`Row`]s; each row is an ordered list of
//! [`Cell`]s where the position in the list is the column index. Cells carry a
//! semantic [`CellRole`] next to their value so styling can be resolved from
//! declarative rules after the model is built.

use crate::cell::{CellAddress, CellRange, CellValue};
use crate::error::{Error, Result};
use crate::record::{AppointmentStatus, PerformanceTier};
use crate::style::{Color, Style};
use crate::{MAX_COLS, MAX_ROWS};

/// How a numeric (or text) value is meant to be displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueFormat {
    /// Plain text
    Text,
    /// Whole number
    Integer,
    /// Money, no decimals
    Currency,
    /// Fraction rendered as a one-decimal percentage
    Percent,
    /// Hours with one decimal
    Hours,
    /// Two-decimal ratio (patients per hour)
    Rate,
}

/// Semantic role of a cell, consumed by the style resolver
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellRole {
    /// No styling
    #[default]
    Plain,
    /// Sheet banner title
    Banner,
    /// Line under the banner
    Subtitle,
    /// Title of a block inside a sheet
    SectionTitle,
    /// Table header cell
    Header,
    /// KPI card caption
    KpiLabel,
    /// KPI card figure
    KpiValue(ValueFormat),
    /// Table row label
    Label,
    /// Table data value
    Value(ValueFormat),
    /// Dash shown where a column has no value for the row
    Placeholder,
    /// Performance badge
    TierBadge(PerformanceTier),
    /// Appointment status cell
    Status(AppointmentStatus),
    /// One cell of a proportion bar
    BarSegment { filled: bool },
    /// Caption of a totals row
    TotalLabel,
    /// Figure in a totals row
    Total(ValueFormat),
    /// Free-text explanatory note
    Note,
}

/// Size of a merged region anchored at a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub rows: u32,
    pub cols: u16,
}

impl Span {
    pub fn new(rows: u32, cols: u16) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// A single-row span across `cols` columns
    pub fn cols(cols: u16) -> Self {
        Self::new(1, cols)
    }
}

/// A single cell of the document model
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cell {
    pub value: CellValue,
    pub role: CellRole,
    pub style: Style,
    /// Merged region anchored at this cell, if any
    pub span: Option<Span>,
}

impl Cell {
    /// An empty, unstyled cell
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn new<V: Into<CellValue>>(value: V, role: CellRole) -> Self {
        Self {
            value: value.into(),
            role,
            style: Style::default(),
            span: None,
        }
    }

    pub fn text<S: Into<String>>(text: S, role: CellRole) -> Self {
        Self::new(CellValue::String(text.into()), role)
    }

    pub fn number(value: f64, role: CellRole) -> Self {
        Self::new(CellValue::Number(value), role)
    }

    /// An empty cell that still carries a role (e.g. an unfilled bar segment)
    pub fn styled_blank(role: CellRole) -> Self {
        Self::new(CellValue::Empty, role)
    }

    /// Merge this cell with its neighbours
    pub fn merged(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

/// What a row represents within its sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Banner,
    Subtitle,
    SectionTitle,
    Header,
    /// Table data row; `index` is 0-based within its table
    Data { index: usize },
    Total,
    Kpi,
    Bar,
    Note,
    Spacer,
}

/// A row of the document model
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    /// Custom height in points (None = default)
    pub height: Option<f64>,
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn new(kind: RowKind) -> Self {
        Self {
            kind,
            height: None,
            cells: Vec::new(),
        }
    }

    /// An empty separator row
    pub fn spacer() -> Self {
        Self::new(RowKind::Spacer)
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    /// Append a cell in the next column
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Place a cell at `col`, padding the gap with blanks
    pub fn with_cell_at(mut self, col: u16, cell: Cell) -> Self {
        let col = col as usize;
        if self.cells.len() <= col {
            self.cells.resize_with(col + 1, Cell::blank);
        }
        self.cells[col] = cell;
        self
    }

    pub fn cell(&self, col: u16) -> Option<&Cell> {
        self.cells.get(col as usize)
    }
}

/// A worksheet in a report document
#[derive(Debug, Clone, PartialEq)]
pub struct Worksheet {
    name: String,
    tab_color: Color,
    /// Column widths in character units, indexed by column
    column_widths: Vec<f64>,
    rows: Vec<Row>,
    autofilter: Option<CellRange>,
    frozen_rows: u32,
}

impl Worksheet {
    /// Create an empty worksheet; the name is validated when the document is
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            tab_color: Color::Auto,
            column_widths: Vec::new(),
            rows: Vec::new(),
            autofilter: None,
            frozen_rows: 0,
        }
    }

    pub fn with_tab_color(mut self, color: Color) -> Self {
        self.tab_color = color;
        self
    }

    pub fn with_column_widths(mut self, widths: &[f64]) -> Self {
        self.column_widths = widths.to_vec();
        self
    }

    /// Append a row, returning its 0-based index
    pub fn push_row(&mut self, row: Row) -> u32 {
        self.rows.push(row);
        (self.rows.len() - 1) as u32
    }

    pub fn set_autofilter(&mut self, range: CellRange) {
        self.autofilter = Some(range);
    }

    /// Keep the first `rows` rows visible while scrolling
    pub fn freeze_rows(&mut self, rows: u32) {
        self.frozen_rows = rows;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tab_color(&self) -> Color {
        self.tab_color
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Mutable access to rows, used when annotating a copy of the model
    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(index as usize)
    }

    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    pub fn autofilter(&self) -> Option<CellRange> {
        self.autofilter
    }

    pub fn frozen_rows(&self) -> u32 {
        self.frozen_rows
    }

    /// Get a cell by 0-based position
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&Cell> {
        self.row(row).and_then(|r| r.cell(col))
    }

    /// Get a cell by A1-style address
    pub fn cell(&self, address: &str) -> Result<Option<&Cell>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cell_at(addr.row, addr.col))
    }

    /// Iterate over all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(r, row)| {
            row.cells
                .iter()
                .enumerate()
                .map(move |(c, cell)| (r as u32, c as u16, cell))
        })
    }

    /// Merged regions declared by cell spans, in row-major order
    pub fn merged_regions(&self) -> Vec<CellRange> {
        self.iter_cells()
            .filter_map(|(row, col, cell)| {
                cell.span
                    .filter(|s| s.rows > 1 || s.cols > 1)
                    .map(|s| {
                        CellRange::from_indices(
                            row,
                            col,
                            row.saturating_add(s.rows.saturating_sub(1)),
                            col.saturating_add(s.cols.saturating_sub(1)),
                        )
                    })
            })
            .collect()
    }

    /// Check bounds, merged regions and the autofilter range for consistency
    pub fn validate(&self) -> Result<()> {
        let max_row = MAX_ROWS as usize - 1;
        let max_col = MAX_COLS as usize - 1;
        if self.rows.len() > MAX_ROWS as usize {
            return Err(Error::RowOutOfBounds(self.row_count(), MAX_ROWS - 1));
        }
        for (r, row) in self.rows.iter().enumerate() {
            if row.cells.len() > MAX_COLS as usize {
                return Err(Error::ColumnOutOfBounds(MAX_COLS, MAX_COLS - 1));
            }
            let spans = row
                .cells
                .iter()
                .enumerate()
                .filter_map(|(c, cell)| cell.span.map(|s| (c, s)));
            for (c, span) in spans {
                let last_col = c + span.cols.saturating_sub(1) as usize;
                if last_col > max_col {
                    return Err(Error::ColumnOutOfBounds(
                        u16::try_from(last_col).unwrap_or(u16::MAX),
                        MAX_COLS - 1,
                    ));
                }
                let last_row = r + span.rows.saturating_sub(1) as usize;
                if last_row > max_row {
                    return Err(Error::RowOutOfBounds(
                        u32::try_from(last_row).unwrap_or(u32::MAX),
                        MAX_ROWS - 1,
                    ));
                }
            }
        }

        let regions = self.merged_regions();
        for (i, a) in regions.iter().enumerate() {
            if let Some(b) = regions[i + 1..].iter().find(|b| a.overlaps(b)) {
                return Err(Error::MergedCellConflict(format!(
                    "{} ({} / {})",
                    b.start, a, b
                )));
            }
        }

        if let Some(filter) = self.autofilter {
            if filter.end.row >= self.row_count() {
                return Err(Error::InvalidAutofilter(filter.to_string()));
            }
        }

        Ok(())
    }
}
