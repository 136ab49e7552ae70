//! Text alignment types

/// Text alignment settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Alignment {
    /// Horizontal alignment
    pub horizontal: HorizontalAlignment,
    /// Vertical alignment
    pub vertical: VerticalAlignment,
    /// Wrap text
    pub wrap_text: bool,
}

impl Alignment {
    /// Create a new default alignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Centered both ways
    pub fn centered() -> Self {
        Self {
            horizontal: HorizontalAlignment::Center,
            vertical: VerticalAlignment::Center,
            wrap_text: false,
        }
    }
}

/// Horizontal alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HorizontalAlignment {
    /// General alignment (text left, numbers right)
    #[default]
    General,
    /// Left aligned
    Left,
    /// Center aligned
    Center,
    /// Right aligned
    Right,
}

impl HorizontalAlignment {
    pub fn xlsx_name(&self) -> &'static str {
        match self {
            HorizontalAlignment::General => "general",
            HorizontalAlignment::Left => "left",
            HorizontalAlignment::Center => "center",
            HorizontalAlignment::Right => "right",
        }
    }
}

/// Vertical alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VerticalAlignment {
    /// Top aligned
    Top,
    /// Center aligned
    Center,
    /// Bottom aligned (default)
    #[default]
    Bottom,
}

impl VerticalAlignment {
    pub fn xlsx_name(&self) -> &'static str {
        match self {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Center => "center",
            VerticalAlignment::Bottom => "bottom",
        }
    }
}
