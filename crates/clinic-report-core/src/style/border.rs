//! Border style types

use super::Color;

/// Border style for a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BorderStyle {
    /// Left border
    pub left: Option<BorderEdge>,
    /// Right border
    pub right: Option<BorderEdge>,
    /// Top border
    pub top: Option<BorderEdge>,
    /// Bottom border
    pub bottom: Option<BorderEdge>,
}

impl BorderStyle {
    /// Create a new border style with no borders
    pub fn new() -> Self {
        Self::default()
    }

    /// Set all borders to the same style
    pub fn all(style: BorderLineStyle, color: Color) -> Self {
        let edge = Some(BorderEdge::new(style, color));
        Self {
            left: edge,
            right: edge,
            top: edge,
            bottom: edge,
        }
    }

    /// Set the bottom border
    pub fn with_bottom(mut self, style: BorderLineStyle, color: Color) -> Self {
        self.bottom = Some(BorderEdge::new(style, color));
        self
    }

    /// Check if all borders are empty
    pub fn is_empty(&self) -> bool {
        self.left.is_none() && self.right.is_none() && self.top.is_none() && self.bottom.is_none()
    }
}

/// A single border edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorderEdge {
    /// Line style
    pub style: BorderLineStyle,
    /// Line color
    pub color: Color,
}

impl BorderEdge {
    /// Create a new border edge
    pub fn new(style: BorderLineStyle, color: Color) -> Self {
        Self { style, color }
    }
}

/// Border line styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BorderLineStyle {
    /// No border
    #[default]
    None,
    /// Thin line
    Thin,
    /// Medium line
    Medium,
    /// Thick line
    Thick,
}

impl BorderLineStyle {
    /// OOXML attribute value, `None` for no border
    pub fn xlsx_name(&self) -> Option<&'static str> {
        match self {
            BorderLineStyle::None => None,
            BorderLineStyle::Thin => Some("thin"),
            BorderLineStyle::Medium => Some("medium"),
            BorderLineStyle::Thick => Some("thick"),
        }
    }
}
