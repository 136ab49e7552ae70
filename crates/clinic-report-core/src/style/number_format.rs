//! Number format types

/// Number format for cell display
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum NumberFormat {
    /// General format (default)
    #[default]
    General,

    /// Built-in format by ID
    BuiltIn(u32),

    /// Custom format string
    Custom(String),
}

impl NumberFormat {
    /// 1 - 0
    pub const ID_NUMBER_INT: u32 = 1;
    /// 2 - 0.00
    pub const ID_NUMBER_DEC2: u32 = 2;
    /// 3 - #,##0
    pub const ID_NUMBER_SEP: u32 = 3;

    /// Create a custom format
    pub fn custom<S: Into<String>>(code: S) -> Self {
        NumberFormat::Custom(code.into())
    }

    /// Get the format code string, if it is known
    pub fn format_code(&self) -> Option<&str> {
        match self {
            NumberFormat::General => Some("General"),
            NumberFormat::BuiltIn(Self::ID_NUMBER_INT) => Some("0"),
            NumberFormat::BuiltIn(Self::ID_NUMBER_DEC2) => Some("0.00"),
            NumberFormat::BuiltIn(Self::ID_NUMBER_SEP) => Some("#,##0"),
            NumberFormat::BuiltIn(_) => None,
            NumberFormat::Custom(code) => Some(code.as_str()),
        }
    }

    /// Check if this is the general format
    pub fn is_general(&self) -> bool {
        matches!(self, NumberFormat::General)
    }
}
