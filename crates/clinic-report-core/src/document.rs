//! Report document - the top-level document structure

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// A report document: an ordered list of worksheets
///
/// Built fresh for every report and never shared between invocations.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReportDocument {
    worksheets: Vec<Worksheet>,
}

impl ReportDocument {
    pub fn new(worksheets: Vec<Worksheet>) -> Self {
        Self { worksheets }
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Get a worksheet by index
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name() == name)
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    /// Sheet names in order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Validate sheet names and every sheet's layout before rendering
    pub fn validate(&self) -> Result<()> {
        if self.worksheets.is_empty() {
            return Err(Error::InvalidSheetName(
                "document has no worksheets".into(),
            ));
        }
        for (i, sheet) in self.worksheets.iter().enumerate() {
            validate_sheet_name(sheet.name())?;
            let lower = sheet.name().to_lowercase();
            if self.worksheets[..i]
                .iter()
                .any(|other| other.name().to_lowercase() == lower)
            {
                return Err(Error::DuplicateSheetName(sheet.name().into()));
            }
            sheet.validate()?;
        }
        Ok(())
    }
}

fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name too long (max {} characters)",
            MAX_SHEET_NAME_LEN
        )));
    }

    const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
    if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
        return Err(Error::InvalidSheetName(format!(
            "Sheet name cannot contain '{}'",
            c
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_names_in_order() {
        let doc = ReportDocument::new(vec![
            Worksheet::new("Dashboard"),
            Worksheet::new("Detalle de Citas"),
            Worksheet::new("Estadísticas"),
        ]);
        assert_eq!(
            doc.sheet_names(),
            vec!["Dashboard", "Detalle de Citas", "Estadísticas"]
        );
        assert!(doc.validate().is_ok());
        assert!(doc.worksheet_by_name("Estadísticas").is_some());
    }

    #[test]
    fn test_invalid_names() {
        let slash = ReportDocument::new(vec![Worksheet::new("Citas 10/2026")]);
        assert!(matches!(slash.validate(), Err(Error::InvalidSheetName(_))));

        let long = ReportDocument::new(vec![Worksheet::new("x".repeat(32))]);
        assert!(matches!(long.validate(), Err(Error::InvalidSheetName(_))));

        let dup = ReportDocument::new(vec![Worksheet::new("Dashboard"), Worksheet::new("dashboard")]);
        assert!(matches!(dup.validate(), Err(Error::DuplicateSheetName(_))));

        assert!(ReportDocument::default().validate().is_err());
    }
}
