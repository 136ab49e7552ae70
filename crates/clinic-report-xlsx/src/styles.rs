//! XLSX styles (styles.xml) writer

use ahash::AHashMap;
use quick_xml::escape::escape;

use clinic_report_core::style::{
    Alignment, BorderEdge, BorderStyle, Color, FillStyle, FontStyle, NumberFormat, Style,
};
use clinic_report_core::ReportDocument;

/// First id available for custom number formats
const FIRST_CUSTOM_NUMFMT_ID: u32 = 164;

#[derive(Debug)]
pub(crate) struct XlsxStyleTable {
    /// Global, deduplicated styles. Index corresponds to the cellXfs index (xfId).
    styles: Vec<Style>,
    style_to_xf: AHashMap<Style, u32>,
}

#[derive(Debug, Clone, Copy)]
struct ResolvedXfIds {
    font_id: u32,
    fill_id: u32,
    border_id: u32,
    num_fmt_id: u32,
}

impl XlsxStyleTable {
    pub(crate) fn build(document: &ReportDocument) -> Self {
        let mut styles: Vec<Style> = Vec::new();
        let mut style_to_xf: AHashMap<Style, u32> = AHashMap::new();

        // Index 0 is always default style
        let default = Style::default();
        styles.push(default.clone());
        style_to_xf.insert(default, 0);

        for sheet in document.worksheets() {
            for (_row, _col, cell) in sheet.iter_cells() {
                if !style_to_xf.contains_key(&cell.style) {
                    let id = styles.len() as u32;
                    styles.push(cell.style.clone());
                    style_to_xf.insert(cell.style.clone(), id);
                }
            }
        }

        Self {
            styles,
            style_to_xf,
        }
    }

    pub(crate) fn xf_id_for(&self, style: &Style) -> u32 {
        self.style_to_xf.get(style).copied().unwrap_or(0)
    }

    pub(crate) fn len(&self) -> usize {
        self.styles.len()
    }

    pub(crate) fn to_styles_xml(&self) -> String {
        let mut fonts: Vec<FontStyle> = vec![FontStyle::default()];
        let mut font_ids: AHashMap<FontStyle, u32> = AHashMap::new();
        font_ids.insert(FontStyle::default(), 0);

        // Excel requires the first two fills to be: none and gray125
        let mut fills: Vec<FillStyle> = vec![FillStyle::None];
        let mut fill_ids: AHashMap<FillStyle, u32> = AHashMap::new();

        let mut borders: Vec<BorderStyle> = vec![BorderStyle::default()];
        let mut border_ids: AHashMap<BorderStyle, u32> = AHashMap::new();
        border_ids.insert(BorderStyle::default(), 0);

        let mut numfmts: Vec<(u32, String)> = Vec::new();
        let mut numfmt_ids: AHashMap<String, u32> = AHashMap::new();

        let mut resolved: Vec<ResolvedXfIds> = Vec::with_capacity(self.styles.len());

        for style in &self.styles {
            let font_id = *font_ids.entry(style.font.clone()).or_insert_with(|| {
                fonts.push(style.font.clone());
                (fonts.len() - 1) as u32
            });

            let fill_id = match style.fill {
                FillStyle::None => 0,
                fill => *fill_ids.entry(fill).or_insert_with(|| {
                    fills.push(fill);
                    // +1 accounts for the mandatory gray125 entry
                    fills.len() as u32
                }),
            };

            let border_id = *border_ids.entry(style.border).or_insert_with(|| {
                borders.push(style.border);
                (borders.len() - 1) as u32
            });

            let num_fmt_id = match &style.number_format {
                NumberFormat::General => 0,
                NumberFormat::BuiltIn(id) => *id,
                NumberFormat::Custom(code) => *numfmt_ids.entry(code.clone()).or_insert_with(|| {
                    let id = FIRST_CUSTOM_NUMFMT_ID + numfmts.len() as u32;
                    numfmts.push((id, code.clone()));
                    id
                }),
            };

            resolved.push(ResolvedXfIds {
                font_id,
                fill_id,
                border_id,
                num_fmt_id,
            });
        }

        let mut xml = String::new();
        xml.push_str(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !numfmts.is_empty() {
            xml.push_str(&format!("\n  <numFmts count=\"{}\">", numfmts.len()));
            for (id, code) in &numfmts {
                xml.push_str(&format!(
                    "\n    <numFmt numFmtId=\"{}\" formatCode=\"{}\"/>",
                    id,
                    escape(code.as_str())
                ));
            }
            xml.push_str("\n  </numFmts>");
        }

        xml.push_str(&format!("\n  <fonts count=\"{}\">", fonts.len()));
        for font in &fonts {
            xml.push_str("\n    ");
            xml.push_str(&write_font(font));
        }
        xml.push_str("\n  </fonts>");

        xml.push_str(&format!("\n  <fills count=\"{}\">", fills.len() + 1));
        xml.push_str("\n    <fill><patternFill patternType=\"none\"/></fill>");
        xml.push_str("\n    <fill><patternFill patternType=\"gray125\"/></fill>");
        for fill in fills.iter().skip(1) {
            xml.push_str("\n    ");
            xml.push_str(&write_fill(fill));
        }
        xml.push_str("\n  </fills>");

        xml.push_str(&format!("\n  <borders count=\"{}\">", borders.len()));
        for border in &borders {
            xml.push_str("\n    ");
            xml.push_str(&write_border(border));
        }
        xml.push_str("\n  </borders>");

        xml.push_str(
            r#"
  <cellStyleXfs count="1">
    <xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
  </cellStyleXfs>"#,
        );

        xml.push_str(&format!("\n  <cellXfs count=\"{}\">", self.styles.len()));
        for (style, ids) in self.styles.iter().zip(&resolved) {
            xml.push_str("\n    ");
            xml.push_str(&write_xf(style, *ids));
        }
        xml.push_str("\n  </cellXfs>");

        xml.push_str(
            r#"
  <cellStyles count="1">
    <cellStyle name="Normal" xfId="0" builtinId="0"/>
  </cellStyles>
  <dxfs count="0"/>
  <tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>
</styleSheet>"#,
        );
        xml
    }
}

fn color_attrs(color: &Color) -> String {
    match color {
        Color::Auto => " indexed=\"64\"".to_string(),
        Color::Rgb { .. } => format!(" rgb=\"{}\"", color.to_argb_hex()),
    }
}

fn write_font(font: &FontStyle) -> String {
    let mut s = String::from("<font>");
    if font.bold {
        s.push_str("<b/>");
    }
    if font.italic {
        s.push_str("<i/>");
    }
    s.push_str(&format!("<sz val=\"{}\"/>", font.size));
    if !font.color.is_auto() {
        s.push_str(&format!("<color{}/>", color_attrs(&font.color)));
    }
    s.push_str(&format!("<name val=\"{}\"/>", escape(font.name.as_str())));
    s.push_str("<family val=\"2\"/>");
    s.push_str("</font>");
    s
}

fn write_fill(fill: &FillStyle) -> String {
    match fill {
        FillStyle::None => "<fill><patternFill patternType=\"none\"/></fill>".to_string(),
        FillStyle::Solid { color } => format!(
            "<fill><patternFill patternType=\"solid\"><fgColor{}/><bgColor indexed=\"64\"/></patternFill></fill>",
            color_attrs(color)
        ),
    }
}

fn write_border_edge(tag: &str, edge: &Option<BorderEdge>) -> String {
    match edge.and_then(|e| e.style.xlsx_name().map(|name| (name, e.color))) {
        None => format!("<{tag}/>"),
        Some((name, color)) => format!(
            "<{tag} style=\"{}\"><color{}/></{tag}>",
            name,
            color_attrs(&color)
        ),
    }
}

fn write_border(border: &BorderStyle) -> String {
    let mut s = String::from("<border>");
    s.push_str(&write_border_edge("left", &border.left));
    s.push_str(&write_border_edge("right", &border.right));
    s.push_str(&write_border_edge("top", &border.top));
    s.push_str(&write_border_edge("bottom", &border.bottom));
    s.push_str("<diagonal/>");
    s.push_str("</border>");
    s
}

fn write_alignment(al: &Alignment) -> String {
    let default = Alignment::default();
    if al == &default {
        return String::new();
    }

    let mut s = String::from("<alignment");
    if al.horizontal != default.horizontal {
        s.push_str(&format!(" horizontal=\"{}\"", al.horizontal.xlsx_name()));
    }
    if al.vertical != default.vertical {
        s.push_str(&format!(" vertical=\"{}\"", al.vertical.xlsx_name()));
    }
    if al.wrap_text {
        s.push_str(" wrapText=\"1\"");
    }
    s.push_str("/>");
    s
}

fn write_xf(style: &Style, ids: ResolvedXfIds) -> String {
    let mut attrs = String::new();
    if ids.num_fmt_id != 0 {
        attrs.push_str(" applyNumberFormat=\"1\"");
    }
    if style.font != FontStyle::default() {
        attrs.push_str(" applyFont=\"1\"");
    }
    if !style.fill.is_none() {
        attrs.push_str(" applyFill=\"1\"");
    }
    if !style.border.is_empty() {
        attrs.push_str(" applyBorder=\"1\"");
    }
    if style.alignment != Alignment::default() {
        attrs.push_str(" applyAlignment=\"1\"");
    }

    let mut s = format!(
        "<xf numFmtId=\"{}\" fontId=\"{}\" fillId=\"{}\" borderId=\"{}\" xfId=\"0\"{}",
        ids.num_fmt_id, ids.font_id, ids.fill_id, ids.border_id, attrs
    );

    let alignment_xml = write_alignment(&style.alignment);
    if alignment_xml.is_empty() {
        s.push_str("/>");
    } else {
        s.push('>');
        s.push_str(&alignment_xml);
        s.push_str("</xf>");
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_report_core::{BorderLineStyle, Cell, CellRole, Row, RowKind, Worksheet};

    fn doc_with(styles: Vec<Style>) -> ReportDocument {
        let mut sheet = Worksheet::new("S");
        let mut row = Row::new(RowKind::Data { index: 0 });
        for style in styles {
            let mut cell = Cell::number(1.0, CellRole::Value(clinic_report_core::ValueFormat::Integer));
            cell.style = style;
            row = row.with_cell(cell);
        }
        sheet.push_row(row);
        ReportDocument::new(vec![sheet])
    }

    #[test]
    fn test_styles_are_deduplicated() {
        let money = Style::new().number_format("\"$\"#,##0");
        let doc = doc_with(vec![money.clone(), money.clone(), Style::default()]);
        let table = XlsxStyleTable::build(&doc);
        assert_eq!(table.len(), 2);
        assert_eq!(table.xf_id_for(&Style::default()), 0);
        assert_eq!(table.xf_id_for(&money), 1);
    }

    #[test]
    fn test_styles_xml_components() {
        let green = Style::new()
            .fill_color(Color::hex(0xC6EFCE))
            .border(BorderStyle::all(BorderLineStyle::Thin, Color::hex(0xBFBFBF)))
            .number_format("0.0%");
        let doc = doc_with(vec![green]);
        let xml = XlsxStyleTable::build(&doc).to_styles_xml();

        assert!(xml.contains("<numFmt numFmtId=\"164\" formatCode=\"0.0%\"/>"));
        assert!(xml.contains("<fills count=\"3\">"));
        assert!(xml.contains("<fgColor rgb=\"FFC6EFCE\"/>"));
        assert!(xml.contains("<left style=\"thin\"><color rgb=\"FFBFBFBF\"/></left>"));
        assert!(xml.contains("<cellXfs count=\"2\">"));
        assert!(xml.contains("fillId=\"2\" borderId=\"1\""));
    }

    #[test]
    fn test_currency_format_is_escaped() {
        let doc = doc_with(vec![Style::new().number_format("\"$\"#,##0")]);
        let xml = XlsxStyleTable::build(&doc).to_styles_xml();
        assert!(xml.contains("formatCode=\"&quot;$&quot;#,##0\""));
    }
}
