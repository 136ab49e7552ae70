//! XLSX writer

use std::io::{Cursor, Seek, Write};
use std::path::Path;

use quick_xml::escape::escape;

use crate::error::XlsxResult;
use crate::styles::XlsxStyleTable;
use clinic_report_core::{CellAddress, CellRange, CellValue, ReportDocument, Worksheet};

/// XLSX file writer
pub struct XlsxWriter;

impl XlsxWriter {
    /// Write a document to a file path
    ///
    /// The workbook is rendered in memory first; the file is only created once
    /// rendering has succeeded.
    pub fn write_file<P: AsRef<Path>>(document: &ReportDocument, path: P) -> XlsxResult<()> {
        let bytes = Self::to_bytes(document)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Render a document into an in-memory buffer
    pub fn to_bytes(document: &ReportDocument) -> XlsxResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());
        Self::write(document, &mut buf)?;
        Ok(buf.into_inner())
    }

    /// Write a document to a writer
    ///
    /// The document is validated first, so an invalid model fails before any byte is written.
    pub fn write<W: Write + Seek>(document: &ReportDocument, writer: W) -> XlsxResult<()> {
        document.validate()?;

        let mut zip = zip::ZipWriter::new(writer);

        // Build a document-wide style table.
        let style_table = XlsxStyleTable::build(document);
        log::debug!(
            "writing {} worksheets with {} cell formats",
            document.sheet_count(),
            style_table.len()
        );

        Self::write_content_types(&mut zip, document)?;
        Self::write_root_rels(&mut zip)?;
        Self::write_workbook_xml(&mut zip, document)?;
        Self::write_workbook_rels(&mut zip, document)?;
        Self::write_styles_xml(&mut zip, &style_table)?;

        for (i, sheet) in document.worksheets().enumerate() {
            Self::write_worksheet(&mut zip, sheet, i, &style_table)?;
        }

        zip.finish()?;
        Ok(())
    }

    fn write_content_types<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &ReportDocument,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
    <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
    <Default Extension="xml" ContentType="application/xml"/>
    <Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
    <Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#,
        );

        for i in 0..document.sheet_count() {
            content.push_str(&format!(
                r#"
    <Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }

        content.push_str("\n</Types>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + Seek>(zip: &mut zip::ZipWriter<W>) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &ReportDocument,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/workbook.xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
    <bookViews>
        <workbookView activeTab="0"/>
    </bookViews>
    <sheets>"#,
        );

        for (i, sheet) in document.worksheets().enumerate() {
            content.push_str(&format!(
                r#"
        <sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                escape(sheet.name()),
                i + 1,
                i + 1
            ));
        }
        content.push_str("\n    </sheets>");

        // Excel expects a hidden _FilterDatabase name for every autofilter
        let filters: Vec<(usize, &Worksheet, CellRange)> = document
            .worksheets()
            .enumerate()
            .filter_map(|(i, sheet)| sheet.autofilter().map(|range| (i, sheet, range)))
            .collect();
        if !filters.is_empty() {
            content.push_str("\n    <definedNames>");
            for (i, sheet, range) in filters {
                content.push_str(&format!(
                    "\n        <definedName name=\"_xlnm._FilterDatabase\" localSheetId=\"{}\" hidden=\"1\">{}</definedName>",
                    i,
                    escape(absolute_reference(sheet.name(), range).as_str())
                ));
            }
            content.push_str("\n    </definedNames>");
        }

        content.push_str("\n</workbook>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_workbook_rels<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        document: &ReportDocument,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/_rels/workbook.xml.rels", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for i in 0..document.sheet_count() {
            content.push_str(&format!(
                r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }

        content.push_str(&format!(
            r#"
    <Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
</Relationships>"#,
            document.sheet_count() + 1
        ));

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_styles_xml<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(style_table.to_styles_xml().as_bytes())?;
        Ok(())
    }

    fn write_worksheet<W: Write + Seek>(
        zip: &mut zip::ZipWriter<W>,
        sheet: &Worksheet,
        index: usize,
        style_table: &XlsxStyleTable,
    ) -> XlsxResult<()> {
        let options = zip::write::SimpleFileOptions::default();
        zip.start_file(format!("xl/worksheets/sheet{}.xml", index + 1), options)?;
        log::debug!("writing worksheet {} ({})", index + 1, sheet.name());

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        if !sheet.tab_color().is_auto() {
            content.push_str(&format!(
                "\n    <sheetPr><tabColor rgb=\"{}\"/></sheetPr>",
                sheet.tab_color().to_argb_hex()
            ));
        }

        if let Some(dimension) = Self::dimension(sheet) {
            content.push_str(&format!("\n    <dimension ref=\"{}\"/>", dimension));
        }

        Self::write_sheet_view(&mut content, sheet, index);
        content.push_str("\n    <sheetFormatPr defaultRowHeight=\"15\"/>");

        let widths = sheet.column_widths();
        if !widths.is_empty() {
            content.push_str("\n    <cols>");
            for (col, width) in widths.iter().enumerate() {
                content.push_str(&format!(
                    "\n        <col min=\"{}\" max=\"{}\" width=\"{}\" customWidth=\"1\"/>",
                    col + 1,
                    col + 1,
                    width
                ));
            }
            content.push_str("\n    </cols>");
        }

        content.push_str("\n    <sheetData>");
        for (r, row) in sheet.rows().iter().enumerate() {
            let height_attr = row
                .height
                .map_or(String::new(), |h| format!(" ht=\"{}\" customHeight=\"1\"", h));
            let cells: Vec<String> = row
                .cells
                .iter()
                .enumerate()
                .filter_map(|(c, cell)| {
                    let cell_ref = CellAddress::new(r as u32, c as u16).to_a1_string();
                    Self::cell_xml(&cell_ref, &cell.value, style_table.xf_id_for(&cell.style))
                })
                .collect();

            if cells.is_empty() && height_attr.is_empty() {
                continue;
            }
            content.push_str(&format!("\n        <row r=\"{}\"{}>", r + 1, height_attr));
            for cell in cells {
                content.push_str("\n            ");
                content.push_str(&cell);
            }
            content.push_str("\n        </row>");
        }
        content.push_str("\n    </sheetData>");

        if let Some(range) = sheet.autofilter() {
            content.push_str(&format!("\n    <autoFilter ref=\"{}\"/>", range));
        }

        let merged_regions = sheet.merged_regions();
        if !merged_regions.is_empty() {
            content.push_str(&format!(
                "\n    <mergeCells count=\"{}\">",
                merged_regions.len()
            ));
            for range in merged_regions {
                content.push_str(&format!("\n        <mergeCell ref=\"{}\"/>", range));
            }
            content.push_str("\n    </mergeCells>");
        }

        content.push_str(
            "\n    <pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\" header=\"0.3\" footer=\"0.3\"/>",
        );
        content.push_str("\n</worksheet>");

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_sheet_view(content: &mut String, sheet: &Worksheet, index: usize) {
        let selected = if index == 0 { " tabSelected=\"1\"" } else { "" };
        let frozen = sheet.frozen_rows();
        if frozen == 0 {
            content.push_str(&format!(
                "\n    <sheetViews><sheetView{} workbookViewId=\"0\"/></sheetViews>",
                selected
            ));
            return;
        }

        let top_left = CellAddress::new(frozen, 0);
        content.push_str(&format!(
            "\n    <sheetViews><sheetView{} workbookViewId=\"0\"><pane ySplit=\"{}\" topLeftCell=\"{}\" activePane=\"bottomLeft\" state=\"frozen\"/><selection pane=\"bottomLeft\" activeCell=\"{}\" sqref=\"{}\"/></sheetView></sheetViews>",
            selected, frozen, top_left, top_left, top_left
        ));
    }

    /// Render one `<c>` element; `None` when there is nothing to write
    fn cell_xml(cell_ref: &str, value: &CellValue, xf_id: u32) -> Option<String> {
        let style_attr = if xf_id != 0 {
            format!(" s=\"{}\"", xf_id)
        } else {
            String::new()
        };

        match value {
            CellValue::Number(n) if n.is_finite() => Some(format!(
                "<c r=\"{}\"{}><v>{}</v></c>",
                cell_ref, style_attr, n
            )),
            CellValue::Number(n) => {
                log::warn!("cell {} holds non-finite number {}, written blank", cell_ref, n);
                (xf_id != 0).then(|| format!("<c r=\"{}\"{}/>", cell_ref, style_attr))
            }
            CellValue::String(s) => {
                let space = if s.trim() != s.as_str() {
                    " xml:space=\"preserve\""
                } else {
                    ""
                };
                Some(format!(
                    "<c r=\"{}\"{} t=\"inlineStr\"><is><t{}>{}</t></is></c>",
                    cell_ref,
                    style_attr,
                    space,
                    escape(s.as_str())
                ))
            }
            // Preserve style-only cells
            CellValue::Empty => {
                (xf_id != 0).then(|| format!("<c r=\"{}\"{}/>", cell_ref, style_attr))
            }
        }
    }

    /// Used range of a sheet, from A1 to the last populated row/column
    fn dimension(sheet: &Worksheet) -> Option<CellRange> {
        let last_row = sheet.rows().iter().rposition(|row| !row.cells.is_empty())?;
        let last_col = sheet
            .rows()
            .iter()
            .map(|row| row.cells.len())
            .max()
            .unwrap_or(1)
            .max(1)
            - 1;
        Some(CellRange::from_indices(0, 0, last_row as u32, last_col as u16))
    }
}

/// `'Sheet name'!$A$1:$B$2` style reference
fn absolute_reference(sheet_name: &str, range: CellRange) -> String {
    let abs = |addr: CellAddress| {
        format!(
            "${}${}",
            CellAddress::column_to_letters(addr.col),
            addr.row + 1
        )
    };
    format!(
        "'{}'!{}:{}",
        sheet_name.replace('\'', "''"),
        abs(range.start),
        abs(range.end)
    )
}
