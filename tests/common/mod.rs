//! In-memory DOCX / XLSX fixtures and test collaborators.

#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::time::Duration;

use file_preview::core::parser::{DocxExtractor, TextExtractor};
use zip::write::FileOptions;

fn zip_parts(parts: &[(&str, String)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in parts {
        zip.start_file(*name, FileOptions::default()).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A word-processing document with one paragraph per entry.
pub fn docx(paragraphs: &[&str]) -> Vec<u8> {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>", p))
        .collect();
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

    zip_parts(&[
        ("[Content_Types].xml", content_types.to_string()),
        ("word/document.xml", document),
    ])
}

pub enum Cell<'a> {
    Str(&'a str),
    Num(f64),
    Blank,
}

fn column_letter(index: usize) -> char {
    (b'A' + index as u8) as char
}

fn sheet_xml(rows: &[Vec<Cell>], origin: (usize, usize), shared: &mut Vec<String>) -> String {
    let (first_row, first_col) = origin;
    let mut data = String::new();
    for (r, row) in rows.iter().enumerate() {
        let row_number = first_row + r + 1;
        data.push_str(&format!("<row r=\"{}\">", row_number));
        for (c, cell) in row.iter().enumerate() {
            let reference = format!("{}{}", column_letter(first_col + c), row_number);
            match cell {
                Cell::Str(s) => {
                    shared.push(s.to_string());
                    data.push_str(&format!(
                        "<c r=\"{}\" t=\"s\"><v>{}</v></c>",
                        reference,
                        shared.len() - 1
                    ));
                }
                Cell::Num(n) => data.push_str(&format!("<c r=\"{}\"><v>{}</v></c>", reference, n)),
                Cell::Blank => {}
            }
        }
        data.push_str("</row>");
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{}</sheetData></worksheet>"#,
        data
    )
}

/// A workbook with the given sheets, in order, each anchored at A1.
pub fn xlsx(sheets: &[(&str, Vec<Vec<Cell>>)]) -> Vec<u8> {
    xlsx_at(sheets, (0, 0))
}

/// Like [`xlsx`], but every sheet's first row and column start at the zero-based
/// `(row, column)` origin.
pub fn xlsx_at(sheets: &[(&str, Vec<Vec<Cell>>)], origin: (usize, usize)) -> Vec<u8> {
    let mut shared = Vec::new();
    let mut parts: Vec<(String, String)> = Vec::new();
    let mut sheet_entries = String::new();
    let mut rels = String::new();

    for (i, (name, rows)) in sheets.iter().enumerate() {
        let n = i + 1;
        sheet_entries.push_str(&format!(
            "<sheet name=\"{}\" sheetId=\"{}\" r:id=\"rId{}\"/>",
            name, n, n
        ));
        rels.push_str(&format!(
            "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" Target=\"worksheets/sheet{}.xml\"/>",
            n, n
        ));
        parts.push((format!("xl/worksheets/sheet{}.xml", n), sheet_xml(rows, origin, &mut shared)));
    }

    let workbook = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{}</sheets></workbook>"#,
        sheet_entries
    );
    let workbook_rels = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{}</Relationships>"#,
        rels
    );
    let shared_strings = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{1}</sst>"#,
        shared.len(),
        shared
            .iter()
            .map(|s| format!("<si><t>{}</t></si>", s))
            .collect::<String>()
    );
    let content_types = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/></Types>"#;

    let mut all: Vec<(&str, String)> = vec![
        ("[Content_Types].xml", content_types.to_string()),
        ("xl/workbook.xml", workbook),
        ("xl/_rels/workbook.xml.rels", workbook_rels),
        ("xl/sharedStrings.xml", shared_strings),
    ];
    for (name, content) in &parts {
        all.push((name.as_str(), content.clone()));
    }
    zip_parts(&all)
}

/// DOCX extractor that blocks for a while before extracting, to force a late completion.
pub struct SlowExtractor(pub Duration);

impl TextExtractor for SlowExtractor {
    fn extract_raw_text(&self, bytes: &[u8]) -> anyhow::Result<String> {
        std::thread::sleep(self.0);
        DocxExtractor.extract_raw_text(bytes)
    }
}
