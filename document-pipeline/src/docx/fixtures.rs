//! In-memory `.docx` builder for tests.
#![allow(clippy::expect_used)]

use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::escape::escape;
use zip::{write::SimpleFileOptions, ZipWriter};

use super::package::DOCUMENT_PART;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

enum Block {
    Paragraph(String),
    Table(Vec<Vec<String>>),
}

/// Builds a document of body paragraphs and simple grid tables. A `\n` in a
/// cell's text starts a new paragraph inside that cell.
#[derive(Default)]
pub struct DocxBuilder {
    blocks: Vec<Block>,
}

impl DocxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn paragraph(mut self, text: &str) -> Self {
        self.blocks.push(Block::Paragraph(text.to_string()));
        self
    }

    #[must_use]
    pub fn table(mut self, rows: &[&[&str]]) -> Self {
        self.blocks.push(Block::Table(
            rows.iter()
                .map(|row| row.iter().map(|c| (*c).to_string()).collect())
                .collect(),
        ));
        self
    }

    /// Adds `count` single-row placeholder tables.
    #[must_use]
    pub fn filler_tables(mut self, count: usize) -> Self {
        for index in 0..count {
            let label = format!("filler {index}");
            self = self.table(&[&[label.as_str()]]);
        }
        self
    }

    pub fn document_xml(&self) -> String {
        let mut body = String::new();
        for block in &self.blocks {
            match block {
                Block::Paragraph(text) => body.push_str(&paragraph_xml(text)),
                Block::Table(rows) => {
                    body.push_str("<w:tbl><w:tblPr><w:tblW w:w=\"0\" w:type=\"auto\"/></w:tblPr>");
                    for row in rows {
                        body.push_str("<w:tr>");
                        for cell in row {
                            body.push_str("<w:tc><w:tcPr><w:tcW w:w=\"2000\" w:type=\"dxa\"/></w:tcPr>");
                            for line in cell.split('\n') {
                                body.push_str(&paragraph_xml(line));
                            }
                            body.push_str("</w:tc>");
                        }
                        body.push_str("</w:tr>");
                    }
                    body.push_str("</w:tbl>");
                }
            }
        }

        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}<w:sectPr/></w:body></w:document>"#
        )
    }

    pub fn build(&self) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", ROOT_RELS.to_string()),
            (DOCUMENT_PART, self.document_xml()),
        ] {
            writer
                .start_file(name, SimpleFileOptions::default()).expect("start fixture part");
            writer
                .write_all(data.as_bytes())
                .expect("write fixture part");
        }
        writer.finish().expect("finish fixture archive").into_inner()
    }

    pub fn write_to(&self, path: &Path) {
        std::fs::write(path, self.build()).expect("write fixture document");
    }
}

fn paragraph_xml(text: &str) -> String {
    if text.is_empty() {
        "<w:p/>".to_string()
    } else {
        format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape(text)
        )
    }
}
