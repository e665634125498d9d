use serde::Serialize;

use crate::docx::{DocumentBody, TableCell};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptFragment {
    pub id: String,
    pub text: String,
}

/// Flattens a document into numbered text fragments: body paragraphs first,
/// then every logical table cell in table, row, grid column order. A cell
/// spanning several columns, or continued by a vertical merge, is repeated
/// once per grid position. Blank text is skipped and does not consume an id.
pub fn extract_transcript(body: &DocumentBody) -> Vec<TranscriptFragment> {
    let cell_texts = body.tables.iter().enumerate().flat_map(|(index, table)| {
        table
            .grid(index)
            .into_iter()
            .flatten()
            .filter_map(move |address| table.cell(address))
            .map(TableCell::text)
    });

    body.paragraphs
        .iter()
        .cloned()
        .chain(cell_texts)
        .filter_map(|text| {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .enumerate()
        .map(|(index, text)| TranscriptFragment {
            id: format!("msg{}", index.saturating_add(1)),
            text,
        })
        .collect()
}

/// Non-blank body paragraphs, trimmed and joined by newlines. Table text is
/// not part of the running transcript.
pub fn transcript_text(body: &DocumentBody) -> String {
    body.paragraphs
        .iter()
        .map(|paragraph| paragraph.trim())
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::{fixtures::DocxBuilder, Document};

    fn body_of(builder: &DocxBuilder) -> DocumentBody {
        Document::from_bytes(&builder.build())
            .expect("fixture should load")
            .body()
            .clone()
    }

    fn texts(fragments: &[TranscriptFragment]) -> Vec<&str> {
        fragments.iter().map(|f| f.text.as_str()).collect()
    }

    #[test]
    fn numbers_paragraphs_before_cells() {
        let body = body_of(
            &DocxBuilder::new()
                .paragraph("Speaker 1: hello")
                .table(&[&["", "  cell text  "]])
                .paragraph("   ")
                .paragraph("Speaker 2: hi"),
        );

        let fragments = extract_transcript(&body);
        let ids: Vec<&str> = fragments.iter().map(|f| f.id.as_str()).collect();

        assert_eq!(ids, ["msg1", "msg2", "msg3"]);
        assert_eq!(texts(&fragments), ["Speaker 1: hello", "Speaker 2: hi", "cell text"]);
    }

    #[test]
    fn merged_cells_repeat_per_grid_position() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
            <w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
              <w:tbl>
                <w:tr>
                  <w:tc><w:tcPr><w:gridSpan w:val="2"/></w:tcPr><w:p><w:r><w:t>Header</w:t></w:r></w:p></w:tc>
                  <w:tc><w:tcPr><w:vMerge w:val="restart"/></w:tcPr><w:p><w:r><w:t>Top</w:t></w:r></w:p></w:tc>
                </w:tr>
                <w:tr>
                  <w:tc><w:p><w:r><w:t>x</w:t></w:r></w:p></w:tc>
                  <w:tc><w:p><w:r><w:t>y</w:t></w:r></w:p></w:tc>
                  <w:tc><w:tcPr><w:vMerge/></w:tcPr><w:p/></w:tc>
                </w:tr>
              </w:tbl>
            </w:body></w:document>"#;
        let body = DocumentBody::parse(xml).expect("body should parse");

        let fragments = extract_transcript(&body);

        assert_eq!(texts(&fragments), ["Header", "Header", "Top", "x", "y", "Top"]);
        assert_eq!(fragments.last().map(|f| f.id.as_str()), Some("msg6"));
    }

    #[test]
    fn empty_document_has_no_fragments() {
        let body = body_of(&DocxBuilder::new().paragraph("").table(&[&["", " "]]));
        assert!(extract_transcript(&body).is_empty());
    }

    #[test]
    fn transcript_text_keeps_paragraphs_only() {
        let body = body_of(
            &DocxBuilder::new()
                .paragraph("  hello world ")
                .paragraph("   ")
                .table(&[&["Name", "Signature"]])
                .paragraph("bye"),
        );
        assert_eq!(transcript_text(&body), "hello world\nbye");
    }
}
