use std::collections::BTreeMap;
use std::io::Cursor;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::cursor::{BodyCursor, CellAddress, Position};
use crate::error::DocumentError;

/// Replacement paragraphs keyed by the physical cell they land in.
pub type CellEdits = BTreeMap<CellAddress, Vec<String>>;

/// Streams `word/document.xml`, replacing the content of every edited cell
/// with one paragraph per line. Cell properties (`w:tcPr`) survive; all other
/// cell children are dropped. Everything outside edited cells is copied
/// through untouched.
pub fn rewrite_cells(xml: &str, edits: &CellEdits) -> Result<String, DocumentError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(xml.len())));
    let mut cursor = BodyCursor::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match cursor.open(e.name().as_ref()) {
                Position::Cell(address) if edits.contains_key(&address) => {
                    writer.write_event(Event::Start(e.clone()))?;
                    copy_cell_properties(&mut reader, &mut writer)?;
                    write_paragraphs(&mut writer, edits.get(&address))?;
                    writer.write_event(Event::End(e.to_end()))?;
                    cursor.close();
                }
                _ => writer.write_event(Event::Start(e))?,
            },
            Event::Empty(e) => match cursor.empty(e.name().as_ref()) {
                Position::Cell(address) if edits.contains_key(&address) => {
                    writer.write_event(Event::Start(e.clone()))?;
                    write_paragraphs(&mut writer, edits.get(&address))?;
                    writer.write_event(Event::End(e.to_end()))?;
                }
                _ => writer.write_event(Event::Empty(e))?,
            },
            Event::End(e) => {
                cursor.close();
                writer.write_event(Event::End(e))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|_| DocumentError::Encoding("rewritten document".into()))
}

/// Consumes the body of an open `w:tc` up to and including its end tag,
/// writing only its direct `w:tcPr` subtree.
fn copy_cell_properties(
    reader: &mut Reader<&[u8]>,
    writer: &mut Writer<Cursor<Vec<u8>>>,
) -> Result<(), DocumentError> {
    let mut depth = 0usize;
    let mut in_properties = false;

    loop {
        let event = reader.read_event()?;
        match &event {
            Event::Start(e) => {
                if depth == 0 && e.name().as_ref() == b"w:tcPr" {
                    in_properties = true;
                }
                depth = depth.saturating_add(1);
            }
            Event::Empty(e) => {
                if depth == 0 && e.name().as_ref() == b"w:tcPr" {
                    writer.write_event(&event)?;
                    continue;
                }
            }
            Event::End(_) => {
                if depth == 0 {
                    return Ok(());
                }
                depth = depth.saturating_sub(1);
                if depth == 0 && in_properties {
                    writer.write_event(&event)?;
                    in_properties = false;
                    continue;
                }
            }
            Event::Eof => return Ok(()),
            _ => {}
        }
        if in_properties {
            writer.write_event(&event)?;
        }
    }
}

fn write_paragraphs(
    writer: &mut Writer<Cursor<Vec<u8>>>,
    lines: Option<&Vec<String>>,
) -> Result<(), DocumentError> {
    let empty = [String::new()];
    let lines = match lines {
        Some(lines) if !lines.is_empty() => lines.as_slice(),
        _ => &empty,
    };

    for line in lines {
        writer.write_event(Event::Start(BytesStart::new("w:p")))?;
        if !line.is_empty() {
            writer.write_event(Event::Start(BytesStart::new("w:r")))?;
            let mut text = BytesStart::new("w:t");
            text.push_attribute(("xml:space", "preserve"));
            writer.write_event(Event::Start(text))?;
            writer.write_event(Event::Text(BytesText::new(line)))?;
            writer.write_event(Event::End(BytesEnd::new("w:t")))?;
            writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("w:p")))?;
    }
    Ok(())
}
