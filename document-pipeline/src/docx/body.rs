use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::cursor::{BodyCursor, CellAddress, Position};
use crate::error::DocumentError;

/// Read model of the main document part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentBody {
    /// Text of each `w:p` directly under `w:body`, in order.
    pub paragraphs: Vec<String>,
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<String>,
    pub grid_span: usize,
    pub vertical_merge: VerticalMerge,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalMerge {
    #[default]
    None,
    Restart,
    Continue,
}

impl Default for TableCell {
    fn default() -> Self {
        Self {
            paragraphs: Vec::new(),
            grid_span: 1,
            vertical_merge: VerticalMerge::None,
        }
    }
}

impl TableCell {
    pub fn text(&self) -> String {
        self.paragraphs.join("\n")
    }
}

impl Table {
    /// Logical cells of every row, as addresses of the physical cell that
    /// answers each grid column.
    ///
    /// A cell spanning several grid columns appears once per column, and a
    /// `vMerge="continue"` cell resolves to the cell it continues.
    pub fn grid(&self, table_index: usize) -> Vec<Vec<CellAddress>> {
        let mut grid: Vec<Vec<CellAddress>> = Vec::with_capacity(self.rows.len());

        for (row_index, row) in self.rows.iter().enumerate() {
            let mut logical = Vec::new();
            for (cell_index, cell) in row.cells.iter().enumerate() {
                let column = logical.len();
                let own = CellAddress {
                    table: table_index,
                    row: row_index,
                    cell: cell_index,
                };
                let address = match cell.vertical_merge {
                    VerticalMerge::Continue => grid
                        .last()
                        .and_then(|above| above.get(column).copied())
                        .unwrap_or(own),
                    _ => own,
                };
                for _ in 0..cell.grid_span.max(1) {
                    logical.push(address);
                }
            }
            grid.push(logical);
        }

        grid
    }

    pub fn cell(&self, address: CellAddress) -> Option<&TableCell> {
        self.rows.get(address.row)?.cells.get(address.cell)
    }
}

impl DocumentBody {
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(false);

        let mut cursor = BodyCursor::new();
        let mut body = DocumentBody::default();
        let mut paragraph: Option<OpenParagraph> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let position = cursor.open(e.name().as_ref());
                    body.enter(position, &e, &mut paragraph, cursor.depth());
                }
                Event::Empty(e) => {
                    if let Some(open) = paragraph.as_mut() {
                        open.push_special(&cursor, &e);
                    }
                    let position = cursor.empty(e.name().as_ref());
                    body.enter(position, &e, &mut paragraph, cursor.depth().saturating_add(1));
                    if matches!(position, Position::BodyParagraph | Position::CellParagraph(_)) {
                        body.finish_paragraph(&mut paragraph);
                    }
                }
                Event::Text(e) => {
                    if let Some(open) = paragraph.as_mut() {
                        if cursor.parent() == Some(b"w:t".as_slice())
                            && !cursor.has_open_since(open.frame.saturating_add(1), b"w:p")
                        {
                            open.text.push_str(&e.unescape()?);
                        }
                    }
                }
                Event::End(_) => {
                    cursor.close();
                    if paragraph.as_ref().is_some_and(|p| p.frame == cursor.depth()) {
                        body.finish_paragraph(&mut paragraph);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(body)
    }

    fn enter(
        &mut self,
        position: Position,
        element: &BytesStart<'_>,
        paragraph: &mut Option<OpenParagraph>,
        depth_inside: usize,
    ) {
        // `depth_inside` is the stack depth once the element is open; the
        // paragraph frame is the index of the `w:p` itself.
        let frame = depth_inside.saturating_sub(1);
        match position {
            Position::BodyParagraph => {
                *paragraph = Some(OpenParagraph::new(ParagraphOwner::Body, frame));
            }
            Position::Table(_) => self.tables.push(Table::default()),
            Position::Row { .. } => {
                if let Some(table) = self.tables.last_mut() {
                    table.rows.push(TableRow::default());
                }
            }
            Position::Cell(_) => {
                if let Some(row) = self.current_row() {
                    row.cells.push(TableCell::default());
                }
            }
            Position::CellParagraph(address) => {
                *paragraph = Some(OpenParagraph::new(ParagraphOwner::Cell(address), frame));
            }
            Position::CellFormat(address) => self.apply_cell_format(address, element),
            Position::CellProperties(_) | Position::Other => {}
        }
    }

    fn current_row(&mut self) -> Option<&mut TableRow> {
        self.tables.last_mut()?.rows.last_mut()
    }

    fn cell_mut(&mut self, address: CellAddress) -> Option<&mut TableCell> {
        self.tables
            .get_mut(address.table)?
            .rows
            .get_mut(address.row)?
            .cells
            .get_mut(address.cell)
    }

    fn apply_cell_format(&mut self, address: CellAddress, element: &BytesStart<'_>) {
        let Some(cell) = self.cell_mut(address) else {
            return;
        };
        match element.name().as_ref() {
            b"w:gridSpan" => {
                cell.grid_span = attribute(element, b"w:val")
                    .and_then(|v| v.parse::<usize>().ok())
                    .unwrap_or(1)
                    .max(1);
            }
            b"w:vMerge" => {
                cell.vertical_merge = match attribute(element, b"w:val").as_deref() {
                    Some("restart") => VerticalMerge::Restart,
                    _ => VerticalMerge::Continue,
                };
            }
            _ => {}
        }
    }

    fn finish_paragraph(&mut self, paragraph: &mut Option<OpenParagraph>) {
        let Some(open) = paragraph.take() else {
            return;
        };
        match open.owner {
            ParagraphOwner::Body => self.paragraphs.push(open.text),
            ParagraphOwner::Cell(address) => {
                if let Some(cell) = self.cell_mut(address) {
                    cell.paragraphs.push(open.text);
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ParagraphOwner {
    Body,
    Cell(CellAddress),
}

#[derive(Debug)]
struct OpenParagraph {
    owner: ParagraphOwner,
    frame: usize,
    text: String,
}

impl OpenParagraph {
    fn new(owner: ParagraphOwner, frame: usize) -> Self {
        Self {
            owner,
            frame,
            text: String::new(),
        }
    }

    /// Run-level elements that stand for characters.
    fn push_special(&mut self, cursor: &BodyCursor, element: &BytesStart<'_>) {
        if cursor.parent() != Some(b"w:r".as_slice()) || cursor.has_open_since(self.frame.saturating_add(1), b"w:p")
        {
            return;
        }
        match element.name().as_ref() {
            b"w:tab" => self.text.push('\t'),
            b"w:cr" => self.text.push('\n'),
            b"w:br" => {
                if attribute(element, b"w:type").map_or(true, |t| t == "textWrapping") {
                    self.text.push('\n');
                }
            }
            b"w:noBreakHyphen" => self.text.push('-'),
            _ => {}
        }
    }
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}
