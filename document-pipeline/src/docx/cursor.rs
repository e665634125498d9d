//! Structural position tracking over the `word/document.xml` event stream.
//!
//! Reading and rewriting walk the same events, so both use [`BodyCursor`] to
//! agree on what "table 3, row 5, cell 1" means. Only tables that are direct
//! children of `w:body` are addressed; nested tables and content controls are
//! reported as [`Position::Other`].

/// Physical address of a `w:tc` element, all indices 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    pub table: usize,
    pub row: usize,
    pub cell: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    BodyParagraph,
    Table(usize),
    Row { table: usize, row: usize },
    Cell(CellAddress),
    CellParagraph(CellAddress),
    CellProperties(CellAddress),
    /// `w:gridSpan` or `w:vMerge` of an addressed cell.
    CellFormat(CellAddress),
    Other,
}

#[derive(Debug, Default)]
pub struct BodyCursor {
    stack: Vec<Vec<u8>>,
    tables_seen: usize,
    /// Stack index of the open top-level `w:tbl`.
    table_frame: Option<usize>,
    current_table: usize,
    current_row: Option<usize>,
    current_cell: Option<usize>,
}

impl BodyCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies a start tag and enters it.
    pub fn open(&mut self, name: &[u8]) -> Position {
        let position = self.classify(name);
        self.stack.push(name.to_vec());
        position
    }

    pub fn close(&mut self) {
        self.stack.pop();
        if self.table_frame == Some(self.stack.len()) {
            self.table_frame = None;
        }
    }

    /// Classifies a self-closing tag without entering it.
    pub fn empty(&mut self, name: &[u8]) -> Position {
        let position = self.open(name);
        self.close();
        position
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn parent(&self) -> Option<&[u8]> {
        self.stack.last().map(Vec::as_slice)
    }

    /// Whether any open element at or above `from` is named `name`.
    pub fn has_open_since(&self, from: usize, name: &[u8]) -> bool {
        self.stack
            .get(from..)
            .is_some_and(|open| open.iter().any(|n| n == name))
    }

    fn classify(&mut self, name: &[u8]) -> Position {
        let depth = self.stack.len();
        let parent = self.parent().map(<[u8]>::to_vec);
        let parent_is = |tag: &[u8]| parent.as_deref() == Some(tag);

        if parent_is(b"w:body") {
            return match name {
                b"w:p" => Position::BodyParagraph,
                b"w:tbl" => {
                    let index = self.tables_seen;
                    self.tables_seen = index.saturating_add(1);
                    self.table_frame = Some(depth);
                    self.current_table = index;
                    self.current_row = None;
                    Position::Table(index)
                }
                _ => Position::Other,
            };
        }

        let Some(frame) = self.table_frame else {
            return Position::Other;
        };

        match (name, depth.saturating_sub(frame)) {
            (b"w:tr", 1) => {
                let row = self.current_row.map_or(0, |r| r.saturating_add(1));
                self.current_row = Some(row);
                self.current_cell = None;
                Position::Row {
                    table: self.current_table,
                    row,
                }
            }
            (b"w:tc", 2) if parent_is(b"w:tr") => {
                let cell = self.current_cell.map_or(0, |c| c.saturating_add(1));
                self.current_cell = Some(cell);
                self.cell_address()
                    .map_or(Position::Other, Position::Cell)
            }
            (b"w:p", 3) if parent_is(b"w:tc") => self
                .cell_address()
                .map_or(Position::Other, Position::CellParagraph),
            (b"w:tcPr", 3) if parent_is(b"w:tc") => self
                .cell_address()
                .map_or(Position::Other, Position::CellProperties),
            (b"w:gridSpan" | b"w:vMerge", 4) if parent_is(b"w:tcPr") => self
                .cell_address()
                .map_or(Position::Other, Position::CellFormat),
            _ => Position::Other,
        }
    }

    fn cell_address(&self) -> Option<CellAddress> {
        Some(CellAddress {
            table: self.current_table,
            row: self.current_row?,
            cell: self.current_cell?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addresses_top_level_cells_and_ignores_nested_tables() {
        let mut cursor = BodyCursor::new();
        cursor.open(b"w:document");
        cursor.open(b"w:body");
        assert_eq!(cursor.open(b"w:p"), Position::BodyParagraph);
        cursor.close();

        assert_eq!(cursor.open(b"w:tbl"), Position::Table(0));
        assert_eq!(cursor.open(b"w:tr"), Position::Row { table: 0, row: 0 });
        let first = CellAddress { table: 0, row: 0, cell: 0 };
        assert_eq!(cursor.open(b"w:tc"), Position::Cell(first));
        assert_eq!(cursor.open(b"w:tcPr"), Position::CellProperties(first));
        assert_eq!(cursor.empty(b"w:gridSpan"), Position::CellFormat(first));
        cursor.close();
        assert_eq!(cursor.open(b"w:p"), Position::CellParagraph(first));
        cursor.close();

        // nested table inside the first cell
        assert_eq!(cursor.open(b"w:tbl"), Position::Other);
        assert_eq!(cursor.open(b"w:tr"), Position::Other);
        assert_eq!(cursor.open(b"w:tc"), Position::Other);
        assert_eq!(cursor.open(b"w:p"), Position::Other);
        cursor.close();
        cursor.close();
        cursor.close();
        cursor.close();

        cursor.close(); // first w:tc
        let second = CellAddress { table: 0, row: 0, cell: 1 };
        assert_eq!(cursor.empty(b"w:tc"), Position::Cell(second));
        cursor.close(); // w:tr
        assert_eq!(cursor.open(b"w:tr"), Position::Row { table: 0, row: 1 });
        cursor.close();
        cursor.close(); // w:tbl

        assert_eq!(cursor.open(b"w:tbl"), Position::Table(1));
        assert_eq!(cursor.open(b"w:tr"), Position::Row { table: 1, row: 0 });
    }

    #[test]
    fn tables_inside_content_controls_are_not_addressed() {
        let mut cursor = BodyCursor::new();
        cursor.open(b"w:body");
        cursor.open(b"w:sdt");
        cursor.open(b"w:sdtContent");
        assert_eq!(cursor.open(b"w:tbl"), Position::Other);
        assert_eq!(cursor.open(b"w:tr"), Position::Other);
    }
}
