//! The questionnaire layout: which tables carry Q/A rows and where they start.

/// Table 1 holds instructions and is never written to.
pub const RESERVED_TABLE_INDEX: usize = 1;

/// Layout of one questionnaire table. Table index and start row are 1-based;
/// columns are 0-based positions in a row's logical cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    pub table_index: usize,
    pub start_row: usize,
    pub question_column: usize,
    pub answer_column: usize,
    /// Column that receives the generated reply.
    pub target_column: usize,
}

impl TableLayout {
    pub const fn new(table_index: usize, start_row: usize) -> Self {
        Self {
            table_index,
            start_row,
            question_column: 0,
            answer_column: 1,
            target_column: default_target_column(table_index),
        }
    }

    pub fn label(&self) -> String {
        table_label(self.table_index)
    }

    /// 0-based index of the first data row.
    pub fn first_data_row(&self) -> usize {
        self.start_row.saturating_sub(1)
    }
}

/// Table 9 has an extra leading column, so replies go one column further right.
pub const fn default_target_column(table_index: usize) -> usize {
    if table_index == 9 {
        2
    } else {
        1
    }
}

pub fn table_label(table_index: usize) -> String {
    format!("Table_{table_index}")
}

/// Ordered, fixed mapping of table index to layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRowMap {
    layouts: Vec<TableLayout>,
}

const QUESTIONNAIRE_START_ROWS: [(usize, usize); 15] = [
    (2, 4),
    (3, 4),
    (4, 7),
    (5, 6),
    (6, 4),
    (7, 4),
    (8, 4),
    (9, 4),
    (10, 6),
    (11, 4),
    (12, 4),
    (13, 4),
    (14, 4),
    (15, 4),
    (16, 4),
];

impl TableRowMap {
    pub fn new(layouts: Vec<TableLayout>) -> Self {
        Self { layouts }
    }

    /// The layout of the supplier questionnaire this service was built for.
    pub fn questionnaire() -> Self {
        Self::new(
            QUESTIONNAIRE_START_ROWS
                .iter()
                .map(|&(table_index, start_row)| TableLayout::new(table_index, start_row))
                .collect(),
        )
    }

    pub fn layouts(&self) -> &[TableLayout] {
        &self.layouts
    }

    pub fn get(&self, table_index: usize) -> Option<&TableLayout> {
        self.layouts.iter().find(|l| l.table_index == table_index)
    }

    /// Layout used when writing into a table; tables outside the map start at
    /// row 1 with the default target column.
    pub fn layout_for(&self, table_index: usize) -> TableLayout {
        self.get(table_index)
            .copied()
            .unwrap_or_else(|| TableLayout::new(table_index, 1))
    }
}

impl Default for TableRowMap {
    fn default() -> Self {
        Self::questionnaire()
    }
}
