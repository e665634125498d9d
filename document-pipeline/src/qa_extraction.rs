use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::info;

use crate::docx::{CellAddress, DocumentBody, Table};
use crate::error::DocumentError;
use crate::row_map::TableRowMap;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQa {
    pub label: String,
    pub records: Vec<QaRecord>,
}

/// Q/A records per table label, in row-map order. Serializes as a JSON
/// object keyed by label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaResultSet {
    pub tables: Vec<TableQa>,
}

impl QaResultSet {
    pub fn get(&self, label: &str) -> Option<&[QaRecord]> {
        self.tables
            .iter()
            .find(|t| t.label == label)
            .map(|t| t.records.as_slice())
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.label.as_str())
    }
}

impl Serialize for QaResultSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tables.len()))?;
        for table in &self.tables {
            map.serialize_entry(&table.label, &table.records)?;
        }
        map.end()
    }
}

/// Walks every mapped table from its start row and pairs the layout's
/// question and answer columns.
pub fn extract_qa_pairs(
    body: &DocumentBody,
    row_map: &TableRowMap,
) -> Result<QaResultSet, DocumentError> {
    if body.tables.is_empty() {
        return Err(DocumentError::NoTables);
    }

    let mut results = QaResultSet::default();
    for layout in row_map.layouts() {
        let Some(table) = body.tables.get(layout.table_index.saturating_sub(1)) else {
            info!(table_index = layout.table_index, "Table not found in document");
            continue;
        };

        let grid = table.grid(layout.table_index.saturating_sub(1));
        let records: Vec<QaRecord> = grid
            .iter()
            .skip(layout.first_data_row())
            .filter_map(|cells| {
                let question = logical_cell_text(table, cells, layout.question_column);
                let answer = logical_cell_text(table, cells, layout.answer_column);
                (!question.is_empty() || !answer.is_empty()).then_some(QaRecord { question, answer })
            })
            .collect();

        info!(
            table_index = layout.table_index,
            start_row = layout.start_row,
            records = records.len(),
            "Extracted Q/A rows"
        );
        results.tables.push(TableQa {
            label: layout.label(),
            records,
        });
    }

    Ok(results)
}

/// Trimmed text at a logical column, empty when the row is too short.
fn logical_cell_text(table: &Table, cells: &[CellAddress], column: usize) -> String {
    cells
        .get(column)
        .and_then(|address| table.cell(*address))
        .map(|cell| cell.text().trim().to_string())
        .unwrap_or_default()
}
