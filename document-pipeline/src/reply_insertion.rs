use common::{error::AppError, storage::reply_store::BotReplyStore};
use tracing::{debug, info};

use crate::docx::{CellEdits, Document};
use crate::reply_cleaner::clean_bot_reply;
use crate::row_map::{table_label, TableRowMap, RESERVED_TABLE_INDEX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionOutcome {
    pub inserted: usize,
}

/// Writes each table's replies into its target column, one reply per data
/// row, and applies the result to `document`.
///
/// Rows are paired with replies in lockstep from the layout's start row. A
/// row too short to reach the target column is skipped but still consumes
/// its reply.
pub fn insert_bot_replies(
    document: &mut Document,
    row_map: &TableRowMap,
    store: &BotReplyStore,
) -> Result<InsertionOutcome, AppError> {
    let mut edits = CellEdits::new();
    let mut inserted = 0usize;

    for (position, table) in document.body().tables.iter().enumerate() {
        let table_index = position.saturating_add(1);
        if table_index == RESERVED_TABLE_INDEX {
            continue;
        }

        let label = table_label(table_index);
        let Some(replies) = store.replies_for(&label)? else {
            debug!(table_index, "Skipping table, not in reply store");
            continue;
        };
        if replies.is_empty() {
            continue;
        }

        let layout = row_map.layout_for(table_index);
        if table.rows.len() < layout.start_row {
            info!(table_index, rows = table.rows.len(), "Skipping table, not enough rows");
            continue;
        }

        let grid = table.grid(position);
        for (slot, cells) in grid.iter().skip(layout.first_data_row()).enumerate() {
            let Some(reply) = replies.get(slot) else {
                break;
            };
            let Some(address) = cells.get(layout.target_column) else {
                info!(
                    table_index,
                    row = slot.saturating_add(layout.start_row),
                    "Skipping row, cell index out of range"
                );
                continue;
            };

            let lines = clean_bot_reply(reply.reply_text())
                .split('\n')
                .map(|line| line.trim().to_string())
                .collect();
            edits.insert(*address, lines);
            inserted = inserted.saturating_add(1);
        }
    }

    document.apply_cell_edits(&edits)?;
    info!(inserted, "Inserted replies into document");
    Ok(InsertionOutcome { inserted })
}
