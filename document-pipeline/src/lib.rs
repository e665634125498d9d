#![allow(clippy::missing_docs_in_private_items)]

pub mod docx;
pub mod error;
pub mod qa_extraction;
pub mod reply_cleaner;
pub mod reply_insertion;
pub mod row_map;
pub mod transcript;

pub use docx::Document;
pub use error::DocumentError;
pub use qa_extraction::{extract_qa_pairs, QaRecord, QaResultSet};
pub use reply_cleaner::clean_bot_reply;
pub use reply_insertion::{insert_bot_replies, InsertionOutcome};
pub use row_map::{table_label, TableLayout, TableRowMap};
pub use transcript::{extract_transcript, transcript_text, TranscriptFragment};
