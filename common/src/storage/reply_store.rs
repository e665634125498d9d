use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::AppError;

/// Externally produced `{tables: {"Table_N": [{bot_reply, ...}]}}` side-file.
///
/// Tables are kept as raw JSON so that listing the store returns exactly what
/// was written, in file order. Records are decoded on demand by
/// [`BotReplyStore::replies_for`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BotReplyStore {
    #[serde(default)]
    pub tables: Map<String, Value>,
}

/// One reply slot. Fields besides `bot_reply` are carried through untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BotReplyRecord {
    #[serde(default)]
    pub bot_reply: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BotReplyRecord {
    pub fn reply_text(&self) -> &str {
        self.bot_reply.as_deref().unwrap_or_default()
    }
}

impl BotReplyStore {
    pub async fn load(path: &Path) -> Result<Self, AppError> {
        if !tokio::fs::try_exists(path).await? {
            return Err(AppError::NotFound(format!(
                "Bot replies JSON file not found at {}",
                path.display()
            )));
        }

        let raw = tokio::fs::read_to_string(path).await?;
        let store = Self::from_json(&raw)?;
        debug!(path = %path.display(), tables = store.tables.len(), "Loaded bot reply store");
        Ok(store)
    }

    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.tables.contains_key(label)
    }

    /// Decoded replies for a table label, or `None` when the label is absent.
    /// A null, false, zero or empty entry reads as an empty list.
    pub fn replies_for(&self, label: &str) -> Result<Option<Vec<BotReplyRecord>>, AppError> {
        self.tables
            .get(label)
            .map(|value| {
                if is_falsy(value) {
                    return Ok(Vec::new());
                }
                serde_json::from_value::<Vec<BotReplyRecord>>(value.clone()).map_err(|e| {
                    AppError::Validation(format!("Malformed replies for {label}: {e}"))
                })
            })
            .transpose()
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replies_keep_extra_fields_and_tolerate_missing_reply() {
        let store = BotReplyStore::from_json(
            &json!({
                "tables": {
                    "Table_2": [
                        {"bot_reply": "Yes", "question": "Q1"},
                        {"question": "Q2"},
                        {"bot_reply": null}
                    ]
                }
            })
            .to_string(),
        )
        .expect("store should parse");

        let replies = store
            .replies_for("Table_2")
            .expect("replies should decode")
            .expect("table should exist");

        assert_eq!(replies.len(), 3);
        assert_eq!(replies[0].reply_text(), "Yes");
        assert_eq!(replies[0].extra.get("question"), Some(&json!("Q1")));
        assert_eq!(replies[1].reply_text(), "");
        assert_eq!(replies[2].reply_text(), "");
        assert!(store.replies_for("Table_3").expect("lookup").is_none());
    }

    #[test]
    fn table_order_follows_file_order() {
        let store = BotReplyStore::from_json(
            r#"{"tables": {"Table_10": [], "Table_2": [], "Table_9": []}}"#,
        )
        .expect("store should parse");
        let labels: Vec<&String> = store.tables.keys().collect();
        assert_eq!(labels, ["Table_10", "Table_2", "Table_9"]);
    }

    #[test]
    fn non_list_table_is_a_validation_error() {
        let store = BotReplyStore::from_json(r#"{"tables": {"Table_2": "oops"}}"#)
            .expect("store should parse");
        assert!(matches!(
            store.replies_for("Table_2"),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn empty_like_table_entries_read_as_no_replies() {
        let store = BotReplyStore::from_json(
            r#"{"tables": {"Table_2": null, "Table_3": false, "Table_4": 0, "Table_5": "", "Table_6": {}}}"#,
        )
        .expect("store should parse");
        for label in ["Table_2", "Table_3", "Table_4", "Table_5", "Table_6"] {
            let replies = store.replies_for(label).expect("lookup should succeed");
            assert_eq!(replies, Some(Vec::new()), "{label}");
        }
    }

    #[tokio::test]
    async fn load_reports_missing_file_as_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.json");
        let err = BotReplyStore::load(&path).await.expect_err("should fail");
        match err {
            AppError::NotFound(message) => {
                assert!(message.starts_with("Bot replies JSON file not found at"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn load_reads_store_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("replies.json");
        tokio::fs::write(&path, r#"{"tables": {"Table_4": [{"bot_reply": "ok"}]}}"#)
            .await
            .expect("write store");

        let store = BotReplyStore::load(&path).await.expect("store should load");
        assert!(store.contains("Table_4"));
    }
}
