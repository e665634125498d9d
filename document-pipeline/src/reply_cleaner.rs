use std::sync::LazyLock;

use regex::Regex;

static URL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(https?://\S+|www\.\S+)").expect("regex is compile-time constant"));

// Non-greedy and unaware of nesting; unmatched brackets can over-strip.
static BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[.*?\]").expect("regex is compile-time constant"));

/// Strips links and `[...]` annotations from a generated reply.
pub fn clean_bot_reply(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let without_links = URL_TOKEN.replace_all(text, "");
    let without_notes = BRACKETED.replace_all(&without_links, "");
    without_notes.trim().to_string()
}
