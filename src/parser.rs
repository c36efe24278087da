//! Best-effort extraction of flashcards and note documents from model replies.
//!
//! Nothing in here fails: text that does not match simply yields an empty
//! result, which disables the corresponding sync action.

use crate::types::FlashcardRecord;
use crate::util::today_local;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static FLASHCARD_ROW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""(.*?)"\s*;\s*"(.*?)"\s*;\s*"(.*?)""#).expect("valid flashcard row regex")
});
static HEADING3_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^### (.*)$").expect("valid heading regex"));

pub const HEADING3_MARKER: &str = "###";
pub const KEY_CONCEPTS_MARKER: &str = "**Key Concepts:**";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedResponse {
    pub flashcards: Vec<FlashcardRecord>,
    pub is_note: bool,
}

pub fn parse_response(text: &str) -> ParsedResponse {
    ParsedResponse {
        flashcards: parse_flashcards(text),
        is_note: is_note_document(text),
    }
}

/// Scans for `"front";"back";"tag, tag"` rows. Rows with a missing field or
/// unbalanced quotes produce no match and are skipped.
pub fn parse_flashcards(text: &str) -> Vec<FlashcardRecord> {
    FLASHCARD_ROW_RE
        .captures_iter(text)
        .map(|caps| FlashcardRecord {
            front: caps[1].to_string(),
            back: caps[2].to_string(),
            tags: caps[3].split(',').map(|tag| tag.trim().to_string()).collect(),
        })
        .collect()
}

pub fn is_note_document(text: &str) -> bool {
    text.contains(HEADING3_MARKER) && text.contains(KEY_CONCEPTS_MARKER)
}

pub fn extract_note_title(text: &str) -> String {
    HEADING3_RE
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| format!("Study Notes - {}", today_local()))
}
