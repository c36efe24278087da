//! Pure translation of parsed records into AnkiConnect and Notion payloads.

use crate::parser::extract_note_title;
use crate::types::{
    Block, FlashcardRecord, NoteDocument, ANKI_BASIC_MODEL, ANKI_CONNECT_VERSION, APP_TAG,
    NOTION_RICH_TEXT_LIMIT,
};
use crate::util::chunk_chars;
use serde_json::{json, Value};

pub fn anki_request(action: &str, params: Option<Value>) -> Value {
    match params {
        Some(params) => json!({
            "action": action,
            "version": ANKI_CONNECT_VERSION,
            "params": params,
        }),
        None => json!({
            "action": action,
            "version": ANKI_CONNECT_VERSION,
        }),
    }
}

pub fn build_create_deck_payload(deck_name: &str) -> Value {
    anki_request("createDeck", Some(json!({ "deck": deck_name })))
}

/// The application tag always leads, followed by the record's own tags.
pub fn build_add_note_payload(deck_name: &str, record: &FlashcardRecord) -> Value {
    let mut tags = Vec::with_capacity(record.tags.len() + 1);
    tags.push(APP_TAG.to_string());
    tags.extend(record.tags.iter().cloned());

    anki_request(
        "addNote",
        Some(json!({
            "note": {
                "deckName": deck_name,
                "modelName": ANKI_BASIC_MODEL,
                "fields": {
                    "Front": record.front,
                    "Back": record.back,
                },
                "tags": tags,
            }
        })),
    )
}

/// Line-oriented markdown translation. Blank lines are dropped; every other
/// line becomes exactly one block, in input order.
pub fn markdown_to_blocks(text: &str) -> Vec<Block> {
    text.lines().filter_map(line_to_block).collect()
}

fn line_to_block(line: &str) -> Option<Block> {
    if let Some(rest) = line.strip_prefix("### ") {
        return Some(Block::Heading(rest.to_string()));
    }
    if line.len() >= 4 && line.starts_with("**") && line.ends_with("**") {
        return Some(Block::BoldParagraph(line.replace("**", "")));
    }
    if line.trim().starts_with("- ") {
        return Some(Block::BulletItem(line.replacen("- ", "", 1)));
    }
    if line.trim().is_empty() {
        return None;
    }
    Some(Block::Paragraph(line.to_string()))
}

pub fn build_note_document(text: &str, title: Option<&str>) -> NoteDocument {
    let title = title
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| extract_note_title(text));
    NoteDocument {
        title,
        body_blocks: markdown_to_blocks(text),
    }
}

/// Notion caps each rich-text item, so long lines travel as consecutive
/// spans that concatenate back to the full text.
fn rich_text(content: &str, bold: bool) -> Vec<Value> {
    chunk_chars(content, NOTION_RICH_TEXT_LIMIT)
        .into_iter()
        .map(|piece| {
            let mut span = json!({ "type": "text", "text": { "content": piece } });
            if bold {
                span["annotations"] = json!({ "bold": true });
            }
            span
        })
        .collect()
}

pub fn block_to_json(block: &Block) -> Value {
    let kind = match block {
        Block::Heading(_) => "heading_3",
        Block::BulletItem(_) => "bulleted_list_item",
        Block::BoldParagraph(_) | Block::Paragraph(_) => "paragraph",
    };
    let spans = rich_text(block.text(), matches!(block, Block::BoldParagraph(_)));

    let mut value = json!({ "object": "block", "type": kind });
    value[kind] = json!({ "rich_text": spans });
    value
}

pub fn build_page_payload(database_id: &str, document: &NoteDocument) -> Value {
    json!({
        "parent": { "database_id": database_id },
        "properties": {
            "Name": {
                "title": rich_text(&document.title, false)
            },
            "Tags": {
                "multi_select": [{ "name": APP_TAG }]
            }
        },
        "children": document.body_blocks.iter().map(block_to_json).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(front: &str, back: &str, tags: &[&str]) -> FlashcardRecord {
        FlashcardRecord {
            front: front.to_string(),
            back: back.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    #[test]
    fn add_note_payload_matches_anki_connect_shape() {
        let payload = build_add_note_payload("SecPlus", &record("Q", "A", &["Net", "Ports"]));

        assert_eq!(payload["action"], "addNote");
        assert_eq!(payload["version"], 6);
        let note = &payload["params"]["note"];
        assert_eq!(note["deckName"], "SecPlus");
        assert_eq!(note["modelName"], "Basic");
        assert_eq!(note["fields"]["Front"], "Q");
        assert_eq!(note["fields"]["Back"], "A");
        assert_eq!(note["tags"], json!(["CyberSentinel", "Net", "Ports"]));
    }

    #[test]
    fn record_without_tags_keeps_only_app_tag() {
        let payload = build_add_note_payload("Deck", &record("first", "1", &[]));
        assert_eq!(payload["params"]["note"]["tags"], json!(["CyberSentinel"]));
    }

    #[test]
    fn version_request_has_no_params() {
        let payload = anki_request("version", None);
        assert_eq!(payload, json!({ "action": "version", "version": 6 }));
        assert_eq!(build_create_deck_payload("D")["params"]["deck"], "D");
    }

    #[test]
    fn sample_note_translates_to_expected_blocks() {
        let text = "### SQL Injection\n**Key Concepts:**\n- Concept A: desc";
        assert!(crate::parser::is_note_document(text));
        assert_eq!(
            markdown_to_blocks(text),
            vec![
                Block::Heading("SQL Injection".to_string()),
                Block::BoldParagraph("Key Concepts:".to_string()),
                Block::BulletItem("Concept A: desc".to_string()),
            ]
        );
    }

    #[test]
    fn blank_lines_drop_and_order_is_preserved() {
        let text = "first line\n\n   \n  - indented bullet\n**Track:** Track 2\nlast";
        let blocks = markdown_to_blocks(text);
        let non_blank = text.lines().filter(|line| !line.trim().is_empty()).count();

        assert_eq!(blocks.len(), non_blank);
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph("first line".to_string()),
                Block::BulletItem("  indented bullet".to_string()),
                Block::Paragraph("**Track:** Track 2".to_string()),
                Block::Paragraph("last".to_string()),
            ]
        );
    }

    #[test]
    fn bold_line_strips_every_marker() {
        assert_eq!(
            markdown_to_blocks("**Practical **Application:**"),
            vec![Block::BoldParagraph("Practical Application:".to_string())]
        );
    }

    #[test]
    fn bare_bold_markers_stay_plain_paragraphs() {
        assert_eq!(markdown_to_blocks("**"), vec![Block::Paragraph("**".to_string())]);
        assert_eq!(markdown_to_blocks("***"), vec![Block::Paragraph("***".to_string())]);
        assert_eq!(
            markdown_to_blocks("****"),
            vec![Block::BoldParagraph(String::new())]
        );
    }

    fn sent_text(block: &Value) -> String {
        let kind = block["type"].as_str().expect("block type");
        block[kind]["rich_text"]
            .as_array()
            .expect("rich_text array")
            .iter()
            .map(|span| span["text"]["content"].as_str().expect("span content"))
            .collect()
    }

    #[test]
    fn long_lines_are_split_into_spans_without_losing_text() {
        let medium = "a".repeat(1900);
        let long = "b".repeat(4500);
        let blocks = markdown_to_blocks(&format!("{medium}\n- {long}"));

        let first = block_to_json(&blocks[0]);
        assert_eq!(first["paragraph"]["rich_text"].as_array().map(Vec::len), Some(1));
        assert_eq!(sent_text(&first), medium);

        let second = block_to_json(&blocks[1]);
        let spans = second["bulleted_list_item"]["rich_text"].as_array().expect("spans");
        assert_eq!(spans.len(), 3);
        assert!(spans
            .iter()
            .all(|span| span["text"]["content"].as_str().map_or(0, |text| text.chars().count()) <= 2000));
        assert_eq!(sent_text(&second), long);
    }

    #[test]
    fn long_bold_line_marks_every_span() {
        let block = block_to_json(&Block::BoldParagraph("x".repeat(2500)));
        let spans = block["paragraph"]["rich_text"].as_array().expect("spans");
        assert_eq!(spans.len(), 2);
        assert!(spans.iter().all(|span| span["annotations"]["bold"] == true));
    }

    #[test]
    fn block_json_uses_notion_types() {
        let heading = block_to_json(&Block::Heading("H".to_string()));
        assert_eq!(heading["type"], "heading_3");
        assert_eq!(heading["heading_3"]["rich_text"][0]["text"]["content"], "H");

        let bold = block_to_json(&Block::BoldParagraph("B".to_string()));
        assert_eq!(bold["type"], "paragraph");
        assert_eq!(bold["paragraph"]["rich_text"][0]["annotations"]["bold"], true);

        let bullet = block_to_json(&Block::BulletItem("L".to_string()));
        assert_eq!(bullet["type"], "bulleted_list_item");

        let plain = block_to_json(&Block::Paragraph("P".to_string()));
        assert!(plain["paragraph"]["rich_text"][0].get("annotations").is_none());
    }

    #[test]
    fn page_payload_carries_parent_title_tag_and_children() {
        let document = build_note_document("### Kerberos\n**Key Concepts:**\n- TGT", None);
        let payload = build_page_payload("db-42", &document);

        assert_eq!(payload["parent"]["database_id"], "db-42");
        assert_eq!(
            payload["properties"]["Name"]["title"][0]["text"]["content"],
            "Kerberos"
        );
        assert_eq!(
            payload["properties"]["Tags"]["multi_select"][0]["name"],
            "CyberSentinel"
        );
        assert_eq!(payload["children"].as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn explicit_title_overrides_heading() {
        let document = build_note_document("### Heading\nbody", Some("  Custom  "));
        assert_eq!(document.title, "Custom");
    }
}
