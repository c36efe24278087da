use crate::parser::{extract_note_title, parse_response, ParsedResponse};
use crate::payload::markdown_to_blocks;
use crate::types::Block;
use serde_json::json;

pub fn run(text: &str, as_json: bool) -> anyhow::Result<()> {
    let parsed = parse_response(text);
    if as_json {
        let mut value = json!({ "flashcards": parsed.flashcards, "isNote": parsed.is_note });
        if parsed.is_note {
            value["title"] = json!(extract_note_title(text));
            value["blocks"] = json!(markdown_to_blocks(text));
        }
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", render_plain(text, &parsed));
    }
    Ok(())
}

pub fn render_plain(text: &str, parsed: &ParsedResponse) -> String {
    let mut out = String::new();
    if parsed.flashcards.is_empty() {
        out.push_str("No flashcards found.\n");
    } else {
        out.push_str(&format!("{} flashcards:\n", parsed.flashcards.len()));
        for (index, card) in parsed.flashcards.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} => {} [{}]\n",
                index + 1,
                card.front,
                card.back,
                card.tags.join(", ")
            ));
        }
    }

    if !parsed.is_note {
        out.push_str("Not a study note.\n");
        return out;
    }

    out.push_str(&format!("Study note: {}\n", extract_note_title(text)));
    for block in markdown_to_blocks(text) {
        let line = match &block {
            Block::Heading(text) => format!("  [heading] {text}"),
            Block::BoldParagraph(text) => format!("  [bold] {text}"),
            Block::BulletItem(text) => format!("  [bullet] {text}"),
            Block::Paragraph(text) => format!("  [text] {text}"),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
