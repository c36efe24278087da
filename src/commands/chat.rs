use crate::parser::{is_note_document, parse_flashcards};
use crate::prompt::{UPLINK_FAILED, WELCOME_MESSAGE};
use crate::providers::anki::AnkiClient;
use crate::providers::notion::{NotionClient, NotionPageInfo};
use crate::providers::ChatModel;
use crate::types::{ChatMessage, IntegrationConfig, MessageRole};
use std::io::{BufRead, Write};

const HELP: &str = "Commands: /anki  sync flashcards from the last reply\n          /notion [title]  save the last reply as a Notion page\n          /status  check the Anki connection\n          /quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Text from the model, followed by any sync hints.
    Reply(String),
    Info(String),
    Quit,
}

/// One interactive conversation. Sync actions read the latest model reply
/// and never modify the history.
pub struct ChatSession<'a> {
    model: &'a dyn ChatModel,
    anki: &'a AnkiClient,
    notion: &'a NotionClient,
    config: IntegrationConfig,
    streak: u32,
    history: Vec<ChatMessage>,
}

impl<'a> ChatSession<'a> {
    pub fn new(
        model: &'a dyn ChatModel,
        anki: &'a AnkiClient,
        notion: &'a NotionClient,
        config: IntegrationConfig,
        streak: u32,
    ) -> Self {
        Self {
            model,
            anki,
            notion,
            config,
            streak,
            history: vec![ChatMessage::new(MessageRole::Model, WELCOME_MESSAGE)],
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    fn last_reply(&self) -> Option<&str> {
        self.history
            .iter()
            .rev()
            .find(|message| message.role == MessageRole::Model)
            .map(|message| message.text.as_str())
    }

    pub fn handle_line(&mut self, line: &str) -> Option<SessionEvent> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let event = match line.split_once(' ').map_or((line, ""), |(head, rest)| (head, rest.trim())) {
            ("/quit" | "/exit", _) => SessionEvent::Quit,
            ("/help", _) => SessionEvent::Info(HELP.to_string()),
            ("/status", _) => SessionEvent::Info(self.anki_status()),
            ("/anki", _) => SessionEvent::Info(self.sync_anki()),
            ("/notion", title) => SessionEvent::Info(self.sync_notion(Some(title).filter(|t| !t.is_empty()))),
            _ => self.send(line),
        };
        Some(event)
    }

    fn send(&mut self, text: &str) -> SessionEvent {
        let result = self.model.send_message(&self.history, text, self.streak);
        self.history.push(ChatMessage::new(MessageRole::User, text));
        match result {
            Ok(reply) => {
                self.history.push(ChatMessage::new(MessageRole::Model, reply.clone()));
                SessionEvent::Reply(with_sync_hints(&reply, &self.config))
            }
            Err(error) => {
                log::error!("Gemini API Error: {error}");
                self.history.push(ChatMessage::new(MessageRole::Model, UPLINK_FAILED));
                SessionEvent::Reply(UPLINK_FAILED.to_string())
            }
        }
    }

    fn anki_status(&self) -> String {
        let status = self.anki.check_connection();
        match (status.success, status.version) {
            (true, Some(version)) => format!("Anki connected (AnkiConnect v{version})."),
            (true, None) => "Anki connected.".to_string(),
            (false, _) => format!(
                "Anki unreachable at {}: {}",
                self.anki.endpoint(),
                status.error.unwrap_or_default()
            ),
        }
    }

    fn sync_anki(&self) -> String {
        let cards = self.last_reply().map(parse_flashcards).unwrap_or_default();
        if cards.is_empty() {
            return "No flashcards in the last reply.".to_string();
        }
        match self.anki.sync_flashcards(&self.config, &cards) {
            Ok(count) => format!(
                "Synced {count} cards to Anki deck '{}'.",
                self.config.flashcard_deck_name.trim()
            ),
            Err(error) => format!("Anki sync failed: {error}"),
        }
    }

    fn sync_notion(&self, title: Option<&str>) -> String {
        let Some(reply) = self.last_reply().filter(|text| is_note_document(text)) else {
            return "The last reply is not a study note.".to_string();
        };
        match self.notion.create_page(&self.config, title, reply) {
            Ok(value) => {
                let info = NotionPageInfo::from_response(&value);
                match info.page_url.or(info.page_id) {
                    Some(location) => format!("Saved to Notion: {location}"),
                    None => "Saved to Notion.".to_string(),
                }
            }
            Err(error) => format!("Notion sync failed: {error}"),
        }
    }
}

fn with_sync_hints(reply: &str, config: &IntegrationConfig) -> String {
    let mut hints = Vec::new();
    let cards = parse_flashcards(reply).len();
    if cards > 0 && config.flashcards_enabled() {
        hints.push(format!("[{cards} flashcards detected, /anki to sync]"));
    }
    if is_note_document(reply) && config.notes_enabled() {
        hints.push("[study note detected, /notion to save]".to_string());
    }
    if hints.is_empty() {
        reply.to_string()
    } else {
        format!("{reply}\n\n{}", hints.join("\n"))
    }
}

/// Reads lines from `input` until EOF or `/quit`, writing every event to `output`.
pub fn run<R: BufRead, W: Write>(session: &mut ChatSession<'_>, input: R, mut output: W) -> std::io::Result<()> {
    writeln!(output, "CyberSentinel [{} day streak]", session.streak)?;
    writeln!(output, "{WELCOME_MESSAGE}")?;
    writeln!(output, "(/help for commands)")?;

    for line in input.lines() {
        match session.handle_line(&line?) {
            None => continue,
            Some(SessionEvent::Quit) => break,
            Some(SessionEvent::Reply(text)) => writeln!(output, "\n{text}\n")?,
            Some(SessionEvent::Info(text)) => writeln!(output, "{text}")?,
        }
        output.flush()?;
    }
    Ok(())
}
