pub mod anki;
pub mod gemini;
pub mod notion;

use crate::types::ChatMessage;

/// The hosted chat model, seen as one opaque request/response exchange.
pub trait ChatModel {
    fn send_message(&self, history: &[ChatMessage], new_message: &str, streak: u32) -> Result<String, String>;
}
