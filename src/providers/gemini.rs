use crate::prompt::system_instruction;
use crate::providers::ChatModel;
use crate::types::{ChatMessage, MessageRole, GEMINI_API_BASE_URL, GEMINI_TIMEOUT_SECS};
use crate::util::today_local;
use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration as StdDuration;

const GEMINI_API_KEY_HEADER: &str = "x-goog-api-key";

pub const EMPTY_REPLY_FALLBACK: &str = "Connection interrupted. No data received.";

pub struct GeminiClient {
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
    client: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, temperature: f32) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(GEMINI_TIMEOUT_SECS))
            .build()
            .map_err(|error| error.to_string())?;
        Ok(Self {
            api_key: api_key.into(),
            model: model.into(),
            temperature,
            base_url: GEMINI_API_BASE_URL.to_string(),
            client,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ChatModel for GeminiClient {
    fn send_message(&self, history: &[ChatMessage], new_message: &str, streak: u32) -> Result<String, String> {
        let payload = build_generate_payload(
            history,
            new_message,
            &system_instruction(streak, &today_local()),
            self.temperature,
        );
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let response = self
            .client
            .post(url)
            .header(GEMINI_API_KEY_HEADER, &self.api_key)
            .json(&payload)
            .send()
            .map_err(|error| error.without_url().to_string())?;

        let status = response.status();
        let body = response.text().map_err(|error| error.without_url().to_string())?;
        if !status.is_success() {
            return Err(format!("Gemini API {}: {body}", status.as_u16()));
        }

        let value: Value = serde_json::from_str(&body).map_err(|error| error.to_string())?;
        let text = extract_candidate_text(&value);
        if text.trim().is_empty() {
            return Ok(EMPTY_REPLY_FALLBACK.to_string());
        }
        Ok(text)
    }
}

/// System messages never reach the model; the persona travels as the
/// system instruction instead.
pub(crate) fn build_generate_payload(
    history: &[ChatMessage],
    new_message: &str,
    instruction: &str,
    temperature: f32,
) -> Value {
    let mut contents = history
        .iter()
        .filter_map(|message| {
            let role = match message.role {
                MessageRole::User => "user",
                MessageRole::Model => "model",
                MessageRole::System => return None,
            };
            Some(json!({ "role": role, "parts": [{ "text": message.text }] }))
        })
        .collect::<Vec<_>>();
    contents.push(json!({ "role": "user", "parts": [{ "text": new_message }] }));

    json!({
        "contents": contents,
        "systemInstruction": {
            "parts": [{ "text": instruction }]
        },
        "generationConfig": {
            "temperature": temperature
        }
    })
}

fn extract_candidate_text(value: &Value) -> String {
    value
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|items| items.first())
        .and_then(|item| item.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}
