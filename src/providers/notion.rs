use crate::error::{IntegrationError, IntegrationResult};
use crate::payload::{build_note_document, build_page_payload};
use crate::types::{IntegrationConfig, NOTION_API_VERSION, NOTION_TIMEOUT_SECS};
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration as StdDuration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionPageInfo {
    pub page_id: Option<String>,
    pub page_url: Option<String>,
}

impl NotionPageInfo {
    pub fn from_response(value: &Value) -> Self {
        Self {
            page_id: value.get("id").and_then(Value::as_str).map(str::to_string),
            page_url: value.get("url").and_then(Value::as_str).map(str::to_string),
        }
    }
}

/// Creates pages through the Notion pages endpoint, normally the local
/// forwarding proxy rather than api.notion.com itself.
pub struct NotionClient {
    endpoint: String,
    client: Client,
}

impl NotionClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(NOTION_TIMEOUT_SECS))
            .build()
            .map_err(|error| error.to_string())?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn create_page(
        &self,
        config: &IntegrationConfig,
        title: Option<&str>,
        content: &str,
    ) -> IntegrationResult<Value> {
        let (token, database_id) = config.require_notes_credentials()?;
        let document = build_note_document(content, title);
        let payload = build_page_payload(database_id, &document);

        log::debug!(
            "Creating Notion page '{}' with {} blocks via {}",
            document.title,
            document.body_blocks.len(),
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {token}"))
            .header("Notion-Version", NOTION_API_VERSION)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .map_err(|error| {
                log::error!("Notion transport failure: {error}");
                IntegrationError::Transport(format!(
                    "Cannot reach the Notion proxy at {}. Start it with `cybersentinel proxy` and retry.",
                    self.endpoint
                ))
            })?;

        let status = response.status();
        let body_text = response
            .text()
            .map_err(|error| IntegrationError::Decode(error.to_string()))?;
        if !status.is_success() {
            let message = notion_error_message(&body_text)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| status.as_u16().to_string());
            return Err(IntegrationError::Service(format!("Notion API Error: {message}")));
        }

        serde_json::from_str::<Value>(&body_text)
            .map_err(|error| IntegrationError::Decode(error.to_string()))
    }
}

fn notion_error_message(body_text: &str) -> Option<String> {
    serde_json::from_str::<Value>(body_text)
        .ok()
        .and_then(|value| value.get("message").and_then(Value::as_str).map(str::to_string))
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{unreachable_url, MockServer};
    use axum::{
        extract::State,
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Seen {
        authorization: Option<String>,
        notion_version: Option<String>,
        body: Option<Value>,
    }

    type Shared = Arc<Mutex<Seen>>;

    async fn pages_handler(
        State(seen): State<Shared>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let mut seen = seen.lock().expect("seen lock");
        seen.authorization = headers
            .get("authorization")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        seen.notion_version = headers
            .get("notion-version")
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        seen.body = Some(body);
        (
            StatusCode::OK,
            Json(json!({ "object": "page", "id": "page-1", "url": "https://notion.so/page-1" })),
        )
    }

    async fn rejecting_handler() -> (StatusCode, Json<Value>) {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "object": "error", "code": "validation_error", "message": "Name is not a property that exists." })),
        )
    }

    async fn opaque_failure_handler() -> (StatusCode, &'static str) {
        (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>")
    }

    fn config() -> IntegrationConfig {
        IntegrationConfig {
            flashcard_deck_name: String::new(),
            notes_api_token: "secret_token".to_string(),
            notes_database_id: "db-123".to_string(),
        }
    }

    #[test]
    fn create_page_sends_headers_and_blocks() {
        let seen: Shared = Arc::new(Mutex::new(Seen::default()));
        let server = MockServer::spawn(
            Router::new()
                .route("/v1/pages", post(pages_handler))
                .with_state(seen.clone()),
        );
        let client = NotionClient::new(server.url("/v1/pages")).expect("client");

        let value = client
            .create_page(&config(), None, "### Kerberoasting\n**Key Concepts:**\n- SPN: service account")
            .expect("page created");

        let info = NotionPageInfo::from_response(&value);
        assert_eq!(info.page_id.as_deref(), Some("page-1"));

        let seen = seen.lock().expect("seen lock");
        assert_eq!(seen.authorization.as_deref(), Some("Bearer secret_token"));
        assert_eq!(seen.notion_version.as_deref(), Some("2022-06-28"));
        let body = seen.body.as_ref().expect("body recorded");
        assert_eq!(body["parent"]["database_id"], "db-123");
        assert_eq!(body["properties"]["Name"]["title"][0]["text"]["content"], "Kerberoasting");
        let types = body["children"]
            .as_array()
            .expect("children array")
            .iter()
            .map(|block| block["type"].as_str().unwrap_or("").to_string())
            .collect::<Vec<_>>();
        assert_eq!(types, vec!["heading_3", "paragraph", "bulleted_list_item"]);
    }

    #[test]
    fn service_error_surfaces_notion_message() {
        let server = MockServer::spawn(Router::new().route("/v1/pages", post(rejecting_handler)));
        let client = NotionClient::new(server.url("/v1/pages")).expect("client");

        let error = client
            .create_page(&config(), Some("t"), "body")
            .expect_err("notion rejects");
        assert!(matches!(error, IntegrationError::Service(_)));
        assert_eq!(
            error.to_string(),
            "Notion API Error: Name is not a property that exists."
        );
    }

    #[test]
    fn non_json_failure_falls_back_to_status_text() {
        let server =
            MockServer::spawn(Router::new().route("/v1/pages", post(opaque_failure_handler)));
        let client = NotionClient::new(server.url("/v1/pages")).expect("client");

        let error = client
            .create_page(&config(), Some("t"), "body")
            .expect_err("gateway failure");
        assert_eq!(error.to_string(), "Notion API Error: Bad Gateway");
    }

    #[test]
    fn missing_credentials_fail_without_network() {
        let client = NotionClient::new(unreachable_url()).expect("client");
        let mut config = config();
        config.notes_database_id.clear();

        let error = client
            .create_page(&config, None, "### a\n**Key Concepts:**")
            .expect_err("credentials required");
        assert!(error.is_config());
    }

    #[test]
    fn unreachable_proxy_asks_operator_to_start_it() {
        let client = NotionClient::new(unreachable_url()).expect("client");
        let error = client
            .create_page(&config(), None, "text")
            .expect_err("proxy is down");

        assert!(matches!(error, IntegrationError::Transport(_)));
        assert!(error.to_string().contains("cybersentinel proxy"));
    }
}
