use crate::parser::is_note_document;
use crate::providers::notion::{NotionClient, NotionPageInfo};
use crate::types::{AppSettings, IntegrationConfig};
use anyhow::{anyhow, bail};

pub fn sync(
    settings: &AppSettings,
    config: &IntegrationConfig,
    text: &str,
    title: Option<&str>,
    force: bool,
) -> anyhow::Result<NotionPageInfo> {
    if !force && !is_note_document(text) {
        bail!("Input is not a study note (needs a `###` heading and `**Key Concepts:**`). Use --force to send it anyway.");
    }

    let client = NotionClient::new(settings.notion.endpoint.clone()).map_err(|error| anyhow!(error))?;
    let value = client.create_page(config, title, text)?;
    let info = NotionPageInfo::from_response(&value);
    match (&info.page_url, &info.page_id) {
        (Some(url), _) => println!("Saved to Notion: {url}"),
        (None, Some(id)) => println!("Saved to Notion page {id}"),
        (None, None) => println!("Saved to Notion."),
    }
    Ok(info)
}
