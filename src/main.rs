use anyhow::anyhow;
use clap::{Parser, Subcommand};
use cybersentinel::commands::{self, chat::ChatSession};
use cybersentinel::providers::{anki::AnkiClient, gemini::GeminiClient, notion::NotionClient};
use cybersentinel::storage::{keychain, settings_io, streak};

#[derive(Parser)]
#[command(name = "cybersentinel", about = "Cybersecurity study mentor with Anki and Notion sync", version)]
struct Cli {
    /// Notion integration token (overrides the keyring)
    #[arg(long, global = true)]
    notion_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session
    Chat {
        /// Gemini API key (overrides the keyring)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Show flashcards and note structure detected in model output
    Parse {
        /// File with model output ("-" for stdin)
        input: String,
        #[arg(long)]
        json: bool,
    },

    /// Check that AnkiConnect is reachable
    AnkiCheck,

    /// Send flashcards found in model output to Anki
    SyncAnki {
        /// File with model output ("-" for stdin)
        input: String,
        /// Do not try to create the deck first
        #[arg(long)]
        skip_create_deck: bool,
    },

    /// Save a study note from model output as a Notion page
    SyncNotion {
        /// File with model output ("-" for stdin)
        input: String,
        /// Page title (defaults to the first `###` heading)
        #[arg(long)]
        title: Option<String>,
        /// Send even if the text does not look like a study note
        #[arg(long)]
        force: bool,
    },

    /// Run the local Notion forwarding proxy
    Proxy {
        #[arg(long)]
        port: Option<u16>,
        /// Upstream pages endpoint
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Inspect or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print current settings and secret status
    Show,
    /// Anki deck name (empty string disables Anki sync)
    SetDeck { name: String },
    /// Notion database id
    SetDatabase { id: String },
    /// AnkiConnect endpoint URL
    SetAnkiEndpoint { url: String },
    /// Notion pages endpoint URL (the proxy by default)
    SetNotionEndpoint { url: String },
    /// Gemini model id
    SetModel { model: String },
    SetGeminiKey { key: String },
    ClearGeminiKey,
    SetNotionToken { token: String },
    ClearNotionToken,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut settings = settings_io::load_settings();

    match cli.command {
        Command::Chat { api_key } => {
            let api_key = keychain::resolve_gemini_api_key(api_key).map_err(|error| anyhow!(error))?;

            settings.streak = streak::advance_streak(&settings.streak, chrono::Local::now().date_naive());
            if let Err(error) = settings_io::save_settings(&settings) {
                log::warn!("Could not persist streak: {error}");
            }

            let model = GeminiClient::new(api_key, settings.chat.model.clone(), settings.chat.temperature)
                .map_err(|error| anyhow!(error))?;
            let anki = AnkiClient::new(settings.anki.endpoint.clone()).map_err(|error| anyhow!(error))?;
            let notion = NotionClient::new(settings.notion.endpoint.clone()).map_err(|error| anyhow!(error))?;
            let config = keychain::resolve_integration_config(&settings, cli.notion_token);

            let mut session = ChatSession::new(&model, &anki, &notion, config, settings.streak.count);
            let stdin = std::io::stdin();
            commands::chat::run(&mut session, stdin.lock(), std::io::stdout())?;
        }
        Command::Parse { input, json } => {
            let text = commands::read_input(&input)?;
            commands::parse::run(&text, json)?;
        }
        Command::AnkiCheck => {
            commands::anki::check(&settings)?;
        }
        Command::SyncAnki { input, skip_create_deck } => {
            let text = commands::read_input(&input)?;
            let config = keychain::resolve_integration_config(&settings, cli.notion_token);
            commands::anki::sync(&settings, &config, &text, skip_create_deck)?;
        }
        Command::SyncNotion { input, title, force } => {
            let text = commands::read_input(&input)?;
            let config = keychain::resolve_integration_config(&settings, cli.notion_token);
            commands::notion::sync(&settings, &config, &text, title.as_deref(), force)?;
        }
        Command::Proxy { port, upstream } => {
            let port = port.unwrap_or(settings.proxy.port);
            let upstream = upstream.unwrap_or_else(|| settings.proxy.upstream_url.clone());
            let runtime = tokio::runtime::Runtime::new()?;
            runtime
                .block_on(cybersentinel::proxy::serve(port, &upstream))
                .map_err(|error| anyhow!(error))?;
        }
        Command::Config(subcmd) => match subcmd {
            ConfigCommand::Show => commands::settings::show(&settings)?,
            ConfigCommand::SetDeck { name } => {
                commands::settings::update(settings, |s| s.anki.deck_name = name)?;
            }
            ConfigCommand::SetDatabase { id } => {
                commands::settings::update(settings, |s| s.notion.database_id = id)?;
            }
            ConfigCommand::SetAnkiEndpoint { url } => {
                commands::settings::update(settings, |s| s.anki.endpoint = url)?;
            }
            ConfigCommand::SetNotionEndpoint { url } => {
                commands::settings::update(settings, |s| s.notion.endpoint = url)?;
            }
            ConfigCommand::SetModel { model } => {
                commands::settings::update(settings, |s| s.chat.model = model)?;
            }
            ConfigCommand::SetGeminiKey { key } => commands::settings::set_gemini_key(&key)?,
            ConfigCommand::ClearGeminiKey => commands::settings::clear_gemini_key()?,
            ConfigCommand::SetNotionToken { token } => commands::settings::set_notion_token(&token)?,
            ConfigCommand::ClearNotionToken => commands::settings::clear_notion_token()?,
        },
    }

    Ok(())
}
