use anyhow::Result;
use chatskcet_common::observability::{LogConfig, LogFormat, init_logging};
use chatskcet_config::{ChatConfig, ChatConfigLoader, default_config_path};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use wiring::AssistantFactory;

mod commands;
mod server;
mod wiring;

#[derive(Parser, Debug)]
#[command(name = "chatskcet")]
#[command(about = "Search-grounded question answering about SKCET", long_about = None)]
struct Cli {
    /// YAML config file. Without it, the per-user config file is used if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Groq API key; takes precedence over `llm.api_key`.
    #[arg(long, env = "GROQ_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer one question and exit.
    Ask {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
        /// Print the full response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Interactive session; type `exit` or send EOF to leave.
    Chat,
    /// Serve the JSON API.
    Serve {
        /// Listen address, overriding `server.bind`.
        #[arg(long)]
        bind: Option<String>,
    },
    /// Print the effective configuration with the API key masked.
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let log_path = init_logging(LogConfig {
        emit_stderr: matches!(cli.command, Commands::Serve { .. }),
        format: std::env::var("CHATSKCET_LOG_FORMAT")
            .map(|raw| LogFormat::from_name(&raw))
            .unwrap_or(LogFormat::Text),
        ..LogConfig::default()
    })?;
    tracing::debug!(path = %log_path.display(), "logging.ready");

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Config => {
            print!("{}", config.to_redacted_yaml()?);
            Ok(())
        }
        Commands::Ask { query, json } => {
            let factory = AssistantFactory::from_config(config, cli.api_key.as_deref())?;
            commands::ask(&factory, &query.join(" "), json).await
        }
        Commands::Chat => {
            let factory = AssistantFactory::from_config(config, cli.api_key.as_deref())?;
            commands::chat(&factory).await
        }
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            let factory = AssistantFactory::from_config(config, cli.api_key.as_deref())?;
            server::serve(factory, &bind).await
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ChatConfig> {
    let loader = ChatConfigLoader::new();
    let loader = match (path, default_config_path()) {
        (Some(explicit), _) => loader.with_file(explicit),
        (None, Some(fallback)) => loader.with_optional_file(fallback),
        (None, None) => loader,
    };
    Ok(loader.load()?)
}
