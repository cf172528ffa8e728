use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use reqwest::Client;
use serde_json::Value;
use tabled::Table;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use topsync::{Res, config, error, handler, queue, success, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Handle one queue event and forward the collected top items
    Handle(HandleOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct HandleOptions {
    /// Path to the queue event JSON; reads stdin when omitted
    #[clap(long)]
    pub event: Option<PathBuf>,

    /// Do not print the summary table
    #[clap(long)]
    pub quiet: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("topsync=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

async fn read_event(path: Option<&PathBuf>) -> Res<Value> {
    let raw = match path {
        Some(p) => async_fs::read_to_string(p).await?,
        None => {
            let mut raw = String::new();
            tokio::io::AsyncReadExt::read_to_string(&mut tokio::io::stdin(), &mut raw).await?;
            raw
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

async fn handle(opt: HandleOptions) -> Res<()> {
    let settings = config::Settings::from_env()?;
    let event = read_event(opt.event.as_ref()).await?;

    let client = Client::builder().build()?;
    let publisher = queue::publisher_for(&settings.queue_url, client.clone(), settings.timeout())?;

    let invocation = handler::handle_event(&event, &settings, client, publisher.as_ref()).await?;

    if !opt.quiet {
        println!("{}", Table::new(utils::summary_rows(&invocation.data)));
    }
    match &invocation.data.refresh_token {
        Some(token) => success!(
            "Published top items for user {} (refresh token rotated: {})",
            invocation.user_id,
            utils::mask_token(token)
        ),
        None => success!("Published top items for user {}", invocation.user_id),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let env_loaded = config::load_env().await;
    init_tracing();

    match env_loaded {
        Ok(paths) => {
            for path in paths {
                debug!(path = %path.display(), "loaded .env");
            }
        }
        Err(e) => warning!("Cannot load environment file. Err: {}", e),
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Handle(opt) => {
            if let Err(e) = handle(opt).await {
                error!("Invocation failed: {}", e);
            }
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
