use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use client_core::connect_collaborator;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

mod console;
mod settings;

use console::{parse_command, Console, Flow};
use settings::load_client_settings;

#[derive(Parser, Debug)]
struct Args {
    /// Deployed collaborator endpoint that summarizes and stores feedback.
    #[arg(long, env = "FEEDBACK_ENDPOINT_URL")]
    endpoint_url: Option<String>,
    #[arg(long, default_value = "client.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let settings = load_client_settings(&args.config, args.endpoint_url);
    let collaborator = connect_collaborator(settings.endpoint_url.as_deref())?;
    if !collaborator.is_configured() {
        warn!("collaborator endpoint is not configured; summaries and submissions will fail");
    }

    let mut console = Console::new(collaborator);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(console.render().as_bytes()).await?;
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_command(console.screen(), &line) else {
            console.note("Unrecognized input.");
            continue;
        };
        if console.handle(command).await == Flow::Quit {
            break;
        }
    }

    info!("session closed");
    Ok(())
}
