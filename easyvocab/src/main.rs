//! The easyvocab binary: one-off enrichment from the shell, or an MCP server.

use clap::Parser;
use easyvocab::commands;
use easyvocab::prelude::*;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env is fine; the real environment still applies.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    // Stdout belongs to command output and the MCP protocol.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(event = "dotenv_loaded", path = %path.display(), "dotenv_loaded");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(event = "command_failed", error = ?e, "command_failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    match cli.command {
        Some(Command::Enrich { word, overrides }) => {
            let config = commands::load_config(&overrides)?;
            println!("{}", commands::enrich(config, &word).await?);
        }
        Some(Command::Prompt { word }) => {
            let config = commands::load_config(&ModelOverrides::default())?;
            println!("{}", commands::render_prompt(&config, &word));
        }
        Some(Command::Serve {
            print_config,
            overrides,
        }) => {
            let config = commands::load_config(&overrides)?;
            let handler = commands::build_server(config).await?;
            if print_config {
                println!("{}", commands::client_config_snippets(&handler)?);
            } else {
                commands::serve(handler).await?;
            }
        }
        None => {
            let config = commands::load_config(&ModelOverrides::default())?;
            commands::serve(commands::build_server(config).await?).await?;
        }
    }
    Ok(())
}
