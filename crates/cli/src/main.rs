mod config;
mod error;

use std::io::{self, Write};

use clap::Parser;
use runtime::{DEFAULT_PROMPT, McpToolHost, OpenAiBackend, Orchestrator, ToolHost};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use config::Config;
use error::Result;

#[derive(Parser)]
#[command(name = "weather-chat")]
#[command(about = "Ask a chat model questions it can answer with MCP tools", long_about = None)]
#[command(version)]
struct Cli {
    /// What to ask; defaults to a question about the weather in Bengaluru
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    prompt: Vec<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let prompt = utterance(&cli.prompt);

    let tools = McpToolHost::connect(&config.server_url).await?;
    println!(
        "Connected to {} ({} tools)",
        tools.url(),
        tools.descriptors().len()
    );

    let backend = OpenAiBackend::builder(&config.api_key)
        .base_url(&config.base_url)
        .max_tokens(config.chat.max_tokens)
        .build()
        .map_err(runtime::Error::from)?;

    let mut stdout = io::stdout().lock();
    let outcome = Orchestrator::new(&backend, &tools, &config.chat)
        .run(&prompt, &mut stdout)
        .await;
    let flushed = stdout.flush();
    drop(stdout);

    if let Err(e) = tools.shutdown().await {
        warn!(error = %e, "failed to close tool provider session");
    }
    outcome?;
    Ok(flushed?)
}

/// Join command-line words into one utterance.
fn utterance(words: &[String]) -> String {
    let joined = words.join(" ");
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        DEFAULT_PROMPT.to_string()
    } else {
        trimmed.to_string()
    }
}
