//! Todoist MCP server binary.
//!
//! Serves over stdio by default, or Streamable HTTP with `--http`. The `call`
//! subcommand runs a single tool and prints its output.

use std::net::IpAddr;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use miette::Diagnostic;
use rmcp::model::{JsonObject, RawContent};
use thiserror::Error;
use todoist_mcp::client::{ApiError, TodoistClient, install_crypto_provider};
use todoist_mcp::config::{self, Config, ConfigError};
use todoist_mcp::mcp::{self, TodoistServer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Error, Diagnostic, Debug)]
enum BinaryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Client(#[from] ApiError),

    #[error("Server error: {0}")]
    #[diagnostic(code(todoist_mcp::binary::io))]
    Io(#[from] std::io::Error),

    #[error("Invalid tool arguments: {0}")]
    #[diagnostic(
        code(todoist_mcp::binary::arguments),
        help("Pass the tool parameters as a single JSON object.")
    )]
    Arguments(String),
}

#[derive(Parser)]
#[command(name = "todoist-mcp")]
#[command(author, version, about = "MCP server for Todoist", long_about = None)]
struct Cli {
    /// Serve Streamable HTTP instead of stdio
    #[arg(long)]
    http: bool,

    /// Host address to bind to with --http
    #[arg(long, default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port to listen on with --http
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Todoist REST base URL (overrides TODOIST_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides TODOIST_TIMEOUT_SECS)
    #[arg(long, value_parser = config::parse_timeout)]
    timeout: Option<Duration>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run one tool and print its result
    Call {
        /// Tool name, e.g. todoist_list_tasks
        tool: String,

        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
}

/// Logs go to stderr; stdout carries the stdio transport.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todoist_mcp=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<Config, BinaryError> {
    let mut config = Config::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url)?;
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    Ok(config)
}

fn parse_args(raw: Option<&str>) -> Result<Option<JsonObject>, BinaryError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match serde_json::from_str(raw) {
        Ok(serde_json::Value::Object(map)) => Ok(Some(map)),
        Ok(_) => Err(BinaryError::Arguments("expected a JSON object".to_string())),
        Err(e) => Err(BinaryError::Arguments(e.to_string())),
    }
}

/// Run one tool; returns whether it succeeded.
async fn call(client: TodoistClient, tool: &str, args: Option<&str>) -> Result<bool, BinaryError> {
    let args = parse_args(args)?;
    let result = TodoistServer::new(client).invoke(tool, args).await;

    for content in &result.content {
        if let RawContent::Text(text) = &content.raw {
            println!("{}", text.text);
        }
    }
    Ok(result.is_error != Some(true))
}

async fn run(cli: Cli) -> Result<ExitCode, BinaryError> {
    let config = load_config(&cli)?;
    let client = TodoistClient::new(&config)?;
    info!(base_url = %client.base_url(), "Starting Todoist MCP server");

    match cli.command {
        Some(Command::Call { tool, args }) => {
            let ok = call(client, &tool, args.as_deref()).await?;
            return Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        None if cli.http => mcp::serve_http(client, cli.host, cli.port).await?,
        None => mcp::serve_stdio(client).await?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> miette::Result<ExitCode> {
    init_tracing();
    install_crypto_provider();

    let cli = Cli::parse();
    Ok(run(cli).await?)
}
