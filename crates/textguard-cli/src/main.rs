//! textguard CLI
//!
//! Loads a guardrails configuration, builds the validation pipeline and
//! runs text through it, either one piece at a time or as an interactive
//! chat against an OpenAI-compatible backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use textguard_blocklist_plugin::BlocklistPlugin;
use textguard_validators::{GuardrailPipeline, Judge, PluginRegistry};
use tracing::info;

mod backend;
mod commands;
mod config;

use backend::ChatBackend;
use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "textguard")]
#[command(about = "Validate prompts and responses around a language model", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Override the backend base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Override the backend model
    #[arg(long)]
    model: Option<String>,

    /// Run judge-backed validators without a judge (they pass everything)
    #[arg(long)]
    no_judge: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the input phase on TEXT
    CheckInput { text: String },

    /// Run the output phase on TEXT
    CheckOutput { text: String },

    /// List active validators
    List,

    /// Interactive chat with guarded input and output
    Chat,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);

    let config = AppConfig::load(&cli.config, &cli)
        .with_context(|| format!("Failed to load configuration from '{}'", cli.config))?;
    info!("Configuration loaded");

    let backend = ChatBackend::new(&config.llm)?;
    let judge: Option<Arc<dyn Judge>> = if cli.no_judge {
        info!("Judge disabled; topic and toxicity checks will pass through");
        None
    } else {
        info!("Judge backend: {} ({})", backend.endpoint(), config.llm.model);
        Some(Arc::new(backend.clone()))
    };

    let plugins = plugins();
    let pipeline = GuardrailPipeline::from_config(&config.guardrails, judge, &plugins).await;

    match cli.command {
        Command::CheckInput { text } => commands::check_input(&pipeline, &text).await,
        Command::CheckOutput { text } => commands::check_output(&pipeline, &text).await,
        Command::List => commands::list(&pipeline, &plugins),
        Command::Chat => commands::chat(&pipeline, &backend).await,
    }
}

/// Plugin modules available to configuration entries
fn plugins() -> PluginRegistry {
    PluginRegistry::new().with_plugin(BlocklistPlugin::shared())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, json: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("textguard=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("textguard=info"))
    };

    let text_layer = (!json).then(|| fmt::layer().with_writer(std::io::stderr));
    let json_layer = json.then(|| fmt::layer().json().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .init();
}
