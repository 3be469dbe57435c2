//! Subcommand handlers

use crate::backend::{ChatBackend, ChatMessage};
use anyhow::Result;
use textguard_validators::{GuardrailPipeline, PluginRegistry, ValidatorDescriptor};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

const CHAT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
const CHAT_TEMPERATURE: f32 = 0.7;
const EXIT_WORDS: [&str; 3] = ["exit", "quit", "bye"];

pub async fn check_input(pipeline: &GuardrailPipeline, text: &str) -> Result<()> {
    let verdict = pipeline.validate_input(text).await;
    println!("{}", serde_json::to_string_pretty(&verdict)?);

    if !verdict.valid {
        println!("{}", pipeline.safe_response(&verdict));
    }
    Ok(())
}

pub async fn check_output(pipeline: &GuardrailPipeline, text: &str) -> Result<()> {
    let verdict = pipeline.validate_output(text).await;
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

pub fn list(pipeline: &GuardrailPipeline, plugins: &PluginRegistry) -> Result<()> {
    let validators = pipeline.list_active_validators();
    if validators.is_empty() {
        println!("No validators configured");
    }

    for descriptor in &validators {
        println!("{}", format_descriptor(descriptor));
    }

    let classes = plugins.available();
    if !classes.is_empty() {
        println!();
        println!("Plugin classes: {}", classes.join(", "));
    }
    Ok(())
}

fn format_descriptor(descriptor: &ValidatorDescriptor) -> String {
    let state = if descriptor.enabled { "on" } else { "off" };
    format!(
        "{:<24} {:<7} {:<4} {}",
        descriptor.name,
        format!("{:?}", descriptor.phase).to_lowercase(),
        state,
        descriptor.description
    )
}

fn is_exit(line: &str) -> bool {
    EXIT_WORDS
        .iter()
        .any(|word| line.trim().eq_ignore_ascii_case(word))
}

pub async fn chat(pipeline: &GuardrailPipeline, backend: &ChatBackend) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Type 'exit' to quit.");

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_exit(&line) {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let input = pipeline.validate_input(&line).await;
        if !input.valid {
            warn!("Blocked input: {}", input.reason);
            println!("{}", pipeline.safe_response(&input));
            continue;
        }

        let messages = [
            ChatMessage::system(CHAT_SYSTEM_PROMPT),
            ChatMessage::user(input.sanitized_input),
        ];
        let reply = match backend.complete(&messages, CHAT_TEMPERATURE).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("Generation failed: {}", e);
                println!("Sorry, the assistant is unavailable right now.");
                continue;
            }
        };

        let output = pipeline.validate_output(&reply).await;
        if !output.valid {
            warn!("Response mitigated: {}", output.reason);
        }
        println!("{}", output.sanitized_output);
    }

    Ok(())
}
