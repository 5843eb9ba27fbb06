// Main entry point - Dependency injection and engine startup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader as AsyncBufReader};
use tracing_subscriber::EnvFilter;

use crate::application::engine::TelemetryEngine;
use crate::application::noise::RngNoise;
use crate::domain::sample::{EnvironmentalSample, Timestamped};
use crate::infrastructure::config::{load_app_config, AppConfig};
use crate::infrastructure::jsonl::read_jsonl;
use crate::infrastructure::runtime::EngineRuntime;
use crate::presentation::handlers::{handle_command, Command, Reply, HELP};
use crate::presentation::tracing_projector::TracingProjector;

fn seed_window(engine: &mut TelemetryEngine, config: &AppConfig) -> anyhow::Result<()> {
    if let Some(path) = &config.buffer.fixture {
        let file = File::open(path).with_context(|| format!("opening fixture {}", path))?;
        let series: Vec<Timestamped<EnvironmentalSample>> = read_jsonl(BufReader::new(file))?;
        engine.load_environmental_series(series);
    } else if config.buffer.prefill {
        engine.regenerate_now(Utc::now())?;
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Build the engine (application layer)
    let noise = RngNoise::from_seed_option(config.noise.seed);
    let mut engine = TelemetryEngine::new(&config, Box::new(noise));
    seed_window(&mut engine, &config)?;

    // Start timers (infrastructure layer)
    let runtime = EngineRuntime::spawn(engine, Arc::new(TracingProjector::new()));
    tracing::info!("Starting {} ({})", config.title, HELP);

    // Operator commands (presentation layer)
    let mut lines = AsyncBufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupt received");
                break;
            }
            line = lines.next_line(), if stdin_open => {
                // Without a terminal keep running until interrupted
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(command) => match handle_command(&runtime, command) {
                        Ok(Reply::Message(message)) => tracing::info!("{}", message),
                        Ok(Reply::Quit) => break,
                        Err(e) => tracing::warn!("Command failed: {:#}", e),
                    },
                    Err(e) => tracing::warn!("{}", e),
                }
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}
