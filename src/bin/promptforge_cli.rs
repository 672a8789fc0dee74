//! PromptForge CLI - Bridge interface for the web layer
//!
//! Commands: contexts, classify, synthesize
//! Outputs JSON to stdout, logs to stderr
//! Returns 2 when a synthesized prompt fails validation

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use promptforge_core::{
    list_standards, EngineConfig, ProductSpecification, PromptEngine, SynthesisRequest,
};

#[derive(Parser)]
#[command(name = "promptforge-cli")]
#[command(about = "PromptForge CLI - Prompt Synthesis & Validation Engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to an engine config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List context presets and their photography standards
    Contexts,

    /// Classify a product
    Classify {
        /// JSON payload (ProductSpecification)
        #[arg(short, long)]
        payload: String,
    },

    /// Synthesize a prompt
    Synthesize {
        /// JSON payload (SynthesisRequest)
        #[arg(short, long)]
        payload: String,
    },
}

fn emit<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            println!("{}", json!({"success": false, "error": e.to_string()}));
            ExitCode::FAILURE
        }
    }
}

fn failure(message: String) -> ExitCode {
    println!("{}", json!({"success": false, "error": message}));
    ExitCode::FAILURE
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match EngineConfig::load(path) {
            Ok(c) => c,
            Err(e) => return failure(format!("Failed to load config: {}", e)),
        },
        None => EngineConfig::default(),
    };
    let engine = match PromptEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => return failure(format!("Invalid config: {}", e)),
    };

    match cli.command {
        Commands::Contexts => emit(&list_standards()),

        Commands::Classify { payload } => {
            let spec: ProductSpecification = match serde_json::from_str(&payload) {
                Ok(s) => s,
                Err(e) => return failure(format!("Invalid payload: {}", e)),
            };
            match engine.classify(&spec) {
                Ok(intelligence) => emit(&json!({"success": true, "intelligence": intelligence})),
                Err(e) => failure(e.to_string()),
            }
        }

        Commands::Synthesize { payload } => {
            let request: SynthesisRequest = match serde_json::from_str(&payload) {
                Ok(r) => r,
                Err(e) => return failure(format!("Invalid payload: {}", e)),
            };
            match engine.synthesize(&request) {
                Ok(result) => {
                    let valid = result.validation.is_valid;
                    let output = json!({
                        "success": true,
                        "generatedAt": chrono::Utc::now(),
                        "result": result,
                    });
                    match serde_json::to_string_pretty(&output) {
                        Ok(text) => {
                            println!("{}", text);
                            if valid {
                                ExitCode::SUCCESS
                            } else {
                                ExitCode::from(2) // Validation failure
                            }
                        }
                        Err(e) => failure(e.to_string()),
                    }
                }
                Err(e) => failure(e.to_string()),
            }
        }
    }
}
