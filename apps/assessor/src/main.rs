mod cli;
mod config;
mod document;
mod errors;
mod evaluation;
mod llm_client;
mod pipeline;
mod redaction;
mod telemetry;
#[cfg(test)]
mod test_support;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};

use crate::cli::{argument_error_status, Cli};
use crate::config::{Config, LogSettings};
use crate::errors::{AppError, EXIT_INTERRUPTED, EXIT_SUCCESS};
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{ChatModel, LlmClient};
use crate::telemetry::Telemetry;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // The env file may set LOG_LEVEL, so it is loaded before logging starts;
    // a failure is reported once logging is up.
    let dotenv = config::load_dotenv();
    let telemetry = Telemetry::init(&LogSettings::from_env());

    info!("Starting resume-assessor v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = telemetry.log_file() {
        info!("Logging to {}", path.display());
    }
    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => return fail(e),
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let status = argument_error_status(&e);
            if status != EXIT_SUCCESS {
                error!("[INPUT_ERROR] invalid command line arguments");
            }
            return ExitCode::from(status);
        }
    };

    tokio::select! {
        result = run(cli) => match result {
            Ok(json) => {
                println!("{json}");
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => fail(e),
        },
        _ = interrupted() => {
            warn!("Interrupted by user, aborting");
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}

/// Configures the client and runs both stages, returning the pretty-printed
/// result document.
async fn run(cli: Cli) -> Result<String, AppError> {
    let config = Config::from_env()?;
    info!("Configuration loaded: {config:?}");

    let settings = config.client_settings();
    let client = RetryPolicy::client_construction()
        .run("client construction", || {
            let settings = settings.clone();
            async move { LlmClient::new(settings) }
        })
        .await
        .map_err(AppError::model("client construction"))?;
    info!("LLM client initialized (model: {})", client.model_name());

    let output = pipeline::run_assessment(
        &cli.into_request(),
        &client,
        &RetryPolicy::model_invocation(),
    )
    .await?;

    let json = serde_json::to_string_pretty(&output)
        .context("failed to serialize evaluation output")?;
    Ok(json)
}

fn fail(err: AppError) -> ExitCode {
    error!("[{}] {}", err.code(), err);
    ExitCode::from(err.exit_status())
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}
