use thiserror::Error;

use crate::llm_client::LlmError;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
/// Exit status for an operator interrupt (128 + SIGINT).
pub const EXIT_INTERRUPTED: u8 = 130;

/// Application-level error type.
///
/// Every failure of a run ends up here. `main` logs it with its `code()` and
/// turns it into a non-zero exit status; nothing is printed on stdout.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing, unreadable, wrongly typed, empty or oversized input file.
    #[error("Input error: {0}")]
    Input(String),

    /// Missing credential or malformed setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Provider failure, after the retry budget where one applies.
    #[error("Model error during {stage}: {source}")]
    Model {
        stage: &'static str,
        #[source]
        source: LlmError,
    },

    /// The model answered, but not with a conforming evaluation.
    #[error("Schema validation error: {0}")]
    SchemaValidation(String),

    #[error("Unexpected error: {0}")]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps an `LlmError` raised while running `stage`.
    pub fn model(stage: &'static str) -> impl FnOnce(LlmError) -> AppError {
        move |source| AppError::Model { stage, source }
    }

    /// Stable machine-readable code, logged next to the message.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Input(_) => "INPUT_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Model { .. } => "MODEL_ERROR",
            AppError::SchemaValidation(_) => "SCHEMA_VALIDATION_ERROR",
            AppError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    /// Every failure maps to status 1; interrupts are handled separately.
    pub fn exit_status(&self) -> u8 {
        EXIT_FAILURE
    }
}
