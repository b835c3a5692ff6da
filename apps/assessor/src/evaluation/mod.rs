//! Evaluation stage: scores a redacted resume against a job description.
//!
//! Flow: build prompt → one model call (retried on transient failure) →
//! strict local schema validation → `EvaluationOutput`.

pub mod models;
pub mod prompts;
pub mod schema;
pub mod scoring;

use tracing::info;

use crate::document::SourceDocument;
use crate::errors::AppError;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{ChatModel, ChatRequest};
use crate::redaction::RedactedText;

pub use models::EvaluationOutput;

const STAGE: &str = "evaluation";

/// Scores `resume` against `job_description`.
///
/// Transient model failures are retried per `retry`; a response that fails
/// schema validation is returned as `AppError::SchemaValidation` without
/// retrying.
pub async fn evaluate(
    resume: &RedactedText,
    job_description: &SourceDocument,
    model: &dyn ChatModel,
    retry: &RetryPolicy,
) -> Result<EvaluationOutput, AppError> {
    let prompt = prompts::build_evaluation_prompt(resume.as_str(), job_description.text());
    let request = ChatRequest::new()
        .user(prompt)
        .with_response_format(schema::response_format());

    info!("Requesting evaluation from {}", model.model_name());
    let raw = retry
        .run(STAGE, || model.complete(&request))
        .await
        .map_err(AppError::model(STAGE))?;

    let output = schema::parse_evaluation(&raw)?;
    info!(
        "Evaluation complete: overall_match_score={}, cumulative_confidence={}, fit={}",
        output.evaluation.overall_match_score,
        output.evaluation.cumulative_confidence,
        output.evaluation.fit_classification
    );
    Ok(output)
}
