//! Assessment pipeline: orchestrates one resume/position run.
//!
//! Flow: load both documents → redact resume → evaluate → return output.
//!
//! Both files are validated before the first model call, so a bad path never
//! costs a request. The raw resume is only ever sent to the redaction stage;
//! evaluation sees the redacted text.

use std::path::PathBuf;

use tracing::info;

use crate::document::{DocumentKind, SourceDocument};
use crate::errors::AppError;
use crate::evaluation::{self, EvaluationOutput};
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::ChatModel;
use crate::redaction;

/// Input paths for one run.
#[derive(Debug, Clone)]
pub struct AssessmentRequest {
    pub resume_path: PathBuf,
    pub position_path: PathBuf,
}

/// Runs the full assessment for `request`.
///
/// Steps:
/// 1. load resume and job description (`AppError::Input` on any problem)
/// 2. redact the resume
/// 3. evaluate the redacted resume against the job description
pub async fn run_assessment(
    request: &AssessmentRequest,
    model: &dyn ChatModel,
    retry: &RetryPolicy,
) -> Result<EvaluationOutput, AppError> {
    // Step 1: Load inputs
    let resume = SourceDocument::load(&request.resume_path, DocumentKind::Resume).await?;
    let job_description =
        SourceDocument::load(&request.position_path, DocumentKind::JobDescription).await?;

    // Step 2: Redact
    info!("Redacting {}: {}", resume.kind(), resume.path().display());
    let redacted = redaction::redact(&resume, model, retry).await?;

    // Step 3: Evaluate
    info!(
        "Evaluating redacted resume against {}",
        job_description.path().display()
    );
    let output = evaluation::evaluate(&redacted, &job_description, model, retry).await?;

    info!("Assessment finished: {}", output.evaluation.fit_classification);
    Ok(output)
}
