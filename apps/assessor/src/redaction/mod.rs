//! Redaction stage: strips PII from the resume via the model.
//!
//! The model's answer is returned verbatim. Nothing here checks whether the
//! redaction is complete; the guarantee is only as good as the instruction.

pub mod prompts;

use tracing::info;

use crate::document::SourceDocument;
use crate::errors::AppError;
use crate::llm_client::retry::RetryPolicy;
use crate::llm_client::{ChatModel, ChatRequest};

pub use prompts::REDACTION_TOKEN;

const STAGE: &str = "redaction";

/// Resume text with PII replaced by `REDACTION_TOKEN`. Lives only in memory.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedText(String);

impl RedactedText {
    pub fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of placeholder tokens in the text.
    pub fn placeholder_count(&self) -> usize {
        self.0.matches(REDACTION_TOKEN).count()
    }
}

// Keep resume content out of debug logs.
impl std::fmt::Debug for RedactedText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedactedText({} bytes)", self.0.len())
    }
}

/// Sends the resume through the redaction prompt.
///
/// Empty model output counts as a transient failure and is retried per
/// `retry`; exhaustion surfaces as `AppError::Model`.
pub async fn redact(
    resume: &SourceDocument,
    model: &dyn ChatModel,
    retry: &RetryPolicy,
) -> Result<RedactedText, AppError> {
    let request = ChatRequest::new()
        .system(prompts::REDACTION_SYSTEM)
        .user(resume.text());

    info!("Requesting redaction from {}", model.model_name());
    let text = retry
        .run(STAGE, || model.complete(&request))
        .await
        .map_err(AppError::model(STAGE))?;

    let redacted = RedactedText::new(text);
    info!(
        "Redaction completed: {} bytes in, {} bytes out, {} placeholders",
        resume.text().len(),
        redacted.as_str().len(),
        redacted.placeholder_count()
    );
    Ok(redacted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use crate::llm_client::{LlmError, Role};
    use crate::test_support::{write_document, ScriptedModel};

    const PII_FREE: &str = "Lead Engineer at Microsoft\n\n- Built Docker and React.js tooling\n- Based in Australia\n";

    async fn resume(dir: &tempfile::TempDir, text: &str) -> SourceDocument {
        let path = write_document(dir, "resume.txt", text);
        SourceDocument::load(&path, DocumentKind::Resume).await.unwrap()
    }

    #[tokio::test]
    async fn test_request_has_system_policy_and_raw_resume() {
        let dir = tempfile::tempdir().unwrap();
        let doc = resume(&dir, "Jane Doe\njane@example.com\nRust engineer").await;
        let model = ScriptedModel::new([Ok("[REDACTED]\n[REDACTED]\nRust engineer".to_string())]);

        let redacted = redact(&doc, &model, &RetryPolicy::model_invocation())
            .await
            .unwrap();
        assert_eq!(redacted.as_str(), "[REDACTED]\n[REDACTED]\nRust engineer");
        assert_eq!(redacted.placeholder_count(), 2);

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, prompts::REDACTION_SYSTEM);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "Jane Doe\njane@example.com\nRust engineer");
        assert!(requests[0].response_format.is_none());
    }

    #[tokio::test]
    async fn test_pii_free_text_passes_through_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let doc = resume(&dir, PII_FREE).await;
        let model = ScriptedModel::echo_user();

        let redacted = redact(&doc, &model, &RetryPolicy::model_invocation())
            .await
            .unwrap();
        assert_eq!(redacted.as_str(), PII_FREE);
        assert_eq!(redacted.placeholder_count(), 0);
    }

    #[tokio::test]
    async fn test_response_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let doc = resume(&dir, "text").await;
        let model = ScriptedModel::new([Ok("\n  indented line  \n\n".to_string())]);

        let redacted = redact(&doc, &model, &RetryPolicy::model_invocation())
            .await
            .unwrap();
        assert_eq!(redacted.as_str(), "\n  indented line  \n\n");
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_responses_exhaust_retries() {
        let dir = tempfile::tempdir().unwrap();
        let doc = resume(&dir, "text").await;
        let model = ScriptedModel::new((0..5).map(|_| Err(LlmError::EmptyContent)));

        let err = redact(&doc, &model, &RetryPolicy::model_invocation())
            .await
            .unwrap_err();
        match err {
            AppError::Model {
                stage,
                source: LlmError::RetriesExhausted { attempts, .. },
            } => {
                assert_eq!(stage, "redaction");
                assert_eq!(attempts, 5);
            }
            other => panic!("expected exhausted model error, got {other:?}"),
        }
        assert_eq!(model.requests().len(), 5);
    }

    #[test]
    fn test_debug_does_not_leak_content() {
        let redacted = RedactedText::new("secret resume body".to_string());
        assert_eq!(format!("{redacted:?}"), "RedactedText(18 bytes)");
    }
}
