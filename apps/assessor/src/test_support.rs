//! Shared fixtures for unit tests: an in-memory `ChatModel` and document
//! helpers.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;
use tempfile::TempDir;

use crate::llm_client::{ChatModel, ChatRequest, LlmError, Role};

/// Replays a fixed script of responses and records every request it sees.
/// Once the script runs out it answers `EmptyContent`, or echoes the last user
/// message when built with `echo_user`.
pub struct ScriptedModel {
    script: Mutex<VecDeque<Result<String, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
    echo: bool,
}

impl ScriptedModel {
    pub fn new(script: impl IntoIterator<Item = Result<String, LlmError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
            echo: false,
        }
    }

    pub fn echo_user() -> Self {
        Self {
            echo: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(next) = self.script.lock().unwrap().pop_front() {
            return next;
        }
        if self.echo {
            return request
                .messages
                .iter()
                .rev()
                .find(|m| m.role == Role::User)
                .map(|m| m.content.clone())
                .ok_or(LlmError::EmptyContent);
        }
        Err(LlmError::EmptyContent)
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn write_document(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// A well-formed evaluation: overall 76.67, confidence 80, "Moderate Fit".
pub fn evaluation_json() -> String {
    json!({
        "evaluation": {
            "categories": {
                "Technical_Skills": {"score": 85, "confidence": 90},
                "Domain_Knowledge": {"score": 70, "confidence": 80},
                "Experience_Level": {"score": 80, "confidence": 85},
                "Tools_and_Technologies": {"score": 75, "confidence": 70},
                "Education_and_Certifications": {"score": 60, "confidence": 95},
                "Soft_Skills": {"score": 90, "confidence": 60}
            },
            "overall_match_score": 76.67,
            "cumulative_confidence": 80.0,
            "fit_classification": "Moderate Fit"
        },
        "summary": "Solid Rust background with relevant async experience. Limited exposure to the target domain."
    })
    .to_string()
}
