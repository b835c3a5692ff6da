//! The structured-output contract for the evaluation stage.
//!
//! The JSON schema is sent to the provider as a `response_format`, but the
//! provider is never trusted to honour it: every response goes through
//! `parse_evaluation`, which deserializes strictly and then checks ranges,
//! aggregates and classification.

use serde_json::{json, Map, Value};
use tracing::warn;

use crate::errors::AppError;
use crate::evaluation::models::{EvaluationCategory, EvaluationOutput, FitClassification};
use crate::evaluation::scoring;
use crate::llm_client::{strip_json_fences, JsonSchemaSpec, ResponseFormat};

pub const SCHEMA_NAME: &str = "resume_evaluation";
const MAX_SUMMARY_SENTENCES: usize = 3;
const SNIPPET_CHARS: usize = 300;

fn bounded_number() -> Value {
    json!({ "type": "number", "minimum": 0, "maximum": 100 })
}

/// JSON schema of `EvaluationOutput`.
pub fn evaluation_schema() -> Value {
    let category = json!({
        "type": "object",
        "properties": {
            "score": bounded_number(),
            "confidence": bounded_number(),
        },
        "required": ["score", "confidence"],
        "additionalProperties": false,
    });

    let mut categories = Map::new();
    for c in EvaluationCategory::ALL {
        categories.insert(c.key().to_string(), category.clone());
    }
    let category_keys: Vec<&str> = EvaluationCategory::ALL.iter().map(|c| c.key()).collect();
    let labels: Vec<&str> = FitClassification::ALL.iter().map(|c| c.label()).collect();

    json!({
        "type": "object",
        "properties": {
            "evaluation": {
                "type": "object",
                "properties": {
                    "categories": {
                        "type": "object",
                        "properties": categories,
                        "required": category_keys,
                        "additionalProperties": false,
                    },
                    "overall_match_score": bounded_number(),
                    "cumulative_confidence": bounded_number(),
                    "fit_classification": { "type": "string", "enum": labels },
                },
                "required": [
                    "categories",
                    "overall_match_score",
                    "cumulative_confidence",
                    "fit_classification"
                ],
                "additionalProperties": false,
            },
            "summary": {
                "type": "string",
                "description": "1-3 sentence summary of strengths, weaknesses and overall alignment",
            },
        },
        "required": ["evaluation", "summary"],
        "additionalProperties": false,
    })
}

pub fn response_format() -> ResponseFormat {
    ResponseFormat::JsonSchema {
        json_schema: JsonSchemaSpec {
            name: SCHEMA_NAME,
            strict: true,
            schema: evaluation_schema(),
        },
    }
}

/// Parses and validates raw model output.
///
/// Any non-JSON answer (including the plain-text rejection the prompt allows
/// for malformed inputs), missing or unknown field, unknown label, or
/// inconsistent number is an `AppError::SchemaValidation`.
pub fn parse_evaluation(raw: &str) -> Result<EvaluationOutput, AppError> {
    let text = strip_json_fences(raw);

    if !text.starts_with('{') {
        return Err(AppError::SchemaValidation(format!(
            "model did not return a JSON object; response began: \"{}\"",
            snippet(text)
        )));
    }

    let output: EvaluationOutput = serde_json::from_str(text).map_err(|e| {
        AppError::SchemaValidation(format!("response does not match the evaluation schema: {e}"))
    })?;

    let mut problems = scoring::violations(&output.evaluation);
    if output.summary.trim().is_empty() {
        problems.push("summary is empty".to_string());
    }
    if !problems.is_empty() {
        return Err(AppError::SchemaValidation(problems.join("; ")));
    }

    if scoring::inputs_flagged(&output.evaluation) {
        warn!(
            "Evaluator flagged the inputs as not resembling a resume and job description \
             (cumulative_confidence forced to 100)"
        );
    }

    let sentences = sentence_count(&output.summary);
    if sentences > MAX_SUMMARY_SENTENCES {
        warn!("Evaluation summary has {sentences} sentences (expected at most {MAX_SUMMARY_SENTENCES})");
    }

    Ok(output)
}

/// Counts sentence terminators followed by whitespace or end of text.
fn sentence_count(text: &str) -> usize {
    let chars: Vec<char> = text.trim().chars().collect();
    let terminators = chars
        .iter()
        .enumerate()
        .filter(|(i, c)| {
            matches!(c, '.' | '!' | '?') && chars.get(i + 1).map_or(true, |n| n.is_whitespace())
        })
        .count();
    terminators.max(1)
}

fn snippet(text: &str) -> String {
    let mut out: String = text.chars().take(SNIPPET_CHARS).collect();
    if text.chars().count() > SNIPPET_CHARS {
        out.push('…');
    }
    out
}
