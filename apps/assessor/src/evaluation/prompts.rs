// Prompt text for the evaluation stage.
// The category table is generated from `EvaluationCategory` so keys and
// weights cannot drift from the schema.

use crate::evaluation::models::EvaluationCategory;
use crate::evaluation::scoring::{MODERATE_FIT_THRESHOLD, STRONG_FIT_THRESHOLD};

/// Evaluation instructions. Replace `{weights_section}`, `{strong}` and
/// `{moderate}` before sending; the documents are appended afterwards by
/// `build_evaluation_prompt`, never substituted, so document text can't
/// collide with a placeholder.
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter and data-driven talent evaluator.

-- Session Reset --
Ignore all previous context. Treat this request on its own.

-- Variable Initialization --
Set the variable `incorrect_input` = False.

-- Task Overview --
1. Validate the inputs:
   - Check that the candidate resume is structured like a typical professional resume
     (for example it has sections such as Experience, Education, Skills).
   - Check that the job description is structured like a standard advertised position
     (for example it has a title, responsibilities, requirements).

   If either input is invalid:
   - Set `incorrect_input` = True.
   - Output a plain text error message explaining why the input failed validation.
   - Stop further processing.

2. If both inputs are valid:
   - Compare the candidate resume to the job description.
   - Produce a structured numeric evaluation over the categories below.

-- Evaluation Categories and Weights --
{weights_section}

For each category provide:
- `score`: 0-100
  (100 = perfect alignment, 50 = partial alignment, 0 = no evidence)
- `confidence`: 0-100
  (100 = very high confidence, 50 = partial confidence, 0 = no confidence)

Definitions:
- score: how well the candidate meets the job's requirements in that category.
- confidence: how certain you are of the score, given the evidence in the resume.

-- Final Aggregates --
- `overall_match_score` = (sum of the six category scores / 6), rounded to 2 decimals.
- `cumulative_confidence` = (sum of the six category confidences / 6), rounded to 2 decimals.
  If `incorrect_input` is True, set cumulative_confidence = 100.
- `fit_classification`, exactly one of:
  - "Strong Fit" (overall_match_score >= {strong})
  - "Moderate Fit" ({moderate} <= overall_match_score < {strong})
  - "Weak Fit" (overall_match_score < {moderate})

Write a 1-3 sentence `summary` of the main compatibilities and gaps between the resume
and the job description.

-- Output Requirements --
Output ONLY valid JSON with exactly these fields:

{
  "evaluation": {
    "categories": {
      "Technical_Skills": { "score": 0-100, "confidence": 0-100 },
      "Domain_Knowledge": { "score": 0-100, "confidence": 0-100 },
      "Experience_Level": { "score": 0-100, "confidence": 0-100 },
      "Tools_and_Technologies": { "score": 0-100, "confidence": 0-100 },
      "Education_and_Certifications": { "score": 0-100, "confidence": 0-100 },
      "Soft_Skills": { "score": 0-100, "confidence": 0-100 }
    },
    "overall_match_score": number,
    "cumulative_confidence": number,
    "fit_classification": "Strong Fit" | "Moderate Fit" | "Weak Fit"
  },
  "summary": "1-3 sentence summary"
}

Do NOT include any other text, markdown formatting, comments, or keys."#;

/// "- Technical_Skills (30%)" lines, one per category.
pub fn weights_section() -> String {
    let mut section = String::from("Use these exact JSON keys and weights:");
    for category in EvaluationCategory::ALL {
        section.push_str(&format!(
            "\n- {} ({}%): {}",
            category.key(),
            category.weight_percent(),
            category.display_name()
        ));
    }
    section
}

/// Builds the full evaluation prompt for one resume/job pair.
pub fn build_evaluation_prompt(redacted_resume: &str, job_description: &str) -> String {
    let mut prompt = EVALUATION_PROMPT_TEMPLATE
        .replace("{weights_section}", &weights_section())
        .replace("{strong}", &STRONG_FIT_THRESHOLD.to_string())
        .replace("{moderate}", &MODERATE_FIT_THRESHOLD.to_string());

    prompt.push_str("\n\n-- User Inputs --\n\nCandidate Resume:\n");
    prompt.push_str(redacted_resume);
    prompt.push_str("\n\nJob Description:\n");
    prompt.push_str(job_description);
    prompt
}
