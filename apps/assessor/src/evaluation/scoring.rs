//! Aggregate arithmetic and classification rules for an evaluation.
//!
//! The model computes the aggregates itself; these functions recompute them
//! so the response can be checked, never to overwrite what the model sent.

use crate::evaluation::models::{Categories, Evaluation, FitClassification};

/// Lower bound (inclusive) of "Strong Fit".
pub const STRONG_FIT_THRESHOLD: f64 = 85.0;
/// Lower bound (inclusive) of "Moderate Fit".
pub const MODERATE_FIT_THRESHOLD: f64 = 50.0;
/// Aggregates are rounded to two decimals; allow one unit in the last place.
pub const AGGREGATE_TOLERANCE: f64 = 0.01 + 1e-9;
/// `cumulative_confidence` value the model uses to flag rejected inputs.
pub const REJECTED_INPUT_CONFIDENCE: f64 = 100.0;

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// round2(mean of the six category scores).
pub fn expected_overall_score(categories: &Categories) -> f64 {
    round2(mean(categories.iter().map(|(_, s)| s.score)))
}

/// round2(mean of the six category confidences).
pub fn expected_cumulative_confidence(categories: &Categories) -> f64 {
    round2(mean(categories.iter().map(|(_, s)| s.confidence)))
}

/// ≥ 85 → Strong; [50, 85) → Moderate; < 50 → Weak.
pub fn classify(overall_match_score: f64) -> FitClassification {
    if overall_match_score >= STRONG_FIT_THRESHOLD {
        FitClassification::StrongFit
    } else if overall_match_score >= MODERATE_FIT_THRESHOLD {
        FitClassification::ModerateFit
    } else {
        FitClassification::WeakFit
    }
}

/// True when the evaluator forced `cumulative_confidence` to 100 although the
/// category confidences do not average to it.
pub fn inputs_flagged(evaluation: &Evaluation) -> bool {
    evaluation.cumulative_confidence == REJECTED_INPUT_CONFIDENCE
        && (expected_cumulative_confidence(&evaluation.categories) - REJECTED_INPUT_CONFIDENCE).abs()
            > AGGREGATE_TOLERANCE
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn in_range(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

/// Returns every rule the evaluation breaks; empty when it is consistent.
pub fn violations(evaluation: &Evaluation) -> Vec<String> {
    let mut problems = Vec::new();

    for (category, score) in evaluation.categories.iter() {
        if !in_range(score.score) {
            problems.push(format!(
                "{}.score {} is outside [0, 100]",
                category.key(),
                score.score
            ));
        }
        if !in_range(score.confidence) {
            problems.push(format!(
                "{}.confidence {} is outside [0, 100]",
                category.key(),
                score.confidence
            ));
        }
    }
    if !in_range(evaluation.overall_match_score) {
        problems.push(format!(
            "overall_match_score {} is outside [0, 100]",
            evaluation.overall_match_score
        ));
    }
    if !in_range(evaluation.cumulative_confidence) {
        problems.push(format!(
            "cumulative_confidence {} is outside [0, 100]",
            evaluation.cumulative_confidence
        ));
    }
    // Aggregate checks are meaningless on out-of-range input.
    if !problems.is_empty() {
        return problems;
    }

    let expected_overall = expected_overall_score(&evaluation.categories);
    if (evaluation.overall_match_score - expected_overall).abs() > AGGREGATE_TOLERANCE {
        problems.push(format!(
            "overall_match_score {} does not equal the mean category score {expected_overall}",
            evaluation.overall_match_score
        ));
    }

    // A forced 100 is the evaluator's input-rejection signal, not a mean.
    let expected_confidence = expected_cumulative_confidence(&evaluation.categories);
    if !inputs_flagged(evaluation)
        && (evaluation.cumulative_confidence - expected_confidence).abs() > AGGREGATE_TOLERANCE
    {
        problems.push(format!(
            "cumulative_confidence {} does not equal the mean category confidence {expected_confidence}",
            evaluation.cumulative_confidence
        ));
    }

    let expected_class = classify(evaluation.overall_match_score);
    if evaluation.fit_classification != expected_class {
        problems.push(format!(
            "fit_classification '{}' does not match overall_match_score {} (expected '{}')",
            evaluation.fit_classification, evaluation.overall_match_score, expected_class
        ));
    }

    problems
}
