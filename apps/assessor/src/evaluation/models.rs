use std::fmt;

use serde::{Deserialize, Serialize};

/// The six scored dimensions, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationCategory {
    TechnicalSkills,
    DomainKnowledge,
    ExperienceLevel,
    ToolsAndTechnologies,
    EducationAndCertifications,
    SoftSkills,
}

impl EvaluationCategory {
    pub const ALL: [EvaluationCategory; 6] = [
        EvaluationCategory::TechnicalSkills,
        EvaluationCategory::DomainKnowledge,
        EvaluationCategory::ExperienceLevel,
        EvaluationCategory::ToolsAndTechnologies,
        EvaluationCategory::EducationAndCertifications,
        EvaluationCategory::SoftSkills,
    ];

    /// JSON key under `evaluation.categories`.
    pub fn key(self) -> &'static str {
        match self {
            EvaluationCategory::TechnicalSkills => "Technical_Skills",
            EvaluationCategory::DomainKnowledge => "Domain_Knowledge",
            EvaluationCategory::ExperienceLevel => "Experience_Level",
            EvaluationCategory::ToolsAndTechnologies => "Tools_and_Technologies",
            EvaluationCategory::EducationAndCertifications => "Education_and_Certifications",
            EvaluationCategory::SoftSkills => "Soft_Skills",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            EvaluationCategory::TechnicalSkills => "Technical Skills",
            EvaluationCategory::DomainKnowledge => "Domain Knowledge",
            EvaluationCategory::ExperienceLevel => "Experience Level",
            EvaluationCategory::ToolsAndTechnologies => "Tools & Technologies",
            EvaluationCategory::EducationAndCertifications => "Education & Certifications",
            EvaluationCategory::SoftSkills => "Soft Skills",
        }
    }

    /// Relative importance shown to the model. Guidance only: aggregates are
    /// plain means and never use these weights.
    pub fn weight_percent(self) -> u8 {
        match self {
            EvaluationCategory::TechnicalSkills => 30,
            EvaluationCategory::DomainKnowledge => 20,
            EvaluationCategory::ExperienceLevel => 20,
            EvaluationCategory::ToolsAndTechnologies => 15,
            EvaluationCategory::EducationAndCertifications => 10,
            EvaluationCategory::SoftSkills => 5,
        }
    }
}

/// Score and confidence for one category, both on a 0–100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryScore {
    pub score: f64,
    pub confidence: f64,
}

/// All six category scores. Keys must match exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Categories {
    #[serde(rename = "Technical_Skills")]
    pub technical_skills: CategoryScore,
    #[serde(rename = "Domain_Knowledge")]
    pub domain_knowledge: CategoryScore,
    #[serde(rename = "Experience_Level")]
    pub experience_level: CategoryScore,
    #[serde(rename = "Tools_and_Technologies")]
    pub tools_and_technologies: CategoryScore,
    #[serde(rename = "Education_and_Certifications")]
    pub education_and_certifications: CategoryScore,
    #[serde(rename = "Soft_Skills")]
    pub soft_skills: CategoryScore,
}

impl Categories {
    pub fn get(&self, category: EvaluationCategory) -> &CategoryScore {
        match category {
            EvaluationCategory::TechnicalSkills => &self.technical_skills,
            EvaluationCategory::DomainKnowledge => &self.domain_knowledge,
            EvaluationCategory::ExperienceLevel => &self.experience_level,
            EvaluationCategory::ToolsAndTechnologies => &self.tools_and_technologies,
            EvaluationCategory::EducationAndCertifications => &self.education_and_certifications,
            EvaluationCategory::SoftSkills => &self.soft_skills,
        }
    }

    /// Categories in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (EvaluationCategory, &CategoryScore)> + '_ {
        EvaluationCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitClassification {
    #[serde(rename = "Strong Fit")]
    StrongFit,
    #[serde(rename = "Moderate Fit")]
    ModerateFit,
    #[serde(rename = "Weak Fit")]
    WeakFit,
}

impl FitClassification {
    pub const ALL: [FitClassification; 3] = [
        FitClassification::StrongFit,
        FitClassification::ModerateFit,
        FitClassification::WeakFit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FitClassification::StrongFit => "Strong Fit",
            FitClassification::ModerateFit => "Moderate Fit",
            FitClassification::WeakFit => "Weak Fit",
        }
    }
}

impl fmt::Display for FitClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rollups over the six categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Evaluation {
    pub categories: Categories,
    pub overall_match_score: f64,
    pub cumulative_confidence: f64,
    pub fit_classification: FitClassification,
}

/// The evaluation stage's result, printed as-is on stdout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationOutput {
    pub evaluation: Evaluation,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn uniform_categories(score: f64, confidence: f64) -> Categories {
        let s = CategoryScore { score, confidence };
        Categories {
            technical_skills: s,
            domain_knowledge: s,
            experience_level: s,
            tools_and_technologies: s,
            education_and_certifications: s,
            soft_skills: s,
        }
    }

    #[test]
    fn test_weights_sum_to_100() {
        let total: u32 = EvaluationCategory::ALL
            .iter()
            .map(|c| c.weight_percent() as u32)
            .sum();
        assert_eq!(total, 100);
    }

    #[test]
    fn test_category_keys_match_serde_names() {
        let value = serde_json::to_value(uniform_categories(10.0, 20.0)).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 6);
        for category in EvaluationCategory::ALL {
            assert!(object.contains_key(category.key()), "missing {}", category.key());
        }
    }

    #[test]
    fn test_output_serializes_in_documented_shape() {
        let output = EvaluationOutput {
            evaluation: Evaluation {
                categories: uniform_categories(80.0, 90.0),
                overall_match_score: 80.0,
                cumulative_confidence: 90.0,
                fit_classification: FitClassification::ModerateFit,
            },
            summary: "Solid match.".to_string(),
        };
        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value["evaluation"]["fit_classification"], "Moderate Fit");
        assert_eq!(
            value["evaluation"]["categories"]["Tools_and_Technologies"],
            json!({"score": 80.0, "confidence": 90.0})
        );
        assert_eq!(value["summary"], "Solid match.");

        // Key order follows the documented layout.
        let text = serde_json::to_string_pretty(&output).unwrap();
        let categories_at = text.find("\"categories\"").unwrap();
        let overall_at = text.find("\"overall_match_score\"").unwrap();
        let summary_at = text.find("\"summary\"").unwrap();
        assert!(categories_at < overall_at && overall_at < summary_at);
    }

    #[test]
    fn test_classification_labels_serialize_as_display_text() {
        for classification in FitClassification::ALL {
            let json = serde_json::to_string(&classification).unwrap();
            assert_eq!(json, format!("\"{}\"", classification.label()));
        }
        assert!(serde_json::from_str::<FitClassification>("\"Excellent Fit\"").is_err());
        assert!(serde_json::from_str::<FitClassification>("\"strong fit\"").is_err());
    }

    #[test]
    fn test_categories_iterate_in_canonical_order() {
        let categories = uniform_categories(1.0, 2.0);
        let order: Vec<_> = categories.iter().map(|(c, _)| c).collect();
        assert_eq!(order, EvaluationCategory::ALL.to_vec());
    }
}
