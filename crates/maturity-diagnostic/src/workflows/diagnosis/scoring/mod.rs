mod maturity;
mod rules;
mod weights;

pub use maturity::{
    MaturityLevel, MaturityTier, DEFAULT_ADVANCED_FEEDBACK, DEFAULT_BASIC_FEEDBACK,
    DEFAULT_INITIAL_FEEDBACK, DEFAULT_INTERMEDIATE_FEEDBACK,
};
pub use weights::{
    OptionWeightTable, WeightParseError, WeightViolation, DEFAULT_OPTION_WEIGHTS, MAX_WEIGHT,
};

use super::domain::{AnswerSet, Questionnaire, Section, SectionId};
use maturity::resolve_feedback;
use serde::{Deserialize, Serialize};

/// Stateless scorer bound to one resolved weight table.
///
/// Each call works only on its arguments, so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    weights: OptionWeightTable,
}

impl ScoringEngine {
    pub fn new(weights: OptionWeightTable) -> Self {
        Self { weights }
    }

    /// Engine using the scope table when it fits the option count, the default otherwise.
    pub fn resolved(configured: Option<&OptionWeightTable>, option_count: usize) -> Self {
        Self::new(OptionWeightTable::resolve(configured, option_count))
    }

    pub fn weights(&self) -> &OptionWeightTable {
        &self.weights
    }

    pub fn score(&self, questionnaire: &Questionnaire, answers: &AnswerSet) -> DiagnosisOutcome {
        self.score_sections(questionnaire.sections(), answers)
    }

    pub fn score_sections(&self, sections: &[Section], answers: &AnswerSet) -> DiagnosisOutcome {
        let results: Vec<SectionResult> = sections
            .iter()
            .filter_map(|section| self.score_section(section, answers))
            .collect();

        let scores: Vec<u8> = results.iter().map(|result| result.score).collect();
        let overall_score = rules::overall_percentage(&scores);

        DiagnosisOutcome {
            overall_score,
            maturity: MaturityLevel::for_overall_score(overall_score),
            sections: results,
        }
    }

    /// `None` for sections without enabled questions.
    pub fn score_section(&self, section: &Section, answers: &AnswerSet) -> Option<SectionResult> {
        let tally = rules::tally_section(section, answers, &self.weights)?;
        let score = tally.percentage();
        let tier = MaturityTier::for_section_score(score);

        Some(SectionResult {
            section_id: section.id.clone(),
            title: section.title.clone(),
            score,
            tier,
            feedback: resolve_feedback(section.feedback.as_ref(), tier),
        })
    }
}

/// Resolve the scope's weights and score in one step.
pub fn score_diagnosis(
    questionnaire: &Questionnaire,
    answers: &AnswerSet,
    configured_weights: Option<&OptionWeightTable>,
) -> DiagnosisOutcome {
    ScoringEngine::resolved(configured_weights, questionnaire.option_count())
        .score(questionnaire, answers)
}

/// Score and narrative for a single section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionResult {
    pub section_id: SectionId,
    pub title: String,
    pub score: u8,
    pub tier: MaturityTier,
    pub feedback: String,
}

/// Aggregated result of one diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisOutcome {
    pub overall_score: u8,
    pub maturity: MaturityLevel,
    pub sections: Vec<SectionResult>,
}

impl DiagnosisOutcome {
    pub fn summary(&self) -> String {
        format!("{}% ({})", self.overall_score, self.maturity.label())
    }

    pub fn weakest_section(&self) -> Option<&SectionResult> {
        self.sections.iter().min_by_key(|section| section.score)
    }

    pub fn strongest_section(&self) -> Option<&SectionResult> {
        self.sections.iter().max_by_key(|section| section.score)
    }
}
