use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{
    FeedbackLevels, IndustryId, Question, QuestionId, Questionnaire, Section, SectionId,
};

pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Loosely shaped questionnaire as received from administrators or imports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionnaireDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_count: Option<usize>,
    #[serde(default)]
    pub sections: Vec<SectionDraft>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackLevels>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl From<&Questionnaire> for QuestionnaireDraft {
    fn from(questionnaire: &Questionnaire) -> Self {
        Self {
            option_count: Some(questionnaire.option_count()),
            sections: questionnaire
                .sections()
                .iter()
                .map(|section| SectionDraft {
                    id: Some(section.id.0.clone()),
                    title: Some(section.title.clone()),
                    questions: section
                        .questions
                        .iter()
                        .map(|question| QuestionDraft {
                            id: Some(question.id.0.clone()),
                            text: Some(question.text.clone()),
                            options: question.options.clone(),
                            disabled: question.disabled,
                        })
                        .collect(),
                    feedback: section.feedback.clone(),
                })
                .collect(),
        }
    }
}

/// Structural problems that keep a draft from becoming a [`Questionnaire`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireViolation {
    #[error("questions must offer at least one option")]
    ZeroOptionCount,
    #[error("section #{position} has no title")]
    BlankSectionTitle { position: usize },
    #[error("section id '{0}' is used more than once")]
    DuplicateSection(String),
    #[error("question #{position} of section '{section}' has no text")]
    BlankQuestionText { section: String, position: usize },
    #[error("question id '{0}' is used more than once")]
    DuplicateQuestion(String),
    #[error("question '{question}' has {found} options, expected {expected}")]
    OptionCountMismatch {
        question: String,
        expected: usize,
        found: usize,
    },
    #[error("question '{question}' has a blank option at position {position}")]
    BlankOption { question: String, position: usize },
}

/// Boundary check turning drafts into typed questionnaires.
#[derive(Debug, Clone)]
pub struct QuestionnaireGuard {
    default_option_count: usize,
}

impl Default for QuestionnaireGuard {
    fn default() -> Self {
        Self::with_option_count(DEFAULT_OPTION_COUNT)
    }
}

impl QuestionnaireGuard {
    pub fn with_option_count(default_option_count: usize) -> Self {
        Self {
            default_option_count,
        }
    }

    pub fn default_option_count(&self) -> usize {
        self.default_option_count
    }

    pub fn questionnaire_from_draft(
        &self,
        industry_id: &IndustryId,
        draft: QuestionnaireDraft,
    ) -> Result<Questionnaire, QuestionnaireViolation> {
        let option_count = draft.option_count.unwrap_or(self.default_option_count);
        if option_count == 0 {
            return Err(QuestionnaireViolation::ZeroOptionCount);
        }

        let mut section_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        let mut sections = Vec::with_capacity(draft.sections.len());

        for (section_index, section) in draft.sections.into_iter().enumerate() {
            let position = section_index + 1;
            let title = non_blank(section.title)
                .ok_or(QuestionnaireViolation::BlankSectionTitle { position })?;
            let id = non_blank(section.id).unwrap_or_else(|| format!("{industry_id}-s{position}"));
            if !section_ids.insert(id.clone()) {
                return Err(QuestionnaireViolation::DuplicateSection(id));
            }

            let mut questions = Vec::with_capacity(section.questions.len());
            for (question_index, question) in section.questions.into_iter().enumerate() {
                let question_position = question_index + 1;
                let text = non_blank(question.text).ok_or_else(|| {
                    QuestionnaireViolation::BlankQuestionText {
                        section: id.clone(),
                        position: question_position,
                    }
                })?;
                let question_id = non_blank(question.id)
                    .unwrap_or_else(|| format!("{id}-q{question_position}"));
                if !question_ids.insert(question_id.clone()) {
                    return Err(QuestionnaireViolation::DuplicateQuestion(question_id));
                }

                if question.options.len() != option_count {
                    return Err(QuestionnaireViolation::OptionCountMismatch {
                        question: question_id,
                        expected: option_count,
                        found: question.options.len(),
                    });
                }

                if let Some(blank) = question
                    .options
                    .iter()
                    .position(|option| option.trim().is_empty())
                {
                    return Err(QuestionnaireViolation::BlankOption {
                        question: question_id,
                        position: blank,
                    });
                }

                questions.push(Question {
                    id: QuestionId(question_id),
                    text,
                    options: question
                        .options
                        .into_iter()
                        .map(|option| option.trim().to_string())
                        .collect(),
                    disabled: question.disabled,
                });
            }

            sections.push(Section {
                id: SectionId(id),
                title,
                questions,
                feedback: section.feedback,
            });
        }

        Ok(Questionnaire::from_parts(
            industry_id.clone(),
            option_count,
            sections,
        ))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
