use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for assessment scopes (industries).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndustryId(pub String);

/// Identifier wrapper for questionnaire sections.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SectionId(pub String);

/// Identifier wrapper for questions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Identifier wrapper for stored diagnoses.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiagnosisId(pub String);

macro_rules! impl_id_display {
    ($($ty:ty),*) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&self.0)
                }
            }

            impl From<&str> for $ty {
                fn from(value: &str) -> Self {
                    Self(value.to_string())
                }
            }
        )*
    };
}

impl_id_display!(IndustryId, SectionId, QuestionId, DiagnosisId);

/// Assessment scope owning its own questionnaire and weight table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    pub id: IndustryId,
    pub name: String,
    pub active: bool,
    /// Built-in scopes cannot be deleted.
    pub fixed: bool,
    pub created_at: DateTime<Utc>,
}

/// Narrative texts per maturity tier. Blank texts count as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackLevels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intermediate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub disabled: bool,
}

impl Question {
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<FeedbackLevels>,
}

impl Section {
    pub fn enabled_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(|question| question.is_enabled())
    }
}

/// Validated question structure for one scope.
///
/// Built through [`super::validation::QuestionnaireGuard`], which guarantees unique ids and a
/// uniform option count across every question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Questionnaire {
    industry_id: IndustryId,
    option_count: usize,
    sections: Vec<Section>,
}

impl Questionnaire {
    pub(crate) fn from_parts(
        industry_id: IndustryId,
        option_count: usize,
        sections: Vec<Section>,
    ) -> Self {
        Self {
            industry_id,
            option_count,
            sections,
        }
    }

    /// An empty questionnaire for a scope nobody has configured yet.
    pub fn empty(industry_id: IndustryId, option_count: usize) -> Self {
        Self::from_parts(industry_id, option_count, Vec::new())
    }

    pub fn industry_id(&self) -> &IndustryId {
        &self.industry_id
    }

    pub fn option_count(&self) -> usize {
        self.option_count
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.enabled_questions().count())
            .sum()
    }

    pub fn find_question(&self, id: &QuestionId) -> Option<&Question> {
        self.sections
            .iter()
            .flat_map(|section| section.questions.iter())
            .find(|question| &question.id == id)
    }

    pub(crate) fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }
}

/// Selected option index per question, gathered while the respondent answers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet(BTreeMap<QuestionId, usize>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store or overwrite the answer for a question.
    pub fn record(&mut self, question: QuestionId, option_index: usize) -> &mut Self {
        self.0.insert(question, option_index);
        self
    }

    pub fn selected(&self, question: &QuestionId) -> Option<usize> {
        self.0.get(question).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&QuestionId, usize)> {
        self.0.iter().map(|(id, index)| (id, *index))
    }
}

impl FromIterator<(QuestionId, usize)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (QuestionId, usize)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Who answered the diagnosis. Opaque to scoring, stored verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RespondentProfile {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_executive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_cycle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_headcount: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revenue_band: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_band: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub erp: Option<String>,
}

/// Inbound request to score and store a diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisSubmission {
    pub industry_id: IndustryId,
    pub respondent: RespondentProfile,
    pub answers: AnswerSet,
}
