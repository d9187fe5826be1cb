use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AnswerSet, DiagnosisId, Industry, IndustryId, Questionnaire, RespondentProfile,
};
use super::scoring::{DiagnosisOutcome, MaturityLevel, OptionWeightTable};

/// Stored diagnosis. The feedback resolved at submission time is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosisRecord {
    pub id: DiagnosisId,
    pub industry_id: IndustryId,
    pub respondent: RespondentProfile,
    pub answers: AnswerSet,
    pub outcome: DiagnosisOutcome,
    pub created_at: DateTime<Utc>,
}

impl DiagnosisRecord {
    pub fn summary_view(&self) -> DiagnosisSummaryView {
        DiagnosisSummaryView {
            id: self.id.clone(),
            industry_id: self.industry_id.clone(),
            respondent_name: self.respondent.name.clone(),
            company: self.respondent.company.clone(),
            overall_score: self.outcome.overall_score,
            maturity: self.outcome.maturity,
            created_at: self.created_at,
        }
    }
}

/// Compact row for history listings.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosisSummaryView {
    pub id: DiagnosisId,
    pub industry_id: IndustryId,
    pub respondent_name: String,
    pub company: String,
    pub overall_score: u8,
    pub maturity: MaturityLevel,
    pub created_at: DateTime<Utc>,
}

/// History search: free text over respondent fields plus an inclusive date window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

impl HistoryFilter {
    pub fn matches(&self, record: &DiagnosisRecord) -> bool {
        self.matches_search(&record.respondent) && self.matches_dates(record.created_at)
    }

    fn matches_search(&self, respondent: &RespondentProfile) -> bool {
        let Some(term) = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
        else {
            return true;
        };
        let needle = term.to_lowercase();

        [
            Some(respondent.name.as_str()),
            Some(respondent.company.as_str()),
            respondent.seller.as_deref(),
            respondent.account_executive.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_dates(&self, created_at: DateTime<Utc>) -> bool {
        let day = created_at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

/// Scope, questionnaire and weight storage.
pub trait CatalogRepository: Send + Sync {
    fn industries(&self) -> Result<Vec<Industry>, RepositoryError>;
    fn industry(&self, id: &IndustryId) -> Result<Option<Industry>, RepositoryError>;
    fn insert_industry(&self, industry: Industry) -> Result<Industry, RepositoryError>;
    fn update_industry(&self, industry: Industry) -> Result<(), RepositoryError>;
    /// Removes the scope together with its questionnaire and weights.
    fn remove_industry(&self, id: &IndustryId) -> Result<(), RepositoryError>;
    fn questionnaire(&self, id: &IndustryId) -> Result<Option<Questionnaire>, RepositoryError>;
    fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError>;
    fn weights(&self, id: &IndustryId) -> Result<Option<OptionWeightTable>, RepositoryError>;
    fn save_weights(
        &self,
        id: &IndustryId,
        weights: OptionWeightTable,
    ) -> Result<(), RepositoryError>;
}

/// Append-only diagnosis history (records are never edited, only removed).
pub trait HistoryRepository: Send + Sync {
    fn insert(&self, record: DiagnosisRecord) -> Result<DiagnosisRecord, RepositoryError>;
    fn fetch(&self, id: &DiagnosisId) -> Result<Option<DiagnosisRecord>, RepositoryError>;
    fn list(&self) -> Result<Vec<DiagnosisRecord>, RepositoryError>;
    fn remove(&self, id: &DiagnosisId) -> Result<bool, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
