//! Business maturity diagnosis: catalog of assessment scopes, the scoring engine, and the
//! history of submitted diagnoses.
//!
//! Scores are computed server side from the scope's questionnaire and weight table, and the
//! resolved feedback is stored with each record so later edits to the catalog never rewrite
//! past results.

pub mod blueprint;
pub mod cache;
pub mod domain;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use blueprint::{QuestionnaireBlueprint, STANDARD_INDUSTRY_ID, STANDARD_INDUSTRY_NAME};
pub use cache::QuestionnaireCache;
pub use domain::{
    AnswerSet, DiagnosisId, DiagnosisSubmission, FeedbackLevels, Industry, IndustryId, Question,
    QuestionId, Questionnaire, RespondentProfile, Section, SectionId,
};
pub use repository::{
    CatalogRepository, DiagnosisRecord, DiagnosisSummaryView, HistoryFilter, HistoryRepository,
    RepositoryError,
};
pub use router::diagnosis_router;
pub use scoring::{
    score_diagnosis, DiagnosisOutcome, MaturityLevel, MaturityTier, OptionWeightTable,
    ScoringEngine, SectionResult, WeightParseError, WeightViolation,
};
pub use service::{
    CatalogError, DiagnosisService, DiagnosisServiceError, FeedbackImportSummary, ImportSummary,
};
pub use validation::{
    QuestionDraft, QuestionnaireDraft, QuestionnaireGuard, QuestionnaireViolation, SectionDraft,
};
