use std::collections::BTreeMap;
use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::blueprint::{QuestionnaireBlueprint, STANDARD_INDUSTRY_NAME};
use super::cache::QuestionnaireCache;
use super::domain::{DiagnosisId, DiagnosisSubmission, Industry, IndustryId, Questionnaire};
use super::repository::{
    CatalogRepository, DiagnosisRecord, HistoryFilter, HistoryRepository, RepositoryError,
};
use super::scoring::{score_diagnosis, OptionWeightTable, WeightViolation};
use super::validation::{QuestionnaireDraft, QuestionnaireGuard, QuestionnaireViolation};
use crate::workflows::import::{same_name, FeedbackImporter, ImportError, QuestionImporter};

/// Service composing the catalog, the questionnaire guard and cache, the scoring engine and
/// the diagnosis history.
pub struct DiagnosisService<C, H> {
    catalog: Arc<C>,
    history: Arc<H>,
    guard: QuestionnaireGuard,
    cache: QuestionnaireCache,
    new_scope_weights: OptionWeightTable,
    diagnosis_sequence: AtomicU64,
    industry_sequence: AtomicU64,
    /// Held while a scope name is checked and written, keeping names unique.
    name_writes: Mutex<()>,
}

impl<C, H> DiagnosisService<C, H>
where
    C: CatalogRepository + 'static,
    H: HistoryRepository + 'static,
{
    pub fn new(catalog: Arc<C>, history: Arc<H>) -> Self {
        Self {
            catalog,
            history,
            guard: QuestionnaireGuard::default(),
            cache: QuestionnaireCache::new(),
            new_scope_weights: OptionWeightTable::default(),
            diagnosis_sequence: AtomicU64::new(1),
            industry_sequence: AtomicU64::new(1),
            name_writes: Mutex::new(()),
        }
    }

    /// Weight table stored for scopes created from now on.
    pub fn with_new_scope_weights(mut self, weights: OptionWeightTable) -> Self {
        self.new_scope_weights = weights;
        self
    }

    pub fn with_guard(mut self, guard: QuestionnaireGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn cache(&self) -> &QuestionnaireCache {
        &self.cache
    }

    /// Insert the built-in "Geral" scope with the standard questionnaire when it is missing.
    ///
    /// Returns `true` when the scope was created.
    pub fn seed_standard_catalog(&self) -> Result<bool, DiagnosisServiceError> {
        let id = QuestionnaireBlueprint::industry_id();
        if self.catalog.industry(&id)?.is_some() {
            return Ok(false);
        }

        let blueprint = QuestionnaireBlueprint::standard();
        self.catalog.insert_industry(Industry {
            id: id.clone(),
            name: STANDARD_INDUSTRY_NAME.to_string(),
            active: true,
            fixed: true,
            created_at: Utc::now(),
        })?;
        self.catalog.save_questionnaire(blueprint.questionnaire())?;
        self.catalog
            .save_weights(&id, OptionWeightTable::default())?;
        self.cache.invalidate(&id);

        info!(industry = %id, "seeded standard assessment scope");
        Ok(true)
    }

    /// Scopes ordered by creation. Inactive scopes are only listed on request.
    pub fn industries(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<Industry>, DiagnosisServiceError> {
        let mut industries: Vec<Industry> = self
            .catalog
            .industries()?
            .into_iter()
            .filter(|industry| include_inactive || industry.active)
            .collect();
        industries.sort_by(|left, right| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left.id.cmp(&right.id))
        });
        Ok(industries)
    }

    pub fn industry(&self, id: &IndustryId) -> Result<Industry, DiagnosisServiceError> {
        self.catalog
            .industry(id)?
            .ok_or_else(|| CatalogError::UnknownIndustry(id.clone()).into())
    }

    pub fn create_industry(&self, name: &str) -> Result<Industry, DiagnosisServiceError> {
        let _names = self.name_writes.lock().expect("name write lock poisoned");
        let name = self.available_name(name, None)?;
        let id = self.next_industry_id()?;

        let industry = self.catalog.insert_industry(Industry {
            id: id.clone(),
            name,
            active: true,
            fixed: false,
            created_at: Utc::now(),
        })?;
        self.catalog.save_questionnaire(Questionnaire::empty(
            id.clone(),
            self.guard.default_option_count(),
        ))?;
        self.catalog
            .save_weights(&id, self.new_scope_weights.clone())?;

        info!(industry = %industry.id, name = %industry.name, "created assessment scope");
        Ok(industry)
    }

    pub fn rename_industry(
        &self,
        id: &IndustryId,
        name: &str,
    ) -> Result<Industry, DiagnosisServiceError> {
        let _names = self.name_writes.lock().expect("name write lock poisoned");
        let mut industry = self.industry(id)?;
        industry.name = self.available_name(name, Some(id))?;
        self.catalog.update_industry(industry.clone())?;
        Ok(industry)
    }

    pub fn toggle_industry(&self, id: &IndustryId) -> Result<Industry, DiagnosisServiceError> {
        let mut industry = self.industry(id)?;
        industry.active = !industry.active;
        self.catalog.update_industry(industry.clone())?;
        info!(industry = %id, active = industry.active, "toggled assessment scope");
        Ok(industry)
    }

    /// Remove a scope with its questionnaire and weights. Built-in scopes are refused.
    pub fn delete_industry(&self, id: &IndustryId) -> Result<(), DiagnosisServiceError> {
        let industry = self.industry(id)?;
        if industry.fixed {
            return Err(CatalogError::FixedIndustry(id.clone()).into());
        }

        self.catalog.remove_industry(id)?;
        self.cache.invalidate(id);
        info!(industry = %id, "deleted assessment scope");
        Ok(())
    }

    /// Questionnaire of a scope, served from the cache after the first load.
    pub fn questionnaire(
        &self,
        id: &IndustryId,
    ) -> Result<Arc<Questionnaire>, DiagnosisServiceError> {
        self.cache.get_or_load(id, || {
            self.industry(id)?;
            debug!(industry = %id, "loading questionnaire into cache");
            let stored = self.catalog.questionnaire(id)?;
            Ok(stored.unwrap_or_else(|| {
                Questionnaire::empty(id.clone(), self.guard.default_option_count())
            }))
        })
    }

    pub fn replace_questionnaire(
        &self,
        id: &IndustryId,
        draft: QuestionnaireDraft,
    ) -> Result<Arc<Questionnaire>, DiagnosisServiceError> {
        self.industry(id)?;
        let questionnaire = self.guard.questionnaire_from_draft(id, draft)?;
        self.catalog.save_questionnaire(questionnaire.clone())?;
        self.cache.invalidate(id);

        info!(
            industry = %id,
            sections = questionnaire.sections().len(),
            questions = questionnaire.question_count(),
            "replaced questionnaire"
        );
        Ok(Arc::new(questionnaire))
    }

    /// Effective weight table: the stored one when it fits the option count, the default
    /// otherwise.
    pub fn weights(&self, id: &IndustryId) -> Result<OptionWeightTable, DiagnosisServiceError> {
        let questionnaire = self.questionnaire(id)?;
        let stored = self.catalog.weights(id)?;
        Ok(OptionWeightTable::resolve(
            stored.as_ref(),
            questionnaire.option_count(),
        ))
    }

    pub fn update_weights(
        &self,
        id: &IndustryId,
        weights: OptionWeightTable,
    ) -> Result<OptionWeightTable, DiagnosisServiceError> {
        let questionnaire = self.questionnaire(id)?;
        weights.validate(questionnaire.option_count())?;
        self.catalog.save_weights(id, weights.clone())?;
        info!(industry = %id, weights = ?weights.as_slice(), "updated option weights");
        Ok(weights)
    }

    /// Score a submission against its scope and store the result.
    pub fn submit(
        &self,
        submission: DiagnosisSubmission,
    ) -> Result<DiagnosisRecord, DiagnosisServiceError> {
        let industry = self.industry(&submission.industry_id)?;
        if !industry.active {
            return Err(CatalogError::InactiveIndustry(industry.id).into());
        }

        let questionnaire = self.questionnaire(&industry.id)?;
        let stored_weights = self.catalog.weights(&industry.id)?;
        let outcome = score_diagnosis(&questionnaire, &submission.answers, stored_weights.as_ref());

        let unknown = submission
            .answers
            .iter()
            .filter(|(question, _)| questionnaire.find_question(question).is_none())
            .count();
        if unknown > 0 {
            warn!(industry = %industry.id, unknown, "submission answers unknown questions");
        }

        let record = DiagnosisRecord {
            id: self.next_diagnosis_id()?,
            industry_id: industry.id,
            respondent: submission.respondent,
            answers: submission.answers,
            outcome,
            created_at: Utc::now(),
        };
        let stored = self.history.insert(record)?;

        info!(
            diagnosis = %stored.id,
            industry = %stored.industry_id,
            overall_score = stored.outcome.overall_score,
            maturity = stored.outcome.maturity.label(),
            "stored diagnosis"
        );
        Ok(stored)
    }

    /// Stored diagnoses matching `filter`, newest first.
    pub fn history(
        &self,
        filter: &HistoryFilter,
    ) -> Result<Vec<DiagnosisRecord>, DiagnosisServiceError> {
        let mut records: Vec<DiagnosisRecord> = self
            .history
            .list()?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by(|left, right| {
            right
                .created_at
                .cmp(&left.created_at)
                .then_with(|| right.id.cmp(&left.id))
        });
        Ok(records)
    }

    pub fn record(&self, id: &DiagnosisId) -> Result<DiagnosisRecord, DiagnosisServiceError> {
        self.history
            .fetch(id)?
            .ok_or_else(|| CatalogError::UnknownDiagnosis(id.clone()).into())
    }

    pub fn delete_record(&self, id: &DiagnosisId) -> Result<(), DiagnosisServiceError> {
        if !self.history.remove(id)? {
            return Err(CatalogError::UnknownDiagnosis(id.clone()).into());
        }
        info!(diagnosis = %id, "deleted diagnosis");
        Ok(())
    }

    /// Remove every listed diagnosis, returning how many existed.
    pub fn delete_records(&self, ids: &[DiagnosisId]) -> Result<usize, DiagnosisServiceError> {
        let mut removed = 0;
        for id in ids {
            if self.history.remove(id)? {
                removed += 1;
            }
        }
        info!(requested = ids.len(), removed, "bulk deleted diagnoses");
        Ok(removed)
    }

    /// Replace the questionnaire of every industry named in a questions spreadsheet,
    /// creating industries that do not exist yet.
    pub fn import_questions<R: Read>(
        &self,
        reader: R,
    ) -> Result<ImportSummary, DiagnosisServiceError> {
        let scopes = QuestionImporter::from_reader(reader)?;
        let mut summary = ImportSummary::default();

        for scope in scopes {
            let industry = match self.find_industry_by_name(&scope.industry_name)? {
                Some(existing) => {
                    summary.industries_updated.push(existing.name.clone());
                    existing
                }
                None => {
                    let created = self.create_industry(&scope.industry_name)?;
                    summary.industries_created.push(created.name.clone());
                    created
                }
            };

            summary.sections += scope.draft.sections.len();
            summary.questions += scope.question_count();
            self.replace_questionnaire(&industry.id, scope.draft)?;
        }

        info!(
            created = summary.industries_created.len(),
            updated = summary.industries_updated.len(),
            questions = summary.questions,
            "imported questions spreadsheet"
        );
        Ok(summary)
    }

    /// Apply a feedback spreadsheet to the sections whose industry and area match by name.
    pub fn import_feedbacks<R: Read>(
        &self,
        reader: R,
    ) -> Result<FeedbackImportSummary, DiagnosisServiceError> {
        let rows = FeedbackImporter::from_reader(reader)?;
        let mut summary = FeedbackImportSummary::default();
        let mut touched: BTreeMap<IndustryId, Questionnaire> = BTreeMap::new();

        for row in rows {
            let Some(industry) = self.find_industry_by_name(&row.industry_name)? else {
                if !summary.missing_industries.contains(&row.industry_name) {
                    summary.missing_industries.push(row.industry_name);
                }
                continue;
            };

            if !touched.contains_key(&industry.id) {
                let current = self.questionnaire(&industry.id)?;
                touched.insert(industry.id.clone(), Questionnaire::clone(&current));
            }
            let Some(questionnaire) = touched.get_mut(&industry.id) else {
                continue;
            };

            match questionnaire
                .sections_mut()
                .iter_mut()
                .find(|section| same_name(&section.title, &row.area))
            {
                Some(section) => {
                    section.feedback = Some(row.levels);
                    summary.sections_updated += 1;
                }
                None => summary
                    .missing_areas
                    .push(format!("{} / {}", industry.name, row.area)),
            }
        }

        for (id, questionnaire) in touched {
            self.catalog.save_questionnaire(questionnaire)?;
            self.cache.invalidate(&id);
        }

        if !summary.missing_industries.is_empty() {
            warn!(
                missing = ?summary.missing_industries,
                "feedback rows reference unknown industries"
            );
        }
        info!(sections = summary.sections_updated, "imported feedback spreadsheet");
        Ok(summary)
    }

    fn find_industry_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Industry>, DiagnosisServiceError> {
        Ok(self
            .catalog
            .industries()?
            .into_iter()
            .find(|industry| same_name(&industry.name, name)))
    }

    fn available_name(
        &self,
        name: &str,
        current: Option<&IndustryId>,
    ) -> Result<String, DiagnosisServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CatalogError::BlankIndustryName.into());
        }

        match self.find_industry_by_name(name)? {
            Some(existing) if Some(&existing.id) != current => {
                Err(CatalogError::DuplicateIndustryName(name.to_string()).into())
            }
            _ => Ok(name.to_string()),
        }
    }

    fn next_industry_id(&self) -> Result<IndustryId, DiagnosisServiceError> {
        loop {
            let sequence = self.industry_sequence.fetch_add(1, Ordering::Relaxed);
            let id = IndustryId(format!("ind-{sequence:06}"));
            if self.catalog.industry(&id)?.is_none() {
                return Ok(id);
            }
        }
    }

    fn next_diagnosis_id(&self) -> Result<DiagnosisId, DiagnosisServiceError> {
        loop {
            let sequence = self.diagnosis_sequence.fetch_add(1, Ordering::Relaxed);
            let id = DiagnosisId(format!("diag-{sequence:06}"));
            if self.history.fetch(&id)?.is_none() {
                return Ok(id);
            }
        }
    }
}

/// Outcome of a questions spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub industries_created: Vec<String>,
    pub industries_updated: Vec<String>,
    pub sections: usize,
    pub questions: usize,
}

/// Outcome of a feedback spreadsheet import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedbackImportSummary {
    pub sections_updated: usize,
    pub missing_industries: Vec<String>,
    pub missing_areas: Vec<String>,
}

/// Catalog and history lookups that failed for domain reasons.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("assessment scope '{0}' does not exist")]
    UnknownIndustry(IndustryId),
    #[error("assessment scope '{0}' is inactive")]
    InactiveIndustry(IndustryId),
    #[error("assessment scope name must not be blank")]
    BlankIndustryName,
    #[error("an assessment scope named '{0}' already exists")]
    DuplicateIndustryName(String),
    #[error("assessment scope '{0}' is built in and cannot be deleted")]
    FixedIndustry(IndustryId),
    #[error("diagnosis '{0}' does not exist")]
    UnknownDiagnosis(DiagnosisId),
}

/// Error raised by the diagnosis service.
#[derive(Debug, thiserror::Error)]
pub enum DiagnosisServiceError {
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireViolation),
    #[error(transparent)]
    Weights(#[from] WeightViolation),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] ImportError),
}
