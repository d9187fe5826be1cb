use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use crate::workflows::diagnosis::domain::{
    AnswerSet, DiagnosisId, DiagnosisSubmission, Industry, IndustryId, QuestionId,
    Questionnaire, RespondentProfile,
};
use crate::workflows::diagnosis::repository::{
    CatalogRepository, DiagnosisRecord, HistoryRepository, RepositoryError,
};
use crate::workflows::diagnosis::scoring::{score_diagnosis, OptionWeightTable};
use crate::workflows::diagnosis::validation::{QuestionnaireDraft, QuestionnaireGuard};
use crate::workflows::diagnosis::{diagnosis_router, DiagnosisService};

pub(super) const RETAIL: &str = "retail";

/// Three sections: two scored questions, one scored plus one disabled, and one fully disabled.
pub(super) fn retail_draft() -> QuestionnaireDraft {
    serde_json::from_value(json!({
        "sections": [
            {
                "id": "vendas",
                "title": "Vendas",
                "questions": [
                    { "id": "v1", "text": "Existe meta por vendedor?", "options": ["Não", "Anual", "Mensal", "Diária"] },
                    { "id": "v2", "text": "Comissão automatizada?", "options": ["Não", "Planilha", "Parcial", "Total"] }
                ],
                "feedback": {
                    "initial": "Vendas sem gestão.",
                    "advanced": "Vendas orientadas por dados."
                }
            },
            {
                "id": "estoque",
                "title": "Estoque",
                "questions": [
                    { "id": "e1", "text": "Giro de estoque medido?", "options": ["Não", "Anual", "Mensal", "Diário"] },
                    { "id": "e2", "text": "Inventário rotativo?", "options": ["Não", "Raro", "Às vezes", "Sempre"], "disabled": true }
                ]
            },
            {
                "id": "legado",
                "title": "Legado",
                "questions": [
                    { "id": "l1", "text": "Pergunta aposentada", "options": ["a", "b", "c", "d"], "disabled": true }
                ]
            }
        ]
    }))
    .expect("valid draft")
}

pub(super) fn retail_questionnaire() -> Questionnaire {
    QuestionnaireGuard::default()
        .questionnaire_from_draft(&IndustryId::from(RETAIL), retail_draft())
        .expect("retail draft is valid")
}

pub(super) fn answers(pairs: &[(&str, usize)]) -> AnswerSet {
    pairs
        .iter()
        .map(|(question, index)| (QuestionId::from(*question), *index))
        .collect()
}

pub(super) fn respondent(name: &str, company: &str) -> RespondentProfile {
    RespondentProfile {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        company: company.to_string(),
        position: "CFO".to_string(),
        seller: Some("Marina Costa".to_string()),
        ..RespondentProfile::default()
    }
}

pub(super) fn submission(industry: &IndustryId, pairs: &[(&str, usize)]) -> DiagnosisSubmission {
    DiagnosisSubmission {
        industry_id: industry.clone(),
        respondent: respondent("Ana Souza", "Loja Azul"),
        answers: answers(pairs),
    }
}

pub(super) fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Record with a fixed timestamp, scored against the retail questionnaire.
pub(super) fn stored_record(
    id: &str,
    name: &str,
    company: &str,
    created_at: DateTime<Utc>,
) -> DiagnosisRecord {
    let answers = answers(&[("v1", 3), ("v2", 3), ("e1", 1)]);
    DiagnosisRecord {
        id: DiagnosisId::from(id),
        industry_id: IndustryId::from(RETAIL),
        respondent: respondent(name, company),
        outcome: score_diagnosis(&retail_questionnaire(), &answers, None),
        answers,
        created_at,
    }
}

pub(super) type MemoryService = DiagnosisService<MemoryCatalog, MemoryHistory>;

/// Service seeded with the standard scope plus a retail scope using [`retail_draft`].
pub(super) fn build_service() -> (MemoryService, Arc<MemoryCatalog>, Arc<MemoryHistory>) {
    let catalog = Arc::new(MemoryCatalog::default());
    let history = Arc::new(MemoryHistory::default());
    let service = DiagnosisService::new(catalog.clone(), history.clone());
    service.seed_standard_catalog().expect("seed succeeds");

    catalog
        .insert_industry(Industry {
            id: IndustryId::from(RETAIL),
            name: "Varejo".to_string(),
            active: true,
            fixed: false,
            created_at: at(2024, 1, 1),
        })
        .expect("insert retail");
    catalog
        .save_questionnaire(retail_questionnaire())
        .expect("save retail questionnaire");

    (service, catalog, history)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    diagnosis_router(Arc::new(service))
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    industries: Arc<Mutex<HashMap<IndustryId, Industry>>>,
    questionnaires: Arc<Mutex<HashMap<IndustryId, Questionnaire>>>,
    weights: Arc<Mutex<HashMap<IndustryId, OptionWeightTable>>>,
    pub(super) questionnaire_loads: Arc<Mutex<usize>>,
}

impl MemoryCatalog {
    pub(super) fn loads(&self) -> usize {
        *self
            .questionnaire_loads
            .lock()
            .expect("catalog mutex poisoned")
    }
}

impl CatalogRepository for MemoryCatalog {
    fn industries(&self) -> Result<Vec<Industry>, RepositoryError> {
        let guard = self.industries.lock().expect("catalog mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn industry(&self, id: &IndustryId) -> Result<Option<Industry>, RepositoryError> {
        let guard = self.industries.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn insert_industry(&self, industry: Industry) -> Result<Industry, RepositoryError> {
        let mut guard = self.industries.lock().expect("catalog mutex poisoned");
        if guard.contains_key(&industry.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(industry.id.clone(), industry.clone());
        Ok(industry)
    }

    fn update_industry(&self, industry: Industry) -> Result<(), RepositoryError> {
        let mut guard = self.industries.lock().expect("catalog mutex poisoned");
        match guard.get_mut(&industry.id) {
            Some(slot) => {
                *slot = industry;
                Ok(())
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn remove_industry(&self, id: &IndustryId) -> Result<(), RepositoryError> {
        let removed = self
            .industries
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        self.questionnaires
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        self.weights
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        removed.map(|_| ()).ok_or(RepositoryError::NotFound)
    }

    fn questionnaire(&self, id: &IndustryId) -> Result<Option<Questionnaire>, RepositoryError> {
        *self
            .questionnaire_loads
            .lock()
            .expect("catalog mutex poisoned") += 1;
        let guard = self.questionnaires.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError> {
        let mut guard = self.questionnaires.lock().expect("catalog mutex poisoned");
        guard.insert(questionnaire.industry_id().clone(), questionnaire);
        Ok(())
    }

    fn weights(&self, id: &IndustryId) -> Result<Option<OptionWeightTable>, RepositoryError> {
        let guard = self.weights.lock().expect("catalog mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn save_weights(
        &self,
        id: &IndustryId,
        weights: OptionWeightTable,
    ) -> Result<(), RepositoryError> {
        let mut guard = self.weights.lock().expect("catalog mutex poisoned");
        guard.insert(id.clone(), weights);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryHistory {
    pub(super) records: Arc<Mutex<HashMap<DiagnosisId, DiagnosisRecord>>>,
}

impl MemoryHistory {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("history mutex poisoned").len()
    }
}

impl HistoryRepository for MemoryHistory {
    fn insert(&self, record: DiagnosisRecord) -> Result<DiagnosisRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("history mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &DiagnosisId) -> Result<Option<DiagnosisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("history mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<DiagnosisRecord>, RepositoryError> {
        let guard = self.records.lock().expect("history mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, id: &DiagnosisId) -> Result<bool, RepositoryError> {
        let mut guard = self.records.lock().expect("history mutex poisoned");
        Ok(guard.remove(id).is_some())
    }
}

/// Handles for a questionnaire read held open by [`PausingCatalog`].
pub(super) struct LoadPause {
    /// Signalled once the held read has fetched its questionnaire from storage.
    pub(super) loaded: Receiver<()>,
    /// Signalled after every questionnaire save while the pause is armed.
    pub(super) saved: Receiver<()>,
    pub(super) resume: Sender<()>,
}

struct PauseHooks {
    loaded: Sender<()>,
    resume: Receiver<()>,
}

/// [`MemoryCatalog`] whose next questionnaire read blocks after fetching, until resumed.
#[derive(Default)]
pub(super) struct PausingCatalog {
    inner: MemoryCatalog,
    hooks: Mutex<Option<PauseHooks>>,
    saved: Mutex<Option<Sender<()>>>,
}

impl PausingCatalog {
    pub(super) fn pause_next_load(&self) -> LoadPause {
        let (loaded_tx, loaded) = mpsc::channel();
        let (resume, resume_rx) = mpsc::channel();
        let (saved_tx, saved) = mpsc::channel();
        *self.hooks.lock().expect("hooks mutex poisoned") = Some(PauseHooks {
            loaded: loaded_tx,
            resume: resume_rx,
        });
        *self.saved.lock().expect("hooks mutex poisoned") = Some(saved_tx);
        LoadPause {
            loaded,
            saved,
            resume,
        }
    }
}

impl CatalogRepository for PausingCatalog {
    fn industries(&self) -> Result<Vec<Industry>, RepositoryError> {
        self.inner.industries()
    }

    fn industry(&self, id: &IndustryId) -> Result<Option<Industry>, RepositoryError> {
        self.inner.industry(id)
    }

    fn insert_industry(&self, industry: Industry) -> Result<Industry, RepositoryError> {
        self.inner.insert_industry(industry)
    }

    fn update_industry(&self, industry: Industry) -> Result<(), RepositoryError> {
        self.inner.update_industry(industry)
    }

    fn remove_industry(&self, id: &IndustryId) -> Result<(), RepositoryError> {
        self.inner.remove_industry(id)
    }

    fn questionnaire(&self, id: &IndustryId) -> Result<Option<Questionnaire>, RepositoryError> {
        let stored = self.inner.questionnaire(id)?;
        let hooks = self.hooks.lock().expect("hooks mutex poisoned").take();
        if let Some(hooks) = hooks {
            let _ = hooks.loaded.send(());
            let _ = hooks.resume.recv();
        }
        Ok(stored)
    }

    fn save_questionnaire(&self, questionnaire: Questionnaire) -> Result<(), RepositoryError> {
        self.inner.save_questionnaire(questionnaire)?;
        if let Some(saved) = self.saved.lock().expect("hooks mutex poisoned").as_ref() {
            let _ = saved.send(());
        }
        Ok(())
    }

    fn weights(&self, id: &IndustryId) -> Result<Option<OptionWeightTable>, RepositoryError> {
        self.inner.weights(id)
    }

    fn save_weights(
        &self,
        id: &IndustryId,
        weights: OptionWeightTable,
    ) -> Result<(), RepositoryError> {
        self.inner.save_weights(id, weights)
    }
}

pub(super) struct UnavailableHistory;

impl HistoryRepository for UnavailableHistory {
    fn insert(&self, _record: DiagnosisRecord) -> Result<DiagnosisRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &DiagnosisId) -> Result<Option<DiagnosisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<DiagnosisRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn remove(&self, _id: &DiagnosisId) -> Result<bool, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
