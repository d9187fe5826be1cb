use maturity_diagnostic::workflows::diagnosis::{
    CatalogRepository, DiagnosisId, DiagnosisRecord, HistoryRepository, Industry, IndustryId,
    OptionWeightTable, Questionnaire, RepositoryError,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryCatalogRepository {
    industries: Arc<Mutex<HashMap<IndustryId, Industry>>>,
    questionnaires: Arc<Mutex<HashMap<IndustryId, Questionnaire>>>,
    weights: Arc<Mutex<HashMap<IndustryId, OptionWeightTable>>>,
}

impl CatalogRepository for InMemoryCatalogRepository {
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
        if guard.contains_key(&industry.id) {
            guard.insert(industry.id.clone(), industry);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn remove_industry(&self, id: &IndustryId) -> Result<(), RepositoryError> {
        let removed = self
            .industries
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        if removed.is_none() {
            return Err(RepositoryError::NotFound);
        }

        self.questionnaires
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        self.weights
            .lock()
            .expect("catalog mutex poisoned")
            .remove(id);
        Ok(())
    }

    fn questionnaire(&self, id: &IndustryId) -> Result<Option<Questionnaire>, RepositoryError> {
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
pub(crate) struct InMemoryHistoryRepository {
    records: Arc<Mutex<HashMap<DiagnosisId, DiagnosisRecord>>>,
}

impl HistoryRepository for InMemoryHistoryRepository {
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
