use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::domain::{IndustryId, Questionnaire};

/// Read-through store of questionnaires keyed by scope.
///
/// Entries live until [`QuestionnaireCache::invalidate`] is called for their scope.
#[derive(Debug, Default)]
pub struct QuestionnaireCache {
    entries: RwLock<HashMap<IndustryId, Arc<Questionnaire>>>,
}

impl QuestionnaireCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &IndustryId) -> Option<Arc<Questionnaire>> {
        let guard = self.entries.read().expect("questionnaire cache poisoned");
        guard.get(scope).cloned()
    }

    /// Return the cached entry or run `load` and remember its result.
    ///
    /// `load` runs under the write lock, so an [`QuestionnaireCache::invalidate`] issued while
    /// it reads storage waits for the insert and then evicts it. `load` must not touch the
    /// cache.
    pub fn get_or_load<E, F>(&self, scope: &IndustryId, load: F) -> Result<Arc<Questionnaire>, E>
    where
        F: FnOnce() -> Result<Questionnaire, E>,
    {
        if let Some(hit) = self.get(scope) {
            return Ok(hit);
        }

        let mut guard = self.entries.write().expect("questionnaire cache poisoned");
        if let Some(hit) = guard.get(scope) {
            return Ok(Arc::clone(hit));
        }

        let loaded = Arc::new(load()?);
        guard.insert(scope.clone(), Arc::clone(&loaded));
        Ok(loaded)
    }

    pub fn invalidate(&self, scope: &IndustryId) -> bool {
        let mut guard = self.entries.write().expect("questionnaire cache poisoned");
        guard.remove(scope).is_some()
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .expect("questionnaire cache poisoned")
            .clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("questionnaire cache poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
