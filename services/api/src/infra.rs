use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;

use leadscore::scoring::{
    store, Lead, LeadId, LeadRepository, LeadRepositoryError, Prediction, PredictionStore,
    PredictionStoreError, ScoringConfig, UpsertOutcome,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded prediction store: per-lead replaces are atomic under the
/// lock, snapshots clone under the same lock, and stale writes (older
/// `computed_at`) are skipped rather than applied.
#[derive(Default, Clone)]
pub(crate) struct InMemoryPredictionStore {
    records: Arc<Mutex<HashMap<LeadId, Prediction>>>,
}

impl PredictionStore for InMemoryPredictionStore {
    fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome, PredictionStoreError> {
        store::validate(&prediction)?;
        let mut guard = self
            .records
            .lock()
            .map_err(|_| PredictionStoreError::Unavailable("store lock poisoned".to_string()))?;
        if let Some(existing) = guard.get(&prediction.lead_id) {
            if existing.computed_at > prediction.computed_at {
                return Ok(UpsertOutcome::Stale);
            }
        }
        guard.insert(prediction.lead_id, prediction);
        Ok(UpsertOutcome::Applied)
    }

    fn snapshot(&self) -> Result<Vec<Prediction>, PredictionStoreError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| PredictionStoreError::Unavailable("store lock poisoned".to_string()))?;
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, lead_id: LeadId) -> Result<(), PredictionStoreError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| PredictionStoreError::Unavailable("store lock poisoned".to_string()))?;
        guard.remove(&lead_id);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryLeadRepository {
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl InMemoryLeadRepository {
    pub(crate) fn insert(&self, lead: Lead) {
        let mut guard = self
            .leads
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(lead.id, lead);
    }
}

impl LeadRepository for InMemoryLeadRepository {
    fn get(&self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError> {
        let guard = self
            .leads
            .lock()
            .map_err(|_| LeadRepositoryError::Unavailable("lead lock poisoned".to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Lead>, LeadRepositoryError> {
        let guard = self
            .leads
            .lock()
            .map_err(|_| LeadRepositoryError::Unavailable("lead lock poisoned".to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

pub(crate) fn default_scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}
