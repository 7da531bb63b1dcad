use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use crate::scoring::domain::{
    ConfidenceLevel, EngagementSnapshot, EnrichmentProfile, Factor, Lead, LeadId, LeadSignals,
    LeadStatus, NextBestAction, Prediction, ValueTier,
};
use crate::scoring::repository::{LeadRepository, LeadRepositoryError};
use crate::scoring::service::{LeadScoringService, ScoringConfig};
use crate::scoring::store::{self, PredictionStore, PredictionStoreError, UpsertOutcome};

pub(super) fn lead(id: u64) -> Lead {
    Lead {
        id: LeadId(id),
        institution_name: format!("Prairie District {id}"),
        state: "IA".to_string(),
        status: LeadStatus::Qualified,
    }
}

pub(super) fn rich_signals() -> LeadSignals {
    LeadSignals {
        contact_email: Some("admin@prairie.k12.ia.us".to_string()),
        contact_phone: Some("515-555-0140".to_string()),
        enrichment: Some(EnrichmentProfile {
            staff_count: Some(250),
            annual_budget: Some(2_500_000),
            website_domain: Some("prairie.k12.ia.us".to_string()),
        }),
        engagement: Some(EngagementSnapshot {
            email_opens: Some(8),
            website_visits: Some(10),
            replies: Some(2),
            days_since_last_touch: Some(10),
            opted_out: Some(false),
        }),
    }
}

pub(super) fn timestamp(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_760_000_000 + seconds, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn prediction(
    id: u64,
    probability: u8,
    confidence_level: ConfidenceLevel,
    value_tier: ValueTier,
    next_best_action: NextBestAction,
    factors: Vec<Factor>,
) -> Prediction {
    Prediction {
        lead_id: LeadId(id),
        probability,
        confidence_level,
        value_tier,
        next_best_action,
        factors,
        computed_at: timestamp(0),
    }
}

pub(super) fn factor(name: &str, impact: f64) -> Factor {
    Factor {
        name: name.to_string(),
        impact,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryPredictionStore {
    records: Arc<Mutex<HashMap<LeadId, Prediction>>>,
}

impl PredictionStore for MemoryPredictionStore {
    fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome, PredictionStoreError> {
        store::validate(&prediction)?;
        let mut guard = self.records.lock().expect("store mutex poisoned");
        if let Some(existing) = guard.get(&prediction.lead_id) {
            if existing.computed_at > prediction.computed_at {
                return Ok(UpsertOutcome::Stale);
            }
        }
        guard.insert(prediction.lead_id, prediction);
        Ok(UpsertOutcome::Applied)
    }

    fn snapshot(&self) -> Result<Vec<Prediction>, PredictionStoreError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }

    fn remove(&self, lead_id: LeadId) -> Result<(), PredictionStoreError> {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        guard.remove(&lead_id);
        Ok(())
    }
}

/// Store whose every call fails, for exercising 500 paths.
pub(super) struct UnavailableStore;

impl PredictionStore for UnavailableStore {
    fn upsert(&self, _prediction: Prediction) -> Result<UpsertOutcome, PredictionStoreError> {
        Err(PredictionStoreError::Unavailable("backend offline".to_string()))
    }

    fn snapshot(&self) -> Result<Vec<Prediction>, PredictionStoreError> {
        Err(PredictionStoreError::Unavailable("backend offline".to_string()))
    }

    fn remove(&self, _lead_id: LeadId) -> Result<(), PredictionStoreError> {
        Err(PredictionStoreError::Unavailable("backend offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryLeadRepository {
    leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
}

impl MemoryLeadRepository {
    pub(super) fn seeded(leads: impl IntoIterator<Item = Lead>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.leads.lock().expect("lead mutex poisoned");
            for lead in leads {
                guard.insert(lead.id, lead);
            }
        }
        repository
    }
}

impl LeadRepository for MemoryLeadRepository {
    fn get(&self, id: LeadId) -> Result<Option<Lead>, LeadRepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn list_all(&self) -> Result<Vec<Lead>, LeadRepositoryError> {
        let guard = self.leads.lock().expect("lead mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) fn build_service(
    leads: impl IntoIterator<Item = Lead>,
) -> (
    Arc<LeadScoringService<MemoryPredictionStore, MemoryLeadRepository>>,
    MemoryPredictionStore,
    MemoryLeadRepository,
) {
    let store = MemoryPredictionStore::default();
    let repository = MemoryLeadRepository::seeded(leads);
    let service = Arc::new(LeadScoringService::new(
        Arc::new(store.clone()),
        Arc::new(repository.clone()),
        ScoringConfig::default(),
    ));
    (service, store, repository)
}
