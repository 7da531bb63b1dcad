//! End-to-end coverage for the scoring pipeline: roster rows in,
//! predictions stored, dashboard views out. Everything goes through the
//! public service facade so the internal modules stay free to move.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};

    use leadscore::scoring::{
        store, Lead, LeadId, LeadRepository, LeadRepositoryError, LeadScoringService, Prediction,
        PredictionStore, PredictionStoreError, ScoringConfig, UpsertOutcome,
    };

    #[derive(Default, Clone)]
    pub struct MemoryPredictionStore {
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

    #[derive(Default, Clone)]
    pub struct MemoryLeadRepository {
        leads: Arc<Mutex<HashMap<LeadId, Lead>>>,
    }

    impl MemoryLeadRepository {
        pub fn insert(&self, lead: Lead) {
            let mut guard = self.leads.lock().expect("lead mutex poisoned");
            guard.insert(lead.id, lead);
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

    pub fn build_service() -> (
        LeadScoringService<MemoryPredictionStore, MemoryLeadRepository>,
        MemoryLeadRepository,
    ) {
        let repository = MemoryLeadRepository::default();
        let service = LeadScoringService::new(
            Arc::new(MemoryPredictionStore::default()),
            Arc::new(repository.clone()),
            ScoringConfig::default(),
        );
        (service, repository)
    }

    pub fn timestamp(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_760_000_000 + seconds, 0)
            .single()
            .expect("valid timestamp")
    }
}

use common::{build_service, timestamp};
use leadscore::import::RosterImporter;
use leadscore::scoring::{ConfidenceLevel, LeadId, NextBestAction, ValueTier};

const ROSTER: &str = "\
Lead ID,Institution,State,Status,Contact Email,Contact Phone,Website,Staff Count,Annual Budget,Email Opens,Website Visits,Replies,Days Since Last Touch,Opted Out
1,Cedar Falls Community Schools,IA,Qualified,it@cfschools.org,319-555-0102,cfschools.org,480,3200000,9,14,3,4,no
2,Linn County Library System,IA,Engaged,director@linnlib.org,,linnlib.org,60,,4,6,1,12,no
3,Prairie Ridge Academy,MN,Contacted,,,,,,1,,,45,
4,Northfield Technical College,MN,New,,,,,,,,,,
5,Dakota Valley Cooperative,SD,Dormant,admin@dakotacoop.edu,,,,,,,,120,yes
";

#[test]
fn roster_scores_into_a_consistent_dashboard() {
    let entries = RosterImporter::from_reader(ROSTER.as_bytes()).expect("roster parses");
    assert_eq!(entries.len(), 5);

    let (service, repository) = build_service();
    for (offset, entry) in entries.iter().enumerate() {
        repository.insert(entry.lead.clone());
        service
            .recompute(entry.lead.id, &entry.signals, timestamp(offset as i64))
            .expect("recompute");
    }

    let summary = service.insights(5).expect("insights");
    assert_eq!(summary.total_leads, 5);
    assert_eq!(
        summary.distribution.high + summary.distribution.medium + summary.distribution.low,
        5
    );
    assert_eq!(
        summary.recommendations.call_immediately
            + summary.recommendations.enrich_first
            + summary.recommendations.needs_more_data,
        5
    );
    assert!(summary.average_score <= 100);
    assert!(!summary.top_factors.is_empty());

    // The fully-instrumented, qualified district leads the board.
    let ranked = service.top_leads(5).expect("top leads");
    assert_eq!(ranked[0].lead_id, LeadId(1));
    assert_eq!(ranked[0].predicted_value, ValueTier::High);
    assert_eq!(ranked[0].confidence_level, ConfidenceLevel::High);
    assert_eq!(ranked[0].next_best_action, NextBestAction::CallImmediately);
    assert_eq!(ranked[0].display_label, "Cedar Falls Community Schools");

    // The signal-free college bottoms out on confidence, not on errors.
    let sparse = ranked
        .iter()
        .find(|view| view.lead_id == LeadId(4))
        .expect("lead 4 ranked");
    assert_eq!(sparse.confidence_level, ConfidenceLevel::Low);
    assert_eq!(sparse.next_best_action, NextBestAction::NeedsMoreData);
}

#[test]
fn dashboard_is_idempotent_for_an_unchanged_store() {
    let entries = RosterImporter::from_reader(ROSTER.as_bytes()).expect("roster parses");
    let (service, repository) = build_service();
    for (offset, entry) in entries.iter().enumerate() {
        repository.insert(entry.lead.clone());
        service
            .recompute(entry.lead.id, &entry.signals, timestamp(offset as i64))
            .expect("recompute");
    }

    let first = serde_json::to_string(&service.insights(5).expect("insights")).expect("json");
    let second = serde_json::to_string(&service.insights(5).expect("insights")).expect("json");
    assert_eq!(first, second);
}

#[test]
fn recompute_after_enrichment_replaces_the_prediction() {
    let entries = RosterImporter::from_reader(ROSTER.as_bytes()).expect("roster parses");
    let (service, repository) = build_service();
    let sparse = entries
        .iter()
        .find(|entry| entry.lead.id == LeadId(3))
        .expect("lead 3 imported");
    repository.insert(sparse.lead.clone());

    let (before, _) = service
        .recompute(sparse.lead.id, &sparse.signals, timestamp(0))
        .expect("initial recompute");

    let enriched = entries
        .iter()
        .find(|entry| entry.lead.id == LeadId(1))
        .expect("lead 1 imported");
    let (after, _) = service
        .recompute(sparse.lead.id, &enriched.signals, timestamp(60))
        .expect("enriched recompute");

    assert!(after.probability > before.probability);
    let summary = service.insights(5).expect("insights");
    assert_eq!(summary.total_leads, 1);
    assert_eq!(summary.average_score, u32::from(after.probability));
}
