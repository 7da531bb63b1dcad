use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{Classifier, ClassifierConfig};
use super::domain::{Lead, LeadId, LeadSignals, Prediction};
use super::features;
use super::insights::{self, InsightsSummary, RankedLeadView};
use super::model::{ScoringModel, WeightTable};
use super::repository::{LeadRepository, LeadRepositoryError};
use super::store::{PredictionStore, PredictionStoreError, UpsertOutcome};

/// Complete engine configuration: the weight table feeding the model and
/// the thresholds feeding the classifier. Injected as one unit so a test or
/// deployment pins the entire rubric at construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: WeightTable,
    pub classifier: ClassifierConfig,
}

/// Facade composing extractor, model, classifier, store, and the lead
/// repository. Extraction and scoring are pure; the store is the only
/// shared mutable resource touched here.
pub struct LeadScoringService<S, L> {
    store: Arc<S>,
    leads: Arc<L>,
    model: ScoringModel,
    classifier: Classifier,
}

impl<S, L> LeadScoringService<S, L>
where
    S: PredictionStore + 'static,
    L: LeadRepository + 'static,
{
    pub fn new(store: Arc<S>, leads: Arc<L>, config: ScoringConfig) -> Self {
        Self {
            store,
            leads,
            model: ScoringModel::new(config.weights),
            classifier: Classifier::new(config.classifier),
        }
    }

    /// Pure scoring pass: extract, score, classify. Sparse signals are not
    /// an error; an all-absent vector flows through as the neutral baseline
    /// with low confidence and the needs-more-data action.
    pub fn predict(
        &self,
        lead: &Lead,
        signals: &LeadSignals,
        computed_at: DateTime<Utc>,
    ) -> Prediction {
        let vector = features::extract(lead, signals);
        let breakdown = self.model.score(&vector);
        let assessment = self.classifier.classify(
            breakdown.probability,
            vector.completeness(),
            &breakdown.factors,
        );

        Prediction {
            lead_id: lead.id,
            probability: breakdown.probability,
            confidence_level: assessment.confidence_level,
            value_tier: assessment.value_tier,
            next_best_action: assessment.next_best_action,
            factors: breakdown.factors,
            computed_at,
        }
    }

    /// Recompute one lead's prediction and persist it. The caller supplies
    /// the recompute timestamp; the store skips writes older than what it
    /// already holds.
    pub fn recompute(
        &self,
        lead_id: LeadId,
        signals: &LeadSignals,
        computed_at: DateTime<Utc>,
    ) -> Result<(Prediction, UpsertOutcome), ScoringServiceError> {
        let lead = self
            .leads
            .get(lead_id)?
            .ok_or(ScoringServiceError::UnknownLead(lead_id))?;

        let prediction = self.predict(&lead, signals, computed_at);
        let outcome = self.store.upsert(prediction.clone())?;

        debug!(
            lead = %lead_id,
            probability = prediction.probability,
            weights = self.model.weight_version(),
            stale = matches!(outcome, UpsertOutcome::Stale),
            "prediction recomputed"
        );

        Ok((prediction, outcome))
    }

    /// Dashboard summary over one consistent snapshot taken at call time.
    pub fn insights(&self, top_factor_limit: usize) -> Result<InsightsSummary, ScoringServiceError> {
        let snapshot = self.store.snapshot()?;
        Ok(insights::summarize(&snapshot, top_factor_limit))
    }

    /// Top-N ranked leads with display fields resolved where possible.
    pub fn top_leads(&self, limit: usize) -> Result<Vec<RankedLeadView>, ScoringServiceError> {
        let snapshot = self.store.snapshot()?;
        Ok(insights::top_leads(&snapshot, self.leads.as_ref(), limit))
    }

    /// Drop the prediction for a deleted lead.
    pub fn retire(&self, lead_id: LeadId) -> Result<(), ScoringServiceError> {
        self.store.remove(lead_id)?;
        Ok(())
    }
}

/// Error raised by the scoring service facade.
#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("lead {0} is not present in the lead repository")]
    UnknownLead(LeadId),
    #[error(transparent)]
    Store(#[from] PredictionStoreError),
    #[error(transparent)]
    Leads(#[from] LeadRepositoryError),
}
