use super::domain::{LeadId, Prediction};

/// Result of an upsert attempt. A stale write (older `computed_at` than the
/// stored prediction) is skipped rather than treated as an error: late
/// recomputes are expected when triggers race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Applied,
    Stale,
}

/// Error enumeration for prediction store failures. Validation variants
/// indicate a caller bug, not a data-quality problem, and are rejected at
/// this boundary.
#[derive(Debug, thiserror::Error)]
pub enum PredictionStoreError {
    #[error("probability {0} outside the 0..=100 contract")]
    ProbabilityOutOfRange(u8),
    #[error("factor '{0}' carries a non-finite impact")]
    NonFiniteImpact(String),
    #[error("prediction store unavailable: {0}")]
    Unavailable(String),
}

/// Storage contract for the single latest prediction per lead.
///
/// Implementations must make each per-lead replace atomic (no torn reads of
/// one prediction) and must serve `snapshot` as a consistent point-in-time
/// view; a snapshot may miss an upsert that commits after it was taken, but
/// it never mixes fields from two different writes.
pub trait PredictionStore: Send + Sync {
    fn upsert(&self, prediction: Prediction) -> Result<UpsertOutcome, PredictionStoreError>;
    fn snapshot(&self) -> Result<Vec<Prediction>, PredictionStoreError>;
    fn remove(&self, lead_id: LeadId) -> Result<(), PredictionStoreError>;
}

/// Boundary validation shared by store implementations. `u8` narrows the
/// range already, so the checks guard the values a caller can still get
/// wrong: probabilities above 100 and NaN/infinite factor impacts.
pub fn validate(prediction: &Prediction) -> Result<(), PredictionStoreError> {
    if prediction.probability > 100 {
        return Err(PredictionStoreError::ProbabilityOutOfRange(
            prediction.probability,
        ));
    }

    for factor in &prediction.factors {
        if !factor.impact.is_finite() {
            return Err(PredictionStoreError::NonFiniteImpact(factor.name.clone()));
        }
    }

    Ok(())
}
