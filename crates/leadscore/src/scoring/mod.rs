//! The scoring engine: feature extraction, the weighted model, the
//! classifier, the prediction store contract, and the insights aggregator.
//!
//! Data flows strictly forward: lead + signals -> feature vector ->
//! (probability, factors) -> (confidence, tier, action) -> prediction store
//! -> dashboard views. No stage reads from a later one, and everything up
//! to the store is a pure function of its inputs and the injected
//! configuration.

pub mod classify;
pub mod domain;
pub mod features;
pub mod insights;
pub mod model;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use classify::{recommend, Assessment, Classifier, ClassifierConfig};
pub use domain::{
    ConfidenceLevel, EngagementSnapshot, EnrichmentProfile, Factor, Lead, LeadId, LeadSignals,
    LeadStatus, NextBestAction, Prediction, ValueTier,
};
pub use features::{extract, FeatureKind, FeatureVector, Signal};
pub use insights::{
    summarize, top_leads, ConfidenceAverages, ConfidenceBreakdown, ConfidenceCounts, FactorRollup,
    InsightsSummary, RankedLeadView, RecommendationCounts, TierCounts, DEFAULT_TOP_LEAD_LIMIT,
};
pub use model::{ScoreBreakdown, ScoringModel, WeightTable, NEUTRAL_BASELINE};
pub use repository::{LeadRepository, LeadRepositoryError};
pub use router::scoring_router;
pub use service::{LeadScoringService, ScoringConfig, ScoringServiceError};
pub use store::{PredictionStore, PredictionStoreError, UpsertOutcome};
