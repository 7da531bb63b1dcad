use serde::{Deserialize, Serialize};

use super::domain::{ConfidenceLevel, Factor, NextBestAction, ValueTier};

/// Threshold configuration for the classifier. Injected rather than ambient
/// so tests and deployments pin their own rubric; the defaults below are the
/// documented baseline, not constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub high_value_threshold: u8,
    pub medium_value_threshold: u8,
    pub high_completeness: f64,
    pub low_completeness: f64,
    pub min_factors_for_high_confidence: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_value_threshold: 70,
            medium_value_threshold: 50,
            high_completeness: 0.7,
            low_completeness: 0.4,
            min_factors_for_high_confidence: 3,
        }
    }
}

/// Classification of one scored lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assessment {
    pub confidence_level: ConfidenceLevel,
    pub value_tier: ValueTier,
    pub next_best_action: NextBestAction,
}

/// Maps (probability, completeness, factors) onto the operator-facing
/// buckets. Confidence measures how much data backed the estimate and is
/// independent of how favorable the estimate is.
pub struct Classifier {
    config: ClassifierConfig,
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    pub fn classify(&self, probability: u8, completeness: f64, factors: &[Factor]) -> Assessment {
        let value_tier = self.value_tier(probability);
        let confidence_level = self.confidence_level(completeness, factors);

        Assessment {
            confidence_level,
            value_tier,
            next_best_action: recommend(value_tier, confidence_level),
        }
    }

    fn value_tier(&self, probability: u8) -> ValueTier {
        if probability >= self.config.high_value_threshold {
            ValueTier::High
        } else if probability >= self.config.medium_value_threshold {
            ValueTier::Medium
        } else {
            ValueTier::Low
        }
    }

    fn confidence_level(&self, completeness: f64, factors: &[Factor]) -> ConfidenceLevel {
        let contributing = factors
            .iter()
            .filter(|factor| factor.impact != 0.0)
            .count();

        if factors.is_empty() || completeness < self.config.low_completeness {
            ConfidenceLevel::Low
        } else if completeness >= self.config.high_completeness
            && contributing >= self.config.min_factors_for_high_confidence
        {
            ConfidenceLevel::High
        } else {
            ConfidenceLevel::Medium
        }
    }
}

/// Single source of truth for the recommendation buckets. Exhaustive over
/// all nine (tier, confidence) combinations; every lead maps to exactly one
/// action, which keeps the aggregator's recommendation counts total.
pub const fn recommend(tier: ValueTier, confidence: ConfidenceLevel) -> NextBestAction {
    match (tier, confidence) {
        (ValueTier::High, ConfidenceLevel::High) => NextBestAction::CallImmediately,
        (ValueTier::High, ConfidenceLevel::Medium | ConfidenceLevel::Low) => {
            NextBestAction::EnrichFirst
        }
        (ValueTier::Medium, ConfidenceLevel::High | ConfidenceLevel::Medium) => {
            NextBestAction::EnrichFirst
        }
        (ValueTier::Medium, ConfidenceLevel::Low) => NextBestAction::NeedsMoreData,
        (ValueTier::Low, _) => NextBestAction::NeedsMoreData,
    }
}
