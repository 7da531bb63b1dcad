mod weights;

pub use weights::WeightTable;

use super::domain::Factor;
use super::features::FeatureVector;

/// Probability reported when no signal at all is present.
pub const NEUTRAL_BASELINE: u8 = 50;

/// Logistic scale chosen so the squash has slope 1 probability point per
/// raw point at the origin; factor impacts therefore read directly as
/// "moved the score by N points" in the region where scores live.
const SQUASH_SCALE: f64 = 25.0;

/// Probability and the ranked factor trail explaining it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub probability: u8,
    pub factors: Vec<Factor>,
}

/// Stateless model applying an injected weight table to a feature vector.
pub struct ScoringModel {
    weights: WeightTable,
}

impl ScoringModel {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weight_version(&self) -> &str {
        &self.weights.version
    }

    /// Score one vector. Deterministic: identical vectors yield identical
    /// probabilities and byte-identical factor ordering.
    pub fn score(&self, vector: &FeatureVector) -> ScoreBreakdown {
        if vector.present_count() == 0 {
            return ScoreBreakdown {
                probability: NEUTRAL_BASELINE,
                factors: Vec::new(),
            };
        }

        let mut raw_score = 0.0;
        let mut factors: Vec<Factor> = vector
            .present()
            .map(|(feature, magnitude)| {
                let impact = self.weights.weight(feature) * magnitude;
                raw_score += impact;
                Factor {
                    name: feature.label().to_string(),
                    impact,
                }
            })
            .collect();

        factors.sort_by(|a, b| {
            b.impact
                .abs()
                .total_cmp(&a.impact.abs())
                .then_with(|| a.name.cmp(&b.name))
        });

        ScoreBreakdown {
            probability: squash(raw_score),
            factors,
        }
    }
}

/// Bounded logistic transform onto [0, 100], stable for extreme raw scores.
fn squash(raw_score: f64) -> u8 {
    let scaled = 100.0 / (1.0 + (-raw_score / SQUASH_SCALE).exp());
    scaled.round().clamp(0.0, 100.0) as u8
}
