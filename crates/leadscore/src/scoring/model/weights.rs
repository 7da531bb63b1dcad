use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::features::FeatureKind;

/// Versioned weight table, expressed in probability points per unit of
/// normalized magnitude. This is configuration, not code: deployments swap
/// tables without touching the model, and the version string travels with
/// the table so scored populations can be traced back to their rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub version: String,
    pub weights: BTreeMap<FeatureKind, f64>,
}

impl WeightTable {
    /// Features missing from the table carry zero weight.
    pub fn weight(&self, feature: FeatureKind) -> f64 {
        self.weights.get(&feature).copied().unwrap_or(0.0)
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        let mut weights = BTreeMap::new();
        weights.insert(FeatureKind::ContactEmail, 6.0);
        weights.insert(FeatureKind::ContactPhone, 3.0);
        weights.insert(FeatureKind::WebsitePresence, 4.0);
        weights.insert(FeatureKind::StaffCount, 8.0);
        weights.insert(FeatureKind::AnnualBudget, 7.0);
        weights.insert(FeatureKind::EmailEngagement, 12.0);
        weights.insert(FeatureKind::WebsiteVisits, 9.0);
        weights.insert(FeatureKind::ReplyActivity, 18.0);
        weights.insert(FeatureKind::TouchRecency, 6.0);
        weights.insert(FeatureKind::OptOut, -35.0);
        weights.insert(FeatureKind::StatusMomentum, 10.0);

        Self {
            version: "2026.1".to_string(),
            weights,
        }
    }
}
