use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ConfidenceLevel, Lead, LeadId, NextBestAction, Prediction, ValueTier};
use super::repository::LeadRepository;

/// Top-leads limit applied when the caller does not request one; matches the
/// consumer dashboard's default card count.
pub const DEFAULT_TOP_LEAD_LIMIT: usize = 5;

/// Dashboard summary derived on demand from one prediction snapshot. Never
/// persisted independently; always recomputable, byte-for-byte, from the
/// same snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsSummary {
    pub total_leads: usize,
    pub average_score: u32,
    pub distribution: TierCounts,
    pub by_confidence: ConfidenceBreakdown,
    pub top_factors: Vec<FactorRollup>,
    pub recommendations: RecommendationCounts,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    pub counts: ConfidenceCounts,
    pub averages: ConfidenceAverages,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Mean probability within each confidence level, rounded; 0 when a level
/// has no members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceAverages {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
}

/// Factor aggregated across the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorRollup {
    pub name: String,
    pub frequency: usize,
    pub avg_impact: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationCounts {
    pub call_immediately: usize,
    pub enrich_first: usize,
    pub needs_more_data: usize,
}

/// One entry of the top-predicted-leads view. `lead` is null when the
/// repository cannot resolve the id; `display_label` always carries a
/// usable identifier either way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedLeadView {
    pub lead_id: LeadId,
    pub predicted_conversion_probability: u8,
    pub confidence_level: ConfidenceLevel,
    pub predicted_value: ValueTier,
    pub next_best_action: NextBestAction,
    pub display_label: String,
    pub lead: Option<Lead>,
}

/// Commutative, associative accumulator for the global factor reduction.
/// Merging in any order yields the same sums, so the reduce step can be
/// chunked or parallelized without changing output; only the final sort
/// imposes an order.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct FactorAccumulator {
    pub(crate) frequency: usize,
    pub(crate) sum_impact: f64,
}

impl FactorAccumulator {
    fn absorb(&mut self, impact: f64) {
        self.frequency += 1;
        self.sum_impact += impact;
    }

    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            frequency: self.frequency + other.frequency,
            sum_impact: self.sum_impact + other.sum_impact,
        }
    }

    fn avg_impact(&self) -> f64 {
        if self.frequency == 0 {
            return 0.0;
        }
        self.sum_impact / self.frequency as f64
    }
}

pub(crate) fn merge_factor_maps(
    mut left: BTreeMap<String, FactorAccumulator>,
    right: BTreeMap<String, FactorAccumulator>,
) -> BTreeMap<String, FactorAccumulator> {
    for (name, accumulator) in right {
        let entry = left.entry(name).or_default();
        *entry = entry.merge(accumulator);
    }
    left
}

pub(crate) fn factor_map_for(prediction: &Prediction) -> BTreeMap<String, FactorAccumulator> {
    let mut map: BTreeMap<String, FactorAccumulator> = BTreeMap::new();
    for factor in &prediction.factors {
        map.entry(factor.name.clone()).or_default().absorb(factor.impact);
    }
    map
}

/// Reduce every prediction's factor list into ranked rollups: frequency
/// descending, then average impact descending, then name ascending.
fn top_factors(snapshot: &[Prediction], limit: usize) -> Vec<FactorRollup> {
    let reduced = snapshot
        .iter()
        .map(factor_map_for)
        .fold(BTreeMap::new(), merge_factor_maps);

    let mut rollups: Vec<FactorRollup> = reduced
        .into_iter()
        .map(|(name, accumulator)| FactorRollup {
            name,
            frequency: accumulator.frequency,
            avg_impact: accumulator.avg_impact(),
        })
        .collect();

    rollups.sort_by(|a, b| {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| b.avg_impact.total_cmp(&a.avg_impact))
            .then_with(|| a.name.cmp(&b.name))
    });
    rollups.truncate(limit);
    rollups
}

fn rounded_mean(sum: u64, count: usize) -> u32 {
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u32
}

/// Build the dashboard summary for one immutable snapshot. An empty
/// snapshot short-circuits to all zeros; no ratio is ever computed over a
/// zero population.
pub fn summarize(snapshot: &[Prediction], top_factor_limit: usize) -> InsightsSummary {
    if snapshot.is_empty() {
        return InsightsSummary {
            total_leads: 0,
            average_score: 0,
            distribution: TierCounts::default(),
            by_confidence: ConfidenceBreakdown::default(),
            top_factors: Vec::new(),
            recommendations: RecommendationCounts::default(),
        };
    }

    let mut probability_sum: u64 = 0;
    let mut distribution = TierCounts::default();
    let mut counts = ConfidenceCounts::default();
    let mut sums = [0u64; 3];
    let mut recommendations = RecommendationCounts::default();

    for prediction in snapshot {
        probability_sum += u64::from(prediction.probability);

        match prediction.value_tier {
            ValueTier::High => distribution.high += 1,
            ValueTier::Medium => distribution.medium += 1,
            ValueTier::Low => distribution.low += 1,
        }

        match prediction.confidence_level {
            ConfidenceLevel::High => {
                counts.high += 1;
                sums[0] += u64::from(prediction.probability);
            }
            ConfidenceLevel::Medium => {
                counts.medium += 1;
                sums[1] += u64::from(prediction.probability);
            }
            ConfidenceLevel::Low => {
                counts.low += 1;
                sums[2] += u64::from(prediction.probability);
            }
        }

        match prediction.next_best_action {
            NextBestAction::CallImmediately => recommendations.call_immediately += 1,
            NextBestAction::EnrichFirst => recommendations.enrich_first += 1,
            NextBestAction::NeedsMoreData => recommendations.needs_more_data += 1,
        }
    }

    InsightsSummary {
        total_leads: snapshot.len(),
        average_score: rounded_mean(probability_sum, snapshot.len()),
        distribution,
        by_confidence: ConfidenceBreakdown {
            counts,
            averages: ConfidenceAverages {
                high: rounded_mean(sums[0], counts.high),
                medium: rounded_mean(sums[1], counts.medium),
                low: rounded_mean(sums[2], counts.low),
            },
        },
        top_factors: top_factors(snapshot, top_factor_limit),
        recommendations,
    }
}

/// Rank the snapshot by probability descending (leadId ascending on ties)
/// and attach display fields where the repository can resolve them. A
/// lookup miss or repository failure degrades to `lead: null`; it never
/// aborts the batch.
pub fn top_leads<L>(snapshot: &[Prediction], leads: &L, limit: usize) -> Vec<RankedLeadView>
where
    L: LeadRepository + ?Sized,
{
    let mut ordered: Vec<&Prediction> = snapshot.iter().collect();
    ordered.sort_by(|a, b| {
        b.probability
            .cmp(&a.probability)
            .then_with(|| a.lead_id.cmp(&b.lead_id))
    });

    ordered
        .into_iter()
        .take(limit)
        .map(|prediction| {
            let lead = leads.get(prediction.lead_id).ok().flatten();
            let display_label = lead
                .as_ref()
                .map(|lead| lead.institution_name.clone())
                .unwrap_or_else(|| format!("lead-{}", prediction.lead_id));

            RankedLeadView {
                lead_id: prediction.lead_id,
                predicted_conversion_probability: prediction.probability,
                confidence_level: prediction.confidence_level,
                predicted_value: prediction.value_tier,
                next_best_action: prediction.next_best_action,
                display_label,
                lead,
            }
        })
        .collect()
}
