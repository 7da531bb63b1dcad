use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for leads owned by the lead repository.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct LeadId(pub u64);

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a lead as tracked by the owning repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    New,
    Contacted,
    Engaged,
    Qualified,
    Converted,
    Dormant,
}

impl LeadStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Engaged => "engaged",
            Self::Qualified => "qualified",
            Self::Converted => "converted",
            Self::Dormant => "dormant",
        }
    }
}

/// Read-only view of an institutional lead. The engine never mutates leads;
/// it only resolves display fields through the repository contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub institution_name: String,
    pub state: String,
    pub status: LeadStatus,
}

/// Firmographic enrichment attached to a lead by upstream collectors.
/// Every field is optional; absence is meaningful and flows through the
/// feature extractor as a missing signal, never as a fabricated zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentProfile {
    pub staff_count: Option<u32>,
    pub annual_budget: Option<u64>,
    pub website_domain: Option<String>,
}

/// Engagement counters gathered from outreach tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSnapshot {
    pub email_opens: Option<u32>,
    pub website_visits: Option<u32>,
    pub replies: Option<u32>,
    pub days_since_last_touch: Option<u32>,
    pub opted_out: Option<bool>,
}

/// Raw material for one scoring pass: whatever data is currently attached
/// to the lead. Sparse payloads are expected, not errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSignals {
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub enrichment: Option<EnrichmentProfile>,
    pub engagement: Option<EngagementSnapshot>,
}

/// Named signal with a signed probability-point impact explaining part of a
/// prediction. Positive impacts favor conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factor {
    pub name: String,
    pub impact: f64,
}

/// How much supporting data backed a prediction, independent of how
/// favorable the predicted outcome is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Favorability bucket of the predicted conversion probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueTier {
    High,
    Medium,
    Low,
}

impl ValueTier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Single recommended operator action derived from (value tier, confidence).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NextBestAction {
    CallImmediately,
    EnrichFirst,
    NeedsMoreData,
}

impl NextBestAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CallImmediately => "call immediately",
            Self::EnrichFirst => "enrich first",
            Self::NeedsMoreData => "needs more data",
        }
    }
}

/// Latest prediction for one lead. Replaced wholesale on each recompute;
/// `computed_at` is the last-write-wins ordering key at the store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub lead_id: LeadId,
    pub probability: u8,
    pub confidence_level: ConfidenceLevel,
    pub value_tier: ValueTier,
    pub next_best_action: NextBestAction,
    pub factors: Vec<Factor>,
    pub computed_at: DateTime<Utc>,
}
