use serde::{Deserialize, Serialize};

use super::domain::{Lead, LeadSignals, LeadStatus};

/// Fixed feature schema for institutional leads. The schema length is the
/// denominator of the completeness ratio, so adding a feature here changes
/// completeness for every lead and should coincide with a weight table
/// version bump.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    ContactEmail,
    ContactPhone,
    WebsitePresence,
    StaffCount,
    AnnualBudget,
    EmailEngagement,
    WebsiteVisits,
    ReplyActivity,
    TouchRecency,
    OptOut,
    StatusMomentum,
}

impl FeatureKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ContactEmail => "contact_email",
            Self::ContactPhone => "contact_phone",
            Self::WebsitePresence => "website_presence",
            Self::StaffCount => "staff_count",
            Self::AnnualBudget => "annual_budget",
            Self::EmailEngagement => "email_engagement",
            Self::WebsiteVisits => "website_visits",
            Self::ReplyActivity => "reply_activity",
            Self::TouchRecency => "touch_recency",
            Self::OptOut => "opt_out",
            Self::StatusMomentum => "status_momentum",
        }
    }

    pub const fn schema() -> [FeatureKind; 11] {
        [
            Self::ContactEmail,
            Self::ContactPhone,
            Self::WebsitePresence,
            Self::StaffCount,
            Self::AnnualBudget,
            Self::EmailEngagement,
            Self::WebsiteVisits,
            Self::ReplyActivity,
            Self::TouchRecency,
            Self::OptOut,
            Self::StatusMomentum,
        ]
    }
}

/// One named signal. `magnitude` is `None` when the backing data was missing
/// or malformed; a present signal with magnitude 0.0 is a real observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signal {
    pub feature: FeatureKind,
    pub magnitude: Option<f64>,
}

/// Ordered set of signals covering the full feature schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    signals: Vec<Signal>,
}

impl FeatureVector {
    pub(crate) fn new(signals: Vec<Signal>) -> Self {
        Self { signals }
    }

    /// Vector with every schema signal absent, for leads with no usable data.
    pub fn empty() -> Self {
        Self {
            signals: FeatureKind::schema()
                .into_iter()
                .map(|feature| Signal {
                    feature,
                    magnitude: None,
                })
                .collect(),
        }
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn magnitude(&self, feature: FeatureKind) -> Option<f64> {
        self.signals
            .iter()
            .find(|signal| signal.feature == feature)
            .and_then(|signal| signal.magnitude)
    }

    /// Iterate present signals only; absent signals never reach arithmetic.
    pub fn present(&self) -> impl Iterator<Item = (FeatureKind, f64)> + '_ {
        self.signals
            .iter()
            .filter_map(|signal| signal.magnitude.map(|value| (signal.feature, value)))
    }

    pub fn present_count(&self) -> usize {
        self.signals
            .iter()
            .filter(|signal| signal.magnitude.is_some())
            .count()
    }

    /// Fields present over fields defined by the schema, in [0, 1].
    pub fn completeness(&self) -> f64 {
        if self.signals.is_empty() {
            return 0.0;
        }
        self.present_count() as f64 / self.signals.len() as f64
    }
}

// Saturation caps for normalizing raw counters into [0, 1].
const STAFF_COUNT_CAP: f64 = 500.0;
const ANNUAL_BUDGET_CAP: f64 = 5_000_000.0;
const EMAIL_OPENS_CAP: f64 = 10.0;
const WEBSITE_VISITS_CAP: f64 = 20.0;
const REPLIES_CAP: f64 = 3.0;
const TOUCH_HORIZON_DAYS: f64 = 90.0;

/// Derive the feature vector for one lead. Pure: identical inputs always
/// yield the identical vector, in schema order.
pub fn extract(lead: &Lead, signals: &LeadSignals) -> FeatureVector {
    let enrichment = signals.enrichment.as_ref();
    let engagement = signals.engagement.as_ref();

    let vector = FeatureKind::schema()
        .into_iter()
        .map(|feature| {
            let magnitude = match feature {
                FeatureKind::ContactEmail => presence(signals.contact_email.as_deref()),
                FeatureKind::ContactPhone => presence(signals.contact_phone.as_deref()),
                FeatureKind::WebsitePresence => {
                    presence(enrichment.and_then(|e| e.website_domain.as_deref()))
                }
                FeatureKind::StaffCount => enrichment
                    .and_then(|e| e.staff_count)
                    .map(|count| saturating_ratio(count as f64, STAFF_COUNT_CAP)),
                FeatureKind::AnnualBudget => enrichment
                    .and_then(|e| e.annual_budget)
                    .map(|budget| saturating_ratio(budget as f64, ANNUAL_BUDGET_CAP)),
                FeatureKind::EmailEngagement => engagement
                    .and_then(|e| e.email_opens)
                    .map(|opens| saturating_ratio(opens as f64, EMAIL_OPENS_CAP)),
                FeatureKind::WebsiteVisits => engagement
                    .and_then(|e| e.website_visits)
                    .map(|visits| saturating_ratio(visits as f64, WEBSITE_VISITS_CAP)),
                FeatureKind::ReplyActivity => engagement
                    .and_then(|e| e.replies)
                    .map(|replies| saturating_ratio(replies as f64, REPLIES_CAP)),
                FeatureKind::TouchRecency => engagement
                    .and_then(|e| e.days_since_last_touch)
                    .map(|days| 1.0 - saturating_ratio(days as f64, TOUCH_HORIZON_DAYS)),
                FeatureKind::OptOut => engagement
                    .and_then(|e| e.opted_out)
                    .map(|opted_out| if opted_out { 1.0 } else { 0.0 }),
                FeatureKind::StatusMomentum => Some(status_momentum(lead.status)),
            };

            Signal { feature, magnitude }
        })
        .collect();

    FeatureVector::new(vector)
}

/// Blank or whitespace-only strings count as absent, not as an empty value.
fn presence(value: Option<&str>) -> Option<f64> {
    match value {
        Some(raw) if !raw.trim().is_empty() => Some(1.0),
        _ => None,
    }
}

fn saturating_ratio(value: f64, cap: f64) -> f64 {
    (value / cap).clamp(0.0, 1.0)
}

const fn status_momentum(status: LeadStatus) -> f64 {
    match status {
        LeadStatus::New => 0.1,
        LeadStatus::Contacted => 0.35,
        LeadStatus::Engaged => 0.6,
        LeadStatus::Qualified => 0.9,
        LeadStatus::Converted => 1.0,
        LeadStatus::Dormant => 0.0,
    }
}
