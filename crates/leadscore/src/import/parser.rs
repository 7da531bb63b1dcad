use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::normalizer::{normalize_name, normalize_status};
use super::RosterEntry;
use crate::scoring::domain::{
    EngagementSnapshot, EnrichmentProfile, Lead, LeadId, LeadSignals,
};

pub(crate) fn parse_entries<R: Read>(reader: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for record in csv_reader.deserialize::<RosterRow>() {
        let row = record?;
        entries.push(row.into_entry());
    }

    Ok(entries)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "Lead ID")]
    lead_id: u64,
    #[serde(rename = "Institution")]
    institution: String,
    #[serde(rename = "State", default, deserialize_with = "empty_string_as_none")]
    state: Option<String>,
    #[serde(rename = "Status", default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    #[serde(
        rename = "Contact Email",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    contact_email: Option<String>,
    #[serde(
        rename = "Contact Phone",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    contact_phone: Option<String>,
    #[serde(
        rename = "Website",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    website: Option<String>,
    #[serde(
        rename = "Staff Count",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    staff_count: Option<String>,
    #[serde(
        rename = "Annual Budget",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    annual_budget: Option<String>,
    #[serde(
        rename = "Email Opens",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    email_opens: Option<String>,
    #[serde(
        rename = "Website Visits",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    website_visits: Option<String>,
    #[serde(rename = "Replies", default, deserialize_with = "empty_string_as_none")]
    replies: Option<String>,
    #[serde(
        rename = "Days Since Last Touch",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    days_since_last_touch: Option<String>,
    #[serde(
        rename = "Opted Out",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    opted_out: Option<String>,
}

impl RosterRow {
    fn into_entry(self) -> RosterEntry {
        let lead = Lead {
            id: LeadId(self.lead_id),
            institution_name: normalize_name(&self.institution),
            state: self.state.as_deref().map(normalize_name).unwrap_or_default(),
            status: normalize_status(self.status.as_deref()),
        };

        let enrichment = EnrichmentProfile {
            staff_count: parse_number(self.staff_count.as_deref()),
            annual_budget: parse_number(self.annual_budget.as_deref()),
            website_domain: self.website,
        };
        let engagement = EngagementSnapshot {
            email_opens: parse_number(self.email_opens.as_deref()),
            website_visits: parse_number(self.website_visits.as_deref()),
            replies: parse_number(self.replies.as_deref()),
            days_since_last_touch: parse_number(self.days_since_last_touch.as_deref()),
            opted_out: parse_flag(self.opted_out.as_deref()),
        };

        let signals = LeadSignals {
            contact_email: self.contact_email,
            contact_phone: self.contact_phone,
            enrichment: non_empty_enrichment(enrichment),
            engagement: non_empty_engagement(engagement),
        };

        RosterEntry { lead, signals }
    }
}

/// Malformed numerics become absent signals, never a misleading zero.
fn parse_number<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.and_then(|value| value.trim().replace([',', '$'], "").parse().ok())
}

fn parse_flag(raw: Option<&str>) -> Option<bool> {
    match raw.map(|value| value.trim().to_ascii_lowercase()) {
        Some(flag) => match flag.as_str() {
            "true" | "yes" | "y" | "1" => Some(true),
            "false" | "no" | "n" | "0" => Some(false),
            _ => None,
        },
        None => None,
    }
}

fn non_empty_enrichment(profile: EnrichmentProfile) -> Option<EnrichmentProfile> {
    if profile == EnrichmentProfile::default() {
        None
    } else {
        Some(profile)
    }
}

fn non_empty_engagement(snapshot: EngagementSnapshot) -> Option<EngagementSnapshot> {
    if snapshot == EngagementSnapshot::default() {
        None
    } else {
        Some(snapshot)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|raw| !raw.trim().is_empty()))
}
