use crate::scoring::domain::LeadStatus;

/// Strip BOM/zero-width characters and collapse runs of whitespace so
/// roster exports from different CRMs compare equal.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Map a free-form status cell onto the lifecycle enum. Unknown or blank
/// statuses fall back to `New` rather than failing the row.
pub(crate) fn normalize_status(value: Option<&str>) -> LeadStatus {
    match value.map(|raw| raw.trim().to_ascii_lowercase()) {
        Some(status) => match status.as_str() {
            "contacted" | "reached" => LeadStatus::Contacted,
            "engaged" | "responding" => LeadStatus::Engaged,
            "qualified" | "sql" => LeadStatus::Qualified,
            "converted" | "won" | "customer" => LeadStatus::Converted,
            "dormant" | "cold" | "unresponsive" => LeadStatus::Dormant,
            _ => LeadStatus::New,
        },
        None => LeadStatus::New,
    }
}
