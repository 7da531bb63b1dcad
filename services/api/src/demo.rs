use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;

use crate::infra::{default_scoring_config, InMemoryLeadRepository, InMemoryPredictionStore};
use leadscore::error::AppError;
use leadscore::import::{RosterEntry, RosterImporter};
use leadscore::scoring::{InsightsSummary, LeadScoringService, RankedLeadView};

/// Sample roster embedded for the demo command: a mix of fully
/// instrumented, partially enriched, and silent leads.
const DEMO_ROSTER: &str = "\
Lead ID,Institution,State,Status,Contact Email,Contact Phone,Website,Staff Count,Annual Budget,Email Opens,Website Visits,Replies,Days Since Last Touch,Opted Out
1,Cedar Falls Community Schools,IA,Qualified,it@cfschools.org,319-555-0102,cfschools.org,480,3200000,9,14,3,4,no
2,Linn County Library System,IA,Engaged,director@linnlib.org,,linnlib.org,60,,4,6,1,12,no
3,Prairie Ridge Academy,MN,Contacted,,,,,,1,,,45,
4,Northfield Technical College,MN,New,,,,,,,,,,
5,Dakota Valley Cooperative,SD,Dormant,admin@dakotacoop.edu,,,,,,,,120,yes
6,Great Plains Health Network,NE,Engaged,ops@gphealth.org,402-555-0133,gphealth.org,320,1800000,6,9,2,8,no
";

#[derive(Args, Debug)]
pub(crate) struct InsightsArgs {
    /// Roster CSV export to score
    #[arg(long)]
    pub(crate) roster: PathBuf,
    /// Number of top-ranked leads to display
    #[arg(long, default_value_t = 5)]
    pub(crate) top: usize,
    /// Number of aggregated factors to display
    #[arg(long, default_value_t = 5)]
    pub(crate) top_factors: usize,
    /// Emit the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Emit the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_insights(args: InsightsArgs) -> Result<(), AppError> {
    let entries = RosterImporter::from_path(&args.roster)?;
    let (summary, ranked) = score_roster(&entries, args.top, args.top_factors);
    render(&summary, &ranked, args.json);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let entries = RosterImporter::from_reader(DEMO_ROSTER.as_bytes())?;
    let (summary, ranked) = score_roster(&entries, 5, 5);

    if !args.json {
        println!("== Lead scoring demo: {} sample leads ==\n", entries.len());
    }
    render(&summary, &ranked, args.json);
    Ok(())
}

fn score_roster(
    entries: &[RosterEntry],
    top: usize,
    top_factors: usize,
) -> (InsightsSummary, Vec<RankedLeadView>) {
    let repository = Arc::new(InMemoryLeadRepository::default());
    let service = LeadScoringService::new(
        Arc::new(InMemoryPredictionStore::default()),
        repository.clone(),
        default_scoring_config(),
    );

    let now = Utc::now();
    for entry in entries {
        repository.insert(entry.lead.clone());
        if let Err(error) = service.recompute(entry.lead.id, &entry.signals, now) {
            eprintln!("skipping lead {}: {error}", entry.lead.id);
        }
    }

    let summary = service
        .insights(top_factors)
        .unwrap_or_else(|_| leadscore::scoring::summarize(&[], top_factors));
    let ranked = service.top_leads(top).unwrap_or_default();
    (summary, ranked)
}

fn render(summary: &InsightsSummary, ranked: &[RankedLeadView], as_json: bool) {
    if as_json {
        let payload = serde_json::json!({
            "insights": summary,
            "topLeads": ranked,
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(text) => println!("{text}"),
            Err(error) => eprintln!("failed to render JSON: {error}"),
        }
        return;
    }

    println!("Pipeline");
    println!(
        "  {} leads scored, average probability {}",
        summary.total_leads, summary.average_score
    );
    println!(
        "  value tiers: {} high / {} medium / {} low",
        summary.distribution.high, summary.distribution.medium, summary.distribution.low
    );
    println!(
        "  recommendations: call {} / enrich {} / needs data {}",
        summary.recommendations.call_immediately,
        summary.recommendations.enrich_first,
        summary.recommendations.needs_more_data
    );

    if !summary.top_factors.is_empty() {
        println!("\nTop factors");
        for rollup in &summary.top_factors {
            println!(
                "  {:<20} seen {:>2}x, avg impact {:+.1} pts",
                rollup.name, rollup.frequency, rollup.avg_impact
            );
        }
    }

    if !ranked.is_empty() {
        println!("\nTop predicted leads");
        for view in ranked {
            println!(
                "  {:>3}% {:<32} {:<8} confidence, next: {}",
                view.predicted_conversion_probability,
                view.display_label,
                view.confidence_level.label(),
                view.next_best_action.label()
            );
        }
    }
}
