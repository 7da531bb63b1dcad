use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use tracing::info;

use crate::cli::ServeArgs;
use crate::infra::{
    default_scoring_config, AppState, InMemoryLeadRepository, InMemoryPredictionStore,
};
use crate::routes::with_scoring_routes;
use leadscore::config::AppConfig;
use leadscore::error::AppError;
use leadscore::import::RosterImporter;
use leadscore::scoring::LeadScoringService;
use leadscore::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryPredictionStore::default());
    let repository = Arc::new(InMemoryLeadRepository::default());
    let service = Arc::new(LeadScoringService::new(
        store,
        repository.clone(),
        default_scoring_config(),
    ));

    let roster = args.roster.take().or_else(|| config.seed.roster.clone());
    if let Some(path) = roster {
        let entries = RosterImporter::from_path(&path)?;
        let seeded = entries.len();
        let now = Utc::now();
        for entry in entries {
            repository.insert(entry.lead.clone());
            if let Err(error) = service.recompute(entry.lead.id, &entry.signals, now) {
                tracing::warn!(lead = %entry.lead.id, %error, "seed prediction skipped");
            }
        }
        info!(roster = %path.display(), leads = seeded, "lead roster seeded");
    }

    let app = with_scoring_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
