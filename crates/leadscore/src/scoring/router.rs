use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{LeadId, LeadSignals, Prediction};
use super::insights::DEFAULT_TOP_LEAD_LIMIT;
use super::repository::LeadRepository;
use super::service::{LeadScoringService, ScoringServiceError};
use super::store::{PredictionStore, PredictionStoreError, UpsertOutcome};

/// Router builder exposing the read-side queries and the recompute hook.
pub fn scoring_router<S, L>(service: Arc<LeadScoringService<S, L>>) -> Router
where
    S: PredictionStore + 'static,
    L: LeadRepository + 'static,
{
    Router::new()
        .route("/api/v1/leads/insights", get(insights_handler::<S, L>))
        .route(
            "/api/v1/leads/predictions/top",
            get(top_leads_handler::<S, L>),
        )
        .route(
            "/api/v1/leads/:lead_id/predictions",
            post(recompute_handler::<S, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct InsightsQuery {
    #[serde(rename = "topFactors", default = "default_top_factors")]
    pub(crate) top_factors: usize,
}

fn default_top_factors() -> usize {
    5
}

#[derive(Debug, Deserialize)]
pub(crate) struct TopLeadsQuery {
    #[serde(default = "default_top_leads")]
    pub(crate) limit: usize,
}

fn default_top_leads() -> usize {
    DEFAULT_TOP_LEAD_LIMIT
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecomputeResponse {
    pub(crate) outcome: &'static str,
    pub(crate) prediction: Prediction,
}

pub(crate) async fn insights_handler<S, L>(
    State(service): State<Arc<LeadScoringService<S, L>>>,
    Query(query): Query<InsightsQuery>,
) -> Response
where
    S: PredictionStore + 'static,
    L: LeadRepository + 'static,
{
    match service.insights(query.top_factors) {
        Ok(summary) => (StatusCode::OK, axum::Json(summary)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn top_leads_handler<S, L>(
    State(service): State<Arc<LeadScoringService<S, L>>>,
    Query(query): Query<TopLeadsQuery>,
) -> Response
where
    S: PredictionStore + 'static,
    L: LeadRepository + 'static,
{
    match service.top_leads(query.limit) {
        Ok(ranked) => (StatusCode::OK, axum::Json(ranked)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn recompute_handler<S, L>(
    State(service): State<Arc<LeadScoringService<S, L>>>,
    Path(lead_id): Path<u64>,
    axum::Json(signals): axum::Json<LeadSignals>,
) -> Response
where
    S: PredictionStore + 'static,
    L: LeadRepository + 'static,
{
    match service.recompute(LeadId(lead_id), &signals, Utc::now()) {
        Ok((prediction, outcome)) => {
            let body = RecomputeResponse {
                outcome: match outcome {
                    UpsertOutcome::Applied => "applied",
                    UpsertOutcome::Stale => "stale",
                },
                prediction,
            };
            (StatusCode::ACCEPTED, axum::Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

fn service_error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::UnknownLead(_) => StatusCode::NOT_FOUND,
        ScoringServiceError::Store(
            PredictionStoreError::ProbabilityOutOfRange(_)
            | PredictionStoreError::NonFiniteImpact(_),
        ) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::Store(PredictionStoreError::Unavailable(_))
        | ScoringServiceError::Leads(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
