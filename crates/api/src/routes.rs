use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json,
    Router,
};
use predictions::{summarize, AssetType, ForecastRequest, LedgerSummary, PredictionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{state::AppState, ws};

const DEFAULT_PAGE_LIMIT: usize = 100;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predictions", post(create_prediction).get(list_predictions))
        .route("/predictions/:id", get(get_prediction))
        .route("/predictions/:id/actual", post(resolve_prediction))
        .route("/analytics/predictions", get(prediction_analytics))
        .route("/ws/events", get(ws::events_socket))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ListParams {
    #[serde(rename = "type")]
    asset_type: Option<AssetType>,
    limit: Option<usize>,
    offset: Option<usize>,
}

#[derive(Debug, Serialize)]
struct ListPredictionsResponse {
    predictions: Vec<PredictionRecord>,
}

#[derive(Debug, Deserialize)]
struct ResolveRequest {
    actual_value: f64,
}

async fn create_prediction(
    State(state): State<AppState>,
    Json(request): Json<ForecastRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    if request.horizon.trim().is_empty() || !request.current_value.is_finite() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let record = state.submit_forecast(request);
    let location = format!("/predictions/{}", record.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(record),
    ))
}

async fn list_predictions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<ListPredictionsResponse> {
    let ledger = state.ledger();
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .min(ledger.capacity());

    Json(ListPredictionsResponse {
        predictions: ledger.list(params.asset_type, limit, params.offset.unwrap_or(0)),
    })
}

async fn get_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PredictionRecord>, StatusCode> {
    state
        .ledger()
        .get(&id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn resolve_prediction(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ResolveRequest>,
) -> Result<Json<PredictionRecord>, StatusCode> {
    match state.ledger().resolve(&id, request.actual_value) {
        Some(record) => Ok(Json(record)),
        None => {
            debug!(id = %id, "resolve requested for unknown prediction");
            Err(StatusCode::NOT_FOUND)
        }
    }
}

async fn prediction_analytics(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<LedgerSummary> {
    let ledger = state.ledger();
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_LIMIT)
        .min(ledger.capacity());
    let records = ledger.list(params.asset_type, limit, params.offset.unwrap_or(0));

    Json(summarize(&records))
}
