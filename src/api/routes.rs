//! HTTP route handlers for Axum.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    api::types::{EstimateResponse, HistoryDto},
    error::EstimateError,
    estimate::Silent,
    session::{self, InputForm},
};

use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn estimate(
    State(state): State<AppState>,
    Json(form): Json<InputForm>,
) -> ApiResult<EstimateResponse> {
    let request = form.resolve(&state.settings).map_err(rejected)?;
    let settings = state.settings.clone();
    let outcome =
        tokio::task::spawn_blocking(move || session::run(request, &settings, &mut Silent, None))
            .await
            .map_err(|err| {
                error!(%err, "search task failed");
                internal()
            })?;

    if let Some(record) = outcome.history_record() {
        let run = state.history.lock().map_err(|_| internal())?.record(record);
        debug!(run, "recorded run");
    }
    Ok(Json(EstimateResponse::from_outcome(
        &outcome,
        state.settings.top_k,
    )))
}

pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<HistoryDto> {
    let limit = query.limit.unwrap_or(state.settings.history_limit);
    let history = state.history.lock().map_err(|_| internal())?;
    Ok(Json(HistoryDto {
        total_runs: history.total_runs(),
        entries: history.recent(limit).cloned().collect(),
    }))
}

fn rejected(err: EstimateError) -> (StatusCode, String) {
    (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
}

fn internal() -> (StatusCode, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error".to_string(),
    )
}
