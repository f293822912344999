use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;

use crate::date_utils::{default_reference_date, parse_reference_date, resolve_windows, DateWindows};
use crate::error::{AppError, AppResult};
use crate::models::kpi::{
    DemandsRow, FunnelRow, IoRePsRow, KpiResponse, RevenueChannelRow, RevenueRow, SfClassRow,
};
use crate::services::reports::{demands, funnel, io_re_ps, revenue, sf_class};
use crate::services::scope::{load_scope, TerritoryFilter, TerritoryScope};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct KpiParams {
    pub date: Option<String>,
    pub branch: Option<String>,
    pub wok: Option<String>,
}

impl KpiParams {
    fn reference_date(&self, lag_days: i64) -> AppResult<NaiveDate> {
        match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(raw) => parse_reference_date(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", raw))),
            None => Ok(default_reference_date(lag_days)),
        }
    }
}

/// Resolve the request, then run `build` on a blocking thread inside a single
/// read transaction.
async fn run_report<Row, F>(
    state: AppState,
    params: KpiParams,
    report: &'static str,
    build: F,
) -> AppResult<Json<KpiResponse<Row>>>
where
    Row: Send + 'static,
    F: FnOnce(&Connection, &DateWindows, &TerritoryScope) -> rusqlite::Result<Vec<Row>>
        + Send
        + 'static,
{
    let reference = params.reference_date(state.config.data_lag_days)?;
    let windows = resolve_windows(reference);
    let filter = TerritoryFilter::new(params.branch.as_deref(), params.wok.as_deref());
    tracing::debug!(report, %reference, ?filter, "Building report");

    let rows = tokio::task::spawn_blocking(move || -> AppResult<Vec<Row>> {
        let mut conn = state.db.get()?;
        let tx = conn.transaction()?;
        let scope = load_scope(&tx, &state.config.regional, &filter)?;
        let rows = build(&tx, &windows, &scope)?;
        tx.rollback()?;
        Ok(rows)
    })
    .await??;

    tracing::debug!(report, rows = rows.len(), "Report built");
    Ok(Json(KpiResponse::new(rows)))
}

pub async fn io_re_ps(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<IoRePsRow>>> {
    run_report(state, params, "io-re-ps", io_re_ps::build).await
}

pub async fn demands_deployment(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<DemandsRow>>> {
    run_report(state, params, "demands-deployment", demands::build).await
}

pub async fn sf_class(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<SfClassRow>>> {
    run_report(state, params, "sf-class", sf_class::build).await
}

pub async fn revenue_c3mr(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<RevenueRow>>> {
    run_report(state, params, "revenue-c3mr", revenue::build).await
}

pub async fn revenue_c3mr_channel(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<RevenueChannelRow>>> {
    run_report(state, params, "revenue-c3mr-channel", revenue::build_by_channel).await
}

pub async fn funnel(
    State(state): State<AppState>,
    Query(params): Query<KpiParams>,
) -> AppResult<Json<KpiResponse<FunnelRow>>> {
    run_report(state, params, "funnel", funnel::build).await
}
