// src/handlers/summary.rs

use crate::{
    errors::AppResult,
    models::{
        CompanyMonthlySummary, MonthQuery, MonthRange, MonthlyRevenueSummary,
        MonthlySummaryReport, RunSummaryRequest,
    },
    repositories::{MonthlyRevenueSummaryRepository, PgSnapshot},
    services::MonthlyRevenueSummaryManager,
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
};

/// Recompute and store the summaries of one month.
/// Every read of the run goes through a single read-only snapshot.
#[utoipa::path(
    post,
    path = "/api/v1/summaries/run",
    request_body = RunSummaryRequest,
    responses(
        (status = 200, description = "Summaries written; skipped projects listed under failures", body = MonthlySummaryReport),
    ),
    tag = "Summaries"
)]
pub async fn run_monthly_summary(
    State(state): State<AppState>,
    Json(body): Json<RunSummaryRequest>,
) -> AppResult<Json<MonthlySummaryReport>> {
    let (service, snapshot) = state.snapshot_summary_service().await?;
    let report = service.calculate_monthly_summary(body.target_month).await?;
    drop(service);
    PgSnapshot::release(snapshot).await?;

    Ok(Json(report))
}

/// Stored summaries of a month
#[utoipa::path(
    get,
    path = "/api/v1/summaries",
    params(MonthQuery),
    responses((status = 200, description = "Stored project summaries", body = Vec<MonthlyRevenueSummary>)),
    tag = "Summaries"
)]
pub async fn list_monthly_summaries(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<MonthlyRevenueSummary>>> {
    let month = MonthRange::containing(query.month);
    let rows = state.store.find_by_month(month.start).await?;
    Ok(Json(rows))
}

/// Company-wide rollup of a month, computed on request from one read-only snapshot
#[utoipa::path(
    get,
    path = "/api/v1/summaries/company",
    params(MonthQuery),
    responses(
        (status = 200, description = "Company rollup", body = CompanyMonthlySummary),
        (status = 422, description = "A cost policy or salary is missing"),
    ),
    tag = "Summaries"
)]
pub async fn get_company_summary(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<CompanyMonthlySummary>> {
    let (service, snapshot) = state.snapshot_summary_service().await?;
    let summary = service.calculate_company_summary(query.month).await?;
    drop(service);
    PgSnapshot::release(snapshot).await?;
    Ok(Json(summary))
}
