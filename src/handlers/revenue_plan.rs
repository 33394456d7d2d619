// src/handlers/revenue_plan.rs

use crate::{
    errors::AppResult,
    models::{CreateRevenuePlanRequest, ProjectRevenuePlan},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Add a revenue plan installment to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/revenue-plans",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = CreateRevenuePlanRequest,
    responses(
        (status = 201, description = "Plan created, not yet issued", body = ProjectRevenuePlan),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Sequence already used"),
    ),
    tag = "Revenue Plans"
)]
pub async fn create_revenue_plan(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<CreateRevenuePlanRequest>,
) -> AppResult<(StatusCode, Json<ProjectRevenuePlan>)> {
    let plan = state.revenue_plan_service().create(project_id, body).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

/// Mark an installment as invoiced. Issuing twice is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/revenue-plans/{sequence}/issue",
    params(
        ("project_id" = Uuid, Path, description = "Project ID"),
        ("sequence" = i32, Path, description = "Installment sequence"),
    ),
    responses(
        (status = 200, description = "Plan issued", body = ProjectRevenuePlan),
        (status = 404, description = "Plan not found"),
    ),
    tag = "Revenue Plans"
)]
pub async fn issue_revenue_plan(
    State(state): State<AppState>,
    Path((project_id, sequence)): Path<(Uuid, i32)>,
) -> AppResult<Json<ProjectRevenuePlan>> {
    let plan = state.revenue_plan_service().issue(project_id, sequence).await?;
    Ok(Json(plan))
}
