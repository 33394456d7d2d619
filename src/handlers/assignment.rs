// src/handlers/assignment.rs

use crate::{
    errors::AppResult,
    models::{AssignProjectRequest, MonthQuery, ProjectAssignment},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use uuid::Uuid;

/// Assign an employee to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{project_id}/assignments",
    params(("project_id" = Uuid, Path, description = "Project ID")),
    request_body = AssignProjectRequest,
    responses(
        (status = 201, description = "Assignment created", body = ProjectAssignment),
        (status = 400, description = "Period outside the project"),
        (status = 404, description = "Project not found"),
        (status = 409, description = "Overlapping assignment for this employee"),
    ),
    tag = "Assignments"
)]
pub async fn assign_employee(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(body): Json<AssignProjectRequest>,
) -> AppResult<(StatusCode, Json<ProjectAssignment>)> {
    let assignment = state.assignment_service().assign(project_id, body).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

/// Assignments active in a month, across all projects
#[utoipa::path(
    get,
    path = "/api/v1/assignments/active",
    params(MonthQuery),
    responses((status = 200, description = "Active assignments", body = Vec<ProjectAssignment>)),
    tag = "Assignments"
)]
pub async fn list_active_assignments(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> AppResult<Json<Vec<ProjectAssignment>>> {
    let assignments = state
        .assignment_service()
        .active_assignments(query.month)
        .await?;
    Ok(Json(assignments))
}
