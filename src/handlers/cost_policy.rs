// src/handlers/cost_policy.rs

use crate::{
    errors::AppResult,
    models::{EmployeeCostPolicy, EmployeeType, SetCostPolicyRequest},
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
};

/// Set or replace the overhead and SG&A rates for a year and employee type
#[utoipa::path(
    put,
    path = "/api/v1/cost-policies",
    request_body = SetCostPolicyRequest,
    responses(
        (status = 200, description = "Policy saved", body = EmployeeCostPolicy),
        (status = 400, description = "Rate outside 0..=1"),
    ),
    tag = "Cost Policies"
)]
pub async fn set_cost_policy(
    State(state): State<AppState>,
    Json(body): Json<SetCostPolicyRequest>,
) -> AppResult<Json<EmployeeCostPolicy>> {
    let policy = state.cost_policy_service().set_policy(body).await?;
    Ok(Json(policy))
}

#[utoipa::path(
    get,
    path = "/api/v1/cost-policies/{year}/{employee_type}",
    params(
        ("year" = i32, Path, description = "Apply year"),
        ("employee_type" = String, Path, description = "full_time, part_time, freelancer or outsourcing"),
    ),
    responses(
        (status = 200, description = "Policy", body = EmployeeCostPolicy),
        (status = 400, description = "Unknown employee type"),
        (status = 422, description = "No policy for that year and type"),
    ),
    tag = "Cost Policies"
)]
pub async fn get_cost_policy(
    State(state): State<AppState>,
    Path((year, employee_type)): Path<(i32, String)>,
) -> AppResult<Json<EmployeeCostPolicy>> {
    let employee_type: EmployeeType = employee_type.parse()?;
    let policy = state
        .cost_policy_service()
        .get_policy(year, employee_type)
        .await?;
    Ok(Json(policy))
}
