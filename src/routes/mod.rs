// src/routes/mod.rs

use crate::{
    handlers::{
        assignment::{assign_employee, list_active_assignments},
        cost_policy::{get_cost_policy, set_cost_policy},
        revenue_plan::{create_revenue_plan, issue_revenue_plan},
        summary::{get_company_summary, list_monthly_summaries, run_monthly_summary},
    },
    state::AppState,
};
use axum::{
    Router,
    routing::{get, post, put},
};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // ─── Summaries ────────────────────────────────────────
        .route("/summaries/run", post(run_monthly_summary))
        .route("/summaries", get(list_monthly_summaries))
        .route("/summaries/company", get(get_company_summary))
        // ─── Assignments ──────────────────────────────────────
        .route("/projects/{project_id}/assignments", post(assign_employee))
        .route("/assignments/active", get(list_active_assignments))
        // ─── Revenue Plans ────────────────────────────────────
        .route(
            "/projects/{project_id}/revenue-plans",
            post(create_revenue_plan),
        )
        .route(
            "/projects/{project_id}/revenue-plans/{sequence}/issue",
            post(issue_revenue_plan),
        )
        // ─── Cost Policies ────────────────────────────────────
        .route("/cost-policies", put(set_cost_policy))
        .route(
            "/cost-policies/{year}/{employee_type}",
            get(get_cost_policy),
        )
}
