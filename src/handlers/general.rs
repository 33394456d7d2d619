use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde_json::json;

/// Root handler, a landing page listing the API routes
pub async fn root_handler() -> impl IntoResponse {
    Html(r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0"/>
  <title>Project Revenue Engine</title>
  <style>
    * { box-sizing: border-box; margin: 0; padding: 0; }
    body { font-family: 'Segoe UI', system-ui, sans-serif; background: #0f172a; color: #e2e8f0; min-height: 100vh; padding: 40px 20px; }
    .container { max-width: 860px; margin: 0 auto; }
    header { text-align: center; margin-bottom: 40px; }
    header h1 { font-size: 2.4rem; font-weight: 800; color: #38bdf8; margin-bottom: 8px; }
    header p { color: #94a3b8; }
    .routes { background: #1e293b; border: 1px solid #334155; border-radius: 12px; padding: 24px; }
    .route-group { margin-bottom: 20px; }
    .route-group h4 { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.1em; color: #64748b; margin-bottom: 8px; }
    .route-item { display: flex; gap: 12px; padding: 6px 0; }
    .method { font-size: 0.7rem; font-weight: 700; padding: 2px 8px; border-radius: 4px; min-width: 52px; text-align: center; font-family: monospace; }
    .get { background: #064e3b; color: #34d399; }
    .post { background: #1e3a5f; color: #60a5fa; }
    .put { background: #451a03; color: #fb923c; }
    .route-path { font-family: monospace; font-size: 0.85rem; flex: 1; }
    .route-desc { font-size: 0.8rem; color: #64748b; }
    a { color: #38bdf8; }
  </style>
</head>
<body>
<div class="container">
  <header>
    <h1>Project Revenue Engine</h1>
    <p>Monthly revenue, staffing cost and profit per project. <a href="/docs">Swagger UI</a> · <a href="/health">Health</a></p>
  </header>

  <div class="routes">
    <div class="route-group">
      <h4>Summaries</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/summaries/run</span><span class="route-desc">Recompute and store a month</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/summaries?month=</span><span class="route-desc">Stored project rows of a month</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/summaries/company?month=</span><span class="route-desc">Company rollup</span></div>
    </div>

    <div class="route-group">
      <h4>Assignments</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/projects/{project_id}/assignments</span><span class="route-desc">Assign an employee</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/assignments/active?month=</span><span class="route-desc">Active assignments of a month</span></div>
    </div>

    <div class="route-group">
      <h4>Revenue Plans</h4>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/projects/{project_id}/revenue-plans</span><span class="route-desc">Add an installment</span></div>
      <div class="route-item"><span class="method post">POST</span><span class="route-path">/api/v1/projects/{project_id}/revenue-plans/{sequence}/issue</span><span class="route-desc">Mark an installment invoiced</span></div>
    </div>

    <div class="route-group">
      <h4>Cost Policies</h4>
      <div class="route-item"><span class="method put">PUT</span><span class="route-path">/api/v1/cost-policies</span><span class="route-desc">Set overhead and SG&amp;A rates</span></div>
      <div class="route-item"><span class="method get">GET</span><span class="route-path">/api/v1/cost-policies/{year}/{employee_type}</span><span class="route-desc">Read a policy</span></div>
    </div>
  </div>
</div>
</body>
</html>"#)
}

/// Health check endpoint
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "database": "connected",
                "service": "project-revenue-engine",
                "version": env!("CARGO_PKG_VERSION")
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "database": "disconnected",
                "error": e.to_string()
            })),
        ),
    }
}
