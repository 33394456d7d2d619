// src/errors.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::EmployeeType;

/// Failures raised by the staffing and revenue domain itself.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DomainError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid assignment period: {0}")]
    InvalidAssignmentPeriod(String),

    #[error("No cost policy for year {year} and employee type {employee_type}")]
    CostPolicyNotFound {
        year: i32,
        employee_type: EmployeeType,
    },

    #[error("Invalid policy rate for {name}: {value} (must be between 0 and 1)")]
    InvalidPolicyRate { name: &'static str, value: Decimal },

    #[error("No salary record for employee {employee_id} on {as_of}")]
    SalaryNotFound { employee_id: Uuid, as_of: NaiveDate },

    #[error("Project {0} not found")]
    ProjectNotFound(Uuid),

    #[error("Employee {employee_id} already has an overlapping assignment on project {project_id}")]
    AssignmentConflict { project_id: Uuid, employee_id: Uuid },

    #[error("Revenue plan #{sequence} already exists for project {project_id}")]
    DuplicateRevenuePlan { project_id: Uuid, sequence: i32 },

    #[error("Revenue plan #{sequence} not found for project {project_id}")]
    RevenuePlanNotFound { project_id: Uuid, sequence: i32 },

    #[error("Unknown {kind}: '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

impl DomainError {
    /// Errors that only invalidate one project's figures inside a monthly run.
    pub fn is_project_scoped(&self) -> bool {
        matches!(
            self,
            DomainError::CostPolicyNotFound { .. }
                | DomainError::SalaryNotFound { .. }
                | DomainError::InvalidAmount(_)
        )
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the failure belongs to a single project and a batch may carry on.
    pub fn is_project_scoped(&self) -> bool {
        matches!(self, AppError::Domain(e) if e.is_project_scoped())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Domain(e) => match e {
                DomainError::InvalidAmount(_)
                | DomainError::InvalidAssignmentPeriod(_)
                | DomainError::InvalidPolicyRate { .. }
                | DomainError::UnknownVariant { .. } => StatusCode::BAD_REQUEST,
                DomainError::ProjectNotFound(_)
                | DomainError::RevenuePlanNotFound { .. } => StatusCode::NOT_FOUND,
                DomainError::AssignmentConflict { .. }
                | DomainError::DuplicateRevenuePlan { .. } => StatusCode::CONFLICT,
                DomainError::CostPolicyNotFound { .. } | DomainError::SalaryNotFound { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = json!({
            "error": {
                "code": status.as_u16(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

// Convenience alias
pub type AppResult<T> = Result<T, AppError>;
