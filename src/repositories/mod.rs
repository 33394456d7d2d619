// src/repositories/mod.rs

//! Storage seams of the engine. The aggregation service only sees these
//! traits; `postgres` and `memory` provide the implementations.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
    errors::AppResult,
    models::{
        EmployeeCompensation, EmployeeCostPolicy, EmployeeType, MonthlyRevenueSummary, Project,
        ProjectAssignment, ProjectRevenuePlan,
    },
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::{PgSnapshot, PgStore};

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn find_project(&self, project_id: Uuid) -> AppResult<Option<Project>>;
}

#[async_trait]
pub trait ProjectAssignmentRepository: Send + Sync {
    /// Assignments overlapping `[month_start, month_end]` across all projects.
    async fn find_active_assignments(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>>;

    async fn find_active_assignments_by_project_id(
        &self,
        project_id: Uuid,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>>;

    /// Assignments of a project overlapping a candidate period; `end_date = None`
    /// is an open-ended candidate.
    async fn find_overlapping_assignments(
        &self,
        project_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<ProjectAssignment>>;
}

#[async_trait]
pub trait ProjectRevenuePlanRepository: Send + Sync {
    async fn find_plan(&self, project_id: Uuid, sequence: i32)
    -> AppResult<Option<ProjectRevenuePlan>>;

    /// Issued plans dated within `[start, end]` for every project.
    async fn find_issued_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>>;

    async fn find_issued_by_project_between(
        &self,
        project_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>>;
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Employee type and the annual salary in force on `as_of`.
    async fn find_compensation(
        &self,
        employee_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<Option<EmployeeCompensation>>;
}

#[async_trait]
pub trait EmployeeCostPolicyRepository: Send + Sync {
    async fn find_by_apply_year_and_type(
        &self,
        apply_year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<Option<EmployeeCostPolicy>>;
}

// ─── Writes ───────────────────────────────────────────────────────────────────
// Kept apart from the reads so a read-only snapshot can serve a monthly run.

#[async_trait]
pub trait ProjectAssignmentWriter: Send + Sync {
    async fn save_assignment(&self, assignment: &ProjectAssignment) -> AppResult<()>;
}

#[async_trait]
pub trait ProjectRevenuePlanWriter: Send + Sync {
    /// Insert the plan, or update it when `(project_id, sequence)` exists.
    async fn save_plan(&self, plan: &ProjectRevenuePlan) -> AppResult<()>;
}

#[async_trait]
pub trait EmployeeCostPolicyWriter: Send + Sync {
    /// Insert or replace the policy keyed by `(apply_year, employee_type)`.
    async fn save_policy(&self, policy: &EmployeeCostPolicy) -> AppResult<EmployeeCostPolicy>;
}

#[async_trait]
pub trait MonthlyRevenueSummaryRepository: Send + Sync {
    /// Insert or replace the row keyed by `(project_id, summary_month)`.
    async fn upsert_summary(&self, summary: &MonthlyRevenueSummary) -> AppResult<()>;

    async fn find_by_month(&self, summary_month: NaiveDate) -> AppResult<Vec<MonthlyRevenueSummary>>;

    /// Delete rows of `summary_month` whose project is not in `keep`.
    async fn remove_stale(&self, summary_month: NaiveDate, keep: &[Uuid]) -> AppResult<u64>;
}
