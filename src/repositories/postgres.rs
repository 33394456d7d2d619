// src/repositories/postgres.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{FromRow, PgExecutor, PgPool, Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use super::{
    EmployeeCostPolicyRepository, EmployeeCostPolicyWriter, EmployeeRepository,
    MonthlyRevenueSummaryRepository, ProjectAssignmentRepository, ProjectAssignmentWriter,
    ProjectRepository, ProjectRevenuePlanRepository, ProjectRevenuePlanWriter,
};
use crate::{
    errors::{AppError, AppResult},
    models::{
        AssignmentRole, EmployeeCompensation, EmployeeCostPolicy, EmployeeType, Money,
        MonthlyRevenueSummary, Period, Project, ProjectAssignment, ProjectRevenuePlan,
        RevenueType, SignedMoney,
    },
};

// ─── Rows ─────────────────────────────────────────────────────────────────────

#[derive(FromRow)]
struct ProjectRow {
    id: Uuid,
    code: String,
    name: String,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project::new(row.id, row.code, row.name, Period::new(row.start_date, row.end_date))
    }
}

#[derive(FromRow)]
struct AssignmentRow {
    project_id: Uuid,
    employee_id: Uuid,
    role: Option<AssignmentRole>,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
}

impl From<AssignmentRow> for ProjectAssignment {
    fn from(row: AssignmentRow) -> Self {
        ProjectAssignment::from_parts(
            row.project_id,
            row.employee_id,
            row.role,
            Period::new(row.start_date, row.end_date),
        )
    }
}

#[derive(FromRow)]
struct RevenuePlanRow {
    project_id: Uuid,
    sequence: i32,
    revenue_date: NaiveDate,
    revenue_type: RevenueType,
    amount: Decimal,
    memo: Option<String>,
    issued: bool,
}

impl TryFrom<RevenuePlanRow> for ProjectRevenuePlan {
    type Error = AppError;

    fn try_from(row: RevenuePlanRow) -> Result<Self, Self::Error> {
        Ok(ProjectRevenuePlan {
            project_id: row.project_id,
            sequence: row.sequence,
            revenue_date: row.revenue_date,
            revenue_type: row.revenue_type,
            amount: Money::wons(row.amount)?,
            memo: row.memo,
            issued: row.issued,
        })
    }
}

#[derive(FromRow)]
struct CompensationRow {
    employee_id: Uuid,
    employee_type: EmployeeType,
    annual_salary: Decimal,
}

#[derive(FromRow)]
struct CostPolicyRow {
    apply_year: i32,
    employee_type: EmployeeType,
    overhead_rate: Decimal,
    sga_rate: Decimal,
}

impl TryFrom<CostPolicyRow> for EmployeeCostPolicy {
    type Error = AppError;

    fn try_from(row: CostPolicyRow) -> Result<Self, Self::Error> {
        Ok(EmployeeCostPolicy::create(
            row.apply_year,
            row.employee_type,
            row.overhead_rate,
            row.sga_rate,
        )?)
    }
}

#[derive(FromRow)]
struct SummaryRow {
    project_id: Uuid,
    summary_month: NaiveDate,
    revenue_amount: Decimal,
    cost_amount: Decimal,
    profit_amount: Decimal,
}

impl TryFrom<SummaryRow> for MonthlyRevenueSummary {
    type Error = AppError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(MonthlyRevenueSummary {
            project_id: row.project_id,
            summary_month: row.summary_month,
            revenue_amount: Money::wons(row.revenue_amount)?,
            cost_amount: Money::wons(row.cost_amount)?,
            profit_amount: SignedMoney::new(row.profit_amount),
        })
    }
}

// ─── Queries ──────────────────────────────────────────────────────────────────
// Shared by the pool-backed store and the transaction-backed snapshot.

const ASSIGNMENT_COLUMNS: &str = "project_id, employee_id, role, start_date, end_date";
const PLAN_COLUMNS: &str =
    "project_id, sequence, revenue_date, revenue_type, amount, memo, issued";

async fn query_project<'e, E: PgExecutor<'e>>(db: E, project_id: Uuid) -> AppResult<Option<Project>> {
    let row = sqlx::query_as::<_, ProjectRow>(
        "SELECT id, code, name, start_date, end_date FROM projects WHERE id = $1",
    )
    .bind(project_id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Project::from))
}

async fn query_active_assignments<'e, E: PgExecutor<'e>>(
    db: E,
    project_id: Option<Uuid>,
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> AppResult<Vec<ProjectAssignment>> {
    let sql = format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM project_assignments
         WHERE ($1::uuid IS NULL OR project_id = $1)
           AND ($3::date IS NULL OR start_date <= $3)
           AND (end_date IS NULL OR end_date >= $2)
         ORDER BY project_id, start_date, employee_id"
    );
    let rows = sqlx::query_as::<_, AssignmentRow>(&sql)
        .bind(project_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(ProjectAssignment::from).collect())
}

async fn query_plan<'e, E: PgExecutor<'e>>(
    db: E,
    project_id: Uuid,
    sequence: i32,
) -> AppResult<Option<ProjectRevenuePlan>> {
    let sql = format!(
        "SELECT {PLAN_COLUMNS} FROM project_revenue_plans WHERE project_id = $1 AND sequence = $2"
    );
    sqlx::query_as::<_, RevenuePlanRow>(&sql)
        .bind(project_id)
        .bind(sequence)
        .fetch_optional(db)
        .await?
        .map(ProjectRevenuePlan::try_from)
        .transpose()
}

async fn query_issued_plans<'e, E: PgExecutor<'e>>(
    db: E,
    project_id: Option<Uuid>,
    start: NaiveDate,
    end: NaiveDate,
) -> AppResult<Vec<ProjectRevenuePlan>> {
    let sql = format!(
        "SELECT {PLAN_COLUMNS} FROM project_revenue_plans
         WHERE issued = true
           AND ($1::uuid IS NULL OR project_id = $1)
           AND revenue_date BETWEEN $2 AND $3
         ORDER BY project_id, sequence"
    );
    sqlx::query_as::<_, RevenuePlanRow>(&sql)
        .bind(project_id)
        .bind(start)
        .bind(end)
        .fetch_all(db)
        .await?
        .into_iter()
        .map(ProjectRevenuePlan::try_from)
        .collect()
}

async fn query_compensation<'e, E: PgExecutor<'e>>(
    db: E,
    employee_id: Uuid,
    as_of: NaiveDate,
) -> AppResult<Option<EmployeeCompensation>> {
    let row = sqlx::query_as::<_, CompensationRow>(
        r#"SELECT e.id AS employee_id, e.employee_type, s.annual_salary
           FROM employees e
           JOIN salary_records s ON s.employee_id = e.id
           WHERE e.id = $1
             AND s.start_date <= $2
             AND (s.end_date IS NULL OR s.end_date >= $2)
           ORDER BY s.start_date DESC
           LIMIT 1"#,
    )
    .bind(employee_id)
    .bind(as_of)
    .fetch_optional(db)
    .await?;

    row.map(|r| -> AppResult<EmployeeCompensation> {
        Ok(EmployeeCompensation {
            employee_id: r.employee_id,
            employee_type: r.employee_type,
            annual_salary: Money::wons(r.annual_salary)?,
        })
    })
    .transpose()
}

async fn query_cost_policy<'e, E: PgExecutor<'e>>(
    db: E,
    apply_year: i32,
    employee_type: EmployeeType,
) -> AppResult<Option<EmployeeCostPolicy>> {
    sqlx::query_as::<_, CostPolicyRow>(
        "SELECT apply_year, employee_type, overhead_rate, sga_rate
         FROM employee_cost_policies
         WHERE apply_year = $1 AND employee_type = $2",
    )
    .bind(apply_year)
    .bind(employee_type)
    .fetch_optional(db)
    .await?
    .map(EmployeeCostPolicy::try_from)
    .transpose()
}

// ─── PgStore ──────────────────────────────────────────────────────────────────

/// Pool-backed implementation of every repository trait.
#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Open a read-only, repeatable-read view for one monthly run.
    pub async fn snapshot(&self) -> AppResult<PgSnapshot> {
        let mut tx = self.db.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(PgSnapshot { tx: Mutex::new(tx) })
    }
}

#[async_trait]
impl ProjectRepository for PgStore {
    async fn find_project(&self, project_id: Uuid) -> AppResult<Option<Project>> {
        query_project(&self.db, project_id).await
    }
}

#[async_trait]
impl ProjectAssignmentWriter for PgStore {
    async fn save_assignment(&self, assignment: &ProjectAssignment) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO project_assignments (id, project_id, employee_id, role, start_date, end_date, created_at)
               VALUES ($1, $2, $3, $4, $5, $6, NOW())"#,
        )
        .bind(Uuid::new_v4())
        .bind(assignment.project_id)
        .bind(assignment.employee_id)
        .bind(assignment.role)
        .bind(assignment.period.start_date)
        .bind(assignment.period.end_date)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectAssignmentRepository for PgStore {
    async fn find_active_assignments(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        query_active_assignments(&self.db, None, month_start, Some(month_end)).await
    }

    async fn find_active_assignments_by_project_id(
        &self,
        project_id: Uuid,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        query_active_assignments(&self.db, Some(project_id), month_start, Some(month_end)).await
    }

    async fn find_overlapping_assignments(
        &self,
        project_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<ProjectAssignment>> {
        query_active_assignments(&self.db, Some(project_id), start_date, end_date).await
    }
}

#[async_trait]
impl ProjectRevenuePlanWriter for PgStore {
    async fn save_plan(&self, plan: &ProjectRevenuePlan) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO project_revenue_plans (
                id, project_id, sequence, revenue_date, revenue_type, amount, memo, issued, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW(), NOW())
            ON CONFLICT (project_id, sequence) DO UPDATE
            SET revenue_date = EXCLUDED.revenue_date,
                revenue_type = EXCLUDED.revenue_type,
                amount = EXCLUDED.amount,
                memo = EXCLUDED.memo,
                issued = EXCLUDED.issued,
                updated_at = NOW()"#,
        )
        .bind(Uuid::new_v4())
        .bind(plan.project_id)
        .bind(plan.sequence)
        .bind(plan.revenue_date)
        .bind(plan.revenue_type)
        .bind(plan.amount.amount())
        .bind(plan.memo.as_deref())
        .bind(plan.issued)
        .execute(&self.db)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectRevenuePlanRepository for PgStore {
    async fn find_plan(
        &self,
        project_id: Uuid,
        sequence: i32,
    ) -> AppResult<Option<ProjectRevenuePlan>> {
        query_plan(&self.db, project_id, sequence).await
    }

    async fn find_issued_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        query_issued_plans(&self.db, None, start, end).await
    }

    async fn find_issued_by_project_between(
        &self,
        project_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        query_issued_plans(&self.db, Some(project_id), start, end).await
    }
}

#[async_trait]
impl EmployeeRepository for PgStore {
    async fn find_compensation(
        &self,
        employee_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<Option<EmployeeCompensation>> {
        query_compensation(&self.db, employee_id, as_of).await
    }
}

#[async_trait]
impl EmployeeCostPolicyWriter for PgStore {
    async fn save_policy(&self, policy: &EmployeeCostPolicy) -> AppResult<EmployeeCostPolicy> {
        let row = sqlx::query_as::<_, CostPolicyRow>(
            r#"INSERT INTO employee_cost_policies (id, apply_year, employee_type, overhead_rate, sga_rate, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
               ON CONFLICT (apply_year, employee_type) DO UPDATE
               SET overhead_rate = EXCLUDED.overhead_rate,
                   sga_rate = EXCLUDED.sga_rate,
                   updated_at = NOW()
               RETURNING apply_year, employee_type, overhead_rate, sga_rate"#,
        )
        .bind(Uuid::new_v4())
        .bind(policy.apply_year)
        .bind(policy.employee_type)
        .bind(policy.overhead_rate)
        .bind(policy.sga_rate)
        .fetch_one(&self.db)
        .await?;
        EmployeeCostPolicy::try_from(row)
    }
}

#[async_trait]
impl EmployeeCostPolicyRepository for PgStore {
    async fn find_by_apply_year_and_type(
        &self,
        apply_year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<Option<EmployeeCostPolicy>> {
        query_cost_policy(&self.db, apply_year, employee_type).await
    }
}

#[async_trait]
impl MonthlyRevenueSummaryRepository for PgStore {
    async fn upsert_summary(&self, summary: &MonthlyRevenueSummary) -> AppResult<()> {
        sqlx::query(
            r#"INSERT INTO monthly_revenue_summaries (
                project_id, summary_month, revenue_amount, cost_amount, profit_amount, calculated_at
            ) VALUES ($1, $2, $3, $4, $5, NOW())
            ON CONFLICT (project_id, summary_month) DO UPDATE
            SET revenue_amount = EXCLUDED.revenue_amount,
                cost_amount = EXCLUDED.cost_amount,
                profit_amount = EXCLUDED.profit_amount,
                calculated_at = NOW()"#,
        )
        .bind(summary.project_id)
        .bind(summary.summary_month)
        .bind(summary.revenue_amount.amount())
        .bind(summary.cost_amount.amount())
        .bind(summary.profit_amount.amount())
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn find_by_month(&self, summary_month: NaiveDate) -> AppResult<Vec<MonthlyRevenueSummary>> {
        sqlx::query_as::<_, SummaryRow>(
            r#"SELECT project_id, summary_month, revenue_amount, cost_amount, profit_amount
               FROM monthly_revenue_summaries
               WHERE summary_month = $1
               ORDER BY project_id"#,
        )
        .bind(summary_month)
        .fetch_all(&self.db)
        .await?
        .into_iter()
        .map(MonthlyRevenueSummary::try_from)
        .collect()
    }

    async fn remove_stale(&self, summary_month: NaiveDate, keep: &[Uuid]) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM monthly_revenue_summaries WHERE summary_month = $1 AND NOT (project_id = ANY($2))",
        )
        .bind(summary_month)
        .bind(keep)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }
}

// ─── PgSnapshot ───────────────────────────────────────────────────────────────

/// Read side of the repositories inside one read-only transaction, so every
/// read of a monthly run sees the same data.
pub struct PgSnapshot {
    tx: Mutex<Transaction<'static, Postgres>>,
}

impl PgSnapshot {
    /// End the read view. Dropping the snapshot rolls back as well.
    pub async fn finish(self) -> AppResult<()> {
        self.tx.into_inner().commit().await?;
        Ok(())
    }

    /// Commit a snapshot that was handed out as shared repositories.
    /// Call once every holder is dropped; a snapshot still shared is left to
    /// roll back on drop.
    pub async fn release(snapshot: Arc<Self>) -> AppResult<()> {
        match Arc::try_unwrap(snapshot) {
            Ok(snapshot) => snapshot.finish().await,
            Err(shared) => {
                debug!(
                    holders = Arc::strong_count(&shared),
                    "Snapshot still shared, leaving it to roll back"
                );
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ProjectAssignmentRepository for PgSnapshot {
    async fn find_active_assignments(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let mut tx = self.tx.lock().await;
        query_active_assignments(&mut **tx, None, month_start, Some(month_end)).await
    }

    async fn find_active_assignments_by_project_id(
        &self,
        project_id: Uuid,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let mut tx = self.tx.lock().await;
        query_active_assignments(&mut **tx, Some(project_id), month_start, Some(month_end)).await
    }

    async fn find_overlapping_assignments(
        &self,
        project_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let mut tx = self.tx.lock().await;
        query_active_assignments(&mut **tx, Some(project_id), start_date, end_date).await
    }
}

#[async_trait]
impl ProjectRevenuePlanRepository for PgSnapshot {
    async fn find_plan(
        &self,
        project_id: Uuid,
        sequence: i32,
    ) -> AppResult<Option<ProjectRevenuePlan>> {
        let mut tx = self.tx.lock().await;
        query_plan(&mut **tx, project_id, sequence).await
    }

    async fn find_issued_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        let mut tx = self.tx.lock().await;
        query_issued_plans(&mut **tx, None, start, end).await
    }

    async fn find_issued_by_project_between(
        &self,
        project_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        let mut tx = self.tx.lock().await;
        query_issued_plans(&mut **tx, Some(project_id), start, end).await
    }
}

#[async_trait]
impl EmployeeRepository for PgSnapshot {
    async fn find_compensation(
        &self,
        employee_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<Option<EmployeeCompensation>> {
        let mut tx = self.tx.lock().await;
        query_compensation(&mut **tx, employee_id, as_of).await
    }
}

#[async_trait]
impl EmployeeCostPolicyRepository for PgSnapshot {
    async fn find_by_apply_year_and_type(
        &self,
        apply_year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<Option<EmployeeCostPolicy>> {
        let mut tx = self.tx.lock().await;
        query_cost_policy(&mut **tx, apply_year, employee_type).await
    }
}
