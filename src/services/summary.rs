// src/services/summary.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::cost_cache::CostPolicyCache;
use crate::{
    errors::{AppResult, DomainError},
    models::{
        CompanyMonthlySummary, Money, MonthRange, MonthlyRevenueSummary, MonthlySummaryReport,
        ProjectAssignment, ProjectFailure, SignedMoney,
    },
    repositories::{
        EmployeeCostPolicyRepository, EmployeeRepository, MonthlyRevenueSummaryRepository,
        ProjectAssignmentRepository, ProjectRevenuePlanRepository,
    },
};

/// Monthly revenue/cost/profit aggregation.
#[async_trait]
pub trait MonthlyRevenueSummaryManager: Send + Sync {
    /// Recompute every project with activity in the month containing
    /// `target_month`, replace their stored rows and report what was skipped.
    async fn calculate_monthly_summary(&self, target_month: NaiveDate)
    -> AppResult<MonthlySummaryReport>;

    /// Per-project figures for the month without storing them. Projects that
    /// fail are logged and left out.
    async fn calculate_monthly_summary_by_project(
        &self,
        target_month: NaiveDate,
    ) -> AppResult<Vec<MonthlyRevenueSummary>>;

    /// Sum of the project's issued revenue plans dated in the month.
    async fn calculate_revenue(&self, project_id: Uuid, target_month: NaiveDate) -> AppResult<Money>;

    /// Company-wide prorated staffing cost of the month.
    async fn calculate_total_cost(&self, target_month: NaiveDate) -> AppResult<Money>;

    fn calculate_profit(&self, revenue: Money, cost: Money) -> SignedMoney;
}

/// Result of computing one month before anything is written.
struct MonthComputation {
    summaries: Vec<MonthlyRevenueSummary>,
    failures: Vec<ProjectFailure>,
    /// Every project with activity, including the ones that failed
    active_projects: Vec<Uuid>,
}

pub struct MonthlyRevenueSummaryService {
    assignments: Arc<dyn ProjectAssignmentRepository>,
    revenue_plans: Arc<dyn ProjectRevenuePlanRepository>,
    employees: Arc<dyn EmployeeRepository>,
    cost_policies: Arc<dyn EmployeeCostPolicyRepository>,
    summaries: Arc<dyn MonthlyRevenueSummaryRepository>,
}

impl MonthlyRevenueSummaryService {
    pub fn new(
        assignments: Arc<dyn ProjectAssignmentRepository>,
        revenue_plans: Arc<dyn ProjectRevenuePlanRepository>,
        employees: Arc<dyn EmployeeRepository>,
        cost_policies: Arc<dyn EmployeeCostPolicyRepository>,
        summaries: Arc<dyn MonthlyRevenueSummaryRepository>,
    ) -> Self {
        Self {
            assignments,
            revenue_plans,
            employees,
            cost_policies,
            summaries,
        }
    }

    /// Read and write through the same store.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProjectAssignmentRepository
            + ProjectRevenuePlanRepository
            + EmployeeRepository
            + EmployeeCostPolicyRepository
            + MonthlyRevenueSummaryRepository
            + 'static,
    {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
        )
    }

    /// Read everything through `reader` and write summaries through `summaries`.
    /// Used to run a month against one read-only snapshot.
    pub fn with_reader<R>(reader: Arc<R>, summaries: Arc<dyn MonthlyRevenueSummaryRepository>) -> Self
    where
        R: ProjectAssignmentRepository
            + ProjectRevenuePlanRepository
            + EmployeeRepository
            + EmployeeCostPolicyRepository
            + 'static,
    {
        Self::new(
            reader.clone(),
            reader.clone(),
            reader.clone(),
            reader,
            summaries,
        )
    }

    /// Company-wide issued revenue of the month.
    pub async fn calculate_company_revenue(&self, target_month: NaiveDate) -> AppResult<Money> {
        let month = MonthRange::containing(target_month);
        let plans = self
            .revenue_plans
            .find_issued_between(month.start, month.end)
            .await?;
        Ok(plans
            .iter()
            .try_fold(Money::zero(), |sum, p| sum.add(p.amount))?)
    }

    pub async fn calculate_project_cost(
        &self,
        project_id: Uuid,
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<Money> {
        let month = MonthRange::containing(target_month);
        let assignments = self
            .assignments
            .find_active_assignments_by_project_id(project_id, month.start, month.end)
            .await?;
        self.sum_assignment_costs(&assignments, target_month, cache)
            .await
    }

    /// Monthly cost of one employee × the man-month they spent on the
    /// assignment. Zero when the assignment misses the month.
    pub async fn calculate_assignment_cost(
        &self,
        assignment: &ProjectAssignment,
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<Money> {
        let month = MonthRange::containing(target_month);
        let man_month = assignment.calculate_man_month(target_month);
        let Some((_, active_until)) = assignment.active_range_in(month) else {
            return Ok(Money::zero());
        };
        if man_month <= Decimal::ZERO {
            return Ok(Money::zero());
        }

        let compensation = self
            .employees
            .find_compensation(assignment.employee_id, active_until)
            .await?
            .ok_or(DomainError::SalaryNotFound {
                employee_id: assignment.employee_id,
                as_of: active_until,
            })?;

        let policy = cache
            .get_or_load(
                self.cost_policies.as_ref(),
                month.year(),
                compensation.employee_type,
            )
            .await?;

        let monthly_cost = policy.calculate_employee_cost(compensation.annual_salary)?;
        Ok(monthly_cost.multiply(man_month)?)
    }

    async fn sum_assignment_costs(
        &self,
        assignments: &[ProjectAssignment],
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<Money> {
        let mut total = Money::zero();
        for assignment in assignments {
            let cost = self
                .calculate_assignment_cost(assignment, target_month, cache)
                .await?;
            total = total.add(cost)?;
        }
        Ok(total)
    }

    async fn summarize_project(
        &self,
        project_id: Uuid,
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<MonthlyRevenueSummary> {
        let revenue = self.calculate_revenue(project_id, target_month).await?;
        let cost = self
            .calculate_project_cost(project_id, target_month, cache)
            .await?;
        Ok(MonthlyRevenueSummary::create(
            project_id,
            target_month,
            revenue,
            cost,
        ))
    }

    /// Projects with an active assignment or an issued plan in the month,
    /// in a stable order.
    async fn projects_with_activity(&self, month: MonthRange) -> AppResult<BTreeSet<Uuid>> {
        let assignments = self
            .assignments
            .find_active_assignments(month.start, month.end)
            .await?;
        let plans = self
            .revenue_plans
            .find_issued_between(month.start, month.end)
            .await?;

        Ok(assignments
            .iter()
            .map(|a| a.project_id)
            .chain(plans.iter().map(|p| p.project_id))
            .collect())
    }

    async fn compute_month(
        &self,
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<MonthComputation> {
        let month = MonthRange::containing(target_month);
        let projects = self.projects_with_activity(month).await?;

        let mut summaries = Vec::with_capacity(projects.len());
        let mut failures = Vec::new();

        for &project_id in &projects {
            match self.summarize_project(project_id, target_month, cache).await {
                Ok(summary) => summaries.push(summary),
                Err(e) if e.is_project_scoped() => {
                    error!(
                        "Skipping project {} for {}: {}",
                        project_id, month.start, e
                    );
                    failures.push(ProjectFailure {
                        project_id,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(MonthComputation {
            summaries,
            failures,
            active_projects: projects.into_iter().collect(),
        })
    }

    /// Same as [`MonthlyRevenueSummaryManager::calculate_monthly_summary`] with a
    /// caller-owned policy cache.
    pub async fn calculate_monthly_summary_with_cache(
        &self,
        target_month: NaiveDate,
        cache: &mut CostPolicyCache,
    ) -> AppResult<MonthlySummaryReport> {
        let month = MonthRange::containing(target_month);
        info!("Starting monthly revenue summary for {}", month.start);

        let computed = self.compute_month(target_month, cache).await?;

        for summary in &computed.summaries {
            self.summaries.upsert_summary(summary).await?;
        }
        let removed_stale = self
            .summaries
            .remove_stale(month.start, &computed.active_projects)
            .await?;

        if !computed.failures.is_empty() {
            warn!(
                "{} project(s) skipped in summary for {}",
                computed.failures.len(),
                month.start
            );
        }
        info!(
            "Monthly revenue summary for {} complete. {} project(s) written, {} stale row(s) removed",
            month.start,
            computed.summaries.len(),
            removed_stale
        );

        Ok(MonthlySummaryReport {
            summary_month: month.start,
            summaries: computed.summaries,
            failures: computed.failures,
            removed_stale,
        })
    }

    /// Company-wide revenue, cost, profit and staffing for the month.
    pub async fn calculate_company_summary(
        &self,
        target_month: NaiveDate,
    ) -> AppResult<CompanyMonthlySummary> {
        let month = MonthRange::containing(target_month);
        let revenue = self.calculate_company_revenue(target_month).await?;
        let assignments = self
            .assignments
            .find_active_assignments(month.start, month.end)
            .await?;

        let mut cache = CostPolicyCache::new();
        let cost = self
            .sum_assignment_costs(&assignments, target_month, &mut cache)
            .await?;

        let mut staffed = HashSet::new();
        let mut man_month = Decimal::ZERO;
        for assignment in &assignments {
            let mm = assignment.calculate_man_month(target_month);
            if mm > Decimal::ZERO {
                staffed.insert(assignment.employee_id);
                man_month += mm;
            }
        }

        Ok(CompanyMonthlySummary {
            summary_month: month.start,
            revenue_amount: revenue,
            cost_amount: cost,
            profit_amount: self.calculate_profit(revenue, cost),
            headcount: staffed.len(),
            man_month,
        })
    }
}

#[async_trait]
impl MonthlyRevenueSummaryManager for MonthlyRevenueSummaryService {
    async fn calculate_monthly_summary(
        &self,
        target_month: NaiveDate,
    ) -> AppResult<MonthlySummaryReport> {
        let mut cache = CostPolicyCache::new();
        self.calculate_monthly_summary_with_cache(target_month, &mut cache)
            .await
    }

    async fn calculate_monthly_summary_by_project(
        &self,
        target_month: NaiveDate,
    ) -> AppResult<Vec<MonthlyRevenueSummary>> {
        let mut cache = CostPolicyCache::new();
        let computed = self.compute_month(target_month, &mut cache).await?;
        Ok(computed.summaries)
    }

    async fn calculate_revenue(&self, project_id: Uuid, target_month: NaiveDate) -> AppResult<Money> {
        let month = MonthRange::containing(target_month);
        let plans = self
            .revenue_plans
            .find_issued_by_project_between(project_id, month.start, month.end)
            .await?;
        Ok(plans
            .iter()
            .try_fold(Money::zero(), |sum, p| sum.add(p.amount))?)
    }

    async fn calculate_total_cost(&self, target_month: NaiveDate) -> AppResult<Money> {
        let month = MonthRange::containing(target_month);
        let assignments = self
            .assignments
            .find_active_assignments(month.start, month.end)
            .await?;
        let mut cache = CostPolicyCache::new();
        self.sum_assignment_costs(&assignments, target_month, &mut cache)
            .await
    }

    fn calculate_profit(&self, revenue: Money, cost: Money) -> SignedMoney {
        SignedMoney::difference(revenue, cost)
    }
}
