// src/repositories/memory.rs

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use uuid::Uuid;

use super::{
    EmployeeCostPolicyRepository, EmployeeCostPolicyWriter, EmployeeRepository,
    MonthlyRevenueSummaryRepository, ProjectAssignmentRepository, ProjectAssignmentWriter,
    ProjectRepository, ProjectRevenuePlanRepository, ProjectRevenuePlanWriter,
};
use crate::{
    errors::{AppError, AppResult},
    models::{
        EmployeeCompensation, EmployeeCostPolicy, EmployeeType, MonthlyRevenueSummary, Project,
        ProjectAssignment, ProjectRevenuePlan, SalaryRecord,
    },
};

#[derive(Default)]
struct Tables {
    projects: HashMap<Uuid, Project>,
    employees: HashMap<Uuid, EmployeeType>,
    salaries: Vec<SalaryRecord>,
    assignments: Vec<ProjectAssignment>,
    plans: BTreeMap<(Uuid, i32), ProjectRevenuePlan>,
    policies: HashMap<(i32, EmployeeType), EmployeeCostPolicy>,
    summaries: BTreeMap<(Uuid, NaiveDate), MonthlyRevenueSummary>,
}

/// Every repository trait over one in-process table set.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

fn poisoned() -> AppError {
    AppError::Internal("in-memory store lock poisoned".to_string())
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_project(&self, project: Project) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.projects.insert(project.id, project);
        Ok(())
    }

    pub fn insert_employee(&self, employee_id: Uuid, employee_type: EmployeeType) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.employees.insert(employee_id, employee_type);
        Ok(())
    }

    pub fn insert_salary(&self, record: SalaryRecord) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.salaries.push(record);
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_project(&self, project_id: Uuid) -> AppResult<Option<Project>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.projects.get(&project_id).cloned())
    }
}

#[async_trait]
impl ProjectAssignmentWriter for InMemoryStore {
    async fn save_assignment(&self, assignment: &ProjectAssignment) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables.assignments.push(assignment.clone());
        Ok(())
    }
}

#[async_trait]
impl ProjectAssignmentRepository for InMemoryStore {
    async fn find_active_assignments(
        &self,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.period.overlaps(month_start, Some(month_end)))
            .cloned()
            .collect())
    }

    async fn find_active_assignments_by_project_id(
        &self,
        project_id: Uuid,
        month_start: NaiveDate,
        month_end: NaiveDate,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.project_id == project_id)
            .filter(|a| a.period.overlaps(month_start, Some(month_end)))
            .cloned()
            .collect())
    }

    async fn find_overlapping_assignments(
        &self,
        project_id: Uuid,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> AppResult<Vec<ProjectAssignment>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .assignments
            .iter()
            .filter(|a| a.project_id == project_id)
            .filter(|a| a.period.overlaps(start_date, end_date))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProjectRevenuePlanWriter for InMemoryStore {
    async fn save_plan(&self, plan: &ProjectRevenuePlan) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables
            .plans
            .insert((plan.project_id, plan.sequence), plan.clone());
        Ok(())
    }
}

#[async_trait]
impl ProjectRevenuePlanRepository for InMemoryStore {
    async fn find_plan(
        &self,
        project_id: Uuid,
        sequence: i32,
    ) -> AppResult<Option<ProjectRevenuePlan>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.plans.get(&(project_id, sequence)).cloned())
    }

    async fn find_issued_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .plans
            .values()
            .filter(|p| p.issued && start <= p.revenue_date && p.revenue_date <= end)
            .cloned()
            .collect())
    }

    async fn find_issued_by_project_between(
        &self,
        project_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<ProjectRevenuePlan>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .plans
            .values()
            .filter(|p| p.project_id == project_id)
            .filter(|p| p.issued && start <= p.revenue_date && p.revenue_date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn find_compensation(
        &self,
        employee_id: Uuid,
        as_of: NaiveDate,
    ) -> AppResult<Option<EmployeeCompensation>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        let Some(employee_type) = tables.employees.get(&employee_id).copied() else {
            return Ok(None);
        };
        let salary = tables
            .salaries
            .iter()
            .filter(|s| s.employee_id == employee_id && s.period.contains(as_of))
            .max_by_key(|s| s.period.start_date);

        Ok(salary.map(|s| EmployeeCompensation {
            employee_id,
            employee_type,
            annual_salary: s.annual_salary,
        }))
    }
}

#[async_trait]
impl EmployeeCostPolicyWriter for InMemoryStore {
    async fn save_policy(&self, policy: &EmployeeCostPolicy) -> AppResult<EmployeeCostPolicy> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables
            .policies
            .insert((policy.apply_year, policy.employee_type), policy.clone());
        Ok(policy.clone())
    }
}

#[async_trait]
impl EmployeeCostPolicyRepository for InMemoryStore {
    async fn find_by_apply_year_and_type(
        &self,
        apply_year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<Option<EmployeeCostPolicy>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables.policies.get(&(apply_year, employee_type)).cloned())
    }
}

#[async_trait]
impl MonthlyRevenueSummaryRepository for InMemoryStore {
    async fn upsert_summary(&self, summary: &MonthlyRevenueSummary) -> AppResult<()> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        tables
            .summaries
            .insert((summary.project_id, summary.summary_month), summary.clone());
        Ok(())
    }

    async fn find_by_month(&self, summary_month: NaiveDate) -> AppResult<Vec<MonthlyRevenueSummary>> {
        let tables = self.tables.read().map_err(|_| poisoned())?;
        Ok(tables
            .summaries
            .values()
            .filter(|s| s.summary_month == summary_month)
            .cloned()
            .collect())
    }

    async fn remove_stale(&self, summary_month: NaiveDate, keep: &[Uuid]) -> AppResult<u64> {
        let mut tables = self.tables.write().map_err(|_| poisoned())?;
        let before = tables.summaries.len();
        tables
            .summaries
            .retain(|(project_id, month), _| *month != summary_month || keep.contains(project_id));
        Ok((before - tables.summaries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssignmentRole, MonthRange, Money, Period};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn active_assignment_query_uses_inclusive_overlap() {
        let store = InMemoryStore::new();
        let project_id = Uuid::new_v4();
        let periods = [
            (date(2026, 1, 1), Some(date(2026, 1, 31))),
            (date(2026, 1, 20), Some(date(2026, 2, 5))),
            (date(2026, 2, 10), Some(date(2026, 2, 20))),
            (date(2026, 2, 25), Some(date(2026, 3, 10))),
            (date(2026, 1, 1), Some(date(2026, 3, 31))),
            (date(2026, 3, 1), Some(date(2026, 3, 31))),
            (date(2026, 1, 15), None),
            (date(2026, 3, 5), None),
        ];
        for (start, end) in periods {
            let a = ProjectAssignment::from_parts(
                project_id,
                Uuid::new_v4(),
                Some(AssignmentRole::Dev),
                Period::new(start, end),
            );
            store.save_assignment(&a).await.unwrap();
        }

        let feb = MonthRange::containing(date(2026, 2, 1));
        let global = store.find_active_assignments(feb.start, feb.end).await.unwrap();
        let scoped = store
            .find_active_assignments_by_project_id(project_id, feb.start, feb.end)
            .await
            .unwrap();
        let other = store
            .find_active_assignments_by_project_id(Uuid::new_v4(), feb.start, feb.end)
            .await
            .unwrap();

        assert_eq!(global.len(), 5);
        assert_eq!(scoped.len(), 5);
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn compensation_follows_the_salary_in_force() {
        let store = InMemoryStore::new();
        let employee_id = Uuid::new_v4();
        store.insert_employee(employee_id, EmployeeType::FullTime).unwrap();

        let mut first =
            SalaryRecord::start_with(employee_id, Money::wons(dec!(48_000_000)).unwrap(), date(2025, 1, 1));
        first.close(date(2025, 12, 31));
        store.insert_salary(first).unwrap();
        store
            .insert_salary(SalaryRecord::start_with(
                employee_id,
                Money::wons(dec!(60_000_000)).unwrap(),
                date(2026, 1, 1),
            ))
            .unwrap();

        let old = store.find_compensation(employee_id, date(2025, 6, 1)).await.unwrap().unwrap();
        let new = store.find_compensation(employee_id, date(2026, 6, 1)).await.unwrap().unwrap();
        let before = store.find_compensation(employee_id, date(2024, 6, 1)).await.unwrap();

        assert_eq!(old.annual_salary.amount(), dec!(48_000_000));
        assert_eq!(new.annual_salary.amount(), dec!(60_000_000));
        assert!(before.is_none());
    }

    #[tokio::test]
    async fn remove_stale_only_touches_the_given_month() {
        let store = InMemoryStore::new();
        let keep = Uuid::new_v4();
        let gone = Uuid::new_v4();
        for project_id in [keep, gone] {
            for month in [date(2026, 1, 1), date(2026, 2, 1)] {
                let s = MonthlyRevenueSummary::create(project_id, month, Money::zero(), Money::zero());
                store.upsert_summary(&s).await.unwrap();
            }
        }

        let removed = store.remove_stale(date(2026, 2, 1), &[keep]).await.unwrap();

        assert_eq!(removed, 1);
        assert_eq!(store.find_by_month(date(2026, 2, 1)).await.unwrap().len(), 1);
        assert_eq!(store.find_by_month(date(2026, 1, 1)).await.unwrap().len(), 2);
    }
}
