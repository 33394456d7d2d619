use chrono::NaiveDate;
use rust_decimal_macros::dec;
use std::sync::Arc;
use uuid::Uuid;

use project_revenue_engine::{
    models::{
        AssignProjectRequest, AssignmentRole, CreateRevenuePlanRequest, EmployeeType, Money,
        Period, Project, RevenueType, SalaryRecord, SetCostPolicyRequest,
    },
    repositories::{InMemoryStore, MonthlyRevenueSummaryRepository},
    services::{
        CostPolicyCache, CostPolicyService, MonthlyRevenueSummaryManager,
        MonthlyRevenueSummaryService, ProjectAssignmentService, RevenuePlanService,
    },
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

struct Engine {
    store: Arc<InMemoryStore>,
    assignments: ProjectAssignmentService,
    plans: RevenuePlanService,
    policies: CostPolicyService,
    summaries: MonthlyRevenueSummaryService,
}

impl Engine {
    fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            assignments: ProjectAssignmentService::from_store(store.clone()),
            plans: RevenuePlanService::from_store(store.clone()),
            policies: CostPolicyService::from_store(store.clone()),
            summaries: MonthlyRevenueSummaryService::from_store(store.clone()),
            store,
        }
    }

    fn project(&self, code: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.store
            .insert_project(Project::new(id, code, code, Period::open(date(2025, 1, 1))))
            .unwrap();
        id
    }

    fn employee(&self, employee_type: EmployeeType, annual: Money) -> Uuid {
        let id = Uuid::new_v4();
        self.store.insert_employee(id, employee_type).unwrap();
        self.store
            .insert_salary(SalaryRecord::start_with(id, annual, date(2025, 1, 1)))
            .unwrap();
        id
    }
}

#[tokio::test]
async fn january_run_end_to_end() {
    let engine = Engine::new();
    engine
        .policies
        .set_policy(SetCostPolicyRequest {
            apply_year: 2026,
            employee_type: EmployeeType::FullTime,
            overhead_rate: dec!(0),
            sga_rate: dec!(0),
        })
        .await
        .unwrap();

    let project_id = engine.project("PRJ-100");
    let employee_id = engine.employee(EmployeeType::FullTime, Money::wons(dec!(12_000_000)).unwrap());
    engine
        .assignments
        .assign(
            project_id,
            AssignProjectRequest {
                employee_id,
                role: Some(AssignmentRole::Dev),
                start_date: date(2026, 1, 1),
                end_date: None,
            },
        )
        .await
        .unwrap();
    engine
        .plans
        .create(
            project_id,
            CreateRevenuePlanRequest {
                sequence: 1,
                revenue_date: date(2026, 1, 15),
                revenue_type: RevenueType::DownPayment,
                amount: Money::wons(dec!(5_000_000)).unwrap(),
                memo: None,
            },
        )
        .await
        .unwrap();

    // not issued yet
    let before = engine.summaries.calculate_monthly_summary(date(2026, 1, 20)).await.unwrap();
    assert_eq!(before.summaries[0].revenue_amount, Money::zero());
    assert_eq!(before.summaries[0].profit_amount.amount(), dec!(-1_000_000));

    engine.plans.issue(project_id, 1).await.unwrap();
    let report = engine.summaries.calculate_monthly_summary(date(2026, 1, 20)).await.unwrap();

    assert!(report.failures.is_empty());
    let row = &report.summaries[0];
    assert_eq!(row.summary_month, date(2026, 1, 1));
    assert_eq!(row.revenue_amount.amount(), dec!(5_000_000));
    assert_eq!(row.cost_amount.amount(), dec!(1_000_000));
    assert_eq!(row.profit_amount.amount(), dec!(4_000_000));

    let stored = engine.store.find_by_month(date(2026, 1, 1)).await.unwrap();
    assert_eq!(stored, report.summaries);

    // February: the assignment is still open, the plan is not in the month
    let february = engine.summaries.calculate_monthly_summary(date(2026, 2, 1)).await.unwrap();
    assert_eq!(february.summaries[0].revenue_amount, Money::zero());
    assert_eq!(february.summaries[0].cost_amount.amount(), dec!(1_000_000));
}

#[tokio::test]
async fn reruns_are_idempotent_and_share_a_cache() {
    let engine = Engine::new();
    for employee_type in [EmployeeType::FullTime, EmployeeType::Outsourcing] {
        engine
            .policies
            .set_policy(SetCostPolicyRequest {
                apply_year: 2026,
                employee_type,
                overhead_rate: dec!(0.15),
                sga_rate: dec!(0.1),
            })
            .await
            .unwrap();
    }

    let alpha = engine.project("PRJ-A");
    let beta = engine.project("PRJ-B");
    let staff = engine.employee(EmployeeType::FullTime, Money::wons(dec!(54_000_000)).unwrap());
    let vendor = engine.employee(EmployeeType::Outsourcing, Money::wons(dec!(72_000_000)).unwrap());
    for (project_id, employee_id, start, end) in [
        (alpha, staff, date(2026, 3, 1), Some(date(2026, 3, 20))),
        (beta, staff, date(2026, 3, 21), None),
        (beta, vendor, date(2026, 3, 10), Some(date(2026, 6, 30))),
    ] {
        engine
            .assignments
            .assign(
                project_id,
                AssignProjectRequest {
                    employee_id,
                    role: None,
                    start_date: start,
                    end_date: end,
                },
            )
            .await
            .unwrap();
    }

    let mut cache = CostPolicyCache::new();
    let first = engine
        .summaries
        .calculate_monthly_summary_with_cache(date(2026, 3, 1), &mut cache)
        .await
        .unwrap();
    let second = engine
        .summaries
        .calculate_monthly_summary_with_cache(date(2026, 3, 31), &mut cache)
        .await
        .unwrap();

    assert_eq!(cache.len(), 2);
    assert_eq!(first, second);
    assert_eq!(engine.store.find_by_month(date(2026, 3, 1)).await.unwrap().len(), 2);

    let total = engine.summaries.calculate_total_cost(date(2026, 3, 15)).await.unwrap();
    let summed = first
        .summaries
        .iter()
        .try_fold(Money::zero(), |sum, s| sum.add(s.cost_amount))
        .unwrap();
    assert_eq!(total, summed);
}
