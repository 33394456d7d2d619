// src/models/mod.rs

mod assignment;
mod cost_policy;
mod employee;
mod money;
mod period;
mod project;
mod revenue_plan;
mod summary;

pub use assignment::{AssignProjectRequest, AssignmentRole, ProjectAssignment};
pub use cost_policy::{EmployeeCostPolicy, MonthlyCostBreakdown, SetCostPolicyRequest};
pub use employee::{EmployeeCompensation, EmployeeType, SalaryRecord};
pub use money::{Money, SignedMoney};
pub use period::{MonthRange, Period};
pub use project::Project;
pub use revenue_plan::{CreateRevenuePlanRequest, ProjectRevenuePlan, RevenueType};
pub use summary::{
    CompanyMonthlySummary, MonthQuery, MonthlyRevenueSummary, MonthlySummaryReport,
    ProjectFailure, RunSummaryRequest,
};
