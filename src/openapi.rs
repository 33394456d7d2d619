// src/openapi.rs

use crate::models::{
    AssignProjectRequest, AssignmentRole, CompanyMonthlySummary, CreateRevenuePlanRequest,
    EmployeeCostPolicy, EmployeeType, Money, MonthlyRevenueSummary, MonthlySummaryReport, Period,
    ProjectAssignment, ProjectFailure, ProjectRevenuePlan, RevenueType, RunSummaryRequest,
    SetCostPolicyRequest, SignedMoney,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Project Revenue Engine API",
        version = "1.0.0",
        description = "Monthly revenue, staffing cost and profit aggregation per project. \
            Costs are prorated by man-month from employee salaries and yearly overhead/SG&A \
            policies; revenue comes from issued installments of each project's revenue plan.",
        license(name = "MIT")
    ),
    paths(
        // Summaries
        crate::handlers::summary::run_monthly_summary,
        crate::handlers::summary::list_monthly_summaries,
        crate::handlers::summary::get_company_summary,
        // Assignments
        crate::handlers::assignment::assign_employee,
        crate::handlers::assignment::list_active_assignments,
        // Revenue plans
        crate::handlers::revenue_plan::create_revenue_plan,
        crate::handlers::revenue_plan::issue_revenue_plan,
        // Cost policies
        crate::handlers::cost_policy::set_cost_policy,
        crate::handlers::cost_policy::get_cost_policy,
    ),
    components(
        schemas(
            Money, SignedMoney, Period,
            RunSummaryRequest, MonthlySummaryReport, MonthlyRevenueSummary, ProjectFailure,
            CompanyMonthlySummary,
            AssignProjectRequest, ProjectAssignment, AssignmentRole,
            CreateRevenuePlanRequest, ProjectRevenuePlan, RevenueType,
            SetCostPolicyRequest, EmployeeCostPolicy, EmployeeType,
        )
    ),
    tags(
        (name = "Summaries", description = "Run and read monthly revenue summaries"),
        (name = "Assignments", description = "Staff projects"),
        (name = "Revenue Plans", description = "Plan and issue project installments"),
        (name = "Cost Policies", description = "Yearly overhead and SG&A rates per employee type"),
    )
)]
pub struct ApiDoc;
