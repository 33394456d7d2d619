// src/models/summary.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{Money, MonthRange, SignedMoney};

/// Revenue, cost and profit of one project in one month.
///
/// A derived snapshot keyed by `(project_id, summary_month)`; recomputing the
/// month replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyRevenueSummary {
    pub project_id: Uuid,
    /// First day of the summarised month
    pub summary_month: NaiveDate,
    pub revenue_amount: Money,
    pub cost_amount: Money,
    pub profit_amount: SignedMoney,
}

impl MonthlyRevenueSummary {
    pub fn create(project_id: Uuid, target_month: NaiveDate, revenue: Money, cost: Money) -> Self {
        Self {
            project_id,
            summary_month: MonthRange::containing(target_month).start,
            revenue_amount: revenue,
            cost_amount: cost,
            profit_amount: SignedMoney::difference(revenue, cost),
        }
    }
}

/// Company-wide figures for one month.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CompanyMonthlySummary {
    pub summary_month: NaiveDate,
    pub revenue_amount: Money,
    pub cost_amount: Money,
    pub profit_amount: SignedMoney,
    /// Distinct employees with a non-zero man-month
    pub headcount: usize,
    pub man_month: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ProjectFailure {
    pub project_id: Uuid,
    pub reason: String,
}

/// Outcome of a monthly run: the rows written and the projects skipped.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlySummaryReport {
    pub summary_month: NaiveDate,
    pub summaries: Vec<MonthlyRevenueSummary>,
    pub failures: Vec<ProjectFailure>,
    pub removed_stale: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunSummaryRequest {
    /// Any date within the target month
    pub target_month: NaiveDate,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Any date within the month, e.g. 2026-02-01
    pub month: NaiveDate,
}
