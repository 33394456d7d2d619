// src/models/assignment.rs

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{MonthRange, Period, Project};
use crate::errors::DomainError;

// ─── Role ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "assignment_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    Dev,
    Pm,
    Pl,
    Etc,
}

impl AssignmentRole {
    pub const ALL: [AssignmentRole; 4] = [
        AssignmentRole::Dev,
        AssignmentRole::Pm,
        AssignmentRole::Pl,
        AssignmentRole::Etc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            AssignmentRole::Dev => "dev",
            AssignmentRole::Pm => "pm",
            AssignmentRole::Pl => "pl",
            AssignmentRole::Etc => "etc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssignmentRole::Dev => "Developer",
            AssignmentRole::Pm => "Project Manager",
            AssignmentRole::Pl => "Project Leader",
            AssignmentRole::Etc => "Other",
        }
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for AssignmentRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        AssignmentRole::ALL
            .into_iter()
            .find(|r| r.code().eq_ignore_ascii_case(normalized) || r.label() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "assignment role",
                value: s.to_string(),
            })
    }
}

// ─── Assignment ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AssignProjectRequest {
    pub employee_id: Uuid,
    pub role: Option<AssignmentRole>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// One employee staffed on one project over a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectAssignment {
    pub project_id: Uuid,
    pub employee_id: Uuid,
    pub role: Option<AssignmentRole>,
    pub period: Period,
}

impl ProjectAssignment {
    /// Create an assignment that must fit inside the project's period.
    pub fn assign(project: &Project, request: AssignProjectRequest) -> Result<Self, DomainError> {
        if request.start_date < project.period.start_date {
            return Err(DomainError::InvalidAssignmentPeriod(
                "assignment start cannot precede project start".to_string(),
            ));
        }
        if let Some(project_end) = project.period.end_date {
            match request.end_date {
                Some(end) if end <= project_end => {}
                _ => {
                    return Err(DomainError::InvalidAssignmentPeriod(
                        "assignment end cannot exceed project end, and an end date is required \
                         when the project itself has one"
                            .to_string(),
                    ));
                }
            }
        }
        if request.end_date.is_some_and(|end| end < request.start_date) {
            return Err(DomainError::InvalidAssignmentPeriod(
                "assignment end cannot precede its start".to_string(),
            ));
        }

        Ok(Self {
            project_id: project.id,
            employee_id: request.employee_id,
            role: request.role,
            period: Period::new(request.start_date, request.end_date),
        })
    }

    /// Rebuild an assignment from stored fields without the project checks.
    pub fn from_parts(
        project_id: Uuid,
        employee_id: Uuid,
        role: Option<AssignmentRole>,
        period: Period,
    ) -> Self {
        Self {
            project_id,
            employee_id,
            role,
            period,
        }
    }

    /// Days of `month` covered by this assignment, or `None` when they don't meet.
    pub fn active_range_in(&self, month: MonthRange) -> Option<(NaiveDate, NaiveDate)> {
        let real_start = self.period.start_date.max(month.start);
        let real_end = self.period.end_date.unwrap_or(NaiveDate::MAX).min(month.end);
        (real_start <= real_end).then_some((real_start, real_end))
    }

    /// Share of `target_date`'s month this assignment covers, to one decimal place.
    ///
    /// A full month is 1.0; no overlap is 0, never an error.
    pub fn calculate_man_month(&self, target_date: NaiveDate) -> Decimal {
        let month = MonthRange::containing(target_date);
        let Some((real_start, real_end)) = self.active_range_in(month) else {
            return Decimal::ZERO;
        };

        let worked_days = (real_end - real_start).num_days() + 1;
        (Decimal::from(worked_days) / Decimal::from(month.days()))
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }
}
