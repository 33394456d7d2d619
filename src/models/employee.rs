// src/models/employee.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{Money, Period};
use crate::errors::DomainError;

// sqlx 0.8: custom Postgres enums need #[sqlx(type_name = "...")] on the enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "employee_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EmployeeType {
    FullTime,
    PartTime,
    Freelancer,
    Outsourcing,
}

impl EmployeeType {
    pub const ALL: [EmployeeType; 4] = [
        EmployeeType::FullTime,
        EmployeeType::PartTime,
        EmployeeType::Freelancer,
        EmployeeType::Outsourcing,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            EmployeeType::FullTime => "full_time",
            EmployeeType::PartTime => "part_time",
            EmployeeType::Freelancer => "freelancer",
            EmployeeType::Outsourcing => "outsourcing",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EmployeeType::FullTime => "Full-time",
            EmployeeType::PartTime => "Part-time",
            EmployeeType::Freelancer => "Freelancer",
            EmployeeType::Outsourcing => "Outsourcing",
        }
    }
}

impl fmt::Display for EmployeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for EmployeeType {
    type Err = DomainError;

    /// Accepts the code in any case or the display label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        EmployeeType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(normalized) || t.label() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "employee type",
                value: s.to_string(),
            })
    }
}

// ─── Salary ───────────────────────────────────────────────────────────────────

/// Annual salary valid over a period. A raise closes the current record and
/// opens a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalaryRecord {
    pub employee_id: Uuid,
    pub annual_salary: Money,
    pub period: Period,
}

impl SalaryRecord {
    pub fn start_with(employee_id: Uuid, annual_salary: Money, start_date: NaiveDate) -> Self {
        Self {
            employee_id,
            annual_salary,
            period: Period::open(start_date),
        }
    }

    pub fn close(&mut self, end_date: NaiveDate) {
        self.period = Period::new(self.period.start_date, Some(end_date));
    }
}

/// What the cost calculation needs to know about an employee on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeCompensation {
    pub employee_id: Uuid,
    pub employee_type: EmployeeType,
    pub annual_salary: Money,
}
