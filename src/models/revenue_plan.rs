// src/models/revenue_plan.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Money;
use crate::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "revenue_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RevenueType {
    DownPayment,
    IntermediatePayment,
    BalancePayment,
    Maintenance,
    Etc,
}

impl RevenueType {
    pub const ALL: [RevenueType; 5] = [
        RevenueType::DownPayment,
        RevenueType::IntermediatePayment,
        RevenueType::BalancePayment,
        RevenueType::Maintenance,
        RevenueType::Etc,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            RevenueType::DownPayment => "down_payment",
            RevenueType::IntermediatePayment => "intermediate_payment",
            RevenueType::BalancePayment => "balance_payment",
            RevenueType::Maintenance => "maintenance",
            RevenueType::Etc => "etc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RevenueType::DownPayment => "Down payment",
            RevenueType::IntermediatePayment => "Intermediate payment",
            RevenueType::BalancePayment => "Balance payment",
            RevenueType::Maintenance => "Maintenance",
            RevenueType::Etc => "Other",
        }
    }
}

impl fmt::Display for RevenueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for RevenueType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim();
        RevenueType::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(normalized) || t.label() == normalized)
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "revenue type",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRevenuePlanRequest {
    pub sequence: i32,
    pub revenue_date: NaiveDate,
    pub revenue_type: RevenueType,
    pub amount: Money,
    pub memo: Option<String>,
}

/// A scheduled revenue milestone. Only issued plans count as revenue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectRevenuePlan {
    pub project_id: Uuid,
    /// Unique per project
    pub sequence: i32,
    pub revenue_date: NaiveDate,
    pub revenue_type: RevenueType,
    pub amount: Money,
    pub memo: Option<String>,
    pub issued: bool,
}

impl ProjectRevenuePlan {
    pub fn create(project_id: Uuid, request: CreateRevenuePlanRequest) -> Self {
        Self {
            project_id,
            sequence: request.sequence,
            revenue_date: request.revenue_date,
            revenue_type: request.revenue_type,
            amount: request.amount,
            memo: request.memo,
            issued: false,
        }
    }

    /// Marks the plan issued. Issuing twice leaves it issued.
    pub fn issue(&mut self) {
        self.issued = true;
    }

    pub fn is_issued(&self) -> bool {
        self.issued
    }
}
