// src/models/cost_policy.rs

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{EmployeeType, Money};
use crate::errors::DomainError;

const MONTHS_PER_YEAR: Decimal = dec!(12);

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetCostPolicyRequest {
    pub apply_year: i32,
    pub employee_type: EmployeeType,
    /// Overhead as a fraction of monthly salary, e.g. 0.1 means 10%
    pub overhead_rate: Decimal,
    /// SG&A as a fraction of monthly salary, e.g. 0.05 means 5%
    pub sga_rate: Decimal,
}

/// Overhead and SG&A burden applied to salaries of one employee type in one year.
/// Unique per `(apply_year, employee_type)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EmployeeCostPolicy {
    pub apply_year: i32,
    pub employee_type: EmployeeType,
    pub overhead_rate: Decimal,
    pub sga_rate: Decimal,
}

/// Monthly cost of one employee split into its components.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct MonthlyCostBreakdown {
    pub base: Money,
    pub overhead: Money,
    pub sga: Money,
    pub total: Money,
}

fn validate_rate(name: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(DomainError::InvalidPolicyRate { name, value });
    }
    Ok(value)
}

impl EmployeeCostPolicy {
    pub fn create(
        apply_year: i32,
        employee_type: EmployeeType,
        overhead_rate: Decimal,
        sga_rate: Decimal,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            apply_year,
            employee_type,
            overhead_rate: validate_rate("overhead_rate", overhead_rate)?,
            sga_rate: validate_rate("sga_rate", sga_rate)?,
        })
    }

    // The monthly base is rounded before any rate is applied; totals depend on
    // this order.
    fn monthly_base(annual_salary: Money) -> Result<Money, DomainError> {
        annual_salary.divide(MONTHS_PER_YEAR)
    }

    /// Monthly base × (1 + overhead + SG&A).
    pub fn calculate_employee_cost(&self, annual_salary: Money) -> Result<Money, DomainError> {
        Self::monthly_base(annual_salary)?.multiply(Decimal::ONE + self.overhead_rate + self.sga_rate)
    }

    pub fn calculate_overhead_cost(&self, annual_salary: Money) -> Result<Money, DomainError> {
        Self::monthly_base(annual_salary)?.multiply(self.overhead_rate)
    }

    pub fn calculate_sga_cost(&self, annual_salary: Money) -> Result<Money, DomainError> {
        Self::monthly_base(annual_salary)?.multiply(self.sga_rate)
    }

    pub fn monthly_cost_breakdown(
        &self,
        annual_salary: Money,
    ) -> Result<MonthlyCostBreakdown, DomainError> {
        Ok(MonthlyCostBreakdown {
            base: Self::monthly_base(annual_salary)?,
            overhead: self.calculate_overhead_cost(annual_salary)?,
            sga: self.calculate_sga_cost(annual_salary)?,
            total: self.calculate_employee_cost(annual_salary)?,
        })
    }
}

impl TryFrom<SetCostPolicyRequest> for EmployeeCostPolicy {
    type Error = DomainError;

    fn try_from(req: SetCostPolicyRequest) -> Result<Self, Self::Error> {
        EmployeeCostPolicy::create(req.apply_year, req.employee_type, req.overhead_rate, req.sga_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn won(amount: Decimal) -> Money {
        Money::wons(amount).unwrap()
    }

    fn policy(overhead: Decimal, sga: Decimal) -> EmployeeCostPolicy {
        EmployeeCostPolicy::create(2026, EmployeeType::FullTime, overhead, sga).unwrap()
    }

    #[test]
    fn employee_cost_applies_both_rates_to_monthly_base() {
        let p = policy(dec!(0.1), dec!(0.05));
        let cost = p.calculate_employee_cost(won(dec!(12_000_000))).unwrap();
        assert_eq!(cost.amount(), dec!(1_150_000));
    }

    #[test]
    fn monthly_base_is_rounded_before_rates() {
        // 100 / 12 -> 8, 8 * 1.5 = 12; the closed form would round 12.5 up to 13
        let p = policy(dec!(0.3), dec!(0.2));
        assert_eq!(p.calculate_employee_cost(won(dec!(100))).unwrap().amount(), dec!(12));
    }

    #[test]
    fn components_are_computed_stepwise() {
        let p = policy(dec!(0.1), dec!(0.05));
        let breakdown = p.monthly_cost_breakdown(won(dec!(36_000_000))).unwrap();
        assert_eq!(breakdown.base.amount(), dec!(3_000_000));
        assert_eq!(breakdown.overhead.amount(), dec!(300_000));
        assert_eq!(breakdown.sga.amount(), dec!(150_000));
        assert_eq!(breakdown.total.amount(), dec!(3_450_000));
    }

    #[test]
    fn rejects_rates_out_of_bounds() {
        let negative = EmployeeCostPolicy::create(2026, EmployeeType::FullTime, dec!(-0.1), dec!(0.05));
        let too_large = EmployeeCostPolicy::create(2026, EmployeeType::FullTime, dec!(0.1), dec!(1.5));
        assert!(matches!(
            negative,
            Err(DomainError::InvalidPolicyRate { name: "overhead_rate", .. })
        ));
        assert!(matches!(
            too_large,
            Err(DomainError::InvalidPolicyRate { name: "sga_rate", .. })
        ));
    }

    #[test]
    fn zero_rates_cost_the_bare_salary() {
        let p = policy(Decimal::ZERO, Decimal::ZERO);
        assert_eq!(
            p.calculate_employee_cost(won(dec!(60_000_000))).unwrap().amount(),
            dec!(5_000_000)
        );
    }
}
