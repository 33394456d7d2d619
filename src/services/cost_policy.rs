// src/services/cost_policy.rs

use std::sync::Arc;
use tracing::info;

use crate::{
    errors::{AppResult, DomainError},
    models::{EmployeeCostPolicy, EmployeeType, SetCostPolicyRequest},
    repositories::{EmployeeCostPolicyRepository, EmployeeCostPolicyWriter},
};

pub struct CostPolicyService {
    policies: Arc<dyn EmployeeCostPolicyRepository>,
    writer: Arc<dyn EmployeeCostPolicyWriter>,
}

impl CostPolicyService {
    pub fn new(
        policies: Arc<dyn EmployeeCostPolicyRepository>,
        writer: Arc<dyn EmployeeCostPolicyWriter>,
    ) -> Self {
        Self { policies, writer }
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: EmployeeCostPolicyRepository + EmployeeCostPolicyWriter + 'static,
    {
        Self::new(store.clone(), store)
    }

    /// Create or replace the policy for `(apply_year, employee_type)`.
    pub async fn set_policy(&self, request: SetCostPolicyRequest) -> AppResult<EmployeeCostPolicy> {
        let policy = EmployeeCostPolicy::try_from(request)?;
        let saved = self.writer.save_policy(&policy).await?;
        info!(
            "Cost policy for {} / {} set to overhead {} and SG&A {}",
            saved.apply_year, saved.employee_type, saved.overhead_rate, saved.sga_rate
        );
        Ok(saved)
    }

    pub async fn get_policy(
        &self,
        apply_year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<EmployeeCostPolicy> {
        Ok(self
            .policies
            .find_by_apply_year_and_type(apply_year, employee_type)
            .await?
            .ok_or(DomainError::CostPolicyNotFound {
                year: apply_year,
                employee_type,
            })?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::repositories::InMemoryStore;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn set_replaces_the_yearly_policy() {
        let service = CostPolicyService::from_store(Arc::new(InMemoryStore::new()));
        for overhead in [dec!(0.1), dec!(0.25)] {
            service
                .set_policy(SetCostPolicyRequest {
                    apply_year: 2026,
                    employee_type: EmployeeType::Outsourcing,
                    overhead_rate: overhead,
                    sga_rate: dec!(0.05),
                })
                .await
                .unwrap();
        }

        let policy = service.get_policy(2026, EmployeeType::Outsourcing).await.unwrap();
        assert_eq!(policy.overhead_rate, dec!(0.25));
        assert!(service.get_policy(2027, EmployeeType::Outsourcing).await.is_err());
    }

    #[tokio::test]
    async fn out_of_range_rate_is_rejected() {
        let service = CostPolicyService::from_store(Arc::new(InMemoryStore::new()));
        let err = service
            .set_policy(SetCostPolicyRequest {
                apply_year: 2026,
                employee_type: EmployeeType::FullTime,
                overhead_rate: dec!(1.2),
                sga_rate: dec!(0.1),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidPolicyRate { name: "overhead_rate", .. })
        ));
    }
}
