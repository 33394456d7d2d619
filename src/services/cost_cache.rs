// src/services/cost_cache.rs

use std::collections::HashMap;
use tracing::debug;

use crate::{
    errors::{AppResult, DomainError},
    models::{EmployeeCostPolicy, EmployeeType},
    repositories::EmployeeCostPolicyRepository,
};

/// Cost policies already fetched during a run, keyed by `(year, employee type)`.
///
/// The caller owns the cache and decides how long it lives; a fresh cache per
/// monthly run is the default.
#[derive(Debug, Default)]
pub struct CostPolicyCache {
    entries: HashMap<(i32, EmployeeType), EmployeeCostPolicy>,
}

impl CostPolicyCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached policy, loaded on first use. A missing policy is an error,
    /// never a zero cost.
    pub async fn get_or_load(
        &mut self,
        repository: &dyn EmployeeCostPolicyRepository,
        year: i32,
        employee_type: EmployeeType,
    ) -> AppResult<EmployeeCostPolicy> {
        if let Some(policy) = self.entries.get(&(year, employee_type)) {
            return Ok(policy.clone());
        }

        debug!("Cost policy cache miss for {} / {}", year, employee_type);
        let policy = repository
            .find_by_apply_year_and_type(year, employee_type)
            .await?
            .ok_or(DomainError::CostPolicyNotFound {
                year,
                employee_type,
            })?;
        self.entries.insert((year, employee_type), policy.clone());
        Ok(policy)
    }

    pub fn invalidate(&mut self, year: i32, employee_type: EmployeeType) {
        self.entries.remove(&(year, employee_type));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::repositories::{EmployeeCostPolicyWriter, InMemoryStore};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn caches_and_invalidates_by_key() {
        let store = InMemoryStore::new();
        let policy =
            EmployeeCostPolicy::create(2026, EmployeeType::FullTime, dec!(0.1), dec!(0.05)).unwrap();
        store.save_policy(&policy).await.unwrap();

        let mut cache = CostPolicyCache::new();
        let loaded = cache.get_or_load(&store, 2026, EmployeeType::FullTime).await.unwrap();
        assert_eq!(loaded, policy);
        assert_eq!(cache.len(), 1);

        let updated =
            EmployeeCostPolicy::create(2026, EmployeeType::FullTime, dec!(0.2), dec!(0.05)).unwrap();
        store.save_policy(&updated).await.unwrap();
        let stale = cache.get_or_load(&store, 2026, EmployeeType::FullTime).await.unwrap();
        assert_eq!(stale.overhead_rate, dec!(0.1));

        cache.invalidate(2026, EmployeeType::FullTime);
        assert!(cache.is_empty());
        let fresh = cache.get_or_load(&store, 2026, EmployeeType::FullTime).await.unwrap();
        assert_eq!(fresh.overhead_rate, dec!(0.2));
    }

    #[tokio::test]
    async fn missing_policy_fails_loudly() {
        let store = InMemoryStore::new();
        let mut cache = CostPolicyCache::new();
        let err = cache
            .get_or_load(&store, 2026, EmployeeType::Freelancer)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::CostPolicyNotFound { year: 2026, .. })
        ));
        cache.clear();
    }
}
