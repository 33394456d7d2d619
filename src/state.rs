use crate::{
    config::Config,
    errors::AppResult,
    repositories::{PgSnapshot, PgStore},
    services::{
        CostPolicyService, MonthlyRevenueSummaryService, ProjectAssignmentService,
        RevenuePlanService,
    },
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<Config>,
    pub store: Arc<PgStore>,
}

impl AppState {
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            store: Arc::new(PgStore::new(db.clone())),
            db,
            config: Arc::new(config),
        }
    }

    /// Aggregation reading through a fresh read-only snapshot and writing
    /// through the pool. Drop the service, then `PgSnapshot::release` the
    /// snapshot.
    pub async fn snapshot_summary_service(
        &self,
    ) -> AppResult<(MonthlyRevenueSummaryService, Arc<PgSnapshot>)> {
        let snapshot = Arc::new(self.store.snapshot().await?);
        let service =
            MonthlyRevenueSummaryService::with_reader(snapshot.clone(), self.store.clone());
        Ok((service, snapshot))
    }

    pub fn assignment_service(&self) -> ProjectAssignmentService {
        ProjectAssignmentService::from_store(Arc::clone(&self.store))
    }

    pub fn revenue_plan_service(&self) -> RevenuePlanService {
        RevenuePlanService::from_store(Arc::clone(&self.store))
    }

    pub fn cost_policy_service(&self) -> CostPolicyService {
        CostPolicyService::from_store(Arc::clone(&self.store))
    }
}
