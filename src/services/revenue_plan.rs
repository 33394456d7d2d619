// src/services/revenue_plan.rs

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{AppResult, DomainError},
    models::{CreateRevenuePlanRequest, ProjectRevenuePlan},
    repositories::{ProjectRepository, ProjectRevenuePlanRepository, ProjectRevenuePlanWriter},
};

pub struct RevenuePlanService {
    projects: Arc<dyn ProjectRepository>,
    plans: Arc<dyn ProjectRevenuePlanRepository>,
    writer: Arc<dyn ProjectRevenuePlanWriter>,
}

impl RevenuePlanService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        plans: Arc<dyn ProjectRevenuePlanRepository>,
        writer: Arc<dyn ProjectRevenuePlanWriter>,
    ) -> Self {
        Self {
            projects,
            plans,
            writer,
        }
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProjectRepository + ProjectRevenuePlanRepository + ProjectRevenuePlanWriter + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// New unissued plan. `(project_id, sequence)` must be unused.
    pub async fn create(
        &self,
        project_id: Uuid,
        request: CreateRevenuePlanRequest,
    ) -> AppResult<ProjectRevenuePlan> {
        if self.projects.find_project(project_id).await?.is_none() {
            return Err(DomainError::ProjectNotFound(project_id).into());
        }
        if self
            .plans
            .find_plan(project_id, request.sequence)
            .await?
            .is_some()
        {
            return Err(DomainError::DuplicateRevenuePlan {
                project_id,
                sequence: request.sequence,
            }
            .into());
        }

        let plan = ProjectRevenuePlan::create(project_id, request);
        self.writer.save_plan(&plan).await?;
        info!(
            "Created revenue plan #{} for project {} ({} on {})",
            plan.sequence, project_id, plan.amount, plan.revenue_date
        );
        Ok(plan)
    }

    /// Mark a plan issued. Issuing twice leaves the plan as it is.
    pub async fn issue(&self, project_id: Uuid, sequence: i32) -> AppResult<ProjectRevenuePlan> {
        let mut plan = self
            .plans
            .find_plan(project_id, sequence)
            .await?
            .ok_or(DomainError::RevenuePlanNotFound {
                project_id,
                sequence,
            })?;

        if plan.is_issued() {
            debug!(
                "Revenue plan #{} of project {} already issued",
                sequence, project_id
            );
            return Ok(plan);
        }

        plan.issue();
        self.writer.save_plan(&plan).await?;
        info!("Issued revenue plan #{} for project {}", sequence, project_id);
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::{Money, Period, Project, RevenueType};
    use crate::repositories::InMemoryStore;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn setup() -> (RevenuePlanService, Arc<InMemoryStore>, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let project_id = Uuid::new_v4();
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        store
            .insert_project(Project::new(project_id, "PRJ-002", "Data platform", Period::open(start)))
            .unwrap();
        (RevenuePlanService::from_store(store.clone()), store, project_id)
    }

    fn request(sequence: i32) -> CreateRevenuePlanRequest {
        CreateRevenuePlanRequest {
            sequence,
            revenue_date: NaiveDate::from_ymd_opt(2026, 2, 10).unwrap(),
            revenue_type: RevenueType::DownPayment,
            amount: Money::wons(dec!(3_000_000)).unwrap(),
            memo: Some("30% on signing".to_string()),
        }
    }

    #[tokio::test]
    async fn create_then_issue() {
        let (service, store, project_id) = setup();

        let created = service.create(project_id, request(1)).await.unwrap();
        assert!(!created.is_issued());

        let issued = service.issue(project_id, 1).await.unwrap();
        assert!(issued.is_issued());
        let again = service.issue(project_id, 1).await.unwrap();
        assert_eq!(again, issued);

        let stored = store.find_plan(project_id, 1).await.unwrap().unwrap();
        assert!(stored.is_issued());
    }

    #[tokio::test]
    async fn duplicate_sequence_is_rejected() {
        let (service, _, project_id) = setup();
        service.create(project_id, request(1)).await.unwrap();

        let err = service.create(project_id, request(1)).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::DuplicateRevenuePlan { sequence: 1, .. })
        ));
    }

    #[tokio::test]
    async fn issuing_a_missing_plan_fails() {
        let (service, _, project_id) = setup();
        let err = service.issue(project_id, 7).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::RevenuePlanNotFound { sequence: 7, .. })
        ));
    }
}
