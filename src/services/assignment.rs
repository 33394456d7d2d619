// src/services/assignment.rs

use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::{
    errors::{AppResult, DomainError},
    models::{AssignProjectRequest, MonthRange, ProjectAssignment},
    repositories::{ProjectAssignmentRepository, ProjectAssignmentWriter, ProjectRepository},
};

pub struct ProjectAssignmentService {
    projects: Arc<dyn ProjectRepository>,
    assignments: Arc<dyn ProjectAssignmentRepository>,
    writer: Arc<dyn ProjectAssignmentWriter>,
}

impl ProjectAssignmentService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        assignments: Arc<dyn ProjectAssignmentRepository>,
        writer: Arc<dyn ProjectAssignmentWriter>,
    ) -> Self {
        Self {
            projects,
            assignments,
            writer,
        }
    }

    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ProjectRepository + ProjectAssignmentRepository + ProjectAssignmentWriter + 'static,
    {
        Self::new(store.clone(), store.clone(), store)
    }

    /// Assign an employee to a project.
    ///
    /// The request must sit inside the project's period, and the employee may
    /// not already hold an overlapping assignment on the same project.
    pub async fn assign(
        &self,
        project_id: Uuid,
        request: AssignProjectRequest,
    ) -> AppResult<ProjectAssignment> {
        let project = self
            .projects
            .find_project(project_id)
            .await?
            .ok_or(DomainError::ProjectNotFound(project_id))?;

        let assignment = ProjectAssignment::assign(&project, request)?;

        let overlapping = self
            .assignments
            .find_overlapping_assignments(
                project_id,
                assignment.period.start_date,
                assignment.period.end_date,
            )
            .await?;
        if overlapping
            .iter()
            .any(|a| a.employee_id == assignment.employee_id)
        {
            return Err(DomainError::AssignmentConflict {
                project_id,
                employee_id: assignment.employee_id,
            }
            .into());
        }

        self.writer.save_assignment(&assignment).await?;
        info!(
            "Assigned employee {} to project {} from {}",
            assignment.employee_id, project.code, assignment.period.start_date
        );
        Ok(assignment)
    }

    /// Every assignment overlapping the month containing `target_month`.
    pub async fn active_assignments(&self, target_month: NaiveDate) -> AppResult<Vec<ProjectAssignment>> {
        let month = MonthRange::containing(target_month);
        self.assignments
            .find_active_assignments(month.start, month.end)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::{AssignmentRole, Period, Project};
    use crate::repositories::InMemoryStore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup() -> (ProjectAssignmentService, Uuid) {
        let store = Arc::new(InMemoryStore::new());
        let project_id = Uuid::new_v4();
        store
            .insert_project(Project::new(
                project_id,
                "PRJ-001",
                "Billing revamp",
                Period::new(date(2026, 1, 1), Some(date(2026, 12, 31))),
            ))
            .unwrap();
        (ProjectAssignmentService::from_store(store), project_id)
    }

    fn request(employee_id: Uuid, start: NaiveDate, end: Option<NaiveDate>) -> AssignProjectRequest {
        AssignProjectRequest {
            employee_id,
            role: Some(AssignmentRole::Pm),
            start_date: start,
            end_date: end,
        }
    }

    #[tokio::test]
    async fn assigns_and_lists_by_month() {
        let (service, project_id) = setup();
        let employee_id = Uuid::new_v4();

        service
            .assign(project_id, request(employee_id, date(2026, 3, 10), Some(date(2026, 4, 30))))
            .await
            .unwrap();

        assert_eq!(service.active_assignments(date(2026, 4, 1)).await.unwrap().len(), 1);
        assert!(service.active_assignments(date(2026, 5, 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_project() {
        let (service, _) = setup();
        let missing = Uuid::new_v4();
        let err = service
            .assign(missing, request(Uuid::new_v4(), date(2026, 3, 1), Some(date(2026, 3, 31))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Domain(DomainError::ProjectNotFound(id)) if id == missing));
    }

    #[tokio::test]
    async fn rejects_period_outside_the_project() {
        let (service, project_id) = setup();
        let err = service
            .assign(project_id, request(Uuid::new_v4(), date(2026, 3, 1), None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidAssignmentPeriod(_))
        ));
    }

    #[tokio::test]
    async fn rejects_an_inverted_period_without_saving() {
        let (service, project_id) = setup();
        let err = service
            .assign(project_id, request(Uuid::new_v4(), date(2026, 3, 10), Some(date(2026, 3, 1))))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::InvalidAssignmentPeriod(_))
        ));
        assert!(service.active_assignments(date(2026, 3, 1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_overlap_for_the_same_employee_only() {
        let (service, project_id) = setup();
        let employee_id = Uuid::new_v4();
        service
            .assign(project_id, request(employee_id, date(2026, 2, 1), Some(date(2026, 2, 28))))
            .await
            .unwrap();

        let err = service
            .assign(project_id, request(employee_id, date(2026, 2, 28), Some(date(2026, 3, 31))))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Domain(DomainError::AssignmentConflict { .. })
        ));

        service
            .assign(project_id, request(employee_id, date(2026, 3, 1), Some(date(2026, 3, 31))))
            .await
            .unwrap();
        service
            .assign(project_id, request(Uuid::new_v4(), date(2026, 2, 1), Some(date(2026, 2, 28))))
            .await
            .unwrap();
    }
}
