use course_core::model::{ProjectReport, ProjectSubmission, project_completed_marker};
use storage::repository::Storage;

use crate::Clock;
use crate::error::ProjectServiceError;

/// Final project submission and its snippet checks.
#[derive(Clone)]
pub struct ProjectService {
    clock: Clock,
    storage: Storage,
}

/// What happened to a submitted project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectOutcome {
    pub submission: ProjectSubmission,
    pub report: ProjectReport,
    /// True when this submission added the completion marker.
    pub newly_completed: bool,
}

impl ProjectService {
    #[must_use]
    pub fn new(clock: Clock, storage: Storage) -> Self {
        Self { clock, storage }
    }

    /// Check the sources without recording anything.
    #[must_use]
    pub fn check(&self, html: &str, css: &str, javascript: &str) -> ProjectReport {
        ProjectSubmission::new(html, css, javascript, self.clock.now()).check()
    }

    /// Record a project submission.
    ///
    /// The checks are informational: the project is stored whatever they
    /// report, and the completion marker is added to the badge list once.
    ///
    /// # Errors
    ///
    /// Returns `ProjectServiceError::Storage` if persistence fails.
    pub async fn submit(
        &self,
        html: &str,
        css: &str,
        javascript: &str,
    ) -> Result<ProjectOutcome, ProjectServiceError> {
        let submission = ProjectSubmission::new(html, css, javascript, self.clock.now());
        let report = submission.check();

        let mut projects = self.storage.project_submissions().await?;
        projects.push(submission.clone());

        let marker = project_completed_marker();
        let mut badges = self.storage.badges().await?;
        let newly_completed = !badges.contains(&marker);
        if newly_completed {
            badges.push(marker);
        }
        self.storage.record_project(&projects, &badges).await?;

        tracing::info!(
            checks_passed = report.passed_count(),
            checks_total = report.checks().len(),
            newly_completed,
            "project submitted"
        );
        Ok(ProjectOutcome {
            submission,
            report,
            newly_completed,
        })
    }

    /// # Errors
    ///
    /// Returns `ProjectServiceError::Storage` if repository access fails.
    pub async fn submissions(&self) -> Result<Vec<ProjectSubmission>, ProjectServiceError> {
        Ok(self.storage.project_submissions().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::time::fixed_clock;

    #[tokio::test]
    async fn incomplete_project_is_still_recorded() {
        let storage = Storage::in_memory();
        let service = ProjectService::new(fixed_clock(), storage.clone());

        let outcome = service.submit("<main></main>", "", "").await.unwrap();
        assert!(!outcome.report.all_present());
        assert!(outcome.newly_completed);
        assert_eq!(service.submissions().await.unwrap().len(), 1);
        assert_eq!(
            storage.badges().await.unwrap(),
            vec![project_completed_marker()]
        );
    }

    #[tokio::test]
    async fn marker_is_added_once() {
        let storage = Storage::in_memory();
        let service = ProjectService::new(fixed_clock(), storage.clone());

        service.submit("", "", "").await.unwrap();
        let second = service.submit("<nav>", "@media", "function").await.unwrap();

        assert!(!second.newly_completed);
        assert_eq!(storage.badges().await.unwrap().len(), 1);
        assert_eq!(service.submissions().await.unwrap().len(), 2);
    }

    #[test]
    fn check_does_not_need_storage() {
        let service = ProjectService::new(fixed_clock(), Storage::in_memory());
        let report = service.check("<header><section><button><nav><main>", "", "");
        assert_eq!(report.passed_count(), 5);
    }
}
