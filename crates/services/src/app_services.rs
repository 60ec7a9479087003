use std::sync::Arc;

use course_core::model::{BadgeCatalog, Curriculum};
use storage::repository::Storage;

use crate::Clock;
use crate::error::AppServicesError;
use crate::lesson_service::LessonService;
use crate::progress_service::ProgressService;
use crate::project_service::ProjectService;
use crate::quiz_service::QuizService;
use crate::review_service::{AdminGate, ReviewService};

/// Names and secrets the services need from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSettings {
    pub user_name: String,
    pub reviewer: String,
    pub admin_password: String,
}

/// Assembles app-facing services over one storage backend.
#[derive(Clone)]
pub struct AppServices {
    admin_gate: Arc<AdminGate>,
    lessons: Arc<LessonService>,
    quizzes: Arc<QuizService>,
    reviews: Arc<ReviewService>,
    projects: Arc<ProjectService>,
    progress: Arc<ProgressService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        curriculum: Curriculum,
        settings: CourseSettings,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Ok(Self::with_storage(storage, clock, curriculum, settings))
    }

    /// Build services over an existing storage handle.
    #[must_use]
    pub fn with_storage(
        storage: Storage,
        clock: Clock,
        curriculum: Curriculum,
        settings: CourseSettings,
    ) -> Self {
        let curriculum = Arc::new(curriculum);
        let catalog = Arc::new(BadgeCatalog::builtin());

        let lessons = Arc::new(LessonService::new(
            Arc::clone(&curriculum),
            storage.clone(),
        ));
        let quizzes = Arc::new(QuizService::new(
            clock,
            Arc::clone(&curriculum),
            storage.clone(),
            settings.user_name.clone(),
        ));
        let reviews = Arc::new(ReviewService::new(
            clock,
            Arc::clone(&curriculum),
            storage.clone(),
            settings.reviewer,
        ));
        let projects = Arc::new(ProjectService::new(clock, storage.clone()));
        let progress = Arc::new(ProgressService::new(
            curriculum,
            catalog,
            storage,
            settings.user_name,
        ));

        Self {
            admin_gate: Arc::new(AdminGate::new(settings.admin_password)),
            lessons,
            quizzes,
            reviews,
            projects,
            progress,
        }
    }

    #[must_use]
    pub fn admin_gate(&self) -> Arc<AdminGate> {
        Arc::clone(&self.admin_gate)
    }

    #[must_use]
    pub fn lessons(&self) -> Arc<LessonService> {
        Arc::clone(&self.lessons)
    }

    #[must_use]
    pub fn quizzes(&self) -> Arc<QuizService> {
        Arc::clone(&self.quizzes)
    }

    #[must_use]
    pub fn reviews(&self) -> Arc<ReviewService> {
        Arc::clone(&self.reviews)
    }

    #[must_use]
    pub fn projects(&self) -> Arc<ProjectService> {
        Arc::clone(&self.projects)
    }

    #[must_use]
    pub fn progress(&self) -> Arc<ProgressService> {
        Arc::clone(&self.progress)
    }
}
