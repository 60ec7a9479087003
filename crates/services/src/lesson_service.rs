use std::sync::Arc;

use course_core::model::{Curriculum, CurriculumError, LessonId};
use course_core::progress::{self, CourseProgress};
use storage::repository::Storage;

use crate::error::LessonServiceError;

/// Records lesson completion and reports lesson progress.
#[derive(Clone)]
pub struct LessonService {
    curriculum: Arc<Curriculum>,
    storage: Storage,
}

impl LessonService {
    #[must_use]
    pub fn new(curriculum: Arc<Curriculum>, storage: Storage) -> Self {
        Self {
            curriculum,
            storage,
        }
    }

    #[must_use]
    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    /// Mark a lesson as completed.
    ///
    /// Returns `true` if the lesson was newly recorded and `false` if it was
    /// already complete.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Id` for a blank id,
    /// `LessonServiceError::Curriculum` for an id the course does not have,
    /// and `LessonServiceError::Storage` if persistence fails.
    pub async fn complete_lesson(&self, lesson_id: &str) -> Result<bool, LessonServiceError> {
        let id = LessonId::new(lesson_id)?;
        if self.curriculum.lesson(&id).is_none() {
            return Err(CurriculumError::UnknownLesson(id.to_string()).into());
        }

        let mut completed = self.storage.completed_lessons().await?;
        if completed.contains(&id) {
            tracing::debug!(lesson = %id, "lesson already completed");
            return Ok(false);
        }

        completed.push(id.clone());
        self.storage.save_completed_lessons(&completed).await?;
        tracing::info!(lesson = %id, total = completed.len(), "lesson completed");
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn completed_lessons(&self) -> Result<Vec<LessonId>, LessonServiceError> {
        Ok(self.storage.completed_lessons().await?)
    }

    /// Overall and per-category completion.
    ///
    /// # Errors
    ///
    /// Returns `LessonServiceError::Storage` if repository access fails.
    pub async fn progress(&self) -> Result<CourseProgress, LessonServiceError> {
        let completed = self.storage.completed_lessons().await?;
        Ok(progress::lesson_progress(&self.curriculum, &completed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::LessonCategory;

    fn service() -> LessonService {
        LessonService::new(Arc::new(Curriculum::builtin()), Storage::in_memory())
    }

    #[tokio::test]
    async fn completing_twice_records_once() {
        let service = service();
        assert!(service.complete_lesson("html-basics").await.unwrap());
        assert!(!service.complete_lesson("html-basics").await.unwrap());
        assert_eq!(service.completed_lessons().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_and_blank_ids_are_rejected() {
        let service = service();
        assert!(matches!(
            service.complete_lesson("rust-basics").await,
            Err(LessonServiceError::Curriculum(CurriculumError::UnknownLesson(_)))
        ));
        assert!(matches!(
            service.complete_lesson("  ").await,
            Err(LessonServiceError::Id(_))
        ));
        assert!(service.completed_lessons().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn progress_counts_per_category() {
        let service = service();
        service.complete_lesson("css-basics").await.unwrap();
        service.complete_lesson("css-flexbox").await.unwrap();

        let progress = service.progress().await.unwrap();
        assert_eq!(progress.overall.completed, 2);
        assert_eq!(progress.overall.remaining, 6);
        assert_eq!(progress.overall.percent, 25);
        assert_eq!(progress.by_category[&LessonCategory::Css].percent, 100);
        assert_eq!(progress.by_category[&LessonCategory::Html].completed, 0);

        let flexbox = service
            .curriculum()
            .lessons()
            .iter()
            .find(|l| l.id().as_str() == "css-flexbox")
            .unwrap();
        assert_eq!(flexbox.difficulty().label(), "intermediate");
    }
}
