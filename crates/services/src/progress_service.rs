use std::collections::BTreeMap;
use std::sync::Arc;

use course_core::model::{Badge, BadgeCatalog, Curriculum, QuizResult, Topic};
use course_core::progress::{self, LevelInfo};
use storage::repository::Storage;

use crate::error::ProgressServiceError;

/// How many results per topic the profile shows.
pub const RECENT_RESULTS_PER_TOPIC: usize = 2;

/// Everything the profile page shows, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub level: LevelInfo,
    pub completed_lessons: usize,
    pub passed_quizzes: usize,
    pub average_score: u32,
    pub badges: Vec<Badge>,
    /// Newest first.
    pub recent_results: BTreeMap<Topic, Vec<QuizResult>>,
    pub can_access_final_project: bool,
}

#[derive(Clone)]
pub struct ProgressService {
    curriculum: Arc<Curriculum>,
    catalog: Arc<BadgeCatalog>,
    storage: Storage,
    user_name: String,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        curriculum: Arc<Curriculum>,
        catalog: Arc<BadgeCatalog>,
        storage: Storage,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            curriculum,
            catalog,
            storage,
            user_name: user_name.into(),
        }
    }

    /// Build the profile from stored lessons, results and badge markers.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn profile(&self) -> Result<Profile, ProgressServiceError> {
        let snapshot = self.storage.profile_snapshot(&self.user_name).await?;
        let submissions = self.storage.quiz_submissions().await?;

        let recent_results = snapshot
            .results
            .iter()
            .map(|(topic, results)| {
                let recent = results
                    .iter()
                    .rev()
                    .take(RECENT_RESULTS_PER_TOPIC)
                    .cloned()
                    .collect();
                (topic.clone(), recent)
            })
            .collect();

        let badges = progress::earned_badges(&self.catalog, &self.curriculum, &snapshot)
            .into_iter()
            .cloned()
            .collect();

        Ok(Profile {
            level: LevelInfo::from_profile(&snapshot),
            completed_lessons: snapshot.completed_lessons.len(),
            passed_quizzes: progress::passed_quiz_count(snapshot.all_results()),
            average_score: progress::average_score_percent(snapshot.all_results()),
            badges,
            recent_results,
            can_access_final_project: progress::can_access_final_project(
                &self.curriculum,
                &snapshot,
                &submissions,
            ),
            name: snapshot.name,
        })
    }

    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn can_access_final_project(&self) -> Result<bool, ProgressServiceError> {
        Ok(self.profile().await?.can_access_final_project)
    }
}
