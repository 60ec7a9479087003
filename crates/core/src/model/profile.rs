use std::collections::BTreeMap;

use crate::model::ids::{BadgeId, LessonId, Topic};
use crate::model::quiz::QuizResult;

/// Result lists keyed by topic, as stored.
pub type TopicResults = BTreeMap<Topic, Vec<QuizResult>>;

/// Everything the progress rules look at, read from storage in one go.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileSnapshot {
    pub name: String,
    pub completed_lessons: Vec<LessonId>,
    pub results: TopicResults,
    pub badges: Vec<BadgeId>,
}

impl ProfileSnapshot {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn has_completed(&self, lesson: &LessonId) -> bool {
        self.completed_lessons.contains(lesson)
    }

    /// Whether any reviewed result for `topic` was marked as passed.
    #[must_use]
    pub fn has_passed(&self, topic: &Topic) -> bool {
        self.results
            .get(topic)
            .is_some_and(|results| results.iter().any(QuizResult::is_reviewed_pass))
    }

    #[must_use]
    pub fn has_badge(&self, badge: &BadgeId) -> bool {
        self.badges.contains(badge)
    }

    /// All results across topics.
    pub fn all_results(&self) -> impl Iterator<Item = &QuizResult> {
        self.results.values().flatten()
    }
}
