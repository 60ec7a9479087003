use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::{LessonId, Topic};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("unknown lesson: {0}")]
    UnknownLesson(String),

    #[error("unknown quiz topic: {0}")]
    UnknownTopic(String),

    #[error("no answer key for topic {0}")]
    MissingAnswerKey(String),

    #[error("answer key for topic {0} is empty")]
    EmptyAnswerKey(String),

    #[error("duplicate lesson id: {0}")]
    DuplicateLesson(String),
}

//
// ─── LESSONS ───────────────────────────────────────────────────────────────────
//

/// Subject area a lesson belongs to. Each category has exactly one quiz topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LessonCategory {
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "CSS")]
    Css,
    JavaScript,
}

impl LessonCategory {
    pub const ALL: [LessonCategory; 3] = [Self::Html, Self::Css, Self::JavaScript];

    /// Key of the quiz that covers this category.
    #[must_use]
    pub fn topic_key(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Css => "css",
            Self::JavaScript => "javascript",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Css => "CSS",
            Self::JavaScript => "JavaScript",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
}

impl Difficulty {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
        }
    }
}

/// A lesson as far as progress tracking is concerned: id, category, difficulty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonEntry {
    id: LessonId,
    category: LessonCategory,
    difficulty: Difficulty,
}

impl LessonEntry {
    #[must_use]
    pub fn new(id: LessonId, category: LessonCategory, difficulty: Difficulty) -> Self {
        Self {
            id,
            category,
            difficulty,
        }
    }

    #[must_use]
    pub fn id(&self) -> &LessonId {
        &self.id
    }

    #[must_use]
    pub fn category(&self) -> LessonCategory {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

//
// ─── ANSWER KEYS ───────────────────────────────────────────────────────────────
//

/// Index of the correct option for each question of a topic quiz, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerKey(Vec<u8>);

impl AnswerKey {
    #[must_use]
    pub fn new(correct: Vec<u8>) -> Self {
        Self(correct)
    }

    /// Correct option for the question at `index`, if the question exists.
    #[must_use]
    pub fn correct_option(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.0.len()
    }
}

//
// ─── CURRICULUM ────────────────────────────────────────────────────────────────
//

const BUILTIN_LESSONS: [(&str, LessonCategory, Difficulty); 8] = [
    ("html-basics", LessonCategory::Html, Difficulty::Beginner),
    ("html-forms", LessonCategory::Html, Difficulty::Intermediate),
    ("css-basics", LessonCategory::Css, Difficulty::Beginner),
    ("css-flexbox", LessonCategory::Css, Difficulty::Intermediate),
    ("js-variables", LessonCategory::JavaScript, Difficulty::Beginner),
    ("js-functions", LessonCategory::JavaScript, Difficulty::Intermediate),
    ("js-dom", LessonCategory::JavaScript, Difficulty::Intermediate),
    ("js-arrays", LessonCategory::JavaScript, Difficulty::Intermediate),
];

/// Lessons, quiz topics and answer keys of the course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curriculum {
    lessons: Vec<LessonEntry>,
    topics: Vec<Topic>,
    answer_keys: BTreeMap<Topic, AnswerKey>,
}

impl Curriculum {
    /// Build a curriculum from explicit lessons; topics are derived from the
    /// lesson categories in first-seen order.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::DuplicateLesson` if a lesson id repeats.
    pub fn new(lessons: Vec<LessonEntry>) -> Result<Self, CurriculumError> {
        let mut topics: Vec<Topic> = Vec::new();
        for (idx, lesson) in lessons.iter().enumerate() {
            if lessons[..idx].iter().any(|l| l.id == lesson.id) {
                return Err(CurriculumError::DuplicateLesson(lesson.id.to_string()));
            }
            let topic = category_topic(lesson.category);
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        Ok(Self {
            lessons,
            topics,
            answer_keys: BTreeMap::new(),
        })
    }

    /// The eight-lesson HTML/CSS/JavaScript course without answer keys.
    #[must_use]
    pub fn builtin() -> Self {
        let lessons = BUILTIN_LESSONS
            .iter()
            .map(|(id, category, difficulty)| {
                LessonEntry::new(LessonId::from_static(id), *category, *difficulty)
            })
            .collect();
        let topics = LessonCategory::ALL
            .iter()
            .map(|c| category_topic(*c))
            .collect();
        Self {
            lessons,
            topics,
            answer_keys: BTreeMap::new(),
        }
    }

    /// Attach the answer key for a topic, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError::UnknownTopic` if the topic is not part of the
    /// curriculum, or `EmptyAnswerKey` if the key has no questions.
    pub fn with_answer_key(mut self, topic: Topic, key: AnswerKey) -> Result<Self, CurriculumError> {
        if !self.topics.contains(&topic) {
            return Err(CurriculumError::UnknownTopic(topic.to_string()));
        }
        if key.question_count() == 0 {
            return Err(CurriculumError::EmptyAnswerKey(topic.to_string()));
        }
        self.answer_keys.insert(topic, key);
        Ok(self)
    }

    /// Attach every key of a `{ topic: [correct, ...] }` map.
    ///
    /// # Errors
    ///
    /// Same as [`Curriculum::with_answer_key`].
    pub fn with_answer_keys(
        self,
        keys: impl IntoIterator<Item = (Topic, AnswerKey)>,
    ) -> Result<Self, CurriculumError> {
        keys.into_iter()
            .try_fold(self, |acc, (topic, key)| acc.with_answer_key(topic, key))
    }

    #[must_use]
    pub fn lessons(&self) -> &[LessonEntry] {
        &self.lessons
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn lesson(&self, id: &LessonId) -> Option<&LessonEntry> {
        self.lessons.iter().find(|l| &l.id == id)
    }

    #[must_use]
    pub fn has_topic(&self, topic: &Topic) -> bool {
        self.topics.contains(topic)
    }

    /// Lesson ids of one category, in curriculum order.
    pub fn lessons_in(&self, category: LessonCategory) -> impl Iterator<Item = &LessonId> {
        self.lessons
            .iter()
            .filter(move |l| l.category == category)
            .map(|l| &l.id)
    }

    /// The answer key for a topic.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTopic` or `MissingAnswerKey`.
    pub fn answer_key(&self, topic: &Topic) -> Result<&AnswerKey, CurriculumError> {
        if !self.has_topic(topic) {
            return Err(CurriculumError::UnknownTopic(topic.to_string()));
        }
        self.answer_keys
            .get(topic)
            .ok_or_else(|| CurriculumError::MissingAnswerKey(topic.to_string()))
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::builtin()
    }
}

fn category_topic(category: LessonCategory) -> Topic {
    Topic::from_static(category.topic_key())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(s: &str) -> Topic {
        Topic::new(s).unwrap()
    }

    #[test]
    fn builtin_has_eight_lessons_and_three_topics() {
        let curriculum = Curriculum::builtin();
        assert_eq!(curriculum.lessons().len(), 8);
        assert_eq!(
            curriculum.topics(),
            &[topic("html"), topic("css"), topic("javascript")]
        );
        assert_eq!(curriculum.lessons_in(LessonCategory::JavaScript).count(), 4);

        let forms = curriculum.lesson(&LessonId::new("html-forms").unwrap()).unwrap();
        assert_eq!(forms.difficulty().label(), "intermediate");
        assert_eq!(curriculum.lessons()[0].difficulty(), Difficulty::Beginner);
    }

    #[test]
    fn answer_key_requires_known_topic() {
        let err = Curriculum::builtin()
            .with_answer_key(topic("python"), AnswerKey::new(vec![0]))
            .unwrap_err();
        assert_eq!(err, CurriculumError::UnknownTopic("python".into()));
    }

    #[test]
    fn missing_answer_key_is_reported() {
        let curriculum = Curriculum::builtin()
            .with_answer_key(topic("html"), AnswerKey::new(vec![0, 1]))
            .unwrap();
        assert_eq!(curriculum.answer_key(&topic("html")).unwrap().question_count(), 2);
        assert!(matches!(
            curriculum.answer_key(&topic("css")),
            Err(CurriculumError::MissingAnswerKey(_))
        ));
    }

    #[test]
    fn duplicate_lessons_are_rejected() {
        let id = LessonId::new("a").unwrap();
        let lessons = vec![
            LessonEntry::new(id.clone(), LessonCategory::Html, Difficulty::Beginner),
            LessonEntry::new(id, LessonCategory::Css, Difficulty::Beginner),
        ];
        assert!(matches!(
            Curriculum::new(lessons),
            Err(CurriculumError::DuplicateLesson(_))
        ));
    }

    #[test]
    fn category_serializes_like_stored_labels() {
        let json = serde_json::to_string(&LessonCategory::Html).unwrap();
        assert_eq!(json, "\"HTML\"");
        assert_eq!(LessonCategory::JavaScript.label(), "JavaScript");
    }
}
