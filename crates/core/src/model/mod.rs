mod badge;
mod curriculum;
mod ids;
mod profile;
mod project;
mod quiz;

pub use ids::{BadgeId, IdError, LessonId, SubmissionId, Topic};

pub use badge::{
    Badge, BadgeCatalog, BadgeRule, PROJECT_COMPLETED_MARKER, project_completed_marker,
};
pub use curriculum::{AnswerKey, Curriculum, CurriculumError, Difficulty, LessonCategory, LessonEntry};
pub use profile::{ProfileSnapshot, TopicResults};
pub use project::{ProjectCheck, ProjectReport, ProjectSubmission, SourceKind};
pub use quiz::{
    AnswerCheck, PASSING_PERCENT, QuizResult, QuizSubmission, ReviewDecision, SubmissionError,
    SubmissionStatus, check_answers, percent, score_answers, suggested_grade,
};
