//! Fixed keys under which the course state is stored.

pub const COMPLETED_LESSONS: &str = "completedLessons";
pub const QUIZ_RESULTS: &str = "quizResults";
pub const QUIZ_SUBMISSIONS: &str = "quizSubmissions";
pub const USER_BADGES: &str = "userBadges";
pub const PROJECT_SUBMISSIONS: &str = "projectSubmissions";
