use std::collections::BTreeMap;

use crate::model::{
    Badge, BadgeCatalog, Curriculum, LessonCategory, LessonId, ProfileSnapshot, QuizResult,
    QuizSubmission, Topic, percent,
};

/// XP awarded per completed lesson.
pub const XP_PER_LESSON: u32 = 100;
/// XP awarded per reviewed and passed quiz result.
pub const XP_PER_PASSED_QUIZ: u32 = 200;
/// XP needed to climb one level.
pub const XP_PER_LEVEL: u32 = 500;

//
// ─── XP / LEVEL ────────────────────────────────────────────────────────────────
//

/// Experience points for the given counts.
///
/// ```
/// # use course_core::progress::xp;
/// assert_eq!(xp(3, 2), 700);
/// ```
#[must_use]
pub fn xp(completed_lessons: usize, passed_quizzes: usize) -> u32 {
    let lessons = u32::try_from(completed_lessons).unwrap_or(u32::MAX);
    let quizzes = u32::try_from(passed_quizzes).unwrap_or(u32::MAX);
    lessons
        .saturating_mul(XP_PER_LESSON)
        .saturating_add(quizzes.saturating_mul(XP_PER_PASSED_QUIZ))
}

/// Level reached with `xp` points; levels start at 1.
///
/// ```
/// # use course_core::progress::level;
/// assert_eq!(level(0), 1);
/// assert_eq!(level(499), 1);
/// assert_eq!(level(500), 2);
/// ```
#[must_use]
pub fn level(xp: u32) -> u32 {
    xp / XP_PER_LEVEL + 1
}

/// Points still missing for the next level, always in `1..=500`.
#[must_use]
pub fn xp_to_next_level(xp: u32) -> u32 {
    XP_PER_LEVEL - xp % XP_PER_LEVEL
}

/// Share of the current level already earned, 0..100.
#[must_use]
pub fn level_progress_percent(xp: u32) -> u32 {
    (xp % XP_PER_LEVEL) / (XP_PER_LEVEL / 100)
}

/// Number of reviewed and passed results across every topic.
pub fn passed_quiz_count<'a>(results: impl IntoIterator<Item = &'a QuizResult>) -> usize {
    results
        .into_iter()
        .filter(|r| r.is_reviewed_pass())
        .count()
}

/// Rounded average of all scores over all question totals, 0 with no results.
pub fn average_score_percent<'a>(results: impl IntoIterator<Item = &'a QuizResult>) -> u32 {
    let (score, total) = results.into_iter().fold((0_u32, 0_u32), |(s, t), r| {
        (s.saturating_add(r.score), t.saturating_add(r.total_questions))
    });
    percent(score, total)
}

/// XP snapshot derived from a profile; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    pub xp: u32,
    pub level: u32,
    pub xp_to_next_level: u32,
    pub progress_percent: u32,
}

impl LevelInfo {
    #[must_use]
    pub fn from_profile(profile: &ProfileSnapshot) -> Self {
        let passed = passed_quiz_count(profile.all_results());
        Self::from_xp(xp(profile.completed_lessons.len(), passed))
    }

    #[must_use]
    pub fn from_xp(xp: u32) -> Self {
        Self {
            xp,
            level: level(xp),
            xp_to_next_level: xp_to_next_level(xp),
            progress_percent: level_progress_percent(xp),
        }
    }
}

//
// ─── QUIZ STATUS ───────────────────────────────────────────────────────────────
//

/// Where a learner stands on one topic quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStatus {
    NotStarted,
    PendingReview,
    Completed,
    Failed,
}

impl QuizStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not-started",
            Self::PendingReview => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// Status of `topic`: a pending submission wins, then no results means not
/// started, then any reviewed pass means completed.
#[must_use]
pub fn quiz_status(topic: &Topic, results: &[QuizResult], submissions: &[QuizSubmission]) -> QuizStatus {
    let pending = submissions
        .iter()
        .any(|s| &s.topic == topic && s.is_pending());
    if pending {
        return QuizStatus::PendingReview;
    }
    if results.is_empty() {
        return QuizStatus::NotStarted;
    }
    if results.iter().any(QuizResult::is_reviewed_pass) {
        QuizStatus::Completed
    } else {
        QuizStatus::Failed
    }
}

/// Status plus best score and attempt count for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOverview {
    pub topic: Topic,
    pub status: QuizStatus,
    pub best_score: u32,
    pub attempts: usize,
}

#[must_use]
pub fn quiz_overview(topic: &Topic, results: &[QuizResult], submissions: &[QuizSubmission]) -> QuizOverview {
    QuizOverview {
        topic: topic.clone(),
        status: quiz_status(topic, results, submissions),
        best_score: results.iter().map(|r| r.score).max().unwrap_or(0),
        attempts: submissions.iter().filter(|s| &s.topic == topic).count(),
    }
}

/// First reviewed result of a topic, the one shown back to the learner.
#[must_use]
pub fn reviewed_result(results: &[QuizResult]) -> Option<&QuizResult> {
    results
        .iter()
        .find(|r| r.status == crate::model::SubmissionStatus::Reviewed)
}

//
// ─── LESSONS ───────────────────────────────────────────────────────────────────
//

/// Completion counts over a set of lessons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonProgress {
    pub total: usize,
    pub completed: usize,
    pub remaining: usize,
    pub percent: u32,
}

impl LessonProgress {
    fn from_counts(total: usize, completed: usize) -> Self {
        let as_u32 = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
        Self {
            total,
            completed,
            remaining: total - completed,
            percent: percent(as_u32(completed), as_u32(total)),
        }
    }
}

/// Overall and per-category completion. Ids unknown to the curriculum are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseProgress {
    pub overall: LessonProgress,
    pub by_category: BTreeMap<LessonCategory, LessonProgress>,
}

#[must_use]
pub fn lesson_progress(curriculum: &Curriculum, completed: &[LessonId]) -> CourseProgress {
    let is_done = |id: &LessonId| completed.contains(id);

    let done = curriculum.lessons().iter().filter(|l| is_done(l.id())).count();
    let overall = LessonProgress::from_counts(curriculum.lessons().len(), done);

    let by_category = LessonCategory::ALL
        .iter()
        .filter_map(|category| {
            let total = curriculum.lessons_in(*category).count();
            if total == 0 {
                return None;
            }
            let done = curriculum.lessons_in(*category).filter(|id| is_done(*id)).count();
            Some((*category, LessonProgress::from_counts(total, done)))
        })
        .collect();

    CourseProgress {
        overall,
        by_category,
    }
}

//
// ─── GATES / BADGES ────────────────────────────────────────────────────────────
//

/// The final project opens once every lesson is done and every topic quiz
/// is `Completed`.
#[must_use]
pub fn can_access_final_project(
    curriculum: &Curriculum,
    profile: &ProfileSnapshot,
    submissions: &[QuizSubmission],
) -> bool {
    let lessons_done = curriculum
        .lessons()
        .iter()
        .all(|l| profile.has_completed(l.id()));

    lessons_done
        && curriculum.topics().iter().all(|topic| {
            let results = profile.results.get(topic).map_or(&[][..], Vec::as_slice);
            quiz_status(topic, results, submissions) == QuizStatus::Completed
        })
}

/// Badges earned by `profile`, in catalog order.
#[must_use]
pub fn earned_badges<'a>(
    catalog: &'a BadgeCatalog,
    curriculum: &Curriculum,
    profile: &ProfileSnapshot,
) -> Vec<&'a Badge> {
    catalog.earned(curriculum, profile)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKey, SubmissionStatus};
    use crate::time::fixed_now;

    fn topic(s: &str) -> Topic {
        Topic::new(s).unwrap()
    }

    fn result(score: u32, passed: bool, status: SubmissionStatus) -> QuizResult {
        QuizResult {
            score,
            total_questions: 15,
            passed,
            completed_at: fixed_now(),
            reviewed_by: None,
            feedback: None,
            status,
        }
    }

    fn pending_submission(t: &str) -> QuizSubmission {
        let key = AnswerKey::new(vec![0, 0]);
        QuizSubmission::new_pending(topic(t), "Alae", vec![0, 1], &key, fixed_now()).unwrap()
    }

    #[test]
    fn xp_and_level_follow_fixed_rates() {
        assert_eq!(xp(0, 0), 0);
        assert_eq!(xp(5, 0), 500);
        assert_eq!(xp(2, 3), 800);

        let info = LevelInfo::from_xp(800);
        assert_eq!(info.level, 2);
        assert_eq!(info.xp_to_next_level, 200);
        assert_eq!(info.progress_percent, 60);

        let fresh = LevelInfo::from_xp(0);
        assert_eq!(fresh.level, 1);
        assert_eq!(fresh.xp_to_next_level, 500);
    }

    #[test]
    fn only_reviewed_passes_earn_quiz_xp() {
        let mut profile = ProfileSnapshot::new("Alae");
        profile.completed_lessons = vec![LessonId::new("html-basics").unwrap()];
        profile.results.insert(
            topic("html"),
            vec![
                result(12, true, SubmissionStatus::Reviewed),
                result(4, false, SubmissionStatus::Reviewed),
                result(15, true, SubmissionStatus::Pending),
            ],
        );

        let info = LevelInfo::from_profile(&profile);
        assert_eq!(info.xp, 300);
    }

    #[test]
    fn average_score_is_weighted_by_question_totals() {
        let results = [
            result(15, true, SubmissionStatus::Reviewed),
            result(0, false, SubmissionStatus::Reviewed),
        ];
        assert_eq!(average_score_percent(&results), 50);
        assert_eq!(average_score_percent(&Vec::<QuizResult>::new()), 0);
    }

    #[test]
    fn quiz_status_precedence() {
        let html = topic("html");
        assert_eq!(quiz_status(&html, &[], &[]), QuizStatus::NotStarted);

        let failed = [result(3, false, SubmissionStatus::Reviewed)];
        assert_eq!(quiz_status(&html, &failed, &[]), QuizStatus::Failed);

        let passed = [failed[0].clone(), result(13, true, SubmissionStatus::Reviewed)];
        assert_eq!(quiz_status(&html, &passed, &[]), QuizStatus::Completed);

        // a pending retake hides the earlier pass
        let subs = [pending_submission("html")];
        assert_eq!(quiz_status(&html, &passed, &subs), QuizStatus::PendingReview);

        // pending work on another topic is irrelevant
        assert_eq!(quiz_status(&topic("css"), &[], &subs), QuizStatus::NotStarted);
    }

    #[test]
    fn overview_reports_best_score_and_attempts() {
        let html = topic("html");
        let results = [
            result(9, false, SubmissionStatus::Reviewed),
            result(13, true, SubmissionStatus::Reviewed),
        ];
        let subs = [pending_submission("html"), pending_submission("css")];
        let overview = quiz_overview(&html, &results, &subs);
        assert_eq!(overview.best_score, 13);
        assert_eq!(overview.attempts, 1);
        assert_eq!(overview.status, QuizStatus::PendingReview);
    }

    #[test]
    fn reviewed_result_skips_unreviewed_entries() {
        let results = [
            result(1, false, SubmissionStatus::Pending),
            result(12, true, SubmissionStatus::Reviewed),
            result(14, true, SubmissionStatus::Reviewed),
        ];
        assert_eq!(reviewed_result(&results).map(|r| r.score), Some(12));
        assert!(reviewed_result(&[]).is_none());
    }

    #[test]
    fn lesson_progress_ignores_unknown_ids() {
        let curriculum = Curriculum::builtin();
        let completed = vec![
            LessonId::new("html-basics").unwrap(),
            LessonId::new("js-dom").unwrap(),
            LessonId::new("retired-lesson").unwrap(),
        ];
        let progress = lesson_progress(&curriculum, &completed);
        assert_eq!(progress.overall.completed, 2);
        assert_eq!(progress.overall.remaining, 6);
        assert_eq!(progress.overall.percent, 25);
        assert_eq!(progress.by_category[&LessonCategory::Html].percent, 50);
        assert_eq!(progress.by_category[&LessonCategory::Css].completed, 0);
        assert_eq!(progress.by_category[&LessonCategory::JavaScript].completed, 1);
    }

    #[test]
    fn final_project_needs_everything_completed() {
        let curriculum = Curriculum::builtin();
        let mut profile = ProfileSnapshot::new("Alae");
        profile.completed_lessons = curriculum.lessons().iter().map(|l| l.id().clone()).collect();
        for t in curriculum.topics() {
            profile
                .results
                .insert(t.clone(), vec![result(12, true, SubmissionStatus::Reviewed)]);
        }
        assert!(can_access_final_project(&curriculum, &profile, &[]));

        let subs = [pending_submission("css")];
        assert!(!can_access_final_project(&curriculum, &profile, &subs));

        profile.completed_lessons.pop();
        assert!(!can_access_final_project(&curriculum, &profile, &[]));
    }
}
