use std::sync::Arc;

use course_core::model::{
    AnswerCheck, Curriculum, QuizResult, QuizSubmission, ReviewDecision, SubmissionId,
    check_answers, score_answers, suggested_grade,
};
use storage::repository::Storage;

use crate::Clock;
use crate::error::ReviewServiceError;

/// How many reviewed submissions the admin panel lists as recent activity.
pub const RECENT_REVIEW_LIMIT: usize = 10;

//
// ─── ADMIN GATE ────────────────────────────────────────────────────────────────
//

/// Static shared-password check in front of the review operations.
#[derive(Clone)]
pub struct AdminGate {
    password: String,
}

/// Proof of a successful admin login. Only `AdminGate::login` creates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSession {
    _private: (),
}

impl AdminGate {
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::InvalidPassword` if `attempt` does not
    /// match the configured password.
    pub fn login(&self, attempt: &str) -> Result<AdminSession, ReviewServiceError> {
        if attempt == self.password {
            tracing::info!("admin login");
            Ok(AdminSession { _private: () })
        } else {
            tracing::warn!("rejected admin login");
            Err(ReviewServiceError::InvalidPassword)
        }
    }
}

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// Counters shown at the top of the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReviewStats {
    pub pending: usize,
    pub reviewed: usize,
    pub passed: usize,
}

/// A submission with its answers checked against the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionBreakdown {
    pub submission: QuizSubmission,
    pub checks: Vec<AnswerCheck>,
    pub score: u32,
    pub total: u32,
    pub suggested: ReviewDecision,
}

//
// ─── SERVICE ───────────────────────────────────────────────────────────────────
//

/// Admin-side review of quiz submissions.
#[derive(Clone)]
pub struct ReviewService {
    clock: Clock,
    curriculum: Arc<Curriculum>,
    storage: Storage,
    reviewer: String,
}

impl ReviewService {
    #[must_use]
    pub fn new(
        clock: Clock,
        curriculum: Arc<Curriculum>,
        storage: Storage,
        reviewer: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            curriculum,
            storage,
            reviewer: reviewer.into(),
        }
    }

    /// Submissions still waiting for review, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if repository access fails.
    pub async fn pending(
        &self,
        _session: &AdminSession,
    ) -> Result<Vec<QuizSubmission>, ReviewServiceError> {
        let mut submissions = self.storage.quiz_submissions().await?;
        submissions.retain(QuizSubmission::is_pending);
        Ok(submissions)
    }

    /// Submissions that have been reviewed, in submission order.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if repository access fails.
    pub async fn reviewed(
        &self,
        _session: &AdminSession,
    ) -> Result<Vec<QuizSubmission>, ReviewServiceError> {
        let mut submissions = self.storage.quiz_submissions().await?;
        submissions.retain(|s| !s.is_pending());
        Ok(submissions)
    }

    /// The most recently reviewed submissions, newest review first.
    ///
    /// Ordered by review time, not by position in the stored list, so an old
    /// submission reviewed late still shows at the top.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if repository access fails.
    pub async fn recent_reviews(
        &self,
        session: &AdminSession,
    ) -> Result<Vec<QuizSubmission>, ReviewServiceError> {
        let mut reviewed = self.reviewed(session).await?;
        reviewed.sort_by_key(|s| std::cmp::Reverse(s.result.as_ref().map(|r| r.completed_at)));
        reviewed.truncate(RECENT_REVIEW_LIMIT);
        Ok(reviewed)
    }

    /// # Errors
    ///
    /// Returns `ReviewServiceError::Storage` if repository access fails.
    pub async fn stats(&self, _session: &AdminSession) -> Result<ReviewStats, ReviewServiceError> {
        let submissions = self.storage.quiz_submissions().await?;
        Ok(submissions
            .iter()
            .fold(ReviewStats::default(), |mut stats, submission| {
                if submission.is_pending() {
                    stats.pending += 1;
                } else {
                    stats.reviewed += 1;
                    if submission.result.as_ref().is_some_and(|r| r.passed) {
                        stats.passed += 1;
                    }
                }
                stats
            }))
    }

    /// Per-question comparison of a submission with its answer key, plus the
    /// computed score and suggested grade.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::NotFound` for an unknown id,
    /// `ReviewServiceError::Curriculum` if the topic has no answer key, and
    /// `ReviewServiceError::Storage` if repository access fails.
    pub async fn breakdown(
        &self,
        _session: &AdminSession,
        id: &SubmissionId,
    ) -> Result<SubmissionBreakdown, ReviewServiceError> {
        let submissions = self.storage.quiz_submissions().await?;
        let submission = submissions
            .into_iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| ReviewServiceError::NotFound(id.to_string()))?;

        let key = self.curriculum.answer_key(&submission.topic)?;
        let checks = check_answers(key, &submission.answers);
        let score = score_answers(key, &submission.answers);
        let total = submission.total_questions();
        Ok(SubmissionBreakdown {
            suggested: suggested_grade(score, total),
            submission,
            checks,
            score,
            total,
        })
    }

    /// Close the review of a pending submission.
    ///
    /// `score` defaults to the number of answers matching the key. The
    /// result is appended to the topic's result list and the submission is
    /// updated in the same storage write.
    ///
    /// # Errors
    ///
    /// Returns `ReviewServiceError::NotFound` for an unknown id,
    /// `ReviewServiceError::Submission` if it was already reviewed or the
    /// score is out of range, `ReviewServiceError::Curriculum` if the score
    /// must be computed and the topic has no answer key, and
    /// `ReviewServiceError::Storage` if persistence fails.
    pub async fn review(
        &self,
        _session: &AdminSession,
        id: &SubmissionId,
        decision: ReviewDecision,
        score: Option<u32>,
        feedback: Option<&str>,
    ) -> Result<QuizResult, ReviewServiceError> {
        let mut submissions = self.storage.quiz_submissions().await?;
        let submission = submissions
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| ReviewServiceError::NotFound(id.to_string()))?;

        let score = match score {
            Some(score) => score,
            None => {
                let key = self.curriculum.answer_key(&submission.topic)?;
                score_answers(key, &submission.answers)
            }
        };

        let result = submission.review(
            decision,
            score,
            self.reviewer.clone(),
            feedback,
            self.clock.now(),
        )?;
        let topic = submission.topic.clone();

        let mut results = self.storage.quiz_results().await?;
        results.entry(topic.clone()).or_default().push(result.clone());
        self.storage.record_review(&results, &submissions).await?;

        tracing::info!(
            submission = %id,
            topic = %topic,
            score = result.score,
            total = result.total_questions,
            passed = result.passed,
            "submission reviewed"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use course_core::model::{AnswerKey, SubmissionError, SubmissionStatus, Topic};
    use course_core::time::fixed_now;

    fn curriculum() -> Arc<Curriculum> {
        let curriculum = Curriculum::builtin()
            .with_answer_key(Topic::new("css").unwrap(), AnswerKey::new(vec![1, 2, 1, 2]))
            .unwrap();
        Arc::new(curriculum)
    }

    async fn seeded(answers: &[Vec<u8>]) -> (ReviewService, Vec<SubmissionId>) {
        let storage = Storage::in_memory();
        let key = AnswerKey::new(vec![1, 2, 1, 2]);
        let submissions: Vec<QuizSubmission> = answers
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let at = fixed_now() + chrono::Duration::seconds(i64::try_from(i).unwrap());
                QuizSubmission::new_pending(Topic::new("css").unwrap(), "Alae", a.clone(), &key, at)
                    .unwrap()
            })
            .collect();
        storage.save_quiz_submissions(&submissions).await.unwrap();
        let ids = submissions.iter().map(|s| s.id.clone()).collect();
        let service = ReviewService::new(Clock::fixed(fixed_now()), curriculum(), storage, "Tatawi");
        (service, ids)
    }

    fn session() -> AdminSession {
        AdminGate::new("secret").login("secret").unwrap()
    }

    #[test]
    fn gate_rejects_wrong_password() {
        let gate = AdminGate::new("secret");
        assert!(matches!(
            gate.login("guess"),
            Err(ReviewServiceError::InvalidPassword)
        ));
        assert!(gate.login("secret").is_ok());
    }

    #[tokio::test]
    async fn breakdown_marks_each_answer() {
        let (service, ids) = seeded(&[vec![1, 2, 0, 0]]).await;
        let breakdown = service.breakdown(&session(), &ids[0]).await.unwrap();

        assert_eq!(breakdown.score, 2);
        assert_eq!(breakdown.total, 4);
        assert_eq!(breakdown.suggested, ReviewDecision::Fail);
        let correct: Vec<bool> = breakdown.checks.iter().map(AnswerCheck::is_correct).collect();
        assert_eq!(correct, vec![true, true, false, false]);
        assert_eq!(breakdown.checks[2].correct, Some(1));
    }

    #[tokio::test]
    async fn review_moves_submission_and_appends_result() {
        let (service, ids) = seeded(&[vec![1, 2, 1, 0]]).await;
        let session = session();

        let result = service
            .review(&session, &ids[0], ReviewDecision::Pass, None, Some("  nice  "))
            .await
            .unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(result.reviewed_by.as_deref(), Some("Tatawi"));
        assert_eq!(result.feedback.as_deref(), Some("nice"));

        assert!(service.pending(&session).await.unwrap().is_empty());
        let reviewed = service.reviewed(&session).await.unwrap();
        assert_eq!(reviewed[0].status, SubmissionStatus::Reviewed);
        assert_eq!(reviewed[0].result.as_ref(), Some(&result));

        let results = service.storage.quiz_results().await.unwrap();
        assert_eq!(results[&Topic::new("css").unwrap()], vec![result]);
    }

    #[tokio::test]
    async fn reviewing_twice_fails_and_keeps_one_result() {
        let (service, ids) = seeded(&[vec![1, 2, 1, 2]]).await;
        let session = session();
        service
            .review(&session, &ids[0], ReviewDecision::Pass, Some(4), None)
            .await
            .unwrap();

        let err = service
            .review(&session, &ids[0], ReviewDecision::Fail, Some(0), None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReviewServiceError::Submission(SubmissionError::AlreadyReviewed(_))
        ));
        let results = service.storage.quiz_results().await.unwrap();
        assert_eq!(results.values().flatten().count(), 1);
    }

    #[tokio::test]
    async fn unknown_submission_is_not_found() {
        let (service, _) = seeded(&[]).await;
        let id = SubmissionId::new("css-1").unwrap();
        assert!(matches!(
            service.breakdown(&session(), &id).await,
            Err(ReviewServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn stats_and_recent_reviews() {
        let (mut service, ids) = seeded(&[vec![1, 2, 1, 2], vec![0, 0, 0, 0], vec![1, 1, 1, 1]]).await;
        let session = session();

        service
            .review(&session, &ids[1], ReviewDecision::Fail, None, None)
            .await
            .unwrap();
        service.clock.advance(chrono::Duration::minutes(5));
        service
            .review(&session, &ids[0], ReviewDecision::Pass, None, None)
            .await
            .unwrap();

        let stats = service.stats(&session).await.unwrap();
        assert_eq!(
            stats,
            ReviewStats {
                pending: 1,
                reviewed: 2,
                passed: 1
            }
        );

        let recent = service.recent_reviews(&session).await.unwrap();
        let order: Vec<&SubmissionId> = recent.iter().map(|s| &s.id).collect();
        assert_eq!(order, vec![&ids[0], &ids[1]]);
    }
}
