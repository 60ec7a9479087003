use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::curriculum::AnswerKey;
use crate::model::ids::{SubmissionId, Topic};

/// Minimum rounded percentage for a suggested pass.
pub const PASSING_PERCENT: u32 = 70;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubmissionError {
    #[error("a submission needs at least one answer")]
    NoAnswers,

    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    #[error("submission {0} has already been reviewed")]
    AlreadyReviewed(String),

    #[error("score {score} exceeds question total {total}")]
    ScoreOutOfRange { score: u32, total: u32 },
}

//
// ─── STATUS / DECISION ─────────────────────────────────────────────────────────
//

/// Review status shared by submissions and results.
///
/// Only `Pending -> Reviewed` is a valid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Reviewed,
}

impl SubmissionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
        }
    }
}

/// Outcome chosen by the reviewer, or suggested from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Pass,
    Fail,
}

impl ReviewDecision {
    #[must_use]
    pub fn is_pass(self) -> bool {
        matches!(self, Self::Pass)
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// A scored attempt, stored in the per-topic result lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub passed: bool,
    pub completed_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub status: SubmissionStatus,
}

impl QuizResult {
    /// True when the result was reviewed and marked as passed.
    #[must_use]
    pub fn is_reviewed_pass(&self) -> bool {
        self.passed && self.status == SubmissionStatus::Reviewed
    }

    /// Rounded score percentage; 0 when there are no questions.
    #[must_use]
    pub fn percent(&self) -> u32 {
        percent(self.score, self.total_questions)
    }
}

//
// ─── SUBMISSION ────────────────────────────────────────────────────────────────
//

/// A learner's answers for one topic quiz, awaiting or having received review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub id: SubmissionId,
    pub user_id: String,
    pub user_name: String,
    pub topic: Topic,
    pub answers: Vec<u8>,
    pub submitted_at: DateTime<Utc>,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<QuizResult>,
}

impl QuizSubmission {
    /// Create a pending submission with one answer per question of `key`.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::NoAnswers` for an empty answer list and
    /// `AnswerCountMismatch` if the count differs from the key.
    pub fn new_pending(
        topic: Topic,
        user_name: impl Into<String>,
        answers: Vec<u8>,
        key: &AnswerKey,
        submitted_at: DateTime<Utc>,
    ) -> Result<Self, SubmissionError> {
        if answers.is_empty() {
            return Err(SubmissionError::NoAnswers);
        }
        if answers.len() != key.question_count() {
            return Err(SubmissionError::AnswerCountMismatch {
                expected: key.question_count(),
                actual: answers.len(),
            });
        }
        let user_name = user_name.into();
        Ok(Self {
            id: SubmissionId::for_topic(&topic, submitted_at.timestamp_millis()),
            user_id: user_name.to_lowercase(),
            user_name,
            topic,
            answers,
            submitted_at,
            status: SubmissionStatus::Pending,
            result: None,
        })
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == SubmissionStatus::Pending
    }

    /// Number of answered questions, which is the result's question total.
    #[must_use]
    pub fn total_questions(&self) -> u32 {
        u32::try_from(self.answers.len()).unwrap_or(u32::MAX)
    }

    /// Close the review: build the result, embed it and mark the submission
    /// reviewed.
    ///
    /// Blank feedback is dropped.
    ///
    /// # Errors
    ///
    /// Returns `SubmissionError::AlreadyReviewed` if the submission is not
    /// pending, or `ScoreOutOfRange` if `score` exceeds the answer count.
    pub fn review(
        &mut self,
        decision: ReviewDecision,
        score: u32,
        reviewer: impl Into<String>,
        feedback: Option<&str>,
        reviewed_at: DateTime<Utc>,
    ) -> Result<QuizResult, SubmissionError> {
        if !self.is_pending() {
            return Err(SubmissionError::AlreadyReviewed(self.id.to_string()));
        }
        let total = self.total_questions();
        if score > total {
            return Err(SubmissionError::ScoreOutOfRange { score, total });
        }

        let result = QuizResult {
            score,
            total_questions: total,
            passed: decision.is_pass(),
            completed_at: reviewed_at,
            reviewed_by: Some(reviewer.into()),
            feedback: feedback
                .map(str::trim)
                .filter(|f| !f.is_empty())
                .map(str::to_owned),
            status: SubmissionStatus::Reviewed,
        };

        self.status = SubmissionStatus::Reviewed;
        self.result = Some(result.clone());
        Ok(result)
    }
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// One row of a per-question breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerCheck {
    pub question: usize,
    pub given: u8,
    pub correct: Option<u8>,
}

impl AnswerCheck {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct == Some(self.given)
    }
}

/// Compare every answer against the key. Answers past the end of the key
/// have no correct option.
#[must_use]
pub fn check_answers(key: &AnswerKey, answers: &[u8]) -> Vec<AnswerCheck> {
    answers
        .iter()
        .enumerate()
        .map(|(question, given)| AnswerCheck {
            question,
            given: *given,
            correct: key.correct_option(question),
        })
        .collect()
}

/// Number of answers that match the key.
#[must_use]
pub fn score_answers(key: &AnswerKey, answers: &[u8]) -> u32 {
    let correct = check_answers(key, answers)
        .iter()
        .filter(|c| c.is_correct())
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

/// Rounded percentage of `score` over `total`; 0 when `total` is 0.
#[must_use]
pub fn percent(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(score) / f64::from(total) * 100.0).round();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let pct = pct as u32;
    pct
}

/// Grade suggested to the reviewer: pass at 70% and above.
#[must_use]
pub fn suggested_grade(score: u32, total: u32) -> ReviewDecision {
    if percent(score, total) >= PASSING_PERCENT {
        ReviewDecision::Pass
    } else {
        ReviewDecision::Fail
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
