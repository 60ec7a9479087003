use std::sync::Arc;

use course_core::model::{
    Curriculum, CurriculumError, QuizResult, QuizSubmission, SubmissionId, Topic,
};
use course_core::progress::{self, QuizOverview, QuizStatus};
use storage::repository::Storage;

use crate::Clock;
use crate::error::QuizServiceError;

/// Learner-side quiz operations: submitting answers and reading status.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    curriculum: Arc<Curriculum>,
    storage: Storage,
    user_name: String,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        curriculum: Arc<Curriculum>,
        storage: Storage,
        user_name: impl Into<String>,
    ) -> Self {
        Self {
            clock,
            curriculum,
            storage,
            user_name: user_name.into(),
        }
    }

    /// Submit answers for a topic quiz. The submission waits for review;
    /// nothing is scored yet.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Curriculum` for an unknown topic or one
    /// without an answer key, `QuizServiceError::Submission` when the answer
    /// count is wrong, and `QuizServiceError::Storage` if persistence fails.
    pub async fn submit(
        &self,
        topic: &str,
        answers: Vec<u8>,
    ) -> Result<QuizSubmission, QuizServiceError> {
        let topic = self.known_topic(topic)?;
        let key = self.curriculum.answer_key(&topic)?;
        let mut submission = QuizSubmission::new_pending(
            topic,
            self.user_name.clone(),
            answers,
            key,
            self.clock.now(),
        )?;

        let mut submissions = self.storage.quiz_submissions().await?;
        // ids are millisecond stamps; step forward until unused
        let mut millis = submission.submitted_at.timestamp_millis();
        while submissions.iter().any(|s| s.id == submission.id) {
            millis += 1;
            submission.id = SubmissionId::for_topic(&submission.topic, millis);
        }
        submissions.push(submission.clone());
        self.storage.save_quiz_submissions(&submissions).await?;

        tracing::info!(
            submission = %submission.id,
            topic = %submission.topic,
            answers = submission.answers.len(),
            "quiz submitted for review"
        );
        Ok(submission)
    }

    /// # Errors
    ///
    /// Returns `QuizServiceError::Curriculum` for an unknown topic and
    /// `QuizServiceError::Storage` if repository access fails.
    pub async fn status(&self, topic: &str) -> Result<QuizStatus, QuizServiceError> {
        Ok(self.overview(topic).await?.status)
    }

    /// Status, best score and attempt count for one topic.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Curriculum` for an unknown topic and
    /// `QuizServiceError::Storage` if repository access fails.
    pub async fn overview(&self, topic: &str) -> Result<QuizOverview, QuizServiceError> {
        let topic = self.known_topic(topic)?;
        let results = self.storage.quiz_results().await?;
        let submissions = self.storage.quiz_submissions().await?;
        let topic_results = results.get(&topic).map_or(&[][..], Vec::as_slice);
        Ok(progress::quiz_overview(&topic, topic_results, &submissions))
    }

    /// Overviews of every curriculum topic, in curriculum order.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn overviews(&self) -> Result<Vec<QuizOverview>, QuizServiceError> {
        let results = self.storage.quiz_results().await?;
        let submissions = self.storage.quiz_submissions().await?;
        Ok(self
            .curriculum
            .topics()
            .iter()
            .map(|topic| {
                let topic_results = results.get(topic).map_or(&[][..], Vec::as_slice);
                progress::quiz_overview(topic, topic_results, &submissions)
            })
            .collect())
    }

    /// The reviewed result shown back to the learner, with score, reviewer
    /// and feedback. `None` until a review exists.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Curriculum` for an unknown topic and
    /// `QuizServiceError::Storage` if repository access fails.
    pub async fn reviewed_result(&self, topic: &str) -> Result<Option<QuizResult>, QuizServiceError> {
        let topic = self.known_topic(topic)?;
        let results = self.storage.quiz_results().await?;
        Ok(results
            .get(&topic)
            .and_then(|list| progress::reviewed_result(list))
            .cloned())
    }

    /// Every submission for a topic, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Curriculum` for an unknown topic and
    /// `QuizServiceError::Storage` if repository access fails.
    pub async fn submissions_for(&self, topic: &str) -> Result<Vec<QuizSubmission>, QuizServiceError> {
        let topic = self.known_topic(topic)?;
        let mut submissions = self.storage.quiz_submissions().await?;
        submissions.retain(|s| s.topic == topic);
        Ok(submissions)
    }

    fn known_topic(&self, topic: &str) -> Result<Topic, QuizServiceError> {
        let topic = Topic::new(topic)?;
        if !self.curriculum.has_topic(&topic) {
            return Err(CurriculumError::UnknownTopic(topic.to_string()).into());
        }
        Ok(topic)
    }
}
