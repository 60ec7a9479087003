use async_trait::async_trait;
use course_core::model::{
    BadgeId, LessonId, ProfileSnapshot, ProjectSubmission, QuizSubmission, TopicResults,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::keys;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String-keyed store of JSON values with no expiry.
///
/// Implementations only need `get`/`set`; `set_many` should be overridden
/// when the backend can write several keys atomically.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read or the stored
    /// text is not valid JSON.
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be written.
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;

    /// Store several keys.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` hit; earlier keys may already be written.
    async fn set_many(&self, entries: Vec<(&'static str, Value)>) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value).await?;
        }
        Ok(())
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value);
        Ok(())
    }

    async fn set_many(&self, entries: Vec<(&'static str, Value)>) -> Result<(), StorageError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in entries {
            guard.insert(key.to_owned(), value);
        }
        Ok(())
    }
}

fn to_value<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Value, StorageError> {
    serde_json::to_value(value)
        .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))
}

/// Typed access to the course state kept in a `KeyValueStore`.
///
/// Missing keys read as empty collections.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { kv }
    }

    /// Read and decode `key`, or `T::default()` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored JSON does not
    /// match `T`, or backend errors.
    pub async fn load<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T, StorageError> {
        match self.kv.get(key).await? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| StorageError::Serialization(format!("{key}: {e}"))),
            None => Ok(T::default()),
        }
    }

    /// Encode and write `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = to_value(key, value)?;
        tracing::debug!(key, "writing key");
        self.kv.set(key, value).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn completed_lessons(&self) -> Result<Vec<LessonId>, StorageError> {
        self.load(keys::COMPLETED_LESSONS).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    pub async fn save_completed_lessons(&self, lessons: &[LessonId]) -> Result<(), StorageError> {
        self.save(keys::COMPLETED_LESSONS, lessons).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn quiz_results(&self) -> Result<TopicResults, StorageError> {
        self.load(keys::QUIZ_RESULTS).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn quiz_submissions(&self) -> Result<Vec<QuizSubmission>, StorageError> {
        self.load(keys::QUIZ_SUBMISSIONS).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    pub async fn save_quiz_submissions(
        &self,
        submissions: &[QuizSubmission],
    ) -> Result<(), StorageError> {
        self.save(keys::QUIZ_SUBMISSIONS, submissions).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn badges(&self) -> Result<Vec<BadgeId>, StorageError> {
        self.load(keys::USER_BADGES).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    pub async fn save_badges(&self, badges: &[BadgeId]) -> Result<(), StorageError> {
        self.save(keys::USER_BADGES, badges).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn project_submissions(&self) -> Result<Vec<ProjectSubmission>, StorageError> {
        self.load(keys::PROJECT_SUBMISSIONS).await
    }

    /// # Errors
    ///
    /// Returns `StorageError` on write failures.
    pub async fn save_project_submissions(
        &self,
        projects: &[ProjectSubmission],
    ) -> Result<(), StorageError> {
        self.save(keys::PROJECT_SUBMISSIONS, projects).await
    }

    /// Persist a closed review: the topic results and the submission list
    /// go out in a single `set_many`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn record_review(
        &self,
        results: &TopicResults,
        submissions: &[QuizSubmission],
    ) -> Result<(), StorageError> {
        let entries = vec![
            (keys::QUIZ_RESULTS, to_value(keys::QUIZ_RESULTS, results)?),
            (
                keys::QUIZ_SUBMISSIONS,
                to_value(keys::QUIZ_SUBMISSIONS, submissions)?,
            ),
        ];
        tracing::debug!(results = results.len(), submissions = submissions.len(), "recording review");
        self.kv.set_many(entries).await
    }

    /// Persist a project submission together with the updated badge list.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the write fails.
    pub async fn record_project(
        &self,
        projects: &[ProjectSubmission],
        badges: &[BadgeId],
    ) -> Result<(), StorageError> {
        let entries = vec![
            (
                keys::PROJECT_SUBMISSIONS,
                to_value(keys::PROJECT_SUBMISSIONS, projects)?,
            ),
            (keys::USER_BADGES, to_value(keys::USER_BADGES, badges)?),
        ];
        self.kv.set_many(entries).await
    }

    /// Read everything the progress rules need.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or decode failures.
    pub async fn profile_snapshot(&self, name: &str) -> Result<ProfileSnapshot, StorageError> {
        Ok(ProfileSnapshot {
            name: name.to_owned(),
            completed_lessons: self.completed_lessons().await?,
            results: self.quiz_results().await?,
            badges: self.badges().await?,
        })
    }
}
