use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for building an id from a string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IdError {
    #[error("{kind} cannot be empty")]
    Empty { kind: &'static str },
}

/// Identifier of a lesson, e.g. `html-basics`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Creates a new `LessonId` from a trimmed, non-empty string.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        non_empty(id.into(), "LessonId").map(Self)
    }

    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Quiz topic key, always lower case (`html`, `css`, `javascript`).
///
/// The topic is the key of the per-topic result map, so it is normalized on
/// construction and on deserialization.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Creates a topic, trimming and lower-casing the input.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(topic: impl Into<String>) -> Result<Self, IdError> {
        non_empty(topic.into(), "Topic").map(|t| Self(t.to_lowercase()))
    }

    pub(crate) fn from_static(topic: &'static str) -> Self {
        Self(topic.to_lowercase())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Topic {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

/// Identifier of a quiz submission, `<topic>-<unix millis>`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Wraps an existing submission id.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        non_empty(id.into(), "SubmissionId").map(Self)
    }

    /// Builds the id for a submission on `topic` made at `millis`.
    #[must_use]
    pub fn for_topic(topic: &Topic, millis: i64) -> Self {
        Self(format!("{}-{millis}", topic.as_str()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a badge or of a badge-list marker such as `project-completed`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeId(String);

impl BadgeId {
    /// Creates a new `BadgeId`.
    ///
    /// # Errors
    ///
    /// Returns `IdError::Empty` if the value is blank.
    pub fn new(id: impl Into<String>) -> Result<Self, IdError> {
        non_empty(id.into(), "BadgeId").map(Self)
    }

    /// Builds a badge id from a compile-time constant.
    pub(crate) fn from_static(id: &'static str) -> Self {
        Self(id.to_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn non_empty(value: String, kind: &'static str) -> Result<String, IdError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(IdError::Empty { kind });
    }
    if trimmed.len() == value.len() {
        Ok(value)
    } else {
        Ok(trimmed.to_owned())
    }
}

// ─── Debug / Display ───────────────────────────────────────────────────────────

impl fmt::Debug for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LessonId({})", self.0)
    }
}

impl fmt::Debug for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic({})", self.0)
    }
}

impl fmt::Debug for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubmissionId({})", self.0)
    }
}

impl fmt::Debug for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BadgeId({})", self.0)
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for LessonId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for Topic {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for SubmissionId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for BadgeId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_id_trims_input() {
        let id: LessonId = "  html-basics ".parse().unwrap();
        assert_eq!(id.as_str(), "html-basics");
        assert_eq!(id.to_string(), "html-basics");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(
            LessonId::new("   ").unwrap_err(),
            IdError::Empty { kind: "LessonId" }
        );
        assert!("".parse::<BadgeId>().is_err());
    }

    #[test]
    fn topic_is_lower_cased() {
        let topic = Topic::new("JavaScript").unwrap();
        assert_eq!(topic.as_str(), "javascript");
    }

    #[test]
    fn topic_deserialization_normalizes() {
        let topic: Topic = serde_json::from_str("\"CSS\"").unwrap();
        assert_eq!(topic, Topic::new("css").unwrap());
        assert!(serde_json::from_str::<Topic>("\" \"").is_err());
    }

    #[test]
    fn submission_id_combines_topic_and_millis() {
        let topic = Topic::new("HTML").unwrap();
        let id = SubmissionId::for_topic(&topic, 1_700_000_000_000);
        assert_eq!(id.as_str(), "html-1700000000000");
    }
}
