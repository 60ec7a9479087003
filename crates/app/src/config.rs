use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use course_core::model::{AnswerKey, Curriculum, Topic};
use thiserror::Error;

/// Answer keys shipped with the binary, used unless `--answer-keys` is given.
const BUILTIN_ANSWER_KEYS: &str = include_str!("../answer_keys.json");

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid database url: {raw}")]
    InvalidDbUrl { raw: String },
    #[error("cannot read answer keys from {path}: {source}")]
    AnswerKeysIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("answer keys are not a topic -> [option] map: {0}")]
    AnswerKeysJson(#[from] serde_json::Error),
    #[error(transparent)]
    Course(#[from] course_core::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Builtin curriculum with answer keys from `path`, or the bundled keys.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or does not describe
/// keys for known topics.
pub fn load_curriculum(path: Option<&Path>) -> Result<Curriculum, ConfigError> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| ConfigError::AnswerKeysIo {
            path: path.to_path_buf(),
            source,
        })?,
        None => BUILTIN_ANSWER_KEYS.to_owned(),
    };
    parse_answer_keys(&text)
}

fn parse_answer_keys(text: &str) -> Result<Curriculum, ConfigError> {
    let raw: BTreeMap<String, Vec<u8>> = serde_json::from_str(text)?;
    let keys = raw
        .into_iter()
        .map(|(topic, correct)| Ok((Topic::new(topic)?, AnswerKey::new(correct))))
        .collect::<Result<Vec<_>, course_core::Error>>()?;
    let curriculum = Curriculum::builtin()
        .with_answer_keys(keys)
        .map_err(course_core::Error::from)?;
    Ok(curriculum)
}

/// Turn a path or partial url into an absolute `sqlite://` url.
pub fn normalize_sqlite_url(raw: &str) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") || raw.starts_with("sqlite:file:") {
        return raw.to_owned();
    }

    let trimmed = raw.trim();
    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

/// Create the database file and its parent directory so the pool can open it.
///
/// # Errors
///
/// Returns `ConfigError` for a url without a path or on filesystem errors.
pub fn prepare_sqlite_file(db_url: &str) -> Result<(), ConfigError> {
    if db_url == "sqlite::memory:" || db_url.starts_with("sqlite:file:") {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ConfigError::InvalidDbUrl {
            raw: db_url.to_owned(),
        });
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}
