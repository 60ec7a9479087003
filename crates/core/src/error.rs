use thiserror::Error;

use crate::model::{CurriculumError, IdError, SubmissionError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Id(#[from] IdError),
    #[error(transparent)]
    Curriculum(#[from] CurriculumError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}
