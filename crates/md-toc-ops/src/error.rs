use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("i/o error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

impl OperationError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| OperationError::Io { path, source }
    }
}

pub type OperationResult<T> = Result<T, OperationError>;
