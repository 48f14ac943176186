//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::SessionError as CoreSessionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by question sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionBankError {
    #[error("question bank url cannot be used as a base: {0}")]
    InvalidBaseUrl(String),
    #[error("question bank request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the quiz loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    Empty,
    #[error("failed to load questions")]
    Fetch(#[source] QuestionBankError),
    #[error("quiz is not complete")]
    NotComplete,
    #[error("failed to submit answers")]
    Submit(#[source] QuestionBankError),
}

impl From<CoreSessionError> for SessionError {
    fn from(err: CoreSessionError) -> Self {
        match err {
            CoreSessionError::EmptyQuestionSet => SessionError::Empty,
            _ => SessionError::NotComplete,
        }
    }
}

/// Errors emitted while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} is not a valid url: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    QuestionBank(#[from] QuestionBankError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_session_errors_map_to_loop_errors() {
        assert!(matches!(
            SessionError::from(CoreSessionError::EmptyQuestionSet),
            SessionError::Empty
        ));
        assert!(matches!(
            SessionError::from(CoreSessionError::NotComplete),
            SessionError::NotComplete
        ));
    }

    #[test]
    fn storage_failures_surface_through_the_question_bank() {
        let err = SessionError::Fetch(QuestionBankError::from(StorageError::NotFound));
        assert!(matches!(
            err,
            SessionError::Fetch(QuestionBankError::Storage(StorageError::NotFound))
        ));
        assert_eq!(err.to_string(), "failed to load questions");
    }
}
