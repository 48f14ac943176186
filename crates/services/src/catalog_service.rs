use std::collections::BTreeSet;
use std::sync::Arc;

use quiz_core::model::{CatalogFilter, QuizId, QuizInfo};
use storage::repository::{QuizRepository, StorageError};

/// Read access to the quiz catalog.
#[derive(Clone)]
pub struct CatalogService {
    quizzes: Arc<dyn QuizRepository>,
}

impl CatalogService {
    #[must_use]
    pub fn new(quizzes: Arc<dyn QuizRepository>) -> Self {
        Self { quizzes }
    }

    /// List quizzes matching `filter`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    pub async fn list(&self, filter: &CatalogFilter) -> Result<Vec<QuizInfo>, StorageError> {
        let all = self.quizzes.list_quizzes().await?;
        Ok(filter.apply(&all).into_iter().cloned().collect())
    }

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no quiz has this id.
    pub async fn get(&self, id: QuizId) -> Result<QuizInfo, StorageError> {
        self.quizzes
            .get_quiz(id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Distinct subjects in the catalog, sorted.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the catalog cannot be read.
    pub async fn subjects(&self) -> Result<Vec<String>, StorageError> {
        let all = self.quizzes.list_quizzes().await?;
        let subjects: BTreeSet<&str> = all.iter().map(QuizInfo::subject).collect();
        Ok(subjects.into_iter().map(str::to_owned).collect())
    }

    /// Insert or replace catalog entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if a quiz cannot be stored.
    pub async fn upsert_all(&self, quizzes: &[QuizInfo]) -> Result<(), StorageError> {
        for quiz in quizzes {
            self.quizzes.upsert_quiz(quiz).await?;
        }
        Ok(())
    }
}
