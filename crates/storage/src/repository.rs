use async_trait::async_trait;
use quiz_core::model::{
    QuestionDraft, QuestionError, QuestionId, Question, QuizId, QuizInfo, answers_match,
};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
}

/// Question bank persistence.
///
/// Lists are ordered by question id, which is insertion order.
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// List all questions, or only those whose subject matches ignoring case.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the questions cannot be read.
    async fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError>;

    /// Validate and store a new question, returning its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` if the draft is malformed.
    async fn insert_question(&self, draft: &QuestionDraft) -> Result<QuestionId, StorageError>;

    /// Store several questions; nothing is stored if any draft is malformed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidQuestion` if any draft is malformed.
    async fn insert_questions(
        &self,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionId>, StorageError>;

    /// Replace the fields of an existing question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    async fn update_question(
        &self,
        id: QuestionId,
        draft: &QuestionDraft,
    ) -> Result<Question, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the id is unknown.
    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError>;
}

/// Quiz catalog persistence.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &QuizInfo) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizInfo>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn list_quizzes(&self) -> Result<Vec<QuizInfo>, StorageError>;
}

fn lock_err<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
    quizzes: Arc<Mutex<BTreeMap<QuizId, QuizInfo>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn next_question_id(questions: &BTreeMap<QuestionId, Question>) -> QuestionId {
    let last = questions.keys().next_back().map_or(0, QuestionId::value);
    QuestionId::new(last + 1)
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        Ok(guard
            .values()
            .filter(|q| match subject {
                Some(wanted) => q.subject().is_some_and(|s| answers_match(s, wanted)),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let guard = self.questions.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn insert_question(&self, draft: &QuestionDraft) -> Result<QuestionId, StorageError> {
        let mut guard = self.questions.lock().map_err(lock_err)?;
        let id = next_question_id(&guard);
        let question = draft.clone().into_question(id)?;
        guard.insert(id, question);
        Ok(id)
    }

    async fn insert_questions(
        &self,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionId>, StorageError> {
        for draft in drafts {
            draft.check()?;
        }
        let mut guard = self.questions.lock().map_err(lock_err)?;
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = next_question_id(&guard);
            guard.insert(id, draft.clone().into_question(id)?);
            ids.push(id);
        }
        Ok(ids)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        draft: &QuestionDraft,
    ) -> Result<Question, StorageError> {
        let mut guard = self.questions.lock().map_err(lock_err)?;
        let slot = guard.get_mut(&id).ok_or(StorageError::NotFound)?;
        let updated = draft.clone().into_question(id)?;
        *slot = updated.clone();
        Ok(updated)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let mut guard = self.questions.lock().map_err(lock_err)?;
        guard.remove(&id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &QuizInfo) -> Result<(), StorageError> {
        let mut guard = self.quizzes.lock().map_err(lock_err)?;
        guard.insert(quiz.id(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizInfo>, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizInfo>, StorageError> {
        let guard = self.quizzes.lock().map_err(lock_err)?;
        Ok(guard.values().cloned().collect())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let questions: Arc<dyn QuestionRepository> = Arc::new(repo.clone());
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo);
        Self { questions, quizzes }
    }
}
