//! Sources of quiz questions.

mod http;

use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Question, QuizSubmission, SubmitResponse, grade_submission};
use storage::repository::QuestionRepository;

use crate::error::QuestionBankError;

pub use http::HttpQuestionBank;

/// Supplies the ordered question list for one quiz and grades submissions.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load questions, optionally restricted to one subject (matched ignoring case).
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` when the backing store cannot be read.
    async fn load_questions(&self, subject: Option<&str>)
    -> Result<Vec<Question>, QuestionBankError>;

    /// Grade a set of answers.
    ///
    /// # Errors
    ///
    /// Returns `QuestionBankError` when grading cannot be performed.
    async fn submit(&self, submission: &QuizSubmission)
    -> Result<SubmitResponse, QuestionBankError>;
}

/// Question source backed by the local question repository.
///
/// Submissions are graded in-process against the stored answers.
#[derive(Clone)]
pub struct StoredQuestionBank {
    questions: Arc<dyn QuestionRepository>,
}

impl StoredQuestionBank {
    #[must_use]
    pub fn new(questions: Arc<dyn QuestionRepository>) -> Self {
        Self { questions }
    }
}

#[async_trait]
impl QuestionSource for StoredQuestionBank {
    async fn load_questions(
        &self,
        subject: Option<&str>,
    ) -> Result<Vec<Question>, QuestionBankError> {
        Ok(self.questions.list_questions(subject).await?)
    }

    async fn submit(
        &self,
        submission: &QuizSubmission,
    ) -> Result<SubmitResponse, QuestionBankError> {
        let questions = self.questions.list_questions(None).await?;
        Ok(grade_submission(&questions, submission))
    }
}
