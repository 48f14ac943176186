use std::sync::Arc;
use std::time::Duration;

use quiz_core::model::{
    DEFAULT_REVEAL_DELAY, MatchPolicy, QuizResult, QuizSession, QuizSubmission, SubmitResponse,
};
use rand::rng;
use rand::seq::SliceRandom;
use tracing::{error, info};

use super::runner::{QuizRequest, QuizRunner};
use crate::Clock;
use crate::bank::QuestionSource;
use crate::error::SessionError;

/// Orchestrates quiz start, completion and submission.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    shuffle: bool,
    reveal_delay: Duration,
    policy: MatchPolicy,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            shuffle: false,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            policy: MatchPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Fetch questions once and start a quiz over them.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Fetch` if the source fails and
    /// `SessionError::Empty` if it yields no questions.
    pub async fn start_quiz(&self, request: QuizRequest) -> Result<QuizRunner, SessionError> {
        let mut questions = self
            .source
            .load_questions(request.subject.as_deref())
            .await
            .map_err(|err| {
                error!(error = %err, title = %request.title, "failed to load questions");
                SessionError::Fetch(err)
            })?;

        if self.shuffle {
            let mut rng = rng();
            questions.as_mut_slice().shuffle(&mut rng);
        }

        let session = QuizSession::start(questions)?
            .with_policy(self.policy)
            .with_reveal_delay(self.reveal_delay);
        info!(
            title = %request.title,
            subject = request.subject.as_deref().unwrap_or("all"),
            total = session.total(),
            "quiz started"
        );

        Ok(QuizRunner::new(session, request, self.clock.now()))
    }

    /// Produce the result record of a completed quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain.
    pub fn finish(&self, runner: &QuizRunner) -> Result<QuizResult, SessionError> {
        let result = runner.result(&self.clock)?;
        info!(
            title = %result.quiz_title,
            correct = result.correct_answers,
            total = result.total_questions,
            time_spent = result.time_spent,
            "quiz finished"
        );
        Ok(result)
    }

    /// Send the recorded answers to the source for grading.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain and
    /// `SessionError::Submit` if grading fails.
    pub async fn submit(&self, runner: &QuizRunner) -> Result<SubmitResponse, SessionError> {
        if !runner.is_complete() {
            return Err(SessionError::NotComplete);
        }
        let submission = QuizSubmission::from_answers(runner.session().answers());
        self.source.submit(&submission).await.map_err(|err| {
            error!(error = %err, "failed to submit answers");
            SessionError::Submit(err)
        })
    }
}
