use std::time::Duration;

use chrono::{DateTime, Utc};
use quiz_core::model::{
    Effect, OptionSlot, Outcome, QuizEvent, QuizInfo, QuizResult, QuizSession, SessionState,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::progress::QuizProgress;
use crate::Clock;
use crate::error::SessionError;

/// What to play: a title for the result screen and an optional subject filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizRequest {
    pub title: String,
    pub subject: Option<String>,
}

impl QuizRequest {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subject: None,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Request the questions of a catalog quiz's subject.
    #[must_use]
    pub fn from_quiz(quiz: &QuizInfo) -> Self {
        Self::new(quiz.title()).with_subject(quiz.subject())
    }
}

/// Drives one `QuizSession` and owns its reveal timer.
///
/// A selection arms a Tokio timer tagged with the current epoch. The timer
/// only reports back through a channel; [`QuizRunner::wait_reveal`] applies
/// the reveal when the message carries the live epoch. Cancelling bumps the
/// epoch and aborts the task, and so does dropping the runner.
pub struct QuizRunner {
    session: QuizSession,
    request: QuizRequest,
    started_at: DateTime<Utc>,
    epoch: u64,
    pending: Option<JoinHandle<()>>,
    reveal_tx: mpsc::UnboundedSender<u64>,
    reveal_rx: mpsc::UnboundedReceiver<u64>,
}

impl QuizRunner {
    #[must_use]
    pub fn new(session: QuizSession, request: QuizRequest, started_at: DateTime<Utc>) -> Self {
        let (reveal_tx, reveal_rx) = mpsc::unbounded_channel();
        Self {
            session,
            request,
            started_at,
            epoch: 0,
            pending: None,
            reveal_tx,
            reveal_rx,
        }
    }

    #[must_use]
    pub fn session(&self) -> &QuizSession {
        &self.session
    }

    #[must_use]
    pub fn request(&self) -> &QuizRequest {
        &self.request
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn state(&self) -> SessionState<'_> {
        self.session.state()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.session.is_complete()
    }

    /// True while a reveal timer is armed.
    #[must_use]
    pub fn reveal_pending(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        let total = self.session.total();
        let answered = self.session.answers().len();
        QuizProgress {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            is_complete: self.session.is_complete(),
        }
    }

    /// Select an option by its text.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while a selection is recorded.
    pub fn select_option(&mut self, option: &str) -> Outcome {
        self.dispatch(QuizEvent::Select(option.to_owned()))
    }

    /// Select an option by its position.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while a selection is recorded.
    pub fn select_slot(&mut self, slot: OptionSlot) -> Outcome {
        self.dispatch(QuizEvent::SelectSlot(slot))
    }

    /// Wait for the armed reveal timer and apply it.
    ///
    /// Returns `None` when no reveal is pending.
    pub async fn wait_reveal(&mut self) -> Option<Outcome> {
        self.pending.as_ref()?;
        while let Some(epoch) = self.reveal_rx.recv().await {
            if epoch != self.epoch {
                debug!(epoch, current = self.epoch, "discarding stale reveal");
                continue;
            }
            self.pending = None;
            return Some(self.dispatch(QuizEvent::RevealElapsed));
        }
        None
    }

    /// Skip the remaining delay and reveal immediately.
    ///
    /// Returns `None` when the current question has not been answered.
    pub fn reveal_now(&mut self) -> Option<Outcome> {
        if !matches!(self.session.state(), SessionState::Revealed(..)) {
            return None;
        }
        self.cancel();
        Some(self.dispatch(QuizEvent::RevealElapsed))
    }

    /// Abort the pending reveal, if any. Messages from it are ignored afterwards.
    pub fn cancel(&mut self) {
        self.epoch += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Build the result record for a completed quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` while questions remain.
    pub fn result(&self, clock: &Clock) -> Result<QuizResult, SessionError> {
        let subject = self.request.subject.clone().unwrap_or_default();
        let time_spent = clock.elapsed_secs(self.started_at);
        Ok(QuizResult::from_session(
            &self.session,
            self.request.title.clone(),
            subject,
            time_spent,
        )?)
    }

    fn dispatch(&mut self, event: QuizEvent) -> Outcome {
        let transition = self.session.apply(event);
        self.session = transition.session;

        if let Some(Effect::ScheduleReveal(delay)) = transition.effect {
            self.schedule_reveal(delay);
        }
        if transition.outcome == Outcome::Completed {
            info!(
                title = %self.request.title,
                score = self.session.score(),
                total = self.session.total(),
                "quiz completed"
            );
        }
        transition.outcome
    }

    fn schedule_reveal(&mut self, delay: Duration) {
        self.cancel();
        let epoch = self.epoch;
        let tx = self.reveal_tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(epoch);
        }));
    }
}

impl Drop for QuizRunner {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for QuizRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizRunner")
            .field("session", &self.session)
            .field("request", &self.request)
            .field("started_at", &self.started_at)
            .field("epoch", &self.epoch)
            .field("reveal_pending", &self.pending.is_some())
            .finish_non_exhaustive()
    }
}
