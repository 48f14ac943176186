use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::{OptionSlot, Question};

/// Pause between answering and moving on, while correct/incorrect is shown.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(1000);

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available")]
    EmptyQuestionSet,

    #[error("quiz session is not complete")]
    NotComplete,
}

//
// ─── TYPES ─────────────────────────────────────────────────────────────────────
//

/// How a selection is graded against the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Any selection whose text equals the stored answer (ignoring case) scores.
    /// Two options with identical text would both count as correct.
    #[default]
    OptionText,
    /// Only the option at the question's correct slot scores.
    OptionSlot,
}

/// Read-only view of where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState<'a> {
    AwaitingAnswer(usize),
    Revealed(usize, &'a str),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    AwaitingAnswer,
    Revealed { selected: String, correct: bool },
    Complete,
}

/// One graded answer in the order it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub question_id: QuestionId,
    pub selected: String,
    pub correct: bool,
}

/// Inputs to the session reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizEvent {
    Select(String),
    SelectSlot(OptionSlot),
    RevealElapsed,
}

/// Work the caller must schedule after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Deliver `QuizEvent::RevealElapsed` after the delay.
    ScheduleReveal(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    AlreadyAnswered,
    NothingToReveal,
    Completed,
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Recorded { correct: bool },
    Advanced { index: usize },
    Completed,
    Ignored(IgnoreReason),
}

/// Result of applying one event: the next session value plus follow-up work.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Transition {
    pub session: QuizSession,
    pub outcome: Outcome,
    pub effect: Option<Effect>,
}

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionScore {
    pub score: usize,
    pub total: usize,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One attempt at a quiz, driven by a pure reducer.
///
/// Every transition returns a new value; the question list is shared between
/// values and never changes. The session never schedules anything itself: a
/// selection yields `Effect::ScheduleReveal` and the owner feeds back
/// `QuizEvent::RevealElapsed` when the delay is over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    questions: Arc<[Question]>,
    index: usize,
    phase: Phase,
    score: usize,
    answers: Vec<AnsweredQuestion>,
    policy: MatchPolicy,
    reveal_delay: Duration,
}

impl QuizSession {
    /// Starts a session at the first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyQuestionSet` if `questions` is empty.
    pub fn start(questions: Vec<Question>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::EmptyQuestionSet);
        }
        Ok(Self {
            questions: questions.into(),
            index: 0,
            phase: Phase::AwaitingAnswer,
            score: 0,
            answers: Vec::new(),
            policy: MatchPolicy::default(),
            reveal_delay: DEFAULT_REVEAL_DELAY,
        })
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    #[must_use]
    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.index)
    }

    /// Selection for the current question, if one was made.
    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        match &self.phase {
            Phase::Revealed { selected, .. } => Some(selected.as_str()),
            _ => None,
        }
    }

    /// Whether the current selection was graded correct.
    #[must_use]
    pub fn selection_correct(&self) -> Option<bool> {
        match &self.phase {
            Phase::Revealed { correct, .. } => Some(*correct),
            _ => None,
        }
    }

    #[must_use]
    pub fn state(&self) -> SessionState<'_> {
        match &self.phase {
            Phase::AwaitingAnswer => SessionState::AwaitingAnswer(self.index),
            Phase::Revealed { selected, .. } => SessionState::Revealed(self.index, selected.as_str()),
            Phase::Complete => SessionState::Complete,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, Phase::Complete)
    }

    /// Final score and question count.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` until the last reveal has elapsed.
    pub fn result(&self) -> Result<SessionScore, SessionError> {
        if !self.is_complete() {
            return Err(SessionError::NotComplete);
        }
        Ok(SessionScore {
            score: self.score,
            total: self.total(),
        })
    }

    pub fn select_option(&self, option: &str) -> Transition {
        self.apply(QuizEvent::Select(option.to_owned()))
    }

    pub fn select_slot(&self, slot: OptionSlot) -> Transition {
        self.apply(QuizEvent::SelectSlot(slot))
    }

    pub fn reveal_elapsed(&self) -> Transition {
        self.apply(QuizEvent::RevealElapsed)
    }

    /// Applies one event and returns the next session value.
    pub fn apply(&self, event: QuizEvent) -> Transition {
        match (&self.phase, event) {
            (Phase::Complete, _) => self.ignore(IgnoreReason::Completed),
            (Phase::Revealed { .. }, QuizEvent::Select(_) | QuizEvent::SelectSlot(_)) => {
                self.ignore(IgnoreReason::AlreadyAnswered)
            }
            (Phase::AwaitingAnswer, QuizEvent::RevealElapsed) => {
                self.ignore(IgnoreReason::NothingToReveal)
            }
            (Phase::AwaitingAnswer, QuizEvent::Select(option)) => self.record(option, None),
            (Phase::AwaitingAnswer, QuizEvent::SelectSlot(slot)) => {
                match self.current_question() {
                    Some(question) => self.record(question.option(slot).to_owned(), Some(slot)),
                    None => self.ignore(IgnoreReason::Completed),
                }
            }
            (Phase::Revealed { .. }, QuizEvent::RevealElapsed) => self.advance(),
        }
    }

    fn ignore(&self, reason: IgnoreReason) -> Transition {
        Transition {
            session: self.clone(),
            outcome: Outcome::Ignored(reason),
            effect: None,
        }
    }

    fn grade(&self, question: &Question, selected: &str, slot: Option<OptionSlot>) -> bool {
        match self.policy {
            MatchPolicy::OptionText => question.is_correct(selected),
            MatchPolicy::OptionSlot => {
                slot.or_else(|| question.slot_of(selected)) == Some(question.correct_slot())
            }
        }
    }

    fn record(&self, selected: String, slot: Option<OptionSlot>) -> Transition {
        let Some(question) = self.current_question() else {
            return self.ignore(IgnoreReason::Completed);
        };
        let correct = self.grade(question, &selected, slot);

        let mut next = self.clone();
        if correct {
            next.score += 1;
        }
        next.answers.push(AnsweredQuestion {
            question_id: question.id(),
            selected: selected.clone(),
            correct,
        });
        next.phase = Phase::Revealed { selected, correct };

        Transition {
            effect: Some(Effect::ScheduleReveal(next.reveal_delay)),
            session: next,
            outcome: Outcome::Recorded { correct },
        }
    }

    fn advance(&self) -> Transition {
        let mut next = self.clone();
        next.index += 1;
        let outcome = if next.index < next.total() {
            next.phase = Phase::AwaitingAnswer;
            Outcome::Advanced { index: next.index }
        } else {
            next.index = next.total();
            next.phase = Phase::Complete;
            Outcome::Completed
        };
        Transition {
            session: next,
            outcome,
            effect: None,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
