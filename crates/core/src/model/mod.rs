mod catalog;
mod ids;
mod question;
mod result;
mod session;
mod submission;

pub use catalog::{CatalogError, CatalogFilter, Difficulty, QuizInfo};
pub use ids::{ParseIdError, QuestionId, QuizId};
pub use question::{
    OptionSlot, Question, QuestionDraft, QuestionError, QuestionRecord, answers_match,
};
pub use result::{LetterGrade, Performance, QuizResult, format_duration, percentage};
pub use session::{
    AnsweredQuestion, DEFAULT_REVEAL_DELAY, Effect, IgnoreReason, MatchPolicy, Outcome,
    QuizEvent, QuizSession, SessionError, SessionScore, SessionState, Transition,
};
pub use submission::{QuizSubmission, SubmitResponse, UserAnswer, grade_submission};
