mod progress;
mod runner;
mod workflow;

// Public API of the quiz session subsystem.
pub use crate::error::SessionError;
pub use progress::QuizProgress;
pub use runner::{QuizRequest, QuizRunner};
pub use workflow::QuizLoopService;
