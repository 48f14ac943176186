use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::session::{QuizSession, SessionError};

/// Letter grade shown next to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LetterGrade {
    A,
    B,
    C,
}

impl LetterGrade {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            80.. => LetterGrade::A,
            60..=79 => LetterGrade::B,
            _ => LetterGrade::C,
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
        };
        f.write_str(s)
    }
}

/// Encouragement band for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Performance {
    Outstanding,
    Excellent,
    Good,
    Fair,
    NeedsPractice,
}

impl Performance {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Performance::Outstanding,
            80..=89 => Performance::Excellent,
            70..=79 => Performance::Good,
            60..=69 => Performance::Fair,
            _ => Performance::NeedsPractice,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Performance::Outstanding => "Outstanding!",
            Performance::Excellent => "Excellent work!",
            Performance::Good => "Good job!",
            Performance::Fair => "Not bad, keep practicing!",
            Performance::NeedsPractice => "Keep studying, you can do better!",
        }
    }
}

/// Formats whole seconds as `"{m}m {s}s"`.
#[must_use]
pub fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Rounded `correct / total` as a percentage; zero when `total` is zero.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct);
    let total = u64::from(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Result record handed to the results screen when a quiz completes.
///
/// `score` is a percentage; `correct_answers` is the raw count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub time_spent: u64,
    pub quiz_title: String,
    pub subject: String,
}

impl QuizResult {
    /// Builds the record from a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotComplete` if the session is still running.
    pub fn from_session(
        session: &QuizSession,
        quiz_title: impl Into<String>,
        subject: impl Into<String>,
        time_spent: u64,
    ) -> Result<Self, SessionError> {
        let tally = session.result()?;
        let correct_answers = u32::try_from(tally.score).unwrap_or(u32::MAX);
        let total_questions = u32::try_from(tally.total).unwrap_or(u32::MAX);

        Ok(Self {
            score: percentage(correct_answers, total_questions),
            total_questions,
            correct_answers,
            time_spent,
            quiz_title: quiz_title.into(),
            subject: subject.into(),
        })
    }

    #[must_use]
    pub fn grade(&self) -> LetterGrade {
        LetterGrade::from_percentage(self.score)
    }

    #[must_use]
    pub fn performance(&self) -> Performance {
        Performance::from_percentage(self.score)
    }

    #[must_use]
    pub fn formatted_time(&self) -> String {
        format_duration(self.time_spent)
    }

    /// Answering speed; `None` when no time was recorded.
    #[must_use]
    pub fn questions_per_minute(&self) -> Option<f64> {
        if self.time_spent == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let minutes = self.time_spent as f64 / 60.0;
        Some(f64::from(self.total_questions) / minutes)
    }
}
