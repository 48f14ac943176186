use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::answers_match;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz subject cannot be empty")]
    EmptySubject,

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(CatalogError::UnknownDifficulty(s.to_owned())),
        }
    }
}

/// A quiz as listed in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizInfo {
    id: QuizId,
    title: String,
    subject: String,
    difficulty: Difficulty,
    duration_minutes: u32,
    question_count: u32,
    description: Option<String>,
}

impl QuizInfo {
    /// # Errors
    ///
    /// Returns `CatalogError` if the title or subject is blank.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        subject: impl Into<String>,
        difficulty: Difficulty,
        duration_minutes: u32,
        question_count: u32,
        description: Option<String>,
    ) -> Result<Self, CatalogError> {
        let title = title.into();
        let subject = subject.into();
        if title.trim().is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        if subject.trim().is_empty() {
            return Err(CatalogError::EmptySubject);
        }
        Ok(Self {
            id,
            title,
            subject,
            difficulty,
            duration_minutes,
            question_count,
            description,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Search and facet filter over the catalog. `None` facets match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub search: Option<String>,
    pub subject: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl CatalogFilter {
    #[must_use]
    pub fn matches(&self, quiz: &QuizInfo) -> bool {
        let matches_search = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            quiz.title.to_lowercase().contains(&term) || quiz.subject.to_lowercase().contains(&term)
        });
        let matches_subject = self
            .subject
            .as_deref()
            .is_none_or(|s| answers_match(s, &quiz.subject));
        let matches_difficulty = self.difficulty.is_none_or(|d| d == quiz.difficulty);

        matches_search && matches_subject && matches_difficulty
    }

    /// Keeps catalog order.
    #[must_use]
    pub fn apply<'a>(&self, quizzes: &'a [QuizInfo]) -> Vec<&'a QuizInfo> {
        quizzes.iter().filter(|q| self.matches(q)).collect()
    }
}
