use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("option {0} cannot be empty")]
    EmptyOption(OptionSlot),

    #[error("correct answer {answer:?} does not match any option")]
    CorrectAnswerNotAnOption { answer: String },
}

//
// ─── OPTION SLOT ───────────────────────────────────────────────────────────────
//

/// Position of an answer option, rendered as a letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionSlot {
    A,
    B,
    C,
    D,
}

impl OptionSlot {
    pub const ALL: [OptionSlot; 4] = [OptionSlot::A, OptionSlot::B, OptionSlot::C, OptionSlot::D];

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            OptionSlot::A => 0,
            OptionSlot::B => 1,
            OptionSlot::C => 2,
            OptionSlot::D => 3,
        }
    }

    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parses `a`-`d` (either case) into a slot.
    #[must_use]
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'A' => Some(OptionSlot::A),
            'B' => Some(OptionSlot::B),
            'C' => Some(OptionSlot::C),
            'D' => Some(OptionSlot::D),
            _ => None,
        }
    }

    #[must_use]
    pub fn letter(self) -> char {
        match self {
            OptionSlot::A => 'A',
            OptionSlot::B => 'B',
            OptionSlot::C => 'C',
            OptionSlot::D => 'D',
        }
    }
}

impl fmt::Display for OptionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Unicode case-insensitive comparison used for grading answers and matching subjects.
#[must_use]
pub fn answers_match(given: &str, expected: &str) -> bool {
    given == expected || given.to_lowercase() == expected.to_lowercase()
}

fn validate_fields(
    text: &str,
    options: &[String; 4],
    correct_answer: &str,
) -> Result<OptionSlot, QuestionError> {
    if text.trim().is_empty() {
        return Err(QuestionError::EmptyText);
    }
    for slot in OptionSlot::ALL {
        if options[slot.index()].trim().is_empty() {
            return Err(QuestionError::EmptyOption(slot));
        }
    }
    OptionSlot::ALL
        .into_iter()
        .find(|slot| answers_match(&options[slot.index()], correct_answer))
        .ok_or_else(|| QuestionError::CorrectAnswerNotAnOption {
            answer: correct_answer.to_owned(),
        })
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice quiz item.
///
/// The correct answer is stored as text and must equal one of the four options
/// ignoring case. `correct_slot` is the first option that does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: [String; 4],
    correct_answer: String,
    correct_slot: OptionSlot,
    subject: Option<String>,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or an option is blank, or if the
    /// correct answer matches none of the options.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: [String; 4],
        correct_answer: impl Into<String>,
        subject: Option<String>,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        let correct_answer = correct_answer.into();
        let correct_slot = validate_fields(&text, &options, &correct_answer)?;
        let subject = subject
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
            correct_slot,
            subject,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String; 4] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, slot: OptionSlot) -> &str {
        &self.options[slot.index()]
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn correct_slot(&self) -> OptionSlot {
        self.correct_slot
    }

    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Text-identity grading: any string equal to the stored answer counts.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        answers_match(answer, &self.correct_answer)
    }

    /// First slot whose option text matches `answer`, preferring exact matches.
    #[must_use]
    pub fn slot_of(&self, answer: &str) -> Option<OptionSlot> {
        OptionSlot::ALL
            .into_iter()
            .find(|slot| self.options[slot.index()] == answer)
            .or_else(|| {
                OptionSlot::ALL
                    .into_iter()
                    .find(|slot| answers_match(&self.options[slot.index()], answer))
            })
    }
}

//
// ─── WIRE SHAPES ───────────────────────────────────────────────────────────────
//

/// Unvalidated question fields as exchanged with the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question_text: String,
    pub option_a: String,
    pub option_b: String,
    pub option_c: String,
    pub option_d: String,
    pub correct_answer: String,
    #[serde(default)]
    pub subject: Option<String>,
}

impl QuestionDraft {
    #[must_use]
    pub fn new(
        question_text: impl Into<String>,
        options: [&str; 4],
        correct_answer: impl Into<String>,
        subject: Option<&str>,
    ) -> Self {
        let [a, b, c, d] = options;
        Self {
            question_text: question_text.into(),
            option_a: a.to_owned(),
            option_b: b.to_owned(),
            option_c: c.to_owned(),
            option_d: d.to_owned(),
            correct_answer: correct_answer.into(),
            subject: subject.map(ToOwned::to_owned),
        }
    }

    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        let [a, b, c, d] = question.options().clone();
        Self {
            question_text: question.text().to_owned(),
            option_a: a,
            option_b: b,
            option_c: c,
            option_d: d,
            correct_answer: question.correct_answer().to_owned(),
            subject: question.subject().map(ToOwned::to_owned),
        }
    }

    fn options(&self) -> [String; 4] {
        [
            self.option_a.clone(),
            self.option_b.clone(),
            self.option_c.clone(),
            self.option_d.clone(),
        ]
    }

    /// Runs the same checks as `Question::new` without assigning an id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the draft cannot become a `Question`.
    pub fn check(&self) -> Result<(), QuestionError> {
        validate_fields(&self.question_text, &self.options(), &self.correct_answer).map(|_| ())
    }

    /// Validates the draft into a `Question` with the given id.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when validation fails.
    pub fn into_question(self, id: QuestionId) -> Result<Question, QuestionError> {
        let options = self.options();
        Question::new(id, self.question_text, options, self.correct_answer, self.subject)
    }
}

/// A question as served by the question bank: id plus draft fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    #[serde(flatten)]
    pub draft: QuestionDraft,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id(),
            draft: QuestionDraft::from_question(question),
        }
    }

    /// # Errors
    ///
    /// Returns `QuestionError` when the record is malformed.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        self.draft.into_question(self.id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options(a: &str, b: &str, c: &str, d: &str) -> [String; 4] {
        [a.into(), b.into(), c.into(), d.into()]
    }

    #[test]
    fn correct_answer_is_matched_ignoring_case() {
        let q = Question::new(
            QuestionId::new(1),
            "Which keyword declares a constant in Java?",
            options("var", "final", "const", "static"),
            "FINAL",
            Some("Java".into()),
        )
        .unwrap();

        assert_eq!(q.correct_slot(), OptionSlot::B);
        assert!(q.is_correct("final"));
        assert!(q.is_correct("Final"));
        assert!(!q.is_correct("static"));
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let err = Question::new(
            QuestionId::new(1),
            "2 + 2?",
            options("1", "2", "3", "5"),
            "4",
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::CorrectAnswerNotAnOption { answer: "4".into() }
        );
    }

    #[test]
    fn blank_fields_are_rejected() {
        let err = Question::new(QuestionId::new(1), "  ", options("a", "b", "c", "d"), "a", None)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyText);

        let err = Question::new(QuestionId::new(1), "Q", options("a", "b", " ", "d"), "a", None)
            .unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption(OptionSlot::C));
    }

    #[test]
    fn blank_subject_is_normalized_away() {
        let q = Question::new(
            QuestionId::new(3),
            "Q",
            options("a", "b", "c", "d"),
            "d",
            Some("  ".into()),
        )
        .unwrap();
        assert_eq!(q.subject(), None);
    }

    #[test]
    fn slot_lookup_prefers_exact_text() {
        let q = Question::new(QuestionId::new(1), "Q", options("x", "X", "y", "z"), "x", None)
            .unwrap();
        assert_eq!(q.slot_of("X"), Some(OptionSlot::B));
        assert_eq!(q.slot_of("Y"), Some(OptionSlot::C));
        assert_eq!(q.slot_of("w"), None);
    }

    #[test]
    fn slot_letters_round_trip() {
        for slot in OptionSlot::ALL {
            assert_eq!(OptionSlot::from_letter(slot.letter()), Some(slot));
            assert_eq!(OptionSlot::from_index(slot.index()), Some(slot));
        }
        assert_eq!(OptionSlot::from_letter('c'), Some(OptionSlot::C));
        assert_eq!(OptionSlot::from_letter('e'), None);
    }

    #[test]
    fn record_deserializes_backend_shape() {
        let json = r#"{
            "id": 7,
            "questionText": "What does CPU stand for?",
            "optionA": "Central Processing Unit",
            "optionB": "Computer Personal Unit",
            "optionC": "Central Program Utility",
            "optionD": "Core Processing Unit",
            "correctAnswer": "Central Processing Unit",
            "subject": null
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, QuestionId::new(7));

        let question = record.into_question().unwrap();
        assert_eq!(question.correct_slot(), OptionSlot::A);
        assert_eq!(question.subject(), None);
    }

    #[test]
    fn draft_check_matches_constructor() {
        let draft = QuestionDraft::new("Q", ["a", "b", "c", "d"], "e", None);
        assert!(matches!(
            draft.check(),
            Err(QuestionError::CorrectAnswerNotAnOption { .. })
        ));
    }
}
