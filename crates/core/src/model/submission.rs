use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::{Question, answers_match};
use crate::model::session::AnsweredQuestion;

/// One answer as sent for grading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAnswer {
    pub question_id: QuestionId,
    pub answer: String,
}

/// A full set of answers for server-side grading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizSubmission {
    pub answers: Vec<UserAnswer>,
}

impl QuizSubmission {
    #[must_use]
    pub fn from_answers(answers: &[AnsweredQuestion]) -> Self {
        Self {
            answers: answers
                .iter()
                .map(|a| UserAnswer {
                    question_id: a.question_id,
                    answer: a.selected.clone(),
                })
                .collect(),
        }
    }
}

/// Score returned for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub score: u32,
    pub total: u32,
}

/// Grades a submission against the given questions.
///
/// Answers for unknown question ids score nothing but still count toward the
/// total.
#[must_use]
pub fn grade_submission(questions: &[Question], submission: &QuizSubmission) -> SubmitResponse {
    let score = submission
        .answers
        .iter()
        .filter(|answer| {
            questions
                .iter()
                .find(|q| q.id() == answer.question_id)
                .is_some_and(|q| answers_match(&answer.answer, q.correct_answer()))
        })
        .count();

    SubmitResponse {
        score: u32::try_from(score).unwrap_or(u32::MAX),
        total: u32::try_from(submission.answers.len()).unwrap_or(u32::MAX),
    }
}
