use quiz_core::model::{Difficulty, QuestionDraft, QuestionId, Question, QuizId, QuizInfo};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    Ok(QuestionId::new(i64_to_u64("question_id", v)?))
}

pub(crate) fn id_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn difficulty_to_str(d: Difficulty) -> &'static str {
    match d {
        Difficulty::Easy => "easy",
        Difficulty::Medium => "medium",
        Difficulty::Hard => "hard",
    }
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?;
    let draft = QuestionDraft {
        question_text: row.try_get("question_text").map_err(ser)?,
        option_a: row.try_get("option_a").map_err(ser)?,
        option_b: row.try_get("option_b").map_err(ser)?,
        option_c: row.try_get("option_c").map_err(ser)?,
        option_d: row.try_get("option_d").map_err(ser)?,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        subject: row.try_get("subject").map_err(ser)?,
    };
    draft
        .into_question(id)
        .map_err(|e| StorageError::Serialization(format!("question {id}: {e}")))
}

pub(crate) fn map_quiz_row(row: &SqliteRow) -> Result<QuizInfo, StorageError> {
    let id = QuizId::new(i64_to_u64("quiz_id", row.try_get::<i64, _>("id").map_err(ser)?)?);
    let difficulty = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse::<Difficulty>()
        .map_err(ser)?;

    QuizInfo::new(
        id,
        row.try_get::<String, _>("title").map_err(ser)?,
        row.try_get::<String, _>("subject").map_err(ser)?,
        difficulty,
        i64_to_u32("duration_minutes", row.try_get("duration_minutes").map_err(ser)?)?,
        i64_to_u32("question_count", row.try_get("question_count").map_err(ser)?)?,
        row.try_get::<Option<String>, _>("description").map_err(ser)?,
    )
    .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_ids_are_rejected() {
        assert!(matches!(
            question_id_from_i64(-1),
            Err(StorageError::Serialization(_))
        ));
        assert_eq!(question_id_from_i64(5).unwrap(), QuestionId::new(5));
    }

    #[test]
    fn difficulty_column_round_trips() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(difficulty_to_str(d).parse::<Difficulty>().unwrap(), d);
        }
    }
}
