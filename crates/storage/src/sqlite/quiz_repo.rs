use quiz_core::model::{QuizId, QuizInfo};

use super::SqliteRepository;
use super::mapping::{difficulty_to_str, id_to_i64, map_quiz_row};
use crate::repository::{QuizRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &QuizInfo) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, subject, difficulty, duration_minutes, question_count, description)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                subject = excluded.subject,
                difficulty = excluded.difficulty,
                duration_minutes = excluded.duration_minutes,
                question_count = excluded.question_count,
                description = excluded.description
            ",
        )
        .bind(id_to_i64("quiz_id", quiz.id().value())?)
        .bind(quiz.title())
        .bind(quiz.subject())
        .bind(difficulty_to_str(quiz.difficulty()))
        .bind(i64::from(quiz.duration_minutes()))
        .bind(i64::from(quiz.question_count()))
        .bind(quiz.description())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<QuizInfo>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, subject, difficulty, duration_minutes, question_count, description
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(id_to_i64("quiz_id", id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        row.as_ref().map(map_quiz_row).transpose()
    }

    async fn list_quizzes(&self) -> Result<Vec<QuizInfo>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, subject, difficulty, duration_minutes, question_count, description
            FROM quizzes
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_quiz_row).collect()
    }
}
