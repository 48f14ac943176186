use quiz_core::model::{Question, QuestionDraft, QuestionId, answers_match};
use sqlx::{Sqlite, SqliteExecutor};
use tracing::debug;

use super::SqliteRepository;
use super::mapping::{id_to_i64, map_question_row, question_id_from_i64};
use crate::repository::{QuestionRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

const SELECT_COLUMNS: &str = r"
    SELECT id, question_text, option_a, option_b, option_c, option_d, correct_answer, subject
    FROM questions
";

async fn insert_one<'e, E>(executor: E, draft: &QuestionDraft) -> Result<QuestionId, StorageError>
where
    E: SqliteExecutor<'e>,
{
    let res = sqlx::query::<Sqlite>(
        r"
        INSERT INTO questions (question_text, option_a, option_b, option_c, option_d, correct_answer, subject)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ",
    )
    .bind(draft.question_text.as_str())
    .bind(draft.option_a.as_str())
    .bind(draft.option_b.as_str())
    .bind(draft.option_c.as_str())
    .bind(draft.option_d.as_str())
    .bind(draft.correct_answer.as_str())
    .bind(draft.subject.as_deref())
    .execute(executor)
    .await
    .map_err(conn)?;

    question_id_from_i64(res.last_insert_rowid())
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn list_questions(&self, subject: Option<&str>) -> Result<Vec<Question>, StorageError> {
        let sql = format!("{SELECT_COLUMNS} ORDER BY id ASC");
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        // SQLite's NOCASE only folds ASCII; match subjects the same way as every other backend.
        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            let question = map_question_row(&row)?;
            let keep = match subject {
                Some(wanted) => question.subject().is_some_and(|s| answers_match(s, wanted)),
                None => true,
            };
            if keep {
                questions.push(question);
            }
        }
        debug!(count = questions.len(), ?subject, "listed questions");
        Ok(questions)
    }

    async fn get_question(&self, id: QuestionId) -> Result<Option<Question>, StorageError> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query(&sql)
            .bind(id_to_i64("question_id", id.value())?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        row.as_ref().map(map_question_row).transpose()
    }

    async fn insert_question(&self, draft: &QuestionDraft) -> Result<QuestionId, StorageError> {
        draft.check()?;
        insert_one(&self.pool, draft).await
    }

    async fn insert_questions(
        &self,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionId>, StorageError> {
        for draft in drafts {
            draft.check()?;
        }

        let mut tx = self.pool.begin().await.map_err(conn)?;
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            ids.push(insert_one(&mut *tx, draft).await?);
        }
        tx.commit().await.map_err(conn)?;
        Ok(ids)
    }

    async fn update_question(
        &self,
        id: QuestionId,
        draft: &QuestionDraft,
    ) -> Result<Question, StorageError> {
        let question = draft.clone().into_question(id)?;

        let res = sqlx::query(
            r"
            UPDATE questions SET
                question_text = ?2,
                option_a = ?3,
                option_b = ?4,
                option_c = ?5,
                option_d = ?6,
                correct_answer = ?7,
                subject = ?8
            WHERE id = ?1
            ",
        )
        .bind(id_to_i64("question_id", id.value())?)
        .bind(draft.question_text.as_str())
        .bind(draft.option_a.as_str())
        .bind(draft.option_b.as_str())
        .bind(draft.option_c.as_str())
        .bind(draft.option_d.as_str())
        .bind(draft.correct_answer.as_str())
        .bind(question.subject())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(question)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<(), StorageError> {
        let res = sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id_to_i64("question_id", id.value())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}
