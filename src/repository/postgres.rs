// src/repository/postgres.rs

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use super::{AttemptRepository, QuizRepository, RepoError, UserRepository};
use crate::models::{
    attempt::{AnswerDetail, Attempt, AttemptDetail, AttemptSummary, UserAnswer},
    quiz::{AnswerOption, CreateQuizRequest, Question, Quiz, QuizFilter, QuizSummary},
    user::{ProfileUpdate, UserProfile},
};

/// Row of the 'quizzes' table.
#[derive(FromRow)]
struct QuizRow {
    id: i64,
    title: String,
    description: Option<String>,
    question_count: i32,
    time_limit: i32,
    difficulty: String,
    category: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl QuizRow {
    fn into_summary(self) -> Result<QuizSummary, RepoError> {
        Ok(QuizSummary {
            id: self.id,
            title: self.title,
            description: self.description,
            question_count: self.question_count,
            time_limit: self.time_limit,
            difficulty: self.difficulty.parse().map_err(RepoError::Corrupt)?,
            category: self.category,
            created_at: self.created_at,
        })
    }
}

#[derive(FromRow)]
struct QuestionRow {
    id: i64,
    text: String,
    #[sqlx(rename = "type")]
    question_type: String,
    difficulty: String,
}

#[derive(FromRow)]
struct OptionRow {
    id: i64,
    question_id: i64,
    text: String,
    is_correct: bool,
}

#[derive(FromRow)]
struct AttemptRow {
    id: i64,
    quiz_id: i64,
    user_id: String,
    score: i64,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(FromRow)]
struct AnswerRow {
    question_id: i64,
    question_text: String,
    selected_option_id: i64,
    is_correct: bool,
}

#[derive(FromRow)]
struct AttemptSummaryRow {
    id: i64,
    quiz_id: i64,
    quiz_title: String,
    category: String,
    question_count: i32,
    time_limit: i32,
    score: Option<i64>,
    completed_at: Option<chrono::DateTime<chrono::Utc>>,
}

const QUIZ_COLUMNS: &str =
    "id, title, description, question_count, time_limit, difficulty, category, created_at";

/// PostgreSQL-backed repository.
#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Options of the given questions, grouped by question and kept in position order.
    async fn fetch_options(
        &self,
        question_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<AnswerOption>>, RepoError> {
        let rows = sqlx::query_as::<_, OptionRow>(
            r#"
            SELECT id, question_id, text, is_correct
            FROM options
            WHERE question_id = ANY($1)
            ORDER BY question_id, position
            "#,
        )
        .bind(question_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: HashMap<i64, Vec<AnswerOption>> = HashMap::new();
        for row in rows {
            grouped.entry(row.question_id).or_default().push(AnswerOption {
                id: row.id,
                text: row.text,
                is_correct: row.is_correct,
            });
        }
        Ok(grouped)
    }
}

#[async_trait]
impl QuizRepository for PgRepository {
    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>, RepoError> {
        let Some(row) = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {} FROM quizzes WHERE id = $1",
            QUIZ_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let question_rows = sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT id, text, type, difficulty
            FROM questions
            WHERE quiz_id = $1
            ORDER BY position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = question_rows.iter().map(|q| q.id).collect();
        let mut options = self.fetch_options(&ids).await?;

        let mut questions = Vec::with_capacity(question_rows.len());
        for q in question_rows {
            questions.push(Question {
                id: q.id,
                text: q.text,
                question_type: q.question_type.parse().map_err(RepoError::Corrupt)?,
                difficulty: q.difficulty.parse().map_err(RepoError::Corrupt)?,
                options: options.remove(&q.id).unwrap_or_default(),
            });
        }

        let summary = row.into_summary()?;
        Ok(Some(Quiz {
            id: summary.id,
            title: summary.title,
            description: summary.description,
            question_count: summary.question_count,
            time_limit: summary.time_limit,
            difficulty: summary.difficulty,
            category: summary.category,
            created_at: summary.created_at,
            questions,
        }))
    }

    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, RepoError> {
        let rows = sqlx::query_as::<_, QuizRow>(&format!(
            r#"
            SELECT {}
            FROM quizzes
            WHERE ($1::TEXT IS NULL OR difficulty = $1)
              AND ($2::TEXT IS NULL OR category = $2)
            ORDER BY created_at DESC, id DESC
            "#,
            QUIZ_COLUMNS
        ))
        .bind(filter.difficulty.map(|d| d.as_str()))
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quizzes: {:?}", e);
            RepoError::from(e)
        })?;

        rows.into_iter().map(QuizRow::into_summary).collect()
    }

    async fn create_quiz(&self, req: &CreateQuizRequest) -> Result<Quiz, RepoError> {
        let mut tx = self.pool.begin().await?;

        let quiz_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO quizzes (title, description, question_count, time_limit, difficulty, category)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.questions.len() as i32)
        .bind(req.time_limit)
        .bind(req.difficulty.as_str())
        .bind(&req.category)
        .fetch_one(&mut *tx)
        .await?;

        for (q_pos, question) in req.questions.iter().enumerate() {
            let question_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO questions (quiz_id, position, text, type, difficulty, category)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(quiz_id)
            .bind(q_pos as i32)
            .bind(&question.text)
            .bind(question.question_type.as_str())
            .bind(question.difficulty.as_str())
            .bind(&req.category)
            .fetch_one(&mut *tx)
            .await?;

            for (o_pos, option) in question.options.iter().enumerate() {
                sqlx::query(
                    r#"
                    INSERT INTO options (question_id, position, text, is_correct)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(question_id)
                .bind(o_pos as i32)
                .bind(&option.text)
                .bind(option.is_correct)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;

        self.get_quiz_by_id(quiz_id)
            .await?
            .ok_or_else(|| RepoError::Database(format!("quiz {} vanished after insert", quiz_id)))
    }
}

#[async_trait]
impl AttemptRepository for PgRepository {
    async fn save_attempt(
        &self,
        user_id: &str,
        quiz_id: i64,
        score: i64,
        answers: &[UserAnswer],
    ) -> Result<Attempt, RepoError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, AttemptRow>(
            r#"
            INSERT INTO quiz_attempts (user_id, quiz_id, score)
            VALUES ($1, $2, $3)
            RETURNING id, quiz_id, user_id, score, completed_at
            "#,
        )
        .bind(user_id)
        .bind(quiz_id)
        .bind(score)
        .fetch_one(&mut *tx)
        .await?;

        for (pos, answer) in answers.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO user_answers (attempt_id, position, question_id, selected_option_id, is_correct)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(row.id)
            .bind(pos as i32)
            .bind(answer.question_id)
            .bind(answer.selected_option_id)
            .bind(answer.is_correct)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(Attempt {
            id: row.id,
            quiz_id: row.quiz_id,
            user_id: row.user_id,
            score: row.score,
            user_answers: answers.to_vec(),
            completed_at: row.completed_at,
        })
    }

    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<AttemptDetail>, RepoError> {
        let Some(row) = sqlx::query_as::<_, AttemptRow>(
            "SELECT id, quiz_id, user_id, score, completed_at FROM quiz_attempts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };

        let quiz = sqlx::query_as::<_, QuizRow>(&format!(
            "SELECT {} FROM quizzes WHERE id = $1",
            QUIZ_COLUMNS
        ))
        .bind(row.quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::Corrupt(format!("attempt {} has no quiz", id)))?
        .into_summary()?;

        let answer_rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT ua.question_id, q.text AS question_text, ua.selected_option_id, ua.is_correct
            FROM user_answers ua
            JOIN questions q ON q.id = ua.question_id
            WHERE ua.attempt_id = $1
            ORDER BY ua.position
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let question_ids: Vec<i64> = answer_rows.iter().map(|a| a.question_id).collect();
        let options = self.fetch_options(&question_ids).await?;

        let user_answers = answer_rows
            .iter()
            .map(|a| UserAnswer {
                question_id: a.question_id,
                selected_option_id: a.selected_option_id,
                is_correct: a.is_correct,
            })
            .collect();

        let answers = answer_rows
            .into_iter()
            .map(|a| AnswerDetail {
                options: options.get(&a.question_id).cloned().unwrap_or_default(),
                question_id: a.question_id,
                question_text: a.question_text,
                selected_option_id: a.selected_option_id,
                is_correct: a.is_correct,
            })
            .collect();

        Ok(Some(AttemptDetail {
            attempt: Attempt {
                id: row.id,
                quiz_id: row.quiz_id,
                user_id: row.user_id,
                score: row.score,
                user_answers,
                completed_at: row.completed_at,
            },
            quiz,
            answers,
        }))
    }

    async fn list_attempts_by_user(&self, user_id: &str) -> Result<Vec<AttemptSummary>, RepoError> {
        let rows = sqlx::query_as::<_, AttemptSummaryRow>(
            r#"
            SELECT
                a.id, a.quiz_id, q.title AS quiz_title, q.category,
                q.question_count, q.time_limit, a.score, a.completed_at
            FROM quiz_attempts a
            JOIN quizzes q ON q.id = a.quiz_id
            WHERE a.user_id = $1
            ORDER BY a.completed_at DESC, a.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list attempts for {}: {:?}", user_id, e);
            RepoError::from(e)
        })?;

        Ok(rows
            .into_iter()
            .map(|r| AttemptSummary {
                id: r.id,
                quiz_id: r.quiz_id,
                quiz_title: r.quiz_title,
                category: r.category,
                question_count: r.question_count,
                time_limit: r.time_limit,
                score: r.score,
                completed_at: r.completed_at,
            })
            .collect())
    }
}

#[async_trait]
impl UserRepository for PgRepository {
    async fn upsert_user(&self, profile: &ProfileUpdate) -> Result<UserProfile, RepoError> {
        let user = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (id, name, email, email_verified, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                email_verified = EXCLUDED.email_verified,
                image = EXCLUDED.image,
                updated_at = NOW()
            RETURNING id, name, email, email_verified, image, created_at
            "#,
        )
        .bind(&profile.id)
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(profile.email_verified)
        .bind(&profile.image)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }
}
