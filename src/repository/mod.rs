// src/repository/mod.rs

//! Data-access contracts for quizzes, attempts and user profiles.

pub mod memory;
pub mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    attempt::{Attempt, AttemptDetail, AttemptSummary, UserAnswer},
    quiz::{CreateQuizRequest, Quiz, QuizFilter, QuizSummary},
    user::{ProfileUpdate, UserProfile},
};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RepoError {
    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// Stored data that cannot be mapped back into the domain model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                RepoError::Connection(err.to_string())
            }
            other => RepoError::Database(other.to_string()),
        }
    }
}

#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Fetch a quiz with its questions and options, in authoring order.
    async fn get_quiz_by_id(&self, id: i64) -> Result<Option<Quiz>, RepoError>;

    /// List quizzes, newest first.
    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, RepoError>;

    /// Persist a validated quiz with nested questions and options in one unit.
    async fn create_quiz(&self, quiz: &CreateQuizRequest) -> Result<Quiz, RepoError>;
}

#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Persist a graded attempt. `answers` must be in quiz question order.
    async fn save_attempt(
        &self,
        user_id: &str,
        quiz_id: i64,
        score: i64,
        answers: &[UserAnswer],
    ) -> Result<Attempt, RepoError>;

    async fn get_attempt_by_id(&self, id: i64) -> Result<Option<AttemptDetail>, RepoError>;

    /// A user's attempts, most recent first.
    async fn list_attempts_by_user(&self, user_id: &str) -> Result<Vec<AttemptSummary>, RepoError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create or refresh a local profile. Idempotent.
    async fn upsert_user(&self, profile: &ProfileUpdate) -> Result<UserProfile, RepoError>;
}

/// Repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        let repo = Arc::new(postgres::PgRepository::new(pool));
        Self {
            quizzes: repo.clone(),
            attempts: repo.clone(),
            users: repo,
        }
    }

    pub fn in_memory() -> Self {
        let repo = Arc::new(memory::InMemoryRepository::new());
        Self {
            quizzes: repo.clone(),
            attempts: repo.clone(),
            users: repo,
        }
    }
}
