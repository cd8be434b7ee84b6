// src/handlers/quiz.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::quiz::{CreateQuizRequest, PublicQuiz, Quiz, QuizFilter, QuizSummary},
    repository::Storage,
    utils::html::sanitize_quiz,
};

/// Lists quizzes, newest first, optionally filtered by difficulty and category.
#[utoipa::path(
    get,
    path = "/api/quizzes",
    params(QuizFilter),
    responses((status = 200, description = "Quizzes", body = [QuizSummary])),
    tag = "quizzes"
)]
pub async fn list_quizzes(
    State(storage): State<Storage>,
    Query(filter): Query<QuizFilter>,
) -> Result<impl IntoResponse, AppError> {
    let quizzes = storage.quizzes.list_quizzes(&filter).await?;
    tracing::debug!("Fetched {} quizzes", quizzes.len());
    Ok(Json(quizzes))
}

/// Retrieves a quiz for taking. Correct answers are not included.
#[utoipa::path(
    get,
    path = "/api/quizzes/{id}",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 200, description = "Quiz without answers", body = PublicQuiz),
        (status = 404, description = "Unknown quiz")
    ),
    tag = "quizzes"
)]
pub async fn get_quiz(
    State(storage): State<Storage>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = storage
        .quizzes
        .get_quiz_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(quiz.to_public()))
}

/// Authors a new quiz with its questions and options.
///
/// * Sanitizes free text, then validates what will be stored
///   (1+ questions, 2-6 options, at least one correct option).
#[utoipa::path(
    post,
    path = "/api/quizzes",
    request_body = CreateQuizRequest,
    responses(
        (status = 201, description = "Quiz created", body = Quiz),
        (status = 400, description = "Invalid quiz"),
        (status = 401, description = "Sign-in required")
    ),
    tag = "quizzes"
)]
pub async fn create_quiz(
    State(storage): State<Storage>,
    Json(payload): Json<CreateQuizRequest>,
) -> Result<impl IntoResponse, AppError> {
    let payload = sanitize_quiz(payload);
    payload.validate()?;

    let quiz = storage.quizzes.create_quiz(&payload).await?;
    tracing::info!("Created quiz {} ({} questions)", quiz.id, quiz.question_count);

    Ok((StatusCode::CREATED, Json(quiz)))
}
