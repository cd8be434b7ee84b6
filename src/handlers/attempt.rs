// src/handlers/attempt.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::{
    error::AppError,
    models::attempt::{AttemptReview, SubmissionResponse, SubmitAttemptRequest},
    repository::Storage,
    scoring::{grading::grade, ledger::AnswerLedger},
    services::attempts::record_attempt,
    utils::jwt::Claims,
};

/// Submits a whole attempt and grades it server-side.
///
/// * Loads the selections into a ledger (question position -> option position).
/// * Grades against the stored quiz; unanswered questions score nothing.
/// * Persists the attempt for the signed-in user.
#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/attempts",
    params(("id" = i64, Path, description = "Quiz id")),
    request_body = SubmitAttemptRequest,
    responses(
        (status = 200, description = "Graded and saved", body = SubmissionResponse),
        (status = 400, description = "Selections do not fit the quiz"),
        (status = 401, description = "Sign-in required"),
        (status = 404, description = "Unknown quiz"),
        (status = 500, description = "Graded but not saved")
    ),
    tag = "attempts"
)]
pub async fn submit_attempt(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
    Json(req): Json<SubmitAttemptRequest>,
) -> Result<impl IntoResponse, AppError> {
    let quiz = storage
        .quizzes
        .get_quiz_by_id(quiz_id)
        .await?
        .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

    let mut selections: Vec<(usize, usize)> = req.answers.into_iter().collect();
    selections.sort_unstable();
    let ledger = AnswerLedger::from_selections(quiz.questions.len(), selections)?;
    let report = grade(&quiz, &ledger)?;

    let attempt = record_attempt(&storage, &claims, quiz.id, &report).await?;

    Ok(Json(SubmissionResponse {
        attempt_id: attempt.id,
        quiz_id: attempt.quiz_id,
        score: attempt.score,
        total_questions: report.total_questions(),
        user_answers: attempt.user_answers,
        completed_at: attempt.completed_at,
    }))
}

/// Retrieves a past attempt for review. Only its owner can see it.
#[utoipa::path(
    get,
    path = "/api/attempts/{id}",
    params(("id" = i64, Path, description = "Attempt id")),
    responses(
        (status = 200, description = "Attempt review", body = AttemptReview),
        (status = 401, description = "Sign-in required"),
        (status = 404, description = "Unknown attempt")
    ),
    tag = "attempts"
)]
pub async fn get_attempt(
    State(storage): State<Storage>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let detail = storage
        .attempts
        .get_attempt_by_id(id)
        .await?
        .filter(|d| d.attempt.user_id == claims.user_id())
        .ok_or(AppError::NotFound("Attempt not found".to_string()))?;

    Ok(Json(AttemptReview::from(detail)))
}
