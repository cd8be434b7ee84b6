// src/handlers/session.rs

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::session::{SelectAnswerRequest, SessionView},
    repository::Storage,
    services::sessions::SessionRegistry,
    utils::jwt::Claims,
};

/// Starts a timed attempt. The timer starts counting immediately.
#[utoipa::path(
    post,
    path = "/api/quizzes/{id}/sessions",
    params(("id" = i64, Path, description = "Quiz id")),
    responses(
        (status = 201, description = "Session started", body = SessionView),
        (status = 401, description = "Sign-in required"),
        (status = 404, description = "Unknown quiz")
    ),
    tag = "sessions"
)]
pub async fn start_session(
    State(storage): State<Storage>,
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(quiz_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.start(&storage, claims, quiz_id).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Unknown session")
    ),
    tag = "sessions"
)]
pub async fn get_session(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(sessions.view(id, claims.user_id())?))
}

/// Selects an option. Ignored once the session is finalized.
#[utoipa::path(
    put,
    path = "/api/sessions/{id}/answers",
    params(("id" = Uuid, Path, description = "Session id")),
    request_body = SelectAnswerRequest,
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 400, description = "Index out of range"),
        (status = 404, description = "Unknown session")
    ),
    tag = "sessions"
)]
pub async fn select_answer(
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<SelectAnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.select(id, claims.user_id(), req.question_index, req.option_index)?;
    Ok(Json(view))
}

/// Finalizes the session. Repeated or late submits return the current state.
#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session state", body = SessionView),
        (status = 404, description = "Unknown session"),
        (status = 500, description = "Graded but not saved")
    ),
    tag = "sessions"
)]
pub async fn submit_session(
    State(storage): State<Storage>,
    State(sessions): State<Arc<SessionRegistry>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let view = sessions.submit(&storage, id, claims.user_id()).await?;
    Ok(Json(view))
}
