// src/services/attempts.rs

use crate::{
    error::AppError,
    models::attempt::Attempt,
    repository::Storage,
    scoring::grading::GradeReport,
    utils::jwt::Claims,
};

/// Persists a graded attempt for the signed-in user.
///
/// * Upserts the user's local profile from the token's display fields.
/// * Saves the attempt with its answers.
///
/// Any storage failure is logged and returned as `AttemptNotSaved`, which
/// still carries the computed score.
pub async fn record_attempt(
    storage: &Storage,
    identity: &Claims,
    quiz_id: i64,
    report: &GradeReport,
) -> Result<Attempt, AppError> {
    let not_saved = |reason: String| {
        tracing::error!(
            "Failed to save attempt for user {} on quiz {}: {}",
            identity.user_id(),
            quiz_id,
            reason
        );
        AppError::AttemptNotSaved {
            score: report.score,
            total_questions: report.total_questions(),
            reason,
        }
    };

    storage
        .users
        .upsert_user(&identity.profile_update())
        .await
        .map_err(|e| not_saved(e.to_string()))?;

    let attempt = storage
        .attempts
        .save_attempt(identity.user_id(), quiz_id, report.score, &report.answers)
        .await
        .map_err(|e| not_saved(e.to_string()))?;

    tracing::info!(
        "Saved attempt {} for user {}: {}/{}",
        attempt.id,
        attempt.user_id,
        attempt.score,
        report.total_questions()
    );

    Ok(attempt)
}
