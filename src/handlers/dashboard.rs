// src/handlers/dashboard.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};

use crate::{
    config::Config,
    error::AppError,
    models::stats::DashboardResponse,
    repository::Storage,
    scoring::aggregation::aggregate,
    utils::jwt::Claims,
};

/// Performance dashboard for the signed-in user.
///
/// Statistics cover the full history; only the recent list is capped.
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardResponse),
        (status = 401, description = "Sign-in required")
    ),
    tag = "dashboard"
)]
pub async fn get_dashboard(
    State(storage): State<Storage>,
    State(config): State<Config>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut history = storage
        .attempts
        .list_attempts_by_user(claims.user_id())
        .await?;

    let stats = aggregate(&history);
    history.truncate(config.recent_attempts_limit);

    Ok(Json(DashboardResponse {
        recent_attempts: history,
        stats,
    }))
}
