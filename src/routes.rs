// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{attempt, dashboard, quiz, session},
    openapi::openapi_json,
    state::AppState,
    utils::jwt::auth_middleware,
};

/// Assembles the main application router.
///
/// * Public: quiz catalogue, quiz detail, API document.
/// * Protected: authoring, attempts, sessions, dashboard.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let origins = [
        HeaderValue::from_static("http://localhost:3000"),
        HeaderValue::from_static("http://127.0.0.1:3000"),
    ];

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let quiz_routes = Router::new()
        .route("/", get(quiz::list_quizzes))
        .route("/{id}", get(quiz::get_quiz))
        // Protected quiz routes
        .merge(
            Router::new()
                .route("/", post(quiz::create_quiz))
                .route("/{id}/attempts", post(attempt::submit_attempt))
                .route("/{id}/sessions", post(session::start_session))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let session_routes = Router::new()
        .route("/{id}", get(session::get_session))
        .route("/{id}/answers", put(session::select_answer))
        .route("/{id}/submit", post(session::submit_session))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let attempt_routes = Router::new()
        .route("/{id}", get(attempt::get_attempt))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let dashboard_routes = Router::new()
        .route("/", get(dashboard::get_dashboard))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/quizzes", quiz_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/attempts", attempt_routes)
        .nest("/api/dashboard", dashboard_routes)
        .route("/api-docs/openapi.json", get(openapi_json))
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
