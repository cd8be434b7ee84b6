// src/openapi.rs

use axum::Json;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    handlers::{attempt, dashboard, quiz, session},
    models::{
        attempt::{
            AnswerDetail, Attempt, AttemptReview, AttemptSummary, SubmissionResponse,
            SubmitAttemptRequest, UserAnswer,
        },
        quiz::{
            AnswerOption, CreateOptionRequest, CreateQuestionRequest, CreateQuizRequest,
            Difficulty, PublicOption, PublicQuestion, PublicQuiz, Question, QuestionType, Quiz,
            QuizSummary,
        },
        session::{SelectAnswerRequest, SessionOutcome, SessionView},
        stats::{AggregateStats, CategoryPerformance, DashboardResponse, ImprovementScore, Trend},
    },
    scoring::timer::{FinalizeTrigger, TimerState},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::list_quizzes,
        quiz::get_quiz,
        quiz::create_quiz,
        attempt::submit_attempt,
        attempt::get_attempt,
        session::start_session,
        session::get_session,
        session::select_answer,
        session::submit_session,
        dashboard::get_dashboard,
    ),
    components(schemas(
        Difficulty,
        QuestionType,
        AnswerOption,
        Question,
        Quiz,
        QuizSummary,
        PublicQuiz,
        PublicQuestion,
        PublicOption,
        CreateQuizRequest,
        CreateQuestionRequest,
        CreateOptionRequest,
        UserAnswer,
        Attempt,
        AttemptSummary,
        AnswerDetail,
        SubmitAttemptRequest,
        SubmissionResponse,
        AttemptReview,
        SessionView,
        SessionOutcome,
        SelectAnswerRequest,
        TimerState,
        FinalizeTrigger,
        Trend,
        ImprovementScore,
        CategoryPerformance,
        AggregateStats,
        DashboardResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "quizzes", description = "Quiz catalogue and authoring"),
        (name = "attempts", description = "One-shot submission and review"),
        (name = "sessions", description = "Timed attempts"),
        (name = "dashboard", description = "Performance analytics"),
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/quizzes",
            "/api/quizzes/{id}",
            "/api/quizzes/{id}/attempts",
            "/api/quizzes/{id}/sessions",
            "/api/sessions/{id}",
            "/api/sessions/{id}/answers",
            "/api/sessions/{id}/submit",
            "/api/attempts/{id}",
            "/api/dashboard",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
