// src/models/session.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::scoring::{
    session::AttemptSession,
    timer::{FinalizeTrigger, TimerState},
};

/// What happened to a session's graded result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// Graded, persistence in flight.
    Pending,
    Saved {
        attempt_id: i64,
        score: i64,
        total_questions: usize,
    },
    /// Graded, but the attempt could not be stored.
    SaveFailed {
        score: i64,
        total_questions: usize,
        reason: String,
    },
    /// The ledger could not be graded.
    Rejected { reason: String },
}

/// Snapshot of a timed session, as returned to its owner.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub quiz_id: i64,
    pub state: TimerState,
    pub trigger: Option<FinalizeTrigger>,
    pub time_limit: u32,
    pub remaining_seconds: u32,
    pub elapsed_seconds: u32,
    pub total_questions: usize,
    pub answered: usize,
    pub is_complete: bool,
    /// Selected option position per question position.
    pub selections: Vec<Option<usize>>,
    pub outcome: Option<SessionOutcome>,
}

impl SessionView {
    pub fn new(id: Uuid, session: &AttemptSession, outcome: Option<SessionOutcome>) -> Self {
        let timer = session.timer();
        let ledger = session.ledger();
        SessionView {
            id,
            quiz_id: session.quiz().id,
            state: timer.state(),
            trigger: timer.trigger(),
            time_limit: session.quiz().time_limit_secs(),
            remaining_seconds: timer.remaining(),
            elapsed_seconds: timer.elapsed(),
            total_questions: ledger.question_count(),
            answered: ledger.answered_count(),
            is_complete: ledger.is_complete(),
            selections: ledger.selections().to_vec(),
            outcome,
        }
    }
}

/// DTO for selecting an option during a session.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SelectAnswerRequest {
    pub question_index: usize,
    pub option_index: usize,
}
