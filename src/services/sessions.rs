// src/services/sessions.rs

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use tokio::time::MissedTickBehavior;
use uuid::Uuid;

use crate::{
    config::Config,
    error::AppError,
    models::session::{SessionOutcome, SessionView},
    repository::Storage,
    scoring::session::{AttemptSession, Finalization},
    services::attempts::record_attempt,
    utils::jwt::Claims,
};

struct SessionSlot {
    session: AttemptSession,
    outcome: Option<SessionOutcome>,
    finalized_at: Option<Instant>,
}

enum TickStep {
    Running,
    Finalized(Finalization),
    Done,
}

/// A live session with its owner's identity.
pub struct SessionHandle {
    id: Uuid,
    identity: Claims,
    slot: Mutex<SessionSlot>,
}

impl SessionHandle {
    fn new(identity: Claims, session: AttemptSession) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            slot: Mutex::new(SessionSlot {
                session,
                outcome: None,
                finalized_at: None,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, SessionSlot>, AppError> {
        self.slot
            .lock()
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    fn view(&self) -> Result<SessionView, AppError> {
        let slot = self.lock()?;
        Ok(SessionView::new(self.id, &slot.session, slot.outcome.clone()))
    }

    fn select(&self, question: usize, option: usize) -> Result<SessionView, AppError> {
        let mut slot = self.lock()?;
        slot.session.select(question, option)?;
        Ok(SessionView::new(self.id, &slot.session, slot.outcome.clone()))
    }

    fn tick(&self) -> Result<TickStep, AppError> {
        let mut slot = self.lock()?;
        if slot.session.is_finalized() {
            return Ok(TickStep::Done);
        }
        Ok(match slot.session.tick() {
            Some(fin) => {
                slot.outcome = Some(SessionOutcome::Pending);
                slot.finalized_at = Some(Instant::now());
                TickStep::Finalized(fin)
            }
            None => TickStep::Running,
        })
    }

    /// Manual submit. Only the call that finalizes the session persists it.
    ///
    /// The save runs on its own task, so it completes even if the caller
    /// goes away mid-request.
    async fn submit(self: &Arc<Self>, storage: &Storage) -> Result<SessionView, AppError> {
        let fin = {
            let mut slot = self.lock()?;
            let fin = slot.session.submit();
            if fin.is_some() {
                slot.outcome = Some(SessionOutcome::Pending);
                slot.finalized_at = Some(Instant::now());
            }
            fin
        };

        if let Some(fin) = fin {
            let handle = self.clone();
            let storage = storage.clone();
            tokio::spawn(async move { handle.complete(&storage, fin).await })
                .await
                .map_err(|e| AppError::InternalServerError(e.to_string()))??;
        }
        self.view()
    }

    /// Persists a finalization and records the outcome on the session.
    async fn complete(&self, storage: &Storage, fin: Finalization) -> Result<(), AppError> {
        let quiz_id = self.lock()?.session.quiz().id;
        tracing::info!("Session {} on quiz {} finalized ({:?})", self.id, quiz_id, fin.trigger);

        let (outcome, result) = match fin.result {
            Ok(report) => match record_attempt(storage, &self.identity, quiz_id, &report).await {
                Ok(attempt) => (
                    SessionOutcome::Saved {
                        attempt_id: attempt.id,
                        score: attempt.score,
                        total_questions: report.total_questions(),
                    },
                    Ok(()),
                ),
                Err(e) => (
                    SessionOutcome::SaveFailed {
                        score: report.score,
                        total_questions: report.total_questions(),
                        reason: e.to_string(),
                    },
                    Err(e),
                ),
            },
            Err(e) => {
                tracing::warn!("Session {} could not be graded: {}", self.id, e);
                (
                    SessionOutcome::Rejected {
                        reason: e.to_string(),
                    },
                    Err(AppError::from(e)),
                )
            }
        };

        self.lock()?.outcome = Some(outcome);
        result
    }

    fn expired_for(&self, retention: Duration) -> bool {
        match self.slot.lock() {
            Ok(slot) => slot
                .finalized_at
                .is_some_and(|at| at.elapsed() >= retention),
            Err(_) => true,
        }
    }
}

/// Countdown driver: ticks the session timer until the session is finalized.
async fn run_countdown(storage: Storage, handle: Arc<SessionHandle>, tick: Duration) {
    let mut interval = tokio::time::interval(tick);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        match handle.tick() {
            Ok(TickStep::Running) => continue,
            Ok(TickStep::Done) => return,
            Ok(TickStep::Finalized(fin)) => {
                if let Err(e) = handle.complete(&storage, fin).await {
                    tracing::debug!("Session {} expired without a saved attempt: {}", handle.id, e);
                }
                return;
            }
            Err(e) => {
                tracing::error!("Countdown for session {} stopped: {}", handle.id, e);
                return;
            }
        }
    }
}

/// Live attempt sessions, one per started timed attempt.
pub struct SessionRegistry {
    sessions: Mutex<HashMap<Uuid, Arc<SessionHandle>>>,
    tick: Duration,
    retention: Duration,
}

impl SessionRegistry {
    pub fn new(tick: Duration, retention: Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            tick,
            retention,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.timer_tick(), config.session_retention())
    }

    fn sessions(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Arc<SessionHandle>>>, AppError> {
        self.sessions
            .lock()
            .map_err(|e| AppError::InternalServerError(e.to_string()))
    }

    /// Starts a timed session on a quiz and spawns its countdown.
    pub async fn start(
        &self,
        storage: &Storage,
        identity: Claims,
        quiz_id: i64,
    ) -> Result<SessionView, AppError> {
        let quiz = storage
            .quizzes
            .get_quiz_by_id(quiz_id)
            .await?
            .ok_or(AppError::NotFound("Quiz not found".to_string()))?;

        let session = AttemptSession::start(Arc::new(quiz))?;
        let handle = Arc::new(SessionHandle::new(identity, session));

        {
            let mut sessions = self.sessions()?;
            sessions.retain(|_, h| !h.expired_for(self.retention));
            sessions.insert(handle.id, handle.clone());
        }

        tracing::info!(
            "Session {} started on quiz {} for user {}",
            handle.id,
            quiz_id,
            handle.identity.user_id()
        );
        tokio::spawn(run_countdown(storage.clone(), handle.clone(), self.tick));

        handle.view()
    }

    /// Looks up a session owned by `user_id`. Other users' sessions read as missing.
    fn handle(&self, id: Uuid, user_id: &str) -> Result<Arc<SessionHandle>, AppError> {
        self.sessions()?
            .get(&id)
            .filter(|h| h.identity.user_id() == user_id)
            .cloned()
            .ok_or(AppError::NotFound("Session not found".to_string()))
    }

    pub fn view(&self, id: Uuid, user_id: &str) -> Result<SessionView, AppError> {
        self.handle(id, user_id)?.view()
    }

    pub fn select(
        &self,
        id: Uuid,
        user_id: &str,
        question: usize,
        option: usize,
    ) -> Result<SessionView, AppError> {
        self.handle(id, user_id)?.select(question, option)
    }

    pub async fn submit(
        &self,
        storage: &Storage,
        id: Uuid,
        user_id: &str,
    ) -> Result<SessionView, AppError> {
        let handle = self.handle(id, user_id)?;
        handle.submit(storage).await
    }
}
