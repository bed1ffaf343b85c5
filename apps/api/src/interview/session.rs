//! In-memory interview sessions. One session per interview; "start new" removes it.
//!
//! The store lock is only held for short synchronous updates, never across a model
//! call. `in_flight` marks a session whose model call is pending so a second
//! request against it is refused instead of interleaving. `InFlightGuard` clears
//! that mark again if the request is dropped before it commits.
//!
//! Sessions idle for longer than the store's TTL are evicted by `prune_idle`, run
//! periodically by the task from `spawn_idle_sweep`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::segmenter::FeedbackReport;
use crate::interview::models::{ChatMessage, InterviewDetails, InterviewState};
use crate::llm_client::ChatTurn;

/// Shown when a request targets a session that does not exist.
pub const SESSION_NOT_STARTED: &str =
    "The interview session has not been started. Please start over.";

pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub details: InterviewDetails,
    pub state: InterviewState,
    pub transcript: Vec<ChatMessage>,
    /// Turns committed to the model conversation. Failed exchanges are not recorded.
    #[serde(skip)]
    pub model_history: Vec<ChatTurn>,
    pub feedback: Option<FeedbackReport>,
    #[serde(skip)]
    pub in_flight: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Monotonic twin of `updated_at`, used for idle eviction.
    #[serde(skip)]
    pub last_active: Instant,
}

impl InterviewSession {
    /// A session that has received its opening question and is ready for answers.
    pub fn opened(details: InterviewDetails, opening_prompt: String, first_question: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            details,
            state: InterviewState::Interviewing,
            transcript: vec![ChatMessage::ai(first_question.clone())],
            model_history: vec![
                ChatTurn::user(opening_prompt),
                ChatTurn::assistant(first_question),
            ],
            feedback: None,
            in_flight: false,
            created_at: now,
            updated_at: now,
            last_active: Instant::now(),
        }
    }

    /// Refuses work unless the session is in `expected` state and idle.
    pub fn ensure_ready(&self, expected: InterviewState) -> Result<(), AppError> {
        if self.in_flight {
            return Err(AppError::Conflict(
                "A reply is already being prepared for this interview".to_string(),
            ));
        }
        if self.state != expected {
            return Err(AppError::Conflict(format!(
                "Interview {} is in state {:?}, expected {:?}",
                self.id, self.state, expected
            )));
        }
        Ok(())
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_active = Instant::now();
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, InterviewSession>>>,
    idle_ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_idle_ttl(DEFAULT_IDLE_TTL)
    }
}

impl SessionStore {
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            idle_ttl,
        }
    }

    pub async fn insert(&self, session: InterviewSession) {
        self.sessions.write().await.insert(session.id, session);
    }

    pub async fn get(&self, id: Uuid) -> Result<InterviewSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(not_started)
    }

    /// Applies `f` to the session under the write lock.
    pub async fn update<T>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut InterviewSession) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(not_started)?;
        f(session)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(not_started)
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions idle for longer than the TTL. In-flight sessions are kept.
    pub async fn prune_idle(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| {
            session.in_flight || session.last_active.elapsed() <= self.idle_ttl
        });
        before - sessions.len()
    }

    /// Runs `prune_idle` every `every` on the current runtime.
    pub fn spawn_idle_sweep(&self, every: Duration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = store.prune_idle().await;
                if evicted > 0 {
                    info!(evicted, "Evicted idle interview sessions");
                }
            }
        })
    }

    /// Marks the session in flight after `f` succeeds and returns a guard that
    /// clears the mark (restoring `rollback_state`) unless disarmed after commit.
    pub async fn begin<T>(
        &self,
        id: Uuid,
        rollback_state: InterviewState,
        f: impl FnOnce(&mut InterviewSession) -> Result<T, AppError>,
    ) -> Result<(T, InFlightGuard), AppError> {
        let value = self
            .update(id, |session| {
                let value = f(session)?;
                session.in_flight = true;
                Ok(value)
            })
            .await?;
        let guard = InFlightGuard {
            store: self.clone(),
            id,
            rollback_state,
            armed: true,
        };
        Ok((value, guard))
    }
}

/// Releases a session's in-flight mark when a request is dropped mid model call.
pub struct InFlightGuard {
    store: SessionStore,
    id: Uuid,
    rollback_state: InterviewState,
    armed: bool,
}

impl InFlightGuard {
    /// Call once the result has been committed to the store.
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!(interview_id = %self.id, "Request dropped before commit, releasing session");

        let id = self.id;
        let rollback_state = self.rollback_state;
        let release = move |session: &mut InterviewSession| {
            session.in_flight = false;
            session.state = rollback_state;
        };

        match self.store.sessions.try_write() {
            Ok(mut sessions) => {
                if let Some(session) = sessions.get_mut(&id) {
                    release(session);
                }
            }
            Err(_) => {
                if let Ok(handle) = Handle::try_current() {
                    let store = self.store.clone();
                    handle.spawn(async move {
                        let _ = store
                            .update(id, |session| {
                                release(session);
                                Ok(())
                            })
                            .await;
                    });
                }
            }
        }
    }
}

fn not_started() -> AppError {
    AppError::NotFound(SESSION_NOT_STARTED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details() -> InterviewDetails {
        InterviewDetails {
            company_name: "Acme".to_string(),
            job_role: "SRE".to_string(),
            company_url: "https://acme.com".to_string(),
        }
    }

    fn opened() -> InterviewSession {
        InterviewSession::opened(details(), "Start".to_string(), "Why SRE?".to_string())
    }

    #[test]
    fn test_opened_session_is_interviewing_with_first_question() {
        let session = opened();
        assert_eq!(session.state, InterviewState::Interviewing);
        assert_eq!(session.transcript, vec![ChatMessage::ai("Why SRE?")]);
        assert_eq!(
            session.model_history,
            vec![ChatTurn::user("Start"), ChatTurn::assistant("Why SRE?")]
        );
    }

    #[test]
    fn test_ensure_ready_rejects_in_flight() {
        let mut session = opened();
        session.in_flight = true;
        assert!(matches!(
            session.ensure_ready(InterviewState::Interviewing),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_ensure_ready_rejects_wrong_state() {
        let session = opened();
        assert!(matches!(
            session.ensure_ready(InterviewState::Feedback),
            Err(AppError::Conflict(_))
        ));
        assert!(session.ensure_ready(InterviewState::Interviewing).is_ok());
    }

    #[test]
    fn test_serialized_session_hides_model_history() {
        let json = serde_json::to_value(opened()).unwrap();
        assert!(json.get("model_history").is_none());
        assert!(json.get("in_flight").is_none());
        assert_eq!(json["state"], "interviewing");
        assert_eq!(json["transcript"][0]["speaker"], "ai");
    }

    #[tokio::test]
    async fn test_store_insert_get_remove() {
        let store = SessionStore::default();
        let session = opened();
        let id = session.id;

        store.insert(session).await;
        assert_eq!(store.count().await, 1);
        assert_eq!(store.get(id).await.unwrap().details, details());

        store.remove(id).await.unwrap();
        assert_eq!(store.count().await, 0);
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_update_unknown_session() {
        let store = SessionStore::default();
        let result = store.update(Uuid::new_v4(), |_| Ok(())).await;
        match result {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, SESSION_NOT_STARTED),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_update_mutates_in_place() {
        let store = SessionStore::default();
        let session = opened();
        let id = session.id;
        store.insert(session).await;

        store
            .update(id, |s| {
                s.transcript.push(ChatMessage::user("Uptime matters."));
                Ok(())
            })
            .await
            .unwrap();

        assert_eq!(store.get(id).await.unwrap().transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_dropped_guard_releases_session() {
        let store = SessionStore::default();
        let session = opened();
        let id = session.id;
        store.insert(session).await;

        let (_, guard) = store
            .begin(id, InterviewState::Interviewing, |s| {
                s.state = InterviewState::LoadingFeedback;
                Ok(())
            })
            .await
            .unwrap();
        assert!(store.get(id).await.unwrap().in_flight);

        drop(guard);

        let session = store.get(id).await.unwrap();
        assert!(!session.in_flight);
        assert_eq!(session.state, InterviewState::Interviewing);
    }

    #[tokio::test]
    async fn test_disarmed_guard_leaves_session_alone() {
        let store = SessionStore::default();
        let session = opened();
        let id = session.id;
        store.insert(session).await;

        let (_, guard) = store
            .begin(id, InterviewState::Interviewing, |_| Ok(()))
            .await
            .unwrap();
        store
            .update(id, |s| {
                s.in_flight = false;
                s.state = InterviewState::Feedback;
                Ok(())
            })
            .await
            .unwrap();
        guard.disarm();

        assert_eq!(store.get(id).await.unwrap().state, InterviewState::Feedback);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_idle_evicts_only_stale_sessions() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let stale = opened();
        let stale_id = stale.id;
        store.insert(stale).await;

        tokio::time::advance(Duration::from_secs(45)).await;
        let fresh = opened();
        let fresh_id = fresh.id;
        store.insert(fresh).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.prune_idle().await, 1);
        assert!(store.get(stale_id).await.is_err());
        assert!(store.get(fresh_id).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_idle_keeps_in_flight_sessions() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        let mut session = opened();
        session.in_flight = true;
        store.insert(session).await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(store.prune_idle().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_sweep_task_evicts_abandoned_session() {
        let store = SessionStore::with_idle_ttl(Duration::from_secs(60));
        store.insert(opened()).await;
        let sweep = store.spawn_idle_sweep(Duration::from_secs(10));

        tokio::time::sleep(Duration::from_secs(90)).await;

        assert_eq!(store.count().await, 0);
        sweep.abort();
    }
}
