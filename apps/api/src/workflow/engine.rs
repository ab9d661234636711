//! Workflow engine: owns every live session and runs the effects the state
//! machine asks for.
//!
//! Sessions live in memory only. Each session has at most one generation in
//! flight because only `processing` can request one and `processing` cannot be
//! re-entered until it resolves or is cancelled. Sessions nobody has touched for
//! longer than the idle TTL are swept by `spawn_idle_sweeper`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::{Profile, ProfileView};
use crate::roadmap::client::RoadmapClient;
use crate::roadmap::models::RoadmapResult;
use crate::workflow::clock::{Clock, SystemClock};
use crate::workflow::machine::{
    transition, Effect, Screen, SessionState, Ticket, TransitionError, WorkflowEvent,
};
use crate::workflow::status::status_message;
use crate::workflow::wizard::{Wizard, WizardStep};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Last time any request read or changed this session.
    pub last_seen: DateTime<Utc>,
    pub state: SessionState,
}

// ────────────────────────────────────────────────────────────────────────────
// Views
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardView {
    pub step: WizardStep,
    pub step_index: usize,
    pub step_label: &'static str,
    pub total_steps: usize,
    pub is_last_step: bool,
    pub editing_existing: bool,
    pub draft: ProfileView,
}

impl From<&Wizard> for WizardView {
    fn from(wizard: &Wizard) -> Self {
        let step = wizard.step();
        Self {
            step,
            step_index: step.index(),
            step_label: step.label(),
            total_steps: WizardStep::ALL.len(),
            is_last_step: step.is_last(),
            editing_existing: wizard.is_editing_existing(),
            draft: ProfileView::from(wizard.draft()),
        }
    }
}

/// Everything a client needs to render the current screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub screen: &'static str,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wizard: Option<WizardView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<&'static str>,
    pub profile: Option<ProfileView>,
    pub roadmap: Option<RoadmapResult>,
    pub error_message: Option<String>,
}

impl SessionView {
    fn of(session: &Session, now: DateTime<Utc>) -> Self {
        let state = &session.state;
        let (wizard, status) = match &state.screen {
            Screen::Wizard { wizard, .. } => (Some(WizardView::from(wizard)), None),
            Screen::Processing { started_at, .. } => (None, Some(status_message(*started_at, now))),
            _ => (None, None),
        };
        Self {
            id: session.id,
            screen: state.screen.name(),
            created_at: session.created_at,
            wizard,
            status_message: status,
            profile: state.profile.as_ref().map(ProfileView::from),
            roadmap: state.roadmap.clone(),
            error_message: state.error_message.clone(),
        }
    }
}

/// Result of a dispatched event.
pub struct Dispatched {
    pub view: SessionView,
    /// The generation started by this event, if any. Handlers drop it; tests await it.
    pub generation: Option<JoinHandle<()>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct WorkflowEngine {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    roadmaps: RoadmapClient,
    clock: Arc<dyn Clock>,
}

impl WorkflowEngine {
    pub fn new(roadmaps: RoadmapClient) -> Self {
        Self::with_clock(roadmaps, Arc::new(SystemClock))
    }

    pub fn with_clock(roadmaps: RoadmapClient, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            roadmaps,
            clock,
        }
    }

    pub async fn create_session(&self) -> SessionView {
        let now = self.clock.now();
        let session = Session {
            id: Uuid::new_v4(),
            created_at: now,
            last_seen: now,
            state: SessionState::default(),
        };
        let view = SessionView::of(&session, now);
        self.sessions.write().await.insert(session.id, session);
        info!("Session {} created", view.id);
        view
    }

    pub async fn view(&self, id: Uuid) -> Result<SessionView, AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.last_seen = now;
        Ok(SessionView::of(session, now))
    }

    /// Drops a session. A generation still in flight for it finishes into the void.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(session_not_found(id));
        }
        info!("Session {id} deleted");
        Ok(())
    }

    /// Profile and roadmap of a session that is showing results.
    pub async fn results(&self, id: Uuid) -> Result<(Profile, RoadmapResult), AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.last_seen = now;
        let state = &session.state;
        match (&state.screen, &state.profile, &state.roadmap) {
            (Screen::Results | Screen::Export, Some(profile), Some(roadmap)) => {
                Ok((profile.clone(), roadmap.clone()))
            }
            (screen, _, _) => Err(AppError::Conflict(format!(
                "No roadmap to show on the {} screen",
                screen.name()
            ))),
        }
    }

    /// Applies `event` and starts the generation it requests, if any.
    pub async fn dispatch(&self, id: Uuid, event: WorkflowEvent) -> Result<Dispatched, AppError> {
        let (view, effect) = self.apply(id, event).await?;

        let generation = match effect {
            Effect::None => None,
            Effect::Generate { ticket, profile } => {
                info!("Session {id}: generation {ticket} started");
                let engine = self.clone();
                Some(tokio::spawn(async move {
                    engine.run_generation(id, ticket, profile).await
                }))
            }
        };

        Ok(Dispatched { view, generation })
    }

    /// Applies `event` under the session lock. The state is only replaced on success.
    async fn apply(
        &self,
        id: Uuid,
        event: WorkflowEvent,
    ) -> Result<(SessionView, Effect), AppError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
        session.last_seen = now;

        let trigger = event.name();
        let from = session.state.screen.name();
        let next = transition(&session.state, event, now)?;
        debug!(
            "Session {id}: {from} --{trigger}--> {}",
            next.state.screen.name()
        );

        session.state = next.state;
        Ok((SessionView::of(session, now), next.effect))
    }

    /// Drops every session idle for longer than `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: chrono::Duration) -> usize {
        let cutoff = self.clock.now() - ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.last_seen >= cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle sessions ({} remaining)", sessions.len());
        }
        evicted
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn run_generation(&self, id: Uuid, ticket: Ticket, profile: Profile) {
        let started = Instant::now();
        let event = match self.roadmaps.generate(&profile).await {
            Ok(roadmap) => {
                info!(
                    "Session {id}: generation {ticket} succeeded in {}ms",
                    started.elapsed().as_millis()
                );
                WorkflowEvent::GenerationSucceeded { ticket, roadmap }
            }
            Err(e) => {
                warn!(
                    "Session {id}: generation {ticket} failed after {}ms: {e}",
                    started.elapsed().as_millis()
                );
                WorkflowEvent::GenerationFailed {
                    ticket,
                    message: e.user_message().to_string(),
                }
            }
        };

        match self.apply(id, event).await {
            Ok(_) => {}
            Err(AppError::InvalidTransition(TransitionError::StaleGeneration { .. })) => {
                debug!("Session {id}: generation {ticket} no longer awaited, dropping outcome")
            }
            Err(AppError::NotFound(_)) => {
                debug!("Session {id} is gone, dropping generation {ticket}")
            }
            Err(e) => warn!("Session {id}: could not record generation {ticket}: {e}"),
        }
    }
}

/// Spawns a background task that evicts idle sessions every `every`.
pub fn spawn_idle_sweeper(
    engine: WorkflowEngine,
    ttl: chrono::Duration,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(every);
        loop {
            tick.tick().await;
            engine.evict_idle(ttl).await;
        }
    })
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::{api_failure, ScriptedModel};
    use crate::roadmap::client::GENERATION_FAILED_MESSAGE;
    use crate::roadmap::sample::{sample_profile, sample_roadmap};
    use crate::workflow::clock::ManualClock;
    use crate::workflow::wizard::WizardInput;

    fn engine_with(model: Arc<ScriptedModel>) -> WorkflowEngine {
        WorkflowEngine::new(RoadmapClient::new(model))
    }

    fn clock_at_noon() -> Arc<ManualClock> {
        let noon = DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Arc::new(ManualClock::at(noon))
    }

    fn sample_json() -> String {
        serde_json::to_string(&sample_roadmap()).unwrap()
    }

    async fn submit(engine: &WorkflowEngine, id: Uuid) -> Dispatched {
        engine.dispatch(id, WorkflowEvent::Start).await.unwrap();
        engine
            .dispatch(id, WorkflowEvent::Complete(sample_profile()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_successful_generation_lands_on_results() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(sample_json())]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        let dispatched = submit(&engine, id).await;
        assert_eq!(dispatched.view.screen, "processing");
        assert!(dispatched.view.status_message.is_some());
        dispatched.generation.unwrap().await.unwrap();

        let view = engine.view(id).await.unwrap();
        assert_eq!(view.screen, "results");
        assert_eq!(view.roadmap, Some(sample_roadmap()));
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_reply_lands_on_error_with_friendly_message() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(String::new())]));
        let engine = engine_with(model);
        let id = engine.create_session().await.id;

        submit(&engine, id).await.generation.unwrap().await.unwrap();

        let view = engine.view(id).await.unwrap();
        assert_eq!(view.screen, "error");
        assert_eq!(view.error_message.as_deref(), Some(GENERATION_FAILED_MESSAGE));
        assert!(view.roadmap.is_none());
    }

    #[tokio::test]
    async fn test_retry_repeats_call_with_unchanged_profile() {
        let model = Arc::new(ScriptedModel::new(vec![
            Err(api_failure(503)),
            Ok(sample_json()),
        ]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        submit(&engine, id).await.generation.unwrap().await.unwrap();
        let failed = engine.view(id).await.unwrap();
        assert_eq!(failed.screen, "error");
        assert_eq!(failed.profile, Some(ProfileView::from(&sample_profile())));

        let retry = engine.dispatch(id, WorkflowEvent::Retry).await.unwrap();
        retry.generation.unwrap().await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
        assert_eq!(engine.view(id).await.unwrap().screen, "results");
    }

    #[tokio::test]
    async fn test_second_complete_while_processing_is_rejected() {
        let model = Arc::new(ScriptedModel::gated(vec![Ok(sample_json())]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        let first = submit(&engine, id).await;
        let second = engine
            .dispatch(id, WorkflowEvent::Complete(sample_profile()))
            .await;
        assert!(matches!(
            second,
            Err(AppError::InvalidTransition(TransitionError::NotAllowed { .. }))
        ));

        model.release();
        first.generation.unwrap().await.unwrap();
        assert_eq!(model.call_count(), 1);
        assert_eq!(engine.view(id).await.unwrap().screen, "results");
    }

    #[tokio::test]
    async fn test_cancelled_generation_outcome_is_ignored() {
        let model = Arc::new(ScriptedModel::gated(vec![Ok(sample_json())]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        let pending = submit(&engine, id).await;
        let cancelled = engine.dispatch(id, WorkflowEvent::Cancel).await.unwrap();
        assert_eq!(cancelled.view.screen, "wizard");

        model.release();
        pending.generation.unwrap().await.unwrap();

        let view = engine.view(id).await.unwrap();
        assert_eq!(view.screen, "wizard");
        assert!(view.roadmap.is_none());
    }

    #[tokio::test]
    async fn test_view_sample_makes_no_model_call() {
        let model = Arc::new(ScriptedModel::new(vec![]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        let dispatched = engine.dispatch(id, WorkflowEvent::ViewSample).await.unwrap();
        assert!(dispatched.generation.is_none());
        assert_eq!(dispatched.view.screen, "results");
        assert_eq!(model.call_count(), 0);

        let (profile, roadmap) = engine.results(id).await.unwrap();
        assert_eq!(profile, sample_profile());
        assert_eq!(roadmap, sample_roadmap());
    }

    #[tokio::test]
    async fn test_wizard_view_tracks_step() {
        let engine = engine_with(Arc::new(ScriptedModel::new(vec![])));
        let id = engine.create_session().await.id;
        engine.dispatch(id, WorkflowEvent::Start).await.unwrap();

        let view = engine
            .dispatch(id, WorkflowEvent::Wizard(WizardInput::Next))
            .await
            .unwrap()
            .view;
        let wizard = view.wizard.unwrap();
        assert_eq!(wizard.step_index, 1);
        assert_eq!(wizard.step_label, "Current Role");
        assert_eq!(wizard.total_steps, 5);
        assert!(!wizard.is_last_step);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let engine = engine_with(Arc::new(ScriptedModel::new(vec![])));
        let id = Uuid::new_v4();
        assert!(matches!(engine.view(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            engine.dispatch(id, WorkflowEvent::Start).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_results_unavailable_outside_results_screens() {
        let engine = engine_with(Arc::new(ScriptedModel::new(vec![])));
        let id = engine.create_session().await.id;
        assert!(matches!(
            engine.results(id).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_deleted_session_drops_late_generation() {
        let model = Arc::new(ScriptedModel::gated(vec![Ok(sample_json())]));
        let engine = engine_with(model.clone());
        let id = engine.create_session().await.id;

        let pending = submit(&engine, id).await;
        engine.delete(id).await.unwrap();
        model.release();
        pending.generation.unwrap().await.unwrap();

        assert!(matches!(engine.view(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_idle_sessions_are_evicted_after_ttl() {
        let clock = clock_at_noon();
        let engine = WorkflowEngine::with_clock(
            RoadmapClient::new(Arc::new(ScriptedModel::new(vec![]))),
            clock.clone(),
        );
        let idle = engine.create_session().await.id;
        let active = engine.create_session().await.id;

        clock.advance(chrono::Duration::minutes(50));
        engine.view(active).await.unwrap();
        clock.advance(chrono::Duration::minutes(20));

        assert_eq!(engine.evict_idle(chrono::Duration::hours(1)).await, 1);
        assert!(matches!(engine.view(idle).await, Err(AppError::NotFound(_))));
        assert!(engine.view(active).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_releases_abandoned_attachments() {
        let clock = clock_at_noon();
        let engine = WorkflowEngine::with_clock(
            RoadmapClient::new(Arc::new(ScriptedModel::new(vec![]))),
            clock.clone(),
        );
        let attachment = "A".repeat(1024 * 1024);
        for _ in 0..50 {
            let id = engine.create_session().await.id;
            engine.dispatch(id, WorkflowEvent::Start).await.unwrap();
            engine
                .dispatch(
                    id,
                    WorkflowEvent::Wizard(WizardInput::SetResume {
                        resume: crate::models::profile::ResumeInput::attachment(
                            "application/pdf",
                            attachment.clone(),
                        ),
                        file_name: Some("cv.pdf".into()),
                    }),
                )
                .await
                .unwrap();
        }
        assert_eq!(engine.session_count().await, 50);

        let sweep_every = Duration::from_secs(60);
        let sweeper = spawn_idle_sweeper(engine.clone(), chrono::Duration::hours(24), sweep_every);

        // Not idle long enough yet.
        tokio::time::sleep(sweep_every + Duration::from_millis(1)).await;
        assert_eq!(engine.session_count().await, 50);

        clock.advance(chrono::Duration::days(7));
        tokio::time::sleep(sweep_every).await;
        assert_eq!(engine.session_count().await, 0);

        sweeper.abort();
    }
}
