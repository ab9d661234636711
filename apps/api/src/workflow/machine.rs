//! Workflow state machine: which screen a session is on and what it holds.
//!
//! `transition` is a pure function of (state, event, now). Side effects are
//! returned as an `Effect` for the engine to run; the machine itself never
//! calls the model.
//!
//! ```text
//! home ──start──▶ wizard ──complete──▶ processing ──ok──▶ results ──export──▶ export
//!   │               ▲  │                  │    │             │  ▲                │
//!   │               │  └─cancel─▶ home    │    └─fail─▶ error │  └──────back──────┘
//!   └─view_sample───┼─────────────────────┼──────────────▶ results
//!                   └──────────edit───────┴───────────────────┘
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::profile::Profile;
use crate::roadmap::models::RoadmapResult;
use crate::roadmap::sample::{sample_profile, sample_roadmap};
use crate::workflow::wizard::{Wizard, WizardError, WizardInput, WizardOutcome};

/// Identifies one generation request. Only the ticket a session is waiting on
/// may complete `processing`.
pub type Ticket = u64;

/// Where the wizard was opened from; decides where "back" on the first step leads
/// when an existing profile is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardOrigin {
    Home,
    Results,
    Processing,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Home,
    Wizard {
        wizard: Wizard,
        origin: WizardOrigin,
    },
    Processing {
        ticket: Ticket,
        started_at: DateTime<Utc>,
    },
    Results,
    Export,
    Error,
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Wizard { .. } => "wizard",
            Screen::Processing { .. } => "processing",
            Screen::Results => "results",
            Screen::Export => "export",
            Screen::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    Start,
    ViewSample,
    Cancel,
    /// Submit a finished profile. The wizard emits this itself on its last `next`.
    Complete(Profile),
    Retry,
    Back,
    Export,
    Edit,
    Wizard(WizardInput),
    GenerationSucceeded {
        ticket: Ticket,
        roadmap: RoadmapResult,
    },
    GenerationFailed {
        ticket: Ticket,
        message: String,
    },
}

impl WorkflowEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowEvent::Start => "start",
            WorkflowEvent::ViewSample => "view_sample",
            WorkflowEvent::Cancel => "cancel",
            WorkflowEvent::Complete(_) => "complete",
            WorkflowEvent::Retry => "retry",
            WorkflowEvent::Back => "back",
            WorkflowEvent::Export => "export",
            WorkflowEvent::Edit => "edit",
            WorkflowEvent::Wizard(input) => input.name(),
            WorkflowEvent::GenerationSucceeded { .. } => "generation_succeeded",
            WorkflowEvent::GenerationFailed { .. } => "generation_failed",
        }
    }
}

/// Work the caller must perform after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    /// Run exactly one generation for `profile` and report back with `ticket`.
    Generate { ticket: Ticket, profile: Profile },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("'{trigger}' is not allowed on the {screen} screen")]
    NotAllowed {
        trigger: &'static str,
        screen: &'static str,
    },

    #[error("generation {ticket} is no longer awaited")]
    StaleGeneration { ticket: Ticket },

    #[error(transparent)]
    Wizard(#[from] WizardError),
}

/// Everything one session owns.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub screen: Screen,
    pub profile: Option<Profile>,
    pub roadmap: Option<RoadmapResult>,
    pub error_message: Option<String>,
    next_ticket: Ticket,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            screen: Screen::Home,
            profile: None,
            roadmap: None,
            error_message: None,
            next_ticket: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Effect,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: Effect::None,
        }
    }
}

/// Computes the next session state. `state` is never modified; on error the
/// caller keeps the state it had.
pub fn transition(
    state: &SessionState,
    event: WorkflowEvent,
    now: DateTime<Utc>,
) -> Result<Transition, TransitionError> {
    let not_allowed = |event: &WorkflowEvent| TransitionError::NotAllowed {
        trigger: event.name(),
        screen: state.screen.name(),
    };

    match (&state.screen, event) {
        (Screen::Home, WorkflowEvent::Start) => Ok(Transition::to(open_wizard(
            state,
            WizardOrigin::Home,
        ))),

        (Screen::Home, WorkflowEvent::ViewSample) => Ok(Transition::to(SessionState {
            screen: Screen::Results,
            profile: Some(sample_profile()),
            roadmap: Some(sample_roadmap()),
            error_message: None,
            ..state.clone()
        })),

        (Screen::Wizard { .. }, WorkflowEvent::Cancel) => Ok(Transition::to(SessionState {
            screen: Screen::Home,
            ..state.clone()
        })),

        (Screen::Wizard { .. }, WorkflowEvent::Complete(profile)) => {
            Ok(begin_processing(state, profile, now))
        }

        (Screen::Wizard { wizard, origin }, WorkflowEvent::Wizard(input)) => {
            match wizard.apply(input)? {
                WizardOutcome::Stay(wizard) => Ok(Transition::to(SessionState {
                    screen: Screen::Wizard {
                        wizard,
                        origin: *origin,
                    },
                    ..state.clone()
                })),
                WizardOutcome::Completed(profile) => {
                    transition(state, WorkflowEvent::Complete(profile), now)
                }
                WizardOutcome::Cancelled => Ok(Transition::to(SessionState {
                    screen: Screen::Home,
                    ..state.clone()
                })),
                WizardOutcome::Exited => {
                    let screen = if *origin == WizardOrigin::Results && state.roadmap.is_some() {
                        Screen::Results
                    } else {
                        Screen::Home
                    };
                    Ok(Transition::to(SessionState {
                        screen,
                        ..state.clone()
                    }))
                }
            }
        }

        (Screen::Processing { ticket, .. }, WorkflowEvent::GenerationSucceeded {
            ticket: finished,
            roadmap,
        }) if *ticket == finished => Ok(Transition::to(SessionState {
            screen: Screen::Results,
            roadmap: Some(roadmap),
            error_message: None,
            ..state.clone()
        })),

        (Screen::Processing { ticket, .. }, WorkflowEvent::GenerationFailed {
            ticket: finished,
            message,
        }) if *ticket == finished => Ok(Transition::to(SessionState {
            screen: Screen::Error,
            roadmap: None,
            error_message: Some(message),
            ..state.clone()
        })),

        (_, WorkflowEvent::GenerationSucceeded { ticket, .. })
        | (_, WorkflowEvent::GenerationFailed { ticket, .. }) => {
            Err(TransitionError::StaleGeneration { ticket })
        }

        // The in-flight call keeps running; its outcome will be stale.
        (Screen::Processing { .. }, WorkflowEvent::Cancel) => Ok(Transition::to(open_wizard(
            state,
            WizardOrigin::Processing,
        ))),

        (Screen::Error, WorkflowEvent::Retry) => match &state.profile {
            Some(profile) => Ok(begin_processing(state, profile.clone(), now)),
            None => Ok(Transition::to(SessionState {
                screen: Screen::Wizard {
                    wizard: Wizard::new(),
                    origin: WizardOrigin::Error,
                },
                error_message: None,
                ..state.clone()
            })),
        },

        (Screen::Error, WorkflowEvent::Back) => Ok(Transition::to(SessionState {
            next_ticket: state.next_ticket,
            ..SessionState::default()
        })),

        (Screen::Results, WorkflowEvent::Export) => Ok(Transition::to(SessionState {
            screen: Screen::Export,
            ..state.clone()
        })),

        (Screen::Results, WorkflowEvent::Edit) => Ok(Transition::to(open_wizard(
            state,
            WizardOrigin::Results,
        ))),

        (Screen::Export, WorkflowEvent::Back) => Ok(Transition::to(SessionState {
            screen: Screen::Results,
            ..state.clone()
        })),

        (_, event) => Err(not_allowed(&event)),
    }
}

/// Opens the wizard, pre-filled with the stored profile when there is one.
fn open_wizard(state: &SessionState, origin: WizardOrigin) -> SessionState {
    let wizard = match &state.profile {
        Some(profile) => Wizard::editing(profile.clone()),
        None => Wizard::new(),
    };
    SessionState {
        screen: Screen::Wizard { wizard, origin },
        ..state.clone()
    }
}

/// Enters `processing` with a fresh ticket, dropping any previous outcome.
fn begin_processing(state: &SessionState, profile: Profile, now: DateTime<Utc>) -> Transition {
    let ticket = state.next_ticket;
    Transition {
        state: SessionState {
            screen: Screen::Processing {
                ticket,
                started_at: now,
            },
            profile: Some(profile.clone()),
            roadmap: None,
            error_message: None,
            next_ticket: ticket + 1,
        },
        effect: Effect::Generate { ticket, profile },
    }
}
