//! The leave-request state machine.
//!
//! `LeaveWorkflow::handle` applies one classified intent to one user's
//! workflow record and returns the reply text plus the side-effect
//! requests (channel and direct notifications). It performs no I/O
//! itself; the interface layer executes the effects. Every transition
//! is guarded on the current stage, so an intent that does not apply to
//! the stage is a no-op rather than a hidden fall-through.

use chrono::{Duration, NaiveDate};

use crate::dates;
use crate::domain::{DatePoint, DayMonth, RequestStatus, Stage, UserId, WorkflowState};
use crate::intents::Intent;
use crate::messages;
use crate::rules::{self, RuleViolation};

/// Tunable business limits, all in days.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeavePolicy {
    pub minimum_lead_days: i64,
    pub maximum_leave_days: i64,
    pub maximum_wait_days: i64,
}

impl Default for LeavePolicy {
    fn default() -> Self {
        Self { minimum_lead_days: 14, maximum_leave_days: 28, maximum_wait_days: 7 }
    }
}

/// A side-effect request produced by a transition. The coordination
/// channel is addressed by the dispatcher, not named here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    NotifyChannel { text: String },
    NotifyDirect { user: UserId, text: String },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub reply: Option<String>,
    pub effects: Vec<Effect>,
}

impl TransitionOutcome {
    pub fn reply(text: String) -> Self {
        Self { reply: Some(text), effects: Vec::new() }
    }

    /// The message is not addressed at this workflow.
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct LeaveWorkflow {
    policy: LeavePolicy,
}

impl LeaveWorkflow {
    pub fn new(policy: LeavePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LeavePolicy {
        self.policy
    }

    /// Applies a conversational intent. Privileged intents are handled
    /// by the authorization gate, never here.
    pub fn handle(
        &self,
        user: &UserId,
        state: &mut WorkflowState,
        intent: &Intent,
        today: NaiveDate,
    ) -> TransitionOutcome {
        match intent {
            Intent::StartLeaveRequest => self.start_request(state, today),
            Intent::DateToken(point) => match state.stage {
                Stage::AwaitingFrom => self.accept_start_date(state, *point, today),
                Stage::AwaitingTo => self.accept_end_date(state, *point),
                _ => TransitionOutcome::ignored(),
            },
            Intent::Confirmation { accepted } => self.confirm(user, state, *accepted, today),
            _ => TransitionOutcome::ignored(),
        }
    }

    fn start_request(&self, state: &mut WorkflowState, today: NaiveDate) -> TransitionOutcome {
        if state.stage != Stage::Init {
            // Repeated trigger mid-flow: admonish and re-prompt for the
            // current stage without touching the draft.
            return TransitionOutcome::reply(messages::out_of_order(state.stage));
        }

        match state.request_status {
            RequestStatus::Approved => TransitionOutcome::reply(messages::already_approved()),
            RequestStatus::Pending => TransitionOutcome::reply(messages::already_pending()),
            RequestStatus::None | RequestStatus::ReadyToApply => {
                state.creation_date = Some(today);
                state.stage = Stage::AwaitingFrom;
                TransitionOutcome::reply(messages::prompt_for_start())
            }
        }
    }

    fn accept_start_date(
        &self,
        state: &mut WorkflowState,
        point: DayMonth,
        today: NaiveDate,
    ) -> TransitionOutcome {
        let year = dates::resolve_year_for_upcoming(point, today);
        let start = DatePoint::new(point, year);

        match rules::check_lead_time(today, start, self.policy.minimum_lead_days) {
            Ok(_) => {
                state.leave_start = Some(start);
                state.stage = Stage::AwaitingTo;
                TransitionOutcome::reply(messages::prompt_for_end())
            }
            Err(RuleViolation::TooSoon { minimum_days, days_available }) => {
                let earliest = today + Duration::days(minimum_days);
                TransitionOutcome::reply(messages::too_soon(minimum_days, days_available, earliest))
            }
            Err(_) => TransitionOutcome::reply(messages::invalid_date()),
        }
    }

    fn accept_end_date(
        &self,
        state: &mut WorkflowState,
        point: DayMonth,
    ) -> TransitionOutcome {
        let Some(start) = state.leave_start else {
            // A record in AwaitingTo without a start date is corrupt;
            // restart the dialogue instead of guessing.
            state.stage = Stage::Init;
            return TransitionOutcome::reply(messages::out_of_order(Stage::Init));
        };

        let year = dates::resolve_year_for_end(start, point);
        let end = DatePoint::new(point, year);

        match rules::check_duration(start, end, self.policy.maximum_leave_days) {
            Ok(requested_days) => {
                state.leave_end = Some(end);
                state.stage = Stage::AwaitingConfirm;
                TransitionOutcome::reply(messages::prompt_for_confirm(requested_days))
            }
            Err(RuleViolation::TooLong { requested_days, maximum_days }) => {
                TransitionOutcome::reply(messages::too_long(requested_days, maximum_days))
            }
            Err(_) => TransitionOutcome::reply(messages::invalid_date()),
        }
    }

    fn confirm(
        &self,
        user: &UserId,
        state: &mut WorkflowState,
        accepted: bool,
        today: NaiveDate,
    ) -> TransitionOutcome {
        if state.stage != Stage::AwaitingConfirm {
            return TransitionOutcome::ignored();
        }

        if !accepted {
            state.leave_start = None;
            state.leave_end = None;
            state.stage = Stage::Init;
            return TransitionOutcome::reply(messages::draft_discarded());
        }

        let (Some(start), Some(end)) = (state.leave_start, state.leave_end) else {
            state.stage = Stage::Init;
            return TransitionOutcome::reply(messages::out_of_order(Stage::Init));
        };

        let creation_date = state.creation_date.unwrap_or(today);
        let deadline = creation_date + Duration::days(self.policy.maximum_wait_days);

        state.request_status = RequestStatus::Pending;
        state.stage = Stage::Init;

        TransitionOutcome::reply(messages::request_sent(self.policy.maximum_wait_days))
            .with_effect(Effect::NotifyChannel {
                text: messages::channel_new_request(user, start, end, deadline),
            })
    }
}
