//! The message pump: the loop between the chat transport and the core
//! workflow.
//!
//! Each inbound message is classified, applied to the sender's (or the
//! target's) workflow record under the store's write lock, and answered
//! on the channel it arrived on. Outbound effects are delivered after
//! the record update so a notifier outage never blocks a state change.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use leavebot_core::workflow::TransitionOutcome;
use leavebot_core::{
    intents, AuthorizationGate, Directory, Intent, LeaveWorkflow, StoreError, UserId,
    WorkflowStore,
};

use crate::notifier::{self, Notifier};
use crate::transport::{ChatTransport, InboundMessage, TransportError};

/// Source of "today" for lead-time and duration checks.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Clock pinned to a fixed date, for deterministic tests.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[derive(Debug)]
pub struct MessagePump<S, D, T, N, C> {
    store: S,
    gate: AuthorizationGate<D>,
    workflow: LeaveWorkflow,
    transport: T,
    notifier: N,
    clock: C,
    coordination_channel: String,
}

impl<S, D, T, N, C> MessagePump<S, D, T, N, C>
where
    S: WorkflowStore,
    D: Directory,
    T: ChatTransport,
    N: Notifier,
    C: Clock,
{
    pub fn new(
        store: S,
        gate: AuthorizationGate<D>,
        workflow: LeaveWorkflow,
        transport: T,
        notifier: N,
        clock: C,
        coordination_channel: String,
    ) -> Self {
        Self { store, gate, workflow, transport, notifier, clock, coordination_channel }
    }

    /// Consumes the transport until it closes.
    pub async fn run(&mut self) -> Result<(), TransportError> {
        info!(event_name = "message_pump_started", channel = %self.coordination_channel);
        while let Some(message) = self.transport.next_message().await? {
            self.handle_message(&message).await?;
        }
        info!(event_name = "message_pump_stopped");
        Ok(())
    }

    pub async fn handle_message(&self, message: &InboundMessage) -> Result<(), TransportError> {
        let correlation_id = Uuid::new_v4();

        let Some(intent) = intents::classify(&message.text) else {
            debug!(
                event_name = "message_ignored",
                %correlation_id,
                user = %message.user,
                "no intent recognized"
            );
            return Ok(());
        };

        info!(
            event_name = "intent_received",
            %correlation_id,
            user = %message.user,
            intent = ?intent_label(&intent),
        );

        let outcome = match &intent {
            Intent::StartLeaveRequest
            | Intent::DateToken(_)
            | Intent::Confirmation { .. } => self.apply_conversational(&message.user, &intent),
            Intent::ApproveRequest { target }
            | Intent::RejectRequest { target }
            | Intent::CancelRequest { target } => {
                self.apply_privileged(&message.user, target, &intent, correlation_id)
            }
        };

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(event_name = "store_unavailable", %correlation_id, %error);
                TransitionOutcome::reply(leavebot_core::messages::temporarily_unavailable())
            }
        };

        if let Some(reply) = &outcome.reply {
            self.transport.reply(message, reply).await?;
        }
        notifier::deliver(&self.notifier, &self.coordination_channel, &outcome.effects).await;

        Ok(())
    }

    fn apply_conversational(
        &self,
        user: &UserId,
        intent: &Intent,
    ) -> Result<TransitionOutcome, StoreError> {
        let today = self.clock.today();
        self.store.update(user, |state| self.workflow.handle(user, state, intent, today))
    }

    fn apply_privileged(
        &self,
        actor: &UserId,
        target: &UserId,
        intent: &Intent,
        correlation_id: Uuid,
    ) -> Result<TransitionOutcome, StoreError> {
        let result = self.store.update(target, |state| match intent {
            Intent::ApproveRequest { .. } => self.gate.approve(actor, target, state),
            Intent::RejectRequest { .. } => self.gate.reject(actor, target, state),
            Intent::CancelRequest { .. } => self.gate.cancel(actor, target, state),
            _ => unreachable!("conversational intents are routed separately"),
        })?;

        Ok(result.unwrap_or_else(|error| {
            info!(event_name = "privileged_command_refused", %correlation_id, actor = %actor, %error);
            TransitionOutcome::reply(error.user_message())
        }))
    }
}

fn intent_label(intent: &Intent) -> &'static str {
    match intent {
        Intent::StartLeaveRequest => "start_leave_request",
        Intent::DateToken(_) => "date_token",
        Intent::Confirmation { .. } => "confirmation",
        Intent::CancelRequest { .. } => "cancel_request",
        Intent::ApproveRequest { .. } => "approve_request",
        Intent::RejectRequest { .. } => "reject_request",
    }
}
