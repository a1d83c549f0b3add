//! Authorization gate for the privileged approver commands.
//!
//! Approve, reject and cancel all require an admin actor; the role
//! lookup is an external identity service behind the [`Directory`]
//! trait. Every failure path leaves the target's workflow record
//! exactly as it was.

use std::collections::HashSet;

use thiserror::Error;

use crate::domain::{RequestStatus, UserId, WorkflowState};
use crate::messages;
use crate::workflow::{Effect, TransitionOutcome};

/// External identity/role lookup.
pub trait Directory: Send + Sync {
    /// May fail when the identity service is unreachable.
    fn is_admin(&self, user: &UserId) -> Result<bool, String>;
    fn user_exists(&self, user: &UserId) -> bool;
}

/// Fixed in-memory directory, used as the default wiring and in tests.
#[derive(Clone, Debug, Default)]
pub struct StaticDirectory {
    admins: HashSet<UserId>,
    users: HashSet<UserId>,
}

impl StaticDirectory {
    pub fn new(admins: Vec<UserId>, users: Vec<UserId>) -> Self {
        let mut known: HashSet<UserId> = users.into_iter().collect();
        let admins: HashSet<UserId> = admins.into_iter().collect();
        known.extend(admins.iter().cloned());
        Self { admins, users: known }
    }
}

impl Directory for StaticDirectory {
    fn is_admin(&self, user: &UserId) -> Result<bool, String> {
        Ok(self.admins.contains(user))
    }

    fn user_exists(&self, user: &UserId) -> bool {
        self.users.contains(user)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AdminError {
    #[error("`{actor}` may not run privileged commands")]
    AccessDenied { actor: UserId },
    #[error("target user `{target}` is not known")]
    UnknownUser { target: UserId },
    #[error("`{target}` has no pending request")]
    NoPendingRequest { target: UserId },
    #[error("`{target}` has no cancellable request")]
    NothingToCancel { target: UserId },
    #[error("identity lookup failed: {0}")]
    LookupFailed(String),
}

impl AdminError {
    /// The reply shown to the acting user.
    pub fn user_message(&self) -> String {
        match self {
            Self::AccessDenied { .. } => messages::access_denied(),
            Self::UnknownUser { .. } => messages::unknown_user(),
            Self::NoPendingRequest { .. } => messages::no_pending_request(),
            Self::NothingToCancel { .. } => messages::nothing_to_cancel(),
            Self::LookupFailed(_) => messages::lookup_failed(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Decision {
    Approve,
    Reject,
}

#[derive(Clone, Debug)]
pub struct AuthorizationGate<D> {
    directory: D,
}

impl<D> AuthorizationGate<D>
where
    D: Directory,
{
    pub fn new(directory: D) -> Self {
        Self { directory }
    }

    pub fn approve(
        &self,
        actor: &UserId,
        target: &UserId,
        state: &mut WorkflowState,
    ) -> Result<TransitionOutcome, AdminError> {
        self.decide(actor, target, state, Decision::Approve)
    }

    pub fn reject(
        &self,
        actor: &UserId,
        target: &UserId,
        state: &mut WorkflowState,
    ) -> Result<TransitionOutcome, AdminError> {
        self.decide(actor, target, state, Decision::Reject)
    }

    /// Cancels a pending or approved request. A rejected request is
    /// already inert and cannot be cancelled.
    pub fn cancel(
        &self,
        actor: &UserId,
        target: &UserId,
        state: &mut WorkflowState,
    ) -> Result<TransitionOutcome, AdminError> {
        self.require_admin(actor)?;

        if !state.has_active_request() {
            return Err(AdminError::NothingToCancel { target: target.clone() });
        }

        state.reset();

        Ok(TransitionOutcome::reply(messages::cancel_ack(target))
            .with_effect(Effect::NotifyChannel {
                text: messages::channel_cancelled(actor, target),
            })
            .with_effect(Effect::NotifyDirect {
                user: target.clone(),
                text: messages::cancelled_direct(),
            }))
    }

    fn decide(
        &self,
        actor: &UserId,
        target: &UserId,
        state: &mut WorkflowState,
        decision: Decision,
    ) -> Result<TransitionOutcome, AdminError> {
        self.require_admin(actor)?;

        if !self.directory.user_exists(target) {
            return Err(AdminError::UnknownUser { target: target.clone() });
        }

        if state.request_status != RequestStatus::Pending {
            return Err(AdminError::NoPendingRequest { target: target.clone() });
        }

        let (status, word) = match decision {
            Decision::Approve => (RequestStatus::Approved, "approved"),
            Decision::Reject => (RequestStatus::ReadyToApply, "rejected"),
        };
        state.request_status = status;

        Ok(TransitionOutcome::reply(messages::decision_ack(target, word)).with_effect(
            Effect::NotifyDirect { user: target.clone(), text: messages::decision_direct(word) },
        ))
    }

    fn require_admin(&self, actor: &UserId) -> Result<(), AdminError> {
        let is_admin = self.directory.is_admin(actor).map_err(AdminError::LookupFailed)?;
        if !is_admin {
            return Err(AdminError::AccessDenied { actor: actor.clone() });
        }
        Ok(())
    }
}
