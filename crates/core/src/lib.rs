//! Core leave-request workflow: intent classification, date handling,
//! policy rules, the per-user conversation state machine, and the
//! approver commands that act on it.
//!
//! Everything in this crate is synchronous and side-effect free; state
//! lives behind [`store::WorkflowStore`] and outbound notifications are
//! returned as [`workflow::Effect`] values for the host to deliver.

pub mod admin;
pub mod config;
pub mod dates;
pub mod domain;
pub mod intents;
pub mod messages;
pub mod reminders;
pub mod rules;
pub mod store;
pub mod workflow;

pub use admin::{AdminError, AuthorizationGate, Directory, StaticDirectory};
pub use config::{
    AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig,
};
pub use domain::{DatePoint, DayMonth, RequestStatus, Stage, UserId, WorkflowState};
pub use intents::Intent;
pub use rules::RuleViolation;
pub use store::{InMemoryWorkflowStore, StoreError, WorkflowStore};
pub use workflow::{Effect, LeavePolicy, LeaveWorkflow, TransitionOutcome};
