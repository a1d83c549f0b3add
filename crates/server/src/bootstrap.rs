//! Wires the configured components into a runnable application.
//!
//! The default wiring uses the in-memory store and the no-op chat
//! backend; a deployment swaps those at this one seam.

use thiserror::Error;

use leavebot_chat::{
    MessagePump, NoopChatTransport, NoopNotifier, ReminderScheduler, ScheduleError, SystemClock,
};
use leavebot_core::{
    AppConfig, AuthorizationGate, ConfigError, InMemoryWorkflowStore, LeaveWorkflow, LoadOptions,
    StaticDirectory,
};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Scheduler(#[from] ScheduleError),
}

#[derive(Debug)]
pub struct Application {
    pub config: AppConfig,
    pub pump: MessagePump<
        InMemoryWorkflowStore,
        StaticDirectory,
        NoopChatTransport,
        NoopNotifier,
        SystemClock,
    >,
    pub scheduler: ReminderScheduler<InMemoryWorkflowStore, NoopNotifier>,
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    let store = InMemoryWorkflowStore::new();
    let workflow = LeaveWorkflow::new(config.leave_policy());
    let gate = AuthorizationGate::new(StaticDirectory::default());

    let pump = MessagePump::new(
        store.clone(),
        gate,
        workflow,
        NoopChatTransport,
        NoopNotifier,
        SystemClock,
        config.workflow.coordination_channel.clone(),
    );

    let scheduler = ReminderScheduler::new(
        store,
        NoopNotifier,
        &config.reminders.schedule,
        config.workflow.coordination_channel.clone(),
        config.workflow.maximum_wait_days,
    )?;

    Ok(Application { config, pump, scheduler })
}
