//! Cron-driven reminder scheduler.
//!
//! On every firing of the configured cron expression the scheduler
//! scans all known workflow records and posts a channel reminder for
//! each request still awaiting a decision. Ticks run sequentially in
//! one task, so two scans can never overlap.

use std::str::FromStr;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use thiserror::Error;
use tracing::{debug, info, warn};

use leavebot_core::{reminders, UserId, WorkflowStore};

use crate::notifier::{self, Notifier};

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid cron expression `{expression}`: {source}")]
    InvalidExpression { expression: String, source: cron::error::Error },
}

#[derive(Debug)]
pub struct ReminderScheduler<S, N> {
    store: S,
    notifier: N,
    schedule: Schedule,
    coordination_channel: String,
    maximum_wait_days: i64,
}

impl<S, N> ReminderScheduler<S, N>
where
    S: WorkflowStore,
    N: Notifier,
{
    /// Accepts both 6-field and classic 5-field cron expressions; a
    /// 5-field expression fires at second zero.
    pub fn new(
        store: S,
        notifier: N,
        expression: &str,
        coordination_channel: String,
        maximum_wait_days: i64,
    ) -> Result<Self, ScheduleError> {
        let schedule = parse_schedule(expression)?;
        Ok(Self { store, notifier, schedule, coordination_channel, maximum_wait_days })
    }

    /// Runs forever, firing a scan on each schedule occurrence.
    pub async fn run(self) {
        info!(
            event_name = "reminder_scheduler_started",
            schedule = %self.schedule,
            channel = %self.coordination_channel,
        );
        loop {
            let now = Utc::now();
            let Some(next) = self.schedule.after(&now).next() else {
                warn!(event_name = "reminder_schedule_exhausted");
                return;
            };
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(event_name = "reminder_tick_scheduled", fire_at = %next);
            tokio::time::sleep(wait).await;
            self.tick().await;
        }
    }

    /// One scan over all known users. A failing record is skipped so
    /// the remaining reminders still go out.
    pub async fn tick(&self) {
        let users = match self.store.known_users() {
            Ok(users) => users,
            Err(error) => {
                warn!(event_name = "reminder_scan_failed", %error);
                return;
            }
        };

        let mut sent = 0usize;
        for user in users {
            if let Some(effect) = self.reminder_for(&user) {
                notifier::deliver(&self.notifier, &self.coordination_channel, &[effect]).await;
                sent += 1;
            }
        }
        debug!(event_name = "reminder_scan_finished", reminders = sent);
    }

    fn reminder_for(&self, user: &UserId) -> Option<leavebot_core::Effect> {
        let state = match self.store.snapshot(user) {
            Ok(state) => state,
            Err(error) => {
                warn!(event_name = "reminder_record_skipped", user = %user, %error);
                return None;
            }
        };
        reminders::reminder_for(user, &state, self.maximum_wait_days)
    }
}

fn parse_schedule(expression: &str) -> Result<Schedule, ScheduleError> {
    let trimmed = expression.trim();
    let normalized = if trimmed.split_whitespace().count() == 5 {
        format!("0 {trimmed}")
    } else {
        trimmed.to_string()
    };

    Schedule::from_str(&normalized).map_err(|source| ScheduleError::InvalidExpression {
        expression: expression.to_string(),
        source,
    })
}
