//! Outbound notification seam and effect delivery.
//!
//! Workflow transitions return [`Effect`] values; `deliver` executes
//! them through a [`Notifier`]. A failed notification is logged and
//! skipped so one unreachable recipient cannot stall the pump or the
//! scheduler.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use leavebot_core::{Effect, UserId};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to dispatch notification: {0}")]
    Dispatch(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_to_channel(&self, channel: &str, text: &str) -> Result<(), NotifyError>;
    async fn send_direct(&self, user: &UserId, text: &str) -> Result<(), NotifyError>;
}

/// Executes the effects of one transition against the coordination
/// channel. Failures are logged, never silently dropped.
pub async fn deliver<N: Notifier>(notifier: &N, coordination_channel: &str, effects: &[Effect]) {
    for effect in effects {
        let result = match effect {
            Effect::NotifyChannel { text } => {
                notifier.send_to_channel(coordination_channel, text).await
            }
            Effect::NotifyDirect { user, text } => notifier.send_direct(user, text).await,
        };
        if let Err(error) = result {
            warn!(event_name = "notification_failed", %error, "dropping undeliverable notification");
        }
    }
}

/// Notifier that discards everything. Default wiring until a real chat
/// backend is attached.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_to_channel(&self, _channel: &str, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn send_direct(&self, _user: &UserId, _text: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Test double that records every notification it is asked to send.
#[derive(Clone, Debug, Default)]
pub struct RecordingNotifier {
    records: Arc<Mutex<Vec<SentNotification>>>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SentNotification {
    Channel { channel: String, text: String },
    Direct { user: UserId, text: String },
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        self.records.lock().expect("notifier record lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_to_channel(&self, channel: &str, text: &str) -> Result<(), NotifyError> {
        self.records.lock().expect("notifier record lock").push(SentNotification::Channel {
            channel: channel.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn send_direct(&self, user: &UserId, text: &str) -> Result<(), NotifyError> {
        self.records
            .lock()
            .expect("notifier record lock")
            .push(SentNotification::Direct { user: user.clone(), text: text.to_string() });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use leavebot_core::{Effect, UserId};

    use super::{deliver, Notifier, NotifyError, RecordingNotifier, SentNotification};

    #[tokio::test]
    async fn deliver_routes_channel_effects_to_the_coordination_channel() {
        let notifier = RecordingNotifier::new();
        let effects = vec![
            Effect::NotifyChannel { text: "new request".to_string() },
            Effect::NotifyDirect { user: UserId::from("erin"), text: "approved".to_string() },
        ];

        deliver(&notifier, "leave-coordination", &effects).await;

        assert_eq!(
            notifier.sent(),
            vec![
                SentNotification::Channel {
                    channel: "leave-coordination".to_string(),
                    text: "new request".to_string(),
                },
                SentNotification::Direct {
                    user: UserId::from("erin"),
                    text: "approved".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn a_failed_notification_does_not_stop_the_rest() {
        struct FlakyNotifier {
            inner: RecordingNotifier,
        }

        #[async_trait::async_trait]
        impl Notifier for FlakyNotifier {
            async fn send_to_channel(&self, _channel: &str, _text: &str) -> Result<(), NotifyError> {
                Err(NotifyError::Dispatch("channel unreachable".to_string()))
            }

            async fn send_direct(&self, user: &UserId, text: &str) -> Result<(), NotifyError> {
                self.inner.send_direct(user, text).await
            }
        }

        let notifier = FlakyNotifier { inner: RecordingNotifier::new() };
        let effects = vec![
            Effect::NotifyChannel { text: "lost".to_string() },
            Effect::NotifyDirect { user: UserId::from("erin"), text: "kept".to_string() },
        ];

        deliver(&notifier, "leave-coordination", &effects).await;

        assert_eq!(
            notifier.inner.sent(),
            vec![SentNotification::Direct {
                user: UserId::from("erin"),
                text: "kept".to_string(),
            }]
        );
    }
}
