//! Chat-facing layer: the transport seam that delivers inbound
//! messages, the notifier that executes outbound effects, the message
//! pump that routes intents into the core workflow, and the cron-driven
//! reminder scheduler.

pub mod notifier;
pub mod runner;
pub mod scheduler;
pub mod transport;

pub use notifier::{NoopNotifier, Notifier, NotifyError, RecordingNotifier, SentNotification};
pub use runner::{Clock, FixedClock, MessagePump, SystemClock};
pub use scheduler::{ReminderScheduler, ScheduleError};
pub use transport::{ChatTransport, InboundMessage, NoopChatTransport, TransportError};
