use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Chat identity of an employee, as reported by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Position in the four-step request dialogue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Init,
    AwaitingFrom,
    AwaitingTo,
    AwaitingConfirm,
}

/// Lifecycle of a submitted request, independent of the dialogue stage.
/// A request stays `Approved` after the dialogue has returned to `Init`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    None,
    Pending,
    Approved,
    ReadyToApply,
}

/// A day/month pair as entered by the user, before year resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMonth {
    pub day: u32,
    pub month: u32,
}

/// A fully resolved calendar point. Range-checked on construction paths
/// only; calendar validity (e.g. 31 February) is checked when the point
/// is converted to a real date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePoint {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl DatePoint {
    pub fn new(day_month: DayMonth, year: i32) -> Self {
        Self { day: day_month.day, month: day_month.month, year }
    }

    pub fn day_month(&self) -> DayMonth {
        DayMonth { day: self.day, month: self.month }
    }
}

impl From<NaiveDate> for DatePoint {
    fn from(date: NaiveDate) -> Self {
        Self { day: date.day(), month: date.month(), year: date.year() }
    }
}

/// Per-user workflow record. Owned exclusively by the user's key in the
/// store; created lazily on first interaction and never deleted, only
/// reset on cancellation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    pub stage: Stage,
    pub request_status: RequestStatus,
    pub creation_date: Option<NaiveDate>,
    pub leave_start: Option<DatePoint>,
    pub leave_end: Option<DatePoint>,
}

impl WorkflowState {
    /// Whether a submitted request is still in flight. A user with an
    /// active request cannot start a new one.
    pub fn has_active_request(&self) -> bool {
        matches!(self.request_status, RequestStatus::Pending | RequestStatus::Approved)
    }

    /// Cancellation reset: dialogue back to the start, request gone.
    /// The creation date of the cancelled request is left behind; it is
    /// only meaningful while a request is pending.
    pub fn reset(&mut self) {
        self.stage = Stage::Init;
        self.request_status = RequestStatus::None;
        self.leave_start = None;
        self.leave_end = None;
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{DatePoint, DayMonth, RequestStatus, Stage, WorkflowState};

    #[test]
    fn default_state_is_idle() {
        let state = WorkflowState::default();
        assert_eq!(state.stage, Stage::Init);
        assert_eq!(state.request_status, RequestStatus::None);
        assert!(!state.has_active_request());
    }

    #[test]
    fn pending_and_approved_requests_are_active() {
        let mut state = WorkflowState::default();
        state.request_status = RequestStatus::Pending;
        assert!(state.has_active_request());
        state.request_status = RequestStatus::Approved;
        assert!(state.has_active_request());
        state.request_status = RequestStatus::ReadyToApply;
        assert!(!state.has_active_request());
    }

    #[test]
    fn reset_clears_request_but_keeps_creation_date() {
        let mut state = WorkflowState {
            stage: Stage::AwaitingConfirm,
            request_status: RequestStatus::Approved,
            creation_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            leave_start: Some(DatePoint { day: 20, month: 6, year: 2024 }),
            leave_end: Some(DatePoint { day: 10, month: 7, year: 2024 }),
        };

        state.reset();

        assert_eq!(state.stage, Stage::Init);
        assert_eq!(state.request_status, RequestStatus::None);
        assert!(state.leave_start.is_none());
        assert!(state.leave_end.is_none());
        assert!(state.creation_date.is_some());
    }

    #[test]
    fn state_round_trips_through_host_store_serialization() {
        let state = WorkflowState {
            stage: Stage::AwaitingTo,
            request_status: RequestStatus::Pending,
            creation_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            leave_start: Some(DatePoint::new(DayMonth { day: 20, month: 6 }, 2024)),
            leave_end: None,
        };

        let raw = serde_json::to_string(&state).expect("serialize");
        let restored: WorkflowState = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(restored, state);
    }
}
