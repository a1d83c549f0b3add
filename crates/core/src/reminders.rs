//! Per-user reminder computation for the scheduler.
//!
//! Reminders are recomputed on every tick from the workflow records
//! alone, so repeating them across ticks is expected and needs no
//! de-duplication.

use chrono::{Duration, NaiveDate};

use crate::domain::{RequestStatus, UserId, WorkflowState};
use crate::messages;
use crate::workflow::Effect;

/// The date by which approvers must answer a request created on
/// `creation_date`.
pub fn response_deadline(creation_date: NaiveDate, maximum_wait_days: i64) -> NaiveDate {
    creation_date + Duration::days(maximum_wait_days)
}

/// One channel reminder for a user whose request is still pending;
/// `None` for everyone else.
pub fn reminder_for(
    user: &UserId,
    state: &WorkflowState,
    maximum_wait_days: i64,
) -> Option<Effect> {
    if state.request_status != RequestStatus::Pending {
        return None;
    }
    let creation_date = state.creation_date?;
    let deadline = response_deadline(creation_date, maximum_wait_days);
    Some(Effect::NotifyChannel { text: messages::channel_reminder(user, deadline) })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{reminder_for, response_deadline};
    use crate::domain::{RequestStatus, UserId, WorkflowState};
    use crate::workflow::Effect;

    fn pending_since(year: i32, month: u32, day: u32) -> WorkflowState {
        WorkflowState {
            request_status: RequestStatus::Pending,
            creation_date: NaiveDate::from_ymd_opt(year, month, day),
            ..WorkflowState::default()
        }
    }

    #[test]
    fn deadline_is_creation_date_plus_wait() {
        let creation = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid test date");
        assert_eq!(
            response_deadline(creation, 7),
            NaiveDate::from_ymd_opt(2024, 6, 8).expect("valid test date")
        );
    }

    #[test]
    fn pending_request_yields_a_channel_reminder_with_deadline() {
        let state = pending_since(2024, 6, 1);

        let effect = reminder_for(&UserId::from("erin"), &state, 7).expect("reminder");
        let Effect::NotifyChannel { text } = effect else {
            panic!("reminders go to the coordination channel");
        };
        assert!(text.contains("@erin"));
        assert!(text.contains("08.06"));
    }

    #[test]
    fn non_pending_states_yield_no_reminder() {
        for status in
            [RequestStatus::None, RequestStatus::Approved, RequestStatus::ReadyToApply]
        {
            let mut state = pending_since(2024, 6, 1);
            state.request_status = status;
            assert_eq!(reminder_for(&UserId::from("erin"), &state, 7), None);
        }
    }

    #[test]
    fn reminders_are_identical_across_ticks() {
        let state = pending_since(2024, 6, 1);
        let first = reminder_for(&UserId::from("erin"), &state, 7);
        let second = reminder_for(&UserId::from("erin"), &state, 7);
        assert_eq!(first, second);
    }
}
