//! Fixed user-facing message templates for the leave dialogue and the
//! approver notifications.

use chrono::NaiveDate;

use crate::dates;
use crate::domain::{DatePoint, Stage, UserId};

pub const DATE_HINT: &str = "dd.mm";

pub fn days_phrase(days: i64) -> String {
    if days == 1 || days == -1 {
        format!("{days} day")
    } else {
        format!("{days} days")
    }
}

pub fn stage_prompt(stage: Stage) -> Option<String> {
    match stage {
        Stage::Init => None,
        Stage::AwaitingFrom => {
            Some(format!("Which day should your leave start? ({DATE_HINT})"))
        }
        Stage::AwaitingTo => Some(format!("Until which day do you plan to be away? ({DATE_HINT})")),
        Stage::AwaitingConfirm => {
            Some("Should I send the current request to the approvers? (yes/no)".to_owned())
        }
    }
}

pub fn prompt_for_start() -> String {
    format!("Ok, which day should your leave start? ({DATE_HINT})")
}

pub fn prompt_for_end() -> String {
    format!("Great, until which day? ({DATE_HINT})")
}

pub fn prompt_for_confirm(requested_days: i64) -> String {
    format!(
        "So you plan to be on leave for {}. Is that right? (yes/no)",
        days_phrase(requested_days)
    )
}

pub fn out_of_order(stage: Stage) -> String {
    let admonition = "One step at a time!";
    match stage_prompt(stage) {
        Some(prompt) => format!("{admonition}\n{prompt}"),
        None => admonition.to_owned(),
    }
}

pub fn already_pending() -> String {
    "You already sent a leave request. Wait for an answer first.".to_owned()
}

pub fn already_approved() -> String {
    "Your previous request was approved, so take that leave first.".to_owned()
}

pub fn invalid_date() -> String {
    "That date does not look valid. Try again.".to_owned()
}

pub fn too_soon(minimum_days: i64, days_available: i64, earliest_start: NaiveDate) -> String {
    format!(
        "Leave has to be requested at least {} ahead, and yours is only {} away. \
         Try a date after {}.",
        days_phrase(minimum_days),
        days_phrase(days_available),
        earliest_start.format("%d.%m.%Y")
    )
}

pub fn too_long(requested_days: i64, maximum_days: i64) -> String {
    format!(
        "A leave of {} sounds great, but the most you can ask for is {}.",
        days_phrase(requested_days),
        days_phrase(maximum_days)
    )
}

pub fn request_sent(maximum_wait_days: i64) -> String {
    format!(
        "Your leave request is on its way. You will get an answer within {}.",
        days_phrase(maximum_wait_days)
    )
}

pub fn draft_discarded() -> String {
    "I dropped the leave request draft.".to_owned()
}

pub fn channel_new_request(
    user: &UserId,
    start: DatePoint,
    end: DatePoint,
    deadline: NaiveDate,
) -> String {
    format!(
        "@{user} wants to be on leave from {} to {}. Please respond by {}.",
        dates::format(start.day_month()),
        dates::format(end.day_month()),
        deadline.format("%d.%m")
    )
}

pub fn channel_reminder(user: &UserId, deadline: NaiveDate) -> String {
    format!("@{user} still needs an answer by {}.", deadline.format("%d.%m"))
}

pub fn channel_cancelled(actor: &UserId, target: &UserId) -> String {
    format!("@{actor} cancelled the leave request of @{target}.")
}

pub fn decision_ack(target: &UserId, decision_word: &str) -> String {
    format!("The request of @{target} was {decision_word}. I will let them know.")
}

pub fn decision_direct(decision_word: &str) -> String {
    format!("Your leave request was {decision_word}.")
}

pub fn cancel_ack(target: &UserId) -> String {
    format!("The leave request of @{target} is cancelled.")
}

pub fn cancelled_direct() -> String {
    "Your leave request has been cancelled.".to_owned()
}

pub fn access_denied() -> String {
    "You do not have enough privileges for that command.".to_owned()
}

pub fn unknown_user() -> String {
    "I do not know that user; they have never talked to me.".to_owned()
}

pub fn no_pending_request() -> String {
    "That user has no request waiting for an answer.".to_owned()
}

pub fn nothing_to_cancel() -> String {
    "That user is not going on leave.".to_owned()
}

pub fn lookup_failed() -> String {
    "I could not check your permissions right now. Try again later.".to_owned()
}

pub fn temporarily_unavailable() -> String {
    "Something went wrong on my side. Try again shortly.".to_owned()
}

#[cfg(test)]
mod tests {
    use super::days_phrase;

    #[test]
    fn day_counts_are_pluralized() {
        assert_eq!(days_phrase(1), "1 day");
        assert_eq!(days_phrase(0), "0 days");
        assert_eq!(days_phrase(14), "14 days");
    }
}
