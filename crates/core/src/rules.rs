//! Scheduling business rules. Pure functions over resolved date points;
//! they never touch the store or send messages.

use chrono::NaiveDate;
use thiserror::Error;

use crate::dates::{self, DateError};
use crate::domain::DatePoint;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RuleViolation {
    #[error(transparent)]
    InvalidDate(#[from] DateError),
    #[error("leave must be requested {minimum_days} days ahead; only {days_available} available")]
    TooSoon { minimum_days: i64, days_available: i64 },
    #[error("requested {requested_days} days, more than the {maximum_days}-day maximum")]
    TooLong { requested_days: i64, maximum_days: i64 },
}

/// Lead-time check: the candidate start must be at least `minimum_days`
/// after today. Returns the available lead time on success.
pub fn check_lead_time(
    today: NaiveDate,
    candidate_start: DatePoint,
    minimum_days: i64,
) -> Result<i64, RuleViolation> {
    let days_available = dates::days_between(DatePoint::from(today), candidate_start)?;
    if days_available < minimum_days {
        return Err(RuleViolation::TooSoon { minimum_days, days_available });
    }
    Ok(days_available)
}

/// Duration check: the span from start to end must not exceed
/// `maximum_days`. Returns the requested span on success.
pub fn check_duration(
    start: DatePoint,
    end: DatePoint,
    maximum_days: i64,
) -> Result<i64, RuleViolation> {
    let requested_days = dates::days_between(start, end)?;
    if requested_days > maximum_days {
        return Err(RuleViolation::TooLong { requested_days, maximum_days });
    }
    Ok(requested_days)
}
