use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::domain::{DatePoint, DayMonth};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DateError {
    #[error("`{token}` is not a `dd.mm` date token")]
    MalformedToken { token: String },
    #[error("{day:02}.{month:02}.{year} is not a real calendar date")]
    ImpossibleDate { day: u32, month: u32, year: i32 },
}

/// Parses a strict `d.m` / `dd.mm` token. Anything else, including
/// out-of-range day or month numbers, is rejected.
pub fn parse(token: &str) -> Result<DayMonth, DateError> {
    let malformed = || DateError::MalformedToken { token: token.to_owned() };

    let (day_part, month_part) = token.split_once('.').ok_or_else(malformed)?;
    if !is_short_digit_run(day_part) || !is_short_digit_run(month_part) {
        return Err(malformed());
    }

    let day: u32 = day_part.parse().map_err(|_| malformed())?;
    let month: u32 = month_part.parse().map_err(|_| malformed())?;
    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(malformed());
    }

    Ok(DayMonth { day, month })
}

pub fn format(point: DayMonth) -> String {
    format!("{:02}.{:02}", point.day, point.month)
}

/// Resolves the year of a leave start entered as day/month only: the
/// reference year if that day/month is still ahead, otherwise the next
/// year. On the reference month, a day equal to the reference day still
/// counts as this year's occurrence.
pub fn resolve_year_for_upcoming(point: DayMonth, reference: NaiveDate) -> i32 {
    let upcoming_this_year = point.month > reference.month()
        || (point.month == reference.month() && point.day >= reference.day());

    if upcoming_this_year {
        reference.year()
    } else {
        reference.year() + 1
    }
}

/// Resolves the year of a leave end relative to a confirmed start: the
/// start year when the end falls strictly after the start within that
/// year, otherwise the following year. This is what lets a leave span a
/// year boundary (e.g. Dec 28 through Jan 5).
pub fn resolve_year_for_end(start: DatePoint, end: DayMonth) -> i32 {
    let after_start_same_year =
        end.month > start.month || (end.month == start.month && end.day > start.day);

    if after_start_same_year {
        start.year
    } else {
        start.year + 1
    }
}

/// Signed day difference `b - a`. Fails with an impossible-date error
/// when either point does not exist on the calendar.
pub fn days_between(a: DatePoint, b: DatePoint) -> Result<i64, DateError> {
    let from = to_naive(a)?;
    let to = to_naive(b)?;
    Ok(to.signed_duration_since(from).num_days())
}

pub fn to_naive(point: DatePoint) -> Result<NaiveDate, DateError> {
    NaiveDate::from_ymd_opt(point.year, point.month, point.day).ok_or(
        DateError::ImpossibleDate { day: point.day, month: point.month, year: point.year },
    )
}

fn is_short_digit_run(part: &str) -> bool {
    (1..=2).contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{
        days_between, format, parse, resolve_year_for_end, resolve_year_for_upcoming, DateError,
    };
    use crate::domain::{DatePoint, DayMonth};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn parses_one_and_two_digit_tokens() {
        assert_eq!(parse("1.6"), Ok(DayMonth { day: 1, month: 6 }));
        assert_eq!(parse("01.06"), Ok(DayMonth { day: 1, month: 6 }));
        assert_eq!(parse("31.12"), Ok(DayMonth { day: 31, month: 12 }));
    }

    #[test]
    fn rejects_anything_but_the_strict_token_shape() {
        for token in ["", "20", "20.6.2024", "6/20", "2o.6", "120.6", "20.006", " 20.6"] {
            assert!(
                matches!(parse(token), Err(DateError::MalformedToken { .. })),
                "token `{token}` should be rejected"
            );
        }
    }

    #[test]
    fn rejects_out_of_range_day_or_month() {
        assert!(parse("0.6").is_err());
        assert!(parse("32.6").is_err());
        assert!(parse("20.0").is_err());
        assert!(parse("20.13").is_err());
    }

    #[test]
    fn format_round_trips_through_parse() {
        for point in [
            DayMonth { day: 1, month: 1 },
            DayMonth { day: 9, month: 10 },
            DayMonth { day: 28, month: 2 },
            DayMonth { day: 31, month: 12 },
        ] {
            assert_eq!(parse(&format(point)), Ok(point));
        }
    }

    #[test]
    fn upcoming_date_later_this_year_stays_in_this_year() {
        let reference = date(2024, 6, 1);
        assert_eq!(resolve_year_for_upcoming(DayMonth { day: 20, month: 6 }, reference), 2024);
        assert_eq!(resolve_year_for_upcoming(DayMonth { day: 3, month: 12 }, reference), 2024);
    }

    #[test]
    fn upcoming_date_already_passed_rolls_to_next_year() {
        let reference = date(2024, 6, 15);
        assert_eq!(resolve_year_for_upcoming(DayMonth { day: 20, month: 3 }, reference), 2025);
        assert_eq!(resolve_year_for_upcoming(DayMonth { day: 14, month: 6 }, reference), 2025);
    }

    #[test]
    fn upcoming_same_day_counts_as_this_year() {
        let reference = date(2024, 6, 15);
        assert_eq!(resolve_year_for_upcoming(DayMonth { day: 15, month: 6 }, reference), 2024);
    }

    #[test]
    fn resolved_upcoming_date_is_never_in_the_past() {
        let reference = date(2024, 6, 15);
        for month in 1..=12 {
            for day in 1..=28 {
                let point = DayMonth { day, month };
                let year = resolve_year_for_upcoming(point, reference);
                let resolved = date(year, month, day);
                assert!(
                    resolved >= reference,
                    "{day:02}.{month:02} resolved to {resolved}, before {reference}"
                );
            }
        }
    }

    #[test]
    fn end_after_start_keeps_the_start_year() {
        let start = DatePoint { day: 20, month: 6, year: 2024 };
        assert_eq!(resolve_year_for_end(start, DayMonth { day: 10, month: 7 }), 2024);
        assert_eq!(resolve_year_for_end(start, DayMonth { day: 21, month: 6 }), 2024);
    }

    #[test]
    fn end_at_or_before_start_rolls_to_the_next_year() {
        let start = DatePoint { day: 28, month: 12, year: 2024 };
        assert_eq!(resolve_year_for_end(start, DayMonth { day: 5, month: 1 }), 2025);
        assert_eq!(resolve_year_for_end(start, DayMonth { day: 28, month: 12 }), 2025);
    }

    #[test]
    fn year_spanning_leave_has_positive_length() {
        let start = DatePoint { day: 28, month: 12, year: 2024 };
        let end_month = DayMonth { day: 5, month: 1 };
        let end = DatePoint::new(end_month, resolve_year_for_end(start, end_month));
        assert_eq!(days_between(start, end), Ok(8));
    }

    #[test]
    fn days_between_rejects_impossible_dates() {
        let start = DatePoint { day: 1, month: 6, year: 2024 };
        let bad = DatePoint { day: 31, month: 2, year: 2024 };
        assert!(matches!(days_between(start, bad), Err(DateError::ImpossibleDate { .. })));
        assert!(matches!(days_between(bad, start), Err(DateError::ImpossibleDate { .. })));
    }

    #[test]
    fn february_29_is_only_valid_in_leap_years() {
        let start = DatePoint { day: 1, month: 2, year: 2024 };
        assert_eq!(days_between(start, DatePoint { day: 29, month: 2, year: 2024 }), Ok(28));
        assert!(days_between(
            DatePoint { day: 1, month: 2, year: 2023 },
            DatePoint { day: 29, month: 2, year: 2023 }
        )
        .is_err());
    }
}
