//! Intent classification for inbound chat text.
//!
//! Classification runs an ordered list of typed matchers; the first one
//! that recognizes the message wins, so each message maps to at most one
//! intent. Messages nobody recognizes are not addressed to this
//! workflow and produce no intent at all.

use crate::dates;
use crate::domain::{DayMonth, UserId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    /// "start leave request" trigger phrase.
    StartLeaveRequest,
    /// A strict `dd.mm` token entered mid-dialogue.
    DateToken(DayMonth),
    /// "yes"/"no" (with the legacy "да"/"нет" aliases).
    Confirmation { accepted: bool },
    /// "cancel request for <user>" (privileged).
    CancelRequest { target: UserId },
    /// "approve request for <user>" (privileged).
    ApproveRequest { target: UserId },
    /// "reject request for <user>" (privileged).
    RejectRequest { target: UserId },
}

type Matcher = fn(&str) -> Option<Intent>;

/// Matchers in priority order. An earlier matcher always wins over a
/// later one.
const MATCHERS: &[Matcher] =
    &[match_trigger, match_date_token, match_confirmation, match_cancel, match_decision];

pub fn classify(text: &str) -> Option<Intent> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    MATCHERS.iter().find_map(|matcher| matcher(trimmed))
}

fn match_trigger(text: &str) -> Option<Intent> {
    text.eq_ignore_ascii_case("start leave request").then_some(Intent::StartLeaveRequest)
}

fn match_date_token(text: &str) -> Option<Intent> {
    dates::parse(text).ok().map(Intent::DateToken)
}

fn match_confirmation(text: &str) -> Option<Intent> {
    match text.to_lowercase().as_str() {
        "yes" | "да" => Some(Intent::Confirmation { accepted: true }),
        "no" | "нет" => Some(Intent::Confirmation { accepted: false }),
        _ => None,
    }
}

fn match_cancel(text: &str) -> Option<Intent> {
    let rest = strip_prefix_ignore_case(text, "cancel request for ")?;
    parse_target(rest).map(|target| Intent::CancelRequest { target })
}

fn match_decision(text: &str) -> Option<Intent> {
    if let Some(rest) = strip_prefix_ignore_case(text, "approve request for ") {
        return parse_target(rest).map(|target| Intent::ApproveRequest { target });
    }
    if let Some(rest) = strip_prefix_ignore_case(text, "reject request for ") {
        return parse_target(rest).map(|target| Intent::RejectRequest { target });
    }
    None
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

fn parse_target(rest: &str) -> Option<UserId> {
    let name = rest.trim().trim_start_matches('@').trim();
    if name.is_empty() {
        return None;
    }
    Some(UserId(name.to_owned()))
}
