//! Formatting utilities for display values.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};

use crate::config::LOGIN_TIME_FORMAT;

/// Format a timestamp for the login banner (e.g., "Wed Jun 4 22:50:34").
///
/// The day of the month is not padded; hours, minutes and seconds are.
pub fn format_login_time<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(LOGIN_TIME_FORMAT).to_string()
}

/// Format completion candidates for one output line.
pub fn format_candidates(candidates: &[String], separator: &str) -> String {
    candidates.join(separator)
}
