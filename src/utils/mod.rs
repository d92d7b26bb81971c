//! Utility functions and helpers.

pub mod http;
pub mod text;

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;

static LRN_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

/// Check that an identifier is exactly 12 ASCII digits.
pub fn is_valid_lrn(lrn: &str) -> bool {
    LRN_RE
        .get_or_init(|| Regex::new(r"^\d{12}$").expect("LRN pattern"))
        .is_match(lrn)
}

/// Shape check for email addresses. Deliverability is not verified.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"))
        .is_match(email)
}

/// Render a display date for feed cards.
///
/// The staff-entered `date` field wins when it parses; `createdAt` is the
/// fallback. Unparseable dates pass through verbatim.
pub fn format_display_date(date: Option<&str>, created_at: Option<DateTime<Utc>>) -> String {
    if let Some(raw) = date {
        let raw = raw.trim();
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return format_date(parsed);
        }
        if !raw.is_empty() {
            return raw.to_string();
        }
    }

    match created_at {
        Some(timestamp) => format_date(timestamp.date_naive()),
        None => "No date".to_string(),
    }
}

/// en-US short-month rendering, e.g. "Mar 5, 2026".
fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}
