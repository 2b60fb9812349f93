//! Entry dates.
//!
//! Dates travel as ISO text (`YYYY-MM-DD`) from the chat into the database.
//! Ordering is lexicographic, which matches chronological order for strings of
//! that shape, so range filters work directly on the stored text.

use std::{fmt, sync::LazyLock};

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::EngineError;

#[allow(clippy::expect_used)]
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// How strictly user-entered dates are checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Only the `YYYY-MM-DD` shape is checked: `2023-13-40` passes.
    #[default]
    Shape,
    /// The shape check plus a real calendar date.
    Calendar,
}

/// A validated `YYYY-MM-DD` date.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryDate(String);

impl EntryDate {
    pub fn parse(input: &str, policy: DatePolicy) -> Result<Self, EngineError> {
        if !DATE_SHAPE.is_match(input) {
            return Err(EngineError::InvalidDate(format!(
                "'{input}' is not in YYYY-MM-DD format"
            )));
        }
        if policy == DatePolicy::Calendar && NaiveDate::parse_from_str(input, "%Y-%m-%d").is_err()
        {
            return Err(EngineError::InvalidDate(format!(
                "'{input}' is not a calendar date"
            )));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Wraps a value read back from storage, where it was validated on insert.
    pub(crate) fn from_stored(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for EntryDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_policy_accepts_iso_like_strings() {
        assert!(EntryDate::parse("2024-01-31", DatePolicy::Shape).is_ok());
        // Not a calendar date, but the shape matches.
        assert!(EntryDate::parse("2023-13-40", DatePolicy::Shape).is_ok());
    }

    #[test]
    fn shape_policy_rejects_other_formats() {
        for input in [
            "",
            "2024-1-31",
            "24-01-31",
            "2024/01/31",
            "31-01-2024",
            " 2024-01-31",
            "2024-01-31 ",
            "2024-01-31x",
            "yesterday",
        ] {
            assert!(
                EntryDate::parse(input, DatePolicy::Shape).is_err(),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn calendar_policy_rejects_impossible_dates() {
        assert!(EntryDate::parse("2024-02-29", DatePolicy::Calendar).is_ok());
        assert!(EntryDate::parse("2023-02-29", DatePolicy::Calendar).is_err());
        assert!(EntryDate::parse("2023-13-40", DatePolicy::Calendar).is_err());
    }

    #[test]
    fn ordering_is_chronological() {
        let start = EntryDate::parse("2024-01-01", DatePolicy::Shape).unwrap();
        let end = EntryDate::parse("2024-01-31", DatePolicy::Shape).unwrap();
        assert!(start < end);
        assert_eq!(start.to_string(), "2024-01-01");
    }
}
