//! Form definitions backing the intranet routes.
//!
//! Each form deserializes the raw request, validates it and converts into a
//! typed payload via `TryFrom`. Services only ever see payloads.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;
use validator::ValidationErrors;

pub mod alerts;
pub mod branches;
pub mod calendar;
pub mod companies;
pub mod documents;
pub mod news;
pub mod products;
pub mod users;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid phone number")]
    InvalidPhoneNumber,

    #[error("invalid url")]
    InvalidUrl,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("invalid {0} id")]
    InvalidId(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(String),

    #[error("end must not precede start")]
    InvalidRange,

    #[error("invalid user type")]
    InvalidUserType,

    #[error("invalid alert level")]
    InvalidLevel,

    #[error("file is empty")]
    EmptyFile,

    #[error("invalid form encoding: {0}")]
    Encoding(String),

    #[error("failed to read csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

/// HTML checkboxes are only submitted when ticked.
pub(crate) fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v.trim(), "on" | "true" | "1"))
}

/// Parses `datetime-local` (`2025-03-01T09:30`), with optional seconds, or a
/// plain date which maps to midnight.
pub(crate) fn parse_datetime(value: &str) -> Result<NaiveDateTime, FormError> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|d| d.and_time(Default::default()))
        })
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

/// Parses an optional date field. Blank input means `None`.
pub(crate) fn parse_optional_datetime(
    value: Option<&str>,
) -> Result<Option<NaiveDateTime>, FormError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => parse_datetime(v).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datetime_accepts_browser_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2025-03-01T09:30").unwrap(), expected);
        assert_eq!(parse_datetime(" 2025-03-01T09:30:00 ").unwrap(), expected);
        assert_eq!(
            parse_datetime("2025-03-01").unwrap(),
            expected.date().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(parse_datetime("01/03/2025").is_err());
    }

    #[test]
    fn optional_datetime_treats_blank_as_none() {
        assert_eq!(parse_optional_datetime(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_datetime(None).unwrap(), None);
        assert!(parse_optional_datetime(Some("bad")).is_err());
    }

    #[test]
    fn checkbox_values() {
        assert!(checkbox(&Some("on".into())));
        assert!(!checkbox(&None));
        assert!(!checkbox(&Some("off".into())));
    }
}
