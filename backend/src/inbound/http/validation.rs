//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection carries a `details` object naming the offending field so
//! clients can attribute failures precisely.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use uuid::Uuid;

use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, PageRequest};

use crate::domain::Error;
use crate::domain::analytics::ViewInterval;
use crate::domain::article::ArticleStatus;

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Build an invalid-request error attributed to `field`.
pub(crate) fn field_error(
    field: FieldName,
    message: impl Into<String>,
    code: &'static str,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value).map_err(|_| {
        let name = field.as_str();
        Error::invalid_request(format!("{name} must be a valid id")).with_details(json!({
            "field": name,
            "value": value,
            "code": "invalid_id",
        }))
    })
}

/// Parse the `status` query parameter.
///
/// Accepts a single value or a comma-separated set. Unknown entries are
/// dropped; the filter is rejected only when it was supplied and nothing
/// valid remains. Returns `None` when the parameter was absent.
pub(crate) fn parse_status_filter(
    raw: Option<&str>,
) -> Result<Option<Vec<ArticleStatus>>, Error> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let mut statuses: Vec<ArticleStatus> = Vec::new();
    for entry in raw.split(',') {
        let candidate = match entry.trim() {
            "draft" => Some(ArticleStatus::Draft),
            "published" => Some(ArticleStatus::Published),
            _ => None,
        };
        if let Some(status) = candidate {
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
    }

    if statuses.is_empty() {
        return Err(field_error(
            FieldName::new("status"),
            "Status must be either \"published\" or \"draft\"",
            "invalid_status",
        ));
    }
    Ok(Some(statuses))
}

/// Parse an assignable article status from a request body.
pub(crate) fn parse_assignable_status(raw: &str) -> Result<ArticleStatus, Error> {
    match raw.parse::<ArticleStatus>() {
        Ok(status) if status.is_assignable() => Ok(status),
        _ => Err(field_error(
            FieldName::new("status"),
            "Status must be draft or published",
            "invalid_status",
        )),
    }
}

fn lenient_u32(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

/// Parse `page`/`limit` query parameters leniently: anything unparseable
/// falls back to the defaults, and the result is clamped.
pub(crate) fn parse_page_request(page: Option<&str>, limit: Option<&str>) -> PageRequest {
    PageRequest::clamped(
        lenient_u32(page, DEFAULT_PAGE),
        lenient_u32(limit, DEFAULT_LIMIT),
    )
}

/// Parse an optional timestamp parameter.
///
/// Accepts RFC 3339 or a plain `YYYY-MM-DD` date (read as midnight UTC).
pub(crate) fn parse_optional_timestamp(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<DateTime<Utc>>, Error> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(timestamp.with_timezone(&Utc)));
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        if let Some(start_of_day) = date.and_hms_opt(0, 0, 0) {
            return Ok(Some(start_of_day.and_utc()));
        }
    }
    let name = field.as_str();
    Err(
        Error::invalid_request(format!("{name} must be a date or RFC 3339 timestamp"))
            .with_details(json!({
                "field": name,
                "value": raw,
                "code": "invalid_timestamp",
            })),
    )
}

/// Parse the aggregation interval selector, defaulting to daily.
pub(crate) fn parse_interval(raw: Option<&str>) -> Result<ViewInterval, Error> {
    match raw {
        None => Ok(ViewInterval::Daily),
        Some(value) => value.parse::<ViewInterval>().map_err(|_| {
            field_error(FieldName::new("interval"), "Invalid interval.", "invalid_interval")
        }),
    }
}
