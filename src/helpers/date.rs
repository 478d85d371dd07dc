//! Date helper functions
//!
//! Publication dates arrive from the content repository as ISO 8601
//! timestamps and are displayed as "dd MMM yyyy" with fixed Brazilian
//! Portuguese month names, e.g. "25 Mar 2021".

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// Abbreviated month names for the pt-BR display locale
const MONTHS_ABBR: [&str; 12] = [
    "Jan", "Fev", "Mar", "Abr", "Mai", "Jun", "Jul", "Ago", "Set", "Out", "Nov", "Dez",
];

/// Errors raised while normalizing a publication date
#[derive(Debug, Error)]
pub enum DateFormatError {
    /// The document carries no publication date (unpublished previews)
    #[error("publication date is missing")]
    Missing,
    /// The raw value does not parse as an ISO 8601 timestamp
    #[error("unparseable publication date: {value:?}")]
    Unparseable { value: String },
}

/// Parse an ISO 8601 publication timestamp
///
/// Accepts RFC 3339 as well as the compact offset form some repository
/// APIs emit ("2021-03-25T19:25:28+0000").
pub fn parse_publication_date(value: &str) -> Result<DateTime<FixedOffset>, DateFormatError> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z"))
        .or_else(|_| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map_err(|_| DateFormatError::Unparseable {
            value: value.to_string(),
        })
}

/// Format a date as "dd MMM yyyy" in the fixed display locale
pub fn display_date<Z: TimeZone>(date: &DateTime<Z>) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        MONTHS_ABBR[date.month0() as usize],
        date.year()
    )
}

/// Normalize a raw publication timestamp into its display form
///
/// `timezone` converts the instant before the calendar date is taken;
/// `None` keeps the timestamp's own offset.
pub fn format_publication_date(
    value: Option<&str>,
    timezone: Option<&Tz>,
) -> Result<String, DateFormatError> {
    let raw = value.ok_or(DateFormatError::Missing)?;
    let parsed = parse_publication_date(raw)?;
    Ok(match timezone {
        Some(tz) => display_date(&parsed.with_timezone(tz)),
        None => display_date(&parsed),
    })
}
