//! Time related utils.
//!
//! A signing operation captures exactly one [`DateTime`] and derives both the
//! date stamp and the full timestamp from it.

use crate::Error;
use crate::Result;
use chrono::NaiveDateTime;
use chrono::Utc;

/// DateTime is the alias of chrono's UTC date time.
pub type DateTime = chrono::DateTime<Utc>;

/// Date format: "20220313"
const DATE: &str = "%Y%m%d";

/// Time format for ISO 8601: "20220313T072004Z"
const ISO8601: &str = "%Y%m%dT%H%M%SZ";

/// Create a datetime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format time into date: `20220301`
pub fn format_date(t: DateTime) -> String {
    t.format(DATE).to_string()
}

/// Format time into ISO8601: `20220313T072004Z`
pub fn format_iso8601(t: DateTime) -> String {
    t.format(ISO8601).to_string()
}

/// Parse time from ISO8601: `20220313T072004Z`
pub fn parse_iso8601(s: &str) -> Result<DateTime> {
    let t = NaiveDateTime::parse_from_str(s, ISO8601).map_err(|e| {
        Error::request_invalid(format!("invalid iso8601 timestamp: {s}")).with_source(e)
    })?;
    Ok(t.and_utc())
}
