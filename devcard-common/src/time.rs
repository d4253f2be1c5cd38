//! Date utilities
//!
//! Users type and read dates as `DD-MM-YYYY`; the database and the activation
//! file keep ISO `YYYY-MM-DD`.

use crate::{Error, Result};
use chrono::{Local, NaiveDate};

/// Date format shown to and typed by users
pub const USER_DATE_FORMAT: &str = "%d-%m-%Y";

/// Date format used on disk
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a `DD-MM-YYYY` date typed by the user
pub fn parse_user_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), USER_DATE_FORMAT)
        .map_err(|_| Error::BadDateFormat(text.to_string()))
}

/// Format a date for display as `DD-MM-YYYY`
pub fn format_user_date(date: NaiveDate) -> String {
    date.format(USER_DATE_FORMAT).to_string()
}

/// Parse an ISO `YYYY-MM-DD` date
pub fn parse_iso_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), ISO_DATE_FORMAT).ok()
}

/// Format a date as ISO `YYYY-MM-DD`
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}
