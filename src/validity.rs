//! Validity windows and the timestamp format the KDM tool expects.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

/// Timestamp format passed to `-f`/`-t`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Date-only input format, interpreted as midnight.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse `YYYY-MM-DD HH:MM` or `YYYY-MM-DD` (midnight).
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime> {
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT) {
        return Ok(datetime);
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(Error::InvalidDateTime(value.to_string()))
}

/// Render a timestamp the way the KDM tool expects it.
#[must_use]
pub fn format_timestamp(datetime: &NaiveDateTime) -> String {
    datetime.format(TIMESTAMP_FORMAT).to_string()
}

/// When an issued KDM may be used.
///
/// `from` is not required to precede `to`; the KDM tool decides whether a
/// window makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidityWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl ValidityWindow {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    /// Parse both ends with [`parse_datetime`].
    pub fn parse(from: &str, to: &str) -> Result<Self> {
        Ok(Self::new(parse_datetime(from)?, parse_datetime(to)?))
    }

    /// `-f <from> -t <to>` as passed to the KDM tool.
    pub(crate) fn to_args(self) -> [String; 4] {
        [
            "-f".to_string(),
            format_timestamp(&self.from),
            "-t".to_string(),
            format_timestamp(&self.to),
        ]
    }
}
