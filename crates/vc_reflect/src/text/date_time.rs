use alloc::string::{String, ToString};

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};

use crate::text::{TextFormat, TextFormatError};
use crate::value::{DynamicStruct, Value};

/// Ticks are 100 nanosecond intervals since `0001-01-01 00:00:00`.
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// `9999-12-31 23:59:59.9999999`.
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

const TICKS_FIELD: &str = "Ticks";

const ISO_8601: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

const FALLBACK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y.%m.%d-%H.%M.%S",
    "%Y.%m.%d-%H.%M.%S:%3f",
    "%Y-%m-%d %H:%M:%S",
];

/// A `Ticks` integer field written as an ISO-8601 UTC timestamp.
///
/// Import also accepts the sentinels `min`, `max` and `now`, RFC 3339
/// timestamps with any offset, `YYYY.MM.DD-HH.MM.SS`, `YYYY-MM-DD HH:MM:SS`
/// and `YYYY-MM-DD`.
#[derive(Debug, Default, Clone, Copy)]
pub struct DateTimeFormat;

fn epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)
}

fn ticks_to_date_time(ticks: i64) -> Option<NaiveDateTime> {
    if !(0..=MAX_TICKS).contains(&ticks) {
        return None;
    }
    let seconds = TimeDelta::try_seconds(ticks / TICKS_PER_SECOND)?;
    let nanos = TimeDelta::nanoseconds((ticks % TICKS_PER_SECOND) * 100);
    epoch()?.checked_add_signed(seconds)?.checked_add_signed(nanos)
}

fn date_time_to_ticks(date_time: NaiveDateTime) -> Option<i64> {
    let delta = date_time.signed_duration_since(epoch()?);
    let ticks = delta
        .num_seconds()
        .checked_mul(TICKS_PER_SECOND)?
        .checked_add(i64::from(delta.subsec_nanos()) / 100)?;
    (0..=MAX_TICKS).contains(&ticks).then_some(ticks)
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return Some(date_time.naive_utc());
    }
    if let Ok(date_time) = NaiveDateTime::parse_from_str(text, ISO_8601) {
        return Some(date_time);
    }
    for format in FALLBACK_FORMATS {
        if let Ok(date_time) = NaiveDateTime::parse_from_str(text, format) {
            return Some(date_time);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()?
        .and_hms_opt(0, 0, 0)
}

impl TextFormat for DateTimeFormat {
    fn export_text(&self, value: &DynamicStruct) -> Option<String> {
        let ticks = value.get(TICKS_FIELD)?.as_int()?;
        let date_time = ticks_to_date_time(ticks)?;
        Some(date_time.format(ISO_8601).to_string())
    }

    fn import_text(&self, text: &str, value: &mut DynamicStruct) -> Result<(), TextFormatError> {
        let text = text.trim();
        let ticks = match text {
            "min" => 0,
            "max" => MAX_TICKS,
            "now" => date_time_to_ticks(Utc::now().naive_utc()).ok_or_else(|| {
                TextFormatError::OutOfRange {
                    expected: "date time",
                    text: text.into(),
                }
            })?,
            _ => {
                let date_time = parse_date_time(text).ok_or_else(|| TextFormatError::Invalid {
                    expected: "date time",
                    text: text.into(),
                })?;
                date_time_to_ticks(date_time).ok_or_else(|| TextFormatError::OutOfRange {
                    expected: "date time",
                    text: text.into(),
                })?
            }
        };

        value.insert(TICKS_FIELD, Value::Int(ticks));
        Ok(())
    }
}
