//! Local-time helpers for timestamps shown in the UI.

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::FormatItem};

const DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const TIME_FORMAT: &[FormatItem<'static>] = format_description!("[hour]:[minute]:[second]");

/// Current time in the local offset, or UTC when the offset is unknown.
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `YYYY-MM-DD hh:mm:ss` in the local offset.
pub fn display_datetime(value: OffsetDateTime) -> String {
    to_local(value)
        .format(DATETIME_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

/// `hh:mm:ss` in the local offset.
pub fn display_time(value: OffsetDateTime) -> String {
    to_local(value)
        .format(TIME_FORMAT)
        .unwrap_or_else(|_| value.to_string())
}

/// Parse an artifact timestamp.
///
/// Accepts RFC 3339 and offset-less ISO 8601 (treated as UTC, which is what
/// the training scripts write).
pub fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .or_else(|| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT)
                .ok()
                .map(PrimitiveDateTime::assume_utc)
        })
}

fn to_local(value: OffsetDateTime) -> OffsetDateTime {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    value.to_offset(offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_fraction() {
        let parsed = parse_timestamp("2024-05-01T12:00:00.123456Z").unwrap();
        assert_eq!(parsed.unix_timestamp(), 1_714_564_800);
    }

    #[test]
    fn parses_naive_iso_as_utc() {
        let parsed = parse_timestamp("2024-05-01T12:00:00").unwrap();
        assert_eq!(parsed.offset(), UtcOffset::UTC);
        assert_eq!(parsed.unix_timestamp(), 1_714_564_800);
    }

    #[test]
    fn rejects_free_text() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
