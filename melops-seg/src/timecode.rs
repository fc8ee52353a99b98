//! Subtitle timestamp codec (`HH:MM:SS,mmm`).

use crate::error::ParseError;
use std::time::Duration;

/// Separator between start and end in a time-range line
pub const RANGE_SEPARATOR: &str = " --> ";

/// Format a duration as `HH:MM:SS,mmm`, truncated to milliseconds.
///
/// Hours are zero-padded to two digits and grow past that when needed.
pub fn format_timestamp(d: Duration) -> String {
    let millis = d.as_millis();
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);

    format!("{hours:02}:{minutes:02}:{seconds:02},{millis:03}")
}

/// Format a time-range line.
pub fn format_time_range(start: Duration, end: Duration) -> String {
    format!(
        "{}{RANGE_SEPARATOR}{}",
        format_timestamp(start),
        format_timestamp(end)
    )
}

/// Parse `HH:MM:SS,mmm` into a duration.
///
/// A `.` is accepted in place of the comma. Minutes and seconds must be
/// below 60 and the millisecond field must have exactly three digits.
pub fn parse_timestamp(s: &str) -> Result<Duration, ParseError> {
    let invalid = || ParseError::InvalidTimestamp {
        value: s.to_string(),
    };

    let s = s.trim();
    let (hms, millis) = s.split_once([',', '.']).ok_or_else(invalid)?;

    let mut fields = hms.split(':');
    let (Some(h), Some(m), Some(sec), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(invalid());
    };

    let hours = parse_digits(h, None).ok_or_else(invalid)?;
    let minutes = parse_digits(m, Some(2)).ok_or_else(invalid)?;
    let seconds = parse_digits(sec, Some(2)).ok_or_else(invalid)?;
    let millis = parse_digits(millis, Some(3)).ok_or_else(invalid)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    let total = ((hours * 60 + minutes) * 60 + seconds) * 1000 + millis;
    Ok(Duration::from_millis(total))
}

/// Parse `start --> end`.
pub fn parse_time_range(s: &str) -> Result<(Duration, Duration), ParseError> {
    let (start, end) = s
        .split_once("-->")
        .ok_or_else(|| ParseError::InvalidTimestamp {
            value: s.to_string(),
        })?;

    Ok((parse_timestamp(start)?, parse_timestamp(end)?))
}

/// Parse an ASCII digit field, optionally of an exact width.
fn parse_digits(s: &str, width: Option<usize>) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if width.is_some_and(|w| s.len() != w) {
        return None;
    }
    s.parse().ok()
}
