use crate::error::{Result, SubmuteError};

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) into seconds.
///
/// The hour field takes any number of digits and is not wrapped at 24.
/// Minutes and seconds must be two digits below 60, milliseconds exactly
/// three digits after a comma. `HH:MM:SS.mmm` is rejected.
pub fn parse_timestamp(timestamp: &str) -> Result<f64> {
    let malformed = || SubmuteError::MalformedTimestamp(timestamp.to_string());

    let (clock, millis) = timestamp.split_once(',').ok_or_else(malformed)?;
    let mut fields = clock.split(':');
    let (Some(hours), Some(minutes), Some(seconds), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(malformed());
    };

    let hours = parse_digits(hours, None).ok_or_else(malformed)?;
    let minutes = parse_digits(minutes, Some(2)).ok_or_else(malformed)?;
    let seconds = parse_digits(seconds, Some(2)).ok_or_else(malformed)?;
    let millis = parse_digits(millis, Some(3)).ok_or_else(malformed)?;

    if minutes >= 60 || seconds >= 60 {
        return Err(malformed());
    }

    // Sum in integer milliseconds so the single division rounds once.
    let total_millis = hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add((minutes * 60 + seconds) * 1000 + millis))
        .ok_or_else(malformed)?;
    Ok(total_millis as f64 / 1000.0)
}

fn parse_digits(field: &str, width: Option<usize>) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if width.is_some_and(|w| field.len() != w) {
        return None;
    }
    field.parse().ok()
}
