//! Calendar-like rendering of the simulated clock.
//!
//! The simulation itself only counts elapsed seconds. These helpers turn that
//! counter into the strings a snapshot carries, and back.

use chrono::{Duration, NaiveDateTime};

use crate::{ResultsError, ResultsResult};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const SECONDS_PER_DAY: u64 = 86_400;
const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_MINUTE: u64 = 60;

/// Render elapsed seconds as `"<d> d <h> h <m> m <s> s"`.
pub fn format_elapsed(elapsed_s: u64) -> String {
    let days = elapsed_s / SECONDS_PER_DAY;
    let hours = (elapsed_s % SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    let minutes = (elapsed_s % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
    let seconds = elapsed_s % SECONDS_PER_MINUTE;
    format!("{days} d {hours} h {minutes} m {seconds} s")
}

/// Parse the output of [`format_elapsed`] back to seconds.
pub fn parse_elapsed(text: &str) -> ResultsResult<u64> {
    let invalid = || ResultsError::InvalidFormat {
        what: "elapsed time",
        value: text.to_string(),
    };

    let parts: Vec<&str> = text.split_whitespace().collect();
    if parts.len() != 8 {
        return Err(invalid());
    }

    let mut total = 0_u64;
    for (pair, (unit, scale)) in parts.chunks(2).zip([
        ("d", SECONDS_PER_DAY),
        ("h", SECONDS_PER_HOUR),
        ("m", SECONDS_PER_MINUTE),
        ("s", 1),
    ]) {
        if pair[1] != unit {
            return Err(invalid());
        }
        let value: u64 = pair[0].parse().map_err(|_| invalid())?;
        total = value
            .checked_mul(scale)
            .and_then(|v| total.checked_add(v))
            .ok_or_else(invalid)?;
    }
    Ok(total)
}

/// Render `start + elapsed_s` with [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(start: NaiveDateTime, elapsed_s: u64) -> String {
    let offset = i64::try_from(elapsed_s)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX);
    start
        .checked_add_signed(offset)
        .unwrap_or(NaiveDateTime::MAX)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn elapsed_formatting() {
        assert_eq!(format_elapsed(0), "0 d 0 h 0 m 0 s");
        assert_eq!(format_elapsed(300), "0 d 0 h 5 m 0 s");
        assert_eq!(format_elapsed(90_061), "1 d 1 h 1 m 1 s");
    }

    #[test]
    fn elapsed_parses_back() {
        for secs in [0_u64, 59, 300, 3_600, 86_399, 86_400, 1_000_000] {
            assert_eq!(parse_elapsed(&format_elapsed(secs)).unwrap(), secs);
        }
    }

    #[test]
    fn elapsed_rejects_garbage() {
        assert!(parse_elapsed("").is_err());
        assert!(parse_elapsed("1 d 2 h 3 m").is_err());
        assert!(parse_elapsed("1 x 2 h 3 m 4 s").is_err());
        assert!(parse_elapsed("a d 2 h 3 m 4 s").is_err());
    }

    #[test]
    fn timestamp_crosses_midnight() {
        let text = format_timestamp(start(), 16 * 3_600 + 300);
        assert_eq!(text, "2024-03-02 00:05:00");
    }

    #[test]
    fn timestamp_saturates_far_future() {
        let text = format_timestamp(start(), u64::MAX);
        assert_eq!(text, NaiveDateTime::MAX.format(TIMESTAMP_FORMAT).to_string());
    }
}
