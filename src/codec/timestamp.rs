//! Absolute time specifications (`--begin`, `--deadline`).

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

use super::ValueError;

const DISPLAY_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a time specification relative to the current local time.
/// Returns seconds since the Unix epoch.
pub fn parse_time(s: &str) -> Result<i64, ValueError> {
    parse_time_at(s, Local::now())
}

/// Parse a time specification relative to `now`.
///
/// Accepted forms: `now[+N[units]]`, `today`, `tomorrow`, `midnight`,
/// `noon`, `teatime`, `HH:MM[:SS]` (rolls to the next day when already
/// past) and `YYYY-MM-DD[THH:MM[:SS]]`.
pub fn parse_time_at(s: &str, now: DateTime<Local>) -> Result<i64, ValueError> {
    let invalid = || ValueError::new(format!("Invalid time specification \"{}\"", s));
    let spec = s.trim().to_ascii_lowercase();

    if let Some(rest) = spec.strip_prefix("now") {
        if rest.is_empty() {
            return Ok(now.timestamp());
        }
        let offset = rest.strip_prefix('+').ok_or_else(invalid)?;
        return relative_offset(offset)
            .and_then(|secs| now.timestamp().checked_add(secs))
            .ok_or_else(invalid);
    }

    let today = now.date_naive();
    let resolved = match spec.as_str() {
        "today" => at(today, NaiveTime::MIN),
        "tomorrow" => at(today.succ_opt().ok_or_else(invalid)?, NaiveTime::MIN),
        "midnight" => next_occurrence(now, NaiveTime::MIN),
        "noon" => next_occurrence(now, hms(12, 0, 0).ok_or_else(invalid)?),
        "teatime" => next_occurrence(now, hms(16, 0, 0).ok_or_else(invalid)?),
        _ if spec.contains('-') => {
            let (date, time) = match spec.split_once('t') {
                Some((date, time)) => (date, Some(time)),
                None => (spec.as_str(), None),
            };
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| invalid())?;
            let time = match time {
                Some(t) => clock(t).ok_or_else(invalid)?,
                None => NaiveTime::MIN,
            };
            at(date, time)
        }
        _ => next_occurrence(now, clock(&spec).ok_or_else(invalid)?),
    };

    resolved.map(|t| t.timestamp()).ok_or_else(invalid)
}

/// Render an epoch timestamp in local time; `None` prints as `Unknown`.
pub fn make_time_str(epoch: Option<i64>) -> String {
    epoch
        .and_then(|secs| Local.timestamp_opt(secs, 0).single())
        .map(|t| t.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn relative_offset(s: &str) -> Option<i64> {
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, unit) = s.split_at(split);
    let n: i64 = digits.parse().ok()?;
    let scale = match unit {
        "" | "s" | "sec" | "secs" | "second" | "seconds" => 1,
        "m" | "min" | "mins" | "minute" | "minutes" => 60,
        "h" | "hour" | "hours" => 3_600,
        "d" | "day" | "days" => 86_400,
        "w" | "week" | "weeks" => 604_800,
        _ => return None,
    };
    n.checked_mul(scale)
}

fn hms(h: u32, m: u32, s: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, s)
}

fn clock(s: &str) -> Option<NaiveTime> {
    let parts: Vec<u32> = s.split(':').map(|p| p.parse().ok()).collect::<Option<_>>()?;
    match parts.as_slice() {
        [h, m] => hms(*h, *m, 0),
        [h, m, s] => hms(*h, *m, *s),
        _ => None,
    }
}

fn at(date: NaiveDate, time: NaiveTime) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&NaiveDateTime::new(date, time))
        .earliest()
}

fn next_occurrence(now: DateTime<Local>, time: NaiveTime) -> Option<DateTime<Local>> {
    let candidate = at(now.date_naive(), time)?;
    if candidate > now {
        Some(candidate)
    } else {
        Some(candidate + Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    #[test]
    fn now_with_offset() {
        let now = fixed_now();
        assert_eq!(parse_time_at("now", now), Ok(now.timestamp()));
        assert_eq!(parse_time_at("now+60", now), Ok(now.timestamp() + 60));
        assert_eq!(parse_time_at("now+2hours", now), Ok(now.timestamp() + 7_200));
        assert!(parse_time_at("now+2fortnights", now).is_err());
    }

    #[test]
    fn oversized_offsets_rejected() {
        let now = fixed_now();
        assert!(parse_time_at("now+9223372036854775807", now).is_err());
        assert!(parse_time_at("now+9223372036854775807weeks", now).is_err());
        assert!(parse_time_at("now+99999999999999999999", now).is_err());
    }

    #[test]
    fn clock_time_rolls_forward() {
        let now = fixed_now();
        let later = parse_time_at("13:00", now).unwrap();
        assert_eq!(later - now.timestamp(), 1_800);

        let earlier = parse_time_at("12:00", now).unwrap();
        assert_eq!(earlier - now.timestamp(), 86_400 - 1_800);
    }

    #[test]
    fn iso_dates() {
        let now = fixed_now();
        let expected = Local.with_ymd_and_hms(2024, 6, 2, 8, 15, 0).unwrap();
        assert_eq!(parse_time_at("2024-06-02T08:15", now), Ok(expected.timestamp()));
        assert!(parse_time_at("2024-13-02", now).is_err());
    }

    #[test]
    fn unset_displays_unknown() {
        assert_eq!(make_time_str(None), "Unknown");
    }
}
