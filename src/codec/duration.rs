//! Time durations: `M`, `M:S`, `H:M:S`, `D-H`, `D-H:M`, `D-H:M:S`.

use super::ValueError;

/// Marker for "no limit", shared by minute and second values.
pub const INFINITE: u32 = u32::MAX;

/// Parse a duration string into seconds.
pub fn time_str_to_secs(s: &str) -> Result<u32, ValueError> {
    let invalid = || ValueError::new(format!("Invalid time specification \"{}\"", s));

    let s = s.trim();
    if s.is_empty() {
        return Err(invalid());
    }
    if s == "-1" || s.eq_ignore_ascii_case("infinite") || s.eq_ignore_ascii_case("unlimited") {
        return Ok(INFINITE);
    }

    let (days, rest) = match s.split_once('-') {
        Some((d, rest)) => (Some(field(d).ok_or_else(invalid)?), rest),
        None => (None, s),
    };

    let parts = rest
        .split(':')
        .map(field)
        .collect::<Option<Vec<u64>>>()
        .ok_or_else(invalid)?;

    let (hours, minutes, seconds) = match (days.is_some(), parts.as_slice()) {
        (true, [h]) => (*h, 0, 0),
        (true, [h, m]) => (*h, *m, 0),
        (_, [h, m, s]) => (*h, *m, *s),
        (false, [m]) => (0, *m, 0),
        (false, [m, s]) => (0, *m, *s),
        _ => return Err(invalid()),
    };

    let total = days
        .unwrap_or(0)
        .checked_mul(86_400)
        .and_then(|t| t.checked_add(hours.checked_mul(3_600)?))
        .and_then(|t| t.checked_add(minutes.checked_mul(60)?))
        .and_then(|t| t.checked_add(seconds))
        .ok_or_else(invalid)?;
    u32::try_from(total)
        .ok()
        .filter(|t| *t != INFINITE)
        .ok_or_else(invalid)
}

/// Parse a duration string into whole minutes, rounding seconds up.
pub fn time_str_to_mins(s: &str) -> Result<u32, ValueError> {
    let secs = time_str_to_secs(s)?;
    if secs == INFINITE {
        return Ok(INFINITE);
    }
    Ok(secs.div_ceil(60))
}

pub fn secs_to_time_str(secs: u32) -> String {
    if secs == INFINITE {
        return "UNLIMITED".to_string();
    }
    let days = secs / 86_400;
    let hours = (secs / 3_600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    if days > 0 {
        format!("{}-{:02}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

pub fn mins_to_time_str(mins: u32) -> String {
    if mins == INFINITE {
        return "UNLIMITED".to_string();
    }
    match mins.checked_mul(60) {
        Some(secs) => secs_to_time_str(secs),
        None => "UNLIMITED".to_string(),
    }
}

fn field(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
