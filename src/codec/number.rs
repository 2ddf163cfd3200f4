//! Integer parsing and environment truthiness.

use super::ValueError;

/// Parse a whole string as an `i64`, rejecting trailing garbage.
pub fn parse_full_int(s: &str) -> Option<i64> {
    s.trim_start().parse::<i64>().ok()
}

/// Parse a numeric option value.
///
/// With `positive` set, zero and negative values are rejected as well.
pub fn parse_int(label: &str, s: &str, positive: bool) -> Result<i32, ValueError> {
    let value = parse_full_int(s)
        .ok_or_else(|| ValueError::new(format!("Invalid numeric value \"{}\" for {}.", s, label)))?;

    let value = i32::try_from(value)
        .map_err(|_| ValueError::new(format!("Numeric argument ({}) too large for {}.", s, label)))?;
    if positive && value <= 0 {
        return Err(ValueError::new(format!("{} \"{}\" should be positive", label, s)));
    }

    Ok(value)
}

/// Whether an environment value switches a flag on.
///
/// Empty, `yes` (any case) and any non-zero integer are true; everything
/// else is false.
pub fn env_truthy(s: &str) -> bool {
    if s.is_empty() || s.eq_ignore_ascii_case("yes") {
        return true;
    }
    matches!(parse_full_int(s), Some(n) if n != 0)
}
