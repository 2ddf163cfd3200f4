//! Memory sizes, expressed in megabytes.

use super::ValueError;

/// Parse `<n>[K|M|G|T]` into megabytes. A bare number is already megabytes;
/// kilobytes round up.
pub fn str_to_mbytes(s: &str) -> Result<u64, ValueError> {
    let invalid = || ValueError::new(format!("Invalid memory specification \"{}\"", s));

    let s = s.trim();
    let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, suffix) = s.split_at(split);
    if digits.is_empty() {
        return Err(invalid());
    }
    let n: u64 = digits.parse().map_err(|_| invalid())?;

    let mbytes = match suffix.to_ascii_uppercase().as_str() {
        "" | "M" | "MB" => Some(n),
        "K" | "KB" => Some(n.div_ceil(1024)),
        "G" | "GB" => n.checked_mul(1024),
        "T" | "TB" => n.checked_mul(1024 * 1024),
        _ => None,
    };
    mbytes.ok_or_else(invalid)
}

/// Render megabytes with the largest exact unit; `None` prints as `unset`.
pub fn mbytes_to_str(mbytes: Option<u64>) -> String {
    match mbytes {
        None => "unset".to_string(),
        Some(0) => "0M".to_string(),
        Some(mb) if mb % (1024 * 1024) == 0 => format!("{}T", mb / (1024 * 1024)),
        Some(mb) if mb % 1024 == 0 => format!("{}G", mb / 1024),
        Some(mb) => format!("{}M", mb),
    }
}
