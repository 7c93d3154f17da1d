//! Duration values for command line flags
//!
//! Accepts a non-negative integer followed by `ms`, `s`, `m` or `h`; a bare
//! number means seconds.

use std::time::Duration;

/// Parse `"500ms"`, `"2s"`, `"2m"`, `"1h"` or `"30"` into a Duration
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    if digits.is_empty() {
        return Err(format!("invalid duration '{}': missing number", input));
    }
    let value: u64 = digits
        .parse()
        .map_err(|e| format!("invalid duration '{}': {}", input, e))?;

    let duration = match unit.trim() {
        "ms" => Duration::from_millis(value),
        "" | "s" => Duration::from_secs(value),
        "m" => value
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{}' is too large", input))?,
        "h" => value
            .checked_mul(3600)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration '{}' is too large", input))?,
        other => {
            return Err(format!(
                "invalid duration unit '{}' in '{}'. Valid units: ms, s, m, h",
                other, input
            ))
        }
    };

    Ok(duration)
}
