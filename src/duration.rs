//! Duration text grammar: signed decimal numbers with unit suffixes,
//! such as `2s`, `150ms`, or `1h30m`.
//!
//! Units are `ns`, `us`/`µs`, `ms`, `s`, `m`, and `h`. Components may
//! carry decimal fractions (`1.5s`) and concatenate (`1m30s`).
//! [`std::time::Duration`] is unsigned, so negative inputs are rejected.

use std::time::Duration;

use crate::error::ConfigError;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SECOND: u128 = 1_000_000_000;
const NANOS_PER_MINUTE: u128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MINUTE;

/// Parse a duration string like `2s`, `150ms`, or `1h30m`.
pub fn parse_duration(text: &str) -> Result<Duration, ConfigError> {
    let err = || ConfigError::parse(text, "duration");

    let mut rest = text.strip_prefix('+').unwrap_or(text);
    if rest.starts_with('-') {
        return Err(err());
    }
    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(err());
    }

    let mut total_nanos: u128 = 0;
    while !rest.is_empty() {
        let (int_part, after_int) = split_digits(rest);
        rest = after_int;

        let mut frac_part = "";
        if let Some(after_dot) = rest.strip_prefix('.') {
            let (frac, after_frac) = split_digits(after_dot);
            frac_part = frac;
            rest = after_frac;
        }
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(err());
        }

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let (unit, after_unit) = rest.split_at(unit_end);
        rest = after_unit;

        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            _ => return Err(err()),
        };

        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| err())?
        };
        total_nanos = whole
            .checked_mul(scale)
            .and_then(|n| total_nanos.checked_add(n))
            .ok_or_else(err)?;

        if !frac_part.is_empty() {
            let frac: f64 = format!("0.{frac_part}").parse().map_err(|_| err())?;
            total_nanos = total_nanos
                .checked_add((frac * scale as f64) as u128)
                .ok_or_else(err)?;
        }
    }

    let secs = u64::try_from(total_nanos / NANOS_PER_SECOND).map_err(|_| err())?;
    let nanos = (total_nanos % NANOS_PER_SECOND) as u32;
    Ok(Duration::new(secs, nanos))
}

/// Format a duration in the same grammar [`parse_duration`] accepts.
///
/// Sub-second durations pick the largest fitting unit (`150ms`, `1.5µs`);
/// longer durations decompose into hours, minutes, and seconds (`1m30s`).
pub fn format_duration(duration: Duration) -> String {
    let total = duration.as_nanos();
    if total == 0 {
        return "0s".to_string();
    }
    if total < NANOS_PER_MICRO {
        return format!("{total}ns");
    }
    if total < NANOS_PER_MILLI {
        return with_fraction(total, NANOS_PER_MICRO, "µs");
    }
    if total < NANOS_PER_SECOND {
        return with_fraction(total, NANOS_PER_MILLI, "ms");
    }

    let hours = total / NANOS_PER_HOUR;
    let minutes = (total % NANOS_PER_HOUR) / NANOS_PER_MINUTE;
    let rest = total % NANOS_PER_MINUTE;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&with_fraction(rest, NANOS_PER_SECOND, "s"));
    out
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn with_fraction(value: u128, scale: u128, unit: &str) -> String {
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return format!("{whole}{unit}");
    }
    let width = scale.ilog10() as usize;
    let mut digits = format!("{frac:0width$}");
    while digits.ends_with('0') {
        digits.pop();
    }
    format!("{whole}.{digits}{unit}")
}
