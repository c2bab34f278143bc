//! Duration strings such as `300ms`, `1.5s` or `1h30m`.
//!
//! A duration is an optionally signed sequence of decimal numbers, each with
//! an optional fraction and a mandatory unit (`ns`, `us`/`µs`, `ms`, `s`,
//! `m`, `h`). The single exception is a bare `0`.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid duration: {0:?}")]
pub struct InvalidDuration(pub String);

fn unit_nanos(unit: &str) -> Option<u128> {
    Some(match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    })
}

fn split_digits(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

/// Parses `input` into signed nanoseconds.
pub fn parse_duration(input: &str) -> Result<i128, InvalidDuration> {
    let invalid = || InvalidDuration(input.to_string());

    let (negative, mut s) = match input.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, input.strip_prefix('+').unwrap_or(input)),
    };

    if s == "0" {
        return Ok(0);
    }
    if s.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !s.is_empty() {
        let (int_part, rest) = split_digits(s);
        let (frac_part, rest) = match rest.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", rest),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(invalid());
        }

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let (unit, rest) = rest.split_at(unit_end);
        let scale = unit_nanos(unit).ok_or_else(invalid)?;

        if !int_part.is_empty() {
            let value: u128 = int_part.parse().map_err(|_| invalid())?;
            total = value
                .checked_mul(scale)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(invalid)?;
        }
        if !frac_part.is_empty() {
            let digits = &frac_part[..frac_part.len().min(18)];
            let value: u128 = digits.parse().map_err(|_| invalid())?;
            total += value * scale / 10u128.pow(digits.len() as u32);
        }

        s = rest;
    }

    if total > u64::MAX as u128 {
        return Err(invalid());
    }

    let nanos = total as i128;
    Ok(if negative { -nanos } else { nanos })
}
