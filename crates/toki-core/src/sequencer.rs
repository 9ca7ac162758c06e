//! Duration sequencer.
//!
//! Turns the free-form timer argument (`"25m, 5m, 25m"`, `"10 5 2"`,
//! `"1m30s-45"`) into a [`TimerSpec`]. Tokens are separated by any mix of
//! whitespace, commas and hyphens; bare numbers are read as seconds.

use std::borrow::Cow;
use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{CoreError, Result};
use crate::timer::TimerSpec;

const TIMER_ARG_SEP: &str = r"\s*[\s,-]\s*";

/// Unit appended to tokens that are bare numbers.
const DEFAULT_UNIT: &str = "s";

/// Largest duration accepted, in nanoseconds (signed 64-bit limit).
const MAX_NANOS: u128 = i64::MAX as u128;

/// Fraction digits beyond this are ignored.
const MAX_FRACTION_DIGITS: usize = 18;

fn separator() -> &'static Regex {
    static SEP: OnceLock<Regex> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(TIMER_ARG_SEP).expect("separator pattern is valid"))
}

/// Split the timer argument into non-empty tokens, preserving order.
pub fn tokenize(input: &str) -> Vec<&str> {
    separator()
        .split(input)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Append the default unit to a token that is a bare number.
pub fn normalize(token: &str) -> Cow<'_, str> {
    if token.parse::<f64>().is_ok() {
        Cow::Owned(format!("{token}{DEFAULT_UNIT}"))
    } else {
        Cow::Borrowed(token)
    }
}

/// Parse the full timer argument.
///
/// # Errors
///
/// [`CoreError::EmptySpec`] if no tokens remain after splitting,
/// [`CoreError::InvalidDurationFormat`] on the first token that does not parse.
pub fn parse_timer_spec(input: &str) -> Result<TimerSpec> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(CoreError::EmptySpec);
    }

    let stages = tokens
        .into_iter()
        .map(|token| parse_duration(&normalize(token)))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!(stages = stages.len(), "parsed timer specification");
    TimerSpec::new(stages)
}

/// Parse a single duration such as `1h30m`, `1.5s`, `.5m` or `300ms`.
///
/// The literal `0` needs no unit. Negative values cannot be represented and
/// are rejected unless they are zero.
///
/// # Errors
///
/// Returns [`CoreError::InvalidDurationFormat`] on any malformed input.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(CoreError::InvalidDurationFormat);
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let (int_part, after_int) = split_digits(rest);
        let (frac_part, after_frac) = match after_int.strip_prefix('.') {
            Some(after_dot) => split_digits(after_dot),
            None => ("", after_int),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(CoreError::InvalidDurationFormat);
        }

        let unit_len = after_frac
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_frac.len());
        let (unit, remainder) = after_frac.split_at(unit_len);
        let scale = unit_nanos(unit).ok_or(CoreError::InvalidDurationFormat)?;

        total = total
            .checked_add(group_nanos(int_part, frac_part, scale)?)
            .filter(|t| *t <= MAX_NANOS)
            .ok_or(CoreError::InvalidDurationFormat)?;
        rest = remainder;
    }

    if negative && total != 0 {
        return Err(CoreError::InvalidDurationFormat);
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| CoreError::InvalidDurationFormat)
}

fn split_digits(s: &str) -> (&str, &str) {
    let len = s.bytes().take_while(u8::is_ascii_digit).count();
    s.split_at(len)
}

fn group_nanos(int_part: &str, frac_part: &str, scale: u128) -> Result<u128> {
    let whole: u128 = if int_part.is_empty() {
        0
    } else {
        int_part
            .parse()
            .map_err(|_| CoreError::InvalidDurationFormat)?
    };
    let value = whole
        .checked_mul(scale)
        .ok_or(CoreError::InvalidDurationFormat)?;

    let mut fraction: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in frac_part.bytes().take(MAX_FRACTION_DIGITS) {
        fraction = fraction * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    value
        .checked_add(fraction * scale / denominator)
        .ok_or(CoreError::InvalidDurationFormat)
}

fn unit_nanos(unit: &str) -> Option<u128> {
    let nanos = match unit {
        "ns" => 1,
        "us" | "µs" | "μs" => 1_000,
        "ms" => 1_000_000,
        "s" => 1_000_000_000,
        "m" => 60 * 1_000_000_000,
        "h" => 3_600 * 1_000_000_000,
        _ => return None,
    };
    Some(nanos)
}
