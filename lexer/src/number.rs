// SPDX-License-Identifier: Apache-2.0

use core::str::FromStr;

use crate::int_parser::{all_digits, digit_value, from_ascii_i64, from_digits_i64};

/// Binary exponents beyond this saturate; anything that large is already
/// infinite or zero.
const EXPONENT_LIMIT: i64 = 1 << 20;

/// The value of an ELTN number literal.
///
/// A literal with no `.` and no exponent that fits in an `i64` is an
/// [`EltnNumber::Integer`]; every other finite literal is an
/// [`EltnNumber::Float`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EltnNumber {
    Integer(i64),
    Float(f64),
}

impl EltnNumber {
    /// The value as an integer, if it was written as one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EltnNumber::Integer(val) => Some(*val),
            EltnNumber::Float(_) => None,
        }
    }

    /// The value as a double. Large integers may round.
    pub fn as_f64(&self) -> f64 {
        match self {
            EltnNumber::Integer(val) => *val as f64,
            EltnNumber::Float(val) => *val,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, EltnNumber::Integer(_))
    }
}

impl core::fmt::Display for EltnNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EltnNumber::Integer(val) => write!(f, "{val}"),
            // Debug keeps the fractional part: 1.0 rather than 1
            EltnNumber::Float(val) => write!(f, "{val:?}"),
        }
    }
}

impl From<i64> for EltnNumber {
    fn from(val: i64) -> Self {
        EltnNumber::Integer(val)
    }
}

impl From<f64> for EltnNumber {
    fn from(val: f64) -> Self {
        EltnNumber::Float(val)
    }
}

/// Parses a number lexeme as the lexer produces it: an optional leading `-`,
/// then either a decimal literal or a `0x`/`0X` hexadecimal literal with an
/// optional fraction and `p` exponent.
///
/// Returns `None` for anything malformed and for literals that overflow to
/// infinity.
///
/// ```
/// use eltn_lexer::{parse_number, EltnNumber};
///
/// assert_eq!(parse_number("42"), Some(EltnNumber::Integer(42)));
/// assert_eq!(parse_number("-0x10"), Some(EltnNumber::Integer(-16)));
/// assert_eq!(parse_number("0x1p4"), Some(EltnNumber::Float(16.0)));
/// assert_eq!(parse_number("1e999"), None);
/// ```
pub fn parse_number(text: &str) -> Option<EltnNumber> {
    let (is_negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let parsed = match body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        Some(hex) => parse_hex(is_negative, hex.as_bytes())?,
        None => parse_decimal(text, body.as_bytes())?,
    };
    match parsed {
        EltnNumber::Float(val) if !val.is_finite() => None,
        other => Some(other),
    }
}

/// Splits `mantissa[.fraction][marker exponent]`, checking every part.
struct Parts<'a> {
    whole: &'a [u8],
    fraction: Option<&'a [u8]>,
    exponent: Option<&'a [u8]>,
}

fn split_parts(body: &[u8], radix: u32, markers: [u8; 2]) -> Option<Parts<'_>> {
    let (mantissa, exponent) = match body.iter().position(|b| markers.contains(b)) {
        Some(pos) => (&body[..pos], Some(&body[pos + 1..])),
        None => (body, None),
    };
    let (whole, fraction) = match mantissa.iter().position(|&b| b == b'.') {
        Some(pos) => (&mantissa[..pos], Some(&mantissa[pos + 1..])),
        None => (mantissa, None),
    };

    let fraction_len = fraction.map_or(0, <[u8]>::len);
    if whole.is_empty() && fraction_len == 0 {
        return None;
    }
    if !whole.is_empty() && !all_digits(whole, radix) {
        return None;
    }
    if fraction_len > 0 && !all_digits(fraction.unwrap_or_default(), radix) {
        return None;
    }
    if let Some(exp) = exponent {
        let digits = match exp {
            [b'+' | b'-', rest @ ..] => rest,
            _ => exp,
        };
        if !all_digits(digits, 10) {
            return None;
        }
    }
    Some(Parts {
        whole,
        fraction,
        exponent,
    })
}

fn parse_decimal(text: &str, body: &[u8]) -> Option<EltnNumber> {
    let parts = split_parts(body, 10, [b'e', b'E'])?;
    if parts.fraction.is_none() && parts.exponent.is_none() {
        if let Ok(val) = from_ascii_i64(text.as_bytes(), 10) {
            return Some(EltnNumber::Integer(val));
        }
    }
    f64::from_str(text).ok().map(EltnNumber::Float)
}

fn parse_hex(is_negative: bool, body: &[u8]) -> Option<EltnNumber> {
    let parts = split_parts(body, 16, [b'p', b'P'])?;
    if parts.fraction.is_none() && parts.exponent.is_none() {
        if let Ok(val) = from_digits_i64(is_negative, parts.whole, 16) {
            return Some(EltnNumber::Integer(val));
        }
    }

    // Keep 15 significant hex digits (60 bits). Dropped digits move the
    // exponent, and a non-zero one sets the low bit so rounding sees it.
    let mut mantissa: u64 = 0;
    let mut exponent: i64 = parts.exponent.map_or(0, parse_exponent);
    let mut sticky = false;
    for &byte in parts.whole {
        let digit = digit_value(byte, 16).unwrap_or(0) as u64;
        if mantissa >> 56 == 0 {
            mantissa = (mantissa << 4) | digit;
        } else {
            sticky |= digit != 0;
            exponent = exponent.saturating_add(4);
        }
    }
    for &byte in parts.fraction.unwrap_or_default() {
        let digit = digit_value(byte, 16).unwrap_or(0) as u64;
        if mantissa >> 56 == 0 {
            mantissa = (mantissa << 4) | digit;
            exponent = exponent.saturating_sub(4);
        } else {
            sticky |= digit != 0;
        }
    }
    if sticky {
        mantissa |= 1;
    }

    let magnitude = scale_by_power_of_two(mantissa as f64, exponent);
    Some(EltnNumber::Float(if is_negative {
        -magnitude
    } else {
        magnitude
    }))
}

/// Decimal exponent digits after `p`, saturating at [`EXPONENT_LIMIT`].
fn parse_exponent(exp: &[u8]) -> i64 {
    let (is_negative, digits) = match exp {
        [b'-', rest @ ..] => (true, rest),
        [b'+', rest @ ..] => (false, rest),
        _ => (false, exp),
    };
    let mut value: i64 = 0;
    for &byte in digits {
        value = (value * 10 + i64::from(byte - b'0')).min(EXPONENT_LIMIT);
    }
    if is_negative {
        -value
    } else {
        value
    }
}

/// `2^exp` for exponents in the normal range of `f64`.
fn power_of_two(exp: i64) -> f64 {
    debug_assert!((-1022..=1023).contains(&exp));
    f64::from_bits(((exp + 1023) as u64) << 52)
}

fn scale_by_power_of_two(mut value: f64, mut exp: i64) -> f64 {
    if value == 0.0 {
        return value;
    }
    while exp > 0 && value.is_finite() {
        let step = exp.min(1000);
        value *= power_of_two(step);
        exp -= step;
    }
    while exp < 0 && value != 0.0 {
        let step = exp.max(-1000);
        value *= power_of_two(step);
        exp -= step;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_integers() {
        assert_eq!(parse_number("0"), Some(EltnNumber::Integer(0)));
        assert_eq!(parse_number("1"), Some(EltnNumber::Integer(1)));
        assert_eq!(parse_number("-17"), Some(EltnNumber::Integer(-17)));
        assert_eq!(
            parse_number("-9223372036854775808"),
            Some(EltnNumber::Integer(i64::MIN))
        );
    }

    #[test]
    fn decimal_integer_overflow_becomes_float() {
        assert_eq!(
            parse_number("9223372036854775808"),
            Some(EltnNumber::Float(9223372036854775808.0))
        );
    }

    #[test]
    fn decimal_floats() {
        assert_eq!(parse_number("1.5"), Some(EltnNumber::Float(1.5)));
        assert_eq!(parse_number("1."), Some(EltnNumber::Float(1.0)));
        assert_eq!(parse_number(".25"), Some(EltnNumber::Float(0.25)));
        assert_eq!(parse_number("-.5"), Some(EltnNumber::Float(-0.5)));
        assert_eq!(parse_number("1e3"), Some(EltnNumber::Float(1000.0)));
        assert_eq!(parse_number("2.5E-1"), Some(EltnNumber::Float(0.25)));
        assert_eq!(parse_number("1e+2"), Some(EltnNumber::Float(100.0)));
    }

    #[test]
    fn hex_integers() {
        assert_eq!(parse_number("0x10"), Some(EltnNumber::Integer(16)));
        assert_eq!(parse_number("0XfF"), Some(EltnNumber::Integer(255)));
        assert_eq!(parse_number("-0x10"), Some(EltnNumber::Integer(-16)));
        assert_eq!(
            parse_number("0x7fffffffffffffff"),
            Some(EltnNumber::Integer(i64::MAX))
        );
        assert_eq!(
            parse_number("0xffffffffffffffff"),
            Some(EltnNumber::Float(18446744073709551615.0))
        );
    }

    #[test]
    fn hex_floats() {
        assert_eq!(parse_number("0x1p4"), Some(EltnNumber::Float(16.0)));
        assert_eq!(parse_number("0x.8"), Some(EltnNumber::Float(0.5)));
        assert_eq!(parse_number("0xA.8p1"), Some(EltnNumber::Float(21.0)));
        assert_eq!(parse_number("0x1P-2"), Some(EltnNumber::Float(0.25)));
        assert_eq!(parse_number("-0x1.8"), Some(EltnNumber::Float(-1.5)));
        assert_eq!(parse_number("0x1p-1074"), Some(EltnNumber::Float(5e-324)));
    }

    #[test]
    fn hex_floats_round_past_dropped_digits() {
        // exactly halfway between 1.0 and the next double: ties to even
        assert_eq!(
            parse_number("0x1.00000000000008p0"),
            Some(EltnNumber::Float(1.0))
        );
        // a non-zero digit beyond the kept ones tips it upwards
        assert_eq!(
            parse_number("0x1.000000000000080001p0"),
            Some(EltnNumber::Float(1.0000000000000002))
        );
        assert_eq!(
            parse_number("0x10000000000000801p0"),
            Some(EltnNumber::Float(18446744073709555712.0))
        );
    }

    #[test]
    fn rejects_malformed() {
        for text in [
            "", "-", ".", "..", "1..2", "1.2.3", "1e", "1e+", "0x", "0x.", "0xg", "1f", "1-2",
            "--1", "+1", "1p2", "0x1e+", "0x1p", "e10", "1ee2",
        ] {
            assert_eq!(parse_number(text), None, "{text:?} should be rejected");
        }
    }

    #[test]
    fn rejects_infinite() {
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("-1e999"), None);
        assert_eq!(parse_number("0x1p99999"), None);
    }

    #[test]
    fn display_keeps_float_marker() {
        assert_eq!(EltnNumber::Integer(3).to_string(), "3");
        assert_eq!(EltnNumber::Float(3.0).to_string(), "3.0");
        assert_eq!(EltnNumber::Float(0.5).to_string(), "0.5");
    }

    #[test]
    fn conversions() {
        assert_eq!(EltnNumber::Integer(7).as_int(), Some(7));
        assert_eq!(EltnNumber::Float(7.0).as_int(), None);
        assert_eq!(EltnNumber::Integer(7).as_f64(), 7.0);
        assert!(EltnNumber::from(1i64).is_integer());
        assert!(!EltnNumber::from(1.0).is_integer());
    }
}
