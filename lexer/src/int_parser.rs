// SPDX-License-Identifier: Apache-2.0

// Integer parsing for ELTN literals, modelled on core::num's radix parser.

/// Why a digit string could not become an `i64`.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ParseIntegerError {
    /// The input byte slice was empty.
    Empty,
    /// The input consisted only of a sign character (`+` or `-`).
    SignOnly,
    /// A byte was not a digit of the requested radix.
    InvalidDigit,
    /// The number overflowed or underflowed `i64`.
    Overflow,
}

/// Parses an optionally signed run of base-`radix` digits (radix 10 or 16)
/// into an `i64`.
///
/// This function is guaranteed not to panic.
pub const fn from_ascii_i64(src: &[u8], radix: u32) -> Result<i64, ParseIntegerError> {
    let (is_negative, digits) = match src {
        [] => return Err(ParseIntegerError::Empty),
        [b'+', rest @ ..] => (false, rest),
        [b'-', rest @ ..] => (true, rest),
        _ => (false, src),
    };

    if digits.is_empty() {
        return Err(ParseIntegerError::SignOnly);
    }

    from_digits_i64(is_negative, digits, radix)
}

/// Parses unsigned base-`radix` digits, negating them when `is_negative`.
///
/// Negative values accumulate downwards so `i64::MIN` is reachable.
pub const fn from_digits_i64(
    is_negative: bool,
    mut digits: &[u8],
    radix: u32,
) -> Result<i64, ParseIntegerError> {
    if digits.is_empty() {
        return Err(ParseIntegerError::Empty);
    }

    let mut result: i64 = 0;

    while let Some((&byte, rest)) = digits.split_first() {
        let digit = match digit_value(byte, radix) {
            Some(d) => d as i64,
            None => return Err(ParseIntegerError::InvalidDigit),
        };

        result = match result.checked_mul(radix as i64) {
            Some(val) => val,
            None => return Err(ParseIntegerError::Overflow),
        };

        result = if is_negative {
            match result.checked_sub(digit) {
                Some(val) => val,
                None => return Err(ParseIntegerError::Overflow),
            }
        } else {
            match result.checked_add(digit) {
                Some(val) => val,
                None => return Err(ParseIntegerError::Overflow),
            }
        };

        digits = rest;
    }

    Ok(result)
}

/// Value of a single digit in `radix`, if it is one.
pub const fn digit_value(byte: u8, radix: u32) -> Option<u32> {
    let value = match byte {
        b'0'..=b'9' => (byte - b'0') as u32,
        b'a'..=b'f' => (byte - b'a') as u32 + 10,
        b'A'..=b'F' => (byte - b'A') as u32 + 10,
        _ => return None,
    };
    if value < radix {
        Some(value)
    } else {
        None
    }
}

/// Whether every byte is a digit of `radix`. Empty input is not.
pub const fn all_digits(mut src: &[u8], radix: u32) -> bool {
    if src.is_empty() {
        return false;
    }
    while let Some((&byte, rest)) = src.split_first() {
        if digit_value(byte, radix).is_none() {
            return false;
        }
        src = rest;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_simple() {
        assert_eq!(from_ascii_i64(b"0", 10), Ok(0));
        assert_eq!(from_ascii_i64(b"1234567890", 10), Ok(1234567890));
        assert_eq!(from_ascii_i64(b"-1234567890", 10), Ok(-1234567890));
        assert_eq!(from_ascii_i64(b"+1234567890", 10), Ok(1234567890));
    }

    #[test]
    fn decimal_limits() {
        assert_eq!(from_ascii_i64(b"9223372036854775807", 10), Ok(i64::MAX));
        assert_eq!(from_ascii_i64(b"-9223372036854775808", 10), Ok(i64::MIN));
    }

    #[test]
    fn decimal_overflow() {
        assert_eq!(
            from_ascii_i64(b"9223372036854775808", 10),
            Err(ParseIntegerError::Overflow)
        );
        assert_eq!(
            from_ascii_i64(b"-9223372036854775809", 10),
            Err(ParseIntegerError::Overflow)
        );
    }

    #[test]
    fn hexadecimal() {
        assert_eq!(from_ascii_i64(b"ff", 16), Ok(255));
        assert_eq!(from_ascii_i64(b"-10", 16), Ok(-16));
        assert_eq!(from_ascii_i64(b"7FFFFFFFFFFFFFFF", 16), Ok(i64::MAX));
        assert_eq!(from_ascii_i64(b"-8000000000000000", 16), Ok(i64::MIN));
        assert_eq!(
            from_ascii_i64(b"8000000000000000", 16),
            Err(ParseIntegerError::Overflow)
        );
    }

    #[test]
    fn errors() {
        assert_eq!(from_ascii_i64(b"", 10), Err(ParseIntegerError::Empty));
        assert_eq!(from_ascii_i64(b"-", 10), Err(ParseIntegerError::SignOnly));
        assert_eq!(from_ascii_i64(b"+", 16), Err(ParseIntegerError::SignOnly));
        assert_eq!(
            from_ascii_i64(b"12a", 10),
            Err(ParseIntegerError::InvalidDigit)
        );
        assert_eq!(
            from_ascii_i64(b"1-2", 10),
            Err(ParseIntegerError::InvalidDigit)
        );
        assert_eq!(
            from_ascii_i64(b"fg", 16),
            Err(ParseIntegerError::InvalidDigit)
        );
    }

    #[test]
    fn unsigned_digits_with_sign_flag() {
        assert_eq!(from_digits_i64(true, b"8000000000000000", 16), Ok(i64::MIN));
        assert_eq!(from_digits_i64(false, b"42", 10), Ok(42));
        assert_eq!(from_digits_i64(false, b"", 10), Err(ParseIntegerError::Empty));
    }

    #[test]
    fn digit_runs() {
        assert!(all_digits(b"0123", 10));
        assert!(!all_digits(b"0a", 10));
        assert!(all_digits(b"0aF", 16));
        assert!(!all_digits(b"", 16));
    }
}
