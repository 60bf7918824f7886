// SPDX-License-Identifier: Apache-2.0

use crate::Event;

/// Errors from the decoding queries of a [`PullParser`](crate::PullParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// The current event has no string value.
    NotAString(Event),
    /// The current event is not a number value or number key.
    NotANumber(Event),
    /// The number text could not be parsed.
    InvalidNumber,
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParseError::NotAString(event) => write!(f, "{event:?} has no string value"),
            ParseError::NotANumber(event) => write!(f, "{event:?} is not a number"),
            ParseError::InvalidNumber => f.write_str("invalid number"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ParseError::NotAString(Event::TableStart).to_string(),
            "TableStart has no string value"
        );
        assert_eq!(
            ParseError::NotANumber(Event::ValueString).to_string(),
            "ValueString is not a number"
        );
    }
}
