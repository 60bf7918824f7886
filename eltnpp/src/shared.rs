// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;

use crate::{EltnNumber, ParseError};

/// Events produced by ELTN parsers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A grammar or lexical error; see [`PullParser::current_error`].
    Error,
    /// Before the first call to [`PullParser::advance`].
    StreamStart,
    /// The end of the document.
    StreamEnd,
    /// A top-level definition name (e.g., `config` in `config = {}`).
    DefName,
    /// The start of a table (e.g., `{`).
    TableStart,
    /// The end of a table (e.g., `}`).
    TableEnd,
    /// A string key, bare (`name =`) or bracketed (`["name"] =`, `[true] =`).
    TableKeyString,
    /// A bracketed key that is not an integer (e.g., `[1.5] =`).
    TableKeyNumber,
    /// A bracketed integer key (e.g., `[3] =`) or an implicit positional key.
    TableKeyInteger,
    /// `nil`
    ValueNil,
    /// `true`
    ValueTrue,
    /// `false`
    ValueFalse,
    /// A number written without fraction or exponent that fits in an `i64`.
    ValueInteger,
    /// Any other number.
    ValueNumber,
    /// A quoted or long-bracketed string.
    ValueString,
}

impl Event {
    /// Events that name the entry a value belongs to.
    pub fn is_key(self) -> bool {
        matches!(
            self,
            Event::DefName | Event::TableKeyString | Event::TableKeyNumber | Event::TableKeyInteger
        )
    }

    /// Scalar value events.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            Event::ValueNil
                | Event::ValueTrue
                | Event::ValueFalse
                | Event::ValueInteger
                | Event::ValueNumber
                | Event::ValueString
        )
    }
}

/// Why the current event is [`Event::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No error; the current event is not [`Event::Error`].
    Ok,
    /// A token was too large to buffer.
    OutOfMemory,
    /// The input ended where more was required.
    StreamEnd,
    /// A well-formed token in a place the grammar does not allow.
    UnexpectedToken,
    /// A malformed token, or a token that cannot start what was expected.
    InvalidToken,
    /// A key already used in the same table.
    DuplicateKey,
    /// The code-point source failed.
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            ErrorKind::Ok => "no error",
            ErrorKind::OutOfMemory => "out of memory",
            ErrorKind::StreamEnd => "unexpected end of stream",
            ErrorKind::UnexpectedToken => "unexpected token",
            ErrorKind::InvalidToken => "invalid token",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::Unknown => "unknown error",
        };
        f.write_str(text)
    }
}

/// Trait for parsers that can be used in a pull-based manner.
///
/// One event is current at a time. A fresh parser sits on
/// [`Event::StreamStart`]; every [`advance`](PullParser::advance) moves to
/// the next event until [`Event::StreamEnd`] or [`Event::Error`], after which
/// [`has_more`](PullParser::has_more) is false and `advance` does nothing.
///
/// The query methods describe the current event and stay valid until the
/// next `advance`.
pub trait PullParser {
    /// Failure of the underlying code-point source.
    type Error;

    /// Whether [`advance`](PullParser::advance) can produce another event.
    fn has_more(&self) -> bool;

    /// Moves to the next event.
    ///
    /// Grammar problems are reported as [`Event::Error`], not as `Err`.
    /// An `Err` means the source failed; the parser is then left on
    /// [`Event::Error`] with [`ErrorKind::Unknown`] and will not read again.
    fn advance(&mut self) -> Result<(), Self::Error>;

    fn current_event(&self) -> Event;

    /// [`ErrorKind::Ok`] unless the current event is [`Event::Error`].
    fn current_error(&self) -> ErrorKind;

    /// Raw text of the token behind the current event, exactly as written.
    /// Empty before the first token and at the end of the stream.
    fn current_text(&self) -> &str;

    /// Code points before the current token, if there is one.
    fn current_offset(&self) -> Option<usize>;

    /// 1-based line of the current token, if there is one.
    fn current_line(&self) -> Option<usize>;

    /// 1-based column of the current token, if there is one.
    fn current_column(&self) -> Option<usize>;

    /// Number of open tables. Top-level definitions are at depth 0.
    fn depth(&self) -> usize;

    fn is_in_table(&self) -> bool {
        self.depth() > 0
    }

    /// Text of the key the current event belongs to: the key itself on key
    /// events, the key being assigned on value and [`Event::TableStart`]
    /// events, and the key of the closed table on [`Event::TableEnd`].
    /// Implicit positional keys read as their index.
    fn current_key_text(&self) -> Option<&str>;

    /// The key event behind [`current_key_text`](PullParser::current_key_text).
    fn current_key_kind(&self) -> Option<Event>;

    /// Keys from the top level down to the current point, e.g.
    /// `window.size[2]` or `t["two words"]`.
    fn current_path(&self) -> String;

    /// The decoded value of the current event as bytes.
    ///
    /// Strings are unescaped and may hold bytes that are not UTF-8. Names,
    /// numbers and keywords give their text.
    fn decoded_bytes(&self) -> Result<Vec<u8>, ParseError>;

    /// [`decoded_bytes`](PullParser::decoded_bytes) as text, with ill-formed
    /// UTF-8 replaced by U+FFFD.
    fn decoded_string(&self) -> Result<String, ParseError> {
        self.decoded_bytes()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// The numeric value of a number value or number key.
    fn decoded_number(&self) -> Result<EltnNumber, ParseError>;

    /// Lua truthiness: only `nil` and `false` are false.
    fn decoded_boolean(&self) -> bool {
        !matches!(self.current_event(), Event::ValueNil | Event::ValueFalse)
    }

    /// Iterator-like method: advances and returns the new event, or `None`
    /// once nothing more can be produced.
    fn next_event(&mut self) -> Option<Result<Event, Self::Error>> {
        if !self.has_more() {
            return None;
        }
        Some(self.advance().map(|()| self.current_event()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classes() {
        assert!(Event::DefName.is_key());
        assert!(Event::TableKeyInteger.is_key());
        assert!(!Event::ValueString.is_key());
        assert!(Event::ValueNil.is_value());
        assert!(!Event::TableStart.is_value());
        assert!(!Event::Error.is_value());
    }

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::DuplicateKey.to_string(), "duplicate key");
        assert_eq!(ErrorKind::StreamEnd.to_string(), "unexpected end of stream");
    }
}
