// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use eltn_lexer::{digit_value, is_identifier};

/// Decoding and re-encoding of ELTN string literals.
///
/// Decoding works on the raw token text the lexer hands out, so it only ever
/// sees well-formed quoting. Escapes that are unknown or malformed are kept
/// as written, backslash included.
pub struct EscapeProcessor;

impl EscapeProcessor {
    /// The byte a single-character escape stands for.
    ///
    /// # Examples
    /// ```ignore
    /// // Internal API - see unit tests for usage examples
    /// assert_eq!(EscapeProcessor::process_simple_escape(b'n'), Some(b'\n'));
    /// ```
    pub fn process_simple_escape(escape_char: u8) -> Option<u8> {
        match escape_char {
            b'a' => Some(0x07), // Bell
            b'b' => Some(0x08), // Backspace
            b'f' => Some(0x0C), // Form feed
            b'n' => Some(b'\n'),
            b'r' => Some(b'\r'),
            b't' => Some(b'\t'),
            b'v' => Some(0x0B), // Vertical tab
            b'\\' => Some(b'\\'),
            b'"' => Some(b'"'),
            b'\'' => Some(b'\''),
            _ => None,
        }
    }

    /// Unescapes the text between the quotes of a quoted string.
    pub fn unescape(content: &str) -> Vec<u8> {
        let bytes = content.as_bytes();
        let mut out = Vec::with_capacity(bytes.len());
        let mut pos = 0;

        while let Some(&byte) = bytes.get(pos) {
            if byte != b'\\' {
                out.push(byte);
                pos += 1;
                continue;
            }
            let Some(&escape) = bytes.get(pos + 1) else {
                out.push(byte);
                break;
            };
            if let Some(value) = Self::process_simple_escape(escape) {
                out.push(value);
                pos += 2;
                continue;
            }
            let consumed = match escape {
                b'\n' | b'\r' => {
                    out.push(b'\n');
                    match bytes.get(pos + 2) {
                        Some(&pair) if pair != escape && matches!(pair, b'\n' | b'\r') => 3,
                        _ => 2,
                    }
                }
                b'z' => {
                    let rest = content.get(pos + 2..).unwrap_or_default();
                    2 + rest.len() - rest.trim_start().len()
                }
                b'x' => Self::process_hex_escape(&bytes[pos + 2..], &mut out),
                b'u' => Self::process_unicode_escape(&bytes[pos + 2..], &mut out),
                b'0'..=b'7' => Self::process_octal_escape(&bytes[pos + 1..], &mut out),
                _ => 0,
            };
            if consumed == 0 {
                // Not an escape we know; keep the backslash and carry on.
                out.push(byte);
                pos += 1;
            } else {
                pos += consumed;
            }
        }
        out
    }

    /// `\xXX`: exactly two hex digits. Returns bytes consumed including `\x`,
    /// or 0 if malformed.
    fn process_hex_escape(rest: &[u8], out: &mut Vec<u8>) -> usize {
        match rest {
            [high, low, ..] => match (digit_value(*high, 16), digit_value(*low, 16)) {
                (Some(high), Some(low)) => {
                    out.push((high * 16 + low) as u8);
                    4
                }
                _ => 0,
            },
            _ => 0,
        }
    }

    /// `\u{X...}`: one to eight hex digits naming a Unicode scalar value.
    fn process_unicode_escape(rest: &[u8], out: &mut Vec<u8>) -> usize {
        let Some(body) = rest.strip_prefix(b"{") else {
            return 0;
        };
        let Some(close) = body.iter().position(|&b| b == b'}') else {
            return 0;
        };
        let digits = &body[..close];
        if digits.is_empty() || digits.len() > 8 {
            return 0;
        }
        let mut code: u32 = 0;
        for &digit in digits {
            match digit_value(digit, 16) {
                Some(value) => code = (code << 4) | value,
                None => return 0,
            }
        }
        match char::from_u32(code) {
            Some(c) => {
                let mut utf8 = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
                // \u{ + digits + }
                3 + digits.len() + 1
            }
            None => 0,
        }
    }

    /// `\ddd`: up to three octal digits whose value fits a byte.
    fn process_octal_escape(digits: &[u8], out: &mut Vec<u8>) -> usize {
        let mut value: u32 = 0;
        let mut count = 0;
        for &digit in digits.iter().take(3) {
            let Some(d) = digit_value(digit, 8) else {
                break;
            };
            if value * 8 + d > 255 {
                break;
            }
            value = value * 8 + d;
            count += 1;
        }
        if count == 0 {
            return 0;
        }
        out.push(value as u8);
        1 + count
    }

    /// Decodes a quoted-string token (`"..."` or `'...'`).
    pub fn decode_quoted(token_text: &str) -> Vec<u8> {
        let inner = token_text
            .get(1..token_text.len().saturating_sub(1))
            .unwrap_or_default();
        Self::unescape(inner)
    }

    /// Decodes a long-bracket token (`[[...]]`, `[==[...]==]`): the text
    /// between the brackets without its first line break.
    pub fn decode_long(token_text: &str) -> &str {
        let level = token_text
            .bytes()
            .skip(1)
            .take_while(|&b| b == b'=')
            .count();
        let bracket = level + 2;
        let inner = token_text
            .get(bracket..token_text.len().saturating_sub(bracket))
            .unwrap_or_default();
        ["\r\n", "\n\r", "\n", "\r"]
            .into_iter()
            .find_map(|newline| inner.strip_prefix(newline))
            .unwrap_or(inner)
    }

    /// Writes `bytes` as a quoted string literal that decodes back to them.
    ///
    /// Printable text is kept; the quote, backslash and control characters
    /// use their short escapes or `\xXX`, as do bytes that are not UTF-8.
    pub fn escape(bytes: &[u8], quote: char) -> String {
        let mut out = String::with_capacity(bytes.len() + 2);
        out.push(quote);
        let mut rest = bytes;
        while !rest.is_empty() {
            let (valid, invalid) = match core::str::from_utf8(rest) {
                Ok(text) => (text, rest.len()),
                Err(err) => {
                    let (good, bad) = rest.split_at(err.valid_up_to());
                    let bad_len = err.error_len().unwrap_or(bad.len());
                    (
                        core::str::from_utf8(good).unwrap_or_default(),
                        good.len() + bad_len,
                    )
                }
            };
            for c in valid.chars() {
                Self::escape_char(c, quote, &mut out);
            }
            for &byte in rest.get(valid.len()..invalid).unwrap_or_default() {
                let _ = write!(out, "\\x{byte:02X}");
            }
            rest = rest.get(invalid..).unwrap_or_default();
        }
        out.push(quote);
        out
    }

    fn escape_char(c: char, quote: char, out: &mut String) {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{7}' => out.push_str("\\a"),
            '\u{8}' => out.push_str("\\b"),
            '\u{B}' => out.push_str("\\v"),
            '\u{C}' => out.push_str("\\f"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let mut utf8 = [0u8; 4];
                for byte in c.encode_utf8(&mut utf8).bytes() {
                    let _ = write!(out, "\\x{byte:02X}");
                }
            }
            c => out.push(c),
        }
    }

    /// How a string key appears in a path: bare if it is a usable name,
    /// bracketed and quoted otherwise.
    pub fn key_segment(bytes: &[u8], first: bool, out: &mut String) {
        match core::str::from_utf8(bytes) {
            Ok(name) if is_identifier(name) => {
                if !first {
                    out.push('.');
                }
                out.push_str(name);
            }
            _ => {
                out.push('[');
                out.push_str(&Self::escape(bytes, '"'));
                out.push(']');
            }
        }
    }
}
