// SPDX-License-Identifier: Apache-2.0

use alloc::collections::TryReserveError;
use alloc::string::String;
use core::fmt;

use log::trace;

use crate::number::parse_number;
use crate::source::CodePointSource;
use crate::token::{is_name_part, is_name_start, is_reserved_word, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    offset: usize,
    line: usize,
    column: usize,
}

impl Position {
    const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    fn after(self, c: char) -> Position {
        if c == '\n' {
            Position {
                offset: self.offset + 1,
                line: self.line + 1,
                column: 1,
            }
        } else {
            Position {
                offset: self.offset + 1,
                column: self.column + 1,
                ..self
            }
        }
    }
}

/// Why the lexer could not produce a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError<E> {
    /// The code-point source failed.
    Source(E),
    /// A token's text could not grow.
    OutOfMemory,
}

impl<E: fmt::Display> fmt::Display for LexError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::Source(err) => write!(f, "source error: {err}"),
            LexError::OutOfMemory => f.write_str("out of memory while buffering a token"),
        }
    }
}

impl<E> From<TryReserveError> for LexError<E> {
    fn from(_: TryReserveError) -> Self {
        LexError::OutOfMemory
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for LexError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LexError::Source(err) => Some(err),
            LexError::OutOfMemory => None,
        }
    }
}

/// Splits a stream of code points into [`Token`]s.
///
/// Whitespace is skipped; comments are returned as tokens. Malformed input
/// never fails: it comes back as [`TokenKind::Invalid`]. Only the source
/// can make [`Lexer::next_token`] return an error.
///
/// Once the input is exhausted every call returns an
/// [`TokenKind::EndOfStream`] token. As an [`Iterator`] the lexer yields
/// that token once and then ends.
pub struct Lexer<S> {
    source: S,
    /// One code point of lookahead and where it started.
    pushback: Option<(char, Position)>,
    /// Position of the next code point to be read.
    position: Position,
    finished: bool,
}

type LexResult<T, S> = Result<T, LexError<<S as CodePointSource>::Error>>;

impl<S: CodePointSource> Lexer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            pushback: None,
            position: Position::START,
            finished: false,
        }
    }

    /// Code points consumed so far.
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn next_token(&mut self) -> LexResult<Token, S> {
        let (first, start) = loop {
            match self.read()? {
                None => {
                    let at = self.position;
                    trace!("EndOfStream at {}:{}", at.line, at.column);
                    return Ok(Token::new(
                        TokenKind::EndOfStream,
                        String::new(),
                        at.offset,
                        at.line,
                        at.column,
                    ));
                }
                Some((c, _)) if c.is_whitespace() => continue,
                Some(found) => break found,
            }
        };

        let mut text = String::new();
        push(&mut text, first)?;
        let kind = match first {
            '{' => TokenKind::CurlyOpen,
            '}' => TokenKind::CurlyClose,
            ']' => TokenKind::SquareClose,
            '=' => TokenKind::Equals,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '[' => self.lex_square_open(&mut text)?,
            '0'..='9' | '.' => self.lex_number(&mut text)?,
            '-' => self.lex_minus(&mut text)?,
            '"' | '\'' => self.lex_quoted(first, &mut text)?,
            c if is_name_start(c) => self.lex_name(&mut text)?,
            _ => TokenKind::Invalid,
        };

        trace!(
            "{:?} {:?} at {}:{} (offset {})",
            kind,
            text,
            start.line,
            start.column,
            start.offset
        );
        Ok(Token::new(kind, text, start.offset, start.line, start.column))
    }

    fn read(&mut self) -> LexResult<Option<(char, Position)>, S> {
        if let Some((c, at)) = self.pushback.take() {
            self.position = at.after(c);
            return Ok(Some((c, at)));
        }
        let at = self.position;
        match self.source.next_code_point().map_err(LexError::Source)? {
            Some(c) => {
                self.position = at.after(c);
                Ok(Some((c, at)))
            }
            None => Ok(None),
        }
    }

    fn unread(&mut self, c: char, at: Position) {
        self.pushback = Some((c, at));
        self.position = at;
    }

    /// Consumes the next code point only if it is `expected`.
    fn take_if(&mut self, text: &mut String, expected: char) -> LexResult<bool, S> {
        match self.read()? {
            Some((c, _)) if c == expected => {
                push(text, c)?;
                Ok(true)
            }
            Some((c, at)) => {
                self.unread(c, at);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// After `[`: a plain bracket, or the opening of a long string.
    fn lex_square_open(&mut self, text: &mut String) -> LexResult<TokenKind, S> {
        match self.read()? {
            Some(('[', _)) => {
                push(text, '[')?;
                self.lex_long_body(text, 0)
            }
            Some(('=', _)) => {
                push(text, '=')?;
                let mut level = 1;
                loop {
                    match self.read()? {
                        Some(('=', _)) => {
                            push(text, '=')?;
                            level += 1;
                        }
                        Some(('[', _)) => {
                            push(text, '[')?;
                            return self.lex_long_body(text, level);
                        }
                        Some((c, at)) => {
                            self.unread(c, at);
                            return Ok(TokenKind::Invalid);
                        }
                        None => return Ok(TokenKind::Invalid),
                    }
                }
            }
            Some((c, at)) => {
                self.unread(c, at);
                Ok(TokenKind::SquareOpen)
            }
            None => Ok(TokenKind::SquareOpen),
        }
    }

    /// Everything up to and including the `]`, `level` times `=`, `]` that
    /// closes a long bracket. Running out of input makes the token invalid.
    fn lex_long_body(&mut self, text: &mut String, level: usize) -> LexResult<TokenKind, S> {
        loop {
            let Some((c, _)) = self.read()? else {
                return Ok(TokenKind::Invalid);
            };
            push(text, c)?;
            if c != ']' {
                continue;
            }
            let mut equals = 0;
            loop {
                let Some((c, _)) = self.read()? else {
                    return Ok(TokenKind::Invalid);
                };
                push(text, c)?;
                match c {
                    '=' => equals += 1,
                    ']' if equals == level => return Ok(TokenKind::LongString),
                    // this bracket may open the real closing sequence
                    ']' => equals = 0,
                    _ => break,
                }
            }
        }
    }

    fn lex_number(&mut self, text: &mut String) -> LexResult<TokenKind, S> {
        while let Some((c, at)) = self.read()? {
            if matches!(c, '0'..='9' | 'a'..='f' | 'A'..='F' | 'x' | 'X' | 'p' | 'P' | '+' | '-' | '.')
            {
                push(text, c)?;
            } else {
                self.unread(c, at);
                break;
            }
        }
        Ok(if parse_number(text).is_some() {
            TokenKind::Number
        } else {
            TokenKind::Invalid
        })
    }

    /// After `-`: a negative number or a comment.
    fn lex_minus(&mut self, text: &mut String) -> LexResult<TokenKind, S> {
        match self.read()? {
            Some(('-', _)) => {
                push(text, '-')?;
                self.lex_comment(text)
            }
            Some((c, _)) if c.is_ascii_digit() || c == '.' => {
                push(text, c)?;
                self.lex_number(text)
            }
            Some((c, at)) => {
                self.unread(c, at);
                Ok(TokenKind::Invalid)
            }
            None => Ok(TokenKind::Invalid),
        }
    }

    /// After `--`: a long comment if a long bracket follows, a line comment
    /// otherwise.
    fn lex_comment(&mut self, text: &mut String) -> LexResult<TokenKind, S> {
        let mut next = self.read()?;
        if let Some(('[', _)) = next {
            push(text, '[')?;
            let mut level = 0;
            loop {
                next = self.read()?;
                match next {
                    Some(('=', _)) => {
                        push(text, '=')?;
                        level += 1;
                    }
                    Some(('[', _)) => {
                        push(text, '[')?;
                        return Ok(match self.lex_long_body(text, level)? {
                            TokenKind::LongString => TokenKind::LongComment,
                            _ => TokenKind::Invalid,
                        });
                    }
                    _ => break,
                }
            }
        }
        // The line break is left for the whitespace skipper.
        loop {
            match next {
                None => return Ok(TokenKind::Comment),
                Some((c @ ('\n' | '\r'), at)) => {
                    self.unread(c, at);
                    return Ok(TokenKind::Comment);
                }
                Some((c, _)) => push(text, c)?,
            }
            next = self.read()?;
        }
    }

    fn lex_quoted(&mut self, quote: char, text: &mut String) -> LexResult<TokenKind, S> {
        loop {
            let Some((c, at)) = self.read()? else {
                return Ok(TokenKind::Invalid);
            };
            match c {
                '\n' | '\r' => {
                    self.unread(c, at);
                    return Ok(TokenKind::Invalid);
                }
                '\\' => {
                    push(text, c)?;
                    match self.read()? {
                        None => return Ok(TokenKind::Invalid),
                        Some(('\n', _)) => {
                            push(text, '\n')?;
                            self.take_if(text, '\r')?;
                        }
                        Some(('\r', _)) => {
                            push(text, '\r')?;
                            self.take_if(text, '\n')?;
                        }
                        Some(('z', _)) => {
                            push(text, 'z')?;
                            while let Some((c, at)) = self.read()? {
                                if c.is_whitespace() {
                                    push(text, c)?;
                                } else {
                                    self.unread(c, at);
                                    break;
                                }
                            }
                        }
                        Some((escaped, _)) => push(text, escaped)?,
                    }
                }
                c if c == quote => {
                    push(text, c)?;
                    return Ok(TokenKind::QuotedString);
                }
                c => push(text, c)?,
            }
        }
    }

    fn lex_name(&mut self, text: &mut String) -> LexResult<TokenKind, S> {
        while let Some((c, at)) = self.read()? {
            if is_name_part(c) {
                push(text, c)?;
            } else {
                self.unread(c, at);
                break;
            }
        }
        Ok(match text.as_str() {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "nil" => TokenKind::Nil,
            word if is_reserved_word(word) => TokenKind::Invalid,
            _ => TokenKind::Identifier,
        })
    }
}

fn push(text: &mut String, c: char) -> Result<(), TryReserveError> {
    text.try_reserve(c.len_utf8())?;
    text.push(c);
    Ok(())
}

impl<S: CodePointSource> Iterator for Lexer<S> {
    type Item = LexResult<Token, S>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        if !matches!(&result, Ok(token) if token.kind != TokenKind::EndOfStream) {
            self.finished = true;
        }
        Some(result)
    }
}

impl<S: fmt::Debug> fmt::Debug for Lexer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lexer")
            .field("source", &self.source)
            .field("offset", &self.position.offset)
            .field("line", &self.position.line)
            .field("column", &self.position.column)
            .finish()
    }
}
