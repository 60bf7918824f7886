// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::ControlFlow;

use eltn_lexer::{parse_number, CodePointSource, LexError, Lexer, Token, TokenKind};
use log::{debug, log_enabled, trace, Level};

use crate::escape_processor::EscapeProcessor;
use crate::parse_error::ParseError;
use crate::shared::{ErrorKind, Event, PullParser};
use crate::table_stack::{Key, KeyValue, TableStack};
use crate::EltnNumber;

/// What the grammar allows next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// Top level: a definition name, a table, `;` or the end. A document is
    /// any number of `name = value` definitions and bare tables, so this
    /// state is re-entered after every top-level value.
    Definition,
    /// After a key: `=` and then its value.
    Equals,
    /// Inside a table after `{` or a separator: a key, a value or `}`.
    Entry,
    /// Inside a table after an entry: `,`, `;` or `}`.
    Separator,
    /// After `StreamEnd` or an error.
    Done,
}

/// Emitted an event, or consumed a token that produces none.
type Step = ControlFlow<()>;

const EMITTED: Step = ControlFlow::Break(());
const SKIPPED: Step = ControlFlow::Continue(());

/// A pull parser that reads ELTN from any [`CodePointSource`].
///
/// ```
/// use eltnpp::{EltnPullParser, Event, PullParser};
/// use eltn_lexer::StrSource;
///
/// let mut parser = EltnPullParser::new(StrSource::new("key = 1"));
/// assert_eq!(parser.current_event(), Event::StreamStart);
/// parser.advance().unwrap();
/// assert_eq!(parser.current_event(), Event::DefName);
/// parser.advance().unwrap();
/// assert_eq!(parser.current_event(), Event::ValueInteger);
/// assert_eq!(parser.decoded_number().unwrap().as_int(), Some(1));
/// parser.advance().unwrap();
/// assert_eq!(parser.current_event(), Event::StreamEnd);
/// assert!(!parser.has_more());
/// ```
pub struct EltnPullParser<S: CodePointSource> {
    lexer: Lexer<S>,
    event: Event,
    error: ErrorKind,
    expect: Expect,
    /// The token behind the current event.
    token: Option<Token>,
    tables: TableStack,
}

impl<S: CodePointSource> EltnPullParser<S> {
    pub fn new(source: S) -> Self {
        Self {
            lexer: Lexer::new(source),
            event: Event::StreamStart,
            error: ErrorKind::Ok,
            expect: Expect::Definition,
            token: None,
            tables: TableStack::new(),
        }
    }

    /// Next token that is not a comment. `None` means lexing failed in a way
    /// that has already been turned into an error event.
    fn next_token(&mut self) -> Result<Option<Token>, S::Error> {
        loop {
            match self.lexer.next_token() {
                Ok(token) if token.kind.is_comment() => continue,
                Ok(token) => return Ok(Some(token)),
                Err(LexError::OutOfMemory) => {
                    self.token = None;
                    self.set_error(ErrorKind::OutOfMemory);
                    return Ok(None);
                }
                Err(LexError::Source(err)) => {
                    debug!(
                        "Source failed after {} code points (line {})",
                        self.lexer.offset(),
                        self.lexer.line()
                    );
                    self.token = None;
                    self.set_error(ErrorKind::Unknown);
                    return Err(err);
                }
            }
        }
    }

    fn emit(&mut self, event: Event, token: Token) {
        self.event = event;
        self.error = ErrorKind::Ok;
        self.token = Some(token);
        if log_enabled!(Level::Trace) {
            trace!(
                "{:?} depth={} path={:?}",
                event,
                self.tables.depth(),
                self.tables.path()
            );
        }
    }

    fn set_error(&mut self, kind: ErrorKind) {
        self.event = Event::Error;
        self.error = kind;
        self.expect = Expect::Done;
        match &self.token {
            Some(token) => debug!(
                "Error {} at {}:{}: {:?}",
                kind, token.line, token.column, token.text
            ),
            None => debug!("Error {}", kind),
        }
    }

    fn fail(&mut self, kind: ErrorKind, token: Token) -> Step {
        self.token = Some(token);
        self.set_error(kind);
        EMITTED
    }

    /// Fails on a token the grammar does not accept here. Running out of
    /// input and malformed tokens have their own error kinds.
    fn reject(&mut self, token: Token, otherwise: ErrorKind) -> Step {
        let kind = match token.kind {
            TokenKind::EndOfStream => ErrorKind::StreamEnd,
            TokenKind::Invalid => ErrorKind::InvalidToken,
            _ => otherwise,
        };
        self.fail(kind, token)
    }

    fn after_value(&self) -> Expect {
        if self.tables.depth() == 0 {
            Expect::Definition
        } else {
            Expect::Separator
        }
    }

    /// Emits a scalar value or opens a table.
    fn emit_value(&mut self, token: Token) -> Step {
        let event = match token.kind {
            TokenKind::CurlyOpen => {
                self.tables.enter_table();
                self.expect = Expect::Entry;
                self.emit(Event::TableStart, token);
                return EMITTED;
            }
            TokenKind::QuotedString | TokenKind::LongString => Event::ValueString,
            TokenKind::Number => match parse_number(&token.text) {
                Some(EltnNumber::Integer(_)) => Event::ValueInteger,
                Some(EltnNumber::Float(_)) => Event::ValueNumber,
                None => return self.fail(ErrorKind::InvalidToken, token),
            },
            TokenKind::True => Event::ValueTrue,
            TokenKind::False => Event::ValueFalse,
            TokenKind::Nil => Event::ValueNil,
            _ => return self.reject(token, ErrorKind::UnexpectedToken),
        };
        self.expect = self.after_value();
        self.emit(event, token);
        EMITTED
    }

    fn emit_key(&mut self, key: Key, token: Token) -> Step {
        let event = key.kind;
        match self.tables.claim_key(key) {
            Ok(()) => {
                self.expect = Expect::Equals;
                self.emit(event, token);
                EMITTED
            }
            Err(kind) => self.fail(kind, token),
        }
    }

    /// A value without a key takes the next positional index.
    fn emit_positional(&mut self, token: Token) -> Step {
        match self.tables.claim_implicit_key() {
            Ok(()) => self.emit_value(token),
            Err(kind) => self.fail(kind, token),
        }
    }

    fn close_table(&mut self, token: Token) -> Step {
        match self.tables.exit_table() {
            Ok(()) => {
                self.expect = self.after_value();
                self.emit(Event::TableEnd, token);
                EMITTED
            }
            Err(kind) => self.fail(kind, token),
        }
    }

    fn on_definition(&mut self, token: Token) -> Step {
        self.tables.end_entry();
        match token.kind {
            TokenKind::EndOfStream => {
                self.expect = Expect::Done;
                self.emit(Event::StreamEnd, token);
                EMITTED
            }
            TokenKind::Identifier => {
                let key = name_key(Event::DefName, &token.text);
                self.emit_key(key, token)
            }
            TokenKind::CurlyOpen => self.emit_positional(token),
            TokenKind::Semicolon => SKIPPED,
            _ if self.event == Event::StreamStart => {
                self.reject(token, ErrorKind::InvalidToken)
            }
            _ => self.reject(token, ErrorKind::UnexpectedToken),
        }
    }

    fn on_equals(&mut self, token: Token) -> Result<Step, S::Error> {
        if token.kind != TokenKind::Equals {
            return Ok(self.reject(token, ErrorKind::InvalidToken));
        }
        let Some(value) = self.next_token()? else {
            return Ok(EMITTED);
        };
        Ok(self.emit_value(value))
    }

    fn on_entry(&mut self, token: Token) -> Result<Step, S::Error> {
        Ok(match token.kind {
            TokenKind::CurlyClose => self.close_table(token),
            TokenKind::Identifier => {
                let key = name_key(Event::TableKeyString, &token.text);
                self.emit_key(key, token)
            }
            TokenKind::SquareOpen => return self.on_bracket_key(),
            kind if kind.is_scalar() || kind == TokenKind::CurlyOpen => {
                self.emit_positional(token)
            }
            _ => self.reject(token, ErrorKind::UnexpectedToken),
        })
    }

    /// `[` key `]`: the key token becomes the current token.
    fn on_bracket_key(&mut self) -> Result<Step, S::Error> {
        let Some(token) = self.next_token()? else {
            return Ok(EMITTED);
        };
        let key = match token.kind {
            TokenKind::QuotedString => {
                string_key(EscapeProcessor::decode_quoted(&token.text))
            }
            TokenKind::LongString => {
                string_key(EscapeProcessor::decode_long(&token.text).as_bytes().to_vec())
            }
            TokenKind::Number => match parse_number(&token.text) {
                Some(number) => {
                    let kind = if number.is_integer() {
                        Event::TableKeyInteger
                    } else {
                        Event::TableKeyNumber
                    };
                    Key::new(kind, token.text.clone(), KeyValue::from_number(number))
                }
                None => return Ok(self.fail(ErrorKind::InvalidToken, token)),
            },
            TokenKind::True | TokenKind::False => Key::new(
                Event::TableKeyString,
                token.text.clone(),
                KeyValue::Boolean(token.kind == TokenKind::True),
            ),
            _ => return Ok(self.reject(token, ErrorKind::UnexpectedToken)),
        };

        let Some(close) = self.next_token()? else {
            return Ok(EMITTED);
        };
        if close.kind != TokenKind::SquareClose {
            return Ok(self.reject(close, ErrorKind::UnexpectedToken));
        }
        Ok(self.emit_key(key, token))
    }

    fn on_separator(&mut self, token: Token) -> Step {
        match token.kind {
            TokenKind::Comma | TokenKind::Semicolon => {
                self.tables.end_entry();
                self.expect = Expect::Entry;
                SKIPPED
            }
            TokenKind::CurlyClose => self.close_table(token),
            _ => self.reject(token, ErrorKind::UnexpectedToken),
        }
    }

    fn token_kind(&self) -> Option<TokenKind> {
        self.token.as_ref().map(|token| token.kind)
    }
}

fn name_key(kind: Event, name: &str) -> Key {
    Key::new(kind, name.into(), KeyValue::String(name.as_bytes().to_vec()))
}

fn string_key(bytes: Vec<u8>) -> Key {
    let text = String::from_utf8_lossy(&bytes).into_owned();
    Key::new(Event::TableKeyString, text, KeyValue::String(bytes))
}

impl<S: CodePointSource> PullParser for EltnPullParser<S> {
    type Error = S::Error;

    fn has_more(&self) -> bool {
        !matches!(self.event, Event::Error | Event::StreamEnd)
    }

    fn advance(&mut self) -> Result<(), Self::Error> {
        while self.has_more() {
            let Some(token) = self.next_token()? else {
                break;
            };
            let step = match self.expect {
                Expect::Definition => self.on_definition(token),
                Expect::Equals => self.on_equals(token)?,
                Expect::Entry => self.on_entry(token)?,
                Expect::Separator => self.on_separator(token),
                Expect::Done => EMITTED,
            };
            if step.is_break() {
                break;
            }
        }
        Ok(())
    }

    fn current_event(&self) -> Event {
        self.event
    }

    fn current_error(&self) -> ErrorKind {
        self.error
    }

    fn current_text(&self) -> &str {
        self.token.as_ref().map_or("", |token| token.text.as_str())
    }

    fn current_offset(&self) -> Option<usize> {
        self.token.as_ref().map(|token| token.offset)
    }

    fn current_line(&self) -> Option<usize> {
        self.token.as_ref().map(|token| token.line)
    }

    fn current_column(&self) -> Option<usize> {
        self.token.as_ref().map(|token| token.column)
    }

    fn depth(&self) -> usize {
        self.tables.depth()
    }

    fn current_key_text(&self) -> Option<&str> {
        self.tables.current_key().map(|key| key.text.as_str())
    }

    fn current_key_kind(&self) -> Option<Event> {
        self.tables.current_key().map(|key| key.kind)
    }

    fn current_path(&self) -> String {
        self.tables.path()
    }

    fn decoded_bytes(&self) -> Result<Vec<u8>, ParseError> {
        let text = self.current_text();
        match self.event {
            Event::ValueString | Event::TableKeyString => Ok(match self.token_kind() {
                Some(TokenKind::QuotedString) => EscapeProcessor::decode_quoted(text),
                Some(TokenKind::LongString) => {
                    EscapeProcessor::decode_long(text).as_bytes().to_vec()
                }
                _ => text.as_bytes().to_vec(),
            }),
            Event::DefName
            | Event::TableKeyInteger
            | Event::TableKeyNumber
            | Event::ValueInteger
            | Event::ValueNumber
            | Event::ValueTrue
            | Event::ValueFalse
            | Event::ValueNil => Ok(text.as_bytes().to_vec()),
            other => Err(ParseError::NotAString(other)),
        }
    }

    fn decoded_number(&self) -> Result<EltnNumber, ParseError> {
        match self.event {
            Event::ValueInteger
            | Event::ValueNumber
            | Event::TableKeyInteger
            | Event::TableKeyNumber => {
                parse_number(self.current_text()).ok_or(ParseError::InvalidNumber)
            }
            other => Err(ParseError::NotANumber(other)),
        }
    }
}

impl<S: CodePointSource + core::fmt::Debug> core::fmt::Debug for EltnPullParser<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EltnPullParser")
            .field("lexer", &self.lexer)
            .field("event", &self.event)
            .field("error", &self.error)
            .field("expect", &self.expect)
            .field("token", &self.token)
            .field("tables", &self.tables)
            .finish()
    }
}
