// SPDX-License-Identifier: Apache-2.0

//! Lexical analysis for ELTN (Extended Lua Table Notation).
//!
//! The [`Lexer`] pulls Unicode code points from a [`CodePointSource`] and
//! slices them into [`Token`]s. Token text is kept exactly as written:
//! quoted strings keep their quotes and escapes, numbers keep their sign and
//! radix prefix. Decoding is left to the caller.
//!
//! ```
//! use eltn_lexer::{Lexer, StrSource, TokenKind};
//!
//! let mut lexer = Lexer::new(StrSource::new("answer = 42"));
//! let kinds: Vec<TokenKind> = lexer.by_ref().map(|t| t.unwrap().kind).collect();
//! assert_eq!(
//!     kinds,
//!     [TokenKind::Identifier, TokenKind::Equals, TokenKind::Number, TokenKind::EndOfStream]
//! );
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

mod int_parser;
pub use int_parser::digit_value;

mod lexer;
pub use lexer::{LexError, Lexer};

mod number;
pub use number::{parse_number, EltnNumber};

mod source;
#[cfg(feature = "std")]
pub use source::IoReader;
pub use source::{
    ByteSource, ChunkReader, CodePointSource, Encoding, Reader, SourceError, StrSource,
    Utf16Source,
};

mod token;
pub use token::{is_identifier, is_reserved_word, Token, TokenKind};
