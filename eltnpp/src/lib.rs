// SPDX-License-Identifier: Apache-2.0

//! A streaming pull parser for ELTN (Extended Lua Table Notation).
//!
//! The parser turns a document into a sequence of [`Event`]s without
//! building a tree. The caller drives it: [`PullParser::advance`] moves to the
//! next event and the query methods describe it.
//!
//! ```
//! use eltnpp::{Event, PullParser};
//!
//! let mut parser = eltnpp::from_str("point = { x = 1, y = 2.5 }");
//! let mut seen = Vec::new();
//! while let Some(event) = parser.next_event() {
//!     let event = event.unwrap();
//!     if event == Event::ValueInteger || event == Event::ValueNumber {
//!         seen.push((parser.current_path(), parser.decoded_number().unwrap().as_f64()));
//!     }
//! }
//! assert_eq!(seen, [("point.x".to_string(), 1.0), ("point.y".to_string(), 2.5)]);
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub use eltn_lexer::{
    ByteSource, ChunkReader, CodePointSource, EltnNumber, Encoding, Reader, SourceError,
    StrSource, Utf16Source,
};
#[cfg(feature = "std")]
pub use eltn_lexer::IoReader;

mod escape_processor;

mod parse_error;
pub use parse_error::ParseError;

mod pull_parser;
pub use pull_parser::EltnPullParser;

mod service;
#[cfg(feature = "std")]
pub use service::from_io_reader;
pub use service::{
    create_pull_parser, factory, from_reader, from_str, from_utf16, DefaultPullParserFactory,
    PullParserFactory,
};

mod shared;
pub use shared::{ErrorKind, Event, PullParser};

mod table_stack;
