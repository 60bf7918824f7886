// SPDX-License-Identifier: Apache-2.0

//! Parser construction.
//!
//! [`PullParserFactory`] is the seam for alternative parser implementations.
//! The free functions here always use [`DefaultPullParserFactory`]; there is
//! no runtime discovery.

use eltn_lexer::{ByteSource, CodePointSource, Encoding, Reader, StrSource, Utf16Source};
use log::trace;

use crate::pull_parser::EltnPullParser;
use crate::shared::PullParser;

/// Creates pull parsers over code-point sources.
///
/// Every constructor reads the same code points the same way, so a document
/// produces identical events whether it arrives as a `&str`, UTF-16 units or
/// encoded bytes.
pub trait PullParserFactory {
    type Parser<S: CodePointSource>: PullParser<Error = S::Error>;

    /// Whether parsers from this factory can read `encoding`.
    fn supports_encoding(&self, encoding: Encoding) -> bool {
        let _ = encoding;
        true
    }

    fn create_parser<S: CodePointSource>(&self, source: S) -> Self::Parser<S>;

    fn create_utf16_parser<I: IntoIterator<Item = u16>>(
        &self,
        units: I,
    ) -> Self::Parser<Utf16Source<I::IntoIter>> {
        self.create_parser(Utf16Source::new(units))
    }

    fn create_byte_parser<R: Reader>(
        &self,
        reader: R,
        encoding: Encoding,
    ) -> Self::Parser<ByteSource<R>> {
        self.create_parser(ByteSource::new(reader, encoding))
    }
}

/// Builds [`EltnPullParser`]s.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DefaultPullParserFactory;

impl PullParserFactory for DefaultPullParserFactory {
    type Parser<S: CodePointSource> = EltnPullParser<S>;

    fn create_parser<S: CodePointSource>(&self, source: S) -> Self::Parser<S> {
        EltnPullParser::new(source)
    }
}

/// The factory the free functions use.
pub fn factory() -> DefaultPullParserFactory {
    trace!("Using default parser factory");
    DefaultPullParserFactory
}

/// A parser over any code-point source.
pub fn create_pull_parser<S: CodePointSource>(source: S) -> EltnPullParser<S> {
    factory().create_parser(source)
}

/// A parser over a string.
///
/// ```
/// use eltnpp::{Event, PullParser};
///
/// let mut parser = eltnpp::from_str("greeting = 'hi'");
/// parser.advance().unwrap();
/// parser.advance().unwrap();
/// assert_eq!(parser.current_event(), Event::ValueString);
/// assert_eq!(parser.decoded_string().unwrap(), "hi");
/// ```
pub fn from_str(text: &str) -> EltnPullParser<StrSource<'_>> {
    create_pull_parser(StrSource::new(text))
}

/// A parser over UTF-16 code units.
pub fn from_utf16<I: IntoIterator<Item = u16>>(
    units: I,
) -> EltnPullParser<Utf16Source<I::IntoIter>> {
    factory().create_utf16_parser(units)
}

/// A parser over bytes in the given encoding.
pub fn from_reader<R: Reader>(reader: R, encoding: Encoding) -> EltnPullParser<ByteSource<R>> {
    factory().create_byte_parser(reader, encoding)
}

/// A parser over a [`std::io::Read`] in the given encoding.
#[cfg(feature = "std")]
pub fn from_io_reader<R: std::io::Read>(
    reader: R,
    encoding: Encoding,
) -> EltnPullParser<ByteSource<eltn_lexer::IoReader<R>>> {
    from_reader(eltn_lexer::IoReader::new(reader), encoding)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Event;
    use eltn_lexer::ChunkReader;
    use test_log::test;

    #[test]
    fn test_default_factory_supports_every_encoding() {
        let factory = factory();
        for encoding in Encoding::ALL {
            assert!(factory.supports_encoding(encoding));
        }
    }

    #[test]
    fn test_factory_parsers_start_at_stream_start() {
        let factory = DefaultPullParserFactory;
        let parser = factory.create_parser(StrSource::new(""));
        assert_eq!(parser.current_event(), Event::StreamStart);
        let parser = factory.create_utf16_parser("x = 1".encode_utf16());
        assert_eq!(parser.current_event(), Event::StreamStart);
        let parser = factory.create_byte_parser(ChunkReader::full_slice(b""), Encoding::Ascii);
        assert!(parser.has_more());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_io_reader_entry_point() {
        let mut parser = from_io_reader(&b"\xEF\xBB\xBFk = nil"[..], Encoding::Utf8);
        parser.advance().unwrap();
        assert_eq!(parser.current_event(), Event::DefName);
        assert_eq!(parser.current_offset(), Some(0));
        parser.advance().unwrap();
        assert_eq!(parser.current_event(), Event::ValueNil);
        assert!(!parser.decoded_boolean());
    }
}
