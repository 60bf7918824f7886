// SPDX-License-Identifier: Apache-2.0

//! Where the lexer's code points come from.
//!
//! The lexer only needs a [`CodePointSource`]. Three are provided:
//!
//! - [`StrSource`] walks an in-memory `&str` and cannot fail.
//! - [`Utf16Source`] decodes an iterator of UTF-16 code units.
//! - [`ByteSource`] decodes bytes pulled from a [`Reader`] in a declared
//!   [`Encoding`], skipping a leading byte-order mark.
//!
//! [`Reader`] is a minimal byte-reading trait so the crate works without
//! `std`. [`ChunkReader`] serves an in-memory slice, optionally in small
//! chunks to exercise refills; with the `std` feature [`IoReader`] wraps any
//! `std::io::Read`.
//!
//! ```rust
//! use eltn_lexer::{ByteSource, ChunkReader, CodePointSource, Encoding};
//!
//! let bytes = [0xFF, 0xFE, b'h', 0, b'i', 0];
//! let mut source = ByteSource::new(ChunkReader::new(&bytes, 1), Encoding::Utf16Le);
//! assert_eq!(source.next_code_point(), Ok(Some('h')));
//! assert_eq!(source.next_code_point(), Ok(Some('i')));
//! assert_eq!(source.next_code_point(), Ok(None));
//! ```

use core::convert::Infallible;
use core::fmt;

const BYTE_ORDER_MARK: char = '\u{FEFF}';
const BUFFER_SIZE: usize = 256;

/// A sequential supplier of Unicode code points.
///
/// `Ok(None)` marks the end of the input; implementations keep returning it
/// once reached. An `Err` is terminal for the consumer.
pub trait CodePointSource {
    type Error;

    fn next_code_point(&mut self) -> Result<Option<char>, Self::Error>;
}

impl<S: CodePointSource + ?Sized> CodePointSource for &mut S {
    type Error = S::Error;

    fn next_code_point(&mut self) -> Result<Option<char>, Self::Error> {
        (**self).next_code_point()
    }
}

/// Code points of a string slice.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    chars: core::str::Chars<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
        }
    }
}

impl CodePointSource for StrSource<'_> {
    type Error = Infallible;

    fn next_code_point(&mut self) -> Result<Option<char>, Self::Error> {
        Ok(self.chars.next())
    }
}

/// Code points decoded from UTF-16 code units.
///
/// An unpaired surrogate is reported as
/// [`SourceError::UnpairedSurrogate`] with its code-unit offset.
#[derive(Debug, Clone)]
pub struct Utf16Source<I: Iterator<Item = u16>> {
    units: core::char::DecodeUtf16<I>,
    offset: usize,
}

impl<I: Iterator<Item = u16>> Utf16Source<I> {
    pub fn new<T: IntoIterator<IntoIter = I, Item = u16>>(units: T) -> Self {
        Self {
            units: char::decode_utf16(units),
            offset: 0,
        }
    }
}

impl<I: Iterator<Item = u16>> CodePointSource for Utf16Source<I> {
    type Error = SourceError<Infallible>;

    fn next_code_point(&mut self) -> Result<Option<char>, Self::Error> {
        match self.units.next() {
            None => Ok(None),
            Some(Ok(c)) => {
                self.offset += c.len_utf16();
                Ok(Some(c))
            }
            Some(Err(err)) => Err(SourceError::UnpairedSurrogate {
                unit: err.unpaired_surrogate(),
                offset: self.offset,
            }),
        }
    }
}

/// Byte input for [`ByteSource`].
pub trait Reader {
    /// The error type returned by read operations
    type Error;

    /// Read data into the provided buffer.
    /// Returns the number of bytes read, or an error.
    ///
    /// A return value of 0 means the input is exhausted; implementations must
    /// not return 0 while more data may follow.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;
}

/// A [`Reader`] over a byte slice, optionally handing it out in fixed-size
/// chunks.
///
/// [`ChunkReader::full_slice`] fills the caller's buffer as far as it goes.
/// [`ChunkReader::new`] caps every `read()` at `chunk_size` bytes, which
/// simulates a slow stream and forces multi-byte sequences to straddle
/// refills.
#[derive(Debug, Clone)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
    chunk_size: usize,
}

impl<'a> ChunkReader<'a> {
    /// Each `read()` returns at most `chunk_size` bytes (minimum 1).
    pub fn new(data: &'a [u8], chunk_size: usize) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn full_slice(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            chunk_size: usize::MAX,
        }
    }
}

impl Reader for ChunkReader<'_> {
    type Error = Infallible;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let remaining = self.data.get(self.pos..).unwrap_or_default();
        let to_copy = remaining.len().min(buf.len()).min(self.chunk_size);
        if let (Some(dest), Some(src)) = (buf.get_mut(..to_copy), remaining.get(..to_copy)) {
            dest.copy_from_slice(src);
            self.pos = self.pos.saturating_add(to_copy);
            Ok(to_copy)
        } else {
            Ok(0)
        }
    }
}

/// A [`Reader`] over any [`std::io::Read`]. Interrupted reads are retried.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoReader<R> {
    inner: R,
}

#[cfg(feature = "std")]
impl<R: std::io::Read> IoReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<R: std::io::Read> Reader for IoReader<R> {
    type Error = std::io::Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        loop {
            match self.inner.read(buf) {
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                other => return other,
            }
        }
    }
}

/// Character encodings [`ByteSource`] can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// 7-bit US-ASCII; bytes above 0x7F are malformed.
    Ascii,
    /// ISO-8859-1; every byte is the code point of the same value.
    Latin1,
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

impl Encoding {
    /// Every supported encoding.
    pub const ALL: [Encoding; 7] = [
        Encoding::Ascii,
        Encoding::Latin1,
        Encoding::Utf8,
        Encoding::Utf16Be,
        Encoding::Utf16Le,
        Encoding::Utf32Be,
        Encoding::Utf32Le,
    ];

    /// The canonical label, as accepted by [`Encoding::from_label`].
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Ascii => "US-ASCII",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Utf8 => "UTF-8",
            Encoding::Utf16Be => "UTF-16BE",
            Encoding::Utf16Le => "UTF-16LE",
            Encoding::Utf32Be => "UTF-32BE",
            Encoding::Utf32Le => "UTF-32LE",
        }
    }

    /// Looks an encoding up by label, ignoring ASCII case. A few common
    /// aliases (`ascii`, `latin1`, `utf8`, ...) are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        const ALIASES: [(&str, Encoding); 7] = [
            ("ascii", Encoding::Ascii),
            ("latin1", Encoding::Latin1),
            ("utf8", Encoding::Utf8),
            ("utf16be", Encoding::Utf16Be),
            ("utf16le", Encoding::Utf16Le),
            ("utf32be", Encoding::Utf32Be),
            ("utf32le", Encoding::Utf32Le),
        ];
        Self::ALL
            .into_iter()
            .find(|enc| enc.label().eq_ignore_ascii_case(label))
            .or_else(|| {
                ALIASES
                    .into_iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(label))
                    .map(|(_, enc)| enc)
            })
    }

    /// Whether a leading U+FEFF is a byte-order mark rather than content.
    pub fn is_unicode(self) -> bool {
        !matches!(self, Encoding::Ascii | Encoding::Latin1)
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures of the provided code-point sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError<E> {
    /// The underlying [`Reader`] failed.
    Read(E),
    /// Bytes starting at `offset` are not valid in `encoding`.
    Malformed { encoding: Encoding, offset: usize },
    /// A UTF-16 surrogate without its partner. `offset` counts code units
    /// for [`Utf16Source`] and bytes for [`ByteSource`].
    UnpairedSurrogate { unit: u16, offset: usize },
}

impl<E: fmt::Display> fmt::Display for SourceError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Read(err) => write!(f, "read failed: {err}"),
            SourceError::Malformed { encoding, offset } => {
                write!(f, "malformed {encoding} input at byte {offset}")
            }
            SourceError::UnpairedSurrogate { unit, offset } => {
                write!(f, "unpaired surrogate {unit:#06x} at offset {offset}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: std::error::Error + 'static> std::error::Error for SourceError<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Read(err) => Some(err),
            _ => None,
        }
    }
}

/// Code points decoded from a [`Reader`] in a fixed [`Encoding`].
///
/// Bytes are pulled through an internal buffer as the lexer asks for code
/// points, so multi-byte sequences may straddle reads.
pub struct ByteSource<R: Reader> {
    reader: R,
    encoding: Encoding,
    buffer: [u8; BUFFER_SIZE],
    start: usize,
    end: usize,
    /// Bytes handed out so far; error offsets refer to this count.
    consumed: usize,
    at_start: bool,
    exhausted: bool,
}

impl<R: Reader> ByteSource<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Self {
            reader,
            encoding,
            buffer: [0; BUFFER_SIZE],
            start: 0,
            end: 0,
            consumed: 0,
            at_start: true,
            exhausted: false,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    fn next_byte(&mut self) -> Result<Option<u8>, SourceError<R::Error>> {
        if self.start >= self.end {
            if self.exhausted {
                return Ok(None);
            }
            let n = self.reader.read(&mut self.buffer).map_err(SourceError::Read)?;
            if n == 0 {
                self.exhausted = true;
                return Ok(None);
            }
            self.start = 0;
            self.end = n.min(BUFFER_SIZE);
        }
        let byte = self.buffer.get(self.start).copied();
        self.start += 1;
        self.consumed += 1;
        Ok(byte)
    }

    fn malformed(&self, offset: usize) -> SourceError<R::Error> {
        SourceError::Malformed {
            encoding: self.encoding,
            offset,
        }
    }

    /// Fills `out` completely or reports the truncated sequence at `offset`.
    fn fill(&mut self, out: &mut [u8], offset: usize) -> Result<(), SourceError<R::Error>> {
        for slot in out.iter_mut() {
            *slot = self.next_byte()?.ok_or_else(|| self.malformed(offset))?;
        }
        Ok(())
    }

    fn next_utf8(&mut self, lead: u8, offset: usize) -> Result<char, SourceError<R::Error>> {
        let width = match lead {
            0x00..=0x7F => return Ok(char::from(lead)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(self.malformed(offset)),
        };
        let mut bytes = [lead, 0, 0, 0];
        self.fill(&mut bytes[1..width], offset)?;
        core::str::from_utf8(&bytes[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .ok_or_else(|| self.malformed(offset))
    }

    fn next_utf16_unit(&mut self, big_endian: bool) -> Result<Option<u16>, SourceError<R::Error>> {
        let offset = self.consumed;
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let second = self.next_byte()?.ok_or_else(|| self.malformed(offset))?;
        Ok(Some(if big_endian {
            u16::from_be_bytes([first, second])
        } else {
            u16::from_le_bytes([first, second])
        }))
    }

    fn next_utf16(&mut self, big_endian: bool) -> Result<Option<char>, SourceError<R::Error>> {
        let offset = self.consumed;
        let Some(unit) = self.next_utf16_unit(big_endian)? else {
            return Ok(None);
        };
        let code = match unit {
            0xD800..=0xDBFF => match self.next_utf16_unit(big_endian)? {
                Some(low @ 0xDC00..=0xDFFF) => {
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
                }
                _ => return Err(SourceError::UnpairedSurrogate { unit, offset }),
            },
            0xDC00..=0xDFFF => return Err(SourceError::UnpairedSurrogate { unit, offset }),
            _ => u32::from(unit),
        };
        char::from_u32(code)
            .map(Some)
            .ok_or_else(|| self.malformed(offset))
    }

    fn next_utf32(&mut self, big_endian: bool) -> Result<Option<char>, SourceError<R::Error>> {
        let offset = self.consumed;
        let Some(first) = self.next_byte()? else {
            return Ok(None);
        };
        let mut bytes = [first, 0, 0, 0];
        self.fill(&mut bytes[1..], offset)?;
        let code = if big_endian {
            u32::from_be_bytes(bytes)
        } else {
            u32::from_le_bytes(bytes)
        };
        char::from_u32(code)
            .map(Some)
            .ok_or_else(|| self.malformed(offset))
    }

    fn decode(&mut self) -> Result<Option<char>, SourceError<R::Error>> {
        match self.encoding {
            Encoding::Ascii | Encoding::Latin1 | Encoding::Utf8 => {
                let offset = self.consumed;
                let Some(byte) = self.next_byte()? else {
                    return Ok(None);
                };
                match self.encoding {
                    Encoding::Ascii if byte.is_ascii() => Ok(Some(char::from(byte))),
                    Encoding::Ascii => Err(self.malformed(offset)),
                    Encoding::Latin1 => Ok(Some(char::from(byte))),
                    _ => self.next_utf8(byte, offset).map(Some),
                }
            }
            Encoding::Utf16Be => self.next_utf16(true),
            Encoding::Utf16Le => self.next_utf16(false),
            Encoding::Utf32Be => self.next_utf32(true),
            Encoding::Utf32Le => self.next_utf32(false),
        }
    }
}

impl<R: Reader> CodePointSource for ByteSource<R> {
    type Error = SourceError<R::Error>;

    fn next_code_point(&mut self) -> Result<Option<char>, Self::Error> {
        let decoded = self.decode()?;
        if self.at_start {
            self.at_start = false;
            if decoded == Some(BYTE_ORDER_MARK) && self.encoding.is_unicode() {
                return self.decode();
            }
        }
        Ok(decoded)
    }
}

impl<R: Reader + fmt::Debug> fmt::Debug for ByteSource<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSource")
            .field("reader", &self.reader)
            .field("encoding", &self.encoding)
            .field("consumed", &self.consumed)
            .finish()
    }
}
