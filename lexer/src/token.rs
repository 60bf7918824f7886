// SPDX-License-Identifier: Apache-2.0

use alloc::string::String;

use unicode_xid::UnicodeXID;

/// Words Lua reserves. `true`, `false` and `nil` are reserved too but lex as
/// their own token kinds.
const RESERVED_WORDS: [&str; 20] = [
    "and", "break", "do", "else", "elseif", "end", "for", "function", "global", "goto", "if",
    "in", "local", "not", "or", "repeat", "return", "then", "until", "while",
];

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// No more code points; the token text is empty.
    EndOfStream,
    /// A malformed lexeme, an unterminated string or a reserved word.
    Invalid,
    /// `{`
    CurlyOpen,
    /// `}`
    CurlyClose,
    /// `[`
    SquareOpen,
    /// `]`
    SquareClose,
    /// `=`
    Equals,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// A name that is not a keyword or reserved word.
    Identifier,
    /// `"..."` or `'...'`, quotes and escapes included.
    QuotedString,
    /// `[[...]]` or `[==[...]==]`, brackets included.
    LongString,
    /// `-- ...` up to the end of the line.
    Comment,
    /// `--[[...]]` or `--[==[...]==]`.
    LongComment,
    /// A finite decimal or hexadecimal number, sign included.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `nil`
    Nil,
}

impl TokenKind {
    /// Comments carry no grammatical meaning.
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::LongComment)
    }

    /// Tokens that stand for a scalar value.
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            TokenKind::QuotedString
                | TokenKind::LongString
                | TokenKind::Number
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
        )
    }
}

/// A single lexical unit and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The raw lexeme. Nothing is unescaped or normalised.
    pub text: String,
    /// Code points consumed before the first code point of this token.
    pub offset: usize,
    /// 1-based line of the first code point.
    pub line: usize,
    /// 1-based column of the first code point.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: String, offset: usize, line: usize, column: usize) -> Self {
        Self {
            kind,
            text,
            offset,
            line,
            column,
        }
    }
}

/// Whether `word` is one of Lua's reserved words, keywords included.
pub fn is_reserved_word(word: &str) -> bool {
    matches!(word, "true" | "false" | "nil") || RESERVED_WORDS.contains(&word)
}

pub(crate) fn is_name_start(c: char) -> bool {
    c == '_' || c.is_xid_start()
}

pub(crate) fn is_name_part(c: char) -> bool {
    c.is_xid_continue()
}

/// Whether `text` would lex as a single [`TokenKind::Identifier`].
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_name_start(first) => {
            chars.all(is_name_part) && !is_reserved_word(text)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_words_include_keywords() {
        for word in ["and", "while", "goto", "global", "true", "false", "nil"] {
            assert!(is_reserved_word(word), "{word} should be reserved");
        }
        assert!(!is_reserved_word("key"));
        assert!(!is_reserved_word("End"));
    }

    #[test]
    fn identifiers() {
        assert!(is_identifier("key"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("näme"));
        assert!(is_identifier("x1"));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("two words"));
        assert!(!is_identifier("repeat"));
        assert!(!is_identifier("nil"));
    }

    #[test]
    fn kind_classes() {
        assert!(TokenKind::LongComment.is_comment());
        assert!(!TokenKind::LongString.is_comment());
        assert!(TokenKind::Nil.is_scalar());
        assert!(!TokenKind::Identifier.is_scalar());
    }
}
