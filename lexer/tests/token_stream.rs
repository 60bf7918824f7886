// SPDX-License-Identifier: Apache-2.0

use eltn_lexer::{Lexer, StrSource, TokenKind};
use test_log::test;

fn dump(input: &str) -> Vec<(TokenKind, String, usize, usize)> {
    Lexer::new(StrSource::new(input))
        .map(|token| {
            let token = token.unwrap();
            (token.kind, token.text, token.line, token.column)
        })
        .collect()
}

#[test]
fn test_document_token_stream() {
    let input = "-- settings\nwindow = {\n  title = [[Main]],\n  [\"w\"] = 0x280; 1.5e1,\n}\n";
    let expected = vec![
        (TokenKind::Comment, "-- settings", 1, 1),
        (TokenKind::Identifier, "window", 2, 1),
        (TokenKind::Equals, "=", 2, 8),
        (TokenKind::CurlyOpen, "{", 2, 10),
        (TokenKind::Identifier, "title", 3, 3),
        (TokenKind::Equals, "=", 3, 9),
        (TokenKind::LongString, "[[Main]]", 3, 11),
        (TokenKind::Comma, ",", 3, 19),
        (TokenKind::SquareOpen, "[", 4, 3),
        (TokenKind::QuotedString, "\"w\"", 4, 4),
        (TokenKind::SquareClose, "]", 4, 7),
        (TokenKind::Equals, "=", 4, 9),
        (TokenKind::Number, "0x280", 4, 11),
        (TokenKind::Semicolon, ";", 4, 16),
        (TokenKind::Number, "1.5e1", 4, 18),
        (TokenKind::Comma, ",", 4, 23),
        (TokenKind::CurlyClose, "}", 5, 1),
        (TokenKind::EndOfStream, "", 6, 1),
    ];
    let expected: Vec<_> = expected
        .into_iter()
        .map(|(kind, text, line, column)| (kind, text.to_string(), line, column))
        .collect();
    assert_eq!(dump(input), expected);
}

#[test]
fn test_reserved_words_are_invalid() {
    for word in ["and", "break", "do", "function", "local", "return", "until"] {
        let tokens = dump(&format!("{word} = 1"));
        assert_eq!(tokens[0].0, TokenKind::Invalid, "{word}");
        assert_eq!(tokens[0].1, word);
    }
}
