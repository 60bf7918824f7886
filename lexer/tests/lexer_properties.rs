// SPDX-License-Identifier: Apache-2.0

//! Property-based tests for the ELTN lexer.
//!
//! 1. The lexer never panics and always ends with exactly one end-of-stream token.
//! 2. Every token's text is the input slice starting at its offset.
//! 3. Offsets strictly increase.
//! 4. Decoding bytes in small chunks gives the same tokens as lexing a `&str`.

use eltn_lexer::{ByteSource, ChunkReader, Encoding, Lexer, StrSource, Token, TokenKind};
use proptest::prelude::*;

const FRAGMENTS: &[&str] = &[
    "key", "=", "{", "}", "[", "]", ",", ";", " ", "\n", "1", "-2.5", "0x1p4", "'s'", "\"q\\\"\"",
    "[[long]]", "[=[x]=]", "-- c\n", "--[[ c ]]", "true", "nil", "while", "\\", "'", "é", "\r\n",
];

fn lex_str(input: &str) -> Vec<Token> {
    Lexer::new(StrSource::new(input))
        .map(|token| token.expect("str sources cannot fail"))
        .collect()
}

fn eltn_like() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(FRAGMENTS), 0..40).prop_map(|parts| parts.concat())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

proptest! {
    #![proptest_config(config())]

    #[test]
    fn lexer_never_panics(input in "\\PC{0,300}") {
        let tokens = lex_str(&input);
        let eos = tokens.iter().filter(|t| t.kind == TokenKind::EndOfStream).count();
        prop_assert_eq!(eos, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::EndOfStream));
    }

    #[test]
    fn token_text_is_input_slice(input in eltn_like()) {
        let chars: Vec<char> = input.chars().collect();
        for token in lex_str(&input) {
            let len = token.text.chars().count();
            let slice: String = chars[token.offset..token.offset + len].iter().collect();
            prop_assert_eq!(&slice, &token.text, "token {:?} in {:?}", token, input);
        }
    }

    #[test]
    fn offsets_increase(input in eltn_like()) {
        let tokens = lex_str(&input);
        for pair in tokens.windows(2) {
            prop_assert!(
                pair[0].offset < pair[1].offset || pair[1].kind == TokenKind::EndOfStream,
                "{:?} then {:?}", pair[0], pair[1]
            );
        }
    }

    #[test]
    fn chunked_bytes_match_str(input in eltn_like(), chunk in 1usize..8) {
        let utf16: Vec<u8> = input.encode_utf16().flat_map(u16::to_le_bytes).collect();
        let from_bytes: Vec<Token> = Lexer::new(ByteSource::new(
            ChunkReader::new(&utf16, chunk),
            Encoding::Utf16Le,
        ))
        .map(|token| token.expect("well-formed UTF-16"))
        .collect();
        prop_assert_eq!(from_bytes, lex_str(&input));
    }
}
