// SPDX-License-Identifier: Apache-2.0

// Dumps the token stream of an ELTN file, one token per line.

use std::env;
use std::fs::File;

use eltn_lexer::{ByteSource, Encoding, IoReader, Lexer, TokenKind};

fn main() {
    env_logger::init();

    let args: Vec<_> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} file.eltn [encoding]", args[0]);
        std::process::exit(1);
    }
    let path = &args[1];
    let encoding = match args.get(2) {
        None => Encoding::Utf8,
        Some(label) => match Encoding::from_label(label) {
            Some(encoding) => encoding,
            None => {
                eprintln!("Error: Unknown encoding '{}'", label);
                std::process::exit(1);
            }
        },
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Error: Unable to open file '{}': {}", path, e);
            std::process::exit(1);
        }
    };

    let lexer = Lexer::new(ByteSource::new(IoReader::new(file), encoding));
    let mut invalid = 0;
    for token in lexer {
        match token {
            Ok(token) => {
                if token.kind == TokenKind::Invalid {
                    invalid += 1;
                }
                println!(
                    "{}:{}\t{:?}\t{:?}",
                    token.line, token.column, token.kind, token.text
                );
            }
            Err(e) => {
                eprintln!("Error: Unable to read file '{}': {}", path, e);
                std::process::exit(1);
            }
        }
    }
    if invalid > 0 {
        eprintln!("{} invalid token(s)", invalid);
        std::process::exit(2);
    }
}
