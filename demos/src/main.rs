// SPDX-License-Identifier: Apache-2.0

//! Prints the event stream of an ELTN document, one event per line.
//!
//! ```text
//! eltn-events settings.eltn
//! eltn-events --encoding UTF-16LE --decode - < settings.eltn
//! ```

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eltnpp::{Encoding, Event, PullParser};
use log::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "eltn-events", about = "Dump the pull-parser events of an ELTN document")]
struct Args {
    /// Document to read, or `-` for stdin.
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Character encoding of the input.
    #[arg(short, long, default_value = "UTF-8", value_parser = parse_encoding)]
    encoding: Encoding,

    /// Print decoded values instead of the raw lexemes.
    #[arg(short, long)]
    decode: bool,

    /// Print the key path of every event.
    #[arg(short, long)]
    paths: bool,
}

fn parse_encoding(label: &str) -> Result<Encoding, String> {
    Encoding::from_label(label).ok_or_else(|| {
        let known: Vec<_> = Encoding::ALL.iter().map(|e| e.label()).collect();
        format!("unknown encoding '{}' (expected one of {})", label, known.join(", "))
    })
}

fn open(input: &PathBuf) -> io::Result<Box<dyn Read>> {
    if input.as_os_str() == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(input)?))
    }
}

/// The text shown for the current event.
fn describe<P: PullParser>(parser: &P, decode: bool) -> String {
    let event = parser.current_event();
    if !decode {
        return format!("{:?}", parser.current_text());
    }
    if event == Event::ValueInteger || event == Event::ValueNumber {
        if let Ok(number) = parser.decoded_number() {
            return number.to_string();
        }
    }
    match parser.decoded_string() {
        Ok(text) => format!("{:?}", text),
        Err(_) => String::new(),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let reader = match open(&args.input) {
        Ok(reader) => reader,
        Err(e) => {
            eprintln!("Error: Unable to open '{}': {}", args.input.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!("Reading {} as {}", args.input.display(), args.encoding);

    let mut parser = eltnpp::from_io_reader(reader, args.encoding);
    let mut count = 0usize;
    while let Some(event) = parser.next_event() {
        if let Err(e) = event {
            eprintln!("Error: Unable to read '{}': {}", args.input.display(), e);
            return ExitCode::FAILURE;
        }
        count += 1;
        let position = match (parser.current_line(), parser.current_column()) {
            (Some(line), Some(column)) => format!("{}:{}", line, column),
            _ => "-".to_string(),
        };
        let mut line = format!(
            "{}\t{}{:?}\t{}",
            position,
            "  ".repeat(parser.depth()),
            parser.current_event(),
            describe(&parser, args.decode)
        );
        if args.paths {
            line.push('\t');
            line.push_str(&parser.current_path());
        }
        println!("{}", line);
    }
    debug!("{} events", count);

    if parser.current_event() == Event::Error {
        eprintln!(
            "Error: {} at line {}, column {}",
            parser.current_error(),
            parser.current_line().unwrap_or(0),
            parser.current_column().unwrap_or(0)
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
