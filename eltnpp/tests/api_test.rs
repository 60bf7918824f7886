// Test the public API against the documented parsing scenarios

use eltnpp::{EltnNumber, ErrorKind, Event, PullParser};
use test_log::test;

/// Advances once and checks the new event, error and table state.
fn expect<P: PullParser>(parser: &mut P, event: Event, depth: usize)
where
    P::Error: core::fmt::Debug,
{
    parser.advance().unwrap();
    assert_eq!(parser.current_event(), event);
    assert_eq!(parser.current_error(), ErrorKind::Ok);
    assert_eq!(parser.depth(), depth);
    assert_eq!(parser.is_in_table(), depth > 0);
}

#[test]
fn test_parse_empty() {
    let mut parser = eltnpp::from_str("");
    assert_eq!(parser.current_event(), Event::StreamStart);
    assert_eq!(parser.current_error(), ErrorKind::Ok);
    assert!(!parser.is_in_table());
    assert!(parser.has_more());

    expect(&mut parser, Event::StreamEnd, 0);
    assert!(!parser.has_more());
}

#[test]
fn test_parse_whitespace_and_comments_only() {
    let mut parser = eltnpp::from_str("  -- nothing here\n\t--[[ or here ]]\n");
    expect(&mut parser, Event::StreamEnd, 0);
    assert!(!parser.has_more());
}

#[test]
fn test_parse_key_value() {
    let mut parser = eltnpp::from_str("key = 1");

    expect(&mut parser, Event::DefName, 0);
    assert_eq!(parser.decoded_string().unwrap(), "key");
    assert_eq!(parser.current_key_text(), Some("key"));
    assert_eq!(parser.current_key_kind(), Some(Event::DefName));
    assert!(parser.has_more());

    expect(&mut parser, Event::ValueInteger, 0);
    assert_eq!(parser.decoded_number(), Ok(EltnNumber::Integer(1)));
    assert_eq!(parser.current_key_text(), Some("key"));
    assert_eq!(parser.current_path(), "key");
    assert!(parser.has_more());

    expect(&mut parser, Event::StreamEnd, 0);
    assert!(!parser.has_more());
}

#[test]
fn test_parse_key_true() {
    let mut parser = eltnpp::from_str("key = true");
    expect(&mut parser, Event::DefName, 0);
    expect(&mut parser, Event::ValueTrue, 0);
    assert!(parser.decoded_boolean());
    assert_eq!(parser.decoded_string().unwrap(), "true");
    expect(&mut parser, Event::StreamEnd, 0);
}

#[test]
fn test_parse_quoted_string() {
    let mut parser = eltnpp::from_str("key = \"a quoted string\"");
    expect(&mut parser, Event::DefName, 0);
    expect(&mut parser, Event::ValueString, 0);
    assert_eq!(parser.current_text(), "\"a quoted string\"");
    assert_eq!(parser.decoded_string().unwrap(), "a quoted string");
    expect(&mut parser, Event::StreamEnd, 0);
}

#[test]
fn test_parse_simple_escapes() {
    let mut parser = eltnpp::from_str(r"key = '\a\b\f\n\r\t\v\\'");
    expect(&mut parser, Event::DefName, 0);
    expect(&mut parser, Event::ValueString, 0);
    assert_eq!(parser.decoded_string().unwrap(), "\u{7}\u{8}\u{c}\n\r\t\u{b}\\");
}

#[test]
fn test_parse_hex_escapes() {
    let mut parser = eltnpp::from_str(r"key = '\x68\x65\x78'");
    expect(&mut parser, Event::DefName, 0);
    expect(&mut parser, Event::ValueString, 0);
    assert_eq!(parser.decoded_string().unwrap(), "hex");
}

#[test]
fn test_parse_table_with_implicit_keys() {
    let mut parser = eltnpp::from_str("{1, 2, x = 3}");

    expect(&mut parser, Event::TableStart, 1);

    expect(&mut parser, Event::ValueInteger, 1);
    assert_eq!(parser.decoded_number(), Ok(EltnNumber::Integer(1)));
    assert_eq!(parser.current_key_text(), Some("1"));
    assert_eq!(parser.current_key_kind(), Some(Event::TableKeyInteger));

    expect(&mut parser, Event::ValueInteger, 1);
    assert_eq!(parser.decoded_number(), Ok(EltnNumber::Integer(2)));
    assert_eq!(parser.current_key_text(), Some("2"));

    expect(&mut parser, Event::TableKeyString, 1);
    assert_eq!(parser.current_key_text(), Some("x"));

    expect(&mut parser, Event::ValueInteger, 1);
    assert_eq!(parser.decoded_number(), Ok(EltnNumber::Integer(3)));
    assert_eq!(parser.current_path(), "[1].x");

    expect(&mut parser, Event::TableEnd, 0);
    expect(&mut parser, Event::StreamEnd, 0);
}

#[test]
fn test_numbers_integer_or_float() {
    let mut parser = eltnpp::from_str("a = 10 b = 1.0 c = 1e2 d = 0x10 e = -0x1p-1 f = 9223372036854775808");
    let mut values = Vec::new();
    while let Some(event) = parser.next_event() {
        let event = event.unwrap();
        if event.is_value() {
            values.push((event, parser.decoded_number().unwrap()));
        }
    }
    assert_eq!(
        values,
        [
            (Event::ValueInteger, EltnNumber::Integer(10)),
            (Event::ValueNumber, EltnNumber::Float(1.0)),
            (Event::ValueNumber, EltnNumber::Float(100.0)),
            (Event::ValueInteger, EltnNumber::Integer(16)),
            (Event::ValueNumber, EltnNumber::Float(-0.5)),
            (Event::ValueNumber, EltnNumber::Float(9223372036854775808.0)),
        ]
    );
}

#[test]
fn test_boolean_coercion() {
    let mut parser = eltnpp::from_str("a = nil b = false c = 0 d = '' e = {}");
    let mut truthiness = Vec::new();
    while let Some(event) = parser.next_event() {
        let event = event.unwrap();
        if event.is_value() || event == Event::TableStart {
            truthiness.push(parser.decoded_boolean());
        }
    }
    assert_eq!(truthiness, [false, false, true, true, true]);
}

#[test]
fn test_text_and_positions() {
    let mut parser = eltnpp::from_str("first = 1\n  second = { 'x' }");
    let mut seen = Vec::new();
    while let Some(event) = parser.next_event() {
        let event = event.unwrap();
        seen.push((
            event,
            parser.current_text().to_string(),
            parser.current_offset(),
            parser.current_line(),
            parser.current_column(),
        ));
    }
    assert_eq!(
        seen,
        [
            (Event::DefName, "first".into(), Some(0), Some(1), Some(1)),
            (Event::ValueInteger, "1".into(), Some(8), Some(1), Some(9)),
            (Event::DefName, "second".into(), Some(12), Some(2), Some(3)),
            (Event::TableStart, "{".into(), Some(21), Some(2), Some(12)),
            (Event::ValueString, "'x'".into(), Some(23), Some(2), Some(14)),
            (Event::TableEnd, "}".into(), Some(27), Some(2), Some(18)),
            (Event::StreamEnd, "".into(), Some(28), Some(2), Some(19)),
        ]
    );
}

#[test]
fn test_decoding_errors() {
    let mut parser = eltnpp::from_str("t = {}");
    assert_eq!(
        parser.decoded_string(),
        Err(eltnpp::ParseError::NotAString(Event::StreamStart))
    );
    parser.advance().unwrap();
    assert_eq!(
        parser.decoded_number(),
        Err(eltnpp::ParseError::NotANumber(Event::DefName))
    );
    parser.advance().unwrap();
    assert_eq!(
        parser.decoded_bytes(),
        Err(eltnpp::ParseError::NotAString(Event::TableStart))
    );
}
