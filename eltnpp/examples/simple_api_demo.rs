// Example demonstrating the pull API over a string

use core::convert::Infallible;

use eltnpp::{Event, PullParser};

fn main() -> Result<(), Infallible> {
    let eltn = r#"name = "value" number = 42 ratio = 0x1p-1 flag = true list = { 1, 'two', nil }"#;
    let mut parser = eltnpp::from_str(eltn);
    println!("Using eltnpp::from_str():");
    println!("Input: {}", eltn);

    while let Some(event) = parser.next_event() {
        let indent = "  ".repeat(parser.depth());
        match event? {
            Event::DefName | Event::TableKeyString => {
                println!("{indent}Key: '{}'", parser.current_text())
            }
            Event::TableStart => println!("{indent}TableStart"),
            Event::TableEnd => println!("{indent}TableEnd"),
            Event::ValueString => {
                // decoded_string() unescapes; current_text() is the raw lexeme
                println!("{indent}String: '{}'", parser.decoded_string().unwrap_or_default());
            }
            Event::ValueInteger | Event::ValueNumber => match parser.decoded_number() {
                Ok(number) => println!("{indent}Number: {} (as written: {})", number, parser.current_text()),
                Err(e) => println!("{indent}Bad number: {}", e),
            },
            Event::ValueTrue | Event::ValueFalse => {
                println!("{indent}Bool: {}", parser.decoded_boolean())
            }
            Event::ValueNil => println!("{indent}Nil at {}", parser.current_path()),
            Event::StreamEnd => {
                println!("StreamEnd");
                break;
            }
            Event::Error => {
                println!("Error: {}", parser.current_error());
                break;
            }
            other => println!("{indent}Other: {:?}", other),
        }
    }

    println!();
    println!("✅ Successfully parsed with the pull API!");
    Ok(())
}
