// Example demonstrating a byte-stream parser fed in small chunks

use eltnpp::{ChunkReader, Encoding, Event, PullParser, SourceError};

fn main() -> Result<(), SourceError<core::convert::Infallible>> {
    println!("🚀 Byte stream demo with ChunkReader");
    println!("====================================");

    // UTF-16LE with a byte-order mark, as some editors save it
    let text = "greeting = 'hello\\nworld' items = { 1, 2.5, true, nil } count = 42";
    let mut bytes = vec![0xFF, 0xFE];
    bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));

    println!("📄 Input: {}", text);
    println!("📏 Total size: {} bytes ({})", bytes.len(), Encoding::Utf16Le);
    println!();

    // Read 8 bytes at a time (simulates small network packets)
    let reader = ChunkReader::new(&bytes, 8);
    let mut parser = eltnpp::from_reader(reader, Encoding::Utf16Le);

    let mut event_count = 0;
    while let Some(event) = parser.next_event() {
        let event = event?;
        event_count += 1;
        let line = parser.current_line().unwrap_or(0);
        let column = parser.current_column().unwrap_or(0);
        match event {
            Event::DefName => println!("  🔑 {}:{} Name: '{}'", line, column, parser.current_text()),
            Event::TableStart => println!("  🏁 {}:{} TableStart", line, column),
            Event::TableEnd => println!("  🏁 {}:{} TableEnd", line, column),
            Event::ValueString => println!(
                "  📝 {}:{} String: {:?}",
                line,
                column,
                parser.decoded_string().unwrap_or_default()
            ),
            Event::StreamEnd => println!("  🏁 {}:{} StreamEnd", line, column),
            Event::Error => println!("  ❌ {}:{} Error: {}", line, column, parser.current_error()),
            other => println!(
                "  ▫️ {}:{} {:?} at {}",
                line,
                column,
                other,
                parser.current_path()
            ),
        }
    }

    println!();
    println!("✅ Parsed {} events", event_count);
    Ok(())
}
