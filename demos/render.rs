use std::io::{stdin, Read};

use tracing_subscriber::EnvFilter;
use vtconsole::{Attributes, MemoryConsole, Scanner, StyledWriter};

// Reads text from stdin, lists the tokens it contains, then shows which
// attributes each byte would be written in. Set RUST_LOG=trace to see
// which sequences were ignored.
fn main() -> Result<(), vtconsole::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut input = Vec::new();
    stdin().read_to_end(&mut input)?;

    for token in Scanner::new(&input) {
        println!("{token:?}");
    }

    let mut writer = StyledWriter::new(MemoryConsole::new(Attributes::from_bits(0x0007)));
    writer.render(&input)?;
    for (byte, attributes) in writer.device().styled_output() {
        println!("{:?} {attributes:?}", char::from(byte));
    }

    vtconsole::ansi_print!(
        "{}done{}\n",
        vtconsole::colors::BOLD_GREEN,
        vtconsole::colors::RESET
    )?;
    Ok(())
}
