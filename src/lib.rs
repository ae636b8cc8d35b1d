//! ANSI SGR emulation for consoles that only understand native attributes.
//!
//! Some consoles cannot interpret ANSI escape sequences themselves but do
//! have an attribute register selecting the foreground color, background
//! color and intensity of subsequently written text. This library scans
//! text for Select Graphic Rendition sequences such as `"\x1b[31;1m"` and
//! translates them into writes to that register, passing everything else
//! through unchanged.
//!
//! Only the graphics-mode command `m` is interpreted, and only the values
//! 0 (reset), 1 (intensity), 7 (inverse), 30 to 36 (foreground) and 40 to
//! 46 (background). Any other sequence is consumed and ignored.
//!
//! The main entry point is [`StyledWriter`], which renders into an
//! implementation of trait [`ConsoleDevice`]. [`Scanner`] exposes the
//! tokenizer on its own.
//!
//! ```rust
//! # use vtconsole::{Attributes, ConsoleEvent, MemoryConsole, StyledWriter};
//! let mut writer = StyledWriter::new(MemoryConsole::new(Attributes::from_bits(0x07)));
//! writer.render("plain \x1b[31;1mwarning\x1b[0m done")?;
//! # assert_eq!(writer.device().events(), &[
//! #    ConsoleEvent::Write(b"plain ".to_vec()),
//! #    ConsoleEvent::SetAttributes(Attributes::from_bits(0x0c)),
//! #    ConsoleEvent::Write(b"warning".to_vec()),
//! #    ConsoleEvent::SetAttributes(Attributes::from_bits(0x07)),
//! #    ConsoleEvent::Write(b" done".to_vec()),
//! # ]);
//! for event in writer.device().events() {
//!     println!("{event:?}");
//! }
//! # Ok::<(), vtconsole::Error>(())
//! ```
//!
//! ```plaintext
//! Write([112, 108, 97, 105, 110, 32])
//! SetAttributes(Attributes(0x000c))
//! Write([119, 97, 114, 110, 105, 110, 103])
//! SetAttributes(Attributes(0x0007))
//! Write([32, 100, 111, 110, 101])
//! ```
//!
//! Writing to the process's standard output goes through [`ansi_print!`],
//! which uses the console API on Windows and leaves the sequences for the
//! terminal elsewhere.

mod attributes;
pub mod colors;
mod console;
mod error;
mod machine;
mod stdout;
mod writer;

pub use attributes::{translate, AttributeState, Attributes, Color};
pub use console::{ConsoleDevice, ConsoleEvent, MemoryConsole, RawConsole};
pub use error::{Error, Result};
pub use machine::{
    scan_len, ParamOverflow, Scanner, SgrParams, Token, CMD_GRAPHICS_MODE, CMD_RESET_MODE,
    CMD_SET_MODE, ESC,
};
pub use stdout::{ansi_printf, stdout, StdConsole};
pub use writer::{RenderConfig, StyledWriter};

/// Formats its arguments like [`print!`] and renders the result to standard
/// output, applying any SGR sequences it contains.
///
/// Evaluates to a [`Result`] holding the length of the formatted text.
#[macro_export]
macro_rules! ansi_print {
    ($($arg:tt)*) => {
        $crate::ansi_printf(::core::format_args!($($arg)*))
    };
}
