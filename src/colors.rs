//! Ready-made escape sequences for styling text.
//!
//! Each constant is a complete graphics-mode sequence, so styled text can be
//! put together with `concat!` or format strings:
//!
//! ```rust
//! use vtconsole::colors::{BOLD_RED, RESET};
//! let line = format!("{BOLD_RED}error:{RESET} disk full");
//! assert_eq!(line, "\x1b[31;1merror:\x1b[0m disk full");
//! ```

use crate::attributes::{SGR_BACKGROUND_BEGIN, SGR_BOLD, SGR_FOREGROUND_BEGIN};
use crate::Color;

macro_rules! sgr {
    ($($param:literal),*) => {
        concat!("\x1b[", $($param,)* "m")
    };
}

pub const BLACK: &str = sgr!("30");
pub const RED: &str = sgr!("31");
pub const GREEN: &str = sgr!("32");
pub const YELLOW: &str = sgr!("33");
pub const BLUE: &str = sgr!("34");
pub const MAGENTA: &str = sgr!("35");
pub const CYAN: &str = sgr!("36");

pub const BOLD_RED: &str = sgr!("31;1");
pub const BOLD_GREEN: &str = sgr!("32;1");
pub const BOLD_YELLOW: &str = sgr!("33;1");
pub const BOLD_BLUE: &str = sgr!("34;1");
pub const BOLD_MAGENTA: &str = sgr!("35;1");
pub const BOLD_CYAN: &str = sgr!("36;1");

pub const INVERTED: &str = sgr!("7");

/// Restores the attributes the console had before any styling.
pub const RESET: &str = sgr!("0");

/// Builds a graphics-mode sequence setting the given colors.
///
/// Intensity is applied after the foreground color, since setting a color
/// replaces the whole foreground nibble. With nothing selected this returns
/// `ESC[m`, which resets.
pub fn graphics(fg: Option<Color>, bold: bool, bg: Option<Color>) -> String {
    let mut params = Vec::with_capacity(3);
    if let Some(fg) = fg {
        params.push(SGR_FOREGROUND_BEGIN + fg.index());
    }
    if bold {
        params.push(SGR_BOLD);
    }
    if let Some(bg) = bg {
        params.push(SGR_BACKGROUND_BEGIN + bg.index());
    }
    let params: Vec<String> = params.iter().map(u16::to_string).collect();
    format!("\x1b[{}m", params.join(";"))
}
