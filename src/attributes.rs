use core::fmt;

use tracing::trace;

use crate::{SgrParams, Token};

/// A native console attribute word.
///
/// The low byte uses the Windows console layout: bits 0..=3 are the
/// foreground blue, green, red and intensity bits, and bits 4..=7 are the
/// same for the background. Any higher bits belong to the platform and are
/// carried through every transform untouched.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Attributes(u16);

impl Attributes {
    pub const FOREGROUND_BLUE: u16 = 0x0001;
    pub const FOREGROUND_GREEN: u16 = 0x0002;
    pub const FOREGROUND_RED: u16 = 0x0004;
    pub const FOREGROUND_INTENSITY: u16 = 0x0008;
    pub const BACKGROUND_BLUE: u16 = 0x0010;
    pub const BACKGROUND_GREEN: u16 = 0x0020;
    pub const BACKGROUND_RED: u16 = 0x0040;
    pub const BACKGROUND_INTENSITY: u16 = 0x0080;

    pub const FOREGROUND_MASK: u16 = 0x000f;
    pub const BACKGROUND_MASK: u16 = 0x00f0;

    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// The four foreground bits, intensity included.
    #[inline(always)]
    pub const fn foreground(self) -> u16 {
        self.0 & Self::FOREGROUND_MASK
    }

    /// The four background bits, shifted down into the low nibble.
    #[inline(always)]
    pub const fn background(self) -> u16 {
        (self.0 & Self::BACKGROUND_MASK) >> 4
    }

    #[inline(always)]
    pub const fn is_intense(self) -> bool {
        self.0 & Self::FOREGROUND_INTENSITY != 0
    }

    #[inline(always)]
    pub const fn intensified(self) -> Self {
        Self(self.0 | Self::FOREGROUND_INTENSITY)
    }

    /// Swaps the foreground and background nibbles.
    pub const fn inverted(self) -> Self {
        let rest = self.0 & !(Self::FOREGROUND_MASK | Self::BACKGROUND_MASK);
        Self(rest | (self.foreground() << 4) | self.background())
    }

    /// Replaces the whole foreground nibble, clearing intensity.
    pub const fn with_foreground(self, color: Color) -> Self {
        Self((self.0 & !Self::FOREGROUND_MASK) | color.native_bits())
    }

    /// Replaces the whole background nibble, clearing background intensity.
    pub const fn with_background(self, color: Color) -> Self {
        Self((self.0 & !Self::BACKGROUND_MASK) | (color.native_bits() << 4))
    }
}

impl fmt::Debug for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attributes({:#06x})", self.0)
    }
}

impl From<u16> for Attributes {
    fn from(bits: u16) -> Self {
        Self(bits)
    }
}

impl From<Attributes> for u16 {
    fn from(attributes: Attributes) -> Self {
        attributes.0
    }
}

/// The colors reachable through SGR 30..=36 and 40..=46.
///
/// Discriminants are the ANSI color index, where bit 0 is red, bit 1 is
/// green and bit 2 is blue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
}

impl Color {
    pub const ALL: [Color; 7] = [
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Yellow,
        Color::Blue,
        Color::Magenta,
        Color::Cyan,
    ];

    pub const fn from_index(index: u16) -> Option<Self> {
        match index {
            0 => Some(Color::Black),
            1 => Some(Color::Red),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            4 => Some(Color::Blue),
            5 => Some(Color::Magenta),
            6 => Some(Color::Cyan),
            _ => None,
        }
    }

    #[inline(always)]
    pub const fn index(self) -> u16 {
        self as u16
    }

    /// The color as foreground bits of an attribute word.
    pub const fn native_bits(self) -> u16 {
        let index = self.index();
        let mut bits = 0;
        if index & 1 != 0 {
            bits |= Attributes::FOREGROUND_RED;
        }
        if index & 2 != 0 {
            bits |= Attributes::FOREGROUND_GREEN;
        }
        if index & 4 != 0 {
            bits |= Attributes::FOREGROUND_BLUE;
        }
        bits
    }
}

pub const SGR_RESET: u16 = 0;
pub const SGR_BOLD: u16 = 1;
pub const SGR_UNDERSCORE: u16 = 4;
pub const SGR_BLINK: u16 = 5;
pub const SGR_INVERTED: u16 = 7;
pub const SGR_CONCEALED: u16 = 8;
pub const SGR_FOREGROUND_BEGIN: u16 = 30;
pub const SGR_BACKGROUND_BEGIN: u16 = 40;

/// Tracks the attribute word a console should be showing.
///
/// The baseline is the console's attribute word before any escape sequence
/// changed it, and is what SGR 0 restores. It is fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeState {
    baseline: Attributes,
    current: Attributes,
}

impl AttributeState {
    pub const fn new(baseline: Attributes) -> Self {
        Self {
            baseline,
            current: baseline,
        }
    }

    #[inline(always)]
    pub const fn baseline(&self) -> Attributes {
        self.baseline
    }

    #[inline(always)]
    pub const fn current(&self) -> Attributes {
        self.current
    }

    /// Adopts the attribute word the device reports, in case something
    /// other than this state changed it since the last command.
    #[inline(always)]
    pub fn sync(&mut self, current: Attributes) {
        self.current = current;
    }

    /// Applies one scanned token, returning the new attribute word if the
    /// token was a graphics-mode command.
    ///
    /// Set-mode and reset-mode commands, unknown commands, unterminated
    /// sequences and literals leave the state alone.
    pub fn apply(&mut self, token: &Token<'_>) -> Option<Attributes> {
        match token {
            Token::GraphicsMode(params) => Some(self.apply_graphics(params)),
            Token::SetMode(params) | Token::ResetMode(params) => {
                trace!(?token, ?params, "mode commands are not supported");
                None
            }
            Token::Other { cmd, .. } => {
                trace!(cmd = %char::from(*cmd).escape_default(), "ignoring unknown command");
                None
            }
            Token::Unterminated(_) | Token::Literal(_) => None,
        }
    }

    /// Applies the parameters of a graphics-mode command in order.
    pub fn apply_graphics(&mut self, params: &SgrParams) -> Attributes {
        self.current = translate(self.current, self.baseline, params);
        self.current
    }
}

/// Computes the attribute word that results from applying `params` to
/// `current`, resetting to `baseline` on SGR 0 or an empty parameter.
pub fn translate(current: Attributes, baseline: Attributes, params: &SgrParams) -> Attributes {
    params
        .values()
        .iter()
        .fold(current, |attrs, &value| apply_value(attrs, baseline, value))
}

fn apply_value(attrs: Attributes, baseline: Attributes, value: Option<u16>) -> Attributes {
    let Some(value) = value else {
        return baseline;
    };
    match value {
        SGR_RESET => baseline,
        SGR_BOLD => attrs.intensified(),
        SGR_UNDERSCORE | SGR_BLINK | SGR_CONCEALED => attrs,
        SGR_INVERTED => attrs.inverted(),
        _ => {
            if let Some(color) = color_from(value, SGR_FOREGROUND_BEGIN) {
                attrs.with_foreground(color)
            } else if let Some(color) = color_from(value, SGR_BACKGROUND_BEGIN) {
                attrs.with_background(color)
            } else {
                trace!(value, "ignoring unsupported graphics parameter");
                attrs
            }
        }
    }
}

// 30..=36 or 40..=46, depending on `begin`.
fn color_from(value: u16, begin: u16) -> Option<Color> {
    value.checked_sub(begin).and_then(Color::from_index)
}
