use tracing::trace;

/// The byte that introduces every escape sequence.
pub const ESC: u8 = 0x1b;

/// Final byte selecting Select Graphic Rendition.
pub const CMD_GRAPHICS_MODE: u8 = b'm';
/// Final byte of the "set mode" command, which is recognized but never applied.
pub const CMD_SET_MODE: u8 = b'h';
/// Final byte of the "reset mode" command, which is recognized but never applied.
pub const CMD_RESET_MODE: u8 = b'l';

const BRACE: u8 = b'[';
const SEPARATOR: u8 = b';';

/// What the parser does with `;`-separated values past [`SgrParams::CAPACITY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamOverflow {
    /// Stop parsing at the separator that would open one slot too many.
    ///
    /// That separator becomes the sequence's terminator, so no command is
    /// dispatched and the bytes following it are scanned as literals.
    #[default]
    Stop,

    /// Keep consuming the sequence up to its real final byte, discarding
    /// every value past the last slot, and dispatch with what was kept.
    DropExcess,
}

/// Iterates over the literal runs and escape sequences of a byte buffer.
///
/// The buffer ends at its first NUL byte, or at the end of the slice if it
/// has none; nothing after the NUL is ever examined.
///
/// Every byte other than [`ESC`] is literal and is reported unchanged, with
/// consecutive literal bytes grouped into one [`Token::Literal`]. An `ESC`
/// starts a sequence whose body is collected into [`SgrParams`] until the
/// first byte that is not a digit, `[` or `;`.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
    state: State,
    params: SgrParams,
    overflow: ParamOverflow,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_overflow(buf, ParamOverflow::default())
    }

    pub fn with_overflow(buf: &'a [u8], overflow: ParamOverflow) -> Self {
        Self {
            buf: &buf[..scan_len(buf)],
            pos: 0,
            state: State::Literal,
            params: SgrParams::new(),
            overflow,
        }
    }

    /// The number of bytes consumed so far.
    #[inline(always)]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The bytes this scanner will visit, which excludes the NUL
    /// terminator and anything after it.
    #[inline(always)]
    pub const fn buffer(&self) -> &'a [u8] {
        self.buf
    }

    fn enter_sequence(&mut self) {
        self.state = State::Sequence;
        self.params.clear();
        // Even an empty body carries one unset parameter.
        self.params.open_slot();
    }

    fn finish_sequence(&mut self, cmd: u8) -> Token<'a> {
        self.state = State::Literal;
        Token::dispatch(cmd, self.params)
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let buf = self.buf;
        let start = self.pos;
        while let Some(&c) = buf.get(self.pos) {
            match self.state {
                State::Literal => {
                    if c == ESC {
                        if self.pos > start {
                            return Some(Token::Literal(&buf[start..self.pos]));
                        }
                        self.pos += 1;
                        self.enter_sequence();
                    } else {
                        self.pos += 1;
                    }
                }
                State::Sequence => {
                    self.pos += 1;
                    match c {
                        b'0'..=b'9' => self.params.push_digit(c - b'0'),
                        BRACE => {
                            // Expected once right after ESC, but accepted anywhere.
                        }
                        SEPARATOR => {
                            if self.params.open_slot() {
                                continue;
                            }
                            match self.overflow {
                                ParamOverflow::Stop => {
                                    trace!(
                                        position = self.pos,
                                        "too many parameters, stopping at separator"
                                    );
                                    return Some(self.finish_sequence(c));
                                }
                                ParamOverflow::DropExcess => {
                                    trace!(position = self.pos, "too many parameters, dropping value");
                                }
                            }
                        }
                        _ => return Some(self.finish_sequence(c)),
                    }
                }
            }
        }

        match self.state {
            State::Literal if self.pos > start => Some(Token::Literal(&buf[start..self.pos])),
            State::Literal => None,
            State::Sequence => {
                trace!("escape sequence truncated by end of buffer");
                self.state = State::Literal;
                Some(Token::Unterminated(self.params))
            }
        }
    }
}

/// Returns the length of `buf` up to, but not including, its first NUL byte.
pub fn scan_len(buf: &[u8]) -> usize {
    buf.iter().position(|&c| c == 0).unwrap_or(buf.len())
}

/// One item produced by a [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    /// A run of bytes to be written through unchanged.
    Literal(&'a [u8]),
    /// `ESC [ ... m`: select graphic rendition.
    GraphicsMode(SgrParams),
    /// `ESC [ ... h`
    SetMode(SgrParams),
    /// `ESC [ ... l`
    ResetMode(SgrParams),
    /// A sequence ending in any other final byte.
    Other { cmd: u8, params: SgrParams },
    /// A sequence cut off by the end of the buffer.
    Unterminated(SgrParams),
}

impl Token<'_> {
    fn dispatch(cmd: u8, params: SgrParams) -> Self {
        match cmd {
            CMD_GRAPHICS_MODE => Token::GraphicsMode(params),
            CMD_SET_MODE => Token::SetMode(params),
            CMD_RESET_MODE => Token::ResetMode(params),
            _ => Token::Other { cmd, params },
        }
    }

    /// The final byte that ended the sequence, or `None` for literals.
    ///
    /// An unterminated sequence reports NUL, the byte that ended it.
    pub const fn command(&self) -> Option<u8> {
        match self {
            Token::Literal(_) => None,
            Token::GraphicsMode(_) => Some(CMD_GRAPHICS_MODE),
            Token::SetMode(_) => Some(CMD_SET_MODE),
            Token::ResetMode(_) => Some(CMD_RESET_MODE),
            Token::Other { cmd, .. } => Some(*cmd),
            Token::Unterminated(_) => Some(0),
        }
    }

    pub const fn params(&self) -> Option<&SgrParams> {
        match self {
            Token::Literal(_) => None,
            Token::GraphicsMode(params)
            | Token::SetMode(params)
            | Token::ResetMode(params)
            | Token::Other { params, .. }
            | Token::Unterminated(params) => Some(params),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Literal,
    Sequence,
}

/// The numeric parameters of one escape sequence.
///
/// Holds at most [`SgrParams::CAPACITY`] slots. A slot is `None` until a
/// digit is written into it, so `ESC[;1m` has the two slots `[None, Some(1)]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SgrParams {
    buf: [Option<u16>; SgrParams::CAPACITY],
    len: usize,
    overrun: bool,
}

impl SgrParams {
    pub const CAPACITY: usize = 6;

    pub const fn new() -> Self {
        Self {
            buf: [None; Self::CAPACITY],
            len: 0,
            overrun: false,
        }
    }

    /// Builds a list holding exactly `values`, or `None` if there are more
    /// than [`SgrParams::CAPACITY`] of them.
    pub fn from_values(values: &[Option<u16>]) -> Option<Self> {
        let mut ret = Self::new();
        ret.buf.get_mut(..values.len())?.copy_from_slice(values);
        ret.len = values.len();
        Some(ret)
    }

    /// Starts a new, unset slot.
    ///
    /// Returns `false` and records an overrun if every slot is already in
    /// use; the list itself is left unchanged.
    pub fn open_slot(&mut self) -> bool {
        if self.len == self.buf.len() {
            self.overrun = true;
            return false;
        }
        self.buf[self.len] = None;
        self.len += 1;
        true
    }

    /// Appends a decimal digit to the last slot, opening the first slot if
    /// there is none yet. Values saturate at `u16::MAX`.
    ///
    /// Digits arriving after an overrun belong to a dropped value and are
    /// ignored.
    pub fn push_digit(&mut self, digit: u8) {
        if self.overrun {
            return;
        }
        if self.len == 0 {
            self.open_slot();
        }
        let current = &mut self.buf[self.len - 1];
        let value = current.unwrap_or(0);
        *current = Some(value.saturating_mul(10).saturating_add(u16::from(digit)));
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    #[inline(always)]
    pub fn values(&self) -> &[Option<u16>] {
        &self.buf[..self.len]
    }

    #[inline(always)]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reports whether the sequence had more values than fit.
    #[inline(always)]
    pub const fn has_overrun(&self) -> bool {
        self.overrun
    }
}

impl Default for SgrParams {
    fn default() -> Self {
        Self::new()
    }
}
