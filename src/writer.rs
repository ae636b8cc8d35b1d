use core::fmt;

use tracing::{debug, warn};

use crate::{AttributeState, ConsoleDevice, ParamOverflow, Result, Scanner, Token};

/// Settings for a [`StyledWriter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderConfig {
    /// Size of the buffer [`StyledWriter::print_fmt`] formats into. At most
    /// `buffer_capacity - 1` bytes of formatted text are rendered.
    pub buffer_capacity: usize,
    /// How to treat escape sequences with too many parameters.
    pub overflow: ParamOverflow,
}

impl RenderConfig {
    pub const DEFAULT_BUFFER_CAPACITY: usize = 8192;

    pub const fn new() -> Self {
        Self {
            buffer_capacity: Self::DEFAULT_BUFFER_CAPACITY,
            overflow: ParamOverflow::Stop,
        }
    }

    #[must_use]
    pub const fn with_buffer_capacity(mut self, buffer_capacity: usize) -> Self {
        self.buffer_capacity = buffer_capacity;
        self
    }

    #[must_use]
    pub const fn with_overflow(mut self, overflow: ParamOverflow) -> Self {
        self.overflow = overflow;
        self
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes text containing SGR escape sequences to a [`ConsoleDevice`],
/// turning the sequences into attribute changes.
///
/// The first render on a device that has an attribute register captures
/// that register as the baseline which `ESC[0m` restores. On a device
/// without one, text is written through untouched.
#[derive(Debug)]
pub struct StyledWriter<D> {
    device: D,
    state: Option<AttributeState>,
    config: RenderConfig,
}

impl<D> StyledWriter<D> {
    pub const fn new(device: D) -> Self {
        Self::with_config(device, RenderConfig::new())
    }

    pub const fn with_config(device: D, config: RenderConfig) -> Self {
        Self {
            device,
            state: None,
            config,
        }
    }

    #[inline(always)]
    pub const fn device(&self) -> &D {
        &self.device
    }

    #[inline(always)]
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    #[inline(always)]
    pub fn into_device(self) -> D {
        self.device
    }

    #[inline(always)]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The attribute state, once a styled render has captured a baseline.
    #[inline(always)]
    pub const fn attribute_state(&self) -> Option<&AttributeState> {
        self.state.as_ref()
    }
}

impl<D: ConsoleDevice> StyledWriter<D> {
    /// Renders `buffer` up to its first NUL byte and returns how many bytes
    /// that was.
    ///
    /// Literal bytes reach the device unchanged and in order. Each
    /// graphics-mode sequence updates the device's attributes before the
    /// bytes that follow it are written. Other sequences are consumed
    /// without effect.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] if the device fails to write or to
    /// accept new attributes.
    pub fn render(&mut self, buffer: impl AsRef<[u8]>) -> Result<usize> {
        let scanner = Scanner::with_overflow(buffer.as_ref(), self.config.overflow);
        let text = scanner.buffer();

        let Some(current) = self.device.text_attributes() else {
            if !text.is_empty() {
                debug!(len = text.len(), "console has no attribute register, writing raw");
                self.device.write_bytes(text)?;
            }
            return Ok(text.len());
        };

        let state = self.state.get_or_insert_with(|| {
            debug!(baseline = ?current, "captured baseline console attributes");
            AttributeState::new(current)
        });
        state.sync(current);

        for token in scanner {
            match token {
                Token::Literal(bytes) => self.device.write_bytes(bytes)?,
                token => {
                    if let Some(attributes) = state.apply(&token) {
                        self.device.set_text_attributes(attributes)?;
                    }
                }
            }
        }
        Ok(text.len())
    }

    /// Formats `args` into a buffer of [`RenderConfig::buffer_capacity`]
    /// bytes and renders the result.
    ///
    /// Returns the length of the full formatted text, which is larger than
    /// what was rendered if the buffer was too small.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Format`] without rendering anything if a
    /// formatting trait implementation fails, and [`crate::Error::Io`] if
    /// rendering fails.
    pub fn print_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<usize> {
        let mut buf = FormatBuffer::new(self.config.buffer_capacity);
        fmt::Write::write_fmt(&mut buf, args)?;
        if buf.is_truncated() {
            warn!(
                len = buf.total,
                capacity = self.config.buffer_capacity,
                "formatted text truncated"
            );
        }
        self.render(&buf.bytes)?;
        Ok(buf.total)
    }
}

/// Collects formatted text, keeping at most `capacity - 1` bytes but
/// counting all of them.
struct FormatBuffer {
    bytes: Vec<u8>,
    limit: usize,
    total: usize,
}

impl FormatBuffer {
    fn new(capacity: usize) -> Self {
        let limit = capacity.saturating_sub(1);
        Self {
            bytes: Vec::with_capacity(limit.min(256)),
            limit,
            total: 0,
        }
    }

    fn is_truncated(&self) -> bool {
        self.total > self.bytes.len()
    }
}

impl fmt::Write for FormatBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = self.limit - self.bytes.len();
        let take = room.min(s.len());
        self.bytes.extend_from_slice(&s.as_bytes()[..take]);
        self.total += s.len();
        Ok(())
    }
}
