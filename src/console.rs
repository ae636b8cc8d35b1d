use std::io;

use crate::Attributes;

/// Trait for output devices that a [`crate::StyledWriter`] renders into.
///
/// Only [`ConsoleDevice::write_bytes`] is required. The provided attribute
/// methods describe a device with no attribute register, which makes the
/// writer pass escape sequences through as plain bytes.
pub trait ConsoleDevice {
    /// Writes bytes at the current position, in the current attributes.
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Reads the device's attribute register.
    ///
    /// Returns `None` when there is no usable register, for example because
    /// output is redirected to a file or pipe.
    #[inline(always)]
    fn text_attributes(&self) -> Option<Attributes> {
        None
    }

    /// Replaces the attributes used for everything written afterwards.
    #[inline(always)]
    fn set_text_attributes(&mut self, attributes: Attributes) -> io::Result<()> {
        let _ = attributes;
        // Nothing to update without a register.
        Ok(())
    }
}

impl<D: ConsoleDevice + ?Sized> ConsoleDevice for &mut D {
    #[inline(always)]
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        (**self).write_bytes(bytes)
    }

    #[inline(always)]
    fn text_attributes(&self) -> Option<Attributes> {
        (**self).text_attributes()
    }

    #[inline(always)]
    fn set_text_attributes(&mut self, attributes: Attributes) -> io::Result<()> {
        (**self).set_text_attributes(attributes)
    }
}

/// Something a [`MemoryConsole`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Write(Vec<u8>),
    SetAttributes(Attributes),
}

/// A console that keeps everything in memory.
///
/// Each call on the device is recorded as a [`ConsoleEvent`], which makes
/// it suitable for capturing styled output and for tests. A console created
/// with [`MemoryConsole::detached`] has no attribute register and so
/// behaves like redirected output.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    initial: Attributes,
    register: Option<Attributes>,
    events: Vec<ConsoleEvent>,
}

impl MemoryConsole {
    pub fn new(initial: Attributes) -> Self {
        Self {
            initial,
            register: Some(initial),
            events: Vec::new(),
        }
    }

    pub fn detached() -> Self {
        Self {
            initial: Attributes::default(),
            register: None,
            events: Vec::new(),
        }
    }

    /// Overwrites the register without recording an event, as another
    /// program sharing the console might.
    pub fn poke_attributes(&mut self, attributes: Attributes) {
        self.register = Some(attributes);
    }

    pub fn events(&self) -> &[ConsoleEvent] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<ConsoleEvent> {
        core::mem::take(&mut self.events)
    }

    /// All written bytes, concatenated.
    pub fn output(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                ConsoleEvent::Write(bytes) => Some(bytes.as_slice()),
                ConsoleEvent::SetAttributes(_) => None,
            })
            .flatten()
            .copied()
            .collect()
    }

    /// Each written byte paired with the attributes it was written in.
    ///
    /// Only recorded events count, so changes made through
    /// [`MemoryConsole::poke_attributes`] are not reflected. Returns an
    /// empty list for a detached console.
    pub fn styled_output(&self) -> Vec<(u8, Attributes)> {
        if self.register.is_none() {
            return Vec::new();
        }
        let mut attrs = self.initial;
        let mut ret = Vec::new();
        for event in &self.events {
            match event {
                ConsoleEvent::Write(bytes) => ret.extend(bytes.iter().map(|&b| (b, attrs))),
                ConsoleEvent::SetAttributes(next) => attrs = *next,
            }
        }
        ret
    }
}

impl ConsoleDevice for MemoryConsole {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.events.push(ConsoleEvent::Write(bytes.to_vec()));
        Ok(())
    }

    fn text_attributes(&self) -> Option<Attributes> {
        self.register
    }

    fn set_text_attributes(&mut self, attributes: Attributes) -> io::Result<()> {
        if self.register.is_none() {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "console has no attribute register",
            ));
        }
        self.register = Some(attributes);
        self.events.push(ConsoleEvent::SetAttributes(attributes));
        Ok(())
    }
}

/// Wraps any writer as a device with no attribute register.
///
/// Everything rendered through it, escape sequences included, reaches the
/// writer byte for byte.
#[derive(Debug, Default)]
pub struct RawConsole<W> {
    out: W,
}

impl<W: io::Write> RawConsole<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    #[inline(always)]
    pub const fn get_ref(&self) -> &W {
        &self.out
    }

    #[inline(always)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: io::Write> ConsoleDevice for RawConsole<W> {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }
}
