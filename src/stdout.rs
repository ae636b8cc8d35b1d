use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use once_cell::sync::Lazy;

use crate::{Attributes, ConsoleDevice, Result, StyledWriter};

/// The process's standard output as a [`ConsoleDevice`].
///
/// On Windows the attribute register is the console screen buffer's text
/// attributes. When standard output is not a console, or on any other
/// platform, there is no register and escape sequences are written through
/// for the terminal to interpret itself.
#[derive(Debug)]
pub struct StdConsole {
    out: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDevice for StdConsole {
    fn write_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.out.write_all(bytes)
    }

    fn text_attributes(&self) -> Option<Attributes> {
        platform::text_attributes().map(Attributes::from_bits)
    }

    fn set_text_attributes(&mut self, attributes: Attributes) -> io::Result<()> {
        // Bytes still buffered in Rust must land in the old attributes.
        self.out.flush()?;
        platform::set_text_attributes(attributes.bits())
    }
}

static STDOUT: Lazy<Mutex<StyledWriter<StdConsole>>> =
    Lazy::new(|| Mutex::new(StyledWriter::new(StdConsole::new())));

/// Locks the writer shared by the whole process for standard output.
///
/// Its baseline is captured on the first styled write, so `ESC[0m` restores
/// whatever the console showed before this process first changed it.
pub fn stdout() -> MutexGuard<'static, StyledWriter<StdConsole>> {
    STDOUT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Formats `args` and renders them to standard output.
///
/// This is the function behind [`crate::ansi_print!`].
///
/// # Errors
///
/// See [`StyledWriter::print_fmt`].
pub fn ansi_printf(args: core::fmt::Arguments<'_>) -> Result<usize> {
    let mut writer = stdout();
    let count = writer.print_fmt(args)?;
    writer.device_mut().out.flush()?;
    Ok(count)
}

#[cfg(windows)]
mod platform {
    use std::io;

    use windows_sys::Win32::Foundation::INVALID_HANDLE_VALUE;
    use windows_sys::Win32::System::Console::{
        GetConsoleScreenBufferInfo, GetStdHandle, SetConsoleTextAttribute,
        CONSOLE_SCREEN_BUFFER_INFO, STD_OUTPUT_HANDLE,
    };

    pub(super) fn text_attributes() -> Option<u16> {
        // SAFETY: GetStdHandle has no preconditions, and the info struct is
        // plain data that the call fills in.
        unsafe {
            let handle = GetStdHandle(STD_OUTPUT_HANDLE);
            if handle.is_null() || handle == INVALID_HANDLE_VALUE {
                return None;
            }
            let mut info: CONSOLE_SCREEN_BUFFER_INFO = core::mem::zeroed();
            if GetConsoleScreenBufferInfo(handle, &mut info) == 0 {
                // Not a console, e.g. redirected to a file.
                return None;
            }
            Some(info.wAttributes)
        }
    }

    pub(super) fn set_text_attributes(bits: u16) -> io::Result<()> {
        // SAFETY: an invalid handle makes the call fail, which is reported.
        let ok = unsafe { SetConsoleTextAttribute(GetStdHandle(STD_OUTPUT_HANDLE), bits) };
        if ok == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(windows))]
mod platform {
    use std::io;

    // Terminals here interpret SGR themselves.
    pub(super) fn text_attributes() -> Option<u16> {
        None
    }

    pub(super) fn set_text_attributes(bits: u16) -> io::Result<()> {
        let _ = bits;
        Ok(())
    }
}
