//! Stdout-backed terminal backend using crossterm.

use std::io::{self, IsTerminal, Write};

use crossterm::terminal;

use super::{Backend, Size};
use crate::error::Result;

/// Fallback size when the stream is not a terminal and the environment
/// gives no answer.
const FALLBACK_SIZE: Size = Size::new(80, 24);

/// Terminal backend writing to stdout.
///
/// Size comes from the terminal itself; when stdout is not a tty the
/// `COLUMNS` / `LINES` environment variables are consulted instead, per
/// the usual CLI convention.
pub struct StdioBackend {
    tty: bool,
    raw_mode: bool,
}

impl StdioBackend {
    /// Create a backend over stdout, detecting whether it is a terminal.
    pub fn new() -> Self {
        Self {
            tty: io::stdout().is_terminal(),
            raw_mode: false,
        }
    }
}

impl Default for StdioBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl Backend for StdioBackend {
    fn size(&self) -> Result<Size> {
        if self.tty {
            let (w, h) = terminal::size()?;
            return Ok(Size::new(w, h));
        }
        Ok(size_from_env().unwrap_or(FALLBACK_SIZE))
    }

    fn is_tty(&self) -> bool {
        self.tty
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        io::stdout().write_all(data)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if self.tty && !self.raw_mode {
            terminal::enable_raw_mode()?;
            self.raw_mode = true;
        }
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        if self.raw_mode {
            terminal::disable_raw_mode()?;
            self.raw_mode = false;
        }
        Ok(())
    }
}

impl Drop for StdioBackend {
    fn drop(&mut self) {
        if self.raw_mode {
            let _ = terminal::disable_raw_mode();
        }
    }
}

/// Read a size from `COLUMNS` / `LINES`, if both parse.
fn size_from_env() -> Option<Size> {
    let width = std::env::var("COLUMNS").ok()?.parse::<u16>().ok()?;
    let height = std::env::var("LINES").ok()?.parse::<u16>().ok()?;
    Some(Size::new(width, height))
}
