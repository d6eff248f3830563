//! In-memory terminal backend for testing.

use super::{Backend, Size};
use crate::error::{RegionError, Result};

/// In-memory terminal backend for testing.
///
/// All output is captured in a buffer that can be inspected. A write can be
/// made to fail once, to exercise error propagation.
pub struct TestBackend {
    size: Size,
    tty: bool,
    buffer: Vec<u8>,
    raw_mode: bool,
    fail_next_write: bool,
    flush_count: usize,
}

impl TestBackend {
    /// Create a test backend of the given size, reporting as a tty.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            tty: true,
            buffer: Vec::new(),
            raw_mode: false,
            fail_next_write: false,
            flush_count: 0,
        }
    }

    /// Report as a non-terminal stream.
    #[must_use]
    pub fn not_a_tty(mut self) -> Self {
        self.tty = false;
        self
    }

    /// The bytes written to this backend.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// The captured output as a string (lossy).
    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// Clear the captured output.
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
    }

    /// Number of flush calls seen.
    pub fn flush_count(&self) -> usize {
        self.flush_count
    }

    /// Whether raw mode is active.
    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    /// Simulate a resize.
    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = Size::new(width, height);
    }

    /// Make the next `write_raw` fail with a broken-pipe error.
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }
}

impl Backend for TestBackend {
    fn size(&self) -> Result<Size> {
        Ok(self.size)
    }

    fn is_tty(&self) -> bool {
        self.tty
    }

    fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(RegionError::Write(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "simulated write failure",
            )));
        }
        self.buffer.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.flush_count += 1;
        Ok(())
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = true;
        Ok(())
    }

    fn exit_raw_mode(&mut self) -> Result<()> {
        self.raw_mode = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_writes() {
        let mut tb = TestBackend::new(80, 24);
        tb.write_raw(b"hello").ok();
        assert_eq!(tb.buffer(), b"hello");
    }

    #[test]
    fn clear_buffer() {
        let mut tb = TestBackend::new(80, 24);
        tb.write_raw(b"data").ok();
        tb.clear_buffer();
        assert!(tb.buffer().is_empty());
    }

    #[test]
    fn resize_changes_size() {
        let mut tb = TestBackend::new(80, 24);
        tb.set_size(40, 10);
        assert_eq!(tb.size().ok(), Some(Size::new(40, 10)));
    }

    #[test]
    fn raw_mode_toggles() {
        let mut tb = TestBackend::new(80, 24);
        assert!(!tb.is_raw_mode());
        tb.enter_raw_mode().ok();
        assert!(tb.is_raw_mode());
        tb.exit_raw_mode().ok();
        assert!(!tb.is_raw_mode());
    }

    #[test]
    fn simulated_write_failure_fires_once() {
        let mut tb = TestBackend::new(80, 24);
        tb.fail_next_write();
        assert!(tb.write_raw(b"x").is_err());
        assert!(tb.write_raw(b"y").is_ok());
    }

    #[test]
    fn non_tty_flag() {
        let tb = TestBackend::new(80, 24).not_a_tty();
        assert!(!tb.is_tty());
    }
}
