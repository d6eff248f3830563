//! Cursor-position query (DSR).
//!
//! Opt-in: nothing in the default render pipeline depends on it. The query
//! transiently needs raw mode so the reply arrives unbuffered; raw mode is
//! restored on every path, including errors.

use std::io::Read;
use std::time::{Duration, Instant};

use super::Backend;
use crate::ansi;
use crate::error::{RegionError, Result};

/// Query the cursor position through a backend, reading the reply from
/// `reply` (stdin for a real terminal, a canned buffer in tests).
///
/// Returns the 1-based `(row, col)`. Stray input bytes before the reply are
/// discarded; [`RegionError::CursorQueryTimeout`] is returned when no
/// complete `ESC [ row ; col R` arrives before the timeout.
pub fn query_cursor_position<R: Read>(
    backend: &mut dyn Backend,
    reply: R,
    timeout: Duration,
) -> Result<(u16, u16)> {
    if !backend.is_tty() {
        return Err(RegionError::NotATerminal);
    }
    backend.enter_raw_mode()?;
    let result = run_query(backend, reply, timeout);
    let restore = backend.exit_raw_mode();
    match (result, restore) {
        (Ok(pos), Ok(())) => Ok(pos),
        (Ok(_), Err(e)) | (Err(e), _) => Err(e),
    }
}

fn run_query<R: Read>(
    backend: &mut dyn Backend,
    mut reply: R,
    timeout: Duration,
) -> Result<(u16, u16)> {
    backend.write_raw(ansi::CURSOR_POSITION_QUERY.as_bytes())?;
    backend.flush()?;

    let deadline = Instant::now() + timeout;
    let mut collected = Vec::with_capacity(32);
    let mut chunk = [0u8; 32];
    loop {
        match reply.read(&mut chunk) {
            Ok(0) => {}
            Ok(n) => {
                collected.extend_from_slice(&chunk[..n]);
                if let Some(pos) = ansi::parse_cursor_position(&collected) {
                    return Ok(pos);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
            Err(e) => return Err(e.into()),
        }
        if Instant::now() >= deadline {
            return Err(RegionError::CursorQueryTimeout);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::TestBackend;
    use std::io::Cursor;

    #[test]
    fn parses_reply_and_restores_raw_mode() {
        let mut backend = TestBackend::new(80, 24);
        let reply = Cursor::new(b"\x1b[5;12R".to_vec());
        let pos = query_cursor_position(&mut backend, reply, Duration::from_millis(50));
        assert_eq!(pos.ok(), Some((5, 12)));
        assert!(!backend.is_raw_mode());
        assert!(backend.output().contains("\x1b[6n"));
    }

    #[test]
    fn skips_stray_input() {
        let mut backend = TestBackend::new(80, 24);
        let reply = Cursor::new(b"abc\x1b[2;3R".to_vec());
        let pos = query_cursor_position(&mut backend, reply, Duration::from_millis(50));
        assert_eq!(pos.ok(), Some((2, 3)));
    }

    #[test]
    fn times_out_without_reply_and_restores() {
        let mut backend = TestBackend::new(80, 24);
        let reply = Cursor::new(Vec::new());
        let pos = query_cursor_position(&mut backend, reply, Duration::from_millis(10));
        assert!(matches!(pos, Err(RegionError::CursorQueryTimeout)));
        assert!(!backend.is_raw_mode());
    }

    #[test]
    fn non_tty_is_rejected() {
        let mut backend = TestBackend::new(80, 24).not_a_tty();
        let reply = Cursor::new(b"\x1b[1;1R".to_vec());
        let pos = query_cursor_position(&mut backend, reply, Duration::from_millis(10));
        assert!(matches!(pos, Err(RegionError::NotATerminal)));
    }
}
