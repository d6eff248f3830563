//! ANSI escape sequence emitter.
//!
//! Every byte sequence the renderer sends to the terminal is produced here:
//! cursor addressing and motion, line and screen clearing, cursor visibility,
//! auto-wrap (DECAWM), the alternate screen (DEC private mode 1049), SGR
//! reset, OSC-8 hyperlinks, and the DSR cursor-position query.

use std::fmt::Write;

/// Reset all SGR attributes: CSI 0 m.
pub const SGR_RESET: &str = "\x1b[0m";

/// Erase the entire current line: CSI 2 K.
pub const ERASE_LINE: &str = "\x1b[2K";

/// Erase the whole screen: CSI 2 J.
pub const ERASE_SCREEN: &str = "\x1b[2J";

/// Hide the cursor: CSI ? 25 l.
pub const CURSOR_HIDE: &str = "\x1b[?25l";

/// Show the cursor: CSI ? 25 h.
pub const CURSOR_SHOW: &str = "\x1b[?25h";

/// Disable auto-wrap (DECAWM off): CSI ? 7 l.
pub const AUTOWRAP_OFF: &str = "\x1b[?7l";

/// Enable auto-wrap (DECAWM on): CSI ? 7 h.
pub const AUTOWRAP_ON: &str = "\x1b[?7h";

/// Enter the alternate screen buffer: CSI ? 1049 h.
pub const ALT_SCREEN_ENTER: &str = "\x1b[?1049h";

/// Leave the alternate screen buffer: CSI ? 1049 l.
pub const ALT_SCREEN_LEAVE: &str = "\x1b[?1049l";

/// Save the cursor position (legacy SCO sequence): CSI s.
pub const CURSOR_SAVE: &str = "\x1b[s";

/// Restore the saved cursor position (legacy SCO sequence): CSI u.
pub const CURSOR_RESTORE: &str = "\x1b[u";

/// Query cursor position (DSR): CSI 6 n. Reply is CSI row ; col R.
pub const CURSOR_POSITION_QUERY: &str = "\x1b[6n";

/// Move the cursor to an absolute position (1-based row and column).
pub fn cursor_to(row: u16, col: u16) -> String {
    format!("\x1b[{row};{col}H")
}

/// Move the cursor up `n` rows.
pub fn cursor_up(n: u16) -> String {
    format!("\x1b[{n}A")
}

/// Move the cursor down `n` rows.
pub fn cursor_down(n: u16) -> String {
    format!("\x1b[{n}B")
}

/// Move the cursor right `n` columns.
pub fn cursor_right(n: u16) -> String {
    format!("\x1b[{n}C")
}

/// Move the cursor left `n` columns.
pub fn cursor_left(n: u16) -> String {
    format!("\x1b[{n}D")
}

/// Delete `n` lines at the cursor, scrolling the remainder up: CSI n M.
pub fn delete_lines(n: u16) -> String {
    format!("\x1b[{n}M")
}

/// Build an SGR sequence from raw parameter codes.
///
/// Returns an empty string for an empty code list, so a style with no active
/// attributes emits nothing.
pub fn sgr(codes: &[String]) -> String {
    if codes.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(codes.len() * 4 + 3);
    out.push_str("\x1b[");
    for (i, code) in codes.iter().enumerate() {
        if i > 0 {
            out.push(';');
        }
        out.push_str(code);
    }
    out.push('m');
    out
}

/// The OSC-8 opener for a hyperlink: ESC ] 8 ; ; URL ST.
pub fn osc8_open(url: &str) -> String {
    format!("\x1b]8;;{url}\x1b\\")
}

/// The OSC-8 closer, ending the current hyperlink: ESC ] 8 ; ; ST.
pub const OSC8_CLOSE: &str = "\x1b]8;;\x1b\\";

/// Wrap visible text in an OSC-8 hyperlink.
pub fn osc8_link(url: &str, text: &str) -> String {
    let mut out = String::with_capacity(url.len() + text.len() + 16);
    let _ = write!(out, "\x1b]8;;{url}\x1b\\{text}\x1b]8;;\x1b\\");
    out
}

/// Parse a DSR cursor-position reply (`ESC [ row ; col R`).
///
/// Scans `buf` for the first complete reply and returns the 1-based
/// `(row, col)`. Bytes before the reply (stray input, partial sequences)
/// are ignored.
pub fn parse_cursor_position(buf: &[u8]) -> Option<(u16, u16)> {
    let s = String::from_utf8_lossy(buf);
    let mut rest = s.as_ref();
    while let Some(start) = rest.find("\x1b[") {
        let body = &rest[start + 2..];
        if let Some(end) = body.find('R') {
            let params = &body[..end];
            let mut parts = params.splitn(2, ';');
            let row = parts.next().and_then(|p| p.parse::<u16>().ok());
            let col = parts.next().and_then(|p| p.parse::<u16>().ok());
            if let (Some(row), Some(col)) = (row, col) {
                return Some((row, col));
            }
        }
        rest = &rest[start + 2..];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_addressing_is_one_based() {
        assert_eq!(cursor_to(1, 1), "\x1b[1;1H");
        assert_eq!(cursor_to(4, 6), "\x1b[4;6H");
    }

    #[test]
    fn relative_motion() {
        assert_eq!(cursor_up(3), "\x1b[3A");
        assert_eq!(cursor_down(1), "\x1b[1B");
        assert_eq!(cursor_right(12), "\x1b[12C");
        assert_eq!(cursor_left(2), "\x1b[2D");
    }

    #[test]
    fn sgr_empty_is_empty() {
        assert!(sgr(&[]).is_empty());
    }

    #[test]
    fn sgr_joins_codes() {
        let codes = vec!["1".to_string(), "3".to_string(), "31".to_string()];
        assert_eq!(sgr(&codes), "\x1b[1;3;31m");
    }

    #[test]
    fn osc8_round_trip_shape() {
        let link = osc8_link("https://example.com", "docs");
        assert!(link.starts_with("\x1b]8;;https://example.com\x1b\\"));
        assert!(link.ends_with(OSC8_CLOSE));
        assert!(link.contains("docs"));
    }

    #[test]
    fn parse_cursor_position_reply() {
        assert_eq!(parse_cursor_position(b"\x1b[12;40R"), Some((12, 40)));
    }

    #[test]
    fn parse_cursor_position_skips_noise() {
        assert_eq!(parse_cursor_position(b"x\x1b[?1u\x1b[3;7R"), Some((3, 7)));
    }

    #[test]
    fn parse_cursor_position_rejects_garbage() {
        assert_eq!(parse_cursor_position(b"no reply here"), None);
        assert_eq!(parse_cursor_position(b"\x1b[;R"), None);
    }
}
