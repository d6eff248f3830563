//! Escape-aware scanning of mixed terminal text.
//!
//! Splits a string into visible characters and escape sequences without ever
//! landing inside one. Three escape shapes are recognized: CSI sequences
//! (`ESC [ params final`, which covers SGR), OSC sequences terminated by ST
//! or BEL (which covers OSC-8 hyperlinks), and two-byte `ESC x` escapes.
//! Everything else is a visible character worth one column.

/// One lexical unit of a terminal string.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// A visible character and its raw slice (one code point).
    Visible(char, &'a str),
    /// A complete CSI sequence, e.g. `\x1b[1;31m`.
    Csi(&'a str),
    /// A complete OSC sequence including its terminator.
    Osc(&'a str),
    /// Any other escape (two bytes, or a dangling ESC at end of input).
    Esc(&'a str),
}

impl<'a> Token<'a> {
    /// The raw text of this token.
    pub fn raw(&self) -> &'a str {
        match self {
            Token::Visible(_, raw) | Token::Csi(raw) | Token::Osc(raw) | Token::Esc(raw) => raw,
        }
    }

    /// True if this is an SGR sequence (`ESC [ … m`).
    pub fn is_sgr(&self) -> bool {
        matches!(self, Token::Csi(raw) if raw.ends_with('m'))
    }
}

/// Iterator over [`Token`]s of a string.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

/// Scan `src` into tokens.
pub fn scan(src: &str) -> Scanner<'_> {
    Scanner { src, pos: 0 }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let rest = &self.src[self.pos..];
        let mut chars = rest.char_indices();
        let (_, first) = chars.next()?;

        if first != '\x1b' {
            let len = first.len_utf8();
            let raw = &rest[..len];
            self.pos += len;
            return Some(Token::Visible(first, raw));
        }

        // Escape sequence. Decide its shape from the byte after ESC.
        let token = match chars.next() {
            Some((_, '[')) => {
                // CSI: parameter bytes 0x30-0x3F, intermediates 0x20-0x2F,
                // one final byte 0x40-0x7E.
                let mut end = rest.len();
                for (i, c) in rest.char_indices().skip(2) {
                    if ('\x40'..='\x7e').contains(&c) {
                        end = i + c.len_utf8();
                        break;
                    }
                }
                Token::Csi(&rest[..end])
            }
            Some((_, ']')) => {
                // OSC: runs to ST (ESC \) or BEL.
                let body = &rest[2..];
                let end = match (body.find("\x1b\\"), body.find('\x07')) {
                    (Some(st), Some(bel)) => {
                        if bel < st {
                            2 + bel + 1
                        } else {
                            2 + st + 2
                        }
                    }
                    (None, Some(bel)) => 2 + bel + 1,
                    (Some(st), None) => 2 + st + 2,
                    (None, None) => rest.len(),
                };
                Token::Osc(&rest[..end])
            }
            Some((i, c)) => Token::Esc(&rest[..i + c.len_utf8()]),
            None => Token::Esc(rest),
        };

        self.pos += token.raw().len();
        Some(token)
    }
}

/// Kind of OSC-8 hyperlink token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// Opens a hyperlink around subsequent text.
    Open(String),
    /// Closes the current hyperlink.
    Close,
}

/// Classify an OSC token as an OSC-8 open or close, if it is one.
///
/// The wire shape is `ESC ] 8 ; params ; URI ST`; an empty URI closes the
/// current link.
pub fn link_event(raw: &str) -> Option<LinkEvent> {
    let body = raw
        .strip_prefix("\x1b]8;")?
        .trim_end_matches('\x07')
        .trim_end_matches("\x1b\\");
    // body is "params;URI"; params are ignored by this renderer.
    let (_, uri) = body.split_once(';')?;
    if uri.is_empty() {
        Some(LinkEvent::Close)
    } else {
        Some(LinkEvent::Open(uri.to_string()))
    }
}

/// Tracks the set of SGR sequences currently in effect.
///
/// Used to reopen styling on the far side of a split: the tracked sequences,
/// replayed in order, reproduce the attribute state at the split point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SgrState {
    active: Vec<String>,
}

impl SgrState {
    /// Create an empty state (terminal defaults).
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one SGR sequence into the state.
    pub fn apply(&mut self, seq: &str) {
        let Some(params) = seq
            .strip_prefix("\x1b[")
            .and_then(|s| s.strip_suffix('m'))
        else {
            return;
        };
        if params.is_empty() || params == "0" {
            self.active.clear();
        } else if let Some(rest) = params.strip_prefix("0;") {
            self.active.clear();
            self.active.push(format!("\x1b[{rest}m"));
        } else {
            self.active.push(seq.to_string());
        }
    }

    /// True if no attributes are active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// The concatenated sequences that reproduce this state.
    pub fn opening(&self) -> String {
        self.active.concat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_all_visible() {
        let tokens: Vec<_> = scan("ab").collect();
        assert_eq!(
            tokens,
            vec![Token::Visible('a', "a"), Token::Visible('b', "b")]
        );
    }

    #[test]
    fn sgr_is_one_token() {
        let tokens: Vec<_> = scan("\x1b[1;31mx").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Csi("\x1b[1;31m"));
        assert!(tokens[0].is_sgr());
        assert_eq!(tokens[1], Token::Visible('x', "x"));
    }

    #[test]
    fn non_sgr_csi_recognized() {
        let tokens: Vec<_> = scan("\x1b[2K").collect();
        assert_eq!(tokens, vec![Token::Csi("\x1b[2K")]);
        assert!(!tokens[0].is_sgr());
    }

    #[test]
    fn osc_runs_to_st() {
        let s = "\x1b]8;;https://a.io\x1b\\t";
        let tokens: Vec<_> = scan(s).collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0], Token::Osc("\x1b]8;;https://a.io\x1b\\"));
        assert_eq!(tokens[1], Token::Visible('t', "t"));
    }

    #[test]
    fn osc_runs_to_bel() {
        let tokens: Vec<_> = scan("\x1b]0;title\x07x").collect();
        assert_eq!(tokens[0], Token::Osc("\x1b]0;title\x07"));
        assert_eq!(tokens[1], Token::Visible('x', "x"));
    }

    #[test]
    fn unterminated_osc_consumes_rest() {
        let tokens: Vec<_> = scan("\x1b]8;;http://x").collect();
        assert_eq!(tokens, vec![Token::Osc("\x1b]8;;http://x")]);
    }

    #[test]
    fn dangling_escape() {
        let tokens: Vec<_> = scan("a\x1b").collect();
        assert_eq!(tokens[1], Token::Esc("\x1b"));
    }

    #[test]
    fn two_byte_escape() {
        let tokens: Vec<_> = scan("\x1b7x").collect();
        assert_eq!(tokens[0], Token::Esc("\x1b7"));
    }

    #[test]
    fn link_event_open_and_close() {
        assert_eq!(
            link_event("\x1b]8;;https://a.io\x1b\\"),
            Some(LinkEvent::Open("https://a.io".to_string()))
        );
        assert_eq!(link_event("\x1b]8;;\x1b\\"), Some(LinkEvent::Close));
        assert_eq!(link_event("\x1b]0;title\x07"), None);
    }

    #[test]
    fn sgr_state_accumulates_and_resets() {
        let mut state = SgrState::new();
        state.apply("\x1b[1m");
        state.apply("\x1b[31m");
        assert_eq!(state.opening(), "\x1b[1m\x1b[31m");
        state.apply("\x1b[0m");
        assert!(state.is_empty());
    }

    #[test]
    fn sgr_state_bare_reset() {
        let mut state = SgrState::new();
        state.apply("\x1b[4m");
        state.apply("\x1b[m");
        assert!(state.is_empty());
    }

    #[test]
    fn sgr_state_reset_prefix_keeps_remainder() {
        let mut state = SgrState::new();
        state.apply("\x1b[1m");
        state.apply("\x1b[0;32m");
        assert_eq!(state.opening(), "\x1b[32m");
    }
}
