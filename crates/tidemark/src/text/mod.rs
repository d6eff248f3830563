//! Text measurement and truncation kernel.
//!
//! All operations treat a string as a mix of visible characters, SGR
//! sequences, and OSC-8 hyperlinks. A visible character is one code point
//! outside any escape and counts as one column; wide-character and grapheme
//! handling is out of scope for this renderer.
//!
//! None of these functions panic; out-of-range positions clamp.

pub mod scan;
mod truncate;
mod wrap;

pub use truncate::{
    FocusTruncation, map_column_to_display, truncate_end, truncate_focus_range, truncate_middle,
    truncate_start,
};
pub use wrap::wrap_text;

use scan::{LinkEvent, SgrState, Token, link_event, scan};

use crate::ansi;

/// The ellipsis used by all truncation variants.
pub const ELLIPSIS: char = '…';

/// Count the visible characters of `s`, ignoring all escape sequences.
pub fn count_visible(s: &str) -> usize {
    scan(s)
        .filter(|t| matches!(t, Token::Visible(..)))
        .count()
}

/// Remove every escape sequence from `s`, keeping only visible characters.
pub fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for token in scan(s) {
        if let Token::Visible(_, raw) = token {
            out.push_str(raw);
        }
    }
    out
}

/// Split `s` at visible position `k` (clamped to `count_visible(s)`).
///
/// Both halves render correctly in isolation: `before` keeps the escape
/// sequences it contains and terminates a hyperlink left open across the
/// boundary; `after` is prefixed with the SGR state active at the split and
/// reopens that hyperlink. Escape sequences are never divided.
pub fn split_at_visible_pos(s: &str, k: usize) -> (String, String) {
    let total = count_visible(s);
    if k == 0 {
        return (String::new(), s.to_string());
    }
    if k >= total {
        return (s.to_string(), String::new());
    }

    let mut before = String::with_capacity(s.len());
    let mut after = String::with_capacity(s.len());
    let mut state = SgrState::new();
    let mut link: Option<String> = None;
    let mut seen = 0usize;

    for token in scan(s) {
        let in_before = seen < k;
        match token {
            Token::Visible(_, raw) => {
                if in_before {
                    before.push_str(raw);
                    seen += 1;
                    if seen == k {
                        // Boundary: balance the halves.
                        if link.is_some() {
                            before.push_str(ansi::OSC8_CLOSE);
                        }
                        after.push_str(&state.opening());
                        if let Some(url) = &link {
                            after.push_str(&ansi::osc8_open(url));
                        }
                    }
                } else {
                    after.push_str(raw);
                }
            }
            Token::Csi(raw) => {
                let target = if in_before { &mut before } else { &mut after };
                target.push_str(raw);
                if token.is_sgr() {
                    state.apply(raw);
                }
            }
            Token::Osc(raw) => {
                let target = if in_before { &mut before } else { &mut after };
                target.push_str(raw);
                match link_event(raw) {
                    Some(LinkEvent::Open(url)) => link = Some(url),
                    Some(LinkEvent::Close) => link = None,
                    None => {}
                }
            }
            Token::Esc(raw) => {
                let target = if in_before { &mut before } else { &mut after };
                target.push_str(raw);
            }
        }
    }

    (before, after)
}

/// The longest prefix of `s` with visible width at most `w`.
pub fn truncate_to_width(s: &str, w: usize) -> String {
    if count_visible(s) <= w {
        return s.to_string();
    }
    split_at_visible_pos(s, w).0
}
