//! Word-aware wrapping that never splits an escape sequence.
//!
//! Lines break at whitespace when possible, falling back to a hard split
//! inside words longer than the width. The SGR state and any open hyperlink
//! are reopened at the start of each continuation line, so every line
//! renders correctly on its own.

use super::scan::{LinkEvent, SgrState, Token, link_event, scan};
use super::split_at_visible_pos;
use crate::ansi;

#[derive(Clone, Copy, PartialEq, Eq)]
enum ChunkKind {
    Word,
    Gap,
}

struct Chunk {
    raw: String,
    vis: usize,
    kind: ChunkKind,
    /// Escape prefix reproducing the style state at the chunk start.
    opening: String,
}

/// Wrap `s` into lines of visible width at most `width`.
///
/// Breaks at spaces when possible; the space run at a break point is
/// dropped. `width == 0` returns the input as a single line. Empty input
/// wraps to no lines.
pub fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if s.is_empty() {
        return Vec::new();
    }
    if width == 0 {
        return vec![s.to_string()];
    }

    let mut lines = Vec::new();
    for logical in s.split('\n') {
        wrap_logical_line(logical, width, &mut lines);
    }
    lines
}

/// Wrap one newline-free line, appending to `lines`.
fn wrap_logical_line(s: &str, width: usize, lines: &mut Vec<String>) {
    let chunks = chunk(s);

    let mut cur = String::new();
    let mut cur_vis = 0usize;
    let mut pending: Option<(String, usize)> = None;

    for chunk in chunks {
        match chunk.kind {
            ChunkKind::Gap => {
                pending = Some(match pending.take() {
                    Some((mut raw, vis)) => {
                        raw.push_str(&chunk.raw);
                        (raw, vis + chunk.vis)
                    }
                    None => (chunk.raw, chunk.vis),
                });
            }
            ChunkKind::Word => {
                let gap_vis = pending.as_ref().map_or(0, |g| g.1);
                let link_open = chunk.opening.contains("\x1b]8;");
                if cur_vis > 0 && cur_vis + gap_vis + chunk.vis > width {
                    // Break here; the gap's spaces are consumed by the break,
                    // but any escapes inside it still apply.
                    if let Some((raw, _)) = pending.take() {
                        for token in scan(&raw) {
                            if !matches!(token, Token::Visible(..)) {
                                cur.push_str(token.raw());
                            }
                        }
                    }
                    if link_open {
                        cur.push_str(ansi::OSC8_CLOSE);
                    }
                    lines.push(std::mem::take(&mut cur));
                    cur_vis = 0;
                    cur.push_str(&chunk.opening);
                } else if let Some((raw, vis)) = pending.take() {
                    if cur_vis + vis <= width {
                        cur.push_str(&raw);
                        cur_vis += vis;
                    } else {
                        // Oversized leading gap: clip it to the line.
                        let (head, _) = split_at_visible_pos(&raw, width - cur_vis);
                        cur.push_str(&head);
                        cur_vis = width;
                    }
                }

                let mut rest_raw = chunk.raw;
                let mut rest_vis = chunk.vis;
                loop {
                    if cur_vis + rest_vis <= width {
                        cur.push_str(&rest_raw);
                        cur_vis += rest_vis;
                        break;
                    }
                    let room = width.saturating_sub(cur_vis);
                    if room == 0 {
                        if link_open {
                            cur.push_str(ansi::OSC8_CLOSE);
                        }
                        lines.push(std::mem::take(&mut cur));
                        cur_vis = 0;
                        cur.push_str(&chunk.opening);
                        continue;
                    }
                    // Hard split inside an overlong word; the tail comes back
                    // with its style state already reopened.
                    let (head, tail) = split_at_visible_pos(&rest_raw, room);
                    cur.push_str(&head);
                    lines.push(std::mem::take(&mut cur));
                    cur_vis = 0;
                    rest_raw = tail;
                    rest_vis -= room;
                }
            }
        }
    }

    // Keep a trailing gap when it still fits.
    if let Some((raw, vis)) = pending
        && cur_vis + vis <= width
    {
        cur.push_str(&raw);
    }

    if !cur.is_empty() || lines.is_empty() {
        lines.push(cur);
    }
}

/// Split a line into word and gap chunks, escapes attached to the chunk
/// they appear in, with the style state at each chunk start recorded.
fn chunk(s: &str) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut state = SgrState::new();
    let mut link: Option<String> = None;

    let opening_of = |state: &SgrState, link: &Option<String>| {
        let mut o = state.opening();
        if let Some(url) = link {
            o.push_str(&ansi::osc8_open(url));
        }
        o
    };

    for token in scan(s) {
        match token {
            Token::Visible(c, raw) => {
                let kind = if c == ' ' {
                    ChunkKind::Gap
                } else {
                    ChunkKind::Word
                };
                match chunks.last_mut() {
                    Some(last) if last.kind == kind => {
                        last.raw.push_str(raw);
                        last.vis += 1;
                    }
                    _ => chunks.push(Chunk {
                        raw: raw.to_string(),
                        vis: 1,
                        kind,
                        opening: opening_of(&state, &link),
                    }),
                }
            }
            Token::Csi(raw) | Token::Osc(raw) | Token::Esc(raw) => {
                if token.is_sgr() {
                    state.apply(raw);
                }
                if let Token::Osc(_) = token {
                    match link_event(raw) {
                        Some(LinkEvent::Open(url)) => link = Some(url),
                        Some(LinkEvent::Close) => link = None,
                        None => {}
                    }
                }
                match chunks.last_mut() {
                    Some(last) => last.raw.push_str(raw),
                    None => chunks.push(Chunk {
                        raw: raw.to_string(),
                        vis: 0,
                        kind: ChunkKind::Word,
                        opening: String::new(),
                    }),
                }
            }
        }
    }

    chunks
}
