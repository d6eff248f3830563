//! Property-based tests for the text kernel, differ, and grid invariants.
//!
//! Uses proptest to throw randomized escape-laden strings and templates at
//! the width-budget and conservation contracts.

use proptest::prelude::*;

use tidemark::{
    ComponentTree, Grid, GridOptions, RenderContext, Track, count_visible, diff,
    split_at_visible_pos, strip_ansi, truncate_end, truncate_focus_range, truncate_middle,
    truncate_start, truncate_to_width, wrap_text,
};

/// One building block of an escape-laden test string.
#[derive(Clone, Debug)]
enum Piece {
    Text(String),
    Sgr(u8),
    Reset,
    Link(String),
    LinkClose,
}

fn piece() -> impl Strategy<Value = Piece> {
    prop_oneof![
        4 => "[a-z ]{1,6}".prop_map(Piece::Text),
        1 => (30u8..=37).prop_map(Piece::Sgr),
        1 => Just(Piece::Reset),
        1 => "[a-z]{1,5}".prop_map(|h| Piece::Link(format!("https://{h}.io"))),
        1 => Just(Piece::LinkClose),
    ]
}

fn styled_string() -> impl Strategy<Value = String> {
    prop::collection::vec(piece(), 0..10).prop_map(|pieces| {
        let mut out = String::new();
        for piece in pieces {
            match piece {
                Piece::Text(t) => out.push_str(&t),
                Piece::Sgr(code) => out.push_str(&format!("\x1b[{code}m")),
                Piece::Reset => out.push_str("\x1b[0m"),
                Piece::Link(url) => out.push_str(&format!("\x1b]8;;{url}\x1b\\")),
                Piece::LinkClose => out.push_str("\x1b]8;;\x1b\\"),
            }
        }
        out
    })
}

proptest! {
    /// Truncation never exceeds its width budget.
    #[test]
    fn truncate_to_width_respects_budget(s in styled_string(), w in 0usize..40) {
        prop_assert!(count_visible(&truncate_to_width(&s, w)) <= w);
    }

    /// Ellipsis truncation stays within budget and marks elision.
    #[test]
    fn truncate_end_budget_and_marker(s in styled_string(), w in 1usize..40) {
        let out = truncate_end(&s, w);
        prop_assert!(count_visible(&out) <= w);
        if count_visible(&s) > w {
            prop_assert!(strip_ansi(&out).ends_with('…'));
        }
    }

    /// Start and middle variants obey the same budget.
    #[test]
    fn truncate_start_middle_budget(s in styled_string(), w in 0usize..40) {
        prop_assert!(count_visible(&truncate_start(&s, w)) <= w);
        prop_assert!(count_visible(&truncate_middle(&s, w)) <= w);
    }

    /// Splitting conserves visible characters exactly.
    #[test]
    fn split_conserves_visible_text(s in styled_string(), k in 0usize..50) {
        let total = count_visible(&s);
        let (a, b) = split_at_visible_pos(&s, k);
        let k = k.min(total);
        prop_assert_eq!(count_visible(&a), k);
        prop_assert_eq!(count_visible(&b), total - k);
        prop_assert_eq!(
            format!("{}{}", strip_ansi(&a), strip_ansi(&b)),
            strip_ansi(&s)
        );
    }

    /// The focus range survives truncation and maps back to the same
    /// code point.
    #[test]
    fn focus_range_containment_and_mapping(
        s in "[a-z]{10,60}",
        w in 3usize..30,
        lo in 1usize..50,
        span in 0usize..5,
    ) {
        let total = count_visible(&s);
        let lo = lo.min(total);
        let hi = (lo + span).min(total);
        let out = truncate_focus_range(&s, w, lo, hi, None);
        prop_assert!(count_visible(&out.text) <= w);

        // When the clamped range fits the window, it must be inside it.
        let range_w = out.range_end_col - out.range_start_col + 1;
        let window_w = out.visible_end_col - out.visible_start_col + 1;
        if range_w <= window_w {
            prop_assert!(out.visible_start_col <= out.range_start_col);
            prop_assert!(out.visible_end_col >= out.range_end_col);
        }

        let col = out.range_start_col.max(1);
        let display = tidemark::map_column_to_display(
            &s,
            &out.text,
            out.visible_start_col,
            out.visible_end_col,
            col,
            None,
            None,
        );
        let shown = strip_ansi(&out.text);
        let mapped = shown.chars().nth(display - 1);
        let original = strip_ansi(&s).chars().nth(col - 1);
        prop_assert_eq!(mapped, original);
    }

    /// Wrapping respects the width bound on every line and loses no
    /// visible characters.
    #[test]
    fn wrap_bounds_and_conserves(s in styled_string(), w in 1usize..20) {
        let lines = wrap_text(&s, w);
        let mut total = 0usize;
        for line in &lines {
            prop_assert!(count_visible(line) <= w, "line {line:?}");
            total += count_visible(line);
        }
        // Breaks only ever drop whitespace.
        let source_non_space = strip_ansi(&s).chars().filter(|c| *c != ' ').count();
        let wrapped_non_space: usize = lines
            .iter()
            .map(|l| strip_ansi(l).chars().filter(|c| *c != ' ').count())
            .sum();
        prop_assert_eq!(source_non_space, wrapped_non_space);
        prop_assert!(total <= count_visible(&s).max(1));
    }

    /// Applying the differ's op stream to the old frame yields the new one.
    #[test]
    fn differ_round_trips(
        prev in prop::collection::vec("[a-c]{0,3}", 0..6),
        curr in prop::collection::vec("[a-c]{0,3}", 0..6),
    ) {
        let prev: Vec<String> = prev;
        let curr: Vec<String> = curr;
        let ops = diff::diff(&prev, &curr);
        prop_assert_eq!(ops.len(), prev.len().max(curr.len()));
        prop_assert_eq!(diff::apply(&prev, &ops), curr.clone());

        let changed = ops.iter().filter(|op| !op.is_no_change()).count();
        let expected = (0..prev.len().max(curr.len()))
            .filter(|&i| prev.get(i) != curr.get(i))
            .count();
        prop_assert_eq!(changed, expected);
    }

    /// Grid closure: resolved cells plus gaps fill the parent width
    /// exactly whenever a flex track can absorb the remainder.
    #[test]
    fn grid_closure_with_flex(
        fixed_a in 1usize..10,
        fixed_b in 1usize..10,
        weight in 1u32..5,
        gap in 0usize..3,
        parent in 30usize..80,
    ) {
        let mut tree = ComponentTree::new();
        let a = tree.fill('a');
        let b = tree.fill('b');
        let c = tree.fill('c');
        let grid = Grid::new(
            GridOptions::new(vec![
                Track::fixed(fixed_a),
                Track::flex(weight as f32),
                Track::fixed(fixed_b),
            ])
            .with_column_gap(gap),
            vec![a, b, c],
        );
        let ctx = RenderContext::bounded(parent);
        let line = grid
            .render(&tree, &ctx)
            .first_line()
            .map(str::to_string)
            .unwrap_or_default();
        prop_assert_eq!(count_visible(&line), parent);
    }
}

#[test]
fn throttle_allows_at_most_one_frame_per_interval() {
    let mut throttle = tidemark::Throttle::new(1);
    let mut allowed = 0;
    for _ in 0..100 {
        if throttle.should_render_now() {
            allowed += 1;
        }
    }
    assert_eq!(allowed, 1);
}
