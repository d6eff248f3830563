//! Line-level frame differ.
//!
//! Compares two string-per-row frames and produces one op per row index.
//! Equality is byte-exact on the stored strings, escape codes included, so
//! a style-only change still repaints its row.

/// One row-level operation in a frame diff.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LineOp {
    /// The row is identical in both frames.
    NoChange,
    /// The row exists in both frames with different content.
    UpdateLine {
        /// 0-based row index.
        row: usize,
        /// New content for the row.
        content: String,
    },
    /// The row exists only in the new frame.
    InsertLine {
        /// 0-based row index.
        row: usize,
        /// Content for the new row.
        content: String,
    },
    /// The row exists only in the old frame.
    DeleteLine {
        /// 0-based row index.
        row: usize,
    },
}

impl LineOp {
    /// True for [`LineOp::NoChange`].
    pub fn is_no_change(&self) -> bool {
        matches!(self, LineOp::NoChange)
    }
}

/// Diff two frames into an ordered op stream.
///
/// The result has exactly `max(|prev|, |curr|)` entries, one per row index.
/// Applying the stream to `prev` reproduces `curr`.
pub fn diff(prev: &[String], curr: &[String]) -> Vec<LineOp> {
    let rows = prev.len().max(curr.len());
    let mut ops = Vec::with_capacity(rows);

    for row in 0..rows {
        let op = match (prev.get(row), curr.get(row)) {
            (Some(old), Some(new)) if old == new => LineOp::NoChange,
            (Some(_), Some(new)) => LineOp::UpdateLine {
                row,
                content: new.clone(),
            },
            (None, Some(new)) => LineOp::InsertLine {
                row,
                content: new.clone(),
            },
            (Some(_), None) => LineOp::DeleteLine { row },
            (None, None) => unreachable!("row index bounded by max length"),
        };
        ops.push(op);
    }

    ops
}

/// Apply an op stream to a frame. Primarily used to check differ output.
pub fn apply(prev: &[String], ops: &[LineOp]) -> Vec<String> {
    let mut out: Vec<String> = prev.to_vec();
    for op in ops {
        match op {
            LineOp::NoChange => {}
            LineOp::UpdateLine { row, content } | LineOp::InsertLine { row, content } => {
                if *row >= out.len() {
                    out.resize(*row + 1, String::new());
                }
                out[*row] = content.clone();
            }
            LineOp::DeleteLine { row } => {
                if *row < out.len() {
                    out.truncate(*row);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn identical_frames_all_no_change() {
        let a = frame(&["x", "y"]);
        let ops = diff(&a, &a);
        assert_eq!(ops, vec![LineOp::NoChange, LineOp::NoChange]);
    }

    #[test]
    fn single_row_update() {
        let prev = frame(&["one", "two"]);
        let curr = frame(&["one", "TWO"]);
        let ops = diff(&prev, &curr);
        assert_eq!(ops[0], LineOp::NoChange);
        assert_eq!(
            ops[1],
            LineOp::UpdateLine {
                row: 1,
                content: "TWO".to_string()
            }
        );
    }

    #[test]
    fn growth_inserts() {
        let prev = frame(&["a"]);
        let curr = frame(&["a", "b"]);
        let ops = diff(&prev, &curr);
        assert_eq!(
            ops,
            vec![
                LineOp::NoChange,
                LineOp::InsertLine {
                    row: 1,
                    content: "b".to_string()
                }
            ]
        );
    }

    #[test]
    fn shrink_deletes() {
        let prev = frame(&["a", "b", "c"]);
        let curr = frame(&["a"]);
        let ops = diff(&prev, &curr);
        assert_eq!(ops[0], LineOp::NoChange);
        assert_eq!(ops[1], LineOp::DeleteLine { row: 1 });
        assert_eq!(ops[2], LineOp::DeleteLine { row: 2 });
    }

    #[test]
    fn escape_codes_participate_in_equality() {
        let prev = frame(&["\x1b[31mx\x1b[0m"]);
        let curr = frame(&["\x1b[32mx\x1b[0m"]);
        let ops = diff(&prev, &curr);
        assert!(matches!(ops[0], LineOp::UpdateLine { .. }));
    }

    #[test]
    fn apply_round_trips() {
        let cases = [
            (frame(&[]), frame(&["a"])),
            (frame(&["a"]), frame(&[])),
            (frame(&["a", "b"]), frame(&["b", "a"])),
            (frame(&["a", "b", "c"]), frame(&["a", "x"])),
            (frame(&["a"]), frame(&["a", "b", "c"])),
        ];
        for (prev, curr) in cases {
            let ops = diff(&prev, &curr);
            assert_eq!(apply(&prev, &ops), curr, "prev={prev:?} curr={curr:?}");
        }
    }

    #[test]
    fn change_count_matches_differing_rows() {
        let prev = frame(&["a", "b", "c"]);
        let curr = frame(&["a", "x", "c", "d"]);
        let ops = diff(&prev, &curr);
        let changed = ops.iter().filter(|op| !op.is_no_change()).count();
        assert_eq!(changed, 2);
    }
}
