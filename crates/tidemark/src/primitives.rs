//! Built-in row primitives: styled content, fills, sections, segments.

use crate::component::{
    AvailableWidth, Component, ComponentTree, LineResult, NodeId, RenderContext,
};
use crate::style::{Align, Overflow, StyleOptions, align_line};
use crate::text;

/// SGR-styled, aligned, overflow-managed content around child components.
pub struct Styled {
    /// Style and layout policy.
    pub options: StyleOptions,
    /// Children, concatenated in order.
    pub children: Vec<NodeId>,
}

impl Styled {
    /// Create a styled wrapper around children.
    pub fn new(options: StyleOptions, children: Vec<NodeId>) -> Self {
        Self { options, children }
    }

    /// Evaluate the responsive visibility predicate.
    pub fn is_visible(&self, ctx: &RenderContext<'_>) -> bool {
        self.options.is_visible(ctx)
    }

    /// Render: concatenate children, apply overflow, align, then style.
    pub fn render(&self, tree: &ComponentTree, ctx: &RenderContext<'_>) -> LineResult {
        if !self.is_visible(ctx) {
            return LineResult::Empty;
        }

        // Width budget: explicit width, else the offered width; min/max
        // clamps apply either way. Unbounded with no explicit width defers
        // to the content width.
        let prelim = match ctx.available_width {
            AvailableWidth::Bounded(avail) => Some(
                self.options
                    .clamp_width(self.options.width.unwrap_or(avail).min(avail)),
            ),
            AvailableWidth::Unbounded => self.options.width.map(|w| self.options.clamp_width(w)),
        };

        let child_ctx = ctx.with_width(prelim.map_or(AvailableWidth::Unbounded, AvailableWidth::Bounded));
        let mut content = String::new();
        for &child in &self.children {
            for line in tree.render(child, &child_ctx).into_lines() {
                content.push_str(&line);
            }
        }

        let budget = prelim.unwrap_or_else(|| self.options.clamp_width(text::count_visible(&content)));

        let lines = if text::count_visible(&content) > budget {
            match self.options.overflow {
                Overflow::None => vec![text::truncate_to_width(&content, budget)],
                Overflow::Wrap => text::wrap_text(&content, budget),
                Overflow::EllipsisStart => vec![text::truncate_start(&content, budget)],
                Overflow::EllipsisMiddle => vec![text::truncate_middle(&content, budget)],
                Overflow::EllipsisEnd => vec![text::truncate_end(&content, budget)],
            }
        } else {
            vec![content]
        };

        // Pad to the budget only when a bound was stated or alignment asks
        // for it; otherwise the content keeps its natural width.
        let pads = self.options.width.is_some()
            || self.options.min.is_some()
            || self.options.align != Align::Left;

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        for line in lines {
            let line = if pads {
                align_line(&line, budget, self.options.align)
            } else {
                line
            };
            out.push(self.options.apply(&line, ctx.resolver));
        }

        match out.len() {
            0 => LineResult::Empty,
            1 => LineResult::Line(out.swap_remove(0)),
            _ => LineResult::Lines(out),
        }
    }
}

/// A repeated fill character stretching to the available width.
pub struct Fill {
    /// The character to repeat.
    pub ch: char,
    /// Styling for the run.
    pub style: StyleOptions,
}

impl Fill {
    /// Create a fill of `ch`.
    pub fn new(ch: char) -> Self {
        Self {
            ch,
            style: StyleOptions::new(),
        }
    }

    /// Create a styled fill.
    pub fn styled(ch: char, style: StyleOptions) -> Self {
        Self { ch, style }
    }

    /// Render: repeat to the width budget; nothing under measurement.
    pub fn render(&self, ctx: &RenderContext<'_>) -> LineResult {
        match ctx.available_width {
            AvailableWidth::Unbounded => LineResult::Line(String::new()),
            AvailableWidth::Bounded(0) => LineResult::Line(String::new()),
            AvailableWidth::Bounded(w) => {
                let run: String = std::iter::repeat_n(self.ch, w).collect();
                LineResult::Line(self.style.apply(&run, ctx.resolver))
            }
        }
    }
}

/// Options for a bordered section.
#[derive(Clone, Debug)]
pub struct SectionOptions {
    /// Draw the top border.
    pub top: bool,
    /// Draw the left border.
    pub left: bool,
    /// Draw the right border.
    pub right: bool,
    /// Draw the bottom border.
    pub bottom: bool,
    /// Title inlined into the top border.
    pub title: Option<String>,
    /// Style for the border glyphs.
    pub style: StyleOptions,
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            top: true,
            left: true,
            right: true,
            bottom: true,
            title: None,
            style: StyleOptions::new(),
        }
    }
}

impl SectionOptions {
    /// All four borders, no title.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title shown in the top border.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Toggle individual borders.
    #[must_use]
    pub fn with_borders(mut self, top: bool, right: bool, bottom: bool, left: bool) -> Self {
        self.top = top;
        self.right = right;
        self.bottom = bottom;
        self.left = left;
        self
    }

    /// Set the border style.
    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }
}

/// A bordered box around child rows.
pub struct Section {
    /// Border configuration.
    pub options: SectionOptions,
    /// Children stacked inside the box.
    pub children: Vec<NodeId>,
}

impl Section {
    /// Create a section around children.
    pub fn new(options: SectionOptions, children: Vec<NodeId>) -> Self {
        Self { options, children }
    }

    /// Render the box at the available width (intrinsic when unbounded).
    pub fn render(&self, tree: &ComponentTree, ctx: &RenderContext<'_>) -> LineResult {
        let side_cols = usize::from(self.options.left) + usize::from(self.options.right);

        let width = match ctx.available_width {
            AvailableWidth::Bounded(w) => w,
            AvailableWidth::Unbounded => {
                let widest = self
                    .children
                    .iter()
                    .map(|&c| tree.measure(c, ctx))
                    .max()
                    .unwrap_or(0);
                widest + side_cols
            }
        };
        if width <= side_cols {
            return LineResult::Empty;
        }
        let interior = width - side_cols;

        let child_ctx = ctx.with_width(AvailableWidth::Bounded(interior));
        let mut body: Vec<String> = Vec::new();
        for &child in &self.children {
            if !tree.is_visible(child, ctx) {
                continue;
            }
            body.extend(tree.render(child, &child_ctx).into_lines());
        }

        let style = &self.options.style;
        let mut rows: Vec<String> = Vec::with_capacity(body.len() + 2);

        if self.options.top {
            rows.push(style.apply(
                &top_border(interior, self.options.left, self.options.right, self.options.title.as_deref()),
                ctx.resolver,
            ));
        }
        for line in body {
            let clipped = text::truncate_to_width(&line, interior);
            let padded = align_line(&clipped, interior, Align::Left);
            let mut row = String::new();
            if self.options.left {
                row.push_str(&style.apply("│", ctx.resolver));
            }
            row.push_str(&padded);
            if self.options.right {
                row.push_str(&style.apply("│", ctx.resolver));
            }
            rows.push(row);
        }
        if self.options.bottom {
            let mut line = String::new();
            if self.options.left {
                line.push('└');
            }
            line.push_str(&"─".repeat(interior));
            if self.options.right {
                line.push('┘');
            }
            rows.push(style.apply(&line, ctx.resolver));
        }

        match rows.len() {
            0 => LineResult::Empty,
            1 => LineResult::Line(rows.swap_remove(0)),
            _ => LineResult::Lines(rows),
        }
    }
}

/// Build the top border, inlining the title when there is room.
fn top_border(interior: usize, left: bool, right: bool, title: Option<&str>) -> String {
    let mut run = match title {
        Some(t) if text::count_visible(t) + 4 <= interior => {
            let label = format!("─ {t} ");
            let used = text::count_visible(&label);
            format!("{label}{}", "─".repeat(interior - used))
        }
        _ => "─".repeat(interior),
    };
    if left {
        run.insert(0, '┌');
    }
    if right {
        run.push('┐');
    }
    run
}

/// One styled span of a [`Segments`] row.
pub struct SegmentSpan {
    /// Span text.
    pub text: String,
    /// Span style (layout fields are ignored; spans are inline).
    pub style: StyleOptions,
}

impl SegmentSpan {
    /// An unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: StyleOptions::new(),
        }
    }

    /// A styled span.
    pub fn styled(text: impl Into<String>, style: StyleOptions) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A row composed of styled spans.
pub struct Segments {
    /// Spans in display order.
    pub spans: Vec<SegmentSpan>,
}

impl Segments {
    /// Create a segments row.
    pub fn new(spans: Vec<SegmentSpan>) -> Self {
        Self { spans }
    }

    /// Render spans into one row, clipped to the available width.
    pub fn render(&self, ctx: &RenderContext<'_>) -> LineResult {
        let mut out = String::new();
        for span in &self.spans {
            out.push_str(&span.style.apply(&span.text, ctx.resolver));
        }
        if let Some(avail) = ctx.available_width.bounded()
            && text::count_visible(&out) > avail
        {
            out = text::truncate_to_width(&out, avail);
        }
        LineResult::Line(out)
    }
}

impl ComponentTree {
    /// Add a styled component.
    pub fn styled(&mut self, options: StyleOptions, children: Vec<NodeId>) -> NodeId {
        self.push(Component::Styled(Styled::new(options, children)))
    }

    /// Add a styled text leaf.
    pub fn styled_text(&mut self, options: StyleOptions, content: impl Into<String>) -> NodeId {
        let child = self.text(content);
        self.styled(options, vec![child])
    }

    /// Add a fill.
    pub fn fill(&mut self, ch: char) -> NodeId {
        self.push(Component::Fill(Fill::new(ch)))
    }

    /// Add a styled fill.
    pub fn fill_styled(&mut self, ch: char, style: StyleOptions) -> NodeId {
        self.push(Component::Fill(Fill::styled(ch, style)))
    }

    /// Add a bordered section.
    pub fn section(&mut self, options: SectionOptions, children: Vec<NodeId>) -> NodeId {
        self.push(Component::Section(Section::new(options, children)))
    }

    /// Add a segments row.
    pub fn segments(&mut self, spans: Vec<SegmentSpan>) -> NodeId {
        self.push(Component::Segments(Segments::new(spans)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, NamedColor};
    use crate::text::{count_visible, strip_ansi};

    #[test]
    fn styled_wraps_in_sgr() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(
            StyleOptions::new().with_color(Color::Named(NamedColor::Green)),
            "ok",
        );
        let ctx = RenderContext::bounded(10);
        let out = tree.render(id, &ctx);
        assert_eq!(out.first_line(), Some("\x1b[32mok\x1b[0m"));
    }

    #[test]
    fn styled_hard_truncates_by_default() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(StyleOptions::new(), "abcdefghij");
        let ctx = RenderContext::bounded(4);
        let out = tree.render(id, &ctx);
        assert_eq!(out.first_line(), Some("abcd"));
    }

    #[test]
    fn styled_ellipsis_end() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(
            StyleOptions::new().with_overflow(Overflow::EllipsisEnd),
            "abcdefghij",
        );
        let ctx = RenderContext::bounded(4);
        assert_eq!(tree.render(id, &ctx).first_line(), Some("abc…"));
    }

    #[test]
    fn styled_wrap_overflow_gives_many_lines() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(
            StyleOptions::new().with_overflow(Overflow::Wrap),
            "one two three",
        );
        let ctx = RenderContext::bounded(5);
        let out = tree.render(id, &ctx);
        assert!(out.line_count() > 1);
    }

    #[test]
    fn styled_right_align_pads() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(StyleOptions::new().with_align(Align::Right), "ab");
        let ctx = RenderContext::bounded(5);
        assert_eq!(tree.render(id, &ctx).first_line(), Some("   ab"));
    }

    #[test]
    fn styled_explicit_width_pads_to_width() {
        let mut tree = ComponentTree::new();
        let id = tree.styled_text(StyleOptions::new().with_width(6), "ab");
        let ctx = RenderContext::bounded(20);
        assert_eq!(tree.render(id, &ctx).first_line(), Some("ab    "));
    }

    #[test]
    fn styled_hidden_when_predicate_false() {
        let mut tree = ComponentTree::new();
        let id = tree.styled(
            StyleOptions::new().when(|ctx| ctx.region_width > 50),
            vec![],
        );
        let ctx = RenderContext::bounded(40);
        assert_eq!(tree.render(id, &ctx), LineResult::Empty);
    }

    #[test]
    fn fill_stretches_to_width() {
        let mut tree = ComponentTree::new();
        let id = tree.fill('─');
        let ctx = RenderContext::bounded(5);
        assert_eq!(tree.render(id, &ctx).first_line(), Some("─────"));
    }

    #[test]
    fn fill_measures_zero() {
        let mut tree = ComponentTree::new();
        let id = tree.fill('x');
        let ctx = RenderContext::bounded(80);
        assert_eq!(tree.measure(id, &ctx), 0);
    }

    #[test]
    fn section_draws_box() {
        let mut tree = ComponentTree::new();
        let body = tree.text("hi");
        let id = tree.section(SectionOptions::new(), vec![body]);
        let ctx = RenderContext::bounded(6);
        let lines = tree.render(id, &ctx).into_lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "┌────┐");
        assert_eq!(lines[1], "│hi  │");
        assert_eq!(lines[2], "└────┘");
    }

    #[test]
    fn section_title_in_top_border() {
        let mut tree = ComponentTree::new();
        let body = tree.text("x");
        let id = tree.section(SectionOptions::new().with_title("Log"), vec![body]);
        let ctx = RenderContext::bounded(12);
        let lines = tree.render(id, &ctx).into_lines();
        assert_eq!(lines[0], "┌─ Log ────┐");
        assert_eq!(count_visible(&lines[0]), 12);
    }

    #[test]
    fn section_side_borders_only() {
        let mut tree = ComponentTree::new();
        let body = tree.text("x");
        let id = tree.section(
            SectionOptions::new().with_borders(false, true, false, true),
            vec![body],
        );
        let ctx = RenderContext::bounded(5);
        let lines = tree.render(id, &ctx).into_lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "│x  │");
    }

    #[test]
    fn section_clips_long_content() {
        let mut tree = ComponentTree::new();
        let body = tree.text("much too long for this");
        let id = tree.section(SectionOptions::new(), vec![body]);
        let ctx = RenderContext::bounded(8);
        let lines = tree.render(id, &ctx).into_lines();
        for line in &lines {
            assert_eq!(count_visible(line), 8, "{line}");
        }
    }

    #[test]
    fn segments_compose_styled_spans() {
        let mut tree = ComponentTree::new();
        let id = tree.segments(vec![
            SegmentSpan::plain("a "),
            SegmentSpan::styled("b", StyleOptions::new().bold(true)),
        ]);
        let ctx = RenderContext::bounded(10);
        let out = tree.render(id, &ctx);
        assert_eq!(strip_ansi(out.first_line().unwrap_or("")), "a b");
        assert!(out.first_line().is_some_and(|l| l.contains("\x1b[1m")));
    }

    #[test]
    fn segments_clip_to_width() {
        let mut tree = ComponentTree::new();
        let id = tree.segments(vec![SegmentSpan::plain("abcdefgh")]);
        let ctx = RenderContext::bounded(4);
        let out = tree.render(id, &ctx);
        assert_eq!(out.first_line(), Some("abcd"));
    }
}
