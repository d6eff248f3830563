//! Track-based grid layout.
//!
//! A grid resolves its template into per-cell widths in one pass: fixed
//! tracks first, then auto tracks measured from their child's intrinsic
//! width, then the remaining space shared among flex tracks by weight with
//! min/max clamps redistributed to a fixed point. Cells render at their
//! resolved widths and compose into one row, or several when any child
//! produces multiple lines.

use crate::component::{
    AvailableWidth, Component, ComponentTree, LineResult, NodeId, RenderContext,
};
use crate::style::{Align, StyleOptions, align_line};
use crate::text;

/// One column of a grid template.
#[derive(Clone, Debug, PartialEq)]
pub enum Track {
    /// Exactly this many columns.
    Fixed(usize),
    /// A share of the space left after fixed and auto tracks.
    Flex(f32),
    /// Sized to the child's intrinsic width.
    Auto,
    /// A preferred sizing clamped to `[min, max]`.
    MinMax {
        /// Lower clamp.
        min: Option<usize>,
        /// Upper clamp.
        max: Option<usize>,
        /// The sizing being clamped.
        preferred: Box<Track>,
    },
}

impl Track {
    /// A fixed track.
    pub fn fixed(n: usize) -> Self {
        Track::Fixed(n)
    }

    /// A flex track with the given weight.
    pub fn flex(weight: f32) -> Self {
        Track::Flex(weight)
    }

    /// An auto (content-sized) track.
    pub fn auto() -> Self {
        Track::Auto
    }

    /// A min/max-clamped track.
    pub fn minmax(min: Option<usize>, max: Option<usize>, preferred: Track) -> Self {
        Track::MinMax {
            min,
            max,
            preferred: Box::new(preferred),
        }
    }

    /// Parse `"auto"`, a plain number (`"12"`), or a flex share (`"2*"`).
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Some(Track::Auto);
        }
        if let Some(weight) = s.strip_suffix('*') {
            if weight.is_empty() {
                return Some(Track::Flex(1.0));
            }
            return weight.parse::<f32>().ok().filter(|w| *w > 0.0).map(Track::Flex);
        }
        s.parse::<usize>().ok().map(Track::Fixed)
    }
}

impl From<usize> for Track {
    fn from(n: usize) -> Self {
        Track::Fixed(n)
    }
}

/// How leftover space is placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justify {
    /// Cells pack to the left; leftover stays at the row end.
    #[default]
    Start,
    /// Leftover space is spread into the inter-cell gaps, pinning the
    /// first cell left and the last cell right.
    SpaceBetween,
}

/// Fill for the inter-cell gaps under [`Justify::SpaceBetween`].
#[derive(Clone, Debug)]
pub struct GapFill {
    /// The character filling each gap.
    pub ch: char,
    /// Styling for the fill.
    pub style: StyleOptions,
}

/// Grid configuration.
#[derive(Clone, Debug)]
pub struct GridOptions {
    /// The track template. Children beyond it get auto tracks.
    pub template: Vec<Track>,
    /// Columns between adjacent cells.
    pub column_gap: usize,
    /// Distribution of leftover space.
    pub justify: Justify,
    /// Optional gap fill character.
    pub space_between: Option<GapFill>,
}

impl GridOptions {
    /// A grid with the given template, no gaps, start-justified.
    pub fn new(template: Vec<Track>) -> Self {
        Self {
            template,
            column_gap: 0,
            justify: Justify::Start,
            space_between: None,
        }
    }

    /// Set the gap between adjacent cells.
    #[must_use]
    pub fn with_column_gap(mut self, gap: usize) -> Self {
        self.column_gap = gap;
        self
    }

    /// Use space-between justification.
    #[must_use]
    pub fn space_between(mut self) -> Self {
        self.justify = Justify::SpaceBetween;
        self
    }

    /// Fill gaps with a character (implies space-between behavior for the
    /// fill, not for distribution).
    #[must_use]
    pub fn with_gap_fill(mut self, ch: char, style: StyleOptions) -> Self {
        self.space_between = Some(GapFill { ch, style });
        self
    }
}

/// A grid component: options plus child indices into the arena.
pub struct Grid {
    /// Layout configuration.
    pub options: GridOptions,
    /// One child per track, in template order.
    pub children: Vec<NodeId>,
}

/// A resolved cell: its child (if any) and final width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Cell {
    child: Option<NodeId>,
    width: usize,
}

impl Grid {
    /// Create a grid.
    pub fn new(options: GridOptions, children: Vec<NodeId>) -> Self {
        Self { options, children }
    }

    /// Render the grid into one or more rows.
    pub fn render(&self, tree: &ComponentTree, ctx: &RenderContext<'_>) -> LineResult {
        let cells = self.resolve(tree, ctx);
        if cells.is_empty() {
            return LineResult::Empty;
        }

        // Render every cell to its rows.
        let mut cell_lines: Vec<Vec<String>> = Vec::with_capacity(cells.len());
        for (col, cell) in cells.iter().enumerate() {
            let lines = match cell.child {
                Some(child) if cell.width > 0 => {
                    let cell_ctx = ctx.at_cell(col, AvailableWidth::Bounded(cell.width));
                    tree.render(child, &cell_ctx).into_lines()
                }
                _ => Vec::new(),
            };
            cell_lines.push(lines);
        }

        let rows = cell_lines.iter().map(Vec::len).max().unwrap_or(0);
        if rows == 0 {
            return LineResult::Empty;
        }

        // Gap widths between emitted (non-zero-width) cells.
        let emitted: Vec<usize> = (0..cells.len()).filter(|&i| cells[i].width > 0).collect();
        let gaps = self.gap_widths(ctx, &cells, emitted.len());

        let mut out: Vec<String> = Vec::with_capacity(rows);
        for row in 0..rows {
            let mut line = String::new();
            for (pos, &i) in emitted.iter().enumerate() {
                if pos > 0 {
                    line.push_str(&self.gap_string(gaps[pos - 1], ctx));
                }
                let cell = &cells[i];
                let content = cell_lines[i].get(row).map_or("", String::as_str);
                let clipped = text::truncate_to_width(content, cell.width);
                line.push_str(&align_line(&clipped, cell.width, cell_align(tree, cell.child)));
            }
            out.push(line);
        }

        match out.len() {
            1 => LineResult::Line(out.swap_remove(0)),
            _ => LineResult::Lines(out),
        }
    }

    /// Resolve the template into per-cell widths.
    fn resolve(&self, tree: &ComponentTree, ctx: &RenderContext<'_>) -> Vec<Cell> {
        let count = self.options.template.len().max(self.children.len());
        if count == 0 {
            return Vec::new();
        }

        // Pair tracks with children and drop responsively hidden cells.
        let mut slots: Vec<(Track, Option<NodeId>)> = Vec::with_capacity(count);
        for i in 0..count {
            let track = self
                .options
                .template
                .get(i)
                .cloned()
                .unwrap_or(Track::Auto);
            let child = self.children.get(i).copied();
            if let Some(c) = child
                && !tree.is_visible(c, ctx)
            {
                continue;
            }
            slots.push((track, child));
        }
        if slots.is_empty() {
            return Vec::new();
        }

        match ctx.available_width {
            AvailableWidth::Unbounded => slots
                .into_iter()
                .map(|(track, child)| Cell {
                    child,
                    width: self.intrinsic_width(tree, ctx, &track, child),
                })
                .collect(),
            AvailableWidth::Bounded(parent) => self.resolve_bounded(tree, ctx, parent, slots),
        }
    }

    /// Intrinsic width of one track under an unbounded parent.
    fn intrinsic_width(
        &self,
        tree: &ComponentTree,
        ctx: &RenderContext<'_>,
        track: &Track,
        child: Option<NodeId>,
    ) -> usize {
        let (base, min, max) = unwrap_clamps(track);
        let width = match base {
            Track::Fixed(n) => *n,
            // Flex has no meaning without a bounded parent; fall back to
            // the child's natural width.
            Track::Flex(_) | Track::Auto => {
                child.map_or(0, |c| tree.measure(c, ctx))
            }
            Track::MinMax { .. } => 0,
        };
        clamp(width, min, max)
    }

    fn resolve_bounded(
        &self,
        tree: &ComponentTree,
        ctx: &RenderContext<'_>,
        parent: usize,
        slots: Vec<(Track, Option<NodeId>)>,
    ) -> Vec<Cell> {
        let n = slots.len();
        let gap_total = self.options.column_gap * n.saturating_sub(1);

        let mut widths: Vec<Option<usize>> = vec![None; n];
        let mut flex: Vec<(usize, f32, Option<usize>, Option<usize>)> = Vec::new();

        // Fixed tracks.
        let mut fixed_total = gap_total;
        for (i, (track, _)) in slots.iter().enumerate() {
            let (base, min, max) = unwrap_clamps(track);
            if let Track::Fixed(w) = base {
                let w = clamp(*w, min, max);
                widths[i] = Some(w);
                fixed_total += w;
            }
        }

        // Auto tracks: intrinsic width, capped at what is still free.
        let mut auto_total = 0usize;
        for (i, (track, child)) in slots.iter().enumerate() {
            let (base, min, max) = unwrap_clamps(track);
            match base {
                Track::Auto => {
                    let cap = parent.saturating_sub(fixed_total + auto_total);
                    let measured = child.map_or(0, |c| tree.measure(c, ctx));
                    let w = clamp(measured, min, max).min(cap);
                    widths[i] = Some(w);
                    auto_total += w;
                }
                Track::Flex(k) => flex.push((i, *k, min, max)),
                _ => {}
            }
        }

        // Flex tracks: share the remainder by weight, clamps redistributed
        // until no new clamp fires.
        let mut budget = parent.saturating_sub(fixed_total + auto_total);
        let mut active = flex;
        loop {
            let weight_sum: f32 = active.iter().map(|(_, k, _, _)| k.max(0.0)).sum();
            if active.is_empty() || weight_sum <= 0.0 {
                for (i, _, min, _) in &active {
                    widths[*i] = Some(min.unwrap_or(0));
                }
                break;
            }

            let shares = proportional_shares(budget, &active, weight_sum);
            let mut clamped = Vec::new();
            for (pos, (i, _, min, max)) in active.iter().enumerate() {
                let share = shares[pos];
                let clamped_share = clamp(share, *min, *max);
                if clamped_share != share {
                    clamped.push((pos, *i, clamped_share));
                }
            }

            if clamped.is_empty() {
                for (pos, (i, ..)) in active.iter().enumerate() {
                    widths[*i] = Some(shares[pos]);
                }
                break;
            }
            for &(_, i, w) in &clamped {
                widths[i] = Some(w);
                budget = budget.saturating_sub(w);
            }
            let fixed_positions: Vec<usize> = clamped.iter().map(|&(pos, ..)| pos).collect();
            active = active
                .into_iter()
                .enumerate()
                .filter(|(pos, _)| !fixed_positions.contains(pos))
                .map(|(_, slot)| slot)
                .collect();
        }

        slots
            .into_iter()
            .enumerate()
            .map(|(i, (_, child))| Cell {
                child,
                width: widths[i].unwrap_or(0),
            })
            .collect()
    }

    /// Gap widths between consecutive emitted cells.
    fn gap_widths(&self, ctx: &RenderContext<'_>, cells: &[Cell], emitted: usize) -> Vec<usize> {
        let gap_count = emitted.saturating_sub(1);
        let mut gaps = vec![self.options.column_gap; gap_count];
        if self.options.justify == Justify::SpaceBetween
            && gap_count > 0
            && let Some(parent) = ctx.available_width.bounded()
        {
            let used: usize = cells.iter().map(|c| c.width).sum::<usize>()
                + self.options.column_gap * gap_count;
            let residual = parent.saturating_sub(used);
            let per_gap = residual / gap_count;
            let mut remainder = residual % gap_count;
            for gap in &mut gaps {
                *gap += per_gap;
                if remainder > 0 {
                    *gap += 1;
                    remainder -= 1;
                }
            }
        }
        gaps
    }

    /// Render one gap: spaces, or the configured fill character.
    fn gap_string(&self, width: usize, ctx: &RenderContext<'_>) -> String {
        if width == 0 {
            return String::new();
        }
        match &self.options.space_between {
            Some(fill) => {
                let run: String = std::iter::repeat_n(fill.ch, width).collect();
                fill.style.apply(&run, ctx.resolver)
            }
            None => " ".repeat(width),
        }
    }
}

/// Alignment a cell's leftover space should use: the child's own alignment
/// for styled children, left otherwise.
fn cell_align(tree: &ComponentTree, child: Option<NodeId>) -> Align {
    match child.and_then(|c| tree.get(c)) {
        Some(Component::Styled(styled)) => styled.options.align,
        _ => Align::Left,
    }
}

/// Peel [`Track::MinMax`] down to its base sizing plus clamps.
fn unwrap_clamps(track: &Track) -> (&Track, Option<usize>, Option<usize>) {
    match track {
        Track::MinMax {
            min,
            max,
            preferred,
        } => {
            let (base, inner_min, inner_max) = unwrap_clamps(preferred);
            (base, inner_min.or(*min), inner_max.or(*max))
        }
        other => (other, None, None),
    }
}

fn clamp(width: usize, min: Option<usize>, max: Option<usize>) -> usize {
    let mut w = width;
    if let Some(max) = max {
        w = w.min(max);
    }
    if let Some(min) = min {
        w = w.max(min);
    }
    w
}

/// Integer shares of `budget` proportional to weights, leftover columns
/// handed out left to right.
fn proportional_shares(
    budget: usize,
    active: &[(usize, f32, Option<usize>, Option<usize>)],
    weight_sum: f32,
) -> Vec<usize> {
    let mut shares: Vec<usize> = active
        .iter()
        .map(|(_, k, _, _)| {
            ((budget as f64) * f64::from(k.max(0.0)) / f64::from(weight_sum)) as usize
        })
        .collect();
    let assigned: usize = shares.iter().sum();
    let mut leftover = budget.saturating_sub(assigned);
    for share in &mut shares {
        if leftover == 0 {
            break;
        }
        *share += 1;
        leftover -= 1;
    }
    shares
}

impl ComponentTree {
    /// Add a grid.
    pub fn grid(&mut self, options: GridOptions, children: Vec<NodeId>) -> NodeId {
        self.push(Component::Grid(Grid::new(options, children)))
    }
}
