//! Component model: render context, line results, and the component arena.
//!
//! Components are transient descriptions of one frame's content. They live
//! in a [`ComponentTree`] arena; container components own the indices of
//! their children and the arena owns the nodes, so nested layouts form no
//! reference cycles. A component's whole capability set is `render` (to
//! lines) and `measure` (intrinsic width).

use crate::color::{ColorResolver, NoThemeResolver};
use crate::grid::Grid;
use crate::primitives::{Fill, Section, Segments, Styled};
use crate::text;
use crate::widgets::{ProgressBar, Spinner};

static NO_THEME: NoThemeResolver = NoThemeResolver;

/// Width offered to a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvailableWidth {
    /// A concrete column budget.
    Bounded(usize),
    /// Intrinsic measurement: render at natural width.
    Unbounded,
}

impl AvailableWidth {
    /// The bounded width, if any.
    pub fn bounded(self) -> Option<usize> {
        match self {
            AvailableWidth::Bounded(w) => Some(w),
            AvailableWidth::Unbounded => None,
        }
    }

    /// True during intrinsic measurement.
    pub fn is_unbounded(self) -> bool {
        matches!(self, AvailableWidth::Unbounded)
    }
}

/// Context passed to every component invocation.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// Width available to this component.
    pub available_width: AvailableWidth,
    /// Grid cell column of this component, when rendered inside a grid.
    pub column_index: usize,
    /// Row index of this component within the frame being built.
    pub row_index: usize,
    /// Full width of the owning region's viewport.
    pub region_width: usize,
    /// Resolver for semantic color tokens, supplied by the host.
    pub resolver: &'a dyn ColorResolver,
}

impl<'a> RenderContext<'a> {
    /// Context with a concrete width budget.
    pub fn bounded(width: usize) -> RenderContext<'static> {
        RenderContext {
            available_width: AvailableWidth::Bounded(width),
            column_index: 0,
            row_index: 0,
            region_width: width,
            resolver: &NO_THEME,
        }
    }

    /// Context for intrinsic measurement.
    pub fn unbounded() -> RenderContext<'static> {
        RenderContext {
            available_width: AvailableWidth::Unbounded,
            column_index: 0,
            row_index: 0,
            region_width: 0,
            resolver: &NO_THEME,
        }
    }

    /// Same context with a different width budget.
    pub fn with_width(&self, width: AvailableWidth) -> RenderContext<'a> {
        RenderContext {
            available_width: width,
            ..*self
        }
    }

    /// Same context positioned at a grid cell.
    pub fn at_cell(&self, column: usize, width: AvailableWidth) -> RenderContext<'a> {
        RenderContext {
            available_width: width,
            column_index: column,
            ..*self
        }
    }

    /// Same context with a color resolver.
    pub fn with_resolver<'b>(&self, resolver: &'b dyn ColorResolver) -> RenderContext<'b> {
        RenderContext {
            available_width: self.available_width,
            column_index: self.column_index,
            row_index: self.row_index,
            region_width: self.region_width,
            resolver,
        }
    }
}

/// What a component renders to.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum LineResult {
    /// Nothing; contributes no rows.
    #[default]
    Empty,
    /// A single row.
    Line(String),
    /// Multiple rows.
    Lines(Vec<String>),
}

impl LineResult {
    /// All rows of this result.
    pub fn into_lines(self) -> Vec<String> {
        match self {
            LineResult::Empty => Vec::new(),
            LineResult::Line(line) => vec![line],
            LineResult::Lines(lines) => lines,
        }
    }

    /// The first row, if any.
    pub fn first_line(&self) -> Option<&str> {
        match self {
            LineResult::Empty => None,
            LineResult::Line(line) => Some(line),
            LineResult::Lines(lines) => lines.first().map(String::as_str),
        }
    }

    /// Number of rows.
    pub fn line_count(&self) -> usize {
        match self {
            LineResult::Empty => 0,
            LineResult::Line(_) => 1,
            LineResult::Lines(lines) => lines.len(),
        }
    }
}

impl From<String> for LineResult {
    fn from(line: String) -> Self {
        LineResult::Line(line)
    }
}

/// Index of a component inside a [`ComponentTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// One frame-description component.
///
/// Concrete kinds cover the built-in primitives; [`Component::Dynamic`] is
/// the escape hatch for host-supplied render functions.
pub enum Component {
    /// Literal text. Newlines split it into multiple rows.
    Text(String),
    /// SGR-styled, aligned, overflow-managed content.
    Styled(Styled),
    /// A repeated fill character.
    Fill(Fill),
    /// A bordered box around child rows.
    Section(Section),
    /// Styled spans composed into one row.
    Segments(Segments),
    /// A track-based row layout.
    Grid(Grid),
    /// A determinate progress bar.
    ProgressBar(ProgressBar),
    /// An animated one-cell spinner.
    Spinner(Spinner),
    /// An opaque render function.
    Dynamic(Box<dyn Fn(&RenderContext<'_>) -> LineResult>),
}

/// Arena of components for one frame.
#[derive(Default)]
pub struct ComponentTree {
    nodes: Vec<Component>,
}

impl ComponentTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, returning its id.
    pub fn push(&mut self, component: Component) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(component);
        id
    }

    /// Add a literal text component.
    pub fn text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(Component::Text(content.into()))
    }

    /// Add an opaque render function.
    pub fn dynamic(
        &mut self,
        render: impl Fn(&RenderContext<'_>) -> LineResult + 'static,
    ) -> NodeId {
        self.push(Component::Dynamic(Box::new(render)))
    }

    /// Number of components in the arena.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a component.
    pub fn get(&self, id: NodeId) -> Option<&Component> {
        self.nodes.get(id.0)
    }

    /// Render a component to its rows.
    ///
    /// An id outside the arena renders to [`LineResult::Empty`].
    pub fn render(&self, id: NodeId, ctx: &RenderContext<'_>) -> LineResult {
        let Some(component) = self.nodes.get(id.0) else {
            return LineResult::Empty;
        };
        match component {
            Component::Text(content) => render_text(content),
            Component::Styled(styled) => styled.render(self, ctx),
            Component::Fill(fill) => fill.render(ctx),
            Component::Section(section) => section.render(self, ctx),
            Component::Segments(segments) => segments.render(ctx),
            Component::Grid(grid) => grid.render(self, ctx),
            Component::ProgressBar(bar) => bar.render(ctx),
            Component::Spinner(spinner) => spinner.render(ctx),
            Component::Dynamic(render) => render(ctx),
        }
    }

    /// Intrinsic width of a component: its first line rendered unbounded.
    ///
    /// [`Component::Fill`] reports zero so it never claims auto space.
    pub fn measure(&self, id: NodeId, ctx: &RenderContext<'_>) -> usize {
        match self.nodes.get(id.0) {
            None | Some(Component::Fill(_)) => 0,
            Some(_) => {
                let probe = ctx.with_width(AvailableWidth::Unbounded);
                self.render(id, &probe)
                    .first_line()
                    .map_or(0, text::count_visible)
            }
        }
    }

    /// Whether a component participates in layout under this context.
    ///
    /// Only [`Component::Styled`] carries a responsive `when` predicate;
    /// everything else is always visible.
    pub fn is_visible(&self, id: NodeId, ctx: &RenderContext<'_>) -> bool {
        match self.nodes.get(id.0) {
            Some(Component::Styled(styled)) => styled.is_visible(ctx),
            Some(_) => true,
            None => false,
        }
    }
}

fn render_text(content: &str) -> LineResult {
    if content.is_empty() {
        return LineResult::Line(String::new());
    }
    if !content.contains('\n') {
        return LineResult::Line(content.to_string());
    }
    LineResult::Lines(content.split('\n').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_single_line() {
        let mut tree = ComponentTree::new();
        let id = tree.text("hi");
        let ctx = RenderContext::bounded(10);
        assert_eq!(tree.render(id, &ctx), LineResult::Line("hi".to_string()));
    }

    #[test]
    fn text_with_newlines_is_many_rows() {
        let mut tree = ComponentTree::new();
        let id = tree.text("a\nb");
        let ctx = RenderContext::bounded(10);
        assert_eq!(tree.render(id, &ctx).line_count(), 2);
    }

    #[test]
    fn dynamic_component_sees_context() {
        let mut tree = ComponentTree::new();
        let id = tree.dynamic(|ctx| {
            LineResult::Line(format!("w={:?}", ctx.available_width.bounded()))
        });
        let ctx = RenderContext::bounded(7);
        assert_eq!(
            tree.render(id, &ctx),
            LineResult::Line("w=Some(7)".to_string())
        );
    }

    #[test]
    fn measure_counts_first_line_visible_width() {
        let mut tree = ComponentTree::new();
        let id = tree.text("\x1b[1mhello\x1b[0m\nlonger line");
        let ctx = RenderContext::bounded(80);
        assert_eq!(tree.measure(id, &ctx), 5);
    }

    #[test]
    fn out_of_range_id_is_empty() {
        let tree = ComponentTree::new();
        let ctx = RenderContext::bounded(10);
        assert_eq!(tree.render(NodeId(3), &ctx), LineResult::Empty);
        assert!(!tree.is_visible(NodeId(3), &ctx));
    }

    #[test]
    fn line_result_accessors() {
        assert_eq!(LineResult::Empty.line_count(), 0);
        assert_eq!(LineResult::Line("x".into()).first_line(), Some("x"));
        let many = LineResult::Lines(vec!["a".into(), "b".into()]);
        assert_eq!(many.line_count(), 2);
        assert_eq!(many.into_lines().len(), 2);
    }
}
