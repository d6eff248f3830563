//! Style options: colors, attributes, overflow and alignment policy.

use std::fmt;
use std::rc::Rc;

use crate::ansi;
use crate::color::{Color, ColorResolver};
use crate::component::RenderContext;
use crate::text;

/// What to do when content exceeds its width budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    /// Hard truncate at the width.
    #[default]
    None,
    /// Word-wrap onto further rows.
    Wrap,
    /// Truncate with a leading ellipsis.
    EllipsisStart,
    /// Truncate with an ellipsis at the center.
    EllipsisMiddle,
    /// Truncate with a trailing ellipsis.
    EllipsisEnd,
}

/// Horizontal alignment within a width budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Align {
    /// Flush left (the default).
    #[default]
    Left,
    /// Centered, left-biased on odd padding.
    Center,
    /// Flush right.
    Right,
}

/// Responsive visibility predicate.
pub type WhenPredicate = Rc<dyn Fn(&RenderContext<'_>) -> bool>;

/// Styling and layout policy for a styled component or grid cell.
#[derive(Clone, Default)]
pub struct StyleOptions {
    /// Foreground color.
    pub color: Option<Color>,
    /// Background color.
    pub bg: Option<Color>,
    /// Bold attribute.
    pub bold: bool,
    /// Dim attribute.
    pub dim: bool,
    /// Italic attribute.
    pub italic: bool,
    /// Underline attribute.
    pub underline: bool,
    /// Overflow policy.
    pub overflow: Overflow,
    /// Alignment within the width budget.
    pub align: Align,
    /// Minimum width.
    pub min: Option<usize>,
    /// Maximum width.
    pub max: Option<usize>,
    /// Exact width.
    pub width: Option<usize>,
    /// Responsive visibility; `None` means always visible.
    pub when: Option<WhenPredicate>,
}

impl fmt::Debug for StyleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StyleOptions")
            .field("color", &self.color)
            .field("bg", &self.bg)
            .field("bold", &self.bold)
            .field("dim", &self.dim)
            .field("italic", &self.italic)
            .field("underline", &self.underline)
            .field("overflow", &self.overflow)
            .field("align", &self.align)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("width", &self.width)
            .field("when", &self.when.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

impl StyleOptions {
    /// No styling, no layout policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the foreground color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the background color.
    #[must_use]
    pub fn with_bg(mut self, bg: Color) -> Self {
        self.bg = Some(bg);
        self
    }

    /// Set the bold attribute.
    #[must_use]
    pub fn bold(mut self, on: bool) -> Self {
        self.bold = on;
        self
    }

    /// Set the dim attribute.
    #[must_use]
    pub fn dim(mut self, on: bool) -> Self {
        self.dim = on;
        self
    }

    /// Set the italic attribute.
    #[must_use]
    pub fn italic(mut self, on: bool) -> Self {
        self.italic = on;
        self
    }

    /// Set the underline attribute.
    #[must_use]
    pub fn underline(mut self, on: bool) -> Self {
        self.underline = on;
        self
    }

    /// Set the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: Overflow) -> Self {
        self.overflow = overflow;
        self
    }

    /// Set the alignment.
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Set the minimum width.
    #[must_use]
    pub fn with_min(mut self, min: usize) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the maximum width.
    #[must_use]
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = Some(max);
        self
    }

    /// Set an exact width.
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the responsive visibility predicate.
    #[must_use]
    pub fn when(mut self, predicate: impl Fn(&RenderContext<'_>) -> bool + 'static) -> Self {
        self.when = Some(Rc::new(predicate));
        self
    }

    /// SGR parameter codes for the active attributes and colors.
    pub fn sgr_codes(&self, resolver: &dyn ColorResolver) -> Vec<String> {
        let mut codes = Vec::new();
        if self.bold {
            codes.push("1".to_string());
        }
        if self.dim {
            codes.push("2".to_string());
        }
        if self.italic {
            codes.push("3".to_string());
        }
        if self.underline {
            codes.push("4".to_string());
        }
        if let Some(color) = &self.color {
            codes.extend(color.fg_codes(resolver));
        }
        if let Some(bg) = &self.bg {
            codes.extend(bg.bg_codes(resolver));
        }
        codes
    }

    /// Wrap one line in this style's SGR codes.
    ///
    /// A style with no active attributes returns the line unchanged.
    pub fn apply(&self, line: &str, resolver: &dyn ColorResolver) -> String {
        let opening = ansi::sgr(&self.sgr_codes(resolver));
        if opening.is_empty() {
            return line.to_string();
        }
        let mut out = String::with_capacity(opening.len() + line.len() + ansi::SGR_RESET.len());
        out.push_str(&opening);
        out.push_str(line);
        out.push_str(ansi::SGR_RESET);
        out
    }

    /// Evaluate the visibility predicate (`true` when absent).
    pub fn is_visible(&self, ctx: &RenderContext<'_>) -> bool {
        self.when.as_ref().is_none_or(|pred| pred(ctx))
    }

    /// Clamp a candidate width to this style's `min`/`max`.
    pub fn clamp_width(&self, candidate: usize) -> usize {
        let mut w = candidate;
        if let Some(max) = self.max {
            w = w.min(max);
        }
        if let Some(min) = self.min {
            w = w.max(min);
        }
        w
    }
}

/// Pad `line` with spaces to `width` per the alignment.
///
/// Content already at or beyond `width` is returned unchanged; this pads,
/// it never truncates.
pub fn align_line(line: &str, width: usize, align: Align) -> String {
    let vis = text::count_visible(line);
    if vis >= width {
        return line.to_string();
    }
    let pad = width - vis;
    match align {
        Align::Left => format!("{line}{}", " ".repeat(pad)),
        Align::Right => format!("{}{line}", " ".repeat(pad)),
        Align::Center => {
            let left = pad / 2;
            format!("{}{line}{}", " ".repeat(left), " ".repeat(pad - left))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{NamedColor, NoThemeResolver};

    #[test]
    fn empty_style_applies_nothing() {
        let style = StyleOptions::new();
        assert_eq!(style.apply("x", &NoThemeResolver), "x");
    }

    #[test]
    fn attributes_and_colors_combine_into_one_sequence() {
        let style = StyleOptions::new()
            .bold(true)
            .italic(true)
            .with_color(Color::Named(NamedColor::Red));
        let out = style.apply("x", &NoThemeResolver);
        assert_eq!(out, "\x1b[1;3;31mx\x1b[0m");
    }

    #[test]
    fn bg_codes_present() {
        let style = StyleOptions::new().with_bg(Color::Named(NamedColor::Blue));
        let out = style.apply("x", &NoThemeResolver);
        assert!(out.contains("\x1b[44m"));
    }

    #[test]
    fn unresolved_token_leaves_line_alone() {
        let style = StyleOptions::new().with_color(Color::Token("accent".into()));
        assert_eq!(style.apply("x", &NoThemeResolver), "x");
    }

    #[test]
    fn when_predicate_gates_visibility() {
        let style = StyleOptions::new().when(|ctx| ctx.region_width > 50);
        let wide = RenderContext::bounded(80);
        let narrow = RenderContext::bounded(40);
        assert!(style.is_visible(&wide));
        assert!(!style.is_visible(&narrow));
    }

    #[test]
    fn clamp_width_applies_min_and_max() {
        let style = StyleOptions::new().with_min(5).with_max(10);
        assert_eq!(style.clamp_width(3), 5);
        assert_eq!(style.clamp_width(7), 7);
        assert_eq!(style.clamp_width(20), 10);
    }

    #[test]
    fn align_left_right_center() {
        assert_eq!(align_line("ab", 5, Align::Left), "ab   ");
        assert_eq!(align_line("ab", 5, Align::Right), "   ab");
        assert_eq!(align_line("ab", 6, Align::Center), "  ab  ");
        assert_eq!(align_line("ab", 5, Align::Center), " ab  ");
    }

    #[test]
    fn align_measures_visible_width_only() {
        let styled = "\x1b[31mab\x1b[0m";
        let out = align_line(styled, 4, Align::Right);
        assert!(out.starts_with("  "));
        assert_eq!(crate::text::count_visible(&out), 4);
    }

    #[test]
    fn align_never_truncates() {
        assert_eq!(align_line("abcdef", 3, Align::Left), "abcdef");
    }
}
