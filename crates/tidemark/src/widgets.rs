//! Small ready-made components: progress bar and spinner.

use crate::component::{AvailableWidth, Component, ComponentTree, LineResult, NodeId, RenderContext};
use crate::style::StyleOptions;

/// A determinate progress bar: `[████░░░░░░]  42%`.
pub struct ProgressBar {
    /// Completed fraction, clamped to `0.0..=1.0`.
    fraction: f32,
    /// Glyph for the filled portion.
    filled: char,
    /// Glyph for the unfilled portion.
    empty: char,
    /// Whether to append a percentage label.
    show_percent: bool,
    /// Style for the bar.
    style: StyleOptions,
}

impl ProgressBar {
    /// Create a bar at the given fraction (clamped to `0.0..=1.0`).
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            filled: '█',
            empty: '░',
            show_percent: true,
            style: StyleOptions::new(),
        }
    }

    /// Change the bar glyphs.
    #[must_use]
    pub fn with_glyphs(mut self, filled: char, empty: char) -> Self {
        self.filled = filled;
        self.empty = empty;
        self
    }

    /// Show or hide the percentage label.
    #[must_use]
    pub fn with_percent(mut self, show: bool) -> Self {
        self.show_percent = show;
        self
    }

    /// Style the bar.
    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    /// Update the fraction (clamped).
    pub fn set_fraction(&mut self, fraction: f32) {
        self.fraction = fraction.clamp(0.0, 1.0);
    }

    /// The current fraction.
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Render at the available width.
    ///
    /// The label (` NNN%`, 5 columns) and brackets come out of the budget;
    /// the bar glyphs fill the rest. Nothing is emitted under intrinsic
    /// measurement or when the budget cannot hold `[]`.
    pub fn render(&self, ctx: &RenderContext<'_>) -> LineResult {
        let Some(avail) = ctx.available_width.bounded() else {
            return LineResult::Line(String::new());
        };
        let label = if self.show_percent {
            format!(" {:>3.0}%", self.fraction * 100.0)
        } else {
            String::new()
        };
        let overhead = 2 + label.chars().count();
        if avail < overhead + 1 {
            return LineResult::Line(String::new());
        }
        let bar_width = avail - overhead;
        let filled = ((self.fraction * bar_width as f32).round() as usize).min(bar_width);

        let mut bar = String::with_capacity(avail * 3);
        bar.push('[');
        for _ in 0..filled {
            bar.push(self.filled);
        }
        for _ in filled..bar_width {
            bar.push(self.empty);
        }
        bar.push(']');
        bar.push_str(&label);
        LineResult::Line(self.style.apply(&bar, ctx.resolver))
    }
}

/// Frame table for the default spinner.
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// A one-cell animated spinner.
pub struct Spinner {
    /// Animation frames.
    frames: Vec<char>,
    /// Current frame index.
    phase: usize,
    /// Style for the glyph.
    style: StyleOptions,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    /// A spinner with the default braille frames.
    pub fn new() -> Self {
        Self {
            frames: SPINNER_FRAMES.to_vec(),
            phase: 0,
            style: StyleOptions::new(),
        }
    }

    /// Use a custom frame table (ignored when empty).
    #[must_use]
    pub fn with_frames(mut self, frames: Vec<char>) -> Self {
        if !frames.is_empty() {
            self.frames = frames;
        }
        self
    }

    /// Style the glyph.
    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    /// Start at a specific phase.
    #[must_use]
    pub fn at_phase(mut self, phase: usize) -> Self {
        self.phase = phase;
        self
    }

    /// Advance to the next frame.
    pub fn tick(&mut self) {
        self.phase = self.phase.wrapping_add(1);
    }

    /// The current frame glyph.
    pub fn frame(&self) -> char {
        self.frames[self.phase % self.frames.len()]
    }

    /// Render the current frame.
    pub fn render(&self, ctx: &RenderContext<'_>) -> LineResult {
        if ctx.available_width == AvailableWidth::Bounded(0) {
            return LineResult::Line(String::new());
        }
        LineResult::Line(self.style.apply(&self.frame().to_string(), ctx.resolver))
    }
}

impl ComponentTree {
    /// Add a progress bar.
    pub fn progress_bar(&mut self, bar: ProgressBar) -> NodeId {
        self.push(Component::ProgressBar(bar))
    }

    /// Add a spinner.
    pub fn spinner(&mut self, spinner: Spinner) -> NodeId {
        self.push(Component::Spinner(spinner))
    }
}
