//! tidemark: an in-place terminal region renderer.
//!
//! The crate manages an updatable rectangular block of rows on the
//! terminal's alternate screen, for progress bars, spinners, multi-lane
//! status dashboards, and annotated diagnostic views.
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Component Tree                          │
//! │  grids, styled text, fills, sections, bars (arena-owned)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ render(ctx) → rows
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Region (logical frame)                  │
//! │  pending rows → bottom-anchored viewport frame → line diff  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │ changed rows only
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │             Escape emission (one write per frame)           │
//! │  cursor addressing, line clears, SGR, throttled at 30 FPS   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Terminal backend trait                     │
//! │  stdout + crossterm raw mode, or in-memory test capture     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Core Subsystems
//!
//! - **Text kernel**: width counting, splitting, truncation, and wrapping
//!   that never land inside an SGR sequence or OSC-8 hyperlink
//! - **Frame differ**: per-row minimal update stream between frames
//! - **Grid layout**: fixed / flex / auto / minmax tracks with gaps,
//!   space-between distribution, and responsive visibility
//! - **Region renderer**: frame ownership, repaint throttling, resize
//!   handling, and guaranteed terminal restoration on every exit path
//!
//! ## Quick Start
//!
//! ```no_run
//! use tidemark::{ComponentTree, GridOptions, Region, RegionOptions, StdioBackend, Track};
//!
//! fn main() -> tidemark::Result<()> {
//!     let mut region = Region::new(StdioBackend::new(), RegionOptions::new())?;
//!
//!     let mut tree = ComponentTree::new();
//!     let label = tree.text("Installing");
//!     let bar = tree.progress_bar(tidemark::ProgressBar::new(0.4));
//!     let row = tree.grid(
//!         GridOptions::new(vec![Track::fixed(20), Track::flex(1.0)]),
//!         vec![label, bar],
//!     );
//!
//!     region.set(&tree, &[row]);
//!     region.flush()?;
//!     region.destroy(false)
//! }
//! ```

pub mod ansi;
pub mod color;
pub mod component;
pub mod diff;
pub mod error;
pub mod grid;
pub mod primitives;
pub mod region;
pub mod registry;
pub mod style;
pub mod terminal;
pub mod text;
pub mod throttle;
pub mod widgets;

pub use color::{Color, ColorResolver, NamedColor, NoThemeResolver};
pub use component::{AvailableWidth, Component, ComponentTree, LineResult, NodeId, RenderContext};
pub use diff::LineOp;
pub use error::{RegionError, Result};
pub use grid::{GapFill, Grid, GridOptions, Justify, Track};
pub use primitives::{Fill, Section, SectionOptions, SegmentSpan, Segments, Styled};
pub use region::{Region, RegionOptions, WriteBuffer};
pub use registry::{RegionRegistry, Teardown};
pub use style::{Align, Overflow, StyleOptions};
pub use terminal::{Backend, Size, StdioBackend, TestBackend, query_cursor_position};
pub use text::{
    FocusTruncation, count_visible, map_column_to_display, split_at_visible_pos, strip_ansi,
    truncate_end, truncate_focus_range, truncate_middle, truncate_start, truncate_to_width,
    wrap_text,
};
pub use throttle::Throttle;
pub use widgets::{ProgressBar, Spinner};
