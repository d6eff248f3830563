//! The region renderer.
//!
//! A `Region` owns a logical frame (one string per row), keeps the last
//! emitted frame for diffing, and maintains the terminal state it acquired:
//! alternate screen on, auto-wrap off, cursor hidden. Content anchors at the
//! bottom of the viewport; frames taller than the viewport are clipped to
//! their last rows. All terminal writes for one frame coalesce into a single
//! buffered write.
//!
//! Mutations never surface write errors: they queue state and repaint
//! opportunistically, gated by the frame throttle. Write failures surface
//! from [`Region::flush`] and [`Region::destroy`], which also mark the
//! region destroyed so no further emission is attempted. A destroyed region
//! silently ignores everything.

use tracing::{debug, trace};

use crate::ansi;
use crate::color::{ColorResolver, NoThemeResolver};
use crate::component::{AvailableWidth, ComponentTree, NodeId, RenderContext};
use crate::diff::{self, LineOp};
use crate::error::{RegionError, Result};
use crate::terminal::{Backend, Size};
use crate::text;
use crate::throttle::Throttle;

/// Append-only byte buffer coalescing a frame's writes into one syscall.
#[derive(Debug, Default)]
pub struct WriteBuffer {
    bytes: Vec<u8>,
}

impl WriteBuffer {
    /// An empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text.
    pub fn push_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Bytes currently buffered.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Discard without writing.
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Write everything in one call and clear the buffer.
    ///
    /// The buffer is cleared even when the write fails, so a later frame
    /// does not replay half-written escape state.
    pub fn flush(&mut self, backend: &mut dyn Backend) -> Result<()> {
        if self.bytes.is_empty() {
            return Ok(());
        }
        let result = backend
            .write_raw(&self.bytes)
            .and_then(|()| backend.flush());
        self.bytes.clear();
        result
    }
}

/// Terminal-side lifecycle of a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Lifecycle {
    /// Constructed; the terminal is untouched.
    Pristine,
    /// Alternate screen entered, auto-wrap off, cursor hidden.
    Active,
    /// Terminal state restored; no further emission.
    TornDown,
}

/// Region configuration.
pub struct RegionOptions {
    /// Target repaint rate.
    pub fps: u32,
    /// Replay the final frame to the primary screen on destroy.
    pub replay_final_frame: bool,
    /// Resolver for semantic color tokens.
    pub resolver: Box<dyn ColorResolver>,
}

impl Default for RegionOptions {
    fn default() -> Self {
        Self {
            fps: 30,
            replay_final_frame: true,
            resolver: Box::new(NoThemeResolver),
        }
    }
}

impl RegionOptions {
    /// Defaults: 30 FPS, final frame replayed, no theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the repaint rate.
    #[must_use]
    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    /// Control final-frame replay on destroy.
    #[must_use]
    pub fn with_replay_final_frame(mut self, replay: bool) -> Self {
        self.replay_final_frame = replay;
        self
    }

    /// Supply a semantic color resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Box<dyn ColorResolver>) -> Self {
        self.resolver = resolver;
        self
    }
}

/// Callback re-rendering the component tree after a resize.
pub type KeepAlive<B> = Box<dyn FnMut(&mut Region<B>)>;

/// An in-place updatable block of rows at the bottom of the terminal.
pub struct Region<B: Backend> {
    backend: B,
    resolver: Box<dyn ColorResolver>,
    replay_final_frame: bool,
    viewport: Size,
    pending: Vec<String>,
    prev_viewport: Vec<String>,
    buffer: WriteBuffer,
    throttle: Throttle,
    lifecycle: Lifecycle,
    is_rendering: bool,
    repaint_pending: bool,
    cursor_request: Option<(usize, u16)>,
    cursor_shown: bool,
    on_keep_alive: Option<KeepAlive<B>>,
    destroyed: bool,
}

impl<B: Backend> Region<B> {
    /// Create a region over a backend.
    ///
    /// Construction is synchronous and touches nothing on the terminal; the
    /// alternate screen is entered on the first painted frame.
    pub fn new(backend: B, options: RegionOptions) -> Result<Self> {
        let viewport = backend.size()?;
        Ok(Self {
            backend,
            resolver: options.resolver,
            replay_final_frame: options.replay_final_frame,
            viewport,
            pending: Vec::new(),
            prev_viewport: Vec::new(),
            buffer: WriteBuffer::new(),
            throttle: Throttle::new(options.fps),
            lifecycle: Lifecycle::Pristine,
            is_rendering: false,
            repaint_pending: false,
            cursor_request: None,
            cursor_shown: false,
            on_keep_alive: None,
            destroyed: false,
        })
    }

    /// Viewport width in columns.
    pub fn width(&self) -> usize {
        usize::from(self.viewport.width)
    }

    /// Logical frame height in rows.
    pub fn height(&self) -> usize {
        self.pending.len()
    }

    /// Current viewport size.
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// True once the region has been destroyed.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Rows in the previously emitted viewport frame.
    ///
    /// Zero right after a resize, which forces the next paint to redraw
    /// everything.
    pub fn previous_viewport_rows(&self) -> usize {
        self.prev_viewport.len()
    }

    /// The backend, for inspection in tests and diagnostics.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable backend access, for hosts that drive a simulated terminal.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Replace the frame with the rendered output of `roots`.
    pub fn set(&mut self, tree: &ComponentTree, roots: &[NodeId]) {
        if self.destroyed {
            return;
        }
        self.pending = self.render_roots(tree, roots);
        self.schedule_repaint();
    }

    /// Append the rendered output of `roots` to the frame.
    pub fn add(&mut self, tree: &ComponentTree, roots: &[NodeId]) {
        if self.destroyed {
            return;
        }
        let mut rows = self.render_roots(tree, roots);
        self.pending.append(&mut rows);
        self.schedule_repaint();
    }

    /// Set row `n` (1-based), growing the frame as needed.
    pub fn set_line(&mut self, n: usize, content: impl Into<String>) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if n == 0 {
            return Err(RegionError::InvalidLineNumber(n));
        }
        if self.pending.len() < n {
            self.pending.resize(n, String::new());
        }
        self.pending[n - 1] = content.into();
        self.schedule_repaint();
        Ok(())
    }

    /// Apply a batch of row mutations atomically: one validation pass, one
    /// repaint.
    pub fn update_lines(
        &mut self,
        batch: impl IntoIterator<Item = (usize, String)>,
    ) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let batch: Vec<(usize, String)> = batch.into_iter().collect();
        if let Some(&(n, _)) = batch.iter().find(|(n, _)| *n == 0) {
            return Err(RegionError::InvalidLineNumber(n));
        }
        for (n, content) in batch {
            if self.pending.len() < n {
                self.pending.resize(n, String::new());
            }
            self.pending[n - 1] = content;
        }
        self.schedule_repaint();
        Ok(())
    }

    /// Read row `n` (1-based) of the pending frame.
    pub fn get_line(&self, n: usize) -> Option<&str> {
        n.checked_sub(1)
            .and_then(|i| self.pending.get(i))
            .map(String::as_str)
    }

    /// Reset row `n` to the empty string (frame does not shrink).
    pub fn clear_line(&mut self, n: usize) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if n == 0 {
            return Err(RegionError::InvalidLineNumber(n));
        }
        if let Some(row) = self.pending.get_mut(n - 1) {
            row.clear();
            self.schedule_repaint();
        }
        Ok(())
    }

    /// Reset every row to the empty string (frame does not shrink).
    pub fn clear(&mut self) {
        if self.destroyed {
            return;
        }
        for row in &mut self.pending {
            row.clear();
        }
        self.schedule_repaint();
    }

    /// Remove `count` rows starting at row `start` (1-based), shrinking the
    /// frame. Invalidates the previous viewport frame so the next paint is
    /// a full redraw.
    pub fn shrink_frame(&mut self, start: usize, count: usize) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if start == 0 {
            return Err(RegionError::InvalidLineNumber(start));
        }
        let from = start - 1;
        if from < self.pending.len() {
            let to = (from + count).min(self.pending.len());
            self.pending.drain(from..to);
            self.prev_viewport.clear();
            self.schedule_repaint();
        }
        Ok(())
    }

    /// Request the cursor be shown at `(line, column)` (both 1-based) after
    /// each paint, for prompt affordances.
    pub fn show_cursor_at(&mut self, line: usize, column: u16) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if line == 0 {
            return Err(RegionError::InvalidLineNumber(line));
        }
        self.cursor_request = Some((line, column.max(1)));
        self.schedule_repaint();
        Ok(())
    }

    /// Hide the cursor again.
    pub fn hide_cursor(&mut self) {
        if self.destroyed {
            return;
        }
        if self.cursor_request.take().is_some() {
            self.schedule_repaint();
        }
    }

    /// Change the repaint rate.
    pub fn set_fps(&mut self, fps: u32) {
        self.throttle.set_fps(fps);
    }

    /// Time until the throttle allows the next repaint.
    pub fn time_until_next_frame(&self) -> std::time::Duration {
        self.throttle.time_until_next_frame()
    }

    /// Register the host callback invoked after a resize, so the component
    /// tree re-renders at the new width.
    pub fn on_keep_alive(&mut self, callback: impl FnMut(&mut Region<B>) + 'static) {
        self.on_keep_alive = Some(Box::new(callback));
    }

    /// Handle a terminal size change: re-read the size, drop the previous
    /// viewport frame (forcing a full redraw), and run the keep-alive
    /// callback. The repaint itself happens on the next flush or mutation.
    pub fn handle_resize(&mut self) -> Result<Size> {
        if self.destroyed {
            return Ok(self.viewport);
        }
        let size = self.backend.size()?;
        self.viewport = size;
        self.prev_viewport.clear();
        self.repaint_pending = true;
        debug!(
            width = size.width,
            height = size.height,
            "viewport resized; previous frame invalidated"
        );
        if let Some(mut callback) = self.on_keep_alive.take() {
            callback(self);
            self.on_keep_alive = Some(callback);
        }
        Ok(size)
    }

    /// Paint now, bypassing the throttle. Returns after the write syscall.
    pub fn flush(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let result = self.render_now();
        self.throttle.mark_rendered();
        self.repaint_pending = false;
        if let Err(e) = result {
            self.destroyed = true;
            return Err(e);
        }
        Ok(())
    }

    /// Paint if a deferred repaint is due. Hosts with an event loop call
    /// this when the throttle deadline passes.
    pub fn render_if_due(&mut self) -> Result<()> {
        if self.destroyed || !self.repaint_pending {
            return Ok(());
        }
        if self.throttle.should_render_now() {
            return self.render_now();
        }
        Ok(())
    }

    /// Tear down: restore the terminal and optionally replay the final
    /// frame (minus trailing blank rows) to the primary screen.
    ///
    /// Idempotent; everything after the first call is a no-op.
    pub fn destroy(&mut self, clear_first: bool) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;
        self.repaint_pending = false;

        if !self.backend.is_tty() {
            debug!("destroying region on a non-terminal stream; nothing to restore");
            return Ok(());
        }
        if self.lifecycle == Lifecycle::TornDown {
            return Ok(());
        }

        self.buffer.clear();
        if self.lifecycle == Lifecycle::Active {
            self.buffer.push_str(ansi::SGR_RESET);
            self.buffer.push_str(ansi::CURSOR_SHOW);
            self.buffer.push_str(ansi::AUTOWRAP_ON);
            self.buffer.push_str(ansi::ALT_SCREEN_LEAVE);
        }

        if !clear_first && self.replay_final_frame {
            let mut last = self.pending.len();
            while last > 0 && self.pending[last - 1].is_empty() {
                last -= 1;
            }
            let width = self.width();
            for line in &self.pending[..last] {
                self.buffer.push_str(&text::truncate_to_width(line, width));
                self.buffer.push_str(ansi::SGR_RESET);
                self.buffer.push_str("\r\n");
            }
        }

        self.lifecycle = Lifecycle::TornDown;
        let result = self.buffer.flush(&mut self.backend);
        debug!(restored = result.is_ok(), "terminal state released");
        result
    }

    /// Render the given roots into frame rows at the current width.
    fn render_roots(&self, tree: &ComponentTree, roots: &[NodeId]) -> Vec<String> {
        let width = self.width();
        let mut rows: Vec<String> = Vec::with_capacity(roots.len());
        for &root in roots {
            let ctx = RenderContext {
                available_width: AvailableWidth::Bounded(width),
                column_index: 0,
                row_index: rows.len(),
                region_width: width,
                resolver: self.resolver.as_ref(),
            };
            rows.extend(tree.render(root, &ctx).into_lines());
        }
        rows
    }

    /// Gate a repaint through the throttle.
    ///
    /// Write failures here are demoted to a log line and disable the
    /// region; they surface to the caller on the next `flush`.
    fn schedule_repaint(&mut self) {
        if self.destroyed {
            return;
        }
        if self.throttle.should_render_now() {
            if let Err(e) = self.render_now() {
                debug!(error = %e, "deferred repaint failed; region disabled");
                self.destroyed = true;
            }
        } else {
            self.repaint_pending = true;
            trace!(
                delay_ms = self.throttle.time_until_next_frame().as_millis() as u64,
                "repaint deferred by throttle"
            );
        }
    }

    /// Serialize renders; a re-entrant call returns immediately and the
    /// in-progress render observes the latest pending frame.
    fn render_now(&mut self) -> Result<()> {
        if self.is_rendering {
            return Ok(());
        }
        self.is_rendering = true;
        let result = self.render_frame();
        self.is_rendering = false;
        result
    }

    fn render_frame(&mut self) -> Result<()> {
        self.repaint_pending = false;

        if !self.backend.is_tty() {
            // Frames still advance so observers stay consistent; nothing is
            // emitted.
            self.prev_viewport = self.viewport_frame();
            return Ok(());
        }

        self.ensure_active();

        let viewport_frame = self.viewport_frame();
        let ops = diff::diff(&self.prev_viewport, &viewport_frame);
        let width = self.width();

        for op in &ops {
            match op {
                LineOp::NoChange => {}
                LineOp::UpdateLine { row, content } | LineOp::InsertLine { row, content } => {
                    self.buffer.push_str(&ansi::cursor_to(*row as u16 + 1, 1));
                    self.buffer.push_str(ansi::ERASE_LINE);
                    self.buffer
                        .push_str(&text::truncate_to_width(content, width));
                    self.buffer.push_str(ansi::SGR_RESET);
                }
                LineOp::DeleteLine { row } => {
                    self.buffer.push_str(&ansi::cursor_to(*row as u16 + 1, 1));
                    self.buffer.push_str(ansi::ERASE_LINE);
                }
            }
        }

        match self.cursor_request {
            Some((line, column)) => {
                if let Some(row) = self.viewport_row_of(line) {
                    self.buffer.push_str(&ansi::cursor_to(row as u16 + 1, column));
                    self.buffer.push_str(ansi::CURSOR_SHOW);
                    self.cursor_shown = true;
                }
            }
            None => {
                if self.cursor_shown {
                    self.buffer.push_str(ansi::CURSOR_HIDE);
                    self.cursor_shown = false;
                }
            }
        }

        self.buffer.flush(&mut self.backend)?;
        self.prev_viewport = viewport_frame;
        Ok(())
    }

    /// First paint acquires the terminal.
    fn ensure_active(&mut self) {
        if self.lifecycle == Lifecycle::Pristine {
            self.buffer.push_str(ansi::ALT_SCREEN_ENTER);
            self.buffer.push_str(ansi::AUTOWRAP_OFF);
            self.buffer.push_str(ansi::ERASE_SCREEN);
            self.buffer.push_str(&ansi::cursor_to(1, 1));
            self.buffer.push_str(ansi::CURSOR_HIDE);
            self.lifecycle = Lifecycle::Active;
            debug!("acquired terminal (alternate screen, auto-wrap off)");
        }
    }

    /// The bottom-anchored view of the logical frame: the last
    /// `viewport.height` rows, padded with empty rows above.
    fn viewport_frame(&self) -> Vec<String> {
        let vh = usize::from(self.viewport.height);
        let mut frame = Vec::with_capacity(vh);
        if self.pending.len() >= vh {
            frame.extend(self.pending[self.pending.len() - vh..].iter().cloned());
        } else {
            frame.resize(vh - self.pending.len(), String::new());
            frame.extend(self.pending.iter().cloned());
        }
        frame
    }

    /// Viewport row (0-based) showing logical line `line` (1-based), if
    /// that line is inside the viewport.
    fn viewport_row_of(&self, line: usize) -> Option<usize> {
        let vh = usize::from(self.viewport.height);
        if line == 0 || line > self.pending.len() {
            return None;
        }
        if self.pending.len() <= vh {
            Some(vh - self.pending.len() + line - 1)
        } else {
            let clipped = self.pending.len() - vh;
            line.checked_sub(clipped + 1)
        }
    }
}

impl<B: Backend> Drop for Region<B> {
    fn drop(&mut self) {
        if !self.destroyed {
            let _ = self.destroy(false);
        }
    }
}
