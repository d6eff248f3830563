//! Process-wide active-region registry.
//!
//! The host creates one `RegionRegistry` at program start, registers each
//! region it constructs, and wires `drain()` into its exit paths (normal
//! exit, interrupt, termination handler). Draining tears every live region
//! down exactly once; regions already destroyed, or dropped, are skipped.
//! The registry holds only weak references, so it never keeps a region
//! alive.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::region::Region;
use crate::terminal::Backend;

/// Teardown capability the registry needs from a region.
pub trait Teardown {
    /// Restore terminal state; idempotent.
    fn teardown(&mut self);

    /// True once torn down.
    fn is_destroyed(&self) -> bool;
}

impl<B: Backend> Teardown for Region<B> {
    fn teardown(&mut self) {
        let _ = self.destroy(false);
    }

    fn is_destroyed(&self) -> bool {
        Region::is_destroyed(self)
    }
}

/// Registry of active regions with exactly-once exit teardown.
#[derive(Default)]
pub struct RegionRegistry {
    regions: RefCell<Vec<Weak<RefCell<dyn Teardown>>>>,
    drained: Cell<bool>,
}

impl RegionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a region for exit teardown.
    pub fn register<B: Backend + 'static>(&self, region: &Rc<RefCell<Region<B>>>) {
        let handle: Rc<RefCell<dyn Teardown>> = region.clone();
        self.regions.borrow_mut().push(Rc::downgrade(&handle));
    }

    /// Number of registered regions still alive and not destroyed.
    pub fn active_count(&self) -> usize {
        self.regions
            .borrow()
            .iter()
            .filter_map(Weak::upgrade)
            .filter(|r| !r.borrow().is_destroyed())
            .count()
    }

    /// True after the first [`RegionRegistry::drain`].
    pub fn is_drained(&self) -> bool {
        self.drained.get()
    }

    /// Tear down every live region. The first call does the work; all
    /// later calls (a second signal, a signal racing normal exit) no-op.
    pub fn drain(&self) {
        if self.drained.replace(true) {
            return;
        }
        let handles: Vec<_> = self.regions.borrow_mut().drain(..).collect();
        let mut torn_down = 0usize;
        for weak in handles {
            if let Some(region) = weak.upgrade() {
                region.borrow_mut().teardown();
                torn_down += 1;
            }
        }
        debug!(regions = torn_down, "registry drained");
    }
}
