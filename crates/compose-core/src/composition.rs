use std::sync::Arc;

use crate::composer::Composer;
use crate::error::ComposeError;
use crate::runtime::{DefaultScheduler, Runtime, RuntimeHandle};
use crate::slot_table::SlotTable;
use crate::Key;

/// A composition tree: the slot table plus the runtime its slots report to.
///
/// Each [`render`](Composition::render) is one pass over the whole tree. The
/// host calls it again whenever [`should_render`](Composition::should_render)
/// reports a pending update.
pub struct Composition {
    slots: SlotTable,
    runtime: Runtime,
    passes: u64,
}

impl Composition {
    pub fn new() -> Self {
        Self::with_runtime(Runtime::new(Arc::new(DefaultScheduler)))
    }

    pub fn with_runtime(runtime: Runtime) -> Self {
        Self {
            slots: SlotTable::new(),
            runtime,
            passes: 0,
        }
    }

    /// Runs one pass of `content` under a root group keyed by `key`.
    ///
    /// Passive effects left over from the previous pass are flushed first.
    /// After composing, commit runs the cleanups of unmounted layout effects,
    /// then this pass's layout effects in call-site order, then queues its
    /// passive effects. A pass that recorded a fault commits nothing and
    /// returns the first fault.
    pub fn render<R>(&mut self, key: Key, content: impl FnOnce() -> R) -> Result<R, ComposeError> {
        let handle = self.runtime.handle();
        let flushed = handle.flush_passive_effects();
        if flushed > 0 {
            log::trace!("flushed {flushed} passive effect(s) before pass {}", self.passes);
        }
        self.runtime.set_needs_frame(false);
        self.slots.reset();

        let mut composer = Composer::new(&mut self.slots, handle.clone());
        let output = composer.install(|| crate::with_group(key, content));
        let outcome = composer.finish();

        if let Some(fault) = outcome.faults.first() {
            for fault in &outcome.faults {
                log::error!("pass {} aborted: {fault}", self.passes);
            }
            return Err(fault.clone());
        }

        let disposed = handle.run_layout_disposals();
        let layout = outcome.layout_effects.len();
        for effect in outcome.layout_effects {
            effect();
        }
        let passive = outcome.passive_effects.len();
        for effect in outcome.passive_effects {
            handle.enqueue_passive(effect);
        }
        log::trace!(
            "pass {} committed: {layout} layout effect(s), {passive} passive effect(s) queued, {disposed} layout cleanup(s)",
            self.passes
        );
        self.passes += 1;
        Ok(output)
    }

    /// Runs queued passive effects and passive cleanups, returning how many ran.
    pub fn flush_effects(&mut self) -> usize {
        self.runtime.handle().flush_passive_effects()
    }

    pub fn has_pending_effects(&self) -> bool {
        self.runtime.handle().has_pending_effects()
    }

    pub fn should_render(&self) -> bool {
        self.runtime.needs_frame()
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    /// Number of committed passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Unmounts the whole tree. Every outstanding cleanup runs exactly once.
    pub fn dispose(&mut self) {
        if self.slots.is_empty() && !self.has_pending_effects() {
            return;
        }
        let handle = self.runtime.handle();
        self.slots.clear();
        let layout = handle.run_layout_disposals();
        let passive = handle.flush_passive_effects();
        log::debug!("composition disposed: {layout} layout and {passive} passive task(s) ran");
    }
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.dispose();
    }
}
