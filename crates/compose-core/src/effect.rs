use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::composer::with_current_composer;
use crate::deps::{dependencies_changed, Dependencies};
use crate::runtime::{RuntimeHandle, Task};

type Cleanup = Box<dyn FnOnce()>;

/// When the host fires an effect relative to committing a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectPhase {
    /// Synchronously during commit, before the pass's output is handed back.
    Layout,
    /// Deferred until the host flushes effects after commit.
    Passive,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct EffectScope;

impl EffectScope {
    pub fn on_cleanup(&self, cleanup: impl FnOnce() + 'static) -> EffectResult {
        EffectResult::new(cleanup)
    }

    pub fn done(&self) -> EffectResult {
        EffectResult::default()
    }
}

/// What an effect body hands back: optionally, the cleanup for this run.
#[derive(Default)]
pub struct EffectResult {
    cleanup: Option<Cleanup>,
}

impl EffectResult {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    fn into_cleanup(self) -> Option<Cleanup> {
        self.cleanup
    }
}

struct EffectCell {
    cleanup: RefCell<Option<Cleanup>>,
    mounted: Cell<bool>,
}

impl EffectCell {
    fn run(&self, effect: impl FnOnce(EffectScope) -> EffectResult) {
        if !self.mounted.get() {
            return;
        }
        self.dispose();
        let cleanup = effect(EffectScope).into_cleanup();
        *self.cleanup.borrow_mut() = cleanup;
    }

    fn dispose(&self) {
        let cleanup = self.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

struct EffectSlot<D> {
    phase: EffectPhase,
    /// Dependencies of the last run that actually committed.
    deps: Rc<RefCell<Option<D>>>,
    cell: Rc<EffectCell>,
    runtime: RuntimeHandle,
}

impl<D> EffectSlot<D> {
    fn new(phase: EffectPhase, runtime: RuntimeHandle) -> Self {
        Self {
            phase,
            deps: Rc::new(RefCell::new(None)),
            cell: Rc::new(EffectCell {
                cleanup: RefCell::new(None),
                mounted: Cell::new(true),
            }),
            runtime,
        }
    }
}

impl<D> Drop for EffectSlot<D> {
    fn drop(&mut self) {
        self.cell.mounted.set(false);
        let cell = Rc::clone(&self.cell);
        let dispose: Box<dyn FnOnce()> = Box::new(move || cell.dispose());
        match self.phase {
            EffectPhase::Layout => self.runtime.enqueue_layout_disposal(dispose),
            EffectPhase::Passive => self.runtime.enqueue_passive(dispose),
        }
    }
}

fn register_effect<D, F>(phase: EffectPhase, deps: Option<D>, effect: F)
where
    D: Dependencies,
    F: FnOnce(EffectScope) -> EffectResult + 'static,
{
    let (slot, index) = with_current_composer(|composer| {
        let runtime = composer.runtime_handle();
        let slot = composer.remember(|| EffectSlot::<D>::new(phase, runtime));
        (slot, composer.slot_index())
    });
    let (committed, cell) = slot.with(|slot| (Rc::clone(&slot.deps), Rc::clone(&slot.cell)));
    let changed = dependencies_changed(index, committed.borrow().as_ref(), deps.as_ref());
    if !changed {
        return;
    }
    // Deps are committed by the run itself; an aborted pass keeps the old ones.
    let task: Task = Box::new(move || {
        if cell.mounted.get() {
            *committed.borrow_mut() = deps;
        }
        cell.run(effect);
    });
    with_current_composer(|composer| composer.register_effect(phase, task));
}

/// Registers `effect` to run after the pass is committed.
///
/// `deps == None` runs after every pass, `Some(())` only after the first, and
/// any other list whenever one of its slots changed. The cleanup returned by
/// the previous run fires before the next run and when the call site unmounts.
pub fn use_effect<D, F>(deps: Option<D>, effect: F)
where
    D: Dependencies,
    F: FnOnce(EffectScope) -> EffectResult + 'static,
{
    register_effect(EffectPhase::Passive, deps, effect);
}

/// [`use_effect`] fired synchronously during commit instead of deferred.
pub fn use_layout_effect<D, F>(deps: Option<D>, effect: F)
where
    D: Dependencies,
    F: FnOnce(EffectScope) -> EffectResult + 'static,
{
    register_effect(EffectPhase::Layout, deps, effect);
}
