use std::any::Any;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::thread_local;

use crate::effect::EffectPhase;
use crate::error::ComposeError;
use crate::local::{LocalFrame, LocalKey};
use crate::owned::Owned;
use crate::runtime::{RuntimeHandle, Task};
use crate::slot_table::SlotTable;
use crate::Key;

thread_local! {
    static CURRENT_COMPOSER: RefCell<Vec<*mut ()>> = const { RefCell::new(Vec::new()) }; // FUTURE(no_std): replace Vec with fixed-capacity stack storage.
    static COMPOSER_IN_USE: Cell<bool> = const { Cell::new(false) };
}

struct ComposerRelease;

impl Drop for ComposerRelease {
    fn drop(&mut self) {
        COMPOSER_IN_USE.with(|in_use| in_use.set(false));
    }
}

/// Runs `f` against the composer of the pass in progress on this thread.
///
/// Panics when no pass is in progress: hooks only exist inside
/// [`Composition::render`](crate::Composition::render). Also panics when
/// called from inside another `f`, since the composer is already lent out.
pub fn with_current_composer<R>(f: impl FnOnce(&mut Composer<'_>) -> R) -> R {
    let ptr = CURRENT_COMPOSER.with(|stack| *stack.borrow().last().expect("no composer installed"));
    if COMPOSER_IN_USE.with(|in_use| in_use.replace(true)) {
        panic!("composer already in use: hooks cannot run while another hook holds the composer");
    }
    let _release = ComposerRelease;
    // SAFETY: the pointer was pushed by `Composer::install`, which keeps the
    // composer alive and pops it before returning. `COMPOSER_IN_USE` rejects
    // a second borrow while this one is live.
    let composer = unsafe { &mut *(ptr as *mut Composer<'static>) };
    f(composer)
}

pub fn is_composing() -> bool {
    CURRENT_COMPOSER.with(|stack| !stack.borrow().is_empty())
}

/// Opens a transparent group keyed by `key`, runs `content` inside it and
/// returns its output. The group emits nothing of its own.
pub fn with_group<R>(key: Key, content: impl FnOnce() -> R) -> R {
    with_current_composer(|composer| composer.start_group(key));
    let result = content();
    with_current_composer(|composer| composer.end_group());
    result
}

/// Stores the value produced by `init` at the current call site on first
/// reach and hands back the same cell on every later pass.
///
/// `init` runs with the composer released, so it may read composition locals.
pub fn remember<T: 'static>(init: impl FnOnce() -> T) -> Owned<T> {
    if let Some(existing) = with_current_composer(|composer| composer.slots.find_value::<T>()) {
        return existing;
    }
    let value = init();
    with_current_composer(|composer| composer.slots.insert_value(value))
}

pub(crate) struct PassOutcome {
    pub(crate) layout_effects: Vec<Task>,
    pub(crate) passive_effects: Vec<Task>,
    pub(crate) faults: Vec<ComposeError>,
}

/// Per-pass driver over a [`SlotTable`].
pub struct Composer<'a> {
    slots: &'a mut SlotTable,
    runtime: RuntimeHandle,
    local_stack: Vec<LocalFrame>, // FUTURE(no_std): store locals in preallocated slab.
    layout_effects: Vec<Task>, // FUTURE(no_std): switch to bounded callback queue.
    passive_effects: Vec<Task>, // FUTURE(no_std): switch to bounded callback queue.
    faults: Vec<ComposeError>,
}

impl<'a> Composer<'a> {
    pub fn new(slots: &'a mut SlotTable, runtime: RuntimeHandle) -> Self {
        Self {
            slots,
            runtime,
            local_stack: Vec::new(),
            layout_effects: Vec::new(),
            passive_effects: Vec::new(),
            faults: Vec::new(),
        }
    }

    /// Makes this composer current for the duration of `content`.
    pub fn install<R>(&mut self, content: impl FnOnce() -> R) -> R {
        CURRENT_COMPOSER.with(|stack| stack.borrow_mut().push(self as *mut Self as *mut ()));
        struct Guard;
        impl Drop for Guard {
            fn drop(&mut self) {
                CURRENT_COMPOSER.with(|stack| {
                    stack.borrow_mut().pop();
                });
            }
        }
        let guard = Guard;
        let result = content();
        drop(guard);
        result
    }

    pub fn start_group(&mut self, key: Key) {
        self.slots.start(key);
    }

    pub fn end_group(&mut self) {
        self.slots.end();
    }

    /// `init` runs while the composer is borrowed and must not call hooks;
    /// use the free [`remember`] for user-supplied initializers.
    pub fn remember<T: 'static>(&mut self, init: impl FnOnce() -> T) -> Owned<T> {
        self.slots.remember(init)
    }

    /// Index of the slot most recently reached by this pass.
    pub fn slot_index(&self) -> usize {
        self.slots.cursor().saturating_sub(1)
    }

    pub fn runtime_handle(&self) -> RuntimeHandle {
        self.runtime.clone()
    }

    pub fn record_fault(&mut self, fault: ComposeError) {
        self.faults.push(fault);
    }

    pub(crate) fn register_effect(&mut self, phase: EffectPhase, effect: Task) {
        match phase {
            EffectPhase::Layout => self.layout_effects.push(effect),
            EffectPhase::Passive => self.passive_effects.push(effect),
        }
    }

    pub(crate) fn push_locals(&mut self, frame: LocalFrame) {
        self.local_stack.push(frame);
    }

    pub(crate) fn pop_locals(&mut self) {
        self.local_stack.pop();
    }

    pub(crate) fn read_local(&self, key: LocalKey) -> Option<Rc<dyn Any>> {
        self.local_stack
            .iter()
            .rev()
            .find_map(|frame| frame.get(key))
    }

    pub(crate) fn finish(mut self) -> PassOutcome {
        self.slots.finish();
        let mut faults = self.slots.take_faults();
        faults.append(&mut self.faults);
        PassOutcome {
            layout_effects: self.layout_effects,
            passive_effects: self.passive_effects,
            faults,
        }
    }
}
