use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use crate::platform::RuntimeScheduler;

pub(crate) type Task = Box<dyn FnOnce() + 'static>;

struct RuntimeInner {
    scheduler: Arc<dyn RuntimeScheduler>,
    needs_frame: Cell<bool>,
    passive_effects: RefCell<VecDeque<Task>>, // FUTURE(no_std): replace VecDeque with ring buffer.
    layout_disposals: RefCell<Vec<Task>>, // FUTURE(no_std): switch to bounded callback queue.
}

impl RuntimeInner {
    fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            scheduler,
            needs_frame: Cell::new(false),
            passive_effects: RefCell::new(VecDeque::new()),
            layout_disposals: RefCell::new(Vec::new()),
        }
    }

    fn schedule(&self) {
        self.needs_frame.set(true);
        self.scheduler.schedule_frame();
    }

    fn enqueue_passive(&self, task: Task) {
        self.passive_effects.borrow_mut().push_back(task);
    }

    fn has_passive_effects(&self) -> bool {
        !self.passive_effects.borrow().is_empty()
    }

    fn flush_passive_effects(&self) -> usize {
        let mut ran = 0;
        // Tasks are popped one at a time so an effect may enqueue more work.
        loop {
            let next = self.passive_effects.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            task();
            ran += 1;
        }
        ran
    }

    fn enqueue_layout_disposal(&self, task: Task) {
        self.layout_disposals.borrow_mut().push(task);
    }

    fn run_layout_disposals(&self) -> usize {
        let tasks: Vec<Task> = self.layout_disposals.borrow_mut().drain(..).collect();
        let count = tasks.len();
        for task in tasks {
            task();
        }
        count
    }
}

/// Owner of the scheduling state shared by every slot of a composition.
#[derive(Clone)]
pub struct Runtime {
    inner: Rc<RuntimeInner>, // FUTURE(no_std): replace Rc with arena-managed runtime storage.
}

impl Runtime {
    pub fn new(scheduler: Arc<dyn RuntimeScheduler>) -> Self {
        Self {
            inner: Rc::new(RuntimeInner::new(scheduler)),
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        RuntimeHandle(Rc::downgrade(&self.inner))
    }

    pub fn needs_frame(&self) -> bool {
        self.inner.needs_frame.get()
    }

    pub fn set_needs_frame(&self, value: bool) {
        self.inner.needs_frame.set(value);
    }
}

#[derive(Default)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Weak handle captured by dispatchers and effect slots.
///
/// Once the owning [`Runtime`] is gone, scheduling is a no-op and queued
/// cleanups run immediately instead of being deferred.
#[derive(Clone)]
pub struct RuntimeHandle(Weak<RuntimeInner>);

impl RuntimeHandle {
    pub fn schedule(&self) {
        if let Some(inner) = self.0.upgrade() {
            inner.schedule();
        }
    }

    pub fn needs_frame(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.needs_frame.get())
            .unwrap_or(false)
    }

    pub fn has_pending_effects(&self) -> bool {
        self.0
            .upgrade()
            .map(|inner| inner.has_passive_effects())
            .unwrap_or(false)
    }

    pub fn flush_passive_effects(&self) -> usize {
        self.0
            .upgrade()
            .map(|inner| inner.flush_passive_effects())
            .unwrap_or(0)
    }

    pub(crate) fn enqueue_passive(&self, task: Task) {
        match self.0.upgrade() {
            Some(inner) => inner.enqueue_passive(task),
            None => task(),
        }
    }

    pub(crate) fn enqueue_layout_disposal(&self, task: Task) {
        match self.0.upgrade() {
            Some(inner) => inner.enqueue_layout_disposal(task),
            None => task(),
        }
    }

    pub(crate) fn run_layout_disposals(&self) -> usize {
        self.0
            .upgrade()
            .map(|inner| inner.run_layout_disposals())
            .unwrap_or(0)
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct CountingScheduler {
    pub(crate) frames: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.frames
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}
