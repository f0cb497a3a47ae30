use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use crate::composer::{remember, with_current_composer};
use crate::runtime::RuntimeHandle;

struct UpdateQueue<A> {
    pending: RefCell<VecDeque<A>>, // FUTURE(no_std): replace VecDeque with ring buffer.
}

impl<A> UpdateQueue<A> {
    fn new() -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
        }
    }

    fn push(&self, action: A) {
        self.pending.borrow_mut().push_back(action);
    }

    fn drain(&self) -> Vec<A> {
        self.pending.borrow_mut().drain(..).collect()
    }

    fn len(&self) -> usize {
        self.pending.borrow().len()
    }
}

/// Enqueues actions for a reducer slot and asks the host for another pass.
///
/// Every pass at the same call site hands out a clone of the same dispatcher;
/// equality is identity.
pub struct Dispatch<A: 'static> {
    queue: Rc<UpdateQueue<A>>,
    runtime: RuntimeHandle,
}

impl<A: 'static> Dispatch<A> {
    pub fn dispatch(&self, action: A) {
        self.queue.push(action);
        self.runtime.schedule();
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.queue, &other.queue)
    }
}

impl Dispatch<()> {
    /// Dispatches to a reducer that takes no action.
    pub fn trigger(&self) {
        self.dispatch(());
    }
}

impl<A: 'static> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
            runtime: self.runtime.clone(),
        }
    }
}

impl<A: 'static> PartialEq for Dispatch<A> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<A: 'static> Eq for Dispatch<A> {}

impl<A: 'static> fmt::Debug for Dispatch<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch")
            .field("pending", &self.queue.len())
            .finish()
    }
}

/// Action understood by the reducer behind [`use_state`].
pub enum SetStateAction<S> {
    Value(S),
    Update(Box<dyn FnOnce(&S) -> S>),
}

impl<S> SetStateAction<S> {
    pub fn apply(self, previous: &S) -> S {
        match self {
            SetStateAction::Value(value) => value,
            SetStateAction::Update(update) => update(previous),
        }
    }
}

impl<S> fmt::Debug for SetStateAction<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetStateAction::Value(_) => f.write_str("SetStateAction::Value(..)"),
            SetStateAction::Update(_) => f.write_str("SetStateAction::Update(..)"),
        }
    }
}

/// Setter half of [`use_state`].
pub struct SetState<S: 'static> {
    dispatch: Dispatch<SetStateAction<S>>,
}

impl<S: 'static> SetState<S> {
    pub fn set(&self, value: S) {
        self.dispatch.dispatch(SetStateAction::Value(value));
    }

    /// Queues a transform of whatever the state is when the update is applied.
    pub fn update(&self, update: impl FnOnce(&S) -> S + 'static) {
        self.dispatch
            .dispatch(SetStateAction::Update(Box::new(update)));
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.dispatch.ptr_eq(&other.dispatch)
    }
}

impl<S: 'static> Clone for SetState<S> {
    fn clone(&self) -> Self {
        Self {
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S: 'static> PartialEq for SetState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<S: 'static> Eq for SetState<S> {}

impl<S: 'static> fmt::Debug for SetState<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SetState").field(&self.dispatch).finish()
    }
}

struct ReducerSlot<S, A> {
    state: S,
    queue: Rc<UpdateQueue<A>>,
}

/// Reducer-driven state at the current call site.
///
/// `init` runs once, when the slot is first created, outside the composer
/// borrow so it may read composition locals. Actions dispatched since
/// the previous pass are folded through the `reducer` supplied on this pass,
/// in dispatch order, before the state is returned.
pub fn use_reducer<S, A, F>(reducer: F, init: impl FnOnce() -> S) -> (S, Dispatch<A>)
where
    S: Clone + 'static,
    A: 'static,
    F: Fn(&S, A) -> S,
{
    let slot = remember(|| ReducerSlot {
        state: init(),
        queue: Rc::new(UpdateQueue::new()),
    });
    let runtime = with_current_composer(|composer| composer.runtime_handle());
    let queue = slot.with(|slot| Rc::clone(&slot.queue));
    let pending = queue.drain();
    if !pending.is_empty() {
        slot.update(|slot| {
            for action in pending {
                slot.state = reducer(&slot.state, action);
            }
        });
    }
    let state = slot.with(|slot| slot.state.clone());
    (state, Dispatch { queue, runtime })
}

/// Local state at the current call site: [`use_reducer`] over [`SetStateAction`].
pub fn use_state<S: Clone + 'static>(init: impl FnOnce() -> S) -> (S, SetState<S>) {
    let (state, dispatch) = use_reducer(
        |previous: &S, action: SetStateAction<S>| action.apply(previous),
        init,
    );
    (state, SetState { dispatch })
}
