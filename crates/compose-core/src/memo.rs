use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::composer::with_current_composer;
use crate::deps::{dependencies_changed, Dependencies};

struct MemoSlot<D, T> {
    deps: Option<D>,
    value: Option<Rc<T>>,
}

impl<D, T> Default for MemoSlot<D, T> {
    fn default() -> Self {
        Self {
            deps: None,
            value: None,
        }
    }
}

/// Value memoized against `deps`.
///
/// `factory` runs on first reach and whenever any slot of `deps` differs from
/// the previous pass; otherwise the stored value is returned untouched.
/// `factory` must be a pure function of what `deps` captures.
pub fn use_memo<T, D>(factory: impl FnOnce() -> T, deps: D) -> Rc<T>
where
    T: 'static,
    D: Dependencies,
{
    let (slot, index) = with_current_composer(|composer| {
        let slot = composer.remember(MemoSlot::<D, T>::default);
        (slot, composer.slot_index())
    });
    let cached = slot.with(|slot| {
        if dependencies_changed(index, slot.deps.as_ref(), Some(&deps)) {
            None
        } else {
            slot.value.clone()
        }
    });
    if let Some(value) = cached {
        return value;
    }
    let value = Rc::new(factory());
    slot.update(|slot| {
        slot.deps = Some(deps);
        slot.value = Some(Rc::clone(&value));
    });
    value
}

/// Function whose identity only changes when its dependencies do.
pub struct CallbackHandle<F> {
    function: Rc<F>,
}

impl<F> CallbackHandle<F> {
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.function, &other.function)
    }
}

impl<F> Deref for CallbackHandle<F> {
    type Target = F;

    fn deref(&self) -> &F {
        &self.function
    }
}

impl<F> Clone for CallbackHandle<F> {
    fn clone(&self) -> Self {
        Self {
            function: Rc::clone(&self.function),
        }
    }
}

impl<F> PartialEq for CallbackHandle<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<F> Eq for CallbackHandle<F> {}

impl<F> fmt::Debug for CallbackHandle<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallbackHandle")
            .field(&Rc::as_ptr(&self.function))
            .finish()
    }
}

/// Memoizes `callback` itself; it is never invoked here.
pub fn use_callback<F, D>(callback: F, deps: D) -> CallbackHandle<F>
where
    F: 'static,
    D: Dependencies,
{
    CallbackHandle {
        function: use_memo(move || callback, deps),
    }
}
