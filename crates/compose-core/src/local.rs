use std::any::Any;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "std-hash")]
use std::collections::HashMap;

#[cfg(not(feature = "std-hash"))]
use hashbrown::HashMap;

use crate::composer::with_current_composer;

pub(crate) type LocalKey = usize;

static NEXT_LOCAL_KEY: AtomicUsize = AtomicUsize::new(1);

fn next_local_key() -> LocalKey {
    NEXT_LOCAL_KEY.fetch_add(1, Ordering::Relaxed)
}

#[derive(Default)]
pub(crate) struct LocalFrame {
    values: HashMap<LocalKey, Rc<dyn Any>>, // FUTURE(no_std): replace HashMap/Rc with arena-backed storage.
}

impl LocalFrame {
    pub(crate) fn get(&self, key: LocalKey) -> Option<Rc<dyn Any>> {
        self.values.get(&key).cloned()
    }
}

/// A value bound by position in the tree rather than passed by hand.
///
/// Reads resolve to the nearest enclosing [`CompositionLocalProvider`] that
/// provides this local, or to the declared default when none does.
#[derive(Clone)]
pub struct CompositionLocal<T: Clone + 'static> {
    key: LocalKey,
    default: Rc<dyn Fn() -> T>, // FUTURE(no_std): store default provider in arena-managed cell.
}

impl<T: Clone + 'static> PartialEq for CompositionLocal<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: Clone + 'static> Eq for CompositionLocal<T> {}

impl<T: Clone + 'static> CompositionLocal<T> {
    pub fn provides(&self, value: T) -> ProvidedValue {
        ProvidedValue {
            key: self.key,
            value: Rc::new(value),
        }
    }

    pub fn current(&self) -> T {
        let entry = with_current_composer(|composer| composer.read_local(self.key));
        match entry.and_then(|entry| entry.downcast::<T>().ok()) {
            Some(value) => T::clone(&value),
            None => self.default_value(),
        }
    }

    pub fn default_value(&self) -> T {
        (self.default)()
    }
}

pub struct ProvidedValue {
    key: LocalKey,
    value: Rc<dyn Any>, // FUTURE(no_std): avoid Rc allocation per entry.
}

#[allow(non_snake_case)]
pub fn compositionLocalOf<T: Clone + 'static>(
    default: impl Fn() -> T + 'static,
) -> CompositionLocal<T> {
    CompositionLocal {
        key: next_local_key(),
        default: Rc::new(default),
    }
}

/// Binds `values` for everything composed inside `content`.
#[allow(non_snake_case)]
pub fn CompositionLocalProvider<R>(
    values: impl IntoIterator<Item = ProvidedValue>,
    content: impl FnOnce() -> R,
) -> R {
    let mut frame = LocalFrame::default();
    for provided in values {
        frame.values.insert(provided.key, provided.value);
    }
    if frame.values.is_empty() {
        return content();
    }
    with_current_composer(|composer| composer.push_locals(frame));
    let result = content();
    with_current_composer(|composer| composer.pop_locals());
    result
}
