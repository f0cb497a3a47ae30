use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared handle to a value living in a slot of the [`SlotTable`](crate::SlotTable).
///
/// Every pass that reaches the same slot gets a clone of the same handle, so
/// [`Owned::ptr_eq`] is the identity of the call site's storage.
pub struct Owned<T> {
    inner: Rc<RefCell<T>>, // FUTURE(no_std): replace Rc with arena-managed slot handles.
}

impl<T> Owned<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(value)),
        }
    }

    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.borrow_mut())
    }

    pub fn replace(&self, value: T) -> T {
        self.inner.replace(value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T> Clone for Owned<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Owned<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Owned").field(&*self.inner.borrow()).finish()
    }
}
