use std::fmt;

use crate::composer::remember;
use crate::owned::Owned;

/// Mutable cell that outlives passes without ever scheduling one.
pub struct MutableRef<T> {
    cell: Owned<T>,
}

impl<T> MutableRef<T> {
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.cell.with(f)
    }

    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        self.cell.update(f)
    }

    pub fn set(&self, value: T) {
        self.cell.replace(value);
    }

    pub fn replace(&self, value: T) -> T {
        self.cell.replace(value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<T: Clone> MutableRef<T> {
    pub fn get(&self) -> T {
        self.cell.with(T::clone)
    }
}

impl<T> Clone for MutableRef<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> PartialEq for MutableRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for MutableRef<T> {}

impl<T: fmt::Debug> fmt::Debug for MutableRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutableRef")
            .field("current", &self.cell)
            .finish()
    }
}

/// Read-mostly cell meant to be attached to a host-managed object.
///
/// Reading is the common path; [`RefObject::attach`] and
/// [`RefObject::detach`] stay available for the host that owns the object.
pub struct RefObject<T> {
    cell: MutableRef<Option<T>>,
}

impl<T> RefObject<T> {
    pub fn with<R>(&self, f: impl FnOnce(Option<&T>) -> R) -> R {
        self.cell.with(|current| f(current.as_ref()))
    }

    pub fn is_attached(&self) -> bool {
        self.cell.with(Option::is_some)
    }

    pub fn attach(&self, value: T) {
        self.cell.set(Some(value));
    }

    pub fn detach(&self) -> Option<T> {
        self.cell.replace(None)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.cell.ptr_eq(&other.cell)
    }
}

impl<T: Clone> RefObject<T> {
    pub fn current(&self) -> Option<T> {
        self.cell.get()
    }
}

impl<T> From<MutableRef<Option<T>>> for RefObject<T> {
    fn from(cell: MutableRef<Option<T>>) -> Self {
        Self { cell }
    }
}

impl<T> Clone for RefObject<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T> PartialEq for RefObject<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for RefObject<T> {}

impl<T: fmt::Debug> fmt::Debug for RefObject<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefObject")
            .field("current", &self.cell.cell)
            .finish()
    }
}

/// Cell allocated once per call site; `init` runs only on first reach.
pub fn use_ref<T: 'static>(init: impl FnOnce() -> T) -> MutableRef<T> {
    MutableRef {
        cell: remember(init),
    }
}
