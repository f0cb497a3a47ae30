//! Dependency lists for memoized values and effects.
//!
//! A dependency list is any ordered sequence of comparison keys. Slot-wise
//! comparison is the sequence's own `PartialEq`: tuples compare element by
//! element, vectors and arrays likewise.

use crate::composer::with_current_composer;
use crate::error::ComposeError;

pub trait Dependencies: PartialEq + 'static {
    /// Number of comparison slots in this list.
    fn arity(&self) -> usize;
}

/// Dependency value for an effect that runs after every pass.
pub const EVERY_RENDER: Option<()> = None;

impl Dependencies for () {
    fn arity(&self) -> usize {
        0
    }
}

macro_rules! tuple_dependencies {
    ($($len:expr => ($($name:ident),+)),+ $(,)?) => {
        $(
            impl<$($name: PartialEq + 'static),+> Dependencies for ($($name,)+) {
                fn arity(&self) -> usize {
                    $len
                }
            }
        )+
    };
}

tuple_dependencies! {
    1 => (A),
    2 => (A, B),
    3 => (A, B, C),
    4 => (A, B, C, D),
    5 => (A, B, C, D, E),
    6 => (A, B, C, D, E, F),
    7 => (A, B, C, D, E, F, G),
    8 => (A, B, C, D, E, F, G, H),
}

impl<T: PartialEq + 'static, const N: usize> Dependencies for [T; N] {
    fn arity(&self) -> usize {
        N
    }
}

impl<T: PartialEq + 'static> Dependencies for Vec<T> {
    fn arity(&self) -> usize {
        self.len()
    }
}

/// Decides whether the work guarded by `next` must run again.
///
/// `None` on either side always runs. A length change is reported as a fault
/// on the current pass and also counts as a change.
pub(crate) fn dependencies_changed<D: Dependencies>(
    slot: usize,
    previous: Option<&D>,
    next: Option<&D>,
) -> bool {
    let (Some(previous), Some(next)) = (previous, next) else {
        return true;
    };
    if previous.arity() != next.arity() {
        let fault = ComposeError::DependencyArityChanged {
            slot,
            previous: previous.arity(),
            current: next.arity(),
        };
        with_current_composer(|composer| composer.record_fault(fault));
        return true;
    }
    previous != next
}
