use std::convert::identity;

use compose_core::{caller_key, use_ref, with_group, Key, MutableRef, RefObject};

fn ref_adapter<T, C, R>(
    key: Key,
    init: impl FnOnce() -> T,
    view: impl FnOnce(MutableRef<T>) -> C,
    children: impl FnOnce(C) -> R,
) -> R
where
    T: 'static,
{
    with_group(key, || children(view(use_ref(init))))
}

/// Mutable cell seeded with `initial`, allocated once per call site.
///
/// Writing to the cell never schedules a pass.
#[track_caller]
pub fn Ref<T, R>(initial: T, children: impl FnOnce(MutableRef<T>) -> R) -> R
where
    T: 'static,
{
    ref_adapter(caller_key(), move || initial, identity, children)
}

/// Read-mostly cell for attaching a host-managed object, usually starting
/// out as `None`.
#[track_caller]
pub fn ObjectRef<T, R>(initial: Option<T>, children: impl FnOnce(RefObject<T>) -> R) -> R
where
    T: 'static,
{
    ref_adapter(caller_key(), move || initial, RefObject::from, children)
}

/// Mutable cell without an initial value.
///
/// `EmptyRef::<Handle, _>(|cell| ...)`
#[track_caller]
pub fn EmptyRef<T, R>(children: impl FnOnce(MutableRef<Option<T>>) -> R) -> R
where
    T: 'static,
{
    ref_adapter(caller_key(), || None, identity, children)
}
