use compose_core::{caller_key, use_state, with_group, Key, SetState};

/// Shared path of every state entry point: one `use_state` call inside the
/// adapter's group.
fn state_adapter<S, R>(
    key: Key,
    init: impl FnOnce() -> S,
    children: impl FnOnce((S, SetState<S>)) -> R,
) -> R
where
    S: Clone + 'static,
{
    with_group(key, || children(use_state(init)))
}

/// Local state seeded with `initial` on first reach.
///
/// Later passes ignore `initial`; `children` receives the current value and a
/// setter whose identity never changes for this call site.
#[track_caller]
pub fn State<S, R>(initial: S, children: impl FnOnce((S, SetState<S>)) -> R) -> R
where
    S: Clone + 'static,
{
    state_adapter(caller_key(), move || initial, children)
}

/// [`State`] whose initial value is produced by `init`, consulted only on
/// first reach.
#[track_caller]
pub fn LazyState<S, R>(
    init: impl FnOnce() -> S,
    children: impl FnOnce((S, SetState<S>)) -> R,
) -> R
where
    S: Clone + 'static,
{
    state_adapter(caller_key(), init, children)
}

/// [`State`] without an initial value: the state starts out as `None`.
///
/// `EmptyState::<u32, _>(|(value, set)| ...)`
#[track_caller]
pub fn EmptyState<S, R>(children: impl FnOnce((Option<S>, SetState<Option<S>>)) -> R) -> R
where
    S: Clone + 'static,
{
    state_adapter(caller_key(), || None, children)
}
