use compose_core::{caller_key, with_group, CompositionLocal};

/// Reads the value bound to `local` at this position and hands it to
/// `children`. Unbound locals resolve to the local's declared default.
#[track_caller]
pub fn Context<T, R>(local: &CompositionLocal<T>, children: impl FnOnce(T) -> R) -> R
where
    T: Clone + 'static,
{
    with_group(caller_key(), || children(local.current()))
}
