use compose_core::{caller_key, use_callback, with_group, CallbackHandle, Dependencies};

/// Hands `children` a handle to `callback` that keeps its identity for as long
/// as `deps` compare equal to the previous pass. The callback is not invoked.
#[track_caller]
pub fn Callback<F, D, R>(
    callback: F,
    deps: D,
    children: impl FnOnce(CallbackHandle<F>) -> R,
) -> R
where
    F: 'static,
    D: Dependencies,
{
    with_group(caller_key(), || children(use_callback(callback, deps)))
}
