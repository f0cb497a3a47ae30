use compose_core::{caller_key, use_memo, with_group, Dependencies};

/// Hands `children` the value `factory` produced for the current `deps`.
///
/// `factory` runs on first reach and again only when a slot of `deps` differs
/// from the previous pass. It must be a pure function of what `deps` captures.
#[track_caller]
pub fn Memo<T, D, R>(factory: impl FnOnce() -> T, deps: D, children: impl FnOnce(&T) -> R) -> R
where
    T: 'static,
    D: Dependencies,
{
    with_group(caller_key(), || {
        let value = use_memo(factory, deps);
        children(&value)
    })
}
