use compose_core::{
    caller_key, use_effect, use_layout_effect, with_group, Dependencies, EffectResult,
    EffectScope,
};

/// Registers `effect` with the host runtime to run after the pass commits.
///
/// `deps` of [`EVERY_RENDER`](compose_core::EVERY_RENDER) runs it after every
/// pass, `Some(())` after the first pass only, and any other list whenever one
/// of its slots changed. The cleanup the effect returns is handed to the
/// runtime untouched. Renders nothing.
#[track_caller]
pub fn Effect<D>(deps: Option<D>, effect: impl FnOnce(EffectScope) -> EffectResult + 'static)
where
    D: Dependencies,
{
    with_group(caller_key(), || use_effect(deps, effect))
}

/// [`Effect`] fired synchronously while the pass commits, before its output
/// is handed back to the host.
#[track_caller]
pub fn LayoutEffect<D>(deps: Option<D>, effect: impl FnOnce(EffectScope) -> EffectResult + 'static)
where
    D: Dependencies,
{
    with_group(caller_key(), || use_layout_effect(deps, effect))
}
