use std::convert::identity;

use compose_core::{caller_key, use_reducer, with_group, Dispatch, Key};

/// Single path behind the four reducer shapes: the initial state is
/// `initializer(arg)`, computed once, and `children` receives the state with
/// its dispatcher.
fn reducer_adapter<S, A, I, R>(
    key: Key,
    reducer: impl Fn(&S, A) -> S,
    arg: I,
    initializer: impl FnOnce(I) -> S,
    children: impl FnOnce((S, Dispatch<A>)) -> R,
) -> R
where
    S: Clone + 'static,
    A: 'static,
{
    with_group(key, || {
        children(use_reducer(reducer, move || initializer(arg)))
    })
}

/// Reducer-driven state seeded directly with `initial_state`.
///
/// Actions sent through the dispatcher are folded with `reducer` on the next
/// pass. The dispatcher's identity never changes for this call site.
#[track_caller]
pub fn Reducer<S, A, R>(
    reducer: impl Fn(&S, A) -> S,
    initial_state: S,
    children: impl FnOnce((S, Dispatch<A>)) -> R,
) -> R
where
    S: Clone + 'static,
    A: 'static,
{
    reducer_adapter(caller_key(), reducer, initial_state, identity, children)
}

/// [`Reducer`] whose initial state is `initializer(arg)`.
#[track_caller]
pub fn ReducerWithInit<S, A, I, R>(
    reducer: impl Fn(&S, A) -> S,
    arg: I,
    initializer: impl FnOnce(I) -> S,
    children: impl FnOnce((S, Dispatch<A>)) -> R,
) -> R
where
    S: Clone + 'static,
    A: 'static,
{
    reducer_adapter(caller_key(), reducer, arg, initializer, children)
}

/// Reducer that takes no action: each [`Dispatch::trigger`] applies it once.
#[track_caller]
pub fn ActionlessReducer<S, R>(
    reducer: impl Fn(&S) -> S,
    initial_state: S,
    children: impl FnOnce((S, Dispatch<()>)) -> R,
) -> R
where
    S: Clone + 'static,
{
    reducer_adapter(
        caller_key(),
        move |state: &S, _: ()| reducer(state),
        initial_state,
        identity,
        children,
    )
}

/// [`ActionlessReducer`] whose initial state is `initializer(arg)`.
#[track_caller]
pub fn ActionlessReducerWithInit<S, I, R>(
    reducer: impl Fn(&S) -> S,
    arg: I,
    initializer: impl FnOnce(I) -> S,
    children: impl FnOnce((S, Dispatch<()>)) -> R,
) -> R
where
    S: Clone + 'static,
{
    reducer_adapter(
        caller_key(),
        move |state: &S, _: ()| reducer(state),
        arg,
        initializer,
        children,
    )
}
