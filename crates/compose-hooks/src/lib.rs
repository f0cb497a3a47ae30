//! Declarative adapters over the Compose-RS stateful primitives.
//!
//! Each adapter wraps exactly one primitive from [`compose_core`], calls it
//! once per pass inside a transparent group keyed by the adapter's call site,
//! and hands the primitive's result to a `children` callback whose output it
//! returns unchanged. Adapters own no state; slot storage and effect
//! scheduling belong to the host runtime.
//!
//! ```ignore
//! State(0, |(count, set_count)| {
//!     Effect(Some((count,)), move |scope| {
//!         let timer = start_timer(count);
//!         scope.on_cleanup(move || timer.cancel())
//!     });
//!     Label(format!("clicked {count} times"), move || set_count.update(|n| n + 1))
//! });
//! ```

#![allow(non_snake_case)]

mod callback;
mod context;
mod effect;
mod memo;
mod reducer;
mod refs;
mod state;

pub use callback::Callback;
pub use context::Context;
pub use effect::{Effect, LayoutEffect};
pub use memo::Memo;
pub use reducer::{ActionlessReducer, ActionlessReducerWithInit, Reducer, ReducerWithInit};
pub use refs::{EmptyRef, ObjectRef, Ref};
pub use state::{EmptyState, LazyState, State};

pub use compose_core::{
    compositionLocalOf, CallbackHandle, ComposeError, Composition, CompositionLocal,
    CompositionLocalProvider, Dependencies, Dispatch, EffectResult, EffectScope, MutableRef,
    RefObject, SetState, SetStateAction, EVERY_RENDER,
};

pub mod prelude {
    pub use crate::{
        ActionlessReducer, ActionlessReducerWithInit, Callback, Context, Effect, EmptyRef,
        EmptyState, LayoutEffect, LazyState, Memo, ObjectRef, Reducer, ReducerWithInit, Ref,
        State,
    };
    pub use compose_core::{
        compositionLocalOf, CallbackHandle, CompositionLocal, CompositionLocalProvider, Dispatch,
        EffectResult, EffectScope, MutableRef, RefObject, SetState, EVERY_RENDER,
    };
}
