#![doc = r"Host composition runtime behind the Compose-RS hook adapters."]

pub mod composer;
pub mod composition;
pub mod deps;
pub mod effect;
pub mod error;
pub mod hash;
pub mod local;
pub mod memo;
pub mod owned;
pub mod platform;
pub mod refs;
pub mod runtime;
pub mod slot_table;
pub mod state;

pub use composer::{is_composing, remember, with_current_composer, with_group, Composer};
pub use composition::Composition;
pub use deps::{Dependencies, EVERY_RENDER};
pub use effect::{use_effect, use_layout_effect, EffectPhase, EffectResult, EffectScope};
pub use error::ComposeError;
pub use hash::{caller_key, hash_one, location_key};
pub use local::{compositionLocalOf, CompositionLocal, CompositionLocalProvider, ProvidedValue};
pub use memo::{use_callback, use_memo, CallbackHandle};
pub use owned::Owned;
pub use platform::RuntimeScheduler;
pub use refs::{use_ref, MutableRef, RefObject};
pub use runtime::{DefaultScheduler, Runtime, RuntimeHandle};
pub use slot_table::SlotTable;
pub use state::{use_reducer, use_state, Dispatch, SetState, SetStateAction};

pub type Key = u64;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
