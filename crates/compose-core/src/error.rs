use thiserror::Error;

/// Integrity faults detected by the host runtime during a render pass.
///
/// A pass that records a fault is not committed: none of its effects run.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    /// A group that existed on the previous pass asked for a hook its slot
    /// does not hold (a hook was added, or hooks were reordered).
    #[error("hook at slot {slot} does not match the previous pass (requested {requested})")]
    HookMismatch {
        slot: usize,
        requested: &'static str,
    },

    /// A group that existed on the previous pass stopped calling some of its hooks.
    #[error("{count} hook(s) from the previous pass were not called, starting at slot {slot}")]
    HooksSkipped { slot: usize, count: usize },

    /// The dependency list at a call site changed length between passes.
    #[error("dependency list at slot {slot} changed length from {previous} to {current}")]
    DependencyArityChanged {
        slot: usize,
        previous: usize,
        current: usize,
    },
}
