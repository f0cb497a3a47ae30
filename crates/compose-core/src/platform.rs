//! Platform abstraction for runtime scheduling.
//!
//! The runtime never drives render passes itself. It tells the host that a
//! pass is wanted and the host decides when to call
//! [`Composition::render`](crate::Composition::render).

/// Schedules render passes for the runtime.
///
/// Implementations must be safe to share across threads even though the
/// runtime itself is single-threaded, so a host event loop can hold one.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host run another render pass.
    fn schedule_frame(&self);
}
