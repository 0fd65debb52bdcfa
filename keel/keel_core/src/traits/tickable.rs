//! Per-frame lifecycle callbacks.

/// A component receiving per-frame lifecycle callbacks from the orchestrator.
///
/// The orchestrator holds registrants in registration order and dispatches
/// `on_tick` and `on_deinitialize` in that order. Registration invokes
/// `on_initialize` synchronously before `register_tickable` returns, and
/// unregistration invokes `on_deinitialize` synchronously; this ordering
/// guarantee is part of the contract, not an implementation detail.
///
/// Callbacks run on the control thread; implementors needing mutable state
/// use interior mutability.
pub trait Tickable: Send + Sync {
    /// Called exactly once, when the tickable is registered.
    fn on_initialize(&self);

    /// Called once per frame while registered.
    fn on_tick(&self);

    /// Called exactly once, on unregistration or orchestrator deinit.
    fn on_deinitialize(&self);
}
