/// A trait for abort signals.
/// This trait is used by the [`Runner`](crate::core::Runner) to check if the user has requested
/// to stop the optimization between two steps.
pub trait AbortSignal: Send + Sync {
    /// Return `true` if the user has requested to abort the optimization.
    fn is_aborted(&self) -> bool;
    /// Abort the optimization. Make `is_aborted()` return `true`.
    fn abort(&self);
    /// Reset the abort signal. Make `is_aborted()` return `false`.
    fn reset(&self);
}
