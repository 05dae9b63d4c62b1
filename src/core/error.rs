use thiserror::Error;

/// Errors returned by [`Optimizer::step`](crate::core::Optimizer::step).
#[derive(Debug, Error)]
pub enum StepError<E> {
    /// A previous step is still waiting for evaluations to complete. The new request was ignored
    /// and the outstanding step continues undisturbed.
    #[error("a step is already in progress")]
    InProgress,
    /// The objective function failed. No particle was changed by the failed step.
    #[error("objective function failed: {0}")]
    Objective(E),
}

impl<E> StepError<E> {
    /// Returns `true` for [`StepError::InProgress`].
    pub const fn is_in_progress(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}
