use std::convert::Infallible;

use crate::{core::Completion, DVector, Float};

/// A trait which describes a function $`f(\mathbb{R}^n) \to \mathbb{R}`$ to be **maximized**.
///
/// The `ObjectiveFunction` trait takes a generic `E` representing any possible errors that might
/// be returned during function execution. Any `Fn(&DVector<Float>) -> Float` closure which is
/// `Send + Sync` implements `ObjectiveFunction<Infallible>`.
pub trait ObjectiveFunction<E = Infallible>: Send + Sync {
    /// The evaluation of the function at a point `x`.
    ///
    /// # Errors
    ///
    /// Returns an `Err(E)` if the evaluation fails. Users should implement this trait to return a
    /// [`std::convert::Infallible`] if the function evaluation never fails.
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, E>;
}

impl<F> ObjectiveFunction for F
where
    F: Fn(&DVector<Float>) -> Float + Send + Sync,
{
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        Ok(self(x))
    }
}

/// An objective function which reports its result through a [`Completion`] instead of returning
/// it.
///
/// The function is called once per particle during a step. It may call
/// [`Completion::complete`] right away, or hand the completion to another thread, a timer, a
/// worker pool, etc. and complete it later. The step only finishes once every completion has
/// fired; a completion which is dropped without firing stalls the step forever.
pub trait AsyncObjectiveFunction: Send + Sync {
    /// Start the evaluation of the function at a point `x` and eventually report the result to
    /// `done`.
    fn evaluate(&self, x: &DVector<Float>, done: Completion);
}

impl<F> AsyncObjectiveFunction for F
where
    F: Fn(&DVector<Float>, Completion) + Send + Sync,
{
    fn evaluate(&self, x: &DVector<Float>, done: Completion) {
        self(x, done);
    }
}
