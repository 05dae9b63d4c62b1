use std::{convert::Infallible, sync::Arc};

use parking_lot::RwLock;
use tracing::info;

use crate::{
    core::{Optimizer, StepError, SwarmSummary},
    traits::{AbortSignal, SwarmObserver},
};

const DEFAULT_MAX_STEPS: usize = 4000;
const MAX_STEPS_MESSAGE: &str = "MAX STEPS";
const ABORT_MESSAGE: &str = "Abort signal received";
const OBSERVER_MESSAGE: &str = "Observer requested termination";
const INCOMPLETE_MESSAGE: &str = "Step did not complete";

/// The main struct used for running an [`Optimizer`] for many steps.
///
/// The optimizer must already be initialized and have an objective function, otherwise the run
/// stops before its first step. Before every step the [`AbortSignal`] (if any) is checked, and
/// after every step each [`SwarmObserver`] is called with a snapshot of the swarm.
pub struct Runner<E = Infallible> {
    optimizer: Optimizer<E>,
    observers: Vec<Arc<RwLock<dyn SwarmObserver>>>,
    abort_signal: Option<Box<dyn AbortSignal>>,
    max_steps: usize,
}

impl<E: 'static> Runner<E> {
    /// Creates a new [`Runner`] driving the given [`Optimizer`].
    pub fn new(optimizer: Optimizer<E>) -> Self {
        Self {
            optimizer,
            observers: Vec::default(),
            abort_signal: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Convenience method to use chainable methods to set up the [`Runner`].
    pub fn setup<F>(mut self, f: F) -> Self
    where
        F: FnOnce(&mut Self) -> &mut Self,
    {
        f(&mut self);
        self
    }

    /// Set the maximum number of steps to perform (default: 4000).
    pub fn with_max_steps(&mut self, max_steps: usize) -> &mut Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the [`AbortSignal`] of the [`Runner`].
    pub fn with_abort_signal<A: AbortSignal + 'static>(&mut self, abort_signal: A) -> &mut Self {
        self.abort_signal = Some(Box::new(abort_signal));
        self
    }

    /// Adds a single [`SwarmObserver`] to the [`Runner`].
    pub fn with_observer<O: SwarmObserver + 'static>(
        &mut self,
        observer: Arc<RwLock<O>>,
    ) -> &mut Self {
        self.observers.push(observer);
        self
    }

    /// The driven [`Optimizer`].
    pub const fn optimizer(&self) -> &Optimizer<E> {
        &self.optimizer
    }

    /// Run synchronous steps until the maximum number of steps is reached, the abort signal is
    /// raised, or an observer asks to stop. The abort signal is reset first.
    ///
    /// The run also stops when a step does not complete, for example before
    /// [`Optimizer::init`] or with an asynchronous objective function whose evaluations are still
    /// outstanding. Use [`Runner::run_async`] for asynchronous objective functions.
    ///
    /// # Errors
    ///
    /// Returns the first [`StepError`] raised by [`Optimizer::step`].
    pub fn run(&mut self) -> Result<SwarmSummary, StepError<E>> {
        self.reset_abort_signal();
        let mut message = MAX_STEPS_MESSAGE;
        for current_step in 0..self.max_steps {
            if self.is_aborted() {
                message = ABORT_MESSAGE;
                break;
            }
            let iteration = self.optimizer.iteration();
            self.optimizer.step()?;
            if self.optimizer.iteration() == iteration {
                message = INCOMPLETE_MESSAGE;
                break;
            }
            if self.notify(current_step) {
                message = OBSERVER_MESSAGE;
                break;
            }
        }
        Ok(self.finish(message))
    }

    /// Like [`Runner::run`], but waits for every step with [`Optimizer::step_async`].
    ///
    /// # Errors
    ///
    /// Returns the first [`StepError`] raised by [`Optimizer::step_async`].
    pub async fn run_async(&mut self) -> Result<SwarmSummary, StepError<E>> {
        self.reset_abort_signal();
        let mut message = MAX_STEPS_MESSAGE;
        for current_step in 0..self.max_steps {
            if self.is_aborted() {
                message = ABORT_MESSAGE;
                break;
            }
            if !self.optimizer.step_async().await? {
                message = INCOMPLETE_MESSAGE;
                break;
            }
            if self.notify(current_step) {
                message = OBSERVER_MESSAGE;
                break;
            }
        }
        Ok(self.finish(message))
    }

    fn is_aborted(&self) -> bool {
        self.abort_signal
            .as_ref()
            .is_some_and(|signal| signal.is_aborted())
    }

    fn reset_abort_signal(&self) {
        if let Some(signal) = &self.abort_signal {
            signal.reset();
        }
    }

    fn notify(&self, current_step: usize) -> bool {
        if self.observers.is_empty() {
            return false;
        }
        let status = self.optimizer.status();
        let mut observer_termination = false;
        for observer in &self.observers {
            observer_termination = observer
                .write()
                .callback(current_step, &status)
                .is_break()
                || observer_termination;
        }
        observer_termination
    }

    fn finish(&self, message: &str) -> SwarmSummary {
        let summary = self.optimizer.summary().with_message(message);
        info!(
            steps = summary.steps,
            best_fitness = summary.fx,
            message,
            "optimization finished"
        );
        summary
    }
}
