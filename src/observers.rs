use std::{io::Write, ops::ControlFlow, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    core::{ParticleSnapshot, SwarmStatus},
    traits::SwarmObserver,
    DVector, Float,
};

/// A debugging observer which logs the step, best fitness and mean fitness through `tracing`.
///
/// # Usage:
///
/// ```rust
/// use swarmopt::prelude::*;
/// use swarmopt::observers::DebugObserver;
/// use swarmopt::test_functions::Sphere;
///
/// let optimizer = Optimizer::new();
/// let problem = Sphere { n: 2 };
/// optimizer.init(10, problem.domain(5.0));
/// optimizer.set_objective_function(problem);
/// let mut runner = Runner::new(optimizer)
///     .setup(|r| r.with_max_steps(10).with_observer(DebugObserver::build()));
/// let summary = runner.run().unwrap();
/// // ^ This will log a message for each step
/// assert_eq!(summary.steps, 10);
/// ```
pub struct DebugObserver;
impl DebugObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self))
    }
}
impl SwarmObserver for DebugObserver {
    fn callback(&mut self, step: usize, status: &SwarmStatus) -> ControlFlow<()> {
        info!(
            step,
            iteration = status.iteration,
            best_fitness = status.best_fitness,
            mean_fitness = status.mean_fitness,
            "swarm step"
        );
        ControlFlow::Continue(())
    }
}

/// An observer which stores the swarm particles' history as well as the history of the
/// best-ever position and fitness.
#[derive(Serialize, Deserialize, Default, Clone)]
pub struct TrackingSwarmObserver {
    /// The history of the swarm particles
    pub history: Vec<Vec<ParticleSnapshot>>,
    /// The history of the best position found by the swarm
    pub best_history: Vec<Option<DVector<Float>>>,
    /// The history of the best fitness found by the swarm
    pub best_fitness_history: Vec<Float>,
    /// The history of the mean fitness of the swarm
    pub mean_fitness_history: Vec<Float>,
}

impl TrackingSwarmObserver {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build() -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self::default()))
    }
    /// Export the recorded history as a Python pickle (readable with `pickle.load`).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_pickle<W: Write>(&self, writer: &mut W) -> Result<(), serde_pickle::Error> {
        serde_pickle::to_writer(writer, self, serde_pickle::SerOptions::default())
    }
}

impl SwarmObserver for TrackingSwarmObserver {
    fn callback(&mut self, _step: usize, status: &SwarmStatus) -> ControlFlow<()> {
        self.history.push(status.particles.clone());
        self.best_history.push(status.best_position.clone());
        self.best_fitness_history.push(status.best_fitness);
        self.mean_fitness_history.push(status.mean_fitness);
        ControlFlow::Continue(())
    }
}

/// An observer which stops a run once the best-ever fitness reaches a target value.
#[derive(Debug, Clone, Copy)]
pub struct FitnessTarget {
    /// The fitness at which the run stops
    pub target: Float,
}

impl FitnessTarget {
    /// Finalize the [`SwarmObserver`] by wrapping it in an [`Arc`] and [`RwLock`]
    pub fn build(target: Float) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(Self { target }))
    }
}

impl SwarmObserver for FitnessTarget {
    fn callback(&mut self, _step: usize, status: &SwarmStatus) -> ControlFlow<()> {
        if status.best_fitness >= self.target {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}
