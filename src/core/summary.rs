use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::{core::ParticleSnapshot, DVector, Float};

/// A snapshot of the whole swarm, handed to [`SwarmObserver`](crate::traits::SwarmObserver)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmStatus {
    /// The number of completed steps since the last `init`
    pub iteration: usize,
    /// Every particle in swarm order
    pub particles: Vec<ParticleSnapshot>,
    /// The best position found since the last `init`
    pub best_position: Option<DVector<Float>>,
    /// The fitness at [`SwarmStatus::best_position`] (`-inf` before the first evaluation)
    pub best_fitness: Float,
    /// The mean of the particles' current fitness
    pub mean_fitness: Float,
}

/// A struct that holds the results of an optimization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwarmSummary {
    /// Why the run ended
    pub message: String,
    /// The best position found (empty if nothing was evaluated)
    pub x: Vec<Float>,
    /// The fitness at [`SwarmSummary::x`]
    pub fx: Float,
    /// The mean fitness of the swarm at the end of the run
    pub mean_fx: Float,
    /// The number of completed steps since the last `init`
    pub steps: usize,
    /// The number of particles in the swarm
    pub n_particles: usize,
    /// The number of objective function evaluations (`steps * n_particles`)
    pub fitness_evals: usize,
}

impl Default for SwarmSummary {
    fn default() -> Self {
        Self {
            message: String::new(),
            x: Vec::new(),
            fx: Float::NEG_INFINITY,
            mean_fx: Float::NEG_INFINITY,
            steps: 0,
            n_particles: 0,
            fitness_evals: 0,
        }
    }
}

impl SwarmSummary {
    /// Set the message describing the end of the run.
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = message.to_string();
        self
    }
}

impl From<&SwarmStatus> for SwarmSummary {
    fn from(status: &SwarmStatus) -> Self {
        Self {
            message: String::new(),
            x: status
                .best_position
                .as_ref()
                .map(|x| x.iter().copied().collect())
                .unwrap_or_default(),
            fx: status.best_fitness,
            mean_fx: status.mean_fitness,
            steps: status.iteration,
            n_particles: status.particles.len(),
            fitness_evals: status.iteration * status.particles.len(),
        }
    }
}

impl Display for SwarmSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SWARM RESULTS")?;
        writeln!(f, "Message:   {}", self.message)?;
        writeln!(f, "f(x):      {:.5}", self.fx)?;
        writeln!(f, "mean f(x): {:.5}", self.mean_fx)?;
        writeln!(
            f,
            "Steps:     {} ({} particles, {} evaluations)",
            self.steps, self.n_particles, self.fitness_evals
        )?;
        for (i, x) in self.x.iter().enumerate() {
            writeln!(f, "  x_{i} = {x:.5}")?;
        }
        Ok(())
    }
}
