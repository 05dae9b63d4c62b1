use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    core::{utils::SampleFloat, Interval, SwarmOptions},
    DVector, Float,
};

/// Fraction of an axis' span used as the upper limit of a random initial velocity.
pub const INITIAL_VELOCITY_FRACTION: Float = 0.05;

/// A single candidate solution with a position, velocity, and best known position.
///
/// The tuning coefficients are copied into the particle when it is created. Changing the
/// optimizer's options afterwards has no effect on existing particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    position: DVector<Float>,
    velocity: DVector<Float>,
    best_position: DVector<Float>,
    fitness: Float,
    best_fitness: Float,
    inertia_weight: Float,
    social: Float,
    personal: Float,
}

impl Particle {
    /// Create a new particle at `position` moving with `velocity`. The particle starts
    /// unevaluated: its fitness and best fitness are `-inf` and its best position is filled with
    /// `NaN` until [`Particle::store_position`] is first called.
    ///
    /// # Panics
    ///
    /// This method panics if `position` and `velocity` have different lengths.
    pub fn new(
        position: DVector<Float>,
        velocity: DVector<Float>,
        inertia_weight: Float,
        social: Float,
        personal: Float,
    ) -> Self {
        assert_eq!(
            position.len(),
            velocity.len(),
            "position and velocity must have the same dimension"
        );
        let best_position = DVector::from_element(position.len(), Float::NAN);
        Self {
            position,
            velocity,
            best_position,
            fitness: Float::NEG_INFINITY,
            best_fitness: Float::NEG_INFINITY,
            inertia_weight,
            social,
            personal,
        }
    }
    /// Create a new particle using the coefficients of the given [`SwarmOptions`].
    ///
    /// # Panics
    ///
    /// This method panics if `position` and `velocity` have different lengths.
    pub fn with_options(
        position: DVector<Float>,
        velocity: DVector<Float>,
        options: &SwarmOptions,
    ) -> Self {
        Self::new(
            position,
            velocity,
            options.inertia_weight,
            options.social,
            options.personal,
        )
    }
    /// Create a particle placed uniformly at random inside `domain`.
    ///
    /// For each axis the position is drawn from `[start, end)` and then the velocity is drawn
    /// from `[0, 0.05 * (end - start))`. The initial velocity is never negative, so a fresh swarm
    /// drifts towards the upper end of every axis during its first steps.
    pub fn random(domain: &[Interval], options: &SwarmOptions, rng: &mut Rng) -> Self {
        let (position, velocity): (Vec<Float>, Vec<Float>) = domain
            .iter()
            .map(|interval| {
                let x = rng.range(interval.start(), interval.end());
                let v = rng.float() * interval.span() * INITIAL_VELOCITY_FRACTION;
                (x, v)
            })
            .unzip();
        Self::with_options(
            DVector::from_vec(position),
            DVector::from_vec(velocity),
            options,
        )
    }
    /// Record the current position as the particle's best position.
    pub fn store_position(&mut self) {
        self.best_position.copy_from(&self.position);
    }
    /// A copy of the current position.
    pub fn position(&self) -> DVector<Float> {
        self.position.clone()
    }
    /// A copy of the best position found by this particle.
    pub fn best_position(&self) -> DVector<Float> {
        self.best_position.clone()
    }
    /// A copy of the current velocity.
    pub fn velocity(&self) -> DVector<Float> {
        self.velocity.clone()
    }
    /// The fitness at the current position (`-inf` before the first evaluation).
    pub const fn fitness(&self) -> Float {
        self.fitness
    }
    /// The best fitness this particle has ever reached.
    pub const fn best_fitness(&self) -> Float {
        self.best_fitness
    }
    /// The inertia weight captured at creation.
    pub const fn inertia_weight(&self) -> Float {
        self.inertia_weight
    }
    /// The social coefficient captured at creation.
    pub const fn social(&self) -> Float {
        self.social
    }
    /// The personal coefficient captured at creation.
    pub const fn personal(&self) -> Float {
        self.personal
    }
    /// The number of axes of the particle.
    pub fn dimension(&self) -> usize {
        self.position.len()
    }
    pub(crate) const fn position_ref(&self) -> &DVector<Float> {
        &self.position
    }
    /// Set the fitness of the current position and update the personal best if it improved.
    /// Returns `true` on improvement.
    pub(crate) fn record_fitness(&mut self, fitness: Float) -> bool {
        self.fitness = fitness;
        if self.fitness > self.best_fitness {
            self.best_fitness = self.fitness;
            self.store_position();
            true
        } else {
            false
        }
    }
    /// Update the velocity by pulling the particle towards `reference` (the current position of
    /// another particle) and towards its own best position. Two independent draws are made per
    /// axis, the social one first.
    pub fn update_velocity(&mut self, reference: &DVector<Float>, rng: &mut Rng) {
        for i in 0..self.position.len() {
            let r_social = rng.float();
            let r_personal = rng.float();
            self.velocity[i] = self.velocity[i] * self.inertia_weight
                + (reference[i] - self.position[i]) * r_social * self.social
                + (self.best_position[i] - self.position[i]) * r_personal * self.personal;
        }
    }
    /// Move the particle by its velocity. Positions are not clamped to any domain.
    pub fn update_position(&mut self) {
        self.position += &self.velocity;
    }
    /// An independent copy of the particle's observable state.
    pub fn snapshot(&self) -> ParticleSnapshot {
        ParticleSnapshot {
            position: self.position.clone(),
            fitness: self.fitness,
            best_position: self.best_position.clone(),
            best_fitness: self.best_fitness,
        }
    }
}

/// A read-only view of a [`Particle`] returned by
/// [`Optimizer::particles`](crate::core::Optimizer::particles).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSnapshot {
    /// The current position
    pub position: DVector<Float>,
    /// The fitness at the current position
    pub fitness: Float,
    /// The best position found so far
    pub best_position: DVector<Float>,
    /// The fitness at the best position
    pub best_fitness: Float,
}
