use fastrand::Rng;

use crate::{
    core::{utils::SampleFloat, Particle},
    Float,
};

/// Pick the index of a reference particle with a bias towards fitter particles.
///
/// A uniformly random index is taken as the starting candidate, then the swarm is scanned once
/// from left to right. Particle `i` replaces the running candidate if a uniform draw falls below
/// `pressure`, its fitness is strictly greater than the candidate's, and `i != except`. The
/// particle at `except` can still be returned when it is the random start and nothing beats it.
///
/// With `pressure = 0` the random start is always returned; with `pressure = 1` the result is the
/// first fittest particle other than `except` (unless the start is already at least as fit).
/// One draw is made for the start and one gate draw per particle, regardless of the outcome.
///
/// Returns [`None`] for an empty swarm.
pub fn select_random_best(
    fitness: &[Float],
    pressure: Float,
    except: usize,
    rng: &mut Rng,
) -> Option<usize> {
    if fitness.is_empty() {
        return None;
    }
    let mut candidate = rng.usize(..fitness.len());
    for (i, &value) in fitness.iter().enumerate() {
        if rng.float() < pressure && value > fitness[candidate] && i != except {
            candidate = i;
        }
    }
    Some(candidate)
}

/// The arithmetic mean of the particles' current fitness, or `-inf` for an empty swarm.
pub fn mean_fitness(particles: &[Particle]) -> Float {
    if particles.is_empty() {
        return Float::NEG_INFINITY;
    }
    particles.iter().map(Particle::fitness).sum::<Float>() / particles.len() as Float
}
