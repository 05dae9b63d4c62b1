use std::{convert::Infallible, fmt::Debug, sync::Arc};

use fastrand::Rng;
use futures::channel::oneshot;
use parking_lot::Mutex;
use tracing::{debug, error, trace, warn};

use crate::{
    core::{
        selection::{mean_fitness, select_random_best},
        Generation, PartialOptions, Particle, ParticleSnapshot, StepError, SwarmOptions,
        SwarmStatus, SwarmSummary,
    },
    traits::{AsyncObjectiveFunction, ObjectiveFunction},
    DVector, Float,
};

type StepCallback = Box<dyn FnOnce() + Send>;

/// The registered objective function together with its calling convention.
enum Objective<E> {
    Sync(Arc<dyn ObjectiveFunction<E>>),
    Async(Arc<dyn AsyncObjectiveFunction>),
}

impl<E> Clone for Objective<E> {
    fn clone(&self) -> Self {
        match self {
            Self::Sync(function) => Self::Sync(Arc::clone(function)),
            Self::Async(function) => Self::Async(Arc::clone(function)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unconfigured,
    Initialized,
    Stepping,
}

struct Swarm<E> {
    particles: Vec<Particle>,
    objective: Option<Objective<E>>,
    options: SwarmOptions,
    best_position_ever: Option<DVector<Float>>,
    best_fitness_ever: Float,
    iteration: usize,
    epoch: u64,
    state: State,
    rng: Rng,
}

impl<E> Swarm<E> {
    fn new(rng: Rng) -> Self {
        Self {
            particles: Vec::new(),
            objective: None,
            options: SwarmOptions::default(),
            best_position_ever: None,
            best_fitness_ever: Float::NEG_INFINITY,
            iteration: 0,
            epoch: 0,
            state: State::Unconfigured,
            rng,
        }
    }

    /// Apply the fitness of a finished evaluation round and move the swarm. Returns `false` if
    /// the round was abandoned by a later `init`.
    fn finish_round(&mut self, epoch: u64, fitness: &[Float]) -> bool {
        if epoch != self.epoch || self.state != State::Stepping {
            debug!(
                round_epoch = epoch,
                current_epoch = self.epoch,
                "discarding evaluations of an abandoned step"
            );
            return false;
        }
        self.track_bests(fitness);
        self.move_particles();
        self.iteration += 1;
        self.state = State::Initialized;
        debug!(
            iteration = self.iteration,
            best_fitness = self.best_fitness_ever,
            "step complete"
        );
        true
    }

    fn track_bests(&mut self, fitness: &[Float]) {
        for (particle, &value) in self.particles.iter_mut().zip(fitness) {
            if particle.record_fitness(value) && value > self.best_fitness_ever {
                self.best_fitness_ever = value;
                self.best_position_ever = Some(particle.position());
            }
        }
    }

    fn move_particles(&mut self) {
        let fitness: Vec<Float> = self.particles.iter().map(Particle::fitness).collect();
        for index in 0..self.particles.len() {
            let Some(reference) =
                select_random_best(&fitness, self.options.pressure, index, &mut self.rng)
            else {
                continue;
            };
            trace!(particle = index, reference, "selected reference particle");
            let reference = self.particles[reference].position_ref().clone();
            self.particles[index].update_velocity(&reference, &mut self.rng);
        }
        for particle in &mut self.particles {
            particle.update_position();
        }
    }

    fn status(&self) -> SwarmStatus {
        SwarmStatus {
            iteration: self.iteration,
            particles: self.particles.iter().map(Particle::snapshot).collect(),
            best_position: self.best_position_ever.clone(),
            best_fitness: self.best_fitness_ever,
            mean_fitness: mean_fitness(&self.particles),
        }
    }
}

/// A particle swarm optimizer which **maximizes** an objective function.
///
/// The optimizer moves through three states: it starts unconfigured, becomes initialized after
/// [`Optimizer::init`], and is stepping while the evaluations of a step are outstanding. Only
/// [`Optimizer::init`] resets the swarm and its best-ever record.
///
/// Every step runs the following phases in order:
/// 1. every particle's position is scored by the objective function,
/// 2. personal bests and the swarm's best-ever record are updated,
/// 3. each particle picks a reference particle with
///    [`select_random_best`](crate::core::selection::select_random_best) and updates its
///    velocity against the reference's current position,
/// 4. every particle moves by its velocity.
///
/// An [`Optimizer`] is a handle: clones share the same swarm, which lets an asynchronous step's
/// callback schedule the next step. All random draws (particle creation, reference selection,
/// velocity updates) come from one [`Rng`] owned by the optimizer, see [`Optimizer::seed`].
pub struct Optimizer<E = Infallible> {
    swarm: Arc<Mutex<Swarm<E>>>,
}

impl<E> Clone for Optimizer<E> {
    fn clone(&self) -> Self {
        Self {
            swarm: Arc::clone(&self.swarm),
        }
    }
}

impl<E> Debug for Optimizer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let swarm = self.swarm.lock();
        f.debug_struct("Optimizer")
            .field("state", &swarm.state)
            .field("n_particles", &swarm.particles.len())
            .field("iteration", &swarm.iteration)
            .field("options", &swarm.options)
            .field("best_fitness", &swarm.best_fitness_ever)
            .finish_non_exhaustive()
    }
}

impl Default for Optimizer<Infallible> {
    fn default() -> Self {
        Self::new()
    }
}

impl Optimizer<Infallible> {
    /// Construct a new optimizer for infallible objective functions, seeded from entropy.
    pub fn new() -> Self {
        Self::with_rng(Rng::new())
    }
}

impl<E: 'static> Optimizer<E> {
    /// Construct a new optimizer which draws all of its random numbers from `rng`.
    pub fn with_rng(rng: Rng) -> Self {
        Self {
            swarm: Arc::new(Mutex::new(Swarm::new(rng))),
        }
    }
    /// Reseed the optimizer's random number generator.
    pub fn seed(&self, seed: u64) {
        self.swarm.lock().rng.seed(seed);
    }
    /// Merge the given options into the current ones. Only particles created by later calls to
    /// [`Optimizer::init`] pick up the new coefficients; the selection pressure applies from the
    /// next step on.
    pub fn set_options<O: Into<PartialOptions>>(&self, options: O) {
        self.swarm.lock().options.merge(&options.into());
    }
    /// The current options.
    pub fn options(&self) -> SwarmOptions {
        self.swarm.lock().options
    }
    /// Register a synchronous objective function. The function is not called here.
    pub fn set_objective_function<F>(&self, function: F)
    where
        F: ObjectiveFunction<E> + 'static,
    {
        self.swarm.lock().objective = Some(Objective::Sync(Arc::new(function)));
    }
    /// Register an asynchronous objective function, see [`AsyncObjectiveFunction`]. The function
    /// is not called here.
    pub fn set_async_objective_function<F>(&self, function: F)
    where
        F: AsyncObjectiveFunction + 'static,
    {
        self.swarm.lock().objective = Some(Objective::Async(Arc::new(function)));
    }
    /// Create a fresh swarm of `n_particles` particles, discarding the previous one along with
    /// its best-ever record and iteration count.
    ///
    /// The swarm is either sampled from a domain (anything which converts into
    /// [`Generation::Intervals`], such as a `Vec<Interval>`) with the current options, or built by
    /// a [`Generation::Factory`]. Calling `init` while an asynchronous step is outstanding
    /// abandons that step: its late evaluations are ignored and its callback never runs.
    ///
    /// Every particle must have the same dimension. A factory which breaks this leaves the
    /// optimizer empty and uninitialized (see [`Optimizer::is_initialized`]), so later steps are
    /// no-ops until the next successful `init`.
    pub fn init<G: Into<Generation>>(&self, n_particles: usize, generation: G) {
        let generation = generation.into();
        let mut guard = self.swarm.lock();
        let swarm = &mut *guard;
        if swarm.state == State::Stepping {
            warn!("re-initializing while a step is outstanding, its evaluations will be discarded");
        }
        let particles: Vec<Particle> = match generation {
            Generation::Intervals(domain) => {
                let options = swarm.options;
                (0..n_particles)
                    .map(|_| Particle::random(&domain, &options, &mut swarm.rng))
                    .collect()
            }
            Generation::Factory(mut factory) => {
                (0..n_particles).map(|_| factory(&mut swarm.rng)).collect()
            }
        };
        swarm.best_position_ever = None;
        swarm.best_fitness_ever = Float::NEG_INFINITY;
        swarm.iteration = 0;
        swarm.epoch = swarm.epoch.wrapping_add(1);
        let dimension = particles.first().map_or(0, Particle::dimension);
        if particles.iter().any(|p| p.dimension() != dimension) {
            error!(
                n_particles,
                "particles of the new swarm have differing dimensions, the swarm was rejected"
            );
            swarm.particles = Vec::new();
            swarm.state = State::Unconfigured;
            return;
        }
        swarm.particles = particles;
        swarm.state = State::Initialized;
        debug!(n_particles, dimension, "swarm initialized");
    }
    /// Returns `true` once [`Optimizer::init`] has produced a usable swarm.
    pub fn is_initialized(&self) -> bool {
        self.swarm.lock().state != State::Unconfigured
    }
    /// Perform one iteration of the swarm.
    ///
    /// With a synchronous objective function the step is complete when this method returns.
    /// With an asynchronous one this method returns as soon as every evaluation has been
    /// requested; use [`Optimizer::step_then`] or [`Optimizer::step_async`] to learn when the step
    /// is done.
    ///
    /// Calling `step` before [`Optimizer::init`] or before an objective function has been
    /// registered does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`StepError::InProgress`] if a previous step is still waiting for evaluations,
    /// and [`StepError::Objective`] if a synchronous objective function fails. In both cases the
    /// swarm is left as it was.
    pub fn step(&self) -> Result<(), StepError<E>> {
        self.start_step(None)
    }
    /// Like [`Optimizer::step`], but calls `callback` once the step is complete. The callback
    /// runs on whichever thread completed the last evaluation, after the optimizer has been
    /// unlocked, so it may start another step. It is dropped without being called if no step was
    /// started or the step was abandoned by [`Optimizer::init`].
    ///
    /// # Errors
    ///
    /// See [`Optimizer::step`].
    pub fn step_then<F>(&self, callback: F) -> Result<(), StepError<E>>
    where
        F: FnOnce() + Send + 'static,
    {
        self.start_step(Some(Box::new(callback)))
    }
    /// Perform one iteration and wait for all of its evaluations to complete.
    ///
    /// Resolves to `true` once the step has completed and `false` if it never ran (see
    /// [`Optimizer::step`]) or was abandoned by [`Optimizer::init`]. It never resolves if an
    /// asynchronous evaluation never completes.
    ///
    /// # Errors
    ///
    /// See [`Optimizer::step`].
    pub async fn step_async(&self) -> Result<bool, StepError<E>> {
        let (sender, receiver) = oneshot::channel::<()>();
        self.step_then(move || {
            // the receiver only goes away if the future itself was dropped
            let _ = sender.send(());
        })?;
        // the sender is dropped unsent when the step never ran or was abandoned
        Ok(receiver.await.is_ok())
    }
    fn start_step(&self, callback: Option<StepCallback>) -> Result<(), StepError<E>> {
        let (objective, positions, epoch) = {
            let mut swarm = self.swarm.lock();
            match swarm.state {
                State::Stepping => {
                    warn!("step requested while a previous step is still in progress");
                    return Err(StepError::InProgress);
                }
                State::Unconfigured => {
                    warn!("step requested before the swarm was initialized, ignoring");
                    return Ok(());
                }
                State::Initialized => {}
            }
            let Some(objective) = swarm.objective.clone() else {
                warn!("step requested before an objective function was set, ignoring");
                return Ok(());
            };
            let positions: Vec<DVector<Float>> =
                swarm.particles.iter().map(Particle::position).collect();
            swarm.state = State::Stepping;
            (objective, positions, swarm.epoch)
        };
        match objective {
            Objective::Sync(function) => {
                let guard = SyncStepGuard {
                    swarm: &self.swarm,
                    epoch,
                };
                let fitness = positions
                    .iter()
                    .map(|x| function.evaluate(x))
                    .collect::<Result<Vec<Float>, E>>()
                    .map_err(StepError::Objective)?;
                let finished = self.swarm.lock().finish_round(epoch, &fitness);
                // released before the callback, which may start the next step
                drop(guard);
                if finished {
                    if let Some(callback) = callback {
                        callback();
                    }
                }
            }
            Objective::Async(function) => {
                let round = Arc::new(Round {
                    swarm: Arc::clone(&self.swarm),
                    epoch,
                    pending: Mutex::new(Pending {
                        fitness: vec![None; positions.len()],
                        remaining: positions.len(),
                        callback,
                    }),
                });
                if positions.is_empty() {
                    round.finish();
                }
                for (index, x) in positions.iter().enumerate() {
                    let sink: Arc<dyn RoundSink> = round.clone();
                    function.evaluate(x, Completion::new(index, sink));
                }
            }
        }
        Ok(())
    }
    /// Snapshots of every particle, in swarm order.
    pub fn particles(&self) -> Vec<ParticleSnapshot> {
        self.swarm
            .lock()
            .particles
            .iter()
            .map(Particle::snapshot)
            .collect()
    }
    /// The current position of every particle, in swarm order.
    pub fn particle_positions(&self) -> Vec<DVector<Float>> {
        self.swarm
            .lock()
            .particles
            .iter()
            .map(Particle::position)
            .collect()
    }
    /// The personal best position of every particle, in swarm order.
    pub fn particle_best_positions(&self) -> Vec<DVector<Float>> {
        self.swarm
            .lock()
            .particles
            .iter()
            .map(Particle::best_position)
            .collect()
    }
    /// The best position found since the last [`Optimizer::init`], or [`None`] if nothing has
    /// been evaluated yet.
    pub fn best_position(&self) -> Option<DVector<Float>> {
        self.swarm.lock().best_position_ever.clone()
    }
    /// The best fitness found since the last [`Optimizer::init`] (`-inf` if nothing has been
    /// evaluated yet).
    pub fn best_fitness(&self) -> Float {
        self.swarm.lock().best_fitness_ever
    }
    /// The mean of the particles' current fitness (`-inf` for an empty or unevaluated swarm).
    pub fn mean_fitness(&self) -> Float {
        mean_fitness(&self.swarm.lock().particles)
    }
    /// The number of completed steps since the last [`Optimizer::init`].
    pub fn iteration(&self) -> usize {
        self.swarm.lock().iteration
    }
    /// Returns `true` while a step is waiting for evaluations.
    pub fn is_stepping(&self) -> bool {
        self.swarm.lock().state == State::Stepping
    }
    /// The number of particles in the swarm.
    pub fn len(&self) -> usize {
        self.swarm.lock().particles.len()
    }
    /// Returns `true` if the swarm has no particles (including before [`Optimizer::init`]).
    pub fn is_empty(&self) -> bool {
        self.swarm.lock().particles.is_empty()
    }
    /// The dimension of the search space (`0` before [`Optimizer::init`]).
    pub fn dimension(&self) -> usize {
        self.swarm
            .lock()
            .particles
            .first()
            .map_or(0, Particle::dimension)
    }
    /// A snapshot of the whole swarm.
    pub fn status(&self) -> SwarmStatus {
        self.swarm.lock().status()
    }
    /// A summary of the current best result.
    pub fn summary(&self) -> SwarmSummary {
        SwarmSummary::from(&self.status())
    }
}

/// Returns a synchronous step to [`State::Initialized`] when it ends without finishing the
/// round, either through an objective error or a panic.
struct SyncStepGuard<'a, E> {
    swarm: &'a Mutex<Swarm<E>>,
    epoch: u64,
}

impl<E> Drop for SyncStepGuard<'_, E> {
    fn drop(&mut self) {
        let mut swarm = self.swarm.lock();
        if swarm.epoch == self.epoch && swarm.state == State::Stepping {
            swarm.state = State::Initialized;
        }
    }
}

/// The receiving end of the completions of one asynchronous step.
trait RoundSink: Send + Sync {
    fn record(&self, index: usize, fitness: Float);
}

struct Pending {
    fitness: Vec<Option<Float>>,
    remaining: usize,
    callback: Option<StepCallback>,
}

struct Round<E> {
    swarm: Arc<Mutex<Swarm<E>>>,
    epoch: u64,
    pending: Mutex<Pending>,
}

impl<E> Round<E> {
    fn finish(&self) {
        let (fitness, callback) = {
            let mut pending = self.pending.lock();
            let fitness: Vec<Float> = pending
                .fitness
                .iter()
                .map(|value| value.unwrap_or(Float::NEG_INFINITY))
                .collect();
            (fitness, pending.callback.take())
        };
        let finished = self.swarm.lock().finish_round(self.epoch, &fitness);
        if finished {
            if let Some(callback) = callback {
                callback();
            }
        }
    }
}

impl<E> RoundSink for Round<E> {
    fn record(&self, index: usize, fitness: Float) {
        let done = {
            let mut pending = self.pending.lock();
            if pending.fitness[index].replace(fitness).is_none() {
                pending.remaining -= 1;
            }
            trace!(
                particle = index,
                fitness,
                remaining = pending.remaining,
                "evaluation complete"
            );
            pending.remaining == 0
        };
        if done {
            self.finish();
        }
    }
}

/// A handle for reporting the fitness of one particle during an asynchronous step.
///
/// Each particle receives exactly one [`Completion`] per step. [`Completion::complete`] consumes
/// it, so a result can be reported at most once. Dropping a completion without completing it
/// leaves the step outstanding forever; this is logged as an error.
pub struct Completion {
    index: usize,
    sink: Option<Arc<dyn RoundSink>>,
}

impl Completion {
    fn new(index: usize, sink: Arc<dyn RoundSink>) -> Self {
        Self {
            index,
            sink: Some(sink),
        }
    }
    /// The index of the particle being evaluated.
    pub const fn index(&self) -> usize {
        self.index
    }
    /// Report the fitness of the particle.
    pub fn complete(mut self, fitness: Float) {
        if let Some(sink) = self.sink.take() {
            sink.record(self.index, fitness);
        }
    }
}

impl Debug for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Completion")
            .field("index", &self.index)
            .field("completed", &self.sink.is_none())
            .finish()
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sink.is_some() {
            error!(
                particle = self.index,
                "evaluation dropped without completing, the step will never finish"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        panic::AssertUnwindSafe,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use approx::assert_relative_eq;
    use futures::FutureExt;

    use super::*;
    use crate::core::Interval;

    fn domain() -> Vec<Interval> {
        vec![Interval::new(0.0, 1.0)]
    }

    #[test]
    fn test_empty_state_before_init() {
        let optimizer = Optimizer::new();
        assert_eq!(optimizer.best_position(), None);
        assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
        assert_eq!(optimizer.mean_fitness(), Float::NEG_INFINITY);
        assert!(optimizer.particles().is_empty());
        assert_eq!(optimizer.dimension(), 0);
        assert!(optimizer.step().is_ok());
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn test_step_without_objective_is_a_no_op() {
        let optimizer = Optimizer::new();
        optimizer.init(3, domain());
        let before = optimizer.particles();
        assert!(optimizer.step().is_ok());
        assert_eq!(optimizer.particles(), before);
        assert_eq!(optimizer.iteration(), 0);
        assert!(!optimizer.is_stepping());
    }

    #[test]
    fn test_sync_step_constant_objective() {
        let optimizer = Optimizer::new();
        optimizer.init(2, domain());
        optimizer.set_objective_function(|_: &DVector<Float>| 123.0);
        optimizer.step().unwrap();
        assert_eq!(optimizer.best_fitness(), 123.0);
        assert!(optimizer.best_position().is_some());
        assert_eq!(optimizer.iteration(), 1);
    }

    #[test]
    fn test_mean_fitness_after_step() {
        let optimizer = Optimizer::new();
        optimizer.init(2, domain());
        let fitness = Mutex::new(123.0);
        optimizer.set_objective_function(move |_: &DVector<Float>| {
            let mut fitness = fitness.lock();
            *fitness += 4.0;
            *fitness
        });
        optimizer.step().unwrap();
        assert_eq!(optimizer.mean_fitness(), 129.0);
        assert_eq!(optimizer.best_fitness(), 131.0);
    }

    #[test]
    fn test_set_options_merges() {
        let optimizer = Optimizer::new();
        optimizer.set_options(PartialOptions::default().with_social(0.7));
        optimizer.set_options(PartialOptions::default().with_pressure(1.0));
        let options = optimizer.options();
        assert_eq!(options.social, 0.7);
        assert_eq!(options.pressure, 1.0);
        assert_eq!(options.inertia_weight, 0.8);
        assert_eq!(options.personal, 0.4);
    }

    #[test]
    fn test_options_are_captured_at_creation() {
        let optimizer: Optimizer = Optimizer::with_rng(Rng::with_seed(0));
        optimizer.init(1, domain());
        optimizer.set_options(SwarmOptions::default().with_inertia_weight(0.0));
        optimizer.set_objective_function(|_: &DVector<Float>| 0.0);
        let velocity_before = {
            let swarm = optimizer.swarm.lock();
            swarm.particles[0].velocity()[0]
        };
        // a single particle is its own reference and its own best, so only inertia remains
        optimizer.step().unwrap();
        let swarm = optimizer.swarm.lock();
        assert_eq!(swarm.particles[0].inertia_weight(), 0.8);
        assert_relative_eq!(swarm.particles[0].velocity()[0], velocity_before * 0.8);
    }

    #[test]
    fn test_factory_generation() {
        let optimizer = Optimizer::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        optimizer.init(
            4,
            Generation::factory(move |_rng| {
                counter.fetch_add(1, Ordering::SeqCst);
                Particle::new(
                    DVector::from_vec(vec![100.0, 200.0]),
                    DVector::zeros(2),
                    0.8,
                    0.4,
                    0.4,
                )
            }),
        );
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(optimizer.len(), 4);
        assert_eq!(optimizer.dimension(), 2);
        for position in optimizer.particle_positions() {
            assert_eq!(position.as_slice(), &[100.0, 200.0]);
        }
    }

    #[test]
    fn test_init_resets_best_ever() {
        let optimizer = Optimizer::new();
        optimizer.set_objective_function(|x: &DVector<Float>| x[0]);
        optimizer.init(5, domain());
        optimizer.step().unwrap();
        assert!(optimizer.best_fitness() > Float::NEG_INFINITY);
        optimizer.init(5, domain());
        assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
        assert_eq!(optimizer.best_position(), None);
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn test_objective_error_leaves_swarm_untouched() {
        struct Failing;
        impl ObjectiveFunction<String> for Failing {
            fn evaluate(&self, x: &DVector<Float>) -> Result<Float, String> {
                if x[0] > 0.5 {
                    Err("too large".to_string())
                } else {
                    Ok(x[0])
                }
            }
        }
        let optimizer: Optimizer<String> = Optimizer::with_rng(Rng::with_seed(5));
        optimizer.init(
            2,
            Generation::factory(|_rng| {
                Particle::new(
                    DVector::from_vec(vec![0.9]),
                    DVector::zeros(1),
                    0.8,
                    0.4,
                    0.4,
                )
            }),
        );
        optimizer.set_objective_function(Failing);
        let before = optimizer.particles();
        match optimizer.step() {
            Err(StepError::Objective(message)) => assert_eq!(message, "too large"),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(optimizer.particles().len(), before.len());
        assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
        assert!(!optimizer.is_stepping());
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn test_async_completions_out_of_order() {
        let optimizer = Optimizer::new();
        optimizer.init(3, domain());
        let held: Arc<Mutex<Vec<Completion>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&held);
        optimizer.set_async_objective_function(move |_: &DVector<Float>, done: Completion| {
            sink.lock().push(done);
        });
        let called = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&called);
        optimizer
            .step_then(move || {
                flag.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert!(optimizer.is_stepping());
        assert!(matches!(optimizer.step(), Err(StepError::InProgress)));

        let mut completions = std::mem::take(&mut *held.lock());
        completions.reverse();
        for done in completions {
            let index = done.index() as Float;
            assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
            done.complete(10.0 + index);
        }
        assert_eq!(called.load(Ordering::SeqCst), 1);
        assert!(!optimizer.is_stepping());
        assert_eq!(optimizer.best_fitness(), 12.0);
        assert_relative_eq!(optimizer.mean_fitness(), 11.0);
    }

    #[test]
    fn test_async_synchronous_completion() {
        let optimizer = Optimizer::new();
        optimizer.init(4, domain());
        optimizer.set_async_objective_function(|x: &DVector<Float>, done: Completion| {
            done.complete(-x[0]);
        });
        optimizer.step().unwrap();
        assert!(!optimizer.is_stepping());
        assert_eq!(optimizer.iteration(), 1);
        assert!(optimizer.best_fitness() <= 0.0);
    }

    #[test]
    fn test_init_abandons_outstanding_round() {
        let optimizer = Optimizer::new();
        optimizer.init(2, domain());
        let held: Arc<Mutex<Vec<Completion>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&held);
        optimizer.set_async_objective_function(move |_: &DVector<Float>, done: Completion| {
            sink.lock().push(done);
        });
        let called = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&called);
        optimizer
            .step_then(move || {
                flag.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        optimizer.init(2, domain());
        assert!(!optimizer.is_stepping());
        for done in std::mem::take(&mut *held.lock()) {
            done.complete(99.0);
        }
        assert_eq!(called.load(Ordering::SeqCst), 0);
        assert_eq!(optimizer.best_fitness(), Float::NEG_INFINITY);
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn test_async_empty_swarm_finishes_immediately() {
        let optimizer = Optimizer::new();
        optimizer.init(0, domain());
        optimizer.set_async_objective_function(|_: &DVector<Float>, done: Completion| {
            done.complete(0.0);
        });
        let called = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&called);
        optimizer
            .step_then(move || {
                flag.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(called.load(Ordering::SeqCst), 1);
        assert_eq!(optimizer.iteration(), 1);
    }

    #[test]
    fn test_callback_can_start_next_step() {
        let optimizer = Optimizer::new();
        optimizer.init(3, domain());
        optimizer.set_async_objective_function(|x: &DVector<Float>, done: Completion| {
            done.complete(x[0]);
        });
        let handle = optimizer.clone();
        optimizer
            .step_then(move || {
                handle.step().unwrap();
            })
            .unwrap();
        assert_eq!(optimizer.iteration(), 2);
    }

    #[test]
    fn test_panicking_objective_does_not_block_later_steps() {
        let optimizer = Optimizer::new();
        optimizer.init(3, domain());
        optimizer.set_objective_function(|_: &DVector<Float>| -> Float {
            panic!("objective failed hard")
        });
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| optimizer.step()));
        assert!(result.is_err());
        assert!(!optimizer.is_stepping());

        optimizer.set_objective_function(|x: &DVector<Float>| x[0]);
        optimizer.step().unwrap();
        assert_eq!(optimizer.iteration(), 1);
        assert!(optimizer.best_fitness() > Float::NEG_INFINITY);
    }

    #[test]
    fn test_factory_with_mixed_dimensions_is_rejected() {
        let optimizer = Optimizer::new();
        optimizer.set_objective_function(|x: &DVector<Float>| x[0]);
        let mut dimension = 1;
        optimizer.init(
            4,
            Generation::factory(move |_rng| {
                dimension = 3 - dimension;
                Particle::new(
                    DVector::zeros(dimension),
                    DVector::from_element(dimension, 1.0),
                    0.8,
                    0.4,
                    0.4,
                )
            }),
        );
        assert!(!optimizer.is_initialized());
        assert!(optimizer.is_empty());
        assert_eq!(optimizer.dimension(), 0);
        for _ in 0..5 {
            assert!(optimizer.step().is_ok());
        }
        assert_eq!(optimizer.iteration(), 0);
        assert!(!optimizer.is_stepping());

        optimizer.init(4, domain());
        assert!(optimizer.is_initialized());
        optimizer.step().unwrap();
        assert_eq!(optimizer.iteration(), 1);
    }

    #[test]
    fn test_step_async_reports_whether_the_step_ran() {
        let optimizer = Optimizer::new();
        optimizer.set_async_objective_function(|x: &DVector<Float>, done: Completion| {
            done.complete(x[0]);
        });
        assert!(matches!(
            optimizer.step_async().now_or_never(),
            Some(Ok(false))
        ));
        optimizer.init(3, domain());
        assert!(matches!(
            optimizer.step_async().now_or_never(),
            Some(Ok(true))
        ));
        assert_eq!(optimizer.iteration(), 1);
    }

    #[test]
    fn test_step_async_reports_abandoned_step() {
        let optimizer = Optimizer::new();
        optimizer.init(2, domain());
        let held: Arc<Mutex<Vec<Completion>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&held);
        optimizer.set_async_objective_function(move |_: &DVector<Float>, done: Completion| {
            sink.lock().push(done);
        });
        let mut step = Box::pin(optimizer.step_async());
        assert!(step.as_mut().now_or_never().is_none());
        assert!(optimizer.is_stepping());
        optimizer.init(2, domain());
        for done in std::mem::take(&mut *held.lock()) {
            done.complete(5.0);
        }
        assert!(matches!(step.now_or_never(), Some(Ok(false))));
        assert_eq!(optimizer.iteration(), 0);
    }

    #[test]
    fn test_sync_step_calls_callback() {
        let optimizer = Optimizer::new();
        optimizer.init(3, domain());
        optimizer.set_objective_function(|x: &DVector<Float>| x[0]);
        let called = Arc::new(AtomicUsize::new(0));
        let flag = Arc::clone(&called);
        optimizer
            .step_then(move || {
                flag.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        assert_eq!(called.load(Ordering::SeqCst), 1);
    }
}
