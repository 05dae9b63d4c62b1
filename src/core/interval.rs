use std::fmt::{Debug, Display};

use fastrand::Rng;
use serde::{Deserialize, Serialize};

use crate::{core::Particle, Float};

/// One axis of a search domain, sampled as the half-open range `[start, end)`.
///
/// `start <= end` is expected but not enforced. An [`Interval`] only shapes the initial swarm:
/// particles may leave it once the search starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    start: Float,
    end: Float,
}

impl Interval {
    /// Create a new [`Interval`] from `start` to `end`.
    pub const fn new(start: Float, end: Float) -> Self {
        Self { start, end }
    }
    /// The lower end of the interval.
    pub const fn start(&self) -> Float {
        self.start
    }
    /// The upper end of the interval.
    pub const fn end(&self) -> Float {
        self.end
    }
    /// The width of the interval, `end - start`.
    pub fn span(&self) -> Float {
        self.end - self.start
    }
    /// Checks whether `value` lies in `[start, end)`.
    pub fn contains(&self, value: Float) -> bool {
        self.start <= value && value < self.end
    }
}

impl From<(Float, Float)> for Interval {
    fn from(value: (Float, Float)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A boxed particle factory, see [`Generation::Factory`].
pub type ParticleFactory = Box<dyn FnMut(&mut Rng) -> Particle + Send>;

/// The strategy used by [`Optimizer::init`](crate::core::Optimizer::init) to create a swarm.
pub enum Generation {
    /// Sample each particle uniformly inside the given domain, one [`Interval`] per axis, using
    /// the optimizer's current [`SwarmOptions`](crate::core::SwarmOptions).
    Intervals(Vec<Interval>),
    /// Call the factory once per particle. The factory receives the optimizer's random number
    /// generator so custom seeding stays reproducible. It runs while the optimizer is locked and
    /// must not call back into it.
    Factory(ParticleFactory),
}

impl Generation {
    /// Wrap a closure as a [`Generation::Factory`].
    pub fn factory<F>(factory: F) -> Self
    where
        F: FnMut(&mut Rng) -> Particle + Send + 'static,
    {
        Self::Factory(Box::new(factory))
    }
}

impl Debug for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intervals(domain) => f.debug_tuple("Intervals").field(domain).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<Vec<Interval>> for Generation {
    fn from(value: Vec<Interval>) -> Self {
        Self::Intervals(value)
    }
}

impl From<&[Interval]> for Generation {
    fn from(value: &[Interval]) -> Self {
        Self::Intervals(value.to_vec())
    }
}

impl<const N: usize> From<[Interval; N]> for Generation {
    fn from(value: [Interval; N]) -> Self {
        Self::Intervals(value.to_vec())
    }
}

impl From<Vec<(Float, Float)>> for Generation {
    fn from(value: Vec<(Float, Float)>) -> Self {
        Self::Intervals(value.into_iter().map(Interval::from).collect())
    }
}
