use crate::{core::Interval, Float};

/// Module containing the sphere test function.
pub mod sphere;
pub use sphere::Sphere;

/// Module containing the Rastrigin test function.
pub mod rastrigin;
pub use rastrigin::Rastrigin;

/// Module containing the Rosenbrock test function.
pub mod rosenbrock;
pub use rosenbrock::Rosenbrock;

/// Module containing one-dimensional functions with several local maxima.
pub mod waves;
pub use waves::{CosineWell, DistantPeak, InvertedParabola};

/// A hypercube domain `[-half_width, half_width)^n`.
pub fn hypercube(n: usize, half_width: Float) -> Vec<Interval> {
    vec![Interval::new(-half_width, half_width); n]
}
