use crate::{core::Interval, test_functions::hypercube, traits::ObjectiveFunction, DVector, Float};
use std::convert::Infallible;

/// The negative sphere function, a concave function with a single maximum.
///
/// ```math
/// f(\vec{x}) = -\sum_{i=1}^n x_i^2
/// ```
/// This function has a maximum at $`f(\vec{0}) = 0`$.
pub struct Sphere {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl Sphere {
    /// A symmetric domain around the maximum, `[-half_width, half_width)` on every axis.
    pub fn domain(&self, half_width: Float) -> Vec<Interval> {
        hypercube(self.n, half_width)
    }
}
impl ObjectiveFunction for Sphere {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        Ok(-x.iter().take(self.n).map(|v| v.powi(2)).sum::<Float>())
    }
}
