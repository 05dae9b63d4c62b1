use crate::{traits::ObjectiveFunction, DVector, Float};
use std::convert::Infallible;

/// The negative Rosenbrock function, a non-concave function with a single maximum at the end of a
/// long, flat, curved ridge.
///
/// ```math
/// f(\vec{x}) = -\sum_{i=1}^{n-1} \left[100(x_{i+1} - x_i^2)^2 + (1 - x_i)^2 \right]
/// ```
/// This function has a maximum at $`f(\vec{1}) = 0`$.
pub struct Rosenbrock {
    /// The number of dimensions of the function. Below two dimensions the function is `0`.
    pub n: usize,
}
impl ObjectiveFunction for Rosenbrock {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        #[allow(clippy::suboptimal_flops)]
        Ok(-(0..self.n.saturating_sub(1))
            .map(|i| 100.0 * (x[i + 1] - x[i].powi(2)).powi(2) + (1.0 - x[i]).powi(2))
            .sum::<Float>())
    }
}
