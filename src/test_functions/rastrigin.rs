use crate::{traits::ObjectiveFunction, DVector, Float, PI};
use std::convert::Infallible;

/// The negative Rastrigin function, a non-concave function with a single maximum but many local
/// maxima.
///
/// ```math
/// f(\vec{x}) = -10n - \sum_{i=1}^n (x_i^2 - 10cos(2\pi x_i))
/// ```
/// This function has a maximum at $`f(\vec{0}) = 0`$ and is usually searched on
/// $`[-5.12, 5.12)^n`$.
pub struct Rastrigin {
    /// The number of dimensions of the function.
    pub n: usize,
}
impl ObjectiveFunction for Rastrigin {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        #[allow(clippy::suboptimal_flops)]
        Ok(-(10.0 * self.n as Float
            + (0..self.n)
                .map(|i| x[i].powi(2) - 10.0 * Float::cos(2.0 * PI * x[i]))
                .sum::<Float>()))
    }
}
