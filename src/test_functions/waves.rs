//! One-dimensional functions which are easy to plot next to the swarm. Only the first coordinate
//! of the input is read.

use crate::{core::Interval, traits::ObjectiveFunction, DVector, Float, PI};
use std::convert::Infallible;

/// A parabola with a cosine ripple.
///
/// ```math
/// f(x) = 5\cos(2\pi x) - x^2
/// ```
/// The global maximum is $`f(0) = 5`$, surrounded by a local maximum at every integer.
pub struct CosineWell;
impl CosineWell {
    /// The usual search domain, $`[-5.12, 5.12)`$.
    pub fn domain() -> Vec<Interval> {
        vec![Interval::new(-5.12, 5.12)]
    }
}
impl ObjectiveFunction for CosineWell {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        Ok(Float::cos(2.0 * PI * x[0]).mul_add(5.0, -x[0].powi(2)))
    }
}

/// A narrow Gaussian peak far from the center, hidden in a high-frequency cosine.
///
/// ```math
/// f(x) = 20 e^{-(x - 5)^2} + \cos(10x)
/// ```
/// The global maximum lies close to $`x = 5`$.
pub struct DistantPeak;
impl DistantPeak {
    /// The usual search domain, $`[-10, 10)`$.
    pub fn domain() -> Vec<Interval> {
        vec![Interval::new(-10.0, 10.0)]
    }
}
impl ObjectiveFunction for DistantPeak {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        Ok(Float::exp(-(x[0] - 5.0).powi(2)).mul_add(20.0, Float::cos(10.0 * x[0])))
    }
}

/// $`f(x) = -x^2`$, with its maximum at $`f(0) = 0`$.
pub struct InvertedParabola;
impl InvertedParabola {
    /// The usual search domain, $`[-5, 5)`$.
    pub fn domain() -> Vec<Interval> {
        vec![Interval::new(-5.0, 5.0)]
    }
}
impl ObjectiveFunction for InvertedParabola {
    fn evaluate(&self, x: &DVector<Float>) -> Result<Float, Infallible> {
        Ok(-x[0].powi(2))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn at(x: Float) -> DVector<Float> {
        DVector::from_vec(vec![x])
    }

    #[test]
    fn test_wave_maxima() {
        assert_relative_eq!(CosineWell.evaluate(&at(0.0)).unwrap(), 5.0);
        assert!(CosineWell.evaluate(&at(1.0)).unwrap() < 5.0);
        assert!(DistantPeak.evaluate(&at(5.0)).unwrap() > 20.0);
        assert!(DistantPeak.evaluate(&at(0.0)).unwrap() < 1.001);
        assert_eq!(InvertedParabola.evaluate(&at(-3.0)), Ok(-9.0));
    }
}
