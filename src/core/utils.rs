use crate::Float;
use fastrand::Rng;

/// A helper trait to get feature-gated floating-point random values
pub trait SampleFloat {
    /// Get a random value in the half-open range `[lower, upper)`
    fn range(&mut self, lower: Float, upper: Float) -> Float;
    /// Get a random value in the range `[0, 1)`
    fn float(&mut self) -> Float;
}

impl SampleFloat for Rng {
    fn range(&mut self, lower: Float, upper: Float) -> Float {
        self.float().mul_add(upper - lower, lower)
    }
    #[cfg(not(feature = "f32"))]
    fn float(&mut self) -> Float {
        self.f64()
    }
    #[cfg(feature = "f32")]
    fn float(&mut self) -> Float {
        self.f32()
    }
}

#[cfg(test)]
mod tests {
    use fastrand::Rng;

    use super::SampleFloat;

    #[test]
    fn test_range_stays_in_limits() {
        let mut rng = Rng::with_seed(0);
        for _ in 0..1000 {
            let value = rng.range(-3.0, 7.0);
            assert!((-3.0..7.0).contains(&value));
        }
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = Rng::with_seed(1);
        assert_eq!(rng.range(2.5, 2.5), 2.5);
    }

    #[test]
    fn test_float_is_reproducible() {
        let mut a = Rng::with_seed(7);
        let mut b = Rng::with_seed(7);
        for _ in 0..10 {
            assert_eq!(a.float(), b.float());
        }
    }
}
