use serde::{Deserialize, Serialize};

use crate::Float;

/// The tuning coefficients of a swarm.
///
/// Values outside of `[0, 1]` are accepted without complaint; they simply change (and possibly
/// destabilize) the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmOptions {
    /// Fraction of the previous velocity kept at every step (default = `0.8`).
    pub inertia_weight: Float,
    /// Pull towards the reference particle chosen for each step (default = `0.4`).
    pub social: Float,
    /// Pull towards the particle's own best position (default = `0.4`).
    pub personal: Float,
    /// Probability-like bias of reference selection towards fitter particles (default = `0.5`).
    pub pressure: Float,
}

impl Default for SwarmOptions {
    fn default() -> Self {
        Self {
            inertia_weight: 0.8,
            social: 0.4,
            personal: 0.4,
            pressure: 0.5,
        }
    }
}

impl SwarmOptions {
    /// Sets the inertia weight $`\omega`$.
    pub const fn with_inertia_weight(mut self, value: Float) -> Self {
        self.inertia_weight = value;
        self
    }
    /// Sets the social coefficient.
    pub const fn with_social(mut self, value: Float) -> Self {
        self.social = value;
        self
    }
    /// Sets the personal coefficient.
    pub const fn with_personal(mut self, value: Float) -> Self {
        self.personal = value;
        self
    }
    /// Sets the selection pressure.
    pub const fn with_pressure(mut self, value: Float) -> Self {
        self.pressure = value;
        self
    }
    /// Overwrite only the fields which are present in `partial`.
    pub fn merge(&mut self, partial: &PartialOptions) {
        if let Some(value) = partial.inertia_weight {
            self.inertia_weight = value;
        }
        if let Some(value) = partial.social {
            self.social = value;
        }
        if let Some(value) = partial.personal {
            self.personal = value;
        }
        if let Some(value) = partial.pressure {
            self.pressure = value;
        }
    }
}

/// A partial set of [`SwarmOptions`], used by
/// [`Optimizer::set_options`](crate::core::Optimizer::set_options). Absent fields leave the
/// current value untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialOptions {
    /// See [`SwarmOptions::inertia_weight`].
    pub inertia_weight: Option<Float>,
    /// See [`SwarmOptions::social`].
    pub social: Option<Float>,
    /// See [`SwarmOptions::personal`].
    pub personal: Option<Float>,
    /// See [`SwarmOptions::pressure`].
    pub pressure: Option<Float>,
}

impl PartialOptions {
    /// Sets the inertia weight.
    pub const fn with_inertia_weight(mut self, value: Float) -> Self {
        self.inertia_weight = Some(value);
        self
    }
    /// Sets the social coefficient.
    pub const fn with_social(mut self, value: Float) -> Self {
        self.social = Some(value);
        self
    }
    /// Sets the personal coefficient.
    pub const fn with_personal(mut self, value: Float) -> Self {
        self.personal = Some(value);
        self
    }
    /// Sets the selection pressure.
    pub const fn with_pressure(mut self, value: Float) -> Self {
        self.pressure = Some(value);
        self
    }
}

impl From<SwarmOptions> for PartialOptions {
    fn from(value: SwarmOptions) -> Self {
        Self {
            inertia_weight: Some(value.inertia_weight),
            social: Some(value.social),
            personal: Some(value.personal),
            pressure: Some(value.pressure),
        }
    }
}
