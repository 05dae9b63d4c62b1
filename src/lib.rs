//! `swarmopt` is a small Particle Swarm Optimization (PSO) engine. A swarm of particles moves
//! through a continuous, multi-dimensional search space looking for the point which
//! **maximizes** a user-supplied objective function.
//!
//! <div class="warning">
//!
//! This crate is still in an early development phase, and the API is not stable.
//!
//! </div>
//!
//! # Table of Contents
//! - [Quick Start](#quick-start)
//! - [Asynchronous Objectives](#asynchronous-objectives)
//! - [The Update Rule](#the-update-rule)
//! - [Bounds](#bounds)
//!
//! # Quick Start
//!
//! An [`Optimizer`](crate::core::Optimizer) is created once, given an objective function and
//! initialized with a domain (one [`Interval`](crate::core::Interval) per axis). Each call to
//! [`step`](crate::core::Optimizer::step) performs a single iteration of the swarm:
//!
//! ```rust
//! use swarmopt::prelude::*;
//! use swarmopt::{DVector, Float};
//!
//! let optimizer = Optimizer::new();
//! optimizer.seed(0);
//! optimizer.set_objective_function(|x: &DVector<Float>| -(x[0].powi(2) + x[1].powi(2)));
//! optimizer.init(20, vec![Interval::new(-10.0, 10.0), Interval::new(-10.0, 10.0)]);
//! for _ in 0..40 {
//!     optimizer.step().unwrap();
//! }
//! assert!(optimizer.best_fitness() > -1.0);
//! ```
//!
//! Objective functions which can fail should implement
//! [`ObjectiveFunction`](crate::traits::ObjectiveFunction) with their own error type. The error
//! is handed back from [`step`](crate::core::Optimizer::step) untouched.
//!
//! # Asynchronous Objectives
//!
//! An objective registered through
//! [`set_async_objective_function`](crate::core::Optimizer::set_async_objective_function)
//! receives a [`Completion`](crate::core::Completion) for every particle instead of returning a
//! value. Completions may fire on any thread and in any order; the step finishes once all of them
//! have fired. Only one such round may be outstanding at a time, a second
//! [`step`](crate::core::Optimizer::step) is rejected with
//! [`StepError::InProgress`](crate::core::StepError::InProgress).
//!
//! # The Update Rule
//!
//! For each axis $`i`$ of particle $`p`$ the velocity is updated as
//! ```math
//! v_i \leftarrow \omega v_i + r_1 c_s (q_i - x_i) + r_2 c_p (b_i - x_i)
//! ```
//! where $`\omega`$ is the inertia weight, $`c_s`$ and $`c_p`$ are the social and personal
//! coefficients, $`q`$ is the position of a reference particle chosen by a biased random
//! selection (see [`select_random_best`](crate::core::selection::select_random_best)), $`b`$ is
//! the particle's personal best position and $`r_1, r_2`$ are uniform in $`[0, 1)`$.
//!
//! # Bounds
//!
//! The domain is only used to sample the initial swarm. Particles are free to leave it while
//! searching, and nothing pulls them back.
#![warn(
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown,
    clippy::doc_link_with_quotes,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::perf,
    clippy::style,
    missing_docs
)]

/// Module containing the optimizer, particles and their supporting types
pub mod core;
/// Module containing [`SwarmObserver`](crate::traits::SwarmObserver) implementations
pub mod observers;
/// Module containing standard functions for testing the optimizer
pub mod test_functions;
/// Module containing the traits which connect user code to the optimizer
pub mod traits;

pub use nalgebra::DVector;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(not(feature = "f32"))]
pub type Float = f64;

/// The floating-point type used throughout the crate (`f64` unless the `f32` feature is enabled).
#[cfg(feature = "f32")]
pub type Float = f32;

/// The mathematical constant $`\pi`$.
#[cfg(not(feature = "f32"))]
pub const PI: Float = std::f64::consts::PI;

/// The mathematical constant $`\pi`$.
#[cfg(feature = "f32")]
pub const PI: Float = std::f32::consts::PI;

/// Prelude module containing everything someone should need to use this crate for non-development
/// purposes
pub mod prelude {
    pub use crate::core::{
        Completion, Generation, Interval, Optimizer, PartialOptions, Particle, Runner,
        StepError, SwarmOptions,
    };
    pub use crate::traits::{AbortSignal, AsyncObjectiveFunction, ObjectiveFunction, SwarmObserver};
}
