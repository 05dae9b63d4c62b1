/// Module containing [`AbortSignal`](crate::traits::AbortSignal) implementations
pub mod abort_signals;
/// Module containing the [`StepError`] type
pub mod error;
/// Module containing [`Interval`] and the [`Generation`] strategies
pub mod interval;
/// Module containing the [`Optimizer`] and its asynchronous [`Completion`] handle
pub mod optimizer;
/// Module containing [`SwarmOptions`] and [`PartialOptions`]
pub mod options;
/// Module containing the [`Particle`] type
pub mod particle;
/// Module containing the [`Runner`], a driver for repeated steps
pub mod runner;
/// Module containing reference selection and swarm statistics
pub mod selection;
/// Module containing [`SwarmStatus`] and [`SwarmSummary`]
pub mod summary;
/// Module containing random sampling helpers
pub mod utils;

pub use abort_signals::CtrlCAbortSignal;
pub use error::StepError;
pub use interval::{Generation, Interval};
pub use optimizer::{Completion, Optimizer};
pub use options::{PartialOptions, SwarmOptions};
pub use particle::{Particle, ParticleSnapshot};
pub use runner::Runner;
pub use summary::{SwarmStatus, SwarmSummary};
