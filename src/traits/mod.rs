/// Module containing the [`AbortSignal`] trait
pub mod abort_signal;
/// Module containing the [`ObjectiveFunction`] and [`AsyncObjectiveFunction`] traits
pub mod objective;
/// Module containing the [`SwarmObserver`] trait
pub mod observer;

pub use abort_signal::AbortSignal;
pub use objective::{AsyncObjectiveFunction, ObjectiveFunction};
pub use observer::SwarmObserver;
