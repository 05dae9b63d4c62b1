use std::ops::ControlFlow;

use crate::core::SwarmStatus;

/// A trait which holds a [`callback`](`SwarmObserver::callback`) function that can be used to
/// inspect the swarm after every step taken by a [`Runner`](crate::core::Runner).
pub trait SwarmObserver: Send + Sync {
    /// Called after every completed step. Returning [`ControlFlow::Break`] stops the
    /// [`Runner`](crate::core::Runner).
    fn callback(&mut self, step: usize, status: &SwarmStatus) -> ControlFlow<()>;
}
