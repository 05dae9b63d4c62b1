use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::{const_mutex, Mutex};
use tracing::warn;

use crate::traits::AbortSignal;

static CTRL_C_PRESSED: AtomicBool = AtomicBool::new(false);
static CTRL_C_HANDLER: Mutex<bool> = const_mutex(false);

/// Aborts a [`Runner`](crate::core::Runner) between two steps when `Ctrl-C` is pressed.
///
/// All instances share one process-wide flag.
/// <div class="warning">Creating the first instance installs the process' `Ctrl-C` handler,
/// which fails if another library (e.g. `tokio`'s signal handling) already owns it.</div>
#[derive(Debug, Clone, Copy)]
pub struct CtrlCAbortSignal(());

impl CtrlCAbortSignal {
    /// Install the `Ctrl-C` handler (once per process) and return a signal watching it.
    ///
    /// # Errors
    ///
    /// Returns an error if the handler cannot be installed.
    pub fn new() -> Result<Self, ctrlc::Error> {
        let mut installed = CTRL_C_HANDLER.lock();
        if !*installed {
            ctrlc::set_handler(|| {
                warn!("Ctrl-C pressed, stopping after the current step");
                CTRL_C_PRESSED.store(true, Ordering::SeqCst);
            })?;
            *installed = true;
        }
        Ok(Self(()))
    }
}

impl AbortSignal for CtrlCAbortSignal {
    fn is_aborted(&self) -> bool {
        CTRL_C_PRESSED.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        CTRL_C_PRESSED.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        CTRL_C_PRESSED.store(false, Ordering::SeqCst);
    }
}

/// A plain flag, usually shared through an [`Arc`] so it can be raised from another thread or
/// from a [`SwarmObserver`](crate::traits::SwarmObserver).
impl AbortSignal for AtomicBool {
    fn is_aborted(&self) -> bool {
        self.load(Ordering::SeqCst)
    }

    fn abort(&self) {
        self.store(true, Ordering::SeqCst);
    }

    fn reset(&self) {
        self.store(false, Ordering::SeqCst);
    }
}

impl<A: AbortSignal + ?Sized> AbortSignal for Arc<A> {
    fn is_aborted(&self) -> bool {
        (**self).is_aborted()
    }

    fn abort(&self) {
        (**self).abort();
    }

    fn reset(&self) {
        (**self).reset();
    }
}
