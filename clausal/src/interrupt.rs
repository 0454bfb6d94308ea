//! Cooperative cancellation of a running search.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag used to stop a search from another thread.
///
/// Clones refer to the same flag. The solver only reads it, at the start of every propagation step
/// and every search step, and stops with
/// [`SolverError::Interrupted`](crate::solver::SolverError::Interrupted) once it is set.
#[derive(Clone, Default, Debug)]
pub struct Interrupt {
    flag: Arc<AtomicBool>,
}

impl Interrupt {
    pub fn new() -> Interrupt {
        Interrupt::default()
    }

    /// Request that the search stops as soon as possible.
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Relaxed)
    }

    pub fn is_interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Clear a previous request, so the handle can be used for another solve.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::thread;

    #[test]
    fn clones_share_the_flag() {
        let interrupt = Interrupt::new();
        let remote = interrupt.clone();

        assert!(!interrupt.is_interrupted());

        thread::spawn(move || remote.interrupt()).join().unwrap();

        assert!(interrupt.is_interrupted());
        interrupt.reset();
        assert!(!interrupt.is_interrupted());
    }
}
