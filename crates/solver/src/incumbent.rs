use std::sync::atomic::{AtomicUsize, Ordering};

/// The size of the best mapping found so far, readable by every worker.
///
/// Only the size is global; each worker keeps its own copy of the best
/// mapping it has seen, and the longest one is picked when the workers
/// are joined.
pub(crate) struct AtomicIncumbent(AtomicUsize);

impl AtomicIncumbent {
    pub(crate) fn new() -> Self {
        Self(AtomicUsize::new(0))
    }

    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    /// Raises the incumbent to `size` if that is an improvement; never
    /// lowers it.
    pub(crate) fn update(&self, size: usize) -> bool {
        let mut seen = self.0.load(Ordering::SeqCst);
        while size > seen {
            match self
                .0
                .compare_exchange(seen, size, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return true,
                Err(current) => seen = current,
            }
        }
        false
    }
}
