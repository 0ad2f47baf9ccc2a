use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory in-flight flag for one coordinator operation.
///
/// Not a lock: the presentation layer reads it to disable re-triggering,
/// nothing in the core serializes on it. Two independent operations against
/// the same account can still run concurrently.
#[derive(Clone, Default)]
pub struct OpFlag(Arc<AtomicBool>);

impl OpFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Raise the flag for the duration of the returned guard. Dropping the
    /// guard lowers it again on every exit path, early returns included.
    pub fn raise(&self) -> OpGuard {
        self.0.store(true, Ordering::SeqCst);
        OpGuard(Arc::clone(&self.0))
    }
}

pub struct OpGuard(Arc<AtomicBool>);

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
