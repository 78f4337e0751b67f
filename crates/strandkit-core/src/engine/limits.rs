use std::sync::atomic::{AtomicUsize, Ordering};

/// Default upper bound on atoms produced by a single generation run.
pub const DEFAULT_MAX_GENERATED_ATOMS: usize = 2_000_000;

static MAX_GENERATED_ATOMS: AtomicUsize = AtomicUsize::new(DEFAULT_MAX_GENERATED_ATOMS);

/// The current process-wide generation ceiling.
pub fn max_generated_atoms() -> usize {
    MAX_GENERATED_ATOMS.load(Ordering::Relaxed)
}

/// Overrides the process-wide generation ceiling.
///
/// The ceiling is checked after the sizing pass and before any placement
/// work, so a run over budget fails without allocating output buffers.
pub fn set_max_generated_atoms(ceiling: usize) {
    MAX_GENERATED_ATOMS.store(ceiling, Ordering::Relaxed);
}

/// Serializes tests that read or override the shared ceiling.
#[cfg(test)]
pub(crate) fn ceiling_guard() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, PoisonError};
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ceiling_override_round_trips() {
        let _guard = ceiling_guard();
        set_max_generated_atoms(1_000);
        assert_eq!(max_generated_atoms(), 1_000);
        set_max_generated_atoms(DEFAULT_MAX_GENERATED_ATOMS);
        assert_eq!(max_generated_atoms(), DEFAULT_MAX_GENERATED_ATOMS);
    }
}
