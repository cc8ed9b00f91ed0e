use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Source of elapsed run time, in whole seconds since the run started
pub trait Clock {
    fn elapsed_secs(&self) -> u64;
}

/// Wall clock anchored at construction time
#[derive(Debug, Clone)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&self) -> u64 {
        self.start.elapsed().as_secs()
    }
}

/// Clock that only moves when told to
///
/// Clones share the same time, so a test can keep a handle while the fan
/// loop owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    secs: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn at(secs: u64) -> Self {
        Self {
            secs: Arc::new(AtomicU64::new(secs)),
        }
    }

    pub fn set(&self, secs: u64) {
        self.secs.store(secs, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.secs.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&self) -> u64 {
        self.secs.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::at(3);
        let handle = clock.clone();
        handle.advance(2);
        assert_eq!(clock.elapsed_secs(), 5);
        handle.set(1);
        assert_eq!(clock.elapsed_secs(), 1);
    }

    #[test]
    fn test_system_clock_starts_at_zero() {
        let clock = SystemClock::start();
        assert_eq!(clock.elapsed_secs(), 0);
    }
}
