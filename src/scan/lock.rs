use std::time::{Duration, Instant};

/// Cooldown between two accepted detections.
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Debounce lock for the camera callback.
///
/// A detection takes the lock; further detections are dropped until the
/// cooldown elapses or the lock is released explicitly.
#[derive(Debug, Clone)]
pub struct ScanLock {
    cooldown: Duration,
    locked_until: Option<Instant>,
}

impl ScanLock {
    pub fn new(cooldown: Duration) -> Self {
        Self { cooldown, locked_until: None }
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_locked(&self, now: Instant) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }

    /// Take the lock if it is free; returns false while a cooldown is running
    pub fn try_lock(&mut self, now: Instant) -> bool {
        if self.is_locked(now) {
            return false;
        }
        self.locked_until = Some(now + self.cooldown);
        true
    }

    pub fn unlock(&mut self) {
        self.locked_until = None;
    }

    /// App came back to the foreground
    pub fn resume(&mut self) {
        self.unlock();
    }
}

impl Default for ScanLock {
    fn default() -> Self {
        Self::new(DEFAULT_COOLDOWN)
    }
}
