//! Trailing-edge debouncer with an injected clock.
//!
//! The viewer feeds it `performance.now()`-style timestamps from resize
//! events and timer callbacks; tests feed it plain numbers.

/// Coalesces a burst of triggers into one firing after a quiet window.
#[derive(Debug, Clone, PartialEq)]
pub struct Debouncer {
    window_ms: f64,
    last_trigger: Option<f64>,
}

impl Debouncer {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms: f64::from(window_ms),
            last_trigger: None,
        }
    }

    pub fn window_ms(&self) -> f64 {
        self.window_ms
    }

    /// Record a trigger at `now`, restarting the quiet window.
    pub fn trigger(&mut self, now: f64) {
        self.last_trigger = Some(now);
    }

    /// Milliseconds left until a pending burst may fire.
    pub fn remaining(&self, now: f64) -> Option<f64> {
        self.last_trigger
            .map(|last| (last + self.window_ms - now).max(0.0))
    }

    /// Returns true exactly once per burst, when the window has passed
    /// since the last trigger.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.last_trigger {
            Some(last) if now - last >= self.window_ms => {
                self.last_trigger = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.last_trigger = None;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_after_quiet_window() {
        let mut d = Debouncer::new(100);
        d.trigger(0.0);
        d.trigger(40.0);
        d.trigger(90.0);
        assert!(!d.poll(150.0));
        assert!(d.poll(190.0));
        assert!(!d.poll(300.0));
        assert_eq!(d.remaining(300.0), None);
    }

    #[test]
    fn test_idle_never_fires() {
        let mut d = Debouncer::new(100);
        assert!(!d.poll(1_000.0));
        assert_eq!(d.remaining(0.0), None);
    }

    #[test]
    fn test_remaining_and_cancel() {
        let mut d = Debouncer::new(100);
        d.trigger(10.0);
        assert_eq!(d.remaining(60.0), Some(50.0));
        assert_eq!(d.remaining(500.0), Some(0.0));
        d.cancel();
        assert!(!d.poll(500.0));
    }
}
