//! Idle timeout for kiosk-style screens.

use crate::animation::timeline::sanitize_secs;

/// Counts frame time without user input and fires once per timeout.
///
/// A disarmed timer never fires; a zero timeout disables it as well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleTimer {
    timeout: f32,
    elapsed: f32,
    armed: bool,
}

impl IdleTimer {
    /// Create a disarmed timer.
    pub fn new(timeout_secs: f32) -> Self {
        Self {
            timeout: sanitize_secs(timeout_secs),
            elapsed: 0.0,
            armed: false,
        }
    }

    /// Advance by `dt` seconds. Returns `true` when the timeout expired on
    /// this tick; the timer then starts counting again.
    pub fn tick(&mut self, dt: f32, had_input: bool) -> bool {
        if !self.armed || self.timeout <= 0.0 {
            return false;
        }
        if had_input {
            self.elapsed = 0.0;
            return false;
        }

        self.elapsed += sanitize_secs(dt);
        if self.elapsed >= self.timeout {
            self.elapsed = 0.0;
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    /// Start counting from zero.
    pub fn arm(&mut self) {
        self.armed = true;
        self.elapsed = 0.0;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
        self.elapsed = 0.0;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn timeout(&self) -> f32 {
        self.timeout
    }

    pub fn set_timeout(&mut self, timeout_secs: f32) {
        self.timeout = sanitize_secs(timeout_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_never_fires() {
        let mut timer = IdleTimer::new(1.0);
        assert!(!timer.tick(5.0, false));
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_fires_once_per_timeout() {
        let mut timer = IdleTimer::new(1.0);
        timer.arm();
        assert!(!timer.tick(0.5, false));
        assert!(timer.tick(0.5, false));
        assert!(!timer.tick(0.5, false));
        assert!(timer.tick(0.5, false));
    }

    #[test]
    fn test_input_resets() {
        let mut timer = IdleTimer::new(1.0);
        timer.arm();
        timer.tick(0.75, false);
        assert!(!timer.tick(0.25, true));
        assert!(!timer.tick(0.75, false));
        assert!(timer.tick(0.25, false));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let mut timer = IdleTimer::new(-3.0);
        timer.arm();
        assert_eq!(timer.timeout(), 0.0);
        assert!(!timer.tick(10.0, false));
    }
}
