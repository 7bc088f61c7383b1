//! Cooperative scheduling
//!
//! Every entity owns a one-shot [`Timer`]. The central loop polls timers in a
//! fixed order each millisecond; firing disarms a timer and the callback
//! re-arms it. A callback that returns without re-arming is cancelled.

/// Logical time in whole milliseconds
pub type Millis = u64;

/// A one-shot delayed callback slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    due: Option<Millis>,
}

impl Timer {
    /// A timer that is not armed
    pub const fn idle() -> Self {
        Self { due: None }
    }

    /// A timer armed to fire at `now + delay`
    pub fn after(now: Millis, delay: Millis) -> Self {
        Self {
            due: Some(now.saturating_add(delay)),
        }
    }

    /// Arm (or re-arm) the timer for `now + delay`
    pub fn schedule(&mut self, now: Millis, delay: Millis) {
        self.due = Some(now.saturating_add(delay));
    }

    /// Disarm without firing
    pub fn clear(&mut self) {
        self.due = None;
    }

    /// Consume the timer if it is due at `now`
    pub fn fire(&mut self, now: Millis) -> bool {
        match self.due {
            Some(due) if due <= now => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    pub fn due(&self) -> Option<Millis> {
        self.due
    }
}
