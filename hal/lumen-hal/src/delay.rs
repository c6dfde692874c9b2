//! Blocking delays
//!
//! The controller needs fixed settle times after reset and sleep-mode
//! transitions.

/// Blocking millisecond delay
pub trait DelayMs {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<D: DelayMs + ?Sized> DelayMs for &mut D {
    fn delay_ms(&mut self, ms: u32) {
        D::delay_ms(self, ms)
    }
}
