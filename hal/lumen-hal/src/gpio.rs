//! GPIO pin abstractions
//!
//! The display link needs three outputs: chip-select (bus-select),
//! data/command select and, optionally, hardware reset.

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip. Pin writes on the boards we target cannot fail.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

impl<P: OutputPin + ?Sized> OutputPin for &mut P {
    fn set_high(&mut self) {
        P::set_high(self)
    }

    fn set_low(&mut self) {
        P::set_low(self)
    }

    fn is_set_high(&self) -> bool {
        P::is_set_high(self)
    }
}

/// Pin placeholder for boards that tie a line to a fixed level
///
/// Useful when chip-select is hard-wired low on a dedicated bus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPin {
    high: bool,
}

impl NoPin {
    /// Create a new placeholder pin
    pub const fn new() -> Self {
        Self { high: false }
    }
}

impl OutputPin for NoPin {
    fn set_high(&mut self) {
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_state() {
        let mut pin = NoPin::new();
        assert!(pin.is_set_low());

        pin.set_state(true);
        assert!(pin.is_set_high());

        pin.set_state(false);
        assert!(pin.is_set_low());
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut pin = NoPin::new();
        {
            let mut by_ref = &mut pin;
            by_ref.set_high();
        }
        assert!(pin.is_set_high());
    }
}
