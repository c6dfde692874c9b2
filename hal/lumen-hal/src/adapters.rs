//! Adapters from ecosystem traits
//!
//! Most chip HALs already implement `embedded-hal` 1.0 and `embedded-io`.
//! These wrappers let them plug straight into the display engine:
//!
//! ```ignore
//! let spi = EhSpi::new(spi_bus);
//! let dc = EhOutput::new(dc_pin);
//! let cs = EhOutput::new(cs_pin);
//! let transport = SpiTransport::new(spi, dc, cs);
//! ```

#[cfg(feature = "embedded-hal")]
pub use self::eh::{EhDelay, EhOutput, EhSpi};

#[cfg(feature = "embedded-io")]
pub use self::io::IoSource;

#[cfg(feature = "embedded-hal")]
mod eh {
    use core::convert::Infallible;

    use crate::{DelayMs, OutputPin, SpiBus};

    /// Wraps an `embedded_hal::digital::OutputPin` with an infallible error
    ///
    /// The logical level is tracked here so that `is_set_high` does not
    /// need a `StatefulOutputPin`.
    pub struct EhOutput<P> {
        pin: P,
        high: bool,
    }

    impl<P> EhOutput<P>
    where
        P: embedded_hal::digital::OutputPin<Error = Infallible>,
    {
        /// Wrap a pin, driving it high (the idle level for CS and D/C)
        pub fn new(mut pin: P) -> Self {
            match pin.set_high() {
                Ok(()) => {}
                Err(never) => match never {},
            }
            Self { pin, high: true }
        }

        /// Release the wrapped pin
        pub fn release(self) -> P {
            self.pin
        }
    }

    impl<P> OutputPin for EhOutput<P>
    where
        P: embedded_hal::digital::OutputPin<Error = Infallible>,
    {
        fn set_high(&mut self) {
            match self.pin.set_high() {
                Ok(()) => self.high = true,
                Err(never) => match never {},
            }
        }

        fn set_low(&mut self) {
            match self.pin.set_low() {
                Ok(()) => self.high = false,
                Err(never) => match never {},
            }
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    /// Wraps an `embedded_hal::spi::SpiBus`
    ///
    /// Chip-select stays under the transport's control, so this wraps the
    /// bus rather than an `SpiDevice`.
    pub struct EhSpi<B> {
        bus: B,
    }

    impl<B: embedded_hal::spi::SpiBus<u8>> EhSpi<B> {
        /// Wrap a bus
        pub fn new(bus: B) -> Self {
            Self { bus }
        }

        /// Release the wrapped bus
        pub fn release(self) -> B {
            self.bus
        }
    }

    impl<B: embedded_hal::spi::SpiBus<u8>> SpiBus for EhSpi<B> {
        type Error = B::Error;

        fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
            self.bus.write(data)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.bus.flush()
        }
    }

    /// Wraps an `embedded_hal::delay::DelayNs`
    pub struct EhDelay<D> {
        delay: D,
    }

    impl<D: embedded_hal::delay::DelayNs> EhDelay<D> {
        /// Wrap a delay provider
        pub fn new(delay: D) -> Self {
            Self { delay }
        }
    }

    impl<D: embedded_hal::delay::DelayNs> DelayMs for EhDelay<D> {
        fn delay_ms(&mut self, ms: u32) {
            self.delay.delay_ms(ms);
        }
    }
}

#[cfg(feature = "embedded-io")]
mod io {
    use crate::{ByteSource, StorageError};

    /// Wraps an `embedded_io::Read` (SD card file, UART, ...) as a byte source
    pub struct IoSource<R> {
        reader: R,
    }

    impl<R: embedded_io::Read> IoSource<R> {
        /// Wrap a reader
        pub fn new(reader: R) -> Self {
            Self { reader }
        }

        /// Release the wrapped reader
        pub fn release(self) -> R {
            self.reader
        }
    }

    impl<R: embedded_io::Read> ByteSource for IoSource<R> {
        fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, StorageError> {
            if buf.is_empty() {
                return Ok(0);
            }
            self.reader.read(buf).map_err(|_| StorageError::Io)
        }
    }
}
