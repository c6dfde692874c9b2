//! SPI bus abstractions
//!
//! The display controller is driven write-only over a 4-wire serial link,
//! so the bus trait only needs blocking writes.

/// SPI bus master
pub trait SpiBus {
    /// Error type for SPI operations (bus timeout, DMA fault, ...)
    type Error;

    /// Write data without reading
    ///
    /// Blocks until every byte has been clocked out or an error occurs.
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until the last written byte has left the shift register
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<B: SpiBus + ?Sized> SpiBus for &mut B {
    type Error = B::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        B::write(self, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        B::flush(self)
    }
}
