//! Command/data framing onto the serial link

use crate::color::Rgb565;

/// Frames opcodes, parameters and pixel data for a display controller
///
/// Implementations decide how the bytes reach the panel (SPI with a
/// data/command line, 8080 parallel, a test recorder). Every call is a
/// complete bus transaction: nothing is left selected when it returns,
/// whether it succeeded or not.
pub trait Transport {
    /// Bus-level error
    type Error;

    /// Send a single opcode
    fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error>;

    /// Send parameter bytes for the preceding opcode
    fn send_parameters(&mut self, params: &[u8]) -> Result<(), Self::Error>;

    /// Stream colors as data, most significant byte first
    ///
    /// The iterator is consumed lazily; the whole run is never held in
    /// memory at once.
    fn send_pixels<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Rgb565>;

    /// Send an opcode followed by its parameters
    fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
        self.send_command(opcode)?;
        if !params.is_empty() {
            self.send_parameters(params)?;
        }
        Ok(())
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn send_command(&mut self, opcode: u8) -> Result<(), Self::Error> {
        T::send_command(self, opcode)
    }

    fn send_parameters(&mut self, params: &[u8]) -> Result<(), Self::Error> {
        T::send_parameters(self, params)
    }

    fn send_pixels<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        T::send_pixels(self, pixels)
    }

    fn command(&mut self, opcode: u8, params: &[u8]) -> Result<(), Self::Error> {
        T::command(self, opcode, params)
    }
}
