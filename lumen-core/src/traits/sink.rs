//! Window-addressed pixel sink

use crate::color::Rgb565;
use crate::error::Error;
use crate::geometry::{Size, Window};
use crate::orientation::Rotation;

/// A display that accepts pixel runs into an addressed window
///
/// This is the only surface the rasterizer, font engine and bitmap
/// streamer use. Every stream is preceded by a [`set_window`] call that
/// re-establishes the controller's write region; there is no implicit
/// cursor carried between operations.
///
/// [`set_window`]: PixelSink::set_window
pub trait PixelSink {
    /// Transport error type
    type Error;

    /// Physical panel size
    fn panel_size(&self) -> Size;

    /// Current rotation
    fn rotation(&self) -> Rotation;

    /// Caller-visible size in the current rotation
    fn logical_size(&self) -> Size {
        self.rotation().logical_size(self.panel_size())
    }

    /// Program the write region
    ///
    /// Fails with [`Error::InvalidWindow`] if the window does not lie on
    /// the panel; it is never clamped.
    fn set_window(&mut self, window: &Window) -> Result<(), Error<Self::Error>>;

    /// Stream colors into the current window
    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Error<Self::Error>>
    where
        I: IntoIterator<Item = Rgb565>;
}

impl<S: PixelSink + ?Sized> PixelSink for &mut S {
    type Error = S::Error;

    fn panel_size(&self) -> Size {
        S::panel_size(self)
    }

    fn rotation(&self) -> Rotation {
        S::rotation(self)
    }

    fn set_window(&mut self, window: &Window) -> Result<(), Error<Self::Error>> {
        S::set_window(self, window)
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Error<Self::Error>>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        S::write_pixels(self, pixels)
    }
}
