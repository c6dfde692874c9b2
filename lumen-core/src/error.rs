//! Engine error taxonomy

use lumen_hal::StorageError;

use crate::geometry::{InvalidWindow, Size};

/// Errors from drawing operations
///
/// `E` is the transport's bus error. Every failure is scoped to the one
/// operation that produced it; nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The serial link failed
    Transport(E),
    /// A window was inverted or ran off the panel
    InvalidWindow,
    /// The image header disagrees with the caller's dimensions
    BitmapDimensionMismatch {
        /// Dimensions the caller asked for
        expected: Size,
        /// Dimensions declared by the image
        actual: Size,
    },
    /// The image source failed or ended early
    BitmapRead(StorageError),
    /// The image header is not a recognized format
    BitmapFormat,
}

impl<E> Error<E> {
    /// Convert the transport error type
    pub fn map_transport<F>(self, f: impl FnOnce(E) -> F) -> Error<F> {
        match self {
            Error::Transport(e) => Error::Transport(f(e)),
            Error::InvalidWindow => Error::InvalidWindow,
            Error::BitmapDimensionMismatch { expected, actual } => {
                Error::BitmapDimensionMismatch { expected, actual }
            }
            Error::BitmapRead(e) => Error::BitmapRead(e),
            Error::BitmapFormat => Error::BitmapFormat,
        }
    }
}

impl<E> From<InvalidWindow> for Error<E> {
    fn from(_: InvalidWindow) -> Self {
        Error::InvalidWindow
    }
}
