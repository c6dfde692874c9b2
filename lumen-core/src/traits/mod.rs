//! Engine seams
//!
//! [`Transport`] frames bytes onto the serial link; [`PixelSink`] is the
//! window-addressing layer every drawing routine is written against.
//! Controller drivers implement both, tests mock them.

pub mod sink;
pub mod transport;

pub use sink::PixelSink;
pub use transport::Transport;
