//! Board-agnostic rendering engine for SPI display controllers
//!
//! This crate contains everything that does not depend on a specific
//! controller or board:
//!
//! - Configuration types and the RGB565 color model
//! - Geometry, controller windows and the rotation transform
//! - The `Transport` and `PixelSink` seams drivers implement
//! - Primitive rasterizer, font engine and bitmap streamer
//! - The `Draw` extension trait tying them together
//!
//! Nothing here keeps a frame buffer. Every draw call addresses a window
//! on the controller and streams the pixels for it.

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod bitmap;
pub mod color;
pub mod config;
pub mod draw;
pub mod error;
pub mod font;
pub mod geometry;
pub mod orientation;
pub mod raster;
pub mod traits;

#[cfg(test)]
mod mock;

pub use color::Rgb565;
pub use config::{ConfigError, DisplayConfig};
pub use draw::Draw;
pub use error::Error;
pub use font::{GlyphNotFound, TextStyle};
pub use geometry::{Point, Rect, ScanDirection, Size, Window};
pub use orientation::Rotation;
pub use traits::{PixelSink, Transport};
