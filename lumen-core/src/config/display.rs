//! Display configuration
//!
//! Supplied once at initialization. Only the rotation changes at runtime,
//! through the driver's `set_rotation`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::geometry::Size;
use crate::orientation::Rotation;

/// Largest panel side accepted by [`DisplayConfig::validate`]
pub const MAX_DIMENSION: u16 = 1024;

/// Maximum serialized configuration size
#[cfg(feature = "serde")]
pub const MAX_CONFIG_SIZE: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Width or height is zero or larger than [`MAX_DIMENSION`]
    InvalidResolution,
    /// Rotation is not a multiple of 90 degrees
    InvalidRotation,
    /// Serialization failed
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// Pixel color depth on the wire
///
/// Only the controller's native 16-bit mode is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorDepth {
    /// 16 bits per pixel, RGB565
    #[default]
    Rgb565,
}

impl ColorDepth {
    /// Bits per pixel
    pub const fn bits_per_pixel(self) -> u8 {
        match self {
            ColorDepth::Rgb565 => 16,
        }
    }

    /// Bytes per pixel
    pub const fn bytes_per_pixel(self) -> usize {
        self.bits_per_pixel() as usize / 8
    }
}

/// Display configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    /// Physical panel width in pixels (frame-memory columns)
    pub width: u16,
    /// Physical panel height in pixels (frame-memory rows)
    pub height: u16,
    /// Rotation applied to caller coordinates
    pub rotation: Rotation,
    /// Wire color depth
    pub color_depth: ColorDepth,
    /// Panel wired blue-green-red (most ILI9341 modules are)
    pub bgr: bool,
}

impl DisplayConfig {
    /// 240x320 ILI9341 panel, portrait
    pub const ILI9341: Self = Self::new(240, 320);

    /// Create a config for a panel of the given physical size
    pub const fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            rotation: Rotation::Deg0,
            color_depth: ColorDepth::Rgb565,
            bgr: true,
        }
    }

    /// Same config with a different rotation
    pub const fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Same config with a different color order
    pub const fn with_bgr(mut self, bgr: bool) -> Self {
        self.bgr = bgr;
        self
    }

    /// Physical panel size
    pub const fn panel_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Caller-visible size in the current rotation
    pub const fn logical_size(&self) -> Size {
        self.rotation.logical_size(self.panel_size())
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid = 1..=MAX_DIMENSION;
        if !valid.contains(&self.width) || !valid.contains(&self.height) {
            return Err(ConfigError::InvalidResolution);
        }
        Ok(())
    }

    /// Serialize to postcard binary
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buffer: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buffer).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize from postcard binary and validate
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::ILI9341
    }
}
