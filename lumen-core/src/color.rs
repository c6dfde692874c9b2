//! RGB565 color
//!
//! The controller runs in its 16 bits-per-pixel mode: 5 bits red, 6 bits
//! green, 5 bits blue, sent most significant byte first.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 16-bit RGB565 color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb565(pub u16);

impl Rgb565 {
    pub const BLACK: Self = Self(0x0000);
    pub const WHITE: Self = Self(0xFFFF);
    pub const RED: Self = Self(0xF800);
    pub const GREEN: Self = Self(0x07E0);
    pub const BLUE: Self = Self(0x001F);
    pub const CYAN: Self = Self(0x07FF);
    pub const MAGENTA: Self = Self(0xF81F);
    pub const YELLOW: Self = Self(0xFFE0);
    pub const ORANGE: Self = Self(0xFD20);
    pub const NAVY: Self = Self(0x000F);
    pub const DARK_GREEN: Self = Self(0x03E0);
    pub const MAROON: Self = Self(0x7800);
    pub const PURPLE: Self = Self(0x780F);
    pub const OLIVE: Self = Self(0x7BE0);
    pub const LIGHT_GREY: Self = Self(0xC618);
    pub const DARK_GREY: Self = Self(0x7BEF);

    /// Build from 5-bit red, 6-bit green and 5-bit blue channels
    ///
    /// Out-of-range channel bits are masked off.
    pub const fn new(r5: u8, g6: u8, b5: u8) -> Self {
        Self((((r5 & 0x1F) as u16) << 11) | (((g6 & 0x3F) as u16) << 5) | (b5 & 0x1F) as u16)
    }

    /// Convert from 8 bits per channel
    ///
    /// Truncates: the low 3 bits of red and blue and the low 2 bits of
    /// green are discarded.
    pub const fn from_rgb888(r: u8, g: u8, b: u8) -> Self {
        Self::new(r >> 3, g >> 2, b >> 3)
    }

    /// Convert from a packed `0xRRGGBB` value
    pub const fn from_rgb888_packed(rgb: u32) -> Self {
        Self::from_rgb888((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Build from the two wire bytes (big-endian)
    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    /// Build from two little-endian bytes (BMP 16 bpp layout)
    pub const fn from_le_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_le_bytes(bytes))
    }

    /// Bytes in the order the controller expects them
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// The raw 16-bit value
    pub const fn into_raw(self) -> u16 {
        self.0
    }

    /// Red channel (0-31)
    pub const fn r(self) -> u8 {
        ((self.0 >> 11) & 0x1F) as u8
    }

    /// Green channel (0-63)
    pub const fn g(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    /// Blue channel (0-31)
    pub const fn b(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Expand to 8 bits per channel
    ///
    /// The high bits are replicated into the low bits so that full scale
    /// maps to 255 and `from_rgb888` of the result gives back `self`.
    pub const fn to_rgb888(self) -> (u8, u8, u8) {
        let r = self.r();
        let g = self.g();
        let b = self.b();
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        Some(Self::from_rgb888_packed(rgb))
    }
}

impl From<u16> for Rgb565 {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Rgb565> for u16 {
    fn from(color: Rgb565) -> Self {
        color.0
    }
}

impl From<(u8, u8, u8)> for Rgb565 {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::from_rgb888(r, g, b)
    }
}
