//! Image header parsing

use lumen_hal::{ByteSource, StorageError};

use crate::color::Rgb565;
use crate::geometry::Size;

/// Magic for the raw RGB565 format
pub const RAW_MAGIC: [u8; 4] = *b"R565";

/// Bytes before the first pixel of a raw image
pub const RAW_HEADER_LEN: usize = 8;

const BMP_FILE_HEADER_LEN: u32 = 14;
const BMP_INFO_HEADER_LEN: u32 = 40;
const BI_RGB: u32 = 0;
const BI_BITFIELDS: u32 = 3;

/// How pixels are encoded in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    /// RGB565, most significant byte first (raw images)
    Rgb565Be,
    /// RGB565, least significant byte first (16 bpp BMP with bit fields)
    Rgb565Le,
    /// X1R5G5B5, least significant byte first (plain 16 bpp BMP)
    Rgb555Le,
    /// Blue, green, red bytes (24 bpp BMP)
    Bgr888,
}

impl PixelFormat {
    /// Encoded size of one pixel
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Bgr888 => 3,
            _ => 2,
        }
    }

    /// Decode one pixel from the first `bytes_per_pixel` bytes of `raw`
    pub fn decode(self, raw: [u8; 3]) -> Rgb565 {
        let [b0, b1, b2] = raw;
        match self {
            PixelFormat::Rgb565Be => Rgb565::from_be_bytes([b0, b1]),
            PixelFormat::Rgb565Le => Rgb565::from_le_bytes([b0, b1]),
            PixelFormat::Rgb555Le => {
                let raw = u16::from_le_bytes([b0, b1]);
                let g5 = ((raw >> 5) & 0x1F) as u8;
                Rgb565::new((raw >> 10) as u8, (g5 << 1) | (g5 >> 4), raw as u8)
            }
            PixelFormat::Bgr888 => Rgb565::from_rgb888(b2, b1, b0),
        }
    }
}

/// Why a header could not be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HeaderError {
    /// Unknown magic or an unsupported variant
    Format,
    /// The source failed while reading the header
    Read(StorageError),
}

impl From<StorageError> for HeaderError {
    fn from(e: StorageError) -> Self {
        HeaderError::Read(e)
    }
}

/// Decoded image header
///
/// After [`read`](BitmapHeader::read) returns, the source is positioned at
/// the first pixel byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitmapHeader {
    pub size: Size,
    pub format: PixelFormat,
    /// Rows are stored bottom row first
    pub bottom_up: bool,
    /// Bytes of padding after each row
    pub row_padding: usize,
}

impl BitmapHeader {
    /// Read a raw RGB565 or BMP header
    pub fn read<B: ByteSource + ?Sized>(source: &mut B) -> Result<Self, HeaderError> {
        let mut magic = [0u8; 2];
        source.read_exact(&mut magic)?;
        match &magic {
            b"R5" => Self::read_raw(source),
            b"BM" => Self::read_bmp(source),
            _ => Err(HeaderError::Format),
        }
    }

    /// Encoded bytes per row, padding included
    pub fn row_stride(&self) -> usize {
        self.size.width as usize * self.format.bytes_per_pixel() + self.row_padding
    }

    fn read_raw<B: ByteSource + ?Sized>(source: &mut B) -> Result<Self, HeaderError> {
        let mut rest = [0u8; RAW_HEADER_LEN - 2];
        source.read_exact(&mut rest)?;
        if rest[..2] != RAW_MAGIC[2..] {
            return Err(HeaderError::Format);
        }
        let width = u16::from_le_bytes([rest[2], rest[3]]);
        let height = u16::from_le_bytes([rest[4], rest[5]]);
        Ok(Self {
            size: Size::new(width, height),
            format: PixelFormat::Rgb565Be,
            bottom_up: false,
            row_padding: 0,
        })
    }

    fn read_bmp<B: ByteSource + ?Sized>(source: &mut B) -> Result<Self, HeaderError> {
        // Rest of the file header and the info header up to `compression`
        let mut head = [0u8; 32];
        source.read_exact(&mut head)?;
        let mut consumed = 2 + head.len() as u32;

        let pixel_offset = le_u32(&head[8..12]);
        let info_len = le_u32(&head[12..16]);
        let width = le_u32(&head[16..20]) as i32;
        let height = le_u32(&head[20..24]) as i32;
        let bpp = u16::from_le_bytes([head[26], head[27]]);
        let compression = le_u32(&head[28..32]);

        if info_len < BMP_INFO_HEADER_LEN || width <= 0 || height == 0 {
            return Err(HeaderError::Format);
        }
        let width = u16::try_from(width).map_err(|_| HeaderError::Format)?;
        let height = u16::try_from(height.unsigned_abs()).map_err(|_| HeaderError::Format)?;
        let bottom_up = le_u32(&head[20..24]) as i32 > 0;

        let format = match (bpp, compression) {
            (24, BI_RGB) => PixelFormat::Bgr888,
            (16, BI_RGB) => PixelFormat::Rgb555Le,
            (16, BI_BITFIELDS) => {
                let masks_at = BMP_FILE_HEADER_LEN + BMP_INFO_HEADER_LEN;
                skip(source, masks_at - consumed)?;
                let mut masks = [0u8; 12];
                source.read_exact(&mut masks)?;
                consumed = masks_at + masks.len() as u32;
                let rgb = (le_u32(&masks[0..4]), le_u32(&masks[4..8]), le_u32(&masks[8..12]));
                if rgb != (0xF800, 0x07E0, 0x001F) {
                    return Err(HeaderError::Format);
                }
                PixelFormat::Rgb565Le
            }
            _ => return Err(HeaderError::Format),
        };

        let gap = pixel_offset
            .checked_sub(consumed)
            .ok_or(HeaderError::Format)?;
        skip(source, gap)?;

        let row_bytes = width as usize * format.bytes_per_pixel();
        Ok(Self {
            size: Size::new(width, height),
            format,
            bottom_up,
            row_padding: (4 - row_bytes % 4) % 4,
        })
    }
}

fn le_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes[..4]);
    u32::from_le_bytes(word)
}

fn skip<B: ByteSource + ?Sized>(source: &mut B, count: u32) -> Result<(), StorageError> {
    source.skip(count as usize)
}
