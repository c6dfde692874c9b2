//! ILI9341 command set
//!
//! Opcodes, parameter values and the mapping from a [`Window`] to the
//! controller's address registers.
//!
//! # Address model
//!
//! MADCTL decides how the column and page counters walk the frame memory:
//!
//! - MV exchanges rows and columns. Without it the column counter (fast)
//!   walks physical x; with it the column counter walks physical y.
//! - MX and MY mirror the x and y walks.
//!
//! ILI9341 modules wire the source driver right to left, so MX set is the
//! un-mirrored x direction.

use lumen_core::geometry::{AxisStep, ScanDirection, ScanMajor, Size, Window};

/// ILI9341 opcodes
pub mod cmd {
    /// No operation
    pub const NOP: u8 = 0x00;
    /// Software reset
    pub const SWRESET: u8 = 0x01;
    /// Enter sleep mode
    pub const SLPIN: u8 = 0x10;
    /// Sleep out
    pub const SLPOUT: u8 = 0x11;
    /// Partial mode on
    pub const PTLON: u8 = 0x12;
    /// Normal display mode on
    pub const NORON: u8 = 0x13;
    /// Display inversion off
    pub const INVOFF: u8 = 0x20;
    /// Display inversion on
    pub const INVON: u8 = 0x21;
    /// Gamma curve select
    pub const GAMMASET: u8 = 0x26;
    /// Display off
    pub const DISPOFF: u8 = 0x28;
    /// Display on
    pub const DISPON: u8 = 0x29;
    /// Column address set
    pub const CASET: u8 = 0x2A;
    /// Page address set
    pub const PASET: u8 = 0x2B;
    /// Memory write
    pub const RAMWR: u8 = 0x2C;
    /// Memory read
    pub const RAMRD: u8 = 0x2E;
    /// Memory access control
    pub const MADCTL: u8 = 0x36;
    /// Pixel format set
    pub const PIXFMT: u8 = 0x3A;
    /// Entry mode set
    pub const ETMOD: u8 = 0xB7;
}

/// MADCTL bits
pub mod madctl {
    /// Row address order
    pub const MY: u8 = 0x80;
    /// Column address order
    pub const MX: u8 = 0x40;
    /// Row/column exchange
    pub const MV: u8 = 0x20;
    /// Vertical refresh order
    pub const ML: u8 = 0x10;
    /// Blue-green-red color filter order
    pub const BGR: u8 = 0x08;
    /// Horizontal refresh order
    pub const MH: u8 = 0x04;
}

/// PIXFMT parameter for 16 bits per pixel on both interfaces
pub const PIXFMT_16BPP: u8 = 0x55;

/// GAMMASET parameter for gamma curve 1
pub const GAMMA_CURVE_1: u8 = 0x01;

/// ETMOD parameter: normal display, low voltage detection off
pub const ETMOD_NORMAL: u8 = 0x07;

/// Wait after SWRESET and SLPOUT before the next command
pub const RESET_DELAY_MS: u32 = 120;

/// Wait after SLPIN
pub const SLEEP_IN_DELAY_MS: u32 = 5;

/// MADCTL value for a scan direction
pub fn madctl_value(scan: ScanDirection, bgr: bool) -> u8 {
    let mut value = 0;
    if scan.major == ScanMajor::ColumnMajor {
        value |= madctl::MV;
    }
    if scan.x == AxisStep::Increasing {
        value |= madctl::MX;
    }
    if scan.y == AxisStep::Decreasing {
        value |= madctl::MY;
    }
    if bgr {
        value |= madctl::BGR;
    }
    value
}

/// Inclusive address range, `(start, end)`
pub type AddressRange = (u16, u16);

/// Column and page ranges that cover `window` under its scan direction
///
/// The window must be valid for `panel`.
pub fn address_ranges(window: &Window, panel: Size) -> (AddressRange, AddressRange) {
    let x = axis_range(window.x0, window.x1, panel.width, window.scan.x);
    let y = axis_range(window.y0, window.y1, panel.height, window.scan.y);
    match window.scan.major {
        ScanMajor::RowMajor => (x, y),
        ScanMajor::ColumnMajor => (y, x),
    }
}

fn axis_range(start: u16, end: u16, extent: u16, step: AxisStep) -> AddressRange {
    match step {
        AxisStep::Increasing => (start, end),
        AxisStep::Decreasing => (extent - 1 - end, extent - 1 - start),
    }
}

/// CASET/PASET parameter bytes: start and end, big-endian
pub fn range_params((start, end): AddressRange) -> [u8; 4] {
    let [s_hi, s_lo] = start.to_be_bytes();
    let [e_hi, e_lo] = end.to_be_bytes();
    [s_hi, s_lo, e_hi, e_lo]
}
