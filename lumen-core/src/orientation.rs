//! Display rotation
//!
//! The panel's frame memory is portrait, `W` columns by `H` rows. Callers
//! draw in logical coordinates for the configured rotation; this module is
//! the only place logical coordinates are turned into physical ones, at the
//! point where a [`Window`] is addressed.
//!
//! | Rotation | logical size | logical `(x, y)` → physical | scan |
//! |----------|--------------|-----------------------------|------|
//! | 0°       | W × H        | `(x, y)`                    | row-major, x+, y+ |
//! | 90°      | H × W        | `(W-1-y, x)`                | column-major, x-, y+ |
//! | 180°     | W × H        | `(W-1-x, H-1-y)`            | row-major, x-, y- |
//! | 270°     | H × W        | `(y, H-1-x)`                | column-major, x+, y- |

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::geometry::{AxisStep, Point, Rect, ScanDirection, ScanMajor, Size, Window};

/// Clockwise display rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    /// Portrait, panel native
    #[default]
    Deg0,
    /// Landscape, top edge on the right of the panel
    Deg90,
    /// Portrait, upside down
    Deg180,
    /// Landscape, top edge on the left of the panel
    Deg270,
}

impl Rotation {
    /// All rotations in clockwise order
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    /// Rotation in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Rotation from a multiple of 90 degrees
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// The next rotation clockwise
    pub const fn next_clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// True for the landscape rotations, where logical axes are swapped
    pub const fn swaps_axes(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Caller-visible size for a panel of the given physical size
    pub const fn logical_size(self, panel: Size) -> Size {
        if self.swaps_axes() {
            panel.transposed()
        } else {
            panel
        }
    }

    /// Scan direction that makes a logical row-major stream land correctly
    pub const fn scan_direction(self) -> ScanDirection {
        match self {
            Rotation::Deg0 => ScanDirection::ROW_MAJOR,
            Rotation::Deg90 => ScanDirection::new(
                ScanMajor::ColumnMajor,
                AxisStep::Decreasing,
                AxisStep::Increasing,
            ),
            Rotation::Deg180 => ScanDirection::new(
                ScanMajor::RowMajor,
                AxisStep::Decreasing,
                AxisStep::Decreasing,
            ),
            Rotation::Deg270 => ScanDirection::new(
                ScanMajor::ColumnMajor,
                AxisStep::Increasing,
                AxisStep::Decreasing,
            ),
        }
    }

    /// Map a logical point to physical frame-memory coordinates
    ///
    /// Returns `None` for points outside the logical screen.
    pub fn to_physical(self, p: Point, panel: Size) -> Option<(u16, u16)> {
        let logical = self.logical_size(panel);
        if p.x < 0 || p.y < 0 || p.x >= logical.width as i32 || p.y >= logical.height as i32 {
            return None;
        }
        let (x, y) = (p.x as u16, p.y as u16);
        let (w, h) = (panel.width, panel.height);
        Some(match self {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        })
    }

    /// Map physical frame-memory coordinates back to a logical point
    pub fn to_logical(self, px: u16, py: u16, panel: Size) -> Point {
        let (w, h) = (panel.width as i32, panel.height as i32);
        let (px, py) = (px as i32, py as i32);
        match self {
            Rotation::Deg0 => Point::new(px, py),
            Rotation::Deg90 => Point::new(py, w - 1 - px),
            Rotation::Deg180 => Point::new(w - 1 - px, h - 1 - py),
            Rotation::Deg270 => Point::new(h - 1 - py, px),
        }
    }

    /// Physical window covering an on-screen logical rectangle
    ///
    /// Returns `None` if `rect` is empty or not entirely on screen; callers
    /// clip first.
    pub fn window_for(self, rect: &Rect, panel: Size) -> Option<Window> {
        self.window_with_scan(rect, panel, self.scan_direction())
    }

    /// Like [`window_for`](Self::window_for) for sources that store their
    /// bottom row first
    pub fn window_for_rows_reversed(self, rect: &Rect, panel: Size) -> Option<Window> {
        self.window_with_scan(rect, panel, self.scan_direction().with_slow_axis_reversed())
    }

    fn window_with_scan(self, rect: &Rect, panel: Size, scan: ScanDirection) -> Option<Window> {
        if rect.is_empty() {
            return None;
        }
        let far = Point::new(
            rect.x.checked_add(i32::try_from(rect.width - 1).ok()?)?,
            rect.y.checked_add(i32::try_from(rect.height - 1).ok()?)?,
        );
        let (ax, ay) = self.to_physical(Point::new(rect.x, rect.y), panel)?;
        let (bx, by) = self.to_physical(far, panel)?;
        Some(Window::new(
            ax.min(bx),
            ay.min(by),
            ax.max(bx),
            ay.max(by),
            scan,
        ))
    }
}

impl FromStr for Rotation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let named = [
            ("portrait", Rotation::Deg0),
            ("landscape", Rotation::Deg90),
            ("portrait-flipped", Rotation::Deg180),
            ("portrait_flipped", Rotation::Deg180),
            ("landscape-flipped", Rotation::Deg270),
            ("landscape_flipped", Rotation::Deg270),
        ];
        if let Some((_, rotation)) = named.iter().find(|(name, _)| name.eq_ignore_ascii_case(s)) {
            return Ok(*rotation);
        }
        s.parse::<u16>()
            .ok()
            .and_then(Rotation::from_degrees)
            .ok_or(ConfigError::InvalidRotation)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Deg0 => write!(f, "portrait"),
            Rotation::Deg90 => write!(f, "landscape"),
            Rotation::Deg180 => write!(f, "portrait-flipped"),
            Rotation::Deg270 => write!(f, "landscape-flipped"),
        }
    }
}
