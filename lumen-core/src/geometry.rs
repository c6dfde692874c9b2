//! Geometry types
//!
//! Callers draw in *logical* coordinates ([`Point`], [`Rect`]), which may
//! be negative or off-screen. The controller is addressed in *physical*
//! coordinates through a [`Window`], which is always fully on the panel.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A logical point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    pub width: u16,
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }

    /// Swap width and height
    pub const fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Total pixel count
    pub const fn area(self) -> u32 {
        self.width as u32 * self.height as u32
    }
}

/// A logical rectangle (top-left corner plus size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle spanning two corners, inclusive, in any order
    ///
    /// A span of the full `i32` range saturates at `u32::MAX` pixels.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let x = a.x.min(b.x);
        let y = a.y.min(b.y);
        let width = (a.x as i64 - b.x as i64).unsigned_abs() + 1;
        let height = (a.y as i64 - b.y as i64).unsigned_abs() + 1;
        Self::new(
            x,
            y,
            u32::try_from(width).unwrap_or(u32::MAX),
            u32::try_from(height).unwrap_or(u32::MAX),
        )
    }

    /// True when the rectangle covers no pixels
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Pixel count
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Exclusive right edge
    fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge
    fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Whether `p` lies inside the rectangle
    pub fn contains(&self, p: Point) -> bool {
        let (px, py) = (p.x as i64, p.y as i64);
        px >= self.x as i64 && px < self.right() && py >= self.y as i64 && py < self.bottom()
    }

    /// Overlap of two rectangles, `None` if they do not overlap
    pub fn intersect(&self, other: &Rect) -> Option<Rect> {
        let x0 = (self.x as i64).max(other.x as i64);
        let y0 = (self.y as i64).max(other.y as i64);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Rect::new(
            x0 as i32,
            y0 as i32,
            (x1 - x0) as u32,
            (y1 - y0) as u32,
        ))
    }

    /// Clip to a screen of the given size anchored at the origin
    pub fn clip_to(&self, screen: Size) -> Option<Rect> {
        self.intersect(&Rect::new(0, 0, screen.width as u32, screen.height as u32))
    }
}

/// Which address counter the controller advances first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanMajor {
    /// Physical x advances first, then y
    RowMajor,
    /// Physical y advances first, then x
    ColumnMajor,
}

/// Direction an axis is walked in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisStep {
    Increasing,
    Decreasing,
}

impl AxisStep {
    /// The opposite direction
    pub const fn reversed(self) -> Self {
        match self {
            AxisStep::Increasing => AxisStep::Decreasing,
            AxisStep::Decreasing => AxisStep::Increasing,
        }
    }
}

/// Order in which the controller fills a window from a pixel stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanDirection {
    pub major: ScanMajor,
    pub x: AxisStep,
    pub y: AxisStep,
}

impl ScanDirection {
    /// Left to right, top to bottom
    pub const ROW_MAJOR: Self = Self {
        major: ScanMajor::RowMajor,
        x: AxisStep::Increasing,
        y: AxisStep::Increasing,
    };

    pub const fn new(major: ScanMajor, x: AxisStep, y: AxisStep) -> Self {
        Self { major, x, y }
    }

    /// Same fast axis, slow axis walked the other way
    ///
    /// Used for sources stored bottom row first.
    pub const fn with_slow_axis_reversed(self) -> Self {
        match self.major {
            ScanMajor::RowMajor => Self {
                y: self.y.reversed(),
                ..self
            },
            ScanMajor::ColumnMajor => Self {
                x: self.x.reversed(),
                ..self
            },
        }
    }
}

impl Default for ScanDirection {
    fn default() -> Self {
        Self::ROW_MAJOR
    }
}

/// Window invariant violation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidWindow;

/// Controller-side write target in physical coordinates
///
/// Bounds are inclusive. A valid window satisfies
/// `x0 <= x1 < panel width` and `y0 <= y1 < panel height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub scan: ScanDirection,
}

impl Window {
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16, scan: ScanDirection) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            scan,
        }
    }

    /// Check the window invariant against the physical panel size
    pub fn validate(&self, panel: Size) -> Result<(), InvalidWindow> {
        if self.x0 > self.x1 || self.y0 > self.y1 {
            return Err(InvalidWindow);
        }
        if self.x1 >= panel.width || self.y1 >= panel.height {
            return Err(InvalidWindow);
        }
        Ok(())
    }

    /// Width in pixels (window must be valid)
    pub const fn width(&self) -> u16 {
        self.x1 - self.x0 + 1
    }

    /// Height in pixels (window must be valid)
    pub const fn height(&self) -> u16 {
        self.y1 - self.y0 + 1
    }

    /// Number of pixels the controller accepts before wrapping
    pub const fn pixel_count(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }

    /// Physical pixel written by the `index`-th color of a stream
    ///
    /// Returns `None` once the stream runs past the end of the window.
    pub fn position(&self, index: u32) -> Option<(u16, u16)> {
        if index >= self.pixel_count() {
            return None;
        }
        let (fast_len, _) = match self.scan.major {
            ScanMajor::RowMajor => (self.width() as u32, self.height() as u32),
            ScanMajor::ColumnMajor => (self.height() as u32, self.width() as u32),
        };
        let fast = (index % fast_len) as u16;
        let slow = (index / fast_len) as u16;
        let (dx, dy) = match self.scan.major {
            ScanMajor::RowMajor => (fast, slow),
            ScanMajor::ColumnMajor => (slow, fast),
        };
        let x = match self.scan.x {
            AxisStep::Increasing => self.x0 + dx,
            AxisStep::Decreasing => self.x1 - dx,
        };
        let y = match self.scan.y {
            AxisStep::Increasing => self.y0 + dy,
            AxisStep::Decreasing => self.y1 - dy,
        };
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PANEL: Size = Size::new(240, 320);

    #[test]
    fn test_rect_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersect(&b), Some(Rect::new(5, 5, 5, 5)));

        let c = Rect::new(10, 0, 5, 5);
        assert_eq!(a.intersect(&c), None);
    }

    #[test]
    fn test_rect_clip_negative_origin() {
        let r = Rect::new(-4, -2, 10, 5);
        assert_eq!(r.clip_to(PANEL), Some(Rect::new(0, 0, 6, 3)));
    }

    #[test]
    fn test_rect_clip_fully_off_screen() {
        assert_eq!(Rect::new(300, 0, 10, 10).clip_to(PANEL), None);
        assert_eq!(Rect::new(-20, 0, 10, 10).clip_to(PANEL), None);
        assert_eq!(Rect::new(0, 0, 0, 10).clip_to(PANEL), None);
    }

    #[test]
    fn test_rect_from_corners() {
        let r = Rect::from_corners(Point::new(5, 9), Point::new(2, 3));
        assert_eq!(r, Rect::new(2, 3, 4, 7));
    }

    #[test]
    fn test_rect_from_corners_full_range() {
        let r = Rect::from_corners(Point::new(i32::MIN, 0), Point::new(i32::MAX, 0));
        assert_eq!(r.x, i32::MIN);
        assert_eq!(r.width, u32::MAX);
        assert_eq!(r.height, 1);
        assert_eq!(r.clip_to(PANEL), Some(Rect::new(0, 0, 240, 1)));
    }

    #[test]
    fn test_rect_area_does_not_overflow() {
        assert_eq!(Rect::new(0, 0, u32::MAX, 2).area(), 2 * u32::MAX as u64);
        assert_eq!(Rect::new(0, 0, 0, 7).area(), 0);
    }

    #[test]
    fn test_window_validate() {
        let scan = ScanDirection::ROW_MAJOR;
        assert!(Window::new(0, 0, 239, 319, scan).validate(PANEL).is_ok());
        assert_eq!(
            Window::new(0, 0, 240, 10, scan).validate(PANEL),
            Err(InvalidWindow)
        );
        assert_eq!(
            Window::new(10, 0, 5, 10, scan).validate(PANEL),
            Err(InvalidWindow)
        );
        assert_eq!(
            Window::new(0, 20, 5, 10, scan).validate(PANEL),
            Err(InvalidWindow)
        );
    }

    #[test]
    fn test_window_position_row_major() {
        let w = Window::new(10, 20, 12, 21, ScanDirection::ROW_MAJOR);
        assert_eq!(w.pixel_count(), 6);
        assert_eq!(w.position(0), Some((10, 20)));
        assert_eq!(w.position(2), Some((12, 20)));
        assert_eq!(w.position(3), Some((10, 21)));
        assert_eq!(w.position(6), None);
    }

    #[test]
    fn test_window_position_column_major_mirrored() {
        let scan = ScanDirection::new(
            ScanMajor::ColumnMajor,
            AxisStep::Decreasing,
            AxisStep::Increasing,
        );
        let w = Window::new(10, 20, 11, 22, scan);
        // Fast axis is y, starting at the right-hand column
        assert_eq!(w.position(0), Some((11, 20)));
        assert_eq!(w.position(2), Some((11, 22)));
        assert_eq!(w.position(3), Some((10, 20)));
    }

    #[test]
    fn test_slow_axis_reversal() {
        let flipped = ScanDirection::ROW_MAJOR.with_slow_axis_reversed();
        assert_eq!(flipped.x, AxisStep::Increasing);
        assert_eq!(flipped.y, AxisStep::Decreasing);

        let col = ScanDirection::new(
            ScanMajor::ColumnMajor,
            AxisStep::Decreasing,
            AxisStep::Increasing,
        );
        assert_eq!(col.with_slow_axis_reversed().x, AxisStep::Increasing);
        assert_eq!(col.with_slow_axis_reversed().y, AxisStep::Increasing);
    }
}
