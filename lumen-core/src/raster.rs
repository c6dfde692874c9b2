//! Primitive rasterizer
//!
//! Every shape is broken down into rectangles that are clipped to the
//! logical screen, addressed with one window each and filled with one
//! run. Nothing is buffered on the host side.

use core::iter;

use crate::color::Rgb565;
use crate::error::Error;
use crate::geometry::{Point, Rect, Size};
use crate::traits::PixelSink;

/// Clip `rect` to the logical screen and address the visible part
///
/// Returns the clipped rectangle, or `None` (with no traffic) when nothing
/// of `rect` is on screen.
pub fn address<S>(sink: &mut S, rect: &Rect) -> Result<Option<Rect>, Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let Some(visible) = rect.clip_to(sink.logical_size()) else {
        return Ok(None);
    };
    let window = sink
        .rotation()
        .window_for(&visible, sink.panel_size())
        .ok_or(Error::InvalidWindow)?;
    sink.set_window(&window)?;
    Ok(Some(visible))
}

/// Fill a rectangle with one window and one run
pub fn fill_rect<S>(sink: &mut S, rect: Rect, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    match address(sink, &rect)? {
        Some(visible) => sink.write_pixels(iter::repeat(color).take(visible.area() as usize)),
        None => Ok(()),
    }
}

/// Plot a single pixel
pub fn pixel<S>(sink: &mut S, x: i32, y: i32, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    fill_rect(sink, Rect::new(x, y, 1, 1), color)
}

/// Horizontal line of `length` pixels starting at `(x, y)`
///
/// A zero length still plots the start pixel.
pub fn hline<S>(sink: &mut S, x: i32, y: i32, length: u32, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    thick_hline(sink, x, y, length, 1, color)
}

/// Vertical line of `length` pixels starting at `(x, y)`
///
/// A zero length still plots the start pixel.
pub fn vline<S>(sink: &mut S, x: i32, y: i32, length: u32, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    thick_vline(sink, x, y, length, 1, color)
}

/// Horizontal line `width` pixels thick, growing downwards
pub fn thick_hline<S>(
    sink: &mut S,
    x: i32,
    y: i32,
    length: u32,
    width: u32,
    color: Rgb565,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    fill_rect(sink, Rect::new(x, y, length.max(1), width.max(1)), color)
}

/// Vertical line `width` pixels thick, growing rightwards
pub fn thick_vline<S>(
    sink: &mut S,
    x: i32,
    y: i32,
    length: u32,
    width: u32,
    color: Rgb565,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    fill_rect(sink, Rect::new(x, y, width.max(1), length.max(1)), color)
}

/// Points of a Bresenham line, both endpoints included
///
/// Steps along the major axis one pixel at a time. The minor axis only
/// advances once the error is strictly positive, so `(0, 0) -> (4, 2)`
/// visits `(0,0) (1,0) (2,1) (3,1) (4,2)`.
#[derive(Debug, Clone)]
pub struct LinePoints {
    x: i64,
    y: i64,
    sx: i64,
    sy: i64,
    x_major: bool,
    /// Major and minor axis lengths
    major: i64,
    minor: i64,
    decision: i64,
    remaining: u64,
}

impl LinePoints {
    pub fn new(start: Point, end: Point) -> Self {
        let (x0, y0) = (start.x as i64, start.y as i64);
        let (x1, y1) = (end.x as i64, end.y as i64);
        let (dx, dy) = ((x1 - x0).abs(), (y1 - y0).abs());
        let x_major = dx >= dy;
        let (major, minor) = if x_major { (dx, dy) } else { (dy, dx) };
        Self {
            x: x0,
            y: y0,
            sx: if x1 < x0 { -1 } else { 1 },
            sy: if y1 < y0 { -1 } else { 1 },
            x_major,
            major,
            minor,
            decision: 2 * minor - major,
            remaining: major as u64 + 1,
        }
    }
}

impl Iterator for LinePoints {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let point = Point::new(self.x as i32, self.y as i32);
        let minor_step = self.decision > 0;
        if minor_step {
            self.decision -= 2 * self.major;
        }
        self.decision += 2 * self.minor;
        if self.x_major {
            self.x += self.sx;
            if minor_step {
                self.y += self.sy;
            }
        } else {
            self.y += self.sy;
            if minor_step {
                self.x += self.sx;
            }
        }
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining as usize;
        (n, Some(n))
    }
}

/// Line between two points, both included
///
/// Axis-aligned lines take the single-window fast path; everything else,
/// exact diagonals included, is plotted point by point.
pub fn line<S>(sink: &mut S, start: Point, end: Point, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let screen = sink.logical_size();
    if start.y == end.y {
        return match clip_span(start.x, end.x, screen.width) {
            Some((x, length)) => hline(sink, x, start.y, length, color),
            None => Ok(()),
        };
    }
    if start.x == end.x {
        return match clip_span(start.y, end.y, screen.height) {
            Some((y, length)) => vline(sink, start.x, y, length, color),
            None => Ok(()),
        };
    }
    for p in LinePoints::new(start, end) {
        pixel(sink, p.x, p.y, color)?;
    }
    Ok(())
}

/// Rectangle outline from four lines
pub fn rect<S>(sink: &mut S, rect: Rect, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    if rect.is_empty() {
        return Ok(());
    }
    let (Some(right), Some(bottom)) = (
        to_i32(rect.x as i64 + rect.width as i64 - 1),
        to_i32(rect.y as i64 + rect.height as i64 - 1),
    ) else {
        return Ok(());
    };
    let top_left = Point::new(rect.x, rect.y);
    line(sink, top_left, Point::new(right, rect.y), color)?;
    line(sink, Point::new(rect.x, bottom), Point::new(right, bottom), color)?;
    line(sink, top_left, Point::new(rect.x, bottom), color)?;
    line(sink, Point::new(right, rect.y), Point::new(right, bottom), color)
}

/// Rectangle with a border of the given thickness and an optional infill
///
/// The border is drawn inside `rect`. A border that meets itself fills
/// the whole rectangle with the border color.
pub fn styled_rect<S>(
    sink: &mut S,
    rect: Rect,
    border: u32,
    border_color: Rgb565,
    infill: Option<Rgb565>,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    if rect.is_empty() {
        return Ok(());
    }
    let doubled = border.saturating_mul(2);
    if doubled >= rect.width || doubled >= rect.height {
        let color = if border == 0 { infill } else { Some(border_color) };
        return match color {
            Some(color) => fill_rect(sink, rect, color),
            None => Ok(()),
        };
    }
    // Edges that do not fit an i32 lie past the right or bottom of any screen
    let offset = |base: i32, by: u32| to_i32(base as i64 + by as i64);
    let inner_x = offset(rect.x, border);
    let inner_y = offset(rect.y, border);
    let (inner_width, inner_height) = (rect.width - doubled, rect.height - doubled);
    if border > 0 {
        thick_hline(sink, rect.x, rect.y, rect.width, border, border_color)?;
        if let Some(bottom) = offset(rect.y, rect.height - border) {
            thick_hline(sink, rect.x, bottom, rect.width, border, border_color)?;
        }
        if let Some(y) = inner_y {
            thick_vline(sink, rect.x, y, inner_height, border, border_color)?;
            if let Some(right) = offset(rect.x, rect.width - border) {
                thick_vline(sink, right, y, inner_height, border, border_color)?;
            }
        }
    }
    match (infill, inner_x, inner_y) {
        (Some(fill), Some(x), Some(y)) => {
            fill_rect(sink, Rect::new(x, y, inner_width, inner_height), fill)
        }
        _ => Ok(()),
    }
}

/// Circle outline, midpoint algorithm
pub fn circle<S>(sink: &mut S, center: Point, radius: u32, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    if radius == 0 {
        return pixel(sink, center.x, center.y, color);
    }
    if ring_misses_screen(center, radius, radius, sink.logical_size()) {
        return Ok(());
    }
    let (cx, cy) = (center.x as i64, center.y as i64);
    let mut x = radius as i64;
    let mut y = 0i64;
    let mut err = 1 - x;
    while x >= y {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            plot(sink, cx + dx, cy + dy, color)?;
        }
        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
    Ok(())
}

/// Circle outline `border` pixels thick
pub fn thick_circle<S>(
    sink: &mut S,
    center: Point,
    radius: u32,
    border: u32,
    color: Rgb565,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    arc(sink, center, radius, border, 0, 360, color)
}

/// Arc of a ring `border` pixels thick, centered on the circle of `radius`
///
/// Angles are whole degrees clockwise from twelve o'clock; both end rays
/// are included. A `sweep` of 360 or more draws the whole ring and 0 draws
/// nothing. Only visible rows are scanned, and each contiguous span of a
/// row is sent as one run.
pub fn arc<S>(
    sink: &mut S,
    center: Point,
    radius: u32,
    border: u32,
    start: i32,
    sweep: u32,
    color: Rgb565,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    if sweep == 0 {
        return Ok(());
    }
    let inner = radius.saturating_sub(border / 2);
    let outer = inner.saturating_add(border.max(1) - 1);
    let screen = sink.logical_size();
    if ring_misses_screen(center, inner, outer, screen) {
        return Ok(());
    }
    let sector = Sector::new(start, sweep);

    // Pixel centers with (r - 1/2)^2 <= d^2 < (r + 1/2)^2, scaled by 4
    let lower = match inner {
        0 => 0,
        r => (2 * r as i128 - 1).pow(2),
    };
    let upper = (2 * outer as i128 + 1).pow(2);

    let (cx, cy) = (center.x as i64, center.y as i64);
    let first = (cy - outer as i64).max(0);
    let last = (cy + outer as i64).min(screen.height as i64 - 1);
    for row in first..=last {
        let dy = row - cy;
        let room = upper - 4 * (dy as i128).pow(2);
        if room <= 0 {
            continue;
        }
        let reach = isqrt(((room - 1) / 4) as u128) as i64;
        let left = (cx - reach).max(0);
        let right = (cx + reach).min(screen.width as i64 - 1);
        let mut run: Option<i64> = None;
        for x in left..=right + 1 {
            let dx = x - cx;
            let d2 = 4 * ((dx as i128).pow(2) + (dy as i128).pow(2));
            let inside = x <= right && d2 >= lower && sector.contains(dx, dy);
            match (inside, run) {
                (true, None) => run = Some(x),
                (false, Some(from)) => {
                    hline(sink, from as i32, row as i32, (x - from) as u32, color)?;
                    run = None;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// sin(0..=90 degrees) in Q14
const SIN_Q14: [i64; 91] = [
    0, 286, 572, 857, 1143, 1428, 1713, 1997, 2280, 2563, 2845, 3126, 3406, 3686, 3964, 4240,
    4516, 4790, 5063, 5334, 5604, 5872, 6138, 6402, 6664, 6924, 7182, 7438, 7692, 7943, 8192,
    8438, 8682, 8923, 9162, 9397, 9630, 9860, 10087, 10311, 10531, 10749, 10963, 11174, 11381,
    11585, 11786, 11982, 12176, 12365, 12551, 12733, 12911, 13085, 13255, 13421, 13583, 13741,
    13894, 14044, 14189, 14330, 14466, 14598, 14726, 14849, 14968, 15082, 15191, 15296, 15396,
    15491, 15582, 15668, 15749, 15826, 15897, 15964, 16026, 16083, 16135, 16182, 16225, 16262,
    16294, 16322, 16344, 16362, 16374, 16382, 16384,
];

fn sin_q14(degrees: u32) -> i64 {
    let d = (degrees % 360) as usize;
    match d {
        0..=90 => SIN_Q14[d],
        91..=180 => SIN_Q14[180 - d],
        181..=270 => -SIN_Q14[d - 180],
        _ => -SIN_Q14[360 - d],
    }
}

/// Screen-space direction of a clockwise angle from twelve o'clock
fn direction(degrees: u32) -> (i64, i64) {
    (sin_q14(degrees), -sin_q14(degrees + 90))
}

/// Positive when `b` lies clockwise of `a` (y grows downwards)
fn cross(a: (i64, i64), b: (i64, i64)) -> i64 {
    a.0 * b.1 - a.1 * b.0
}

/// Angular range of an arc
struct Sector {
    from: (i64, i64),
    to: (i64, i64),
    sweep: u32,
}

impl Sector {
    fn new(start: i32, sweep: u32) -> Self {
        let start = start.rem_euclid(360) as u32;
        let sweep = sweep.min(360);
        Self {
            from: direction(start),
            to: direction(start + sweep),
            sweep,
        }
    }

    fn contains(&self, dx: i64, dy: i64) -> bool {
        let p = (dx, dy);
        match self.sweep {
            360 => true,
            0..=180 => cross(self.from, p) >= 0 && cross(p, self.to) >= 0,
            // reflex: everything except the open gap from `to` back to `from`
            _ => !(cross(self.to, p) > 0 && cross(p, self.from) > 0),
        }
    }
}

/// Filled circle, one horizontal run per scanline
pub fn fill_circle<S>(sink: &mut S, center: Point, radius: u32, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    fill_ellipse(sink, center, radius, radius, color)
}

/// Filled axis-aligned ellipse, one horizontal run per scanline
pub fn fill_ellipse<S>(
    sink: &mut S,
    center: Point,
    rx: u32,
    ry: u32,
    color: Rgb565,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let size = sink.logical_size();
    let (cx, cy) = (center.x as i64, center.y as i64);
    let first = (cy - ry as i64).max(0);
    let last = (cy + ry as i64).min(size.height as i64 - 1);
    let (rx2, ry2) = (rx as u128 * rx as u128, ry as u128 * ry as u128);
    for row in first..=last {
        let half = if ry == 0 {
            rx as i64
        } else {
            let dy = (row - cy).unsigned_abs() as u128;
            isqrt(rx2.saturating_mul(ry2 - dy * dy) / ry2) as i64
        };
        let left = (cx - half).max(0);
        let right = (cx + half).min(size.width as i64 - 1);
        if left > right {
            continue;
        }
        hline(sink, left as i32, row as i32, (right - left + 1) as u32, color)?;
    }
    Ok(())
}

/// Fill the whole logical screen
pub fn fill_screen<S>(sink: &mut S, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let size = sink.logical_size();
    fill_rect(sink, Rect::new(0, 0, size.width as u32, size.height as u32), color)
}

/// Fill the screen leaving a `margin` pixel frame untouched
///
/// Draws nothing when the margins meet.
pub fn fill_screen_margin<S>(sink: &mut S, color: Rgb565, margin: u32) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let size = sink.logical_size();
    let width = (size.width as u32).saturating_sub(margin.saturating_mul(2));
    let height = (size.height as u32).saturating_sub(margin.saturating_mul(2));
    if width == 0 || height == 0 {
        return Ok(());
    }
    fill_rect(sink, Rect::new(margin as i32, margin as i32, width, height), color)
}

fn plot<S>(sink: &mut S, x: i64, y: i64, color: Rgb565) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    match (to_i32(x), to_i32(y)) {
        (Some(x), Some(y)) => pixel(sink, x, y, color),
        _ => Ok(()),
    }
}

/// Inclusive span between `a` and `b`, clipped to `0..extent`, as start and
/// length
fn clip_span(a: i32, b: i32, extent: u16) -> Option<(i32, u32)> {
    let lo = (a.min(b) as i64).max(0);
    let hi = (a.max(b) as i64).min(extent as i64 - 1);
    if lo > hi {
        return None;
    }
    Some((lo as i32, (hi - lo + 1) as u32))
}

/// True when no pixel between `inner` and `outer` (plus a pixel of slack)
/// from `center` can land on the screen
fn ring_misses_screen(center: Point, inner: u32, outer: u32, screen: Size) -> bool {
    if screen.width == 0 || screen.height == 0 {
        return true;
    }
    let (cx, cy) = (center.x as i64, center.y as i64);
    let (w, h) = (screen.width as i64 - 1, screen.height as i64 - 1);
    let square = |dx: i64, dy: i64| (dx as i128).pow(2) + (dy as i128).pow(2);
    let nearest = square(cx.clamp(0, w) - cx, cy.clamp(0, h) - cy);
    let farthest = square(cx.abs().max((w - cx).abs()), cy.abs().max((h - cy).abs()));
    let reach = (outer as i128 + 1).pow(2);
    let hollow = (inner as i128 - 1).max(0).pow(2);
    nearest > reach || farthest < hollow
}

fn to_i32(v: i64) -> Option<i32> {
    i32::try_from(v).ok()
}

/// Integer square root, rounded down
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    // Newton's method, starting above the root
    let mut x = n / 2 + 1;
    let mut y = (x + n / x) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
