//! Drawing API
//!
//! [`Draw`] is implemented for every [`PixelSink`], so a driver only has
//! to provide window addressing and pixel streaming.

use lumen_hal::{ByteSource, ImageStore};

use crate::bitmap;
use crate::color::Rgb565;
use crate::error::Error;
use crate::font::{self, Font, TextStyle, FONT_8X8};
use crate::geometry::{Point, Rect, Size};
use crate::raster;
use crate::traits::PixelSink;

/// Immediate-mode drawing in logical coordinates
///
/// Every call is a complete, blocking exchange with the controller.
/// Anything outside the logical screen is clipped before a window is
/// programmed.
pub trait Draw: PixelSink {
    /// Plot one pixel
    fn pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::pixel(self, x, y, color)
    }

    /// Horizontal line, `length` pixels to the right of `(x, y)`
    fn hline(&mut self, x: i32, y: i32, length: u32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::hline(self, x, y, length, color)
    }

    /// Vertical line, `length` pixels below `(x, y)`
    fn vline(&mut self, x: i32, y: i32, length: u32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::vline(self, x, y, length, color)
    }

    /// Horizontal line `width` pixels thick
    fn thick_hline(
        &mut self,
        x: i32,
        y: i32,
        length: u32,
        width: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::thick_hline(self, x, y, length, width, color)
    }

    /// Vertical line `width` pixels thick
    fn thick_vline(
        &mut self,
        x: i32,
        y: i32,
        length: u32,
        width: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::thick_vline(self, x, y, length, width, color)
    }

    /// Line between two points, both included
    fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::line(self, Point::new(x0, y0), Point::new(x1, y1), color)
    }

    /// Rectangle outline
    fn rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::rect(self, Rect::new(x, y, width, height), color)
    }

    /// Rectangle with a thick border and optional infill
    fn styled_rect(
        &mut self,
        rect: Rect,
        border: u32,
        border_color: Rgb565,
        infill: Option<Rgb565>,
    ) -> Result<(), Error<Self::Error>> {
        raster::styled_rect(self, rect, border, border_color, infill)
    }

    /// Filled rectangle
    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::fill_rect(self, Rect::new(x, y, width, height), color)
    }

    /// Circle outline
    fn circle(&mut self, xc: i32, yc: i32, radius: u32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::circle(self, Point::new(xc, yc), radius, color)
    }

    /// Circle outline `border` pixels thick
    fn thick_circle(
        &mut self,
        xc: i32,
        yc: i32,
        radius: u32,
        border: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::thick_circle(self, Point::new(xc, yc), radius, border, color)
    }

    /// Arc of `sweep` degrees clockwise from `start` (0 is twelve o'clock)
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        xc: i32,
        yc: i32,
        radius: u32,
        border: u32,
        start: i32,
        sweep: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::arc(self, Point::new(xc, yc), radius, border, start, sweep, color)
    }

    /// Filled circle
    fn fill_circle(&mut self, xc: i32, yc: i32, radius: u32, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::fill_circle(self, Point::new(xc, yc), radius, color)
    }

    /// Filled ellipse with horizontal radius `rx` and vertical radius `ry`
    fn fill_ellipse(
        &mut self,
        xc: i32,
        yc: i32,
        rx: u32,
        ry: u32,
        color: Rgb565,
    ) -> Result<(), Error<Self::Error>> {
        raster::fill_ellipse(self, Point::new(xc, yc), rx, ry, color)
    }

    /// Fill the whole screen
    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Error<Self::Error>> {
        raster::fill_screen(self, color)
    }

    /// Fill the screen inside a `margin` pixel frame
    fn fill_screen_margin(&mut self, color: Rgb565, margin: u32) -> Result<(), Error<Self::Error>> {
        raster::fill_screen_margin(self, color, margin)
    }

    /// Draw text in the built-in 8x8 font, returning the end cursor
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        style: &TextStyle,
    ) -> Result<Point, Error<Self::Error>> {
        font::draw_text(self, &FONT_8X8, Point::new(x, y), text, style)
    }

    /// Draw text in `font`, returning the end cursor
    fn draw_text_with(
        &mut self,
        font: &Font,
        x: i32,
        y: i32,
        text: &str,
        style: &TextStyle,
    ) -> Result<Point, Error<Self::Error>> {
        font::draw_text(self, font, Point::new(x, y), text, style)
    }

    /// Width of the widest line of `text` at `scale`
    fn text_width(&self, text: &str, scale: u8) -> u32 {
        font::text_width(text, scale)
    }

    /// Stream an image from `source` with its top-left corner at `(x, y)`
    fn draw_bitmap<B>(
        &mut self,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
        source: &mut B,
    ) -> Result<(), Error<Self::Error>>
    where
        B: ByteSource + ?Sized,
    {
        bitmap::draw_bitmap(self, Point::new(x, y), Size::new(width, height), source)
    }

    /// Stream an image centered on the screen
    fn draw_bitmap_centered<B>(
        &mut self,
        width: u16,
        height: u16,
        source: &mut B,
    ) -> Result<(), Error<Self::Error>>
    where
        B: ByteSource + ?Sized,
    {
        bitmap::draw_bitmap_centered(self, Size::new(width, height), source)
    }

    /// Open a named image from `store` and stream it
    fn draw_bitmap_from<St>(
        &mut self,
        store: &mut St,
        name: &str,
        x: i32,
        y: i32,
        width: u16,
        height: u16,
    ) -> Result<(), Error<Self::Error>>
    where
        St: ImageStore + ?Sized,
    {
        bitmap::draw_bitmap_from(self, store, name, Point::new(x, y), Size::new(width, height))
    }
}

impl<T: PixelSink + ?Sized> Draw for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPanel;

    #[test]
    fn test_draw_forwards_to_sink() {
        let mut panel = MockPanel::new(32, 24);
        panel.fill_rect(0, 0, 4, 2, Rgb565::RED).unwrap();
        panel.line(0, 0, 4, 2, Rgb565::BLUE).unwrap();
        let end = panel
            .draw_text(0, 8, "Hi", &TextStyle::new(Rgb565::WHITE))
            .unwrap();
        assert_eq!(end, Point::new(16, 8));
        assert_eq!(panel.runs[0], 8);
        assert_eq!(panel.at(1, 0), Some(Rgb565::BLUE));
        assert_eq!(panel.at(1, 1), Some(Rgb565::RED));
    }

    #[test]
    fn test_draw_through_mut_ref() {
        fn paint<D: Draw>(mut sink: D) -> Result<(), Error<D::Error>> {
            sink.fill_screen(Rgb565::GREEN)
        }
        let mut panel = MockPanel::new(4, 4);
        paint(&mut panel).unwrap();
        assert_eq!(panel.runs, [16]);
    }

    #[test]
    fn test_arc_and_thick_circle_forward() {
        let mut panel = MockPanel::new(32, 24);
        panel.thick_circle(8, 8, 3, 1, Rgb565::RED).unwrap();
        panel.arc(24, 12, 4, 1, 90, 90, Rgb565::BLUE).unwrap();
        assert_eq!(panel.at(11, 8), Some(Rgb565::RED));
        assert_eq!(panel.at(28, 12), Some(Rgb565::BLUE));
        assert_eq!(panel.at(24, 16), Some(Rgb565::BLUE));
        assert_eq!(panel.at(20, 12), None);
    }

    #[test]
    fn test_text_width() {
        let panel = MockPanel::new(4, 4);
        assert_eq!(panel.text_width("abcd", 2), 64);
    }
}
