//! Property tests for the rendering engine

use std::convert::Infallible;

use lumen_core::bitmap::RAW_MAGIC;
use lumen_core::font::FONT_8X8;
use lumen_core::raster::LinePoints;
use lumen_core::{Draw, Error, PixelSink, Point, Rect, Rgb565, Rotation, Size, TextStyle, Window};
use proptest::prelude::*;

const PANEL: Size = Size::new(240, 320);

/// Records windows and run lengths without keeping a frame
#[derive(Default)]
struct Recorder {
    rotation: Rotation,
    windows: Vec<Window>,
    runs: Vec<usize>,
}

impl PixelSink for Recorder {
    type Error = Infallible;

    fn panel_size(&self) -> Size {
        PANEL
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_window(&mut self, window: &Window) -> Result<(), Error<Infallible>> {
        window.validate(PANEL)?;
        self.windows.push(*window);
        Ok(())
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Error<Infallible>>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        self.runs.push(pixels.into_iter().count());
        Ok(())
    }
}

fn rotation() -> impl Strategy<Value = Rotation> {
    prop::sample::select(Rotation::ALL.to_vec())
}

proptest! {
    #[test]
    fn orientation_round_trips(rotation in rotation(), x in 0i32..320, y in 0i32..320) {
        let logical = rotation.logical_size(PANEL);
        prop_assume!(x < logical.width as i32 && y < logical.height as i32);
        let (px, py) = rotation.to_physical(Point::new(x, y), PANEL).unwrap();
        prop_assert!(px < PANEL.width && py < PANEL.height);
        prop_assert_eq!(rotation.to_logical(px, py, PANEL), Point::new(x, y));
    }

    #[test]
    fn window_stream_is_exact(
        rotation in rotation(),
        x in -50i32..300,
        y in -50i32..350,
        w in 1u32..120,
        h in 1u32..120,
    ) {
        let mut sink = Recorder { rotation, ..Default::default() };
        sink.fill_rect(x, y, w, h, Rgb565::RED).unwrap();
        match Rect::new(x, y, w, h).clip_to(rotation.logical_size(PANEL)) {
            Some(visible) => {
                prop_assert_eq!(sink.windows.len(), 1);
                prop_assert_eq!(sink.runs.len(), 1);
                let window = sink.windows[0];
                prop_assert!(window.validate(PANEL).is_ok());
                prop_assert_eq!(u64::from(window.pixel_count()), visible.area());
                prop_assert_eq!(sink.runs[0] as u32, window.pixel_count());
            }
            None => {
                prop_assert!(sink.windows.is_empty());
                prop_assert!(sink.runs.is_empty());
            }
        }
    }

    #[test]
    fn rgb565_survives_rgb888(raw in any::<u16>()) {
        let color = Rgb565(raw);
        let (r, g, b) = color.to_rgb888();
        prop_assert_eq!(Rgb565::from_rgb888(r, g, b), color);
    }

    #[test]
    fn rgb888_conversion_is_deterministic(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let color = Rgb565::from_rgb888(r, g, b);
        prop_assert_eq!(color, Rgb565::from_rgb888(r, g, b));
        prop_assert_eq!(color.r(), r >> 3);
        prop_assert_eq!(color.g(), g >> 2);
        prop_assert_eq!(color.b(), b >> 3);
    }

    #[test]
    fn line_hits_both_endpoints(x0 in -100i32..100, y0 in -100i32..100, x1 in -100i32..100, y1 in -100i32..100) {
        let points: Vec<Point> = LinePoints::new(Point::new(x0, y0), Point::new(x1, y1)).collect();
        let steps = (x1 - x0).abs().max((y1 - y0).abs()) as usize;
        prop_assert_eq!(points.len(), steps + 1);
        prop_assert_eq!(points[0], Point::new(x0, y0));
        prop_assert_eq!(*points.last().unwrap(), Point::new(x1, y1));
        for pair in points.windows(2) {
            prop_assert!((pair[0].x - pair[1].x).abs() <= 1);
            prop_assert!((pair[0].y - pair[1].y).abs() <= 1);
        }
    }
}

#[test]
fn origin_maps_to_distinct_corners() {
    let mut corners: Vec<_> = Rotation::ALL
        .iter()
        .map(|r| r.to_physical(Point::new(0, 0), PANEL).unwrap())
        .collect();
    corners.sort();
    corners.dedup();
    assert_eq!(corners, [(0, 0), (0, 319), (239, 0), (239, 319)]);
}

#[test]
fn bresenham_reference_line() {
    let points: Vec<_> = LinePoints::new(Point::new(0, 0), Point::new(4, 2))
        .map(|p| (p.x, p.y))
        .collect();
    assert_eq!(points, [(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]);
}

#[test]
fn unmapped_character_still_renders_rest() {
    let mut sink = Recorder::default();
    let style = TextStyle::new(Rgb565::WHITE).with_background(Rgb565::BLACK);
    let end = sink.draw_text(0, 0, "a\u{2603}b", &style).unwrap();
    assert_eq!(end, Point::new(24, 0));
    assert_eq!(sink.runs, [64, 64, 64]);
    assert!(FONT_8X8.glyph('\u{2603}').is_err());
}

#[test]
fn mismatched_bitmap_sends_nothing() {
    let mut data = RAW_MAGIC.to_vec();
    data.extend_from_slice(&4u16.to_le_bytes());
    data.extend_from_slice(&4u16.to_le_bytes());
    data.extend(std::iter::repeat(0).take(32));

    let mut sink = Recorder::default();
    let result = sink.draw_bitmap(0, 0, 4, 5, &mut &data[..]);
    assert_eq!(
        result,
        Err(Error::BitmapDimensionMismatch {
            expected: Size::new(4, 5),
            actual: Size::new(4, 4),
        })
    );
    assert!(sink.windows.is_empty());
    assert!(sink.runs.is_empty());
}
