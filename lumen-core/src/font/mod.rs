//! Font engine
//!
//! Glyphs are fixed 8x8 cells looked up in a static table by character
//! code. Text is rendered straight to the panel:
//!
//! - With a background color, each glyph is one window sized to the
//!   scaled cell and one run alternating foreground and background.
//! - Transparent text skips background pixels. Each contiguous foreground
//!   span of a glyph row gets its own window, `scale` rows tall.
//!
//! Scaling repeats every bit `scale` times along both axes.

mod font8x8;

pub use font8x8::{FONT_8X8, HOLLOW_BOX};

use heapless::Vec;

use crate::color::Rgb565;
use crate::error::Error;
use crate::geometry::{Point, Rect, Size};
use crate::raster;
use crate::traits::PixelSink;

/// Glyph cell width and height
pub const CELL: u32 = 8;

/// Upper bound for [`TextStyle::scale`]
pub const MAX_SCALE: u8 = 16;

/// The font has no glyph for this character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GlyphNotFound(pub char);

/// A fixed 8x8 bitmap font
#[derive(Debug, Clone, Copy)]
pub struct Font {
    first: u8,
    glyphs: &'static [[u8; 8]],
    fallback: [u8; 8],
}

impl Font {
    /// A font whose table starts at character code `first`
    pub const fn new(first: u8, glyphs: &'static [[u8; 8]], fallback: [u8; 8]) -> Self {
        Self {
            first,
            glyphs,
            fallback,
        }
    }

    /// Same font with a different substitute glyph
    pub const fn with_fallback(mut self, fallback: [u8; 8]) -> Self {
        self.fallback = fallback;
        self
    }

    /// Unscaled cell size
    pub const fn cell_size(&self) -> Size {
        Size::new(CELL as u16, CELL as u16)
    }

    /// Look up the glyph for `c`
    pub fn glyph(&self, c: char) -> Result<Glyph<'_>, GlyphNotFound> {
        let index = (c as u32)
            .checked_sub(self.first as u32)
            .ok_or(GlyphNotFound(c))?;
        self.glyphs
            .get(index as usize)
            .map(|rows| Glyph { rows })
            .ok_or(GlyphNotFound(c))
    }

    /// The substitute glyph for unmapped characters
    pub fn fallback(&self) -> Glyph<'_> {
        Glyph {
            rows: &self.fallback,
        }
    }

    /// Glyph for `c`, or the fallback
    pub fn glyph_or_fallback(&self, c: char) -> Glyph<'_> {
        match self.glyph(c) {
            Ok(glyph) => glyph,
            Err(GlyphNotFound(missing)) => {
                debug!("no glyph for {=u32:#x}, using fallback", missing as u32);
                self.fallback()
            }
        }
    }
}

/// One glyph bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph<'a> {
    rows: &'a [u8; 8],
}

impl Glyph<'_> {
    /// Bit at `(col, row)` of the unscaled cell
    pub fn is_set(&self, col: u32, row: u32) -> bool {
        match self.rows.get(row as usize) {
            Some(&bits) if col < CELL => (bits >> col) & 1 == 1,
            _ => false,
        }
    }

    /// Contiguous runs of set bits in `row` as `(start, length)`
    pub fn spans(&self, row: u32) -> Vec<(u32, u32), 4> {
        let mut spans = Vec::new();
        let mut start = None;
        for col in 0..=CELL {
            match (self.is_set(col, row), start) {
                (true, None) => start = Some(col),
                (false, Some(s)) => {
                    let pushed = spans.push((s, col - s));
                    debug_assert!(pushed.is_ok(), "eight bits hold at most four runs");
                    start = None;
                }
                _ => {}
            }
        }
        spans
    }
}

/// Text colors and scale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    pub foreground: Rgb565,
    /// `None` draws only the foreground pixels
    pub background: Option<Rgb565>,
    pub scale: u8,
}

impl TextStyle {
    /// Transparent text at scale 1
    pub const fn new(foreground: Rgb565) -> Self {
        Self {
            foreground,
            background: None,
            scale: 1,
        }
    }

    pub const fn with_background(mut self, background: Rgb565) -> Self {
        self.background = Some(background);
        self
    }

    pub const fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale;
        self
    }

    /// Scale clamped to `1..=MAX_SCALE`
    pub fn effective_scale(&self) -> u32 {
        self.scale.clamp(1, MAX_SCALE) as u32
    }
}

/// Width in pixels of the widest line of `text`
pub fn text_width(text: &str, scale: u8) -> u32 {
    let advance = CELL * scale.clamp(1, MAX_SCALE) as u32;
    text.split('\n')
        .map(|line| line.chars().count() as u32 * advance)
        .max()
        .unwrap_or(0)
}

/// Draw `text` with its first cell's top-left corner at `origin`
///
/// `'\n'` moves back to `origin.x` one cell lower. Returns the cursor
/// after the last character.
pub fn draw_text<S>(
    sink: &mut S,
    font: &Font,
    origin: Point,
    text: &str,
    style: &TextStyle,
) -> Result<Point, Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let cell = (CELL * style.effective_scale()) as i32;
    let mut cursor = origin;
    for c in text.chars() {
        if c == '\n' {
            cursor = Point::new(origin.x, cursor.y.saturating_add(cell));
            continue;
        }
        draw_glyph(sink, &font.glyph_or_fallback(c), cursor, style)?;
        cursor.x = cursor.x.saturating_add(cell);
    }
    Ok(cursor)
}

/// Draw one glyph at `at`
pub fn draw_glyph<S>(
    sink: &mut S,
    glyph: &Glyph<'_>,
    at: Point,
    style: &TextStyle,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
{
    let scale = style.effective_scale();
    match style.background {
        Some(background) => {
            let cell = Rect::new(at.x, at.y, CELL * scale, CELL * scale);
            let Some(visible) = raster::address(sink, &cell)? else {
                return Ok(());
            };
            let dx = (visible.x as i64 - at.x as i64) as u32;
            let dy = (visible.y as i64 - at.y as i64) as u32;
            let glyph = *glyph;
            let foreground = style.foreground;
            let pixels = (0..visible.height).flat_map(move |row| {
                (0..visible.width).map(move |col| {
                    if glyph.is_set((dx + col) / scale, (dy + row) / scale) {
                        foreground
                    } else {
                        background
                    }
                })
            });
            sink.write_pixels(pixels)
        }
        None => {
            for row in 0..CELL {
                let band_y = at.y as i64 + (row * scale) as i64;
                let Ok(band_y) = i32::try_from(band_y) else {
                    break;
                };
                for (start, len) in glyph.spans(row) {
                    let x = at.x.saturating_add((start * scale) as i32);
                    let span = Rect::new(x, band_y, len * scale, scale);
                    raster::fill_rect(sink, span, style.foreground)?;
                }
            }
            Ok(())
        }
    }
}
