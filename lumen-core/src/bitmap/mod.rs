//! Bitmap streamer
//!
//! Images are read from a [`ByteSource`] through a fixed chunk buffer and
//! forwarded to the panel as one run under one window; memory use does not
//! depend on the image size. Bottom-up BMP files are streamed as stored,
//! with the window's slow scan axis reversed.
//!
//! The header is checked against the caller's dimensions before anything
//! is sent to the controller. A read failure midway leaves the window
//! partially written.

mod header;

pub use header::{BitmapHeader, HeaderError, PixelFormat, RAW_HEADER_LEN, RAW_MAGIC};

use lumen_hal::{ByteSource, ImageStore, StorageError};

use crate::color::Rgb565;
use crate::error::Error;
use crate::geometry::{Point, Rect, Size};
use crate::traits::PixelSink;

/// Bytes read from the source per chunk
pub const CHUNK_SIZE: usize = 512;

impl<E> From<HeaderError> for Error<E> {
    fn from(e: HeaderError) -> Self {
        match e {
            HeaderError::Format => Error::BitmapFormat,
            HeaderError::Read(e) => Error::BitmapRead(e),
        }
    }
}

/// Draw an image with its top-left corner at `at`
///
/// `expected` must match the dimensions declared in the image header.
pub fn draw_bitmap<S, B>(
    sink: &mut S,
    at: Point,
    expected: Size,
    source: &mut B,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
    B: ByteSource + ?Sized,
{
    let header = BitmapHeader::read(source).map_err(|e| {
        warn!("bitmap header rejected: {}", e);
        Error::from(e)
    })?;
    debug!(
        "bitmap {=u16}x{=u16} {}",
        header.size.width,
        header.size.height,
        header.format
    );
    if header.size != expected {
        warn!("bitmap size mismatch");
        return Err(Error::BitmapDimensionMismatch {
            expected,
            actual: header.size,
        });
    }
    stream(sink, at, &header, source)
}

/// Draw an image centered on the logical screen
pub fn draw_bitmap_centered<S, B>(
    sink: &mut S,
    expected: Size,
    source: &mut B,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
    B: ByteSource + ?Sized,
{
    let at = centered(sink.logical_size(), expected);
    draw_bitmap(sink, at, expected, source)
}

/// Open `name` from `store`, draw it and close it again
///
/// The source is closed on every path. A drawing error takes precedence
/// over a close error.
pub fn draw_bitmap_from<S, St>(
    sink: &mut S,
    store: &mut St,
    name: &str,
    at: Point,
    expected: Size,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
    St: ImageStore + ?Sized,
{
    let mut source = store.open(name).map_err(|e| {
        warn!("cannot open bitmap: {}", e);
        Error::BitmapRead(e)
    })?;
    let drawn = draw_bitmap(sink, at, expected, &mut source);
    let closed = source.close();
    drawn?;
    closed.map_err(Error::BitmapRead)
}

/// Top-left corner that centers `size` on `screen`
pub fn centered(screen: Size, size: Size) -> Point {
    Point::new(
        (screen.width as i32 - size.width as i32) / 2,
        (screen.height as i32 - size.height as i32) / 2,
    )
}

fn stream<S, B>(
    sink: &mut S,
    at: Point,
    header: &BitmapHeader,
    source: &mut B,
) -> Result<(), Error<S::Error>>
where
    S: PixelSink + ?Sized,
    B: ByteSource + ?Sized,
{
    let image = Rect::new(
        at.x,
        at.y,
        header.size.width as u32,
        header.size.height as u32,
    );
    let Some(visible) = image.clip_to(sink.logical_size()) else {
        return Ok(());
    };
    let rotation = sink.rotation();
    let window = if header.bottom_up {
        rotation.window_for_rows_reversed(&visible, sink.panel_size())
    } else {
        rotation.window_for(&visible, sink.panel_size())
    }
    .ok_or(Error::InvalidWindow)?;
    sink.set_window(&window)?;

    let mut pixels = SourcePixels::new(source, header, &image, &visible);
    sink.write_pixels(&mut pixels)?;
    if let Some(e) = pixels.error {
        warn!("bitmap read failed: {}", e);
        return Err(Error::BitmapRead(e));
    }
    if u64::from(pixels.emitted) != visible.area() {
        return Err(Error::BitmapRead(StorageError::UnexpectedEof));
    }
    Ok(())
}

/// Lazy decoder over the visible part of an image
///
/// Pixels outside the visible columns and rows are read and dropped. A
/// read error ends the iteration and is kept in `error`.
struct SourcePixels<'a, B: ?Sized> {
    source: &'a mut B,
    format: PixelFormat,
    width: u32,
    row_padding: usize,
    /// Visible columns, image-relative, half-open
    cols: (u32, u32),
    /// Visible rows in storage order, half-open
    rows: (u32, u32),
    row: u32,
    col: u32,
    chunk: [u8; CHUNK_SIZE],
    pos: usize,
    len: usize,
    emitted: u32,
    error: Option<StorageError>,
}

impl<'a, B: ByteSource + ?Sized> SourcePixels<'a, B> {
    fn new(source: &'a mut B, header: &BitmapHeader, image: &Rect, visible: &Rect) -> Self {
        let col0 = (visible.x as i64 - image.x as i64) as u32;
        let row0 = (visible.y as i64 - image.y as i64) as u32;
        let rows = if header.bottom_up {
            let h = image.height;
            (h - (row0 + visible.height), h - row0)
        } else {
            (row0, row0 + visible.height)
        };
        Self {
            source,
            format: header.format,
            width: image.width,
            row_padding: header.row_padding,
            cols: (col0, col0 + visible.width),
            rows,
            row: 0,
            col: 0,
            chunk: [0; CHUNK_SIZE],
            pos: 0,
            len: 0,
            emitted: 0,
            error: None,
        }
    }

    fn fill(&mut self) -> bool {
        if self.pos < self.len {
            return true;
        }
        match self.source.read_chunk(&mut self.chunk) {
            Ok(0) => self.error = Some(StorageError::UnexpectedEof),
            Ok(n) => {
                self.pos = 0;
                self.len = n;
                return true;
            }
            Err(e) => self.error = Some(e),
        }
        false
    }

    fn read(&mut self, out: &mut [u8]) -> bool {
        for byte in out.iter_mut() {
            if !self.fill() {
                return false;
            }
            *byte = self.chunk[self.pos];
            self.pos += 1;
        }
        true
    }

    fn discard(&mut self, mut count: usize) -> bool {
        while count > 0 {
            if !self.fill() {
                return false;
            }
            let n = count.min(self.len - self.pos);
            self.pos += n;
            count -= n;
        }
        true
    }

    fn row_stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel() + self.row_padding
    }
}

impl<B: ByteSource + ?Sized> Iterator for SourcePixels<'_, B> {
    type Item = Rgb565;

    fn next(&mut self) -> Option<Rgb565> {
        loop {
            if self.error.is_some() || self.row >= self.rows.1 {
                return None;
            }
            if self.row < self.rows.0 {
                if !self.discard(self.row_stride()) {
                    return None;
                }
                self.row += 1;
                continue;
            }
            if self.col == self.width {
                if !self.discard(self.row_padding) {
                    return None;
                }
                self.row += 1;
                self.col = 0;
                continue;
            }
            let mut raw = [0u8; 3];
            if !self.read(&mut raw[..self.format.bytes_per_pixel()]) {
                return None;
            }
            let col = self.col;
            self.col += 1;
            if col >= self.cols.0 && col < self.cols.1 {
                self.emitted += 1;
                return Some(self.format.decode(raw));
            }
        }
    }
}
