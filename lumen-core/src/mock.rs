//! Simulated panel for unit tests

extern crate std;

use core::convert::Infallible;
use std::vec;
use std::vec::Vec;

use crate::color::Rgb565;
use crate::error::Error;
use crate::geometry::{Point, Size, Window};
use crate::orientation::Rotation;
use crate::traits::PixelSink;

/// Pixel sink that keeps a physical frame and records every window and run
pub struct MockPanel {
    pub size: Size,
    pub rotation: Rotation,
    pub frame: Vec<Option<Rgb565>>,
    pub windows: Vec<Window>,
    pub runs: Vec<usize>,
    current: Option<Window>,
    cursor: u32,
}

impl MockPanel {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            size: Size::new(width, height),
            rotation: Rotation::Deg0,
            frame: vec![None; width as usize * height as usize],
            windows: Vec::new(),
            runs: Vec::new(),
            current: None,
            cursor: 0,
        }
    }

    pub fn with_rotation(mut self, rotation: Rotation) -> Self {
        self.rotation = rotation;
        self
    }

    /// Color at a logical coordinate, `None` if never written
    pub fn at(&self, x: i32, y: i32) -> Option<Rgb565> {
        let (px, py) = self.rotation.to_physical(Point::new(x, y), self.size)?;
        self.frame[py as usize * self.size.width as usize + px as usize]
    }

    /// Logical coordinates of every written pixel, row-major
    pub fn painted(&self) -> Vec<(i32, i32)> {
        let logical = self.rotation.logical_size(self.size);
        let mut out = Vec::new();
        for y in 0..logical.height as i32 {
            for x in 0..logical.width as i32 {
                if self.at(x, y).is_some() {
                    out.push((x, y));
                }
            }
        }
        out
    }

    pub fn total_pixels(&self) -> usize {
        self.runs.iter().sum()
    }
}

impl PixelSink for MockPanel {
    type Error = Infallible;

    fn panel_size(&self) -> Size {
        self.size
    }

    fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn set_window(&mut self, window: &Window) -> Result<(), Error<Infallible>> {
        window.validate(self.size)?;
        self.windows.push(*window);
        self.current = Some(*window);
        self.cursor = 0;
        Ok(())
    }

    fn write_pixels<I>(&mut self, pixels: I) -> Result<(), Error<Infallible>>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut count = 0;
        for color in pixels {
            count += 1;
            let Some(window) = self.current else {
                continue;
            };
            if let Some((px, py)) = window.position(self.cursor) {
                self.frame[py as usize * self.size.width as usize + px as usize] = Some(color);
            }
            self.cursor += 1;
        }
        self.runs.push(count);
        Ok(())
    }
}
