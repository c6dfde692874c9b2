//! Display controller drivers
//!
//! This crate provides concrete implementations of the traits defined
//! in lumen-core:
//!
//! - `SpiTransport`: 4-wire SPI framing (chip-select, data/command line)
//! - `Ili9341`: command set, init sequence and window addressing for the
//!   ILI9341 240x320 TFT controller

#![no_std]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod ili9341;

pub use ili9341::{Ili9341, SpiTransport};
