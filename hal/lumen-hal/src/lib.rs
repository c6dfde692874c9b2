//! Lumen Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the display engine is written
//! against. Board crates implement them for their chip, or enable the
//! `embedded-hal` / `embedded-io` features and wrap existing drivers with
//! the adapters in [`adapters`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (board crate)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-drivers (ILI9341)                │
//! │  lumen-core (rasterizer, fonts, images) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lumen-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Chip-select, data/command and reset lines
//! - [`spi::SpiBus`] - Write-only SPI master
//! - [`delay::DelayMs`] - Blocking millisecond delays
//! - [`storage::ByteSource`], [`storage::ImageStore`] - Image byte streams

#![no_std]
#![deny(unsafe_code)]

pub mod adapters;
pub mod delay;
pub mod gpio;
pub mod spi;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use delay::DelayMs;
pub use gpio::OutputPin;
pub use spi::SpiBus;
pub use storage::{ByteSource, ImageStore, StorageError};
