//! Configuration types
//!
//! Board-agnostic display configuration. With the `serde` feature the
//! configuration can be stored as postcard binary data (e.g. in flash).

pub mod display;

pub use display::*;
