//! Rendering engine for the multi-route transit arrival sign.
//!
//! This crate holds everything that turns a layout configuration and a
//! display document into pixels. The simulator binary only supplies the
//! window, the clock and the key bindings.
//!
//! - [`config`]: Layout configuration tree and the layered document resolver
//! - [`document`]: Display document (header text, stop info, route slots)
//! - [`label`]: One to three line labels derived from split route fields
//! - [`columns`]: Column start/center/width derivation
//! - [`geometry`]: Config-only scene anchors (rows, strips, header, side panel)
//! - [`text`]: Compress-or-justify line fitting and bitmap glyph drawing
//! - [`animations`]: Per-route blink timers for the approach indicators
//! - [`icons`]: 1-bit icon masks drawn inside indicator squares
//! - [`widgets`]: Header, side panel and route strip drawing
//! - [`render`]: Frame orchestration and the per-session tick
//! - [`viewport`]: Fit-to-viewport display scale
//!
//! # Drawing Surface
//!
//! Everything draws onto any `DrawTarget<Color = Rgb888>`. Draw errors are
//! dropped per call so a single failed primitive never aborts a frame.

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod animations;
pub mod colors;
pub mod columns;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod icons;
pub mod label;
pub mod render;
pub mod text;
pub mod viewport;
pub mod widgets;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items
pub use animations::{BlinkBank, BlinkState, RouteKey};
pub use config::LayoutConfig;
pub use document::{DisplayDocument, RouteEntry};
pub use error::{AssetError, ConfigError, DocumentError};
pub use label::Label;
pub use render::{Frame, LegendStyle, SceneRenderer, SignSession};

/// Maximum number of route slots the sign can show. Entries past this index
/// are ignored.
pub const MAX_SLOTS: usize = 20;
