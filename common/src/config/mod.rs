//! Layout configuration loading and document layering.
//!
//! The layout is read once at startup and shared read-only by every
//! component. Any malformed or invalid geometry aborts loading; the engine
//! never renders a partially valid layout.

mod layout;
pub mod resolve;

use std::fs;
use std::path::Path;

pub use layout::*;
pub(crate) use layout::{finite, non_negative};
pub use resolve::{DocumentLayer, RouteLayer, resolve_document};

use crate::error::ConfigError;

impl LayoutConfig {
    /// Parse and validate a layout from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
