//! Error types for configuration, document and asset loading.
//!
//! Only configuration errors are fatal. Missing document fields are
//! defaulted by the resolver and never reach these types, and asset
//! failures are reported to the host which keeps rendering without icons.

use thiserror::Error;

/// Layout configuration could not be loaded. Rendering must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout config: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed layout config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid geometry value for `{field}`: {value}")]
    InvalidGeometry { field: String, value: f32 },

    #[error("invalid color `{value}` (expected #rgb or #rrggbb)")]
    InvalidColor { value: String },
}

/// Display document could not be read or parsed.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to read display document: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed display document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Icon asset could not be loaded.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read icon asset: {0}")]
    Io(#[from] std::io::Error),

    #[error("icon mask has {actual} bytes, expected {expected}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("icon mask width must be non-zero")]
    ZeroWidth,
}
