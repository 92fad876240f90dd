//! Asset management
//!
//! Named sprites, config trees and text files loaded relative to a scene's
//! asset root.

mod config;
mod handle;
mod storage;

use std::path::PathBuf;

pub use config::{Config, ConfigFormat};
pub use handle::AssetHandle;
pub use storage::{Asset, AssetKind, AssetManager};

/// Errors raised while loading assets
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    /// A config file whose extension names no known format
    #[error("unsupported config format: {}", path.display())]
    UnsupportedConfigFormat { path: PathBuf },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}
