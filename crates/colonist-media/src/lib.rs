//! Colonist Media - Image Resolution and Synthesis
//!
//! This crate turns game entities into pixels:
//! - Resource store abstraction (raster and SVG assets, strings, colors)
//! - Image library resolving typed requests into cached images
//! - Chip, outlined string, fade and compound terrain synthesis
//! - A small built-in bitmap font for chip labels

use colonist_core::CoreError;
use image::RgbaImage;
use std::sync::Arc;
use thiserror::Error;

pub mod cache;
pub mod chip;
pub mod config;
pub mod font;
pub mod imaging;
pub mod library;
pub mod outline;
pub mod store;
pub mod text;
pub mod variants;

pub use cache::{CacheStats, DerivedImageCache};
pub use chip::{ChipFill, ChipStyle};
pub use config::LibraryConfig;
pub use font::{BitmapFont, Font};
pub use imaging::{Insets, TileArea};
pub use library::ImageLibrary;
pub use store::{MemoryResourceStore, ResourceStore};
pub use variants::VariantCounter;

/// A resolved image. Shared and never mutated after creation.
pub type Image = Arc<RgbaImage>;

/// Media errors
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Asset not found: {0}")]
    MissingAsset(String),

    #[error("Failed to open file: {0}")]
    FileOpen(String),

    #[error("Decoder error: {0}")]
    DecoderError(String),

    #[error("SVG error: {0}")]
    SvgError(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for media operations
pub type Result<T> = std::result::Result<T, MediaError>;
