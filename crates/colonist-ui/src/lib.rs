//! Colonist UI - egui adapters for the image library
//!
//! This crate turns resolved images into on-screen widgets:
//! - Draggable unit labels and the commands they emit
//! - The native settlement report panel
//! - Generic choice dialogs
//! - Texture upload, theme, user configuration and logging setup

#![warn(missing_docs)]

use colonist_media::MediaError;
use thiserror::Error;

pub mod config;
pub mod dialog;
pub mod logging_setup;
pub mod messages;
pub mod settlement_panel;
pub mod texture;
pub mod theme;
pub mod unit_label;

pub use config::UserConfig;
pub use dialog::{ChoiceItem, Dialog, DialogType};
pub use messages::Messages;
pub use settlement_panel::{SettlementPanel, SettlementReport};
pub use texture::TextureCache;
pub use unit_label::{UnitAction, UnitCommand, UnitLabel};

/// UI error types
#[derive(Error, Debug)]
pub enum UiError {
    /// Image resolution failed
    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    /// A dialog was created without anything to choose
    #[error("Dialog has no options")]
    NoOptions,

    /// An option index outside the dialog's options
    #[error("Option {index} out of range ({len} options)")]
    InvalidOption {
        /// Requested index
        index: usize,
        /// Number of options
        len: usize,
    },

    /// Reading or writing the user configuration failed
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The user configuration is not valid JSON
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type for UI operations
pub type Result<T> = std::result::Result<T, UiError>;
