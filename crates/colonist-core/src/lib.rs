//! Colonist Core - Presentation Domain Model
//!
//! This crate contains what the client's drawing code needs to know about the game:
//! - Entity identities (units, settlements, tiles, goods, nations)
//! - Colors and contrast rules
//! - Deterministic asset key derivation
//! - Logging configuration

use thiserror::Error;

pub mod color;
pub mod keys;
pub mod logging;
pub mod model;

pub use color::Rgb;
pub use keys::AssetKey;
pub use logging::LogConfig;
pub use model::{
    Building, BuildingType, Direction, DisplayObject, FoundingFather, Goods, GoodsType,
    IndianSettlement, LostCityRumour, Nation, PathType, Player, ResourceType, Settlement,
    SettlementType, Tension, Tile, TileImprovementStyle, TileType, Unit, UnitState, UnitType,
};

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// A color string could not be parsed
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// A scale factor was not a finite value in `(0, MAX_SCALE]`
    #[error("Invalid scale factor: {0}")]
    InvalidScale(f32),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Largest scale factor accepted anywhere in the client.
pub const MAX_SCALE: f32 = 16.0;

/// Validate a scale factor: finite, above zero and at most [`MAX_SCALE`].
pub fn check_scale(scale: f32) -> Result<f32> {
    if scale.is_finite() && scale > 0.0 && scale <= MAX_SCALE {
        Ok(scale)
    } else {
        Err(CoreError::InvalidScale(scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_scale() {
        assert_eq!(check_scale(1.5).unwrap(), 1.5);
        assert!(check_scale(0.0).is_err());
        assert!(check_scale(-1.0).is_err());
        assert!(check_scale(f32::NAN).is_err());
        assert_eq!(check_scale(MAX_SCALE).unwrap(), MAX_SCALE);
        assert!(check_scale(16.5).is_err());
        assert!(check_scale(1e10).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = CoreError::InvalidColor("#zz".to_string());
        assert_eq!(err.to_string(), "Invalid color: #zz");
    }
}
