use crate::color::{MapColor, ProvinceId};
use thiserror::Error;

/// Errors produced while building the color index or decoding the raster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapDataError {
    /// A pixel color has no entry in the province definitions.
    ///
    /// Recoverable: lenient decoding degrades the pixel to the sentinel id.
    #[error("pixel ({x}, {y}) has color {color} not present in the province definitions")]
    UnmappedColor { x: u32, y: u32, color: MapColor },

    /// The source image extent differs from the authoritative map extent.
    ///
    /// Fatal at load time: no consistent border or camera state can be built
    /// from a raster of the wrong size.
    #[error("source image is {actual_w}x{actual_h} but the map extent is {expected_w}x{expected_h}")]
    DimensionMismatch {
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },

    /// A definition tried to map a color to the reserved sentinel id 0.
    #[error("color {color} maps to the reserved sentinel id 0")]
    ReservedSentinel { color: MapColor },

    /// Two definitions claim the same color for different provinces.
    #[error("color {color} is already mapped to province {existing} (attempted {new})")]
    DuplicateColor {
        color: MapColor,
        existing: ProvinceId,
        new: ProvinceId,
    },
}
