//! Province map data model.
//!
//! This crate turns a color-coded province bitmap into a province-id raster:
//! - Color→id index built from the authoritative province definitions
//! - Raster decoding with per-pixel degradation for unmapped colors
//! - Per-province terrain attributes used downstream for border tagging
//!
//! File loading is the caller's concern; everything here operates on
//! in-memory images and prebuilt indices.

pub mod color;
pub mod error;
pub mod raster;
pub mod terrain;

pub use color::{ColorIndex, MapColor, ProvinceId, SENTINEL_PROVINCE};
pub use error::MapDataError;
pub use raster::ProvinceIdRaster;
pub use terrain::{TerrainClass, TerrainTable};
