use crate::error::MapDataError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable integer identifier of a province.
pub type ProvinceId = u16;

/// Id reserved for "no province": unmapped pixels and open ground.
pub const SENTINEL_PROVINCE: ProvinceId = 0;

/// RGB color key as it appears in the source province bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl MapColor {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packs the color into a single `0x00RRGGBB` key.
    pub fn packed(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl From<[u8; 3]> for MapColor {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl fmt::Display for MapColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Mapping from bitmap colors to province ids.
///
/// Built once from the authoritative province definitions and consulted only
/// while decoding. The sentinel id never appears as a value: its key space is
/// reserved so that a raster id of 0 always means "no province".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColorIndex {
    by_color: HashMap<MapColor, ProvinceId>,
    max_id: ProvinceId,
}

impl ColorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a color→id mapping.
    ///
    /// Rejects the reserved sentinel id and conflicting duplicate colors.
    /// Re-inserting an identical mapping is a no-op.
    pub fn insert(&mut self, color: MapColor, id: ProvinceId) -> Result<(), MapDataError> {
        if id == SENTINEL_PROVINCE {
            return Err(MapDataError::ReservedSentinel { color });
        }
        if let Some(&existing) = self.by_color.get(&color) {
            if existing != id {
                return Err(MapDataError::DuplicateColor {
                    color,
                    existing,
                    new: id,
                });
            }
            return Ok(());
        }
        self.by_color.insert(color, id);
        self.max_id = self.max_id.max(id);
        Ok(())
    }

    /// Builds an index from `(id, color)` definition pairs.
    pub fn from_definitions<I>(defs: I) -> Result<Self, MapDataError>
    where
        I: IntoIterator<Item = (ProvinceId, MapColor)>,
    {
        let mut index = Self::new();
        for (id, color) in defs {
            index.insert(color, id)?;
        }
        Ok(index)
    }

    pub fn get(&self, color: MapColor) -> Option<ProvinceId> {
        self.by_color.get(&color).copied()
    }

    /// Highest province id registered; 0 for an empty index.
    pub fn max_id(&self) -> ProvinceId {
        self.max_id
    }

    pub fn len(&self) -> usize {
        self.by_color.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_color.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_key() {
        assert_eq!(MapColor::new(0x12, 0x34, 0x56).packed(), 0x123456);
        assert_eq!(MapColor::new(255, 0, 0).packed(), 0xff0000);
    }

    #[test]
    fn test_insert_and_get() {
        let mut index = ColorIndex::new();
        index.insert(MapColor::new(255, 0, 0), 1).unwrap();
        index.insert(MapColor::new(0, 255, 0), 2).unwrap();

        assert_eq!(index.get(MapColor::new(255, 0, 0)), Some(1));
        assert_eq!(index.get(MapColor::new(0, 0, 255)), None);
        assert_eq!(index.len(), 2);
        assert_eq!(index.max_id(), 2);
    }

    #[test]
    fn test_sentinel_id_rejected() {
        let mut index = ColorIndex::new();
        let err = index.insert(MapColor::new(0, 0, 0), SENTINEL_PROVINCE);
        assert!(matches!(err, Err(MapDataError::ReservedSentinel { .. })));
        assert!(index.is_empty());
    }

    #[test]
    fn test_conflicting_duplicate_rejected() {
        let mut index = ColorIndex::new();
        let red = MapColor::new(255, 0, 0);
        index.insert(red, 1).unwrap();

        // Same mapping again is fine
        index.insert(red, 1).unwrap();

        let err = index.insert(red, 2);
        assert!(matches!(
            err,
            Err(MapDataError::DuplicateColor {
                existing: 1,
                new: 2,
                ..
            })
        ));
        assert_eq!(index.get(red), Some(1));
    }

    #[test]
    fn test_from_definitions() {
        let index = ColorIndex::from_definitions([
            (1, MapColor::new(255, 0, 0)),
            (7, MapColor::new(0, 255, 0)),
        ])
        .unwrap();
        assert_eq!(index.max_id(), 7);
        assert_eq!(index.get(MapColor::new(0, 255, 0)), Some(7));
    }
}
