use crate::color::ProvinceId;
use serde::{Deserialize, Serialize};

/// Coarse terrain classification of a province, used to tag borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerrainClass {
    Land,
    /// Seas and lakes. Also the class of the sentinel province.
    #[default]
    Water,
    /// Wasteland nobody can own or cross.
    Impassable,
}

/// Id-indexed terrain table supplied by the province attribute source.
///
/// Index 0 belongs to the sentinel province. Ids beyond the table read as
/// water, matching the sentinel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TerrainTable {
    classes: Vec<TerrainClass>,
}

impl TerrainTable {
    pub fn new(classes: Vec<TerrainClass>) -> Self {
        Self { classes }
    }

    pub fn class_of(&self, id: ProvinceId) -> TerrainClass {
        self.classes.get(id as usize).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
