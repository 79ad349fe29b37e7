//! Per-province color lookup for map modes.
//!
//! Recoloring the map for a different data layer only rewrites this buffer,
//! O(provinces); the per-pixel work happens on the GPU by indexing it with
//! the province-id raster already resident there.

use mapdata::ProvinceId;
use serde::{Deserialize, Serialize};

/// Color of buffer index 0: the sentinel province renders as open water.
pub const SENTINEL_COLOR: [u8; 4] = [64, 164, 223, 255];

/// Which data layer the province colors currently encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MapMode {
    #[default]
    Terrain,
    Political,
    Religion,
    Population,
}

/// Province-id-indexed color buffer, ready for upload as a lookup texture.
///
/// Entry `i` colors province `i`; entry 0 is the sentinel. Rebuilding never
/// assumes the previous province count.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvinceColorBuffer {
    colors: Vec<[u8; 4]>,
    mode: MapMode,
}

impl ProvinceColorBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds from a dense color slice where `province_colors[i]` is the
    /// color of province `i + 1`. The result has `len() == N + 1`.
    pub fn rebuild(&mut self, province_colors: &[[u8; 4]], mode: MapMode) {
        self.colors.clear();
        self.colors.reserve(province_colors.len() + 1);
        self.colors.push(SENTINEL_COLOR);
        self.colors.extend_from_slice(province_colors);
        self.mode = mode;
    }

    /// Rebuilds by asking `color_of` for every province id 1..=count.
    pub fn rebuild_with(
        &mut self,
        count: ProvinceId,
        mode: MapMode,
        color_of: impl Fn(ProvinceId) -> [u8; 4],
    ) {
        self.colors.clear();
        self.colors.reserve(count as usize + 1);
        self.colors.push(SENTINEL_COLOR);
        for id in 1..=count {
            self.colors.push(color_of(id));
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> MapMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[[u8; 4]] {
        &self.colors
    }

    /// Color of a province; out-of-range ids read as the sentinel.
    pub fn color_of(&self, id: ProvinceId) -> [u8; 4] {
        self.colors.get(id as usize).copied().unwrap_or(SENTINEL_COLOR)
    }

    /// Raw RGBA bytes for texture upload by the renderer.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_prepends_sentinel() {
        let mut buffer = ProvinceColorBuffer::new();
        buffer.rebuild(&[[10, 0, 0, 255], [0, 20, 0, 255]], MapMode::Political);

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.mode(), MapMode::Political);
        assert_eq!(buffer.color_of(0), SENTINEL_COLOR);
        assert_eq!(buffer.color_of(1), [10, 0, 0, 255]);
        assert_eq!(buffer.color_of(2), [0, 20, 0, 255]);
        assert_eq!(buffer.color_of(99), SENTINEL_COLOR);
    }

    #[test]
    fn test_rebuild_tolerates_changing_count() {
        let mut buffer = ProvinceColorBuffer::new();
        buffer.rebuild(&[[1, 1, 1, 255]; 8], MapMode::Terrain);
        assert_eq!(buffer.len(), 9);

        buffer.rebuild(&[[2, 2, 2, 255]; 3], MapMode::Political);
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.color_of(3), [2, 2, 2, 255]);
        assert_eq!(buffer.color_of(4), SENTINEL_COLOR);
    }

    #[test]
    fn test_rebuild_with_generator() {
        let mut buffer = ProvinceColorBuffer::new();
        buffer.rebuild_with(4, MapMode::Religion, |id| [id as u8, 0, 0, 255]);

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.color_of(0), SENTINEL_COLOR);
        assert_eq!(buffer.color_of(4), [4, 0, 0, 255]);
    }

    #[test]
    fn test_bytes_view_matches_layout() {
        let mut buffer = ProvinceColorBuffer::new();
        buffer.rebuild(&[[1, 2, 3, 4]], MapMode::Terrain);

        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[4..], &[1, 2, 3, 4]);
    }
}
