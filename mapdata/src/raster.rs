//! Province-id raster decoded from the color-coded source bitmap.

use crate::color::{ColorIndex, MapColor, ProvinceId, SENTINEL_PROVINCE};
use crate::error::MapDataError;
use image::RgbImage;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How many unmapped pixels are logged verbatim before collapsing to a count.
const UNMAPPED_LOG_LIMIT: usize = 8;

/// One province id per pixel, row-major, immutable after decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvinceIdRaster {
    ids: Vec<ProvinceId>,
    width: u32,
    height: u32,
}

impl ProvinceIdRaster {
    /// Builds a raster from raw ids (synthetic maps, tests).
    pub fn from_ids(ids: Vec<ProvinceId>, width: u32, height: u32) -> Self {
        assert_eq!(
            ids.len(),
            width as usize * height as usize,
            "raster id count must match extent"
        );
        Self { ids, width, height }
    }

    /// Decodes the source image against the color index.
    ///
    /// The image extent must match the authoritative map extent exactly.
    /// Unmapped colors degrade to the sentinel id with a logged warning;
    /// returns the raster and the number of degraded pixels.
    pub fn decode(
        img: &RgbImage,
        index: &ColorIndex,
        expected: (u32, u32),
    ) -> Result<(Self, usize), MapDataError> {
        let (width, height) = Self::check_extent(img, expected)?;

        // Rows are independent; decode them in parallel and stitch after.
        let rows: Vec<(Vec<ProvinceId>, Vec<MapDataError>)> = (0..height)
            .into_par_iter()
            .map(|y| {
                let mut row = Vec::with_capacity(width as usize);
                let mut misses = Vec::new();
                for x in 0..width {
                    match Self::lookup_pixel(img, index, x, y) {
                        Ok(id) => row.push(id),
                        Err(err) => {
                            misses.push(err);
                            row.push(SENTINEL_PROVINCE);
                        }
                    }
                }
                (row, misses)
            })
            .collect();

        let mut ids = Vec::with_capacity(width as usize * height as usize);
        let mut unmapped = 0usize;
        for (row, misses) in rows {
            ids.extend_from_slice(&row);
            for err in misses {
                if unmapped < UNMAPPED_LOG_LIMIT {
                    log::warn!("{err}; using sentinel province");
                }
                unmapped += 1;
            }
        }
        if unmapped > UNMAPPED_LOG_LIMIT {
            log::warn!(
                "{} unmapped pixels total degraded to the sentinel province",
                unmapped
            );
        }
        log::info!(
            "Decoded {}x{} province raster ({} colors indexed, {} unmapped pixels)",
            width,
            height,
            index.len(),
            unmapped
        );

        Ok((Self { ids, width, height }, unmapped))
    }

    /// Decodes like [`decode`](Self::decode) but fails on the first unmapped
    /// color, reporting its coordinate and raw value.
    pub fn decode_strict(
        img: &RgbImage,
        index: &ColorIndex,
        expected: (u32, u32),
    ) -> Result<Self, MapDataError> {
        let (width, height) = Self::check_extent(img, expected)?;

        let mut ids = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                ids.push(Self::lookup_pixel(img, index, x, y)?);
            }
        }
        Ok(Self { ids, width, height })
    }

    fn check_extent(img: &RgbImage, expected: (u32, u32)) -> Result<(u32, u32), MapDataError> {
        let (width, height) = img.dimensions();
        if (width, height) != expected {
            return Err(MapDataError::DimensionMismatch {
                expected_w: expected.0,
                expected_h: expected.1,
                actual_w: width,
                actual_h: height,
            });
        }
        Ok((width, height))
    }

    fn lookup_pixel(
        img: &RgbImage,
        index: &ColorIndex,
        x: u32,
        y: u32,
    ) -> Result<ProvinceId, MapDataError> {
        let pixel = img.get_pixel(x, y);
        let color = MapColor::new(pixel[0], pixel[1], pixel[2]);
        index
            .get(color)
            .ok_or(MapDataError::UnmappedColor { x, y, color })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn ids(&self) -> &[ProvinceId] {
        &self.ids
    }

    /// Bounds-checked pixel lookup.
    pub fn id_at(&self, x: u32, y: u32) -> Option<ProvinceId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.ids[(y * self.width + x) as usize])
    }

    /// Pixel lookup with horizontal wrap (cylindrical map topology).
    ///
    /// `x` may be any signed column; `y` outside the map yields the sentinel.
    pub fn id_at_wrapped(&self, x: i64, y: i64) -> ProvinceId {
        if y < 0 || y >= i64::from(self.height) {
            return SENTINEL_PROVINCE;
        }
        let x = x.rem_euclid(i64::from(self.width)) as u32;
        self.ids[(y as u32 * self.width + x) as usize]
    }

    /// Normalized-coordinate lookup used by pointer selection.
    ///
    /// `u` wraps horizontally; `v` outside 0..1 (or non-finite input)
    /// resolves to the sentinel id.
    pub fn id_at_uv(&self, u: f64, v: f64) -> ProvinceId {
        if !u.is_finite() || !v.is_finite() || !(0.0..1.0).contains(&v) {
            return SENTINEL_PROVINCE;
        }
        let u = u.rem_euclid(1.0);
        let x = ((u * f64::from(self.width)) as u32).min(self.width - 1);
        let y = ((v * f64::from(self.height)) as u32).min(self.height - 1);
        self.ids[(y * self.width + x) as usize]
    }
}
