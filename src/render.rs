//! Render biome grids to RGBA buffers and PNG files.
//!
//! One pixel per cell. 3D grids are drawn as `sy` horizontal slices stacked
//! vertically, so the image is `sx` wide and `sy * sz` tall. Because the
//! cell buffer is y-major, the stacked layout is just the buffer in order.

use std::path::Path;

use crate::biome::biome_to_color;
use crate::error::WorldError;
use crate::map::{BiomeMap, BiomeMap3D};

pub fn map_to_rgba(map: &BiomeMap) -> Vec<u8> {
    cells_to_rgba(map.cells())
}

pub fn map3d_to_rgba(map: &BiomeMap3D) -> Vec<u8> {
    cells_to_rgba(map.cells())
}

fn cells_to_rgba(cells: &[i32]) -> Vec<u8> {
    let mut rgba = vec![0u8; cells.len() * 4];
    for (i, &biome) in cells.iter().enumerate() {
        let color = biome_to_color(biome);
        rgba[i * 4..i * 4 + 4].copy_from_slice(&color);
    }
    rgba
}

/// Write a 2D grid as a PNG, one pixel per cell.
pub fn save_map_png(map: &BiomeMap, path: &Path) -> Result<(), WorldError> {
    let too_large = || WorldError::ImageTooLarge(map.area.w, map.area.h);
    let width = u32::try_from(map.area.w).map_err(|_| too_large())?;
    let height = u32::try_from(map.area.h).map_err(|_| too_large())?;
    image::save_buffer(
        path,
        &map_to_rgba(map),
        width,
        height,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

/// Write a 3D grid as a PNG of vertically stacked layers.
pub fn save_map3d_png(map: &BiomeMap3D, path: &Path) -> Result<(), WorldError> {
    let rows = map
        .area
        .sy
        .checked_mul(map.area.sz)
        .ok_or(WorldError::ImageTooLarge(map.area.sx, u64::MAX))?;
    let too_large = || WorldError::ImageTooLarge(map.area.sx, rows);
    let width = u32::try_from(map.area.sx).map_err(|_| too_large())?;
    let height = u32::try_from(rows).map_err(|_| too_large())?;
    image::save_buffer(
        path,
        &map3d_to_rgba(map),
        width,
        height,
        image::ColorType::Rgba8,
    )?;
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{Area, Area3D};

    #[test]
    fn test_rgba_buffer_is_four_bytes_per_cell() {
        let map = BiomeMap::from_parts(
            Area { x: 0, z: 0, w: 2, h: 2 },
            vec![0, 1, 7, -1],
        )
        .unwrap();
        let rgba = map_to_rgba(&map);
        assert_eq!(rgba.len(), 16);
        // ocean
        assert_eq!(&rgba[0..4], &[0, 0, 112, 255]);
        // plains
        assert_eq!(&rgba[4..8], &[141, 179, 96, 255]);
        // unknown (-1) masks to 255 and brightens black
        assert_eq!(&rgba[12..16], &[40, 40, 40, 255]);
    }

    #[test]
    fn test_save_map3d_png_dimensions() {
        let area = Area3D {
            x: 0,
            y: -4,
            z: 0,
            sx: 4,
            sy: 3,
            sz: 2,
        };
        let map = BiomeMap3D::from_parts(area, vec![1; 24]).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slices.png");
        save_map3d_png(&map, &path).unwrap();

        let img = image::open(&path).unwrap();
        // sx wide, sy * sz tall
        assert_eq!(img.width(), 4);
        assert_eq!(img.height(), 6);
    }

    #[test]
    fn test_save_map_png_roundtrips_colors() {
        let map = BiomeMap::from_parts(
            Area { x: -1, z: -1, w: 3, h: 1 },
            vec![0, 1, 21],
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        save_map_png(&map, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (3, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 112, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [141, 179, 96, 255]);
    }
}
