//! Dense biome grids with an origin and extents.
//!
//! Grids are row-major: 2D cells are indexed `z * w + x`, 3D cells
//! `y * (sz * sx) + z * sx + x`, all relative to the grid origin. The cell
//! buffer always holds exactly the extent product; cells without a stored
//! sample keep [`UNKNOWN_BIOME`].

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Placeholder for cells the world has no sample for. Consumers ignore it.
pub const UNKNOWN_BIOME: i32 = -1;

// ─── Areas ──────────────────────────────────────────────────────────────────

/// A rectangle of cells: origin `(x, z)` and extents `(w, h)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area {
    pub x: i64,
    pub z: i64,
    pub w: u64,
    pub h: u64,
}

impl Area {
    /// Bounding area of a set of cell coordinates. `None` when the set is
    /// empty.
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        let mut iter = coords.into_iter();
        let (x0, z0) = iter.next()?;
        let (mut min_x, mut max_x) = (x0, x0);
        let (mut min_z, mut max_z) = (z0, z0);
        for (x, z) in iter {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }
        Some(Area {
            x: min_x,
            z: min_z,
            w: (max_x - min_x + 1) as u64,
            h: (max_z - min_z + 1) as u64,
        })
    }

    pub fn cell_count(&self) -> u64 {
        self.w * self.h
    }

    pub fn contains(&self, x: i64, z: i64) -> bool {
        x >= self.x && z >= self.z && ((x - self.x) as u64) < self.w && ((z - self.z) as u64) < self.h
    }
}

/// A box of cells: origin `(x, y, z)` and extents `(sx, sy, sz)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Area3D {
    pub x: i64,
    pub y: i64,
    pub z: i64,
    pub sx: u64,
    pub sy: u64,
    pub sz: u64,
}

impl Area3D {
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i64, i64, i64)>,
    {
        let mut iter = coords.into_iter();
        let (x0, y0, z0) = iter.next()?;
        let (mut min_x, mut max_x) = (x0, x0);
        let (mut min_y, mut max_y) = (y0, y0);
        let (mut min_z, mut max_z) = (z0, z0);
        for (x, y, z) in iter {
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
            min_z = min_z.min(z);
            max_z = max_z.max(z);
        }
        Some(Area3D {
            x: min_x,
            y: min_y,
            z: min_z,
            sx: (max_x - min_x + 1) as u64,
            sy: (max_y - min_y + 1) as u64,
            sz: (max_z - min_z + 1) as u64,
        })
    }

    pub fn cell_count(&self) -> u64 {
        self.sx * self.sy * self.sz
    }
}

// ─── 2D grid ────────────────────────────────────────────────────────────────

/// A dense 2D biome grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap {
    pub area: Area,
    cells: Vec<i32>,
}

impl BiomeMap {
    /// A grid covering `area` with every cell set to [`UNKNOWN_BIOME`].
    pub fn new(area: Area) -> Self {
        BiomeMap {
            area,
            cells: vec![UNKNOWN_BIOME; area.cell_count() as usize],
        }
    }

    /// Build the bounding grid of a sample set. Cells not named by any sample
    /// stay [`UNKNOWN_BIOME`]; later samples for the same cell win.
    pub fn from_points(points: &[(i32, (i64, i64))]) -> Result<Self, WorldError> {
        let area = Area::from_coords(points.iter().map(|&(_, p)| p))
            .ok_or(WorldError::NoBiomeData)?;
        let mut map = BiomeMap::new(area);
        for &(biome, (x, z)) in points {
            map.set(x, z, biome);
        }
        Ok(map)
    }

    /// Rebuild a grid from its parts, checking the cell-count invariant.
    pub fn from_parts(area: Area, cells: Vec<i32>) -> Result<Self, WorldError> {
        if cells.len() as u64 != area.cell_count() {
            return Err(WorldError::CellCountMismatch {
                expected: area.cell_count(),
                got: cells.len() as u64,
            });
        }
        Ok(BiomeMap { area, cells })
    }

    fn index(&self, x: i64, z: i64) -> usize {
        debug_assert!(x >= self.area.x && z >= self.area.z);
        let dx = (x - self.area.x) as u64;
        let dz = (z - self.area.z) as u64;
        debug_assert!(dx < self.area.w && dz < self.area.h);
        (dz * self.area.w + dx) as usize
    }

    /// Biome at absolute cell coordinates, `None` outside the area.
    pub fn get(&self, x: i64, z: i64) -> Option<i32> {
        if x < self.area.x || z < self.area.z {
            return None;
        }
        if (x - self.area.x) as u64 >= self.area.w || (z - self.area.z) as u64 >= self.area.h {
            return None;
        }
        Some(self.cells[self.index(x, z)])
    }

    pub fn set(&mut self, x: i64, z: i64, biome: i32) {
        let idx = self.index(x, z);
        self.cells[idx] = biome;
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<i32> {
        self.cells
    }
}

// ─── 3D grid ────────────────────────────────────────────────────────────────

/// A dense 3D biome grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeMap3D {
    pub area: Area3D,
    cells: Vec<i32>,
}

impl BiomeMap3D {
    pub fn new(area: Area3D) -> Self {
        BiomeMap3D {
            area,
            cells: vec![UNKNOWN_BIOME; area.cell_count() as usize],
        }
    }

    pub fn from_points(points: &[(i32, (i64, i64, i64))]) -> Result<Self, WorldError> {
        let area = Area3D::from_coords(points.iter().map(|&(_, p)| p))
            .ok_or(WorldError::NoBiomeData)?;
        let mut map = BiomeMap3D::new(area);
        for &(biome, (x, y, z)) in points {
            map.set(x, y, z, biome);
        }
        Ok(map)
    }

    /// A single-layer grid (`sy == 1`, `y == 0`) from 2D samples. This is the
    /// shape the pre-1.18 readers produce.
    pub fn from_flat_points(points: &[(i32, (i64, i64))]) -> Result<Self, WorldError> {
        let area = Area::from_coords(points.iter().map(|&(_, p)| p))
            .ok_or(WorldError::NoBiomeData)?;
        let mut map = BiomeMap3D::new(Area3D {
            x: area.x,
            y: 0,
            z: area.z,
            sx: area.w,
            sy: 1,
            sz: area.h,
        });
        for &(biome, (x, z)) in points {
            map.set(x, 0, z, biome);
        }
        Ok(map)
    }

    /// Rebuild a grid from its parts, checking the cell-count invariant.
    pub fn from_parts(area: Area3D, cells: Vec<i32>) -> Result<Self, WorldError> {
        if cells.len() as u64 != area.cell_count() {
            return Err(WorldError::CellCountMismatch {
                expected: area.cell_count(),
                got: cells.len() as u64,
            });
        }
        Ok(BiomeMap3D { area, cells })
    }

    fn index(&self, x: i64, y: i64, z: i64) -> usize {
        debug_assert!(x >= self.area.x && y >= self.area.y && z >= self.area.z);
        let dx = (x - self.area.x) as u64;
        let dy = (y - self.area.y) as u64;
        let dz = (z - self.area.z) as u64;
        debug_assert!(dx < self.area.sx && dy < self.area.sy && dz < self.area.sz);
        (dy * self.area.sz * self.area.sx + dz * self.area.sx + dx) as usize
    }

    pub fn get(&self, x: i64, y: i64, z: i64) -> Option<i32> {
        if x < self.area.x || y < self.area.y || z < self.area.z {
            return None;
        }
        let (dx, dy, dz) = (
            (x - self.area.x) as u64,
            (y - self.area.y) as u64,
            (z - self.area.z) as u64,
        );
        if dx >= self.area.sx || dy >= self.area.sy || dz >= self.area.sz {
            return None;
        }
        Some(self.cells[self.index(x, y, z)])
    }

    pub fn set(&mut self, x: i64, y: i64, z: i64, biome: i32) {
        let idx = self.index(x, y, z);
        self.cells[idx] = biome;
    }

    pub fn cells(&self) -> &[i32] {
        &self.cells
    }

    pub fn into_cells(self) -> Vec<i32> {
        self.cells
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
