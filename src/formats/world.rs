//! World access: open a saved world from a zip archive or a directory and
//! produce seeds and biome grids from it.
//!
//! Worlds are commonly zipped with a wrapper folder (`MyWorld/level.dat`,
//! `MyWorld/region/r.0.0.mca`), so archive entries are located by suffix
//! rather than by exact path.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::formats::{anvil, level};
use crate::map::{BiomeMap, BiomeMap3D};
use crate::version::McVersion;

// ─── Read Options ───────────────────────────────────────────────────────────

/// Optional block-coordinate bounds for biome reads. Samples outside the
/// bounds are dropped before the grid is assembled. All six fields must be
/// set for the filter to apply.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReadOptions {
    pub min_x: Option<i32>,
    pub min_y: Option<i32>,
    pub min_z: Option<i32>,
    pub max_x: Option<i32>,
    pub max_y: Option<i32>,
    pub max_z: Option<i32>,
}

impl ReadOptions {
    pub fn from_json(s: &str) -> Result<Self, WorldError> {
        Ok(serde_json::from_str(s)?)
    }

    fn bounds(&self) -> Option<(i32, i32, i32, i32, i32, i32)> {
        match (
            self.min_x, self.min_y, self.min_z, self.max_x, self.max_y, self.max_z,
        ) {
            (Some(min_x), Some(min_y), Some(min_z), Some(max_x), Some(max_y), Some(max_z)) => {
                Some((min_x, min_y, min_z, max_x, max_y, max_z))
            }
            _ => None,
        }
    }
}

// ─── World Source ───────────────────────────────────────────────────────────

#[derive(Debug)]
enum SourceKind {
    Zip(zip::ZipArchive<Cursor<Vec<u8>>>),
    Directory(PathBuf),
}

/// A saved world, either a `.zip` archive or an unpacked directory.
#[derive(Debug)]
pub struct WorldSource {
    kind: SourceKind,
    display: String,
}

impl WorldSource {
    /// Open a world from a path: directories are read in place, anything
    /// else is treated as a zip archive.
    pub fn open(path: &Path) -> Result<Self, WorldError> {
        let display = path.display().to_string();
        if path.is_dir() {
            return Ok(WorldSource {
                kind: SourceKind::Directory(path.to_path_buf()),
                display,
            });
        }
        let data = std::fs::read(path).map_err(|source| WorldError::OpenWorld {
            path: display.clone(),
            source,
        })?;
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(WorldSource {
            kind: SourceKind::Zip(archive),
            display,
        })
    }

    /// Open a world from in-memory zip bytes.
    pub fn from_zip_bytes(data: Vec<u8>) -> Result<Self, WorldError> {
        let archive = zip::ZipArchive::new(Cursor::new(data))?;
        Ok(WorldSource {
            kind: SourceKind::Zip(archive),
            display: "<zip bytes>".to_string(),
        })
    }

    /// Raw bytes of `level.dat`, wherever it sits inside the world.
    pub fn level_dat(&mut self) -> Result<Vec<u8>, WorldError> {
        match &mut self.kind {
            SourceKind::Zip(archive) => {
                let index = (0..archive.len()).find(|&i| {
                    archive
                        .by_index_raw(i)
                        .map(|f| {
                            // Exact final path component, not a suffix match:
                            // "old_level.dat" is not a level.dat
                            let name = f.name().to_lowercase();
                            name.rsplit('/').next() == Some("level.dat")
                        })
                        .unwrap_or(false)
                });
                let index = match index {
                    Some(i) => i,
                    None => return Err(WorldError::MissingLevelDat(self.display.clone())),
                };
                let mut file = archive.by_index(index)?;
                let mut raw = Vec::new();
                file.read_to_end(&mut raw)?;
                Ok(raw)
            }
            SourceKind::Directory(path) => {
                let file_path = path.join("level.dat");
                if !file_path.exists() {
                    return Err(WorldError::MissingLevelDat(self.display.clone()));
                }
                Ok(std::fs::read(file_path)?)
            }
        }
    }

    /// Contents of every `region/*.mca` file that looks like an Anvil region.
    /// Unreadable files and files that fail the format check are skipped with
    /// a warning; the overall read only fails on archive-level errors.
    pub fn region_files(&mut self) -> Result<Vec<Vec<u8>>, WorldError> {
        let mut regions = Vec::new();
        match &mut self.kind {
            SourceKind::Zip(archive) => {
                let mut indices = Vec::new();
                for i in 0..archive.len() {
                    if let Ok(file) = archive.by_index_raw(i) {
                        let name = file.name().to_lowercase();
                        if name.contains("region/") && name.ends_with(".mca") {
                            indices.push(i);
                        }
                    }
                }
                for i in indices {
                    let mut file = archive.by_index(i)?;
                    let mut data = Vec::new();
                    file.read_to_end(&mut data)?;
                    if anvil::is_mca(&data) {
                        regions.push(data);
                    } else {
                        warn!("skipping {}: not a region file", file.name());
                    }
                }
            }
            SourceKind::Directory(path) => {
                let region_dir = path.join("region");
                if !region_dir.exists() {
                    debug!("no 'region' directory at {}", self.display);
                    return Ok(regions);
                }
                for entry in std::fs::read_dir(&region_dir)? {
                    let entry = entry?;
                    let file_path = entry.path();
                    if file_path.extension().map_or(false, |ext| ext == "mca") {
                        match std::fs::read(&file_path) {
                            Ok(data) if anvil::is_mca(&data) => regions.push(data),
                            Ok(_) => {
                                warn!("skipping {}: not a region file", file_path.display())
                            }
                            Err(e) => warn!("skipping {}: {}", file_path.display(), e),
                        }
                    }
                }
            }
        }
        debug!("found {} region files in {}", regions.len(), self.display);
        Ok(regions)
    }
}

// ─── Operations ─────────────────────────────────────────────────────────────

/// Read the world seed from `level.dat`. `version` is an optional hint for
/// which seed field to try first.
pub fn read_seed(path: &Path, version: Option<McVersion>) -> Result<i64, WorldError> {
    let mut source = WorldSource::open(path)?;
    let raw = source.level_dat()?;
    let level_dat = level::parse_level_dat(&raw, version)?;
    debug!(
        "world {:?} (DataVersion {:?}) has seed {}",
        level_dat.level_name, level_dat.data_version, level_dat.seed
    );
    Ok(level_dat.seed)
}

/// Read all stored biome samples into a dense 2D grid.
///
/// Fails with [`WorldError::BiomesAre3d`] for 1.18+ worlds, which store
/// biomes three-dimensionally; use [`read_biome_map_3d`] for those.
pub fn read_biome_map(path: &Path, version: McVersion) -> Result<BiomeMap, WorldError> {
    read_biome_map_with(path, version, &ReadOptions::default())
}

pub fn read_biome_map_with(
    path: &Path,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap, WorldError> {
    if version.uses_section_biomes() {
        return Err(WorldError::BiomesAre3d);
    }
    let mut source = WorldSource::open(path)?;
    collect_biome_map(&mut source, version, options)
}

/// Read all stored biome samples into a dense 3D grid.
///
/// Versions up to 1.14 produce a single block-scale layer; 1.15 to 1.17
/// produce a single quarter-scale layer (their vertical samples carry no
/// usable y coordinate); 1.18+ produces the full quarter-scale volume, with
/// the y origin taken from section coordinates.
pub fn read_biome_map_3d(path: &Path, version: McVersion) -> Result<BiomeMap3D, WorldError> {
    read_biome_map_3d_with(path, version, &ReadOptions::default())
}

pub fn read_biome_map_3d_with(
    path: &Path,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap3D, WorldError> {
    let mut source = WorldSource::open(path)?;
    collect_biome_map_3d(&mut source, version, options)
}

/// In-memory variants, used by callers that already hold the archive bytes.
pub fn read_biome_map_from_zip_bytes(
    data: Vec<u8>,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap, WorldError> {
    if version.uses_section_biomes() {
        return Err(WorldError::BiomesAre3d);
    }
    let mut source = WorldSource::from_zip_bytes(data)?;
    collect_biome_map(&mut source, version, options)
}

pub fn read_biome_map_3d_from_zip_bytes(
    data: Vec<u8>,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap3D, WorldError> {
    let mut source = WorldSource::from_zip_bytes(data)?;
    collect_biome_map_3d(&mut source, version, options)
}

// ─── Assembly ───────────────────────────────────────────────────────────────

fn collect_samples_2d(
    source: &mut WorldSource,
    version: McVersion,
    options: &ReadOptions,
) -> Result<Vec<anvil::Sample>, WorldError> {
    let mut points = Vec::new();
    for data in source.region_files()? {
        if version.uses_column_biomes() {
            anvil::column_biomes(&data, version, &mut points)?;
        } else {
            anvil::cuboid_biomes(&data, &mut points)?;
        }
    }

    if let Some((min_x, _, min_z, max_x, _, max_z)) = options.bounds() {
        let scale = version.biome_scale();
        points.retain(|&(_, (x, z))| {
            let (bx, bz) = (x * scale, z * scale);
            bx >= i64::from(min_x)
                && bx <= i64::from(max_x)
                && bz >= i64::from(min_z)
                && bz <= i64::from(max_z)
        });
    }
    Ok(points)
}

fn collect_biome_map(
    source: &mut WorldSource,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap, WorldError> {
    let points = collect_samples_2d(source, version, options)?;
    debug!("collected {} biome samples", points.len());
    BiomeMap::from_points(&points)
}

fn collect_biome_map_3d(
    source: &mut WorldSource,
    version: McVersion,
    options: &ReadOptions,
) -> Result<BiomeMap3D, WorldError> {
    if !version.uses_section_biomes() {
        // Pre-1.18 worlds flatten to a single layer
        let points = collect_samples_2d(source, version, options)?;
        debug!("collected {} biome samples", points.len());
        return BiomeMap3D::from_flat_points(&points);
    }

    let mut points = Vec::new();
    for data in source.region_files()? {
        anvil::section_biomes(&data, &mut points)?;
    }

    if let Some((min_x, min_y, min_z, max_x, max_y, max_z)) = options.bounds() {
        // Section biomes are quarter scale on all three axes
        points.retain(|&(_, (x, y, z))| {
            let (bx, by, bz) = (x * 4, y * 4, z * 4);
            bx >= i64::from(min_x)
                && bx <= i64::from(max_x)
                && by >= i64::from(min_y)
                && by <= i64::from(max_y)
                && bz >= i64::from(min_z)
                && bz <= i64::from(max_z)
        });
    }
    debug!("collected {} biome samples", points.len());
    BiomeMap3D::from_points(&points)
}

// ─── Tests ──────────────────────────────────────────────────────────────────
