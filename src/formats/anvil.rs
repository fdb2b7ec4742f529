//! Read-only decoding of Anvil region files (`.mca`).
//!
//! A region file holds up to 32x32 chunks behind a 1024-entry location table
//! of 4KiB sectors. Each stored chunk is a length-prefixed, compressed NBT
//! compound. This module walks the table and extracts biome samples in
//! whichever of the three historical layouts the chunk uses.

use std::io::{Cursor, Read};

use flate2::read::{GzDecoder, ZlibDecoder};
use log::warn;
use quartz_nbt::io::Flavor;
use quartz_nbt::{NbtCompound, NbtList, NbtTag};

use crate::biome::biome_id_from_name;
use crate::error::WorldError;
use crate::version::McVersion;

/// Biome sample at 2D cell coordinates (block scale or quarter scale,
/// depending on the source format).
pub type Sample = (i32, (i64, i64));

/// Biome sample at quarter-scale 3D cell coordinates.
pub type Sample3D = (i32, (i64, i64, i64));

/// WorldDownloader writes this id for chunks whose biomes it never saw.
const VOID_BIOME: i32 = 127;

// ─── Data Structures ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressionType {
    Gzip = 1,
    Zlib = 2,
    Uncompressed = 3,
    Lz4 = 4,
}

impl CompressionType {
    pub fn from_byte(b: u8) -> Result<Self, WorldError> {
        match b {
            1 => Ok(CompressionType::Gzip),
            2 => Ok(CompressionType::Zlib),
            3 => Ok(CompressionType::Uncompressed),
            4 => Err(WorldError::InvalidRegion(
                "LZ4 compression (type 4) is not supported".to_string(),
            )),
            _ => Err(WorldError::InvalidRegion(format!(
                "unknown compression type: {}",
                b
            ))),
        }
    }
}

// ─── Detection ──────────────────────────────────────────────────────────────

/// Check if data looks like an MCA region file.
/// Must be at least 8192 bytes (two 4KiB tables) and have at least one valid
/// location entry.
pub fn is_mca(data: &[u8]) -> bool {
    if data.len() < 8192 {
        return false;
    }
    for i in 0..1024 {
        let offset = i * 4;
        let loc_offset = ((data[offset] as u32) << 16)
            | ((data[offset + 1] as u32) << 8)
            | (data[offset + 2] as u32);
        let sector_count = data[offset + 3];
        if loc_offset >= 2 && sector_count > 0 {
            return true;
        }
    }
    false
}

// ─── Region Walk ────────────────────────────────────────────────────────────

/// Walk the location table and hand every stored chunk's NBT to `f`.
///
/// Truncated or unparsable chunks are skipped, as are chunks with an
/// unsupported compression byte; one bad chunk never sinks the region.
fn for_each_chunk(
    data: &[u8],
    mut f: impl FnMut(&NbtCompound),
) -> Result<(), WorldError> {
    if data.len() < 8192 {
        return Err(WorldError::InvalidRegion(
            "region file too small (< 8192 bytes)".to_string(),
        ));
    }

    for i in 0..1024usize {
        let offset = i * 4;
        let loc_offset = ((data[offset] as u32) << 16)
            | ((data[offset + 1] as u32) << 8)
            | (data[offset + 2] as u32);
        let sector_count = data[offset + 3] as u32;

        if loc_offset < 2 || sector_count == 0 {
            continue;
        }

        let byte_offset = (loc_offset as usize) * 4096;
        if byte_offset + 5 > data.len() {
            continue;
        }

        // Chunk header: 4-byte length + 1-byte compression type
        let chunk_len = ((data[byte_offset] as u32) << 24)
            | ((data[byte_offset + 1] as u32) << 16)
            | ((data[byte_offset + 2] as u32) << 8)
            | (data[byte_offset + 3] as u32);

        if chunk_len <= 1 {
            continue;
        }

        let compression = match CompressionType::from_byte(data[byte_offset + 4]) {
            Ok(c) => c,
            Err(e) => {
                warn!("skipping chunk {}: {}", i, e);
                continue;
            }
        };

        let compressed_start = byte_offset + 5;
        let compressed_len = (chunk_len as usize) - 1;
        if compressed_start + compressed_len > data.len() {
            continue;
        }

        let compressed = &data[compressed_start..compressed_start + compressed_len];

        let decompressed = match decompress_chunk(compressed, compression) {
            Ok(d) => d,
            Err(e) => {
                warn!("skipping chunk {}: {}", i, e);
                continue;
            }
        };

        let nbt = match quartz_nbt::io::read_nbt(
            &mut Cursor::new(&decompressed),
            Flavor::Uncompressed,
        ) {
            Ok((nbt, _)) => nbt,
            Err(e) => {
                warn!("skipping chunk {}: bad nbt: {}", i, e);
                continue;
            }
        };

        f(&nbt);
    }

    Ok(())
}

fn decompress_chunk(data: &[u8], compression: CompressionType) -> Result<Vec<u8>, WorldError> {
    let mut decompressed = Vec::new();
    match compression {
        CompressionType::Zlib => {
            let mut decoder = ZlibDecoder::new(data);
            decoder.read_to_end(&mut decompressed)?;
        }
        CompressionType::Gzip => {
            let mut decoder = GzDecoder::new(data);
            decoder.read_to_end(&mut decompressed)?;
        }
        CompressionType::Uncompressed => {
            decompressed = data.to_vec();
        }
        CompressionType::Lz4 => {
            return Err(WorldError::InvalidRegion(
                "LZ4 compression is not supported".to_string(),
            ));
        }
    }
    Ok(decompressed)
}

// ─── Biome Extraction ───────────────────────────────────────────────────────

/// Collect block-scale biome samples from `Level.Biomes` column arrays
/// (up to 1.14). Pre-1.13 chunks store the array as bytes.
pub fn column_biomes(
    data: &[u8],
    version: McVersion,
    out: &mut Vec<Sample>,
) -> Result<(), WorldError> {
    for_each_chunk(data, |nbt| {
        let level = match nbt.get::<_, &NbtCompound>("Level") {
            Ok(l) => l,
            Err(_) => return,
        };
        let (chunk_x, chunk_z) = match chunk_pos(level) {
            Some(p) => p,
            None => return,
        };

        let biomes = match read_column_array(level, version) {
            Some(b) => b,
            None => return,
        };
        if biomes.len() != 256 {
            warn!(
                "chunk ({}, {}): unexpected Biomes length {}",
                chunk_x,
                chunk_z,
                biomes.len()
            );
            return;
        }

        for (i, &b) in biomes.iter().enumerate() {
            if b == VOID_BIOME {
                continue;
            }
            let x = i64::from(chunk_x) * 16 + (i % 16) as i64;
            let z = i64::from(chunk_z) * 16 + (i / 16) as i64;
            out.push((b, (x, z)));
        }
    })
}

fn read_column_array(level: &NbtCompound, version: McVersion) -> Option<Vec<i32>> {
    if let Ok(ints) = level.get::<_, &[i32]>("Biomes") {
        return Some(ints.to_vec());
    }
    // Before 1.13 the biome array was bytes; i8 is wrong, u8 is correct.
    if let Ok(bytes) = level.get::<_, &[i8]>("Biomes") {
        if !version.uses_byte_biomes() {
            warn!("byte Biomes array in a chunk claiming {}", version);
        }
        return Some(bytes.iter().map(|&b| i32::from(b as u8)).collect());
    }
    None
}

/// Collect quarter-scale biome samples from the 1024-entry cuboid arrays
/// (1.15 to 1.17). Only the bottom layer is used, which flattens the column
/// into a single quarter-scale 2D sample per cell.
pub fn cuboid_biomes(data: &[u8], out: &mut Vec<Sample>) -> Result<(), WorldError> {
    for_each_chunk(data, |nbt| {
        let level = match nbt.get::<_, &NbtCompound>("Level") {
            Ok(l) => l,
            Err(_) => return,
        };
        let (chunk_x, chunk_z) = match chunk_pos(level) {
            Some(p) => p,
            None => return,
        };
        let biomes = match level.get::<_, &[i32]>("Biomes") {
            Ok(b) => b,
            Err(_) => return,
        };
        if biomes.len() != 1024 {
            warn!(
                "chunk ({}, {}): unexpected Biomes length {}",
                chunk_x,
                chunk_z,
                biomes.len()
            );
            return;
        }

        // Layout is x + z*4 + y*16 at quarter scale; take the y = 0 layer.
        for (i, &b) in biomes.iter().take(16).enumerate() {
            if b == VOID_BIOME {
                continue;
            }
            let x = i64::from(chunk_x) * 4 + (i % 4) as i64;
            let z = i64::from(chunk_z) * 4 + (i / 4) as i64;
            out.push((b, (x, z)));
        }
    })
}

/// Collect quarter-scale 3D biome samples from per-section palettes (1.18+).
///
/// Each section stores a `biomes` compound with a palette of resource names
/// and, for palettes with more than one entry, packed indices (64 cells, one
/// bit minimum, entries never span long boundaries). Section Y can be
/// negative.
pub fn section_biomes(data: &[u8], out: &mut Vec<Sample3D>) -> Result<(), WorldError> {
    for_each_chunk(data, |nbt| {
        let (chunk_x, chunk_z) = match chunk_pos(nbt) {
            Some(p) => p,
            None => return,
        };
        let sections = match nbt.get::<_, &NbtList>("sections") {
            Ok(s) => s,
            Err(_) => return,
        };

        for section_tag in sections.iter() {
            let section = match section_tag {
                NbtTag::Compound(c) => c,
                _ => continue,
            };
            let section_y = match section.get::<_, i8>("Y") {
                Ok(y) => y,
                Err(_) => continue,
            };
            let biomes = match section.get::<_, &NbtCompound>("biomes") {
                Ok(b) => b,
                Err(_) => continue,
            };

            let palette = match read_biome_palette(biomes) {
                Some(p) => p,
                None => continue,
            };

            let indices = if palette.len() <= 1 {
                vec![0u16; 64]
            } else {
                match biomes.get::<_, &[i64]>("data") {
                    Ok(packed) => unpack_biome_indices(packed, palette.len()),
                    Err(_) => vec![0u16; 64],
                }
            };

            for (i, &idx) in indices.iter().enumerate() {
                let biome = match palette.get(idx as usize) {
                    Some(&Some(b)) => b,
                    // Unknown name or corrupt index: leave the cell unknown
                    _ => continue,
                };
                let x = i64::from(chunk_x) * 4 + (i % 4) as i64;
                let z = i64::from(chunk_z) * 4 + ((i / 4) % 4) as i64;
                let y = i64::from(section_y) * 4 + (i / 16) as i64;
                out.push((biome, (x, y, z)));
            }
        }
    })
}

fn chunk_pos(nbt: &NbtCompound) -> Option<(i32, i32)> {
    let x = nbt.get::<_, i32>("xPos").ok()?;
    let z = nbt.get::<_, i32>("zPos").ok()?;
    Some((x, z))
}

fn read_biome_palette(biomes: &NbtCompound) -> Option<Vec<Option<i32>>> {
    let palette_list = biomes.get::<_, &NbtList>("palette").ok()?;
    let mut palette = Vec::with_capacity(palette_list.len());
    for tag in palette_list.iter() {
        match tag {
            NbtTag::String(name) => {
                let id = biome_id_from_name(name);
                if id.is_none() {
                    warn!("unknown biome name in palette: {}", name);
                }
                palette.push(id);
            }
            _ => return None,
        }
    }
    Some(palette)
}

/// Unpack the 64 biome indices of one section.
///
/// Entries do not span across long boundaries. Unlike block states, which
/// have a 4-bit floor, biome palettes use as little as 1 bit per entry.
pub fn unpack_biome_indices(packed: &[i64], palette_size: usize) -> Vec<u16> {
    unpack_packed_array(packed, palette_size, 64, 1)
}

fn unpack_packed_array(
    packed: &[i64],
    palette_size: usize,
    entries: usize,
    min_bits: u32,
) -> Vec<u16> {
    let bits_per_entry = std::cmp::max((palette_size as f64).log2().ceil() as u32, min_bits);
    let entries_per_long = 64 / bits_per_entry;
    let mask = (1u64 << bits_per_entry) - 1;

    let mut result = Vec::with_capacity(entries);
    'outer: for &long_val in packed {
        let value = long_val as u64;
        for i in 0..entries_per_long {
            if result.len() >= entries {
                break 'outer;
            }
            result.push(((value >> (i * bits_per_entry)) & mask) as u16);
        }
    }

    // Short data array: remaining entries default to palette index 0
    result.resize(entries, 0);
    result
}

// ─── Tests ──────────────────────────────────────────────────────────────────
