//! Shared fixture builders: synthetic level.dat, region files and world
//! archives, small enough to assemble in memory per test.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use quartz_nbt::io::Flavor;
use quartz_nbt::{NbtCompound, NbtList, NbtTag};

// ─── level.dat ──────────────────────────────────────────────────────────────

/// A gzipped level.dat with the seed in the legacy `Data.RandomSeed` field.
pub fn level_dat_legacy(seed: i64) -> Vec<u8> {
    let mut data = NbtCompound::new();
    data.insert("LevelName", NbtTag::String("fixture".to_string()));
    data.insert("DataVersion", NbtTag::Int(1976));
    data.insert("RandomSeed", NbtTag::Long(seed));
    gzip_level_dat(data)
}

/// A gzipped level.dat with the seed in `Data.WorldGenSettings.seed` (1.16+).
pub fn level_dat_modern(seed: i64) -> Vec<u8> {
    let mut world_gen = NbtCompound::new();
    world_gen.insert("seed", NbtTag::Long(seed));
    world_gen.insert("generate_features", NbtTag::Byte(1));

    let mut data = NbtCompound::new();
    data.insert("LevelName", NbtTag::String("fixture".to_string()));
    data.insert("DataVersion", NbtTag::Int(2860));
    data.insert("WorldGenSettings", NbtTag::Compound(world_gen));
    gzip_level_dat(data)
}

fn gzip_level_dat(data: NbtCompound) -> Vec<u8> {
    let mut root = NbtCompound::new();
    root.insert("Data", NbtTag::Compound(data));

    let mut nbt_bytes = Vec::new();
    quartz_nbt::io::write_nbt(&mut nbt_bytes, Some(""), &root, Flavor::Uncompressed).unwrap();

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&nbt_bytes).unwrap();
    encoder.finish().unwrap()
}

// ─── Chunk NBT (one builder per biome-storage era) ──────────────────────────

/// Pre-1.13 chunk: `Level.Biomes` is a 256-entry byte array.
pub fn chunk_nbt_byte_biomes(cx: i32, cz: i32, biomes: &[u8; 256]) -> NbtCompound {
    let mut level = NbtCompound::new();
    level.insert("xPos", NbtTag::Int(cx));
    level.insert("zPos", NbtTag::Int(cz));
    level.insert(
        "Biomes",
        NbtTag::ByteArray(biomes.iter().map(|&b| b as i8).collect()),
    );
    wrap_level(1343, level)
}

/// 1.13/1.14 chunk: `Level.Biomes` is a 256-entry int array (block scale).
pub fn chunk_nbt_column_biomes(cx: i32, cz: i32, biomes: &[i32; 256]) -> NbtCompound {
    let mut level = NbtCompound::new();
    level.insert("xPos", NbtTag::Int(cx));
    level.insert("zPos", NbtTag::Int(cz));
    level.insert("Biomes", NbtTag::IntArray(biomes.to_vec()));
    wrap_level(1976, level)
}

/// 1.15-1.17 chunk: `Level.Biomes` is a 1024-entry int array (quarter scale,
/// x + z*4 + y*16).
pub fn chunk_nbt_cuboid_biomes(cx: i32, cz: i32, biomes: &[i32; 1024]) -> NbtCompound {
    let mut level = NbtCompound::new();
    level.insert("xPos", NbtTag::Int(cx));
    level.insert("zPos", NbtTag::Int(cz));
    level.insert("Biomes", NbtTag::IntArray(biomes.to_vec()));
    wrap_level(2230, level)
}

fn wrap_level(data_version: i32, level: NbtCompound) -> NbtCompound {
    let mut root = NbtCompound::new();
    root.insert("DataVersion", NbtTag::Int(data_version));
    root.insert("Level", NbtTag::Compound(level));
    root
}

/// One 1.18+ chunk section for [`chunk_nbt_section_biomes`]: section Y,
/// biome palette (resource names) and optional packed indices.
pub struct SectionFixture {
    pub y: i8,
    pub palette: Vec<&'static str>,
    pub data: Option<Vec<i64>>,
}

/// 1.18+ chunk: per-section `biomes` palettes at the root level.
pub fn chunk_nbt_section_biomes(cx: i32, cz: i32, sections: &[SectionFixture]) -> NbtCompound {
    let mut section_tags = Vec::new();
    for section in sections {
        let palette: Vec<NbtTag> = section
            .palette
            .iter()
            .map(|name| NbtTag::String(name.to_string()))
            .collect();
        let mut biomes = NbtCompound::new();
        biomes.insert("palette", NbtTag::List(NbtList::from(palette)));
        if let Some(data) = &section.data {
            biomes.insert("data", NbtTag::LongArray(data.clone()));
        }

        let mut compound = NbtCompound::new();
        compound.insert("Y", NbtTag::Byte(section.y));
        compound.insert("biomes", NbtTag::Compound(biomes));
        section_tags.push(NbtTag::Compound(compound));
    }

    let mut root = NbtCompound::new();
    root.insert("DataVersion", NbtTag::Int(2860));
    root.insert("xPos", NbtTag::Int(cx));
    root.insert("zPos", NbtTag::Int(cz));
    root.insert(
        "yPos",
        NbtTag::Int(sections.iter().map(|s| s.y as i32).min().unwrap_or(0)),
    );
    root.insert("sections", NbtTag::List(NbtList::from(section_tags)));
    root
}

/// Pack 64 section-biome indices the way chunks store them: entries never
/// span long boundaries, minimum 1 bit per entry.
pub fn pack_biome_indices(indices: &[u16; 64], palette_size: usize) -> Vec<i64> {
    let bits_per_entry = std::cmp::max((palette_size as f64).log2().ceil() as u32, 1);
    let entries_per_long = 64 / bits_per_entry;
    let num_longs = (64 + entries_per_long as usize - 1) / entries_per_long as usize;

    let mut packed = vec![0i64; num_longs];
    for (i, &idx) in indices.iter().enumerate() {
        let long_index = i / entries_per_long as usize;
        let bit_offset = (i % entries_per_long as usize) as u32 * bits_per_entry;
        packed[long_index] |= (i64::from(idx)) << bit_offset;
    }
    packed
}

// ─── Region files ───────────────────────────────────────────────────────────

/// Assemble an MCA region file: 8KiB of tables followed by zlib-compressed,
/// 4KiB-padded chunk sectors. `chunks` pairs a location-table index
/// (`local_x + local_z * 32`) with the chunk NBT.
pub fn region_bytes(chunks: &[(u32, NbtCompound)]) -> Vec<u8> {
    let mut location_table = vec![0u8; 4096];
    let timestamp_table = vec![0u8; 4096];
    let mut data_sectors = Vec::new();

    let mut current_sector: u32 = 2;
    for (index, nbt) in chunks {
        let mut nbt_bytes = Vec::new();
        quartz_nbt::io::write_nbt(&mut nbt_bytes, None, nbt, Flavor::Uncompressed).unwrap();

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&nbt_bytes).unwrap();
        let compressed = encoder.finish().unwrap();

        let chunk_payload_len = compressed.len() as u32 + 1; // compression byte
        let total_len = 4 + chunk_payload_len;
        let sector_count = ((total_len as usize) + 4095) / 4096;

        let loc_offset = *index as usize * 4;
        location_table[loc_offset] = ((current_sector >> 16) & 0xFF) as u8;
        location_table[loc_offset + 1] = ((current_sector >> 8) & 0xFF) as u8;
        location_table[loc_offset + 2] = (current_sector & 0xFF) as u8;
        location_table[loc_offset + 3] = sector_count as u8;

        let mut chunk_sector = Vec::new();
        chunk_sector.extend_from_slice(&chunk_payload_len.to_be_bytes());
        chunk_sector.push(2); // zlib
        chunk_sector.extend_from_slice(&compressed);
        chunk_sector.resize(sector_count * 4096, 0);

        data_sectors.extend_from_slice(&chunk_sector);
        current_sector += sector_count as u32;
    }

    let mut result = Vec::new();
    result.extend_from_slice(&location_table);
    result.extend_from_slice(&timestamp_table);
    result.extend_from_slice(&data_sectors);
    result
}

// ─── World assembly ─────────────────────────────────────────────────────────

/// Zip the given `(path, bytes)` entries into a world archive.
pub fn world_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (path, data) in entries {
        zip.start_file(*path, options).unwrap();
        zip.write_all(data).unwrap();
    }

    zip.finish().unwrap().into_inner()
}

/// Write a zipped world (wrapper folder included) to `dir` and return its
/// path.
pub fn write_world_zip(
    dir: &std::path::Path,
    level_dat: &[u8],
    regions: &[(&str, Vec<u8>)],
) -> std::path::PathBuf {
    let mut entries: Vec<(String, &[u8])> = vec![("world/level.dat".to_string(), level_dat)];
    for (name, data) in regions {
        entries.push((format!("world/region/{}", name), data.as_slice()));
    }
    let borrowed: Vec<(&str, &[u8])> = entries
        .iter()
        .map(|(path, data)| (path.as_str(), *data))
        .collect();

    let path = dir.join("world.zip");
    std::fs::write(&path, world_zip(&borrowed)).unwrap();
    path
}

/// Write an unpacked world directory to `dir` and return its path.
pub fn write_world_dir(
    dir: &std::path::Path,
    level_dat: &[u8],
    regions: &[(&str, Vec<u8>)],
) -> std::path::PathBuf {
    let world = dir.join("world");
    std::fs::create_dir_all(world.join("region")).unwrap();
    std::fs::write(world.join("level.dat"), level_dat).unwrap();
    for (name, data) in regions {
        std::fs::write(world.join("region").join(name), data).unwrap();
    }
    world
}
