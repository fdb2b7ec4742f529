//! Parsing of `level.dat`: a gzipped NBT compound whose `Data` child carries
//! the world seed and some identity fields.

use std::io::{Cursor, Read};

use flate2::read::GzDecoder;
use quartz_nbt::io::Flavor;
use quartz_nbt::NbtCompound;

use crate::error::WorldError;
use crate::version::McVersion;

/// The fields of `level.dat` this crate cares about.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelDat {
    pub seed: i64,
    pub level_name: Option<String>,
    pub data_version: Option<i32>,
}

/// Parse raw `level.dat` bytes.
///
/// The seed lives in `Data.RandomSeed` before 1.16 and in
/// `Data.WorldGenSettings.seed` afterwards. `version` is only a hint for
/// which field to try first; both are checked, so a wrong or absent hint
/// still finds the seed.
pub fn parse_level_dat(raw: &[u8], version: Option<McVersion>) -> Result<LevelDat, WorldError> {
    let bytes = maybe_gunzip(raw)?;
    let (root, _) = quartz_nbt::io::read_nbt(&mut Cursor::new(&bytes), Flavor::Uncompressed)?;
    let data = root
        .get::<_, &NbtCompound>("Data")
        .map_err(|_| WorldError::SeedNotFound("level.dat has no Data compound".to_string()))?;

    let seed = read_seed_field(data, version)?;
    let level_name = data.get::<_, &str>("LevelName").ok().map(str::to_string);
    let data_version = data.get::<_, i32>("DataVersion").ok();

    Ok(LevelDat {
        seed,
        level_name,
        data_version,
    })
}

fn maybe_gunzip(raw: &[u8]) -> Result<Vec<u8>, WorldError> {
    // Gzip magic; some tools write level.dat uncompressed
    if raw.len() >= 2 && raw[0] == 0x1f && raw[1] == 0x8b {
        let mut decoder = GzDecoder::new(raw);
        let mut bytes = Vec::new();
        decoder.read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        Ok(raw.to_vec())
    }
}

fn read_seed_field(data: &NbtCompound, version: Option<McVersion>) -> Result<i64, WorldError> {
    let legacy = || data.get::<_, i64>("RandomSeed").ok();
    let modern = || {
        data.get::<_, &NbtCompound>("WorldGenSettings")
            .ok()
            .and_then(|settings| settings.get::<_, i64>("seed").ok())
    };

    let seed = match version {
        Some(v) if v.seed_in_world_gen_settings() => modern().or_else(legacy),
        _ => legacy().or_else(modern),
    };

    seed.ok_or_else(|| {
        WorldError::SeedNotFound(
            "neither RandomSeed nor WorldGenSettings.seed is present".to_string(),
        )
    })
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use quartz_nbt::NbtTag;
    use std::io::Write;

    fn gzipped_level_dat(data: NbtCompound) -> Vec<u8> {
        let mut root = NbtCompound::new();
        root.insert("Data", NbtTag::Compound(data));
        let mut nbt_bytes = Vec::new();
        quartz_nbt::io::write_nbt(&mut nbt_bytes, Some(""), &root, Flavor::Uncompressed).unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&nbt_bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_legacy_seed_field() {
        let mut data = NbtCompound::new();
        data.insert("RandomSeed", NbtTag::Long(1234));
        data.insert("LevelName", NbtTag::String("old world".to_string()));
        let bytes = gzipped_level_dat(data);

        let level = parse_level_dat(&bytes, Some(McVersion::Java1_14)).unwrap();
        assert_eq!(level.seed, 1234);
        assert_eq!(level.level_name.as_deref(), Some("old world"));
    }

    #[test]
    fn test_modern_seed_field() {
        let mut settings = NbtCompound::new();
        settings.insert("seed", NbtTag::Long(-99));
        let mut data = NbtCompound::new();
        data.insert("WorldGenSettings", NbtTag::Compound(settings));
        data.insert("DataVersion", NbtTag::Int(2860));
        let bytes = gzipped_level_dat(data);

        let level = parse_level_dat(&bytes, Some(McVersion::Java1_18)).unwrap();
        assert_eq!(level.seed, -99);
        assert_eq!(level.data_version, Some(2860));
    }

    #[test]
    fn test_seed_found_without_version_hint() {
        let mut settings = NbtCompound::new();
        settings.insert("seed", NbtTag::Long(42));
        let mut data = NbtCompound::new();
        data.insert("WorldGenSettings", NbtTag::Compound(settings));
        let bytes = gzipped_level_dat(data);

        assert_eq!(parse_level_dat(&bytes, None).unwrap().seed, 42);
    }

    #[test]
    fn test_wrong_hint_still_finds_seed() {
        let mut data = NbtCompound::new();
        data.insert("RandomSeed", NbtTag::Long(7));
        let bytes = gzipped_level_dat(data);

        assert_eq!(
            parse_level_dat(&bytes, Some(McVersion::Java1_18)).unwrap().seed,
            7
        );
    }

    #[test]
    fn test_missing_seed_is_error() {
        let bytes = gzipped_level_dat(NbtCompound::new());
        assert!(matches!(
            parse_level_dat(&bytes, None),
            Err(WorldError::SeedNotFound(_))
        ));
    }
}
