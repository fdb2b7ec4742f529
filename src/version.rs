use std::fmt;
use std::str::FromStr;

use crate::error::WorldError;

/// Java edition version groups, named after the first release that introduced
/// the save format each group shares.
///
/// Minecraft changed how biomes are stored on disk several times:
/// a 256-entry byte array per chunk (up to 1.12), the same array as ints
/// (1.13/1.14), a 1024-entry quarter-resolution int array (1.15 to 1.17) and
/// finally per-section palettes (1.18+). Version strings that fall inside a
/// group all parse to the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McVersion {
    Java1_3,
    Java1_7,
    Java1_9,
    Java1_11,
    Java1_13,
    Java1_14,
    Java1_15,
    /// 1.16.1 exactly. Some structure coordinates changed in 1.16.2, so the
    /// first patch release keeps its own variant.
    Java1_16_1,
    Java1_16,
    Java1_17,
    Java1_18,
}

impl McVersion {
    /// Biomes stored as a 256-entry column array under `Level.Biomes`.
    pub fn uses_column_biomes(self) -> bool {
        matches!(
            self,
            McVersion::Java1_3
                | McVersion::Java1_7
                | McVersion::Java1_9
                | McVersion::Java1_11
                | McVersion::Java1_13
                | McVersion::Java1_14
        )
    }

    /// The column array is a byte array rather than an int array (pre-1.13).
    pub fn uses_byte_biomes(self) -> bool {
        matches!(
            self,
            McVersion::Java1_3 | McVersion::Java1_7 | McVersion::Java1_9 | McVersion::Java1_11
        )
    }

    /// Biomes stored as a 1024-entry quarter-resolution array (1.15 to 1.17).
    pub fn uses_cuboid_biomes(self) -> bool {
        matches!(
            self,
            McVersion::Java1_15
                | McVersion::Java1_16_1
                | McVersion::Java1_16
                | McVersion::Java1_17
        )
    }

    /// Biomes stored per chunk section as a palette plus packed indices (1.18+).
    pub fn uses_section_biomes(self) -> bool {
        matches!(self, McVersion::Java1_18)
    }

    /// The world seed moved from `Data.RandomSeed` to
    /// `Data.WorldGenSettings.seed` in 1.16.
    pub fn seed_in_world_gen_settings(self) -> bool {
        matches!(
            self,
            McVersion::Java1_16_1 | McVersion::Java1_16 | McVersion::Java1_17 | McVersion::Java1_18
        )
    }

    /// Block coordinates per grid cell: 1 for column storage, 4 for the
    /// quarter-resolution formats.
    pub fn biome_scale(self) -> i64 {
        if self.uses_column_biomes() {
            1
        } else {
            4
        }
    }
}

impl fmt::Display for McVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            McVersion::Java1_3 => "1.3",
            McVersion::Java1_7 => "1.7",
            McVersion::Java1_9 => "1.9",
            McVersion::Java1_11 => "1.11",
            McVersion::Java1_13 => "1.13",
            McVersion::Java1_14 => "1.14",
            McVersion::Java1_15 => "1.15",
            McVersion::Java1_16_1 => "1.16.1",
            McVersion::Java1_16 => "1.16",
            McVersion::Java1_17 => "1.17",
            McVersion::Java1_18 => "1.18",
        };
        f.write_str(s)
    }
}

impl FromStr for McVersion {
    type Err = WorldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || WorldError::UnsupportedVersion(s.to_string());

        let mut parts = s.trim().split('.');
        if parts.next() != Some("1") {
            return Err(unsupported());
        }
        let minor: u32 = parts
            .next()
            .and_then(|m| m.parse().ok())
            .ok_or_else(unsupported)?;
        let patch: Option<u32> = match parts.next() {
            Some(p) => Some(p.parse().map_err(|_| unsupported())?),
            None => None,
        };

        let version = match minor {
            3..=6 => McVersion::Java1_3,
            7 | 8 => McVersion::Java1_7,
            9 | 10 => McVersion::Java1_9,
            11 | 12 => McVersion::Java1_11,
            13 => McVersion::Java1_13,
            14 => McVersion::Java1_14,
            15 => McVersion::Java1_15,
            16 if patch == Some(1) => McVersion::Java1_16_1,
            16 => McVersion::Java1_16,
            17 => McVersion::Java1_17,
            18.. => McVersion::Java1_18,
            _ => return Err(unsupported()),
        };
        Ok(version)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_version_groups() {
        assert_eq!("1.3".parse::<McVersion>().unwrap(), McVersion::Java1_3);
        assert_eq!("1.6.4".parse::<McVersion>().unwrap(), McVersion::Java1_3);
        assert_eq!("1.8.9".parse::<McVersion>().unwrap(), McVersion::Java1_7);
        assert_eq!("1.12.2".parse::<McVersion>().unwrap(), McVersion::Java1_11);
        assert_eq!("1.14.4".parse::<McVersion>().unwrap(), McVersion::Java1_14);
        assert_eq!("1.15".parse::<McVersion>().unwrap(), McVersion::Java1_15);
        assert_eq!("1.17.1".parse::<McVersion>().unwrap(), McVersion::Java1_17);
        assert_eq!("1.18".parse::<McVersion>().unwrap(), McVersion::Java1_18);
        // Everything newer keeps the 1.18 save format
        assert_eq!("1.21.4".parse::<McVersion>().unwrap(), McVersion::Java1_18);
    }

    #[test]
    fn test_parse_1_16_patch_split() {
        assert_eq!(
            "1.16.1".parse::<McVersion>().unwrap(),
            McVersion::Java1_16_1
        );
        assert_eq!("1.16".parse::<McVersion>().unwrap(), McVersion::Java1_16);
        assert_eq!("1.16.5".parse::<McVersion>().unwrap(), McVersion::Java1_16);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("2.0".parse::<McVersion>().is_err());
        assert!("1.2".parse::<McVersion>().is_err());
        assert!("banana".parse::<McVersion>().is_err());
        assert!("1".parse::<McVersion>().is_err());
        assert!("".parse::<McVersion>().is_err());
    }

    #[test]
    fn test_storage_predicates_partition_versions() {
        for v in [
            McVersion::Java1_3,
            McVersion::Java1_7,
            McVersion::Java1_9,
            McVersion::Java1_11,
            McVersion::Java1_13,
            McVersion::Java1_14,
            McVersion::Java1_15,
            McVersion::Java1_16_1,
            McVersion::Java1_16,
            McVersion::Java1_17,
            McVersion::Java1_18,
        ] {
            let schemes = [
                v.uses_column_biomes(),
                v.uses_cuboid_biomes(),
                v.uses_section_biomes(),
            ];
            assert_eq!(
                schemes.iter().filter(|&&b| b).count(),
                1,
                "exactly one storage scheme for {}",
                v
            );
        }
    }

    #[test]
    fn test_seed_field_location() {
        assert!(!McVersion::Java1_15.seed_in_world_gen_settings());
        assert!(McVersion::Java1_16_1.seed_in_world_gen_settings());
        assert!(McVersion::Java1_18.seed_in_world_gen_settings());
    }
}
