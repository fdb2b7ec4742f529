use thiserror::Error;

/// Error type for every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("nbt error: {0}")]
    Nbt(#[from] quartz_nbt::io::NbtIoError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid read options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    #[error("cannot open world at {path}: {source}")]
    OpenWorld {
        path: String,
        source: std::io::Error,
    },

    #[error("no level.dat found in world at {0}")]
    MissingLevelDat(String),

    #[error("no seed in level.dat: {0}")]
    SeedNotFound(String),

    #[error("unsupported Minecraft version: {0}")]
    UnsupportedVersion(String),

    #[error("world contains no biome data")]
    NoBiomeData,

    #[error("biomes are stored per-section since 1.18, use the 3D reader")]
    BiomesAre3d,

    #[error("malformed region file: {0}")]
    InvalidRegion(String),

    #[error("cell count {got} does not match extent product {expected}")]
    CellCountMismatch { expected: u64, got: u64 },

    #[error("map of {0}x{1} cells does not fit in an image")]
    ImageTooLarge(u64, u64),
}
