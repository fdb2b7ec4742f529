//! worldlens — read seeds and biome maps from saved Minecraft Java worlds.
//!
//! Open a world (zip archive or directory), read the seed from `level.dat`,
//! assemble dense 2D/3D biome grids from the region files, and render grids
//! to PNG. The `ffi` feature (on by default) exports the same operations
//! over a small C ABI; see the [`ffi`] module for the ownership contract.

pub mod biome;
pub mod error;
pub mod formats;
pub mod map;
pub mod render;
pub mod version;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use error::WorldError;
pub use formats::world::{
    read_biome_map, read_biome_map_3d, read_biome_map_3d_with, read_biome_map_with, read_seed,
    ReadOptions, WorldSource,
};
pub use map::{Area, Area3D, BiomeMap, BiomeMap3D, UNKNOWN_BIOME};
pub use version::McVersion;
