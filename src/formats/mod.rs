//! On-disk format readers: region files, level.dat, and whole worlds.

pub mod anvil;
pub mod level;
pub mod world;
