//! Numeric biome identifiers, resource-name lookup and map colors.
//!
//! Ids follow the classic save-format numbering (ocean = 0, plains = 1, ...,
//! mutated variants at id + 128). Worlds from 1.18 onwards store biomes by
//! resource name; [`biome_id_from_name`] resolves both the classic names and
//! the 1.18 renames back to these ids so that grids from every version share
//! one id space.

/// Classic biome id table, `(id, name)` without the `minecraft:` prefix.
static BIOMES: &[(i32, &str)] = &[
    (0, "ocean"),
    (1, "plains"),
    (2, "desert"),
    (3, "mountains"),
    (4, "forest"),
    (5, "taiga"),
    (6, "swamp"),
    (7, "river"),
    (8, "nether_wastes"),
    (9, "the_end"),
    (10, "frozen_ocean"),
    (11, "frozen_river"),
    (12, "snowy_tundra"),
    (13, "snowy_mountains"),
    (14, "mushroom_fields"),
    (15, "mushroom_field_shore"),
    (16, "beach"),
    (17, "desert_hills"),
    (18, "wooded_hills"),
    (19, "taiga_hills"),
    (20, "mountain_edge"),
    (21, "jungle"),
    (22, "jungle_hills"),
    (23, "jungle_edge"),
    (24, "deep_ocean"),
    (25, "stone_shore"),
    (26, "snowy_beach"),
    (27, "birch_forest"),
    (28, "birch_forest_hills"),
    (29, "dark_forest"),
    (30, "snowy_taiga"),
    (31, "snowy_taiga_hills"),
    (32, "giant_tree_taiga"),
    (33, "giant_tree_taiga_hills"),
    (34, "wooded_mountains"),
    (35, "savanna"),
    (36, "savanna_plateau"),
    (37, "badlands"),
    (38, "wooded_badlands_plateau"),
    (39, "badlands_plateau"),
    (40, "small_end_islands"),
    (41, "end_midlands"),
    (42, "end_highlands"),
    (43, "end_barrens"),
    (44, "warm_ocean"),
    (45, "lukewarm_ocean"),
    (46, "cold_ocean"),
    (47, "deep_warm_ocean"),
    (48, "deep_lukewarm_ocean"),
    (49, "deep_cold_ocean"),
    (50, "deep_frozen_ocean"),
    // Mutated variants at id + 128
    (129, "sunflower_plains"),
    (130, "desert_lakes"),
    (131, "gravelly_mountains"),
    (132, "flower_forest"),
    (133, "taiga_mountains"),
    (134, "swamp_hills"),
    (140, "ice_spikes"),
    (149, "modified_jungle"),
    (151, "modified_jungle_edge"),
    (155, "tall_birch_forest"),
    (156, "tall_birch_hills"),
    (157, "dark_forest_hills"),
    (158, "snowy_taiga_mountains"),
    (160, "giant_spruce_taiga"),
    (161, "giant_spruce_taiga_hills"),
    (162, "modified_gravelly_mountains"),
    (163, "shattered_savanna"),
    (164, "shattered_savanna_plateau"),
    (165, "eroded_badlands"),
    (166, "modified_wooded_badlands_plateau"),
    (167, "modified_badlands_plateau"),
    // 1.14+
    (168, "bamboo_jungle"),
    (169, "bamboo_jungle_hills"),
    // 1.16 nether
    (170, "soul_sand_valley"),
    (171, "crimson_forest"),
    (172, "warped_forest"),
    (173, "basalt_deltas"),
    // 1.17 caves
    (174, "dripstone_caves"),
    (175, "lush_caves"),
    // 1.18+
    (177, "meadow"),
    (178, "grove"),
    (179, "snowy_slopes"),
    (180, "jagged_peaks"),
    (181, "frozen_peaks"),
    (182, "stony_peaks"),
    (183, "deep_dark"),
    (184, "mangrove_swamp"),
    (185, "cherry_grove"),
    (186, "pale_garden"),
];

/// 1.18 renamed several biomes without changing what they are; these resolve
/// to the classic ids above.
static RENAMES_1_18: &[(&str, i32)] = &[
    ("snowy_plains", 12),
    ("windswept_hills", 3),
    ("windswept_gravelly_hills", 131),
    ("windswept_forest", 34),
    ("windswept_savanna", 163),
    ("old_growth_pine_taiga", 32),
    ("old_growth_spruce_taiga", 160),
    ("old_growth_birch_forest", 155),
    ("wooded_badlands", 38),
    ("sparse_jungle", 23),
    ("stony_shore", 25),
];

/// Classic name for a biome id.
pub fn biome_name(id: i32) -> Option<&'static str> {
    BIOMES
        .iter()
        .find(|&&(b, _)| b == id)
        .map(|&(_, name)| name)
}

/// Resolve a resource name (with or without the `minecraft:` prefix) to a
/// numeric biome id. Accepts both classic and 1.18 names.
pub fn biome_id_from_name(name: &str) -> Option<i32> {
    let name = name.strip_prefix("minecraft:").unwrap_or(name);
    if let Some(&(_, id)) = RENAMES_1_18.iter().find(|&&(n, _)| n == name) {
        return Some(id);
    }
    BIOMES
        .iter()
        .find(|&&(_, n)| n == name)
        .map(|&(id, _)| id)
}

/// RGBA map color for a biome id.
///
/// Ids outside `0..=255` (including the `-1` unknown marker) are masked to a
/// byte. Mutated ids (128 and above) brighten their base color by 40 per
/// channel.
pub fn biome_to_color(id: i32) -> [u8; 4] {
    let idx = (id & 0xff) as usize;

    let [r, g, b] = BIOME_COLORS[idx];
    if idx < 128 {
        [r, g, b, 255]
    } else {
        [
            r.saturating_add(40),
            g.saturating_add(40),
            b.saturating_add(40),
            255,
        ]
    }
}

#[rustfmt::skip]
static BIOME_COLORS: [[u8; 3]; 256] = [
    // 0..=15
    [0, 0, 112], [141, 179, 96], [250, 148, 24], [96, 96, 96],
    [5, 102, 33], [11, 102, 89], [7, 249, 178], [0, 0, 255],
    [255, 0, 0], [128, 128, 255], [112, 112, 214], [160, 160, 255],
    [255, 255, 255], [160, 160, 160], [255, 0, 255], [160, 0, 255],
    // 16..=31
    [250, 222, 85], [210, 95, 18], [34, 85, 28], [22, 57, 51],
    [114, 120, 154], [83, 123, 9], [44, 66, 5], [98, 139, 23],
    [0, 0, 48], [162, 162, 132], [250, 240, 192], [48, 116, 68],
    [31, 95, 50], [64, 81, 26], [49, 85, 74], [36, 63, 54],
    // 32..=39
    [89, 102, 81], [69, 79, 62], [80, 112, 80], [189, 178, 95],
    [167, 157, 100], [217, 69, 21], [176, 151, 101], [202, 140, 101],
    // 40..=43 (end biomes, unassigned)
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    // 44..=50 (ocean variants)
    [0, 0, 172], [0, 0, 144], [32, 32, 112], [0, 0, 80],
    [0, 0, 64], [32, 32, 56], [64, 64, 144],
    // 51..=126 unassigned
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0],
    // 127..=142 (mutated range mirrors the base colors, with a few tweaks)
    [0, 0, 112], [141, 179, 96], [250, 148, 24], [96, 96, 96],
    [5, 102, 33], [11, 102, 89], [7, 249, 178], [0, 0, 255],
    [255, 0, 0], [128, 128, 255], [144, 144, 160], [160, 160, 255],
    [140, 180, 180], [160, 160, 160], [255, 0, 255], [160, 0, 255],
    // 143..=158
    [250, 222, 85], [210, 95, 18], [34, 85, 28], [22, 57, 51],
    [114, 120, 154], [83, 123, 9], [44, 66, 5], [98, 139, 23],
    [0, 0, 48], [162, 162, 132], [250, 240, 192], [48, 116, 68],
    [31, 95, 50], [64, 81, 26], [49, 85, 74], [36, 63, 54],
    // 159..=166
    [89, 102, 81], [69, 79, 62], [80, 112, 80], [189, 178, 95],
    [167, 157, 100], [217, 69, 21], [176, 151, 101], [202, 140, 101],
    // 167..=251 unassigned
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
    // 252 (debug marker), 253..=255
    [0, 255, 0], [0, 0, 0], [0, 0, 0], [0, 0, 0],
];

// ─── Tests ──────────────────────────────────────────────────────────────────
