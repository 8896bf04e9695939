//! Built-in levels. Maps are compiled in; the host only picks a number.

use brick_engine::{LevelError, Tilemap};

pub const LEVEL_COUNT: u8 = 3;

const MAPS: [&str; LEVEL_COUNT as usize] = [
    include_str!("../maps/map1.json"),
    include_str!("../maps/map2.json"),
    include_str!("../maps/map3.json"),
];

/// Parse a level number typed by the player: `"1"` to `"3"`, surrounding whitespace allowed.
pub fn parse_selection(input: &str) -> Result<u8, LevelError> {
    match input.trim().parse::<u8>() {
        Ok(n) if (1..=LEVEL_COUNT).contains(&n) => Ok(n),
        _ => Err(LevelError::InvalidSelection(input.to_string())),
    }
}

/// JSON source of level `n` (1-based).
pub fn map_json(n: u8) -> Result<&'static str, LevelError> {
    n.checked_sub(1)
        .and_then(|i| MAPS.get(i as usize))
        .copied()
        .ok_or_else(|| LevelError::InvalidSelection(n.to_string()))
}

pub fn load_level(n: u8) -> Result<Tilemap, LevelError> {
    let map = Tilemap::from_json(map_json(n)?)?;
    log::info!(
        "level {}: {} tiles, {} off-grid, {} reward boxes",
        n,
        map.tile_count(),
        map.offgrid().len(),
        map.randoms().len()
    );
    Ok(map)
}
