//! Sparse tile storage for levels.
//!
//! Grid tiles live in a map keyed by integer cell; off-grid tiles are free-floating
//! decorations at pixel positions. Only the cells around an entity are ever queried
//! for collision, and rendering walks just the cells inside the viewport.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::registry::AssetRegistry;
use crate::core::error::{AssetError, LevelError};
use crate::core::rect::Rect;
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Integer grid coordinate `(x, y)`.
pub type Cell = (i32, i32);

/// Offsets checked around an entity's cell, in query order.
/// Three columns by four rows so tall entities still see the ground under them.
pub const NEIGHBOR_OFFSETS: [Cell; 12] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 0),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
    (-1, 2),
    (0, 2),
    (1, 2),
];

/// Tile kinds that block movement.
pub const PHYSICS_KINDS: [&str; 4] = ["brick", "ground", "random", "random2"];

/// Tile kind of an unopened reward box.
pub const REWARD_KIND: &str = "random";

/// Kinds that only mark spawn points and are never drawn as tiles.
const SPAWN_MARKERS: [&str; 2] = ["koopa", "goomba"];

pub const DEFAULT_TILE_SIZE: u32 = 16;

pub fn is_physics_kind(kind: &str) -> bool {
    PHYSICS_KINDS.contains(&kind)
}

fn is_spawn_marker(kind: &str) -> bool {
    SPAWN_MARKERS.contains(&kind)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridTile {
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: [i32; 2],
}

impl GridTile {
    pub fn new(kind: impl Into<String>, cell: Cell) -> Self {
        Self {
            kind: kind.into(),
            pos: [cell.0, cell.1],
        }
    }

    pub fn cell(&self) -> Cell {
        (self.pos[0], self.pos[1])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffgridTile {
    #[serde(rename = "type")]
    pub kind: String,
    pub pos: [f32; 2],
}

impl OffgridTile {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.pos[0], self.pos[1])
    }
}

/// On-disk level layout. Grid keys are `"x;y"` strings.
#[derive(Debug, Serialize, Deserialize)]
struct LevelFile {
    tilemap: BTreeMap<String, GridTile>,
    tilesize: u32,
    #[serde(default)]
    offgrid: Vec<OffgridTile>,
}

fn cell_key(cell: Cell) -> String {
    format!("{};{}", cell.0, cell.1)
}

fn parse_cell_key(key: &str) -> Option<Cell> {
    let (x, y) = key.split_once(';')?;
    Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
}

#[derive(Debug, Clone)]
pub struct Tilemap {
    tiles: HashMap<Cell, GridTile>,
    offgrid: Vec<OffgridTile>,
    /// Whole pixels, matching the level file.
    tile_size: u32,
    /// Cells that held a reward box at load time, sorted.
    randoms: Vec<Cell>,
}

impl Tilemap {
    pub fn new(tile_size: u32) -> Self {
        Self {
            tiles: HashMap::new(),
            offgrid: Vec::new(),
            tile_size,
            randoms: Vec::new(),
        }
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size as f32
    }

    pub fn tile(&self, cell: Cell) -> Option<&GridTile> {
        self.tiles.get(&cell)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &GridTile> {
        self.tiles.values()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn offgrid(&self) -> &[OffgridTile] {
        &self.offgrid
    }

    pub fn randoms(&self) -> &[Cell] {
        &self.randoms
    }

    /// Cell containing a world-space point.
    pub fn cell_at(&self, pos: Vec2) -> Cell {
        (
            (pos.x / self.tile_size()).floor() as i32,
            (pos.y / self.tile_size()).floor() as i32,
        )
    }

    /// World-space rectangle covering a cell.
    pub fn cell_rect(&self, cell: Cell) -> Rect {
        let ts = self.tile_size();
        Rect::new(cell.0 as f32 * ts, cell.1 as f32 * ts, ts, ts)
    }

    /// Stored grid tiles in the neighborhood of `pos`, in `NEIGHBOR_OFFSETS` order.
    pub fn tiles_around(&self, pos: Vec2) -> Vec<&GridTile> {
        let (cx, cy) = self.cell_at(pos);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|(dx, dy)| self.tiles.get(&(cx + dx, cy + dy)))
            .collect()
    }

    /// Solid rectangles near `pos`.
    pub fn physics_rects_around(&self, pos: Vec2) -> Vec<Rect> {
        self.tiles_around(pos)
            .into_iter()
            .filter(|tile| is_physics_kind(&tile.kind))
            .map(|tile| self.cell_rect(tile.cell()))
            .collect()
    }

    /// Place or overwrite the tile at `cell`.
    pub fn set_tile(&mut self, cell: Cell, kind: &str) {
        self.tiles.insert(cell, GridTile::new(kind, cell));
    }

    pub fn remove_tile(&mut self, cell: Cell) -> Option<GridTile> {
        self.tiles.remove(&cell)
    }

    /// Change the kind of an existing tile. Returns false if the cell is empty.
    pub fn set_tile_kind(&mut self, cell: Cell, kind: &str) -> bool {
        match self.tiles.get_mut(&cell) {
            Some(tile) => {
                tile.kind = kind.to_string();
                true
            }
            None => false,
        }
    }

    pub fn add_offgrid(&mut self, kind: &str, pos: Vec2) {
        self.offgrid.push(OffgridTile {
            kind: kind.to_string(),
            pos: [pos.x, pos.y],
        });
    }

    /// Remove every off-grid tile whose sprite box contains `point` (world space).
    /// Tiles with no sprite in the registry cannot be hit. Returns the number removed.
    pub fn remove_offgrid_at(&mut self, point: Vec2, sprites: &AssetRegistry) -> usize {
        let before = self.offgrid.len();
        let snapshot = self.offgrid.clone();
        self.offgrid = snapshot
            .into_iter()
            .filter(|tile| match sprites.sprite(&tile.kind) {
                Ok(sprite) => !Rect::from_pos_size(tile.position(), sprite.size).contains_point(point),
                Err(_) => true,
            })
            .collect();
        before - self.offgrid.len()
    }

    /// Fail if any drawable tile kind has no sprite.
    pub fn check_sprites(&self, sprites: &AssetRegistry) -> Result<(), AssetError> {
        let grid = self.tiles.values().map(|t| t.kind.as_str());
        let off = self.offgrid.iter().map(|t| t.kind.as_str());
        sprites.require_sprites(grid.chain(off).filter(|kind| !is_spawn_marker(kind)))
    }

    /// Parse a level, replacing nothing until the whole document validates.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let file: LevelFile = serde_json::from_str(json).map_err(LevelError::Parse)?;
        if file.tilesize == 0 {
            return Err(LevelError::Validation("tilesize must be positive".into()));
        }

        let mut tiles = HashMap::with_capacity(file.tilemap.len());
        for (key, tile) in file.tilemap {
            let cell = parse_cell_key(&key)
                .ok_or_else(|| LevelError::Validation(format!("bad tile key {:?}", key)))?;
            if cell != tile.cell() {
                return Err(LevelError::Validation(format!(
                    "tile key {:?} does not match pos {:?}",
                    key, tile.pos
                )));
            }
            tiles.insert(cell, tile);
        }

        let mut randoms: Vec<Cell> = tiles
            .values()
            .filter(|t| t.kind == REWARD_KIND)
            .map(GridTile::cell)
            .collect();
        randoms.sort_unstable();

        Ok(Self {
            tiles,
            offgrid: file.offgrid,
            tile_size: file.tilesize,
            randoms,
        })
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        let file = LevelFile {
            tilemap: self
                .tiles
                .iter()
                .map(|(cell, tile)| (cell_key(*cell), tile.clone()))
                .collect(),
            tilesize: self.tile_size,
            offgrid: self.offgrid.clone(),
        };
        serde_json::to_string(&file).map_err(LevelError::Serialize)
    }

    /// Replace this map's contents with the level stored at `path`.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        *self = Self::from_json(&json)?;
        log::info!(
            "loaded level {}: {} tiles, {} off-grid, {} reward boxes",
            path.display(),
            self.tiles.len(),
            self.offgrid.len(),
            self.randoms.len()
        );
        Ok(())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Emit instances for everything visible in the window at `offset` of size `viewport`.
    /// Off-grid tiles draw first; each solid grid tile gets a black square beneath it.
    pub fn render(&self, buf: &mut RenderBuffer, offset: Vec2, viewport: Vec2, sprites: &AssetRegistry) {
        for tile in &self.offgrid {
            if is_spawn_marker(&tile.kind) {
                continue;
            }
            if let Ok(sprite) = sprites.sprite(&tile.kind) {
                let p = tile.position() - offset;
                buf.push(RenderInstance::sprite(sprite, p.x, p.y));
            }
        }

        let ts = self.tile_size();
        let (x0, y0) = self.cell_at(offset);
        let (x1, y1) = self.cell_at(offset + viewport);
        for x in x0..=x1 {
            for y in y0..=y1 {
                let Some(tile) = self.tiles.get(&(x, y)) else {
                    continue;
                };
                if is_spawn_marker(&tile.kind) {
                    continue;
                }
                let px = x as f32 * ts - offset.x;
                let py = y as f32 * ts - offset.y;
                if is_physics_kind(&tile.kind) {
                    buf.push(RenderInstance::solid(px, py, ts, ts));
                }
                if let Ok(sprite) = sprites.sprite(&tile.kind) {
                    buf.push(RenderInstance::sprite(sprite, px, py));
                }
            }
        }
    }
}

impl Default for Tilemap {
    fn default() -> Self {
        Self::new(DEFAULT_TILE_SIZE)
    }
}
