use std::collections::BTreeMap;

use glam::Vec2;
use rand::rngs::SmallRng;

use brick_engine::{Cell, EntityId, Tilemap};

use crate::entity::{AnimationLibrary, EntityKind};
use crate::mobs::{random_direction, MobRegistry, SIZEUP_SIZE};

/// Tile kind of a box that has already paid out. Still solid.
pub const SPENT_KIND: &str = "random2";

/// The `?` blocks of a level, keyed by cell. Each pays out once.
#[derive(Debug, Default)]
pub struct RewardBoxes {
    /// cell → already activated
    boxes: BTreeMap<Cell, bool>,
}

impl RewardBoxes {
    pub fn from_tilemap(tilemap: &Tilemap) -> Self {
        Self {
            boxes: tilemap.randoms().iter().map(|cell| (*cell, false)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn is_activated(&self, cell: Cell) -> bool {
        self.boxes.get(&cell).copied().unwrap_or(false)
    }

    /// Hit the box at `cell` from below. The first hit stages a power-up above
    /// the box and marks the tile spent; later hits and non-box cells do nothing.
    pub fn activate(
        &mut self,
        cell: Cell,
        tilemap: &mut Tilemap,
        harmless: &mut MobRegistry,
        library: &AnimationLibrary,
        rng: &mut SmallRng,
    ) -> Option<EntityId> {
        let activated = self.boxes.get_mut(&cell)?;
        if *activated {
            return None;
        }
        *activated = true;

        let ts = tilemap.tile_size();
        let pos = Vec2::new(cell.0 as f32 * ts, cell.1 as f32 * ts);
        let id = harmless.spawn(EntityKind::Sizeup, pos, SIZEUP_SIZE, random_direction(rng), library);
        if !tilemap.set_tile_kind(cell, SPENT_KIND) {
            log::warn!("reward box at {:?} has no tile", cell);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tests::test_library;
    use rand::SeedableRng;

    #[test]
    fn activation_is_one_shot() {
        let library = test_library();
        let mut map = Tilemap::default();
        map.set_tile((2, 3), "random");
        let map_json = map.to_json().unwrap();
        let mut map = Tilemap::from_json(&map_json).unwrap();

        let mut boxes = RewardBoxes::from_tilemap(&map);
        let mut harmless = MobRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);
        assert_eq!(boxes.len(), 1);

        let first = boxes.activate((2, 3), &mut map, &mut harmless, &library, &mut rng);
        assert!(first.is_some());
        assert!(boxes.is_activated((2, 3)));
        assert_eq!(map.tile((2, 3)).unwrap().kind, SPENT_KIND);

        let second = boxes.activate((2, 3), &mut map, &mut harmless, &library, &mut rng);
        assert!(second.is_none());
        assert_eq!(harmless.pending_len(), 1);

        harmless.commit();
        let sizeup = harmless.iter().next().unwrap();
        assert_eq!(sizeup.kind(), EntityKind::Sizeup);
        assert_eq!(sizeup.body.pos, Vec2::new(32.0, 48.0));
        assert!(sizeup.direction == 1 || sizeup.direction == -1);
    }

    #[test]
    fn plain_bricks_pay_nothing() {
        let library = test_library();
        let mut map = Tilemap::default();
        map.set_tile((0, 0), "brick");
        let mut boxes = RewardBoxes::from_tilemap(&map);
        let mut harmless = MobRegistry::new();
        let mut rng = SmallRng::seed_from_u64(1);

        assert!(boxes.is_empty());
        assert!(boxes.activate((0, 0), &mut map, &mut harmless, &library, &mut rng).is_none());
        assert_eq!(map.tile((0, 0)).unwrap().kind, "brick");
    }
}
