use glam::Vec2;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use brick_engine::input::queue::keys;
use brick_engine::*;

use crate::clouds::{Clouds, CLOUD_COUNT};
use crate::entity::{AnimationLibrary, EntityKind};
use crate::error::LaunchError;
use crate::events::*;
use crate::level::{map_json, parse_selection};
use crate::mobs::{random_direction, MobRegistry, GOOMBA_SIZE, KOOPA_SIZE};
use crate::player::Player;
use crate::rewards::RewardBoxes;
use crate::ASSET_MANIFEST as MANIFEST;

const WORLD_WIDTH: f32 = 320.0;
const WORLD_HEIGHT: f32 = 240.0;
const CAMERA_LAG: f32 = 30.0;
const SEED: u64 = 0x6272_6963;

/// Falling below this line loses the level.
const FALL_LIMIT: f32 = 30.0 * 16.0;
/// The end screen stays up for three seconds.
const END_SCREEN_FRAMES: u32 = 180;
const END_ICON_POS: Vec2 = Vec2::new(130.0, 10.0);

const BACKGROUND: &str = "background";
const VICTORY_ICON: &str = "sizeup/small/idle";
const DEFEAT_ICON: &str = "koopa";
const CLOUD_SPRITES: [&str; 3] = ["cloud1", "cloud2", "cloud3"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GamePhase {
    Playing,
    EndScreen { outcome: Outcome, frames_left: u32 },
}

/// Arrow keys currently held.
#[derive(Debug, Clone, Copy, Default)]
struct Movement {
    left: bool,
    right: bool,
}

impl Movement {
    fn vector(self) -> Vec2 {
        Vec2::new(self.right as i32 as f32 - self.left as i32 as f32, 0.0)
    }
}

pub struct PlumberGame {
    level: u8,
    tilemap: Tilemap,
    sprites: AssetRegistry,
    library: AnimationLibrary,
    player: Player,
    harmful: MobRegistry,
    harmless: MobRegistry,
    rewards: RewardBoxes,
    clouds: Clouds,
    camera: Camera2D,
    castle_x: Option<f32>,
    movement: Movement,
    phase: GamePhase,
    rng: SmallRng,
}

impl PlumberGame {
    /// Start the built-in level the player typed (`"1"` to `"3"`).
    pub fn select(selection: &str) -> Result<Self, LaunchError> {
        let level = parse_selection(selection)?;
        Self::with_level(level, map_json(level)?, MANIFEST, SEED + level as u64)
    }

    /// Build a session from raw level and manifest JSON. Every asset key the
    /// session can draw is resolved here, so a bad manifest fails before the first frame.
    pub fn with_level(level: u8, map: &str, manifest: &str, seed: u64) -> Result<Self, LaunchError> {
        let tilemap = Tilemap::from_json(map)?;
        let sprites = AssetRegistry::from_json(manifest)?;
        tilemap.check_sprites(&sprites)?;
        sprites.require_sprites([BACKGROUND, VICTORY_ICON, DEFEAT_ICON])?;
        sprites.require_sprites(CLOUD_SPRITES)?;
        let library = AnimationLibrary::from_registry(&sprites)?;

        let mut rng = SmallRng::seed_from_u64(seed);
        let clouds = Clouds::new(&CLOUD_SPRITES, CLOUD_COUNT, &mut rng);
        let player = Player::new(&library);

        Ok(Self {
            level,
            rewards: RewardBoxes::from_tilemap(&tilemap),
            tilemap,
            sprites,
            library,
            player,
            harmful: MobRegistry::new(),
            harmless: MobRegistry::new(),
            clouds,
            camera: Camera2D::new(WORLD_WIDTH, WORLD_HEIGHT).with_lag(CAMERA_LAG),
            castle_x: None,
            movement: Movement::default(),
            phase: GamePhase::Playing,
            rng,
        })
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            GamePhase::Playing => None,
            GamePhase::EndScreen { outcome, .. } => Some(outcome),
        }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn harmful(&self) -> &MobRegistry {
        &self.harmful
    }

    pub fn harmless(&self) -> &MobRegistry {
        &self.harmless
    }

    /// Spawn enemies on their marker tiles and find the castle.
    fn populate(&mut self) {
        let ts = self.tilemap.tile_size();
        let mut markers: Vec<(EntityKind, Vec2)> = Vec::new();
        for tile in self.tilemap.tiles() {
            let (x, y) = tile.cell();
            let pos = Vec2::new(x as f32 * ts, y as f32 * ts);
            match tile.kind.as_str() {
                "goomba" => markers.push((EntityKind::Goomba, pos)),
                "koopa" => markers.push((EntityKind::Koopa, pos)),
                "castle" => self.castle_x = Some(pos.x),
                _ => {}
            }
        }
        // Tile iteration order is unspecified; spawn in cell order for stable IDs.
        markers.sort_by(|a, b| a.1.x.total_cmp(&b.1.x).then(a.1.y.total_cmp(&b.1.y)));
        for (kind, pos) in markers {
            let size = if kind == EntityKind::Koopa { KOOPA_SIZE } else { GOOMBA_SIZE };
            let direction = random_direction(&mut self.rng);
            self.harmful.spawn(kind, pos, size, direction, &self.library);
        }
        self.harmful.commit();
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::KeyDown { key_code } => match key_code {
                    keys::LEFT => self.movement.left = true,
                    keys::RIGHT => self.movement.right = true,
                    keys::UP | keys::SPACE => {
                        self.player.jump(ctx);
                    }
                    _ => {}
                },
                InputEvent::KeyUp { key_code } => match key_code {
                    keys::LEFT => self.movement.left = false,
                    keys::RIGHT => self.movement.right = false,
                    _ => {}
                },
                _ => {}
            }
        }
    }

    fn check_outcome(&self) -> Option<Outcome> {
        if self.player.body.pos.y > FALL_LIMIT || self.player.is_defeated() {
            return Some(Outcome::Defeat);
        }
        match self.castle_x {
            Some(x) if self.player.body.pos.x > x => Some(Outcome::Victory),
            _ => None,
        }
    }

    fn finish(&mut self, outcome: Outcome, ctx: &mut EngineContext) {
        log::info!("level {} over: {:?} at frame {}", self.level, outcome, ctx.frame());
        match outcome {
            Outcome::Victory => ctx.emit_event(GameEvent::new(EVENT_VICTORY, self.level as f32)),
            Outcome::Defeat => {
                ctx.emit_event(GameEvent::new(EVENT_MUSIC_STOP, 0.0));
                ctx.emit_sound(SOUND_GAME_OVER);
                ctx.emit_event(GameEvent::new(EVENT_DEFEAT, self.level as f32));
            }
        }
        self.phase = GamePhase::EndScreen {
            outcome,
            frames_left: END_SCREEN_FRAMES,
        };
    }

    fn render_end_screen(&self, buf: &mut RenderBuffer, outcome: Outcome) {
        if let Ok(bg) = self.sprites.sprite(BACKGROUND) {
            buf.push(RenderInstance::sprite(bg, 0.0, 0.0));
        }
        let icon = match outcome {
            Outcome::Victory => VICTORY_ICON,
            Outcome::Defeat => DEFEAT_ICON,
        };
        if let Ok(sprite) = self.sprites.sprite(icon) {
            buf.push(RenderInstance::sprite(sprite, END_ICON_POS.x, END_ICON_POS.y));
        }
    }
}

impl Game for PlumberGame {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            max_instances: 2048,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.populate();
        log::info!(
            "level {}: {} enemies, {} reward boxes, castle at {:?}",
            self.level,
            self.harmful.len(),
            self.rewards.len(),
            self.castle_x
        );
        ctx.emit_event(GameEvent::new(EVENT_MUSIC, self.level as f32));
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        if let GamePhase::EndScreen { outcome, frames_left } = self.phase {
            let frames_left = frames_left.saturating_sub(1);
            self.phase = GamePhase::EndScreen { outcome, frames_left };
            if frames_left == 0 {
                ctx.emit_event(GameEvent::new(EVENT_HALT, 0.0));
                ctx.halt();
            }
            return;
        }

        self.handle_input(ctx, input);
        self.clouds.update();

        self.harmless
            .update_harmless(&self.tilemap, &mut self.player, ctx, &mut self.rng);
        self.harmful
            .update_harmful(&self.tilemap, &mut self.player, &self.library, ctx, &mut self.rng);
        let report = self.player.update(
            &self.tilemap,
            self.movement.vector(),
            &mut self.harmful,
            &self.library,
            ctx,
        );
        for cell in report.struck {
            if let Some(id) = self.rewards.activate(
                cell,
                &mut self.tilemap,
                &mut self.harmless,
                &self.library,
                &mut self.rng,
            ) {
                log::debug!("reward box {:?} released {:?}", cell, id);
            }
        }

        self.harmful.commit();
        self.harmless.commit();

        if let Some(outcome) = self.check_outcome() {
            self.finish(outcome, ctx);
            return;
        }

        self.camera.follow(self.player.body.rect().center());
    }

    fn render(&self, ctx: &mut RenderContext) {
        let buf = &mut *ctx.render_buffer;
        if let GamePhase::EndScreen { outcome, .. } = self.phase {
            self.render_end_screen(buf, outcome);
            return;
        }

        let offset = self.camera.offset();
        let viewport = self.camera.viewport();
        if let Ok(bg) = self.sprites.sprite(BACKGROUND) {
            buf.push(RenderInstance::sprite(bg, 0.0, 0.0));
        }
        self.clouds.render(buf, offset, viewport, &self.sprites);
        self.tilemap.render(buf, offset, viewport, &self.sprites);
        self.player.render(buf, offset);
        self.harmful.render(buf, offset);
        self.harmless.render(buf, offset);
    }
}
