use glam::Vec2;

use brick_engine::{EngineContext, RenderBuffer, Tilemap};

use crate::entity::{step, AnimationLibrary, Body, EntityKind, StepReport};
use crate::events::{SOUND_JUMP, SOUND_POWERUP};
use crate::mobs::{MobContact, MobRegistry};

pub const PLAYER_SPAWN: Vec2 = Vec2::new(50.0, 50.0);
/// The 16×16 idle frame scaled to 0.8 × 0.9.
pub const PLAYER_SIZE: Vec2 = Vec2::new(16.0 * 0.8, 16.0 * 0.9);

const JUMP_VELOCITY: f32 = -3.0;
/// A second jump is allowed in mid-air.
const MAX_JUMP_INDEX: u32 = 1;
const BOUNCE_VELOCITY: f32 = -2.0;
/// Invulnerability after a stomp.
const STOMP_RECOVERY: u32 = 9;
/// Invulnerability after taking a hit.
const HIT_RECOVERY: u32 = 100;
/// Frames off the ground before the jump animation plays.
const JUMP_ANIM_AIR_TIME: u32 = 4;
/// The player blinks while more recovery than this is left.
const BLINK_THRESHOLD: u32 = 9;
const BLINK_HIDDEN: u32 = 10;
const BLINK_PERIOD: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeState {
    Small,
    Big,
}

/// Everything about the player that is not its body.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub size: SizeState,
    /// Frames of invulnerability left.
    pub recovering: u32,
    pub jump_count: u32,
    pub air_time: u32,
    blink: u32,
    defeated: bool,
}

impl PlayerState {
    fn new() -> Self {
        Self {
            size: SizeState::Small,
            recovering: 0,
            jump_count: 0,
            air_time: 0,
            blink: 0,
            defeated: false,
        }
    }

    pub fn is_recovering(&self) -> bool {
        self.recovering != 0
    }

    /// Hop off an enemy that was just stomped.
    pub fn bounce(&mut self, body: &mut Body) {
        body.velocity.y = BOUNCE_VELOCITY;
        self.recovering = STOMP_RECOVERY;
    }

    pub fn size_up(&mut self, body: &mut Body, ctx: &mut EngineContext) {
        ctx.emit_sound(SOUND_POWERUP);
        if self.size == SizeState::Small {
            self.size = SizeState::Big;
            body.size.y *= 2.0;
        }
    }

    /// Shrink, or lose when already small.
    fn size_down(&mut self, body: &mut Body) {
        match self.size {
            SizeState::Big => {
                self.size = SizeState::Small;
                body.size.y *= 0.5;
            }
            SizeState::Small => {
                if !self.defeated {
                    log::info!("player defeated at ({:.1}, {:.1})", body.pos.x, body.pos.y);
                }
                self.defeated = true;
            }
        }
    }

    pub fn damage(&mut self, body: &mut Body) {
        self.size_down(body);
        self.recovering = HIT_RECOVERY;
    }

    fn action(&self, base: &str) -> &'static str {
        match (self.size, base) {
            (SizeState::Small, "run") => "small/run",
            (SizeState::Small, "jump") => "small/jump",
            (SizeState::Small, _) => "small/idle",
            (SizeState::Big, "run") => "big/run",
            (SizeState::Big, "jump") => "big/jump",
            (SizeState::Big, _) => "big/idle",
        }
    }
}

pub struct Player {
    pub body: Body,
    pub state: PlayerState,
}

impl Player {
    pub fn new(library: &AnimationLibrary) -> Self {
        Self::at(PLAYER_SPAWN, library)
    }

    pub fn at(pos: Vec2, library: &AnimationLibrary) -> Self {
        Self {
            body: Body::new(EntityKind::Player, pos, PLAYER_SIZE, library),
            state: PlayerState::new(),
        }
    }

    /// Start a jump if one is left. Returns whether it happened.
    pub fn jump(&mut self, ctx: &mut EngineContext) -> bool {
        if self.state.jump_count > MAX_JUMP_INDEX {
            return false;
        }
        self.body.velocity.y = JUMP_VELOCITY;
        self.state.jump_count += 1;
        ctx.emit_sound(SOUND_JUMP);
        true
    }

    /// Step against the tiles and the harmful mobs, then pick the animation.
    pub fn update(
        &mut self,
        tilemap: &Tilemap,
        movement: Vec2,
        harmful: &mut MobRegistry,
        library: &AnimationLibrary,
        ctx: &mut EngineContext,
    ) -> StepReport {
        let mut contact = MobContact {
            mobs: harmful,
            state: &mut self.state,
            library,
            ctx,
        };
        let report = step(&mut self.body, tilemap, movement, &mut contact);

        let state = &mut self.state;
        if report.collisions.down {
            state.jump_count = 0;
        }
        if state.recovering != 0 {
            state.recovering -= 1;
        }
        state.air_time += 1;
        if report.collisions.down {
            state.air_time = 0;
            let base = if movement.x != 0.0 { "run" } else { "idle" };
            self.body.set_action(state.action(base));
        }
        if state.air_time > JUMP_ANIM_AIR_TIME {
            self.body.set_action(state.action("jump"));
        }
        if state.recovering > BLINK_THRESHOLD {
            state.blink = (state.blink + 1) % BLINK_PERIOD;
        }
        report
    }

    pub fn size_up(&mut self, ctx: &mut EngineContext) {
        self.state.size_up(&mut self.body, ctx);
    }

    #[cfg(test)]
    pub fn damage(&mut self) {
        self.state.damage(&mut self.body);
    }

    pub fn is_defeated(&self) -> bool {
        self.state.defeated
    }

    /// False during the hidden half of the post-hit blink.
    pub fn is_visible(&self) -> bool {
        self.state.recovering <= BLINK_THRESHOLD || self.state.blink >= BLINK_HIDDEN
    }

    pub fn render(&self, buf: &mut RenderBuffer, offset: Vec2) {
        if self.is_visible() {
            self.body.render(buf, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::tests::test_library;

    fn ground_map() -> Tilemap {
        let mut map = Tilemap::default();
        for x in 0..20 {
            map.set_tile((x, 6), "ground");
        }
        map
    }

    /// Player standing on the ground row (top at y = 96).
    fn grounded(library: &AnimationLibrary) -> Player {
        let mut player = Player::at(Vec2::new(40.0, 96.0 - PLAYER_SIZE.y), library);
        player.body.velocity.y = 0.5;
        player
    }

    #[test]
    fn third_jump_is_refused() {
        let library = test_library();
        let mut player = Player::new(&library);
        let mut ctx = EngineContext::new();

        assert!(player.jump(&mut ctx));
        assert!(player.jump(&mut ctx));
        assert!(!player.jump(&mut ctx));
        assert_eq!(player.state.jump_count, 2);
        assert_eq!(player.body.velocity.y, JUMP_VELOCITY);
        assert_eq!(ctx.sounds, vec![SOUND_JUMP, SOUND_JUMP]);
    }

    #[test]
    fn landing_resets_jumps_and_picks_ground_action() {
        let library = test_library();
        let map = ground_map();
        let mut mobs = MobRegistry::new();
        let mut ctx = EngineContext::new();
        let mut player = grounded(&library);
        player.state.jump_count = 2;
        player.state.air_time = 30;

        let report = player.update(&map, Vec2::new(1.0, 0.0), &mut mobs, &library, &mut ctx);
        assert!(report.collisions.down);
        assert_eq!(player.state.jump_count, 0);
        assert_eq!(player.state.air_time, 0);
        assert_eq!(player.body.action(), "small/run");

        player.body.velocity.y = 0.5;
        player.update(&map, Vec2::ZERO, &mut mobs, &library, &mut ctx);
        assert_eq!(player.body.action(), "small/idle");
    }

    #[test]
    fn jump_animation_after_four_airborne_frames() {
        let library = test_library();
        let map = Tilemap::default();
        let mut mobs = MobRegistry::new();
        let mut ctx = EngineContext::new();
        let mut player = Player::new(&library);

        for _ in 0..4 {
            player.update(&map, Vec2::ZERO, &mut mobs, &library, &mut ctx);
        }
        assert_eq!(player.body.action(), "small/idle");
        player.update(&map, Vec2::ZERO, &mut mobs, &library, &mut ctx);
        assert_eq!(player.body.action(), "small/jump");
    }

    #[test]
    fn size_up_doubles_height_once() {
        let library = test_library();
        let mut player = Player::new(&library);
        let mut ctx = EngineContext::new();

        player.size_up(&mut ctx);
        assert_eq!(player.state.size, SizeState::Big);
        assert_eq!(player.body.size.y, PLAYER_SIZE.y * 2.0);
        player.size_up(&mut ctx);
        assert_eq!(player.body.size.y, PLAYER_SIZE.y * 2.0);
        assert_eq!(ctx.sounds, vec![SOUND_POWERUP, SOUND_POWERUP]);
    }

    #[test]
    fn damage_shrinks_then_defeats() {
        let library = test_library();
        let mut player = Player::new(&library);
        let mut ctx = EngineContext::new();
        player.size_up(&mut ctx);

        player.damage();
        assert_eq!(player.state.size, SizeState::Small);
        assert_eq!(player.body.size.y, PLAYER_SIZE.y);
        assert_eq!(player.state.recovering, HIT_RECOVERY);
        assert!(!player.is_defeated());

        player.damage();
        assert!(player.is_defeated());
    }

    #[test]
    fn recovery_counts_down_and_blinks() {
        let library = test_library();
        let map = Tilemap::default();
        let mut mobs = MobRegistry::new();
        let mut ctx = EngineContext::new();
        let mut player = Player::new(&library);
        player.size_up(&mut ctx);
        player.damage();

        let mut visibility = Vec::new();
        for _ in 0..40 {
            player.update(&map, Vec2::ZERO, &mut mobs, &library, &mut ctx);
            visibility.push(player.is_visible());
        }
        assert_eq!(player.state.recovering, HIT_RECOVERY - 40);
        assert!(visibility[..9].iter().all(|v| !v));
        assert!(visibility[9..19].iter().all(|v| *v));
        assert!(!visibility[19]);

        player.state.recovering = 3;
        assert!(player.is_visible());
    }

    #[test]
    fn stomp_recovery_does_not_blink() {
        let library = test_library();
        let mut player = Player::new(&library);
        player.state.bounce(&mut player.body);
        assert_eq!(player.state.recovering, STOMP_RECOVERY);
        assert!(player.is_visible());

        player.state.recovering = BLINK_THRESHOLD + 1;
        assert!(!player.is_visible());
    }

    #[test]
    fn hidden_player_renders_nothing() {
        let library = test_library();
        let mut player = Player::new(&library);
        player.state.recovering = 50;
        let mut buf = RenderBuffer::new();
        player.render(&mut buf, Vec2::ZERO);
        assert_eq!(buf.instance_count(), 0);

        player.state.recovering = 0;
        player.render(&mut buf, Vec2::ZERO);
        assert_eq!(buf.instance_count(), 1);
    }
}
