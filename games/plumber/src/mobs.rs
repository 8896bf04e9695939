//! Enemies and power-ups, and the registries that own them.
//!
//! Removals during a pass only mark the mob dead; spawns are staged. Both take
//! effect in [`MobRegistry::commit`], after every registry has been updated.

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use brick_engine::{EngineContext, EntityId, RenderBuffer, Tilemap};

use crate::entity::{step, AnimationLibrary, Body, Contact, EntityKind, NoContact};
use crate::events::SOUND_KICK;
use crate::player::{Player, PlayerState, SizeState};

pub const GOOMBA_SIZE: Vec2 = Vec2::new(14.0, 14.0);
pub const KOOPA_SIZE: Vec2 = Vec2::new(14.0, 20.0);
pub const SHELL_SIZE: Vec2 = Vec2::new(10.0, 10.0);
pub const SIZEUP_SIZE: Vec2 = Vec2::new(14.0, 14.0);

const WALK_SPEED: f32 = 0.3;
const SHELL_SPEED: f32 = 3.0;
const SIZEUP_SPEED: f32 = 0.5;
const SIZEUP_RISE_VELOCITY: f32 = -0.4;
const HOP_VELOCITY: f32 = -1.2;
/// A walker hops on average once every 201 frames.
const HOP_CHANCE: (u32, u32) = (1, 201);
/// Where a shell drops relative to the koopa it came from.
const SHELL_DROP: Vec2 = Vec2::new(0.0, 5.0);

/// -1 or 1 with equal odds.
pub fn random_direction(rng: &mut SmallRng) -> i32 {
    if rng.gen_bool(0.5) {
        1
    } else {
        -1
    }
}

#[derive(Debug, Clone)]
pub struct Mob {
    id: EntityId,
    pub body: Body,
    /// -1 left, 1 right, 0 still (a resting shell).
    pub direction: i32,
    /// Spawn position; a power-up rises one tile from here before it starts to walk.
    start: Vec2,
    dead: bool,
}

impl Mob {
    fn new(
        id: EntityId,
        kind: EntityKind,
        pos: Vec2,
        size: Vec2,
        direction: i32,
        library: &AnimationLibrary,
    ) -> Self {
        let mut body = Body::new(kind, pos, size, library);
        if kind == EntityKind::Sizeup {
            body.velocity.y = SIZEUP_RISE_VELOCITY;
            body.can_collide = false;
        }
        Self {
            id,
            body,
            direction,
            start: pos,
            dead: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn kind(&self) -> EntityKind {
        self.body.kind
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_moving(&self) -> bool {
        self.direction != 0
    }

    fn bounce_off_walls(&mut self) {
        if self.body.collisions.right {
            self.direction = -1;
        }
        if self.body.collisions.left {
            self.direction = 1;
        }
    }

    /// Per-kind behavior after the body has stepped.
    fn think(&mut self, rng: &mut SmallRng, tile_size: f32) {
        match self.body.kind {
            EntityKind::Goomba | EntityKind::Koopa => {
                self.body.velocity.x = self.direction as f32 * WALK_SPEED;
                self.bounce_off_walls();
                if self.body.kind == EntityKind::Koopa && (self.body.collisions.left || self.body.collisions.right) {
                    self.body.flip = self.direction < 0;
                }
                if rng.gen_ratio(HOP_CHANCE.0, HOP_CHANCE.1) {
                    self.body.velocity.y = HOP_VELOCITY;
                }
            }
            EntityKind::Shell => {
                if self.direction == 0 {
                    self.body.velocity.x = 0.0;
                    return;
                }
                self.body.velocity.x = self.direction as f32 * SHELL_SPEED;
                self.bounce_off_walls();
            }
            EntityKind::Sizeup => {
                if !self.body.can_collide && self.body.pos.y > self.start.y - tile_size {
                    return;
                }
                self.body.can_collide = true;
                self.body.velocity.x = self.direction as f32 * SIZEUP_SPEED;
                self.bounce_off_walls();
            }
            EntityKind::Player => {}
        }
    }
}

/// Outcome of a harmful mob touching the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    /// Goomba flattened.
    Squash,
    /// Koopa knocked out of its shell.
    Unshell,
    /// Shell halted.
    Stop,
    /// Resting shell sent sliding.
    Kick(i32),
    /// Moving shell ran under the player: the player hops, the shell slides on.
    Bounce,
    /// Player takes damage.
    Hurt,
}

fn stomp_hit(kind: EntityKind) -> Hit {
    match kind {
        EntityKind::Koopa => Hit::Unshell,
        EntityKind::Shell => Hit::Stop,
        _ => Hit::Squash,
    }
}

fn side_hit(kind: EntityKind, moving: bool, player_flip: bool) -> Hit {
    match kind {
        EntityKind::Shell if !moving => Hit::Kick(if player_flip { -1 } else { 1 }),
        _ => Hit::Hurt,
    }
}

/// Spawns waiting for the next commit, and the ID counter.
#[derive(Debug, Default)]
struct Staging {
    pending: Vec<Mob>,
    next_id: u32,
}

impl Staging {
    fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        size: Vec2,
        direction: i32,
        library: &AnimationLibrary,
    ) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        log::debug!("spawn {:?} #{} at ({:.1}, {:.1})", kind, id.0, pos.x, pos.y);
        self.pending.push(Mob::new(id, kind, pos, size, direction, library));
        id
    }
}

/// Apply a hit to `mob` and to the player.
fn resolve(
    hit: Hit,
    mob: &mut Mob,
    staging: &mut Staging,
    library: &AnimationLibrary,
    state: &mut PlayerState,
    player: &mut Body,
    ctx: &mut EngineContext,
) {
    match hit {
        Hit::Squash => {
            state.bounce(player);
            mob.dead = true;
            ctx.emit_sound(SOUND_KICK);
        }
        Hit::Unshell => {
            state.bounce(player);
            staging.spawn(EntityKind::Shell, mob.body.pos + SHELL_DROP, SHELL_SIZE, 0, library);
            mob.dead = true;
            ctx.emit_sound(SOUND_KICK);
        }
        Hit::Stop => {
            state.bounce(player);
            mob.direction = 0;
            mob.body.velocity.x = 0.0;
        }
        Hit::Kick(direction) => mob.direction = direction,
        Hit::Bounce => state.bounce(player),
        Hit::Hurt => state.damage(player),
    }
}

/// A harmful mob's view of the player while the mob steps.
///
/// Stopping and kicking a shell are the player's moves; they only happen in
/// [`MobContact`]. A resting shell never reaches for the player.
struct PlayerContact<'a> {
    player: &'a Player,
    moving: bool,
    hit: Option<Hit>,
}

impl PlayerContact<'_> {
    fn touches(&self, body: &Body) -> bool {
        if body.kind == EntityKind::Shell && !self.moving {
            return false;
        }
        !self.player.state.is_recovering() && body.rect().collides(&self.player.body.rect())
    }
}

impl Contact for PlayerContact<'_> {
    fn vertical(&mut self, body: &mut Body) -> bool {
        if !self.touches(body) {
            return false;
        }
        self.hit = Some(match body.kind {
            EntityKind::Shell => Hit::Bounce,
            kind => stomp_hit(kind),
        });
        true
    }

    fn horizontal(&mut self, body: &mut Body) {
        if self.touches(body) {
            self.hit = Some(Hit::Hurt);
        }
    }
}

/// The player's view of the harmful mobs while the player steps.
pub struct MobContact<'a> {
    pub mobs: &'a mut MobRegistry,
    pub state: &'a mut PlayerState,
    pub library: &'a AnimationLibrary,
    pub ctx: &'a mut EngineContext,
}

impl Contact for MobContact<'_> {
    fn vertical(&mut self, body: &mut Body) -> bool {
        self.mobs.stomp_overlapping(body, self.state, self.library, self.ctx)
    }

    fn horizontal(&mut self, body: &mut Body) {
        self.mobs.side_hit_first(body, self.state, self.library, self.ctx);
    }
}

/// Owns one group of mobs (harmful or harmless) for a session.
#[derive(Debug, Default)]
pub struct MobRegistry {
    live: Vec<Mob>,
    staging: Staging,
}

impl MobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a new mob. It joins the registry at the next [`commit`](Self::commit).
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        pos: Vec2,
        size: Vec2,
        direction: i32,
        library: &AnimationLibrary,
    ) -> EntityId {
        self.staging.spawn(kind, pos, size, direction, library)
    }

    /// Mark a mob dead. It stays in place until the next commit.
    #[cfg(test)]
    pub fn remove(&mut self, id: EntityId) -> bool {
        match self.live.iter_mut().find(|m| m.id == id && !m.dead) {
            Some(mob) => {
                mob.dead = true;
                true
            }
            None => false,
        }
    }

    /// Drop dead mobs and admit staged ones.
    pub fn commit(&mut self) {
        self.live.retain(|m| !m.dead);
        self.live.append(&mut self.staging.pending);
    }

    pub fn get(&self, id: EntityId) -> Option<&Mob> {
        self.live.iter().find(|m| m.id == id && !m.dead)
    }

    #[cfg(test)]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Mob> {
        self.live.iter_mut().find(|m| m.id == id && !m.dead)
    }

    /// Live mobs, in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Mob> {
        self.live.iter().filter(|m| !m.dead)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_len(&self) -> usize {
        self.staging.pending.len()
    }

    /// Step every harmful mob, resolving contact with the player.
    pub fn update_harmful(
        &mut self,
        tilemap: &Tilemap,
        player: &mut Player,
        library: &AnimationLibrary,
        ctx: &mut EngineContext,
        rng: &mut SmallRng,
    ) {
        let Self { live, staging } = self;
        for mob in live.iter_mut().filter(|m| !m.dead) {
            let mut contact = PlayerContact {
                player: &*player,
                moving: mob.is_moving(),
                hit: None,
            };
            step(&mut mob.body, tilemap, Vec2::ZERO, &mut contact);
            let hit = contact.hit;
            if let Some(hit) = hit {
                resolve(hit, mob, staging, library, &mut player.state, &mut player.body, ctx);
            }
            if !mob.dead {
                mob.think(rng, tilemap.tile_size());
            }
        }
    }

    /// Step every power-up. Touching the player collects it.
    pub fn update_harmless(
        &mut self,
        tilemap: &Tilemap,
        player: &mut Player,
        ctx: &mut EngineContext,
        rng: &mut SmallRng,
    ) {
        for mob in self.live.iter_mut().filter(|m| !m.dead) {
            step(&mut mob.body, tilemap, Vec2::ZERO, &mut NoContact);
            mob.think(rng, tilemap.tile_size());
            if mob.body.rect().collides(&player.body.rect()) {
                mob.dead = true;
                if player.state.size == SizeState::Small {
                    player.size_up(ctx);
                }
            }
        }
    }

    /// Stomp every live mob the player overlaps. Returns whether any was hit.
    fn stomp_overlapping(
        &mut self,
        body: &mut Body,
        state: &mut PlayerState,
        library: &AnimationLibrary,
        ctx: &mut EngineContext,
    ) -> bool {
        if state.is_recovering() {
            return false;
        }
        let Self { live, staging } = self;
        let mut fired = false;
        for mob in live.iter_mut().filter(|m| !m.dead) {
            if body.rect().collides(&mob.body.rect()) {
                resolve(stomp_hit(mob.kind()), mob, staging, library, state, body, ctx);
                fired = true;
            }
        }
        fired
    }

    /// Side contact with the first live mob the player overlaps.
    fn side_hit_first(
        &mut self,
        body: &mut Body,
        state: &mut PlayerState,
        library: &AnimationLibrary,
        ctx: &mut EngineContext,
    ) {
        if state.is_recovering() {
            return;
        }
        let Self { live, staging } = self;
        let player_rect = body.rect();
        if let Some(mob) = live
            .iter_mut()
            .find(|m| !m.dead && player_rect.collides(&m.body.rect()))
        {
            let hit = side_hit(mob.kind(), mob.is_moving(), body.flip);
            resolve(hit, mob, staging, library, state, body, ctx);
        }
    }

    pub fn render(&self, buf: &mut RenderBuffer, offset: Vec2) {
        for mob in self.iter() {
            mob.body.render(buf, offset);
        }
    }
}
