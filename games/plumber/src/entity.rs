//! Shared body model for everything that moves: the player, enemies and power-ups.
//!
//! Movement is resolved one axis at a time against the solid tiles near the body.
//! Per-kind reactions to touching another entity plug in through [`Contact`].

use glam::Vec2;

use brick_engine::assets::registry::AssetRegistry;
use brick_engine::{Animation, AssetError, Cell, Rect, RenderBuffer, RenderInstance, Tilemap};

/// Sprite is drawn this far up-left of the collision box.
pub const ANIM_OFFSET: Vec2 = Vec2::new(-3.0, -3.0);

const GRAVITY: f32 = 0.1;
const TERMINAL_VELOCITY: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Player,
    Goomba,
    Koopa,
    Shell,
    Sizeup,
}

impl EntityKind {
    /// Prefix of this kind's animation keys (`"goomba/run"`).
    pub fn key(self) -> &'static str {
        match self {
            EntityKind::Player => "player",
            EntityKind::Goomba => "goomba",
            EntityKind::Koopa => "koopa",
            EntityKind::Shell => "shell",
            EntityKind::Sizeup => "sizeup",
        }
    }

    /// Every action this kind can play.
    pub fn actions(self) -> &'static [&'static str] {
        match self {
            EntityKind::Player => &[
                "small/idle",
                "small/run",
                "small/jump",
                "big/idle",
                "big/run",
                "big/jump",
            ],
            EntityKind::Goomba | EntityKind::Koopa => &["run"],
            EntityKind::Shell => &["shell"],
            EntityKind::Sizeup => &["small/idle"],
        }
    }

    /// Enemies that hurt the player on contact.
    pub fn is_harmful(self) -> bool {
        matches!(self, EntityKind::Goomba | EntityKind::Koopa | EntityKind::Shell)
    }
}

/// Which sides hit a solid tile during the last step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Collisions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Result of one [`step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub collisions: Collisions,
    /// Solid cells the body hit from below, in contact order.
    pub struck: Vec<Cell>,
}

/// Animations for one entity kind, resolved from the asset registry.
#[derive(Debug, Clone)]
pub struct AnimationSet {
    entries: Vec<(&'static str, Animation)>,
}

impl AnimationSet {
    /// Look up `"<kind>/<action>"` for every action of `kind`.
    pub fn resolve(registry: &AssetRegistry, kind: EntityKind) -> Result<Self, AssetError> {
        let entries = kind
            .actions()
            .iter()
            .map(|action| {
                let anim = registry.animation(&format!("{}/{}", kind.key(), action))?;
                Ok((*action, anim))
            })
            .collect::<Result<Vec<_>, AssetError>>()?;
        Ok(Self { entries })
    }

    /// The kind's first action with a fresh cursor.
    pub fn start(&self) -> (&'static str, Animation) {
        let (name, anim) = &self.entries[0];
        (*name, anim.copy())
    }

    /// A fresh cursor for `action`.
    pub fn get(&self, action: &str) -> Option<Animation> {
        self.entries
            .iter()
            .find(|(name, _)| *name == action)
            .map(|(_, anim)| anim.copy())
    }
}

/// Animation sets for every kind, built once per session.
#[derive(Debug, Clone)]
pub struct AnimationLibrary {
    player: AnimationSet,
    goomba: AnimationSet,
    koopa: AnimationSet,
    shell: AnimationSet,
    sizeup: AnimationSet,
}

impl AnimationLibrary {
    pub fn from_registry(registry: &AssetRegistry) -> Result<Self, AssetError> {
        Ok(Self {
            player: AnimationSet::resolve(registry, EntityKind::Player)?,
            goomba: AnimationSet::resolve(registry, EntityKind::Goomba)?,
            koopa: AnimationSet::resolve(registry, EntityKind::Koopa)?,
            shell: AnimationSet::resolve(registry, EntityKind::Shell)?,
            sizeup: AnimationSet::resolve(registry, EntityKind::Sizeup)?,
        })
    }

    pub fn get(&self, kind: EntityKind) -> &AnimationSet {
        match kind {
            EntityKind::Player => &self.player,
            EntityKind::Goomba => &self.goomba,
            EntityKind::Koopa => &self.koopa,
            EntityKind::Shell => &self.shell,
            EntityKind::Sizeup => &self.sizeup,
        }
    }
}

/// Position, size and motion state of one entity.
#[derive(Debug, Clone)]
pub struct Body {
    pub kind: EntityKind,
    /// Top-left corner in world pixels.
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub collisions: Collisions,
    /// When false the body passes through tiles vertically and ignores gravity.
    pub can_collide: bool,
    /// Facing left.
    pub flip: bool,
    action: &'static str,
    animation: Animation,
    animations: AnimationSet,
}

impl Body {
    pub fn new(kind: EntityKind, pos: Vec2, size: Vec2, library: &AnimationLibrary) -> Self {
        let animations = library.get(kind).clone();
        let (action, animation) = animations.start();
        Self {
            kind,
            pos,
            size,
            velocity: Vec2::ZERO,
            collisions: Collisions::default(),
            can_collide: true,
            flip: false,
            action,
            animation,
            animations,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn action(&self) -> &'static str {
        self.action
    }

    pub fn animation(&self) -> &Animation {
        &self.animation
    }

    /// Switch animation. Re-selecting the current action keeps its cursor.
    pub fn set_action(&mut self, action: &'static str) {
        if action == self.action {
            return;
        }
        match self.animations.get(action) {
            Some(anim) => {
                self.action = action;
                self.animation = anim;
            }
            None => log::warn!("{:?} has no action {:?}", self.kind, action),
        }
    }

    /// Draw the current frame at `pos - offset + ANIM_OFFSET`.
    pub fn render(&self, buf: &mut RenderBuffer, offset: Vec2) {
        let p = self.pos - offset + ANIM_OFFSET;
        buf.push(RenderInstance::sprite(self.animation.img(), p.x, p.y).flipped(self.flip));
    }
}

/// Reaction to overlapping other entities during a step.
pub trait Contact {
    /// Called after the vertical move. Returns true if a contact fired.
    fn vertical(&mut self, body: &mut Body) -> bool;
    /// Called after the horizontal move, unless `vertical` fired this step.
    fn horizontal(&mut self, body: &mut Body);
}

/// For bodies that touch nothing but tiles.
pub struct NoContact;

impl Contact for NoContact {
    fn vertical(&mut self, _body: &mut Body) -> bool {
        false
    }

    fn horizontal(&mut self, _body: &mut Body) {}
}

/// Advance `body` by one frame: move, resolve tiles one axis at a time,
/// face the walking direction, apply gravity, tick the animation.
pub fn step(
    body: &mut Body,
    tilemap: &Tilemap,
    movement: Vec2,
    contact: &mut impl Contact,
) -> StepReport {
    let mut report = StepReport::default();
    let frame_movement = movement + body.velocity;

    body.pos.y += frame_movement.y;
    let stomped = contact.vertical(body);
    if body.can_collide {
        let mut rect = body.rect();
        for tile in tilemap.physics_rects_around(body.pos) {
            if !rect.collides(&tile) {
                continue;
            }
            if frame_movement.y > 0.0 {
                rect.set_bottom(tile.top());
                report.collisions.down = true;
            }
            if frame_movement.y < 0.0 {
                rect.set_top(tile.bottom());
                report.collisions.up = true;
                report.struck.push(tilemap.cell_at(tile.pos()));
            }
            body.pos.y = rect.y;
        }
    }

    body.pos.x += frame_movement.x;
    if !stomped {
        contact.horizontal(body);
    }
    let mut rect = body.rect();
    for tile in tilemap.physics_rects_around(body.pos) {
        if !rect.collides(&tile) {
            continue;
        }
        if frame_movement.x > 0.0 {
            rect.set_right(tile.left());
            report.collisions.right = true;
        }
        if frame_movement.x < 0.0 {
            rect.set_left(tile.right());
            report.collisions.left = true;
        }
        body.pos.x = rect.x;
    }

    if movement.x > 0.0 {
        body.flip = false;
    }
    if movement.x < 0.0 {
        body.flip = true;
    }

    if report.collisions.down || report.collisions.up {
        body.velocity.y = 0.0;
    } else if body.can_collide {
        body.velocity.y = (body.velocity.y + GRAVITY).min(TERMINAL_VELOCITY);
    }

    body.animation.update();
    body.collisions = report.collisions;
    report
}
