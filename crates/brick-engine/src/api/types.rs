use bytemuck::{Pod, Zeroable};

/// Stable handle for a dynamic entity. Handles are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// A sound effect trigger emitted by game logic.
/// The numeric value maps to a game-defined sound in the host's audio player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct SoundEvent(pub u32);

/// A game event forwarded to the host (music changes, outcomes, saves).
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct GameEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl GameEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32) -> Self {
        Self { kind, a, b: 0.0, c: 0.0 }
    }
}
