//! Sound and host event IDs. The numbers match `event_id` in the asset manifest.

use brick_engine::SoundEvent;

pub const SOUND_JUMP: SoundEvent = SoundEvent(1);
pub const SOUND_KICK: SoundEvent = SoundEvent(2);
pub const SOUND_POWERUP: SoundEvent = SoundEvent(3);
pub const SOUND_GAME_OVER: SoundEvent = SoundEvent(4);

// Game event kinds (Rust → host)

/// Start the level's background music. `a` = level number.
pub const EVENT_MUSIC: f32 = 1.0;
pub const EVENT_MUSIC_STOP: f32 = 2.0;
/// Show the victory screen text.
pub const EVENT_VICTORY: f32 = 3.0;
/// Show the defeat screen text.
pub const EVENT_DEFEAT: f32 = 4.0;
/// The session is over; the host may close the game view.
pub const EVENT_HALT: f32 = 5.0;
