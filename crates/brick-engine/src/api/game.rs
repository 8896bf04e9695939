use crate::api::types::{GameEvent, SoundEvent};
use crate::input::queue::InputQueue;
use crate::renderer::instance::RenderBuffer;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Width of the low-resolution display surface in pixels.
    pub world_width: f32,
    /// Height of the low-resolution display surface in pixels.
    pub world_height: f32,
    /// Maximum number of render instances (default: 2048).
    pub max_instances: usize,
    /// Maximum number of sound events per frame (default: 16).
    pub max_sounds: usize,
    /// Maximum number of game events per frame (default: 16).
    pub max_events: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 320.0,
            world_height: 240.0,
            max_instances: 2048,
            max_sounds: 16,
            max_events: 16,
        }
    }
}

/// The core contract every game (or tool) must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state. Called once by the runner.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed-step tick. Input is the set of events queued since the last frame.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// Read-only render pass. Push instances back-to-front.
    fn render(&self, ctx: &mut RenderContext);

    /// Serialized state the host may fetch on demand (an edited level, for instance).
    fn snapshot(&self) -> Option<String> {
        None
    }
}

/// Mutable engine state shared with the game during init and update.
pub struct EngineContext {
    pub sounds: Vec<SoundEvent>,
    pub events: Vec<GameEvent>,
    /// Set by the game once it has nothing left to simulate.
    halted: bool,
    frame: u64,
}

impl EngineContext {
    pub fn new() -> Self {
        Self {
            sounds: Vec::new(),
            events: Vec::new(),
            halted: false,
            frame: 0,
        }
    }

    /// Emit a fire-and-forget sound trigger.
    pub fn emit_sound(&mut self, event: SoundEvent) {
        self.sounds.push(event);
    }

    /// Emit a game event to be forwarded to the host.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Stop the loop. The runner skips updates from the next tick on.
    pub fn halt(&mut self) {
        if !self.halted {
            log::info!("engine halted at frame {}", self.frame);
        }
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Number of fixed steps simulated so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub(crate) fn advance_frame(&mut self) {
        self.frame += 1;
    }

    /// Clear per-frame transient data (sounds and events).
    pub fn clear_frame_data(&mut self) {
        self.sounds.clear();
        self.events.clear();
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Render context handed to `Game::render`.
pub struct RenderContext<'a> {
    pub render_buffer: &'a mut RenderBuffer,
}

/// Run one fixed step of `game` and advance the frame counter.
/// Halted contexts are left untouched.
pub fn step_game<G: Game>(game: &mut G, ctx: &mut EngineContext, input: &InputQueue) {
    if ctx.halted {
        return;
    }
    game.update(ctx, input);
    ctx.advance_frame();
}
