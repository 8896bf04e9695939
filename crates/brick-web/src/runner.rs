use brick_engine::bridge::protocol::{
    HEADER_DROPPED_INSTANCES, HEADER_EVENT_COUNT, HEADER_FLOATS, HEADER_FRAME_COUNTER,
    HEADER_HALTED, HEADER_INSTANCE_COUNT, HEADER_SOUND_COUNT,
};
use brick_engine::{
    step_game, Game, GameConfig, EngineContext, RenderContext,
    InputEvent, InputQueue, RenderBuffer,
    FixedTimestep, ProtocolLayout,
};

/// Generic game runner that wires up the engine loop.
///
/// Each concrete game creates a `thread_local!` GameRunner through `export_game!`
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct GameRunner<G: Game> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    render_buffer: RenderBuffer,
    timestep: FixedTimestep,
    config: GameConfig,
    layout: ProtocolLayout,
    header: [f32; HEADER_FLOATS],
    initialized: bool,
    /// Flat buffer of sound event IDs for host reads.
    sound_buffer: Vec<f32>,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let header = layout.header(&config);

        let render_buffer = RenderBuffer::with_capacity(config.max_instances);
        let sound_buffer = Vec::with_capacity(config.max_sounds);

        Self {
            game,
            ctx: EngineContext::new(),
            input: InputQueue::new(),
            render_buffer,
            timestep,
            layout,
            header,
            config,
            initialized: false,
            sound_buffer,
        }
    }

    /// Initialize the game. Call once after construction.
    pub fn init(&mut self) {
        self.game.init(&mut self.ctx);
        self.initialized = true;
        self.render();
        self.pack_frame();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one host frame: zero or more fixed updates, then a render.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        self.ctx.clear_frame_data();

        // Queued input is seen by the first fixed step only, so one key press
        // never triggers twice on a catch-up frame.
        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            step_game(&mut self.game, &mut self.ctx, &self.input);
            self.input.clear();
        }

        self.render();
        self.pack_frame();
    }

    fn render(&mut self) {
        self.render_buffer.clear();
        let mut render_ctx = RenderContext {
            render_buffer: &mut self.render_buffer,
        };
        self.game.render(&mut render_ctx);
    }

    fn pack_frame(&mut self) {
        if self.ctx.sounds.len() > self.layout.max_sounds {
            log::warn!(
                "{} sounds this frame, only {} forwarded",
                self.ctx.sounds.len(),
                self.layout.max_sounds
            );
        }
        self.sound_buffer.clear();
        self.sound_buffer.extend(
            self.ctx
                .sounds
                .iter()
                .take(self.layout.max_sounds)
                .map(|sound| sound.0 as f32),
        );

        self.header[HEADER_FRAME_COUNTER] = self.ctx.frame() as f32;
        self.header[HEADER_INSTANCE_COUNT] = self.render_buffer.instance_count() as f32;
        self.header[HEADER_DROPPED_INSTANCES] = self.render_buffer.dropped() as f32;
        self.header[HEADER_SOUND_COUNT] = self.sound_buffer.len() as f32;
        self.header[HEADER_EVENT_COUNT] = self.game_events_len() as f32;
        self.header[HEADER_HALTED] = if self.ctx.is_halted() { 1.0 } else { 0.0 };
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn is_halted(&self) -> bool {
        self.ctx.is_halted()
    }

    pub fn snapshot(&self) -> Option<String> {
        self.game.snapshot()
    }

    // ---- Pointer accessors for host reads ----

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn sound_events_ptr(&self) -> *const f32 {
        self.sound_buffer.as_ptr()
    }

    pub fn sound_events_len(&self) -> u32 {
        self.sound_buffer.len() as u32
    }

    pub fn game_events_ptr(&self) -> *const f32 {
        self.ctx.events.as_ptr() as *const f32
    }

    pub fn game_events_len(&self) -> u32 {
        self.ctx.events.len().min(self.layout.max_events) as u32
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Capacity accessors ----

    pub fn max_instances(&self) -> u32 {
        self.layout.max_instances as u32
    }

    pub fn max_sounds(&self) -> u32 {
        self.layout.max_sounds as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_engine::input::queue::keys;
    use brick_engine::{GameEvent, RenderInstance, SoundEvent};

    #[derive(Default)]
    struct Jumper {
        updates: u32,
        jumps: u32,
    }

    impl Game for Jumper {
        fn init(&mut self, ctx: &mut EngineContext) {
            ctx.emit_event(GameEvent::new(1.0, 0.0));
        }

        fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
            self.updates += 1;
            if input.key_pressed(keys::SPACE) {
                self.jumps += 1;
                ctx.emit_sound(SoundEvent(7));
            }
            if self.updates == 10 {
                ctx.halt();
            }
        }

        fn render(&self, ctx: &mut RenderContext) {
            ctx.render_buffer.push(RenderInstance::solid(0.0, 0.0, 1.0, 1.0));
        }
    }

    #[test]
    fn ticks_before_init_do_nothing() {
        let mut runner = GameRunner::new(Jumper::default());
        runner.tick(1.0 / 60.0);
        assert_eq!(runner.game().updates, 0);
        assert_eq!(runner.instance_count(), 0);
    }

    #[test]
    fn catch_up_steps_see_input_once() {
        let mut runner = GameRunner::new(Jumper::default());
        runner.init();
        runner.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        runner.tick(3.0 / 60.0 + 0.001);

        assert_eq!(runner.game().updates, 3);
        assert_eq!(runner.game().jumps, 1);
        assert_eq!(runner.sound_events_len(), 1);
        assert_eq!(runner.instance_count(), 1);
    }

    #[test]
    fn halt_is_reported_in_header() {
        let mut runner = GameRunner::new(Jumper::default());
        runner.init();
        for _ in 0..20 {
            runner.tick(1.0 / 60.0 + 0.0001);
        }
        assert_eq!(runner.game().updates, 10);
        assert!(runner.is_halted());
        assert_eq!(runner.header[HEADER_HALTED], 1.0);
        assert_eq!(runner.header[HEADER_FRAME_COUNTER], 10.0);
    }

    #[test]
    fn init_events_are_visible_before_first_tick() {
        let mut runner = GameRunner::new(Jumper::default());
        runner.init();
        assert_eq!(runner.game_events_len(), 1);
        assert_eq!(runner.header[HEADER_EVENT_COUNT], 1.0);
    }
}
