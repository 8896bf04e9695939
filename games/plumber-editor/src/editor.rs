use std::path::Path;

use glam::Vec2;

use brick_engine::input::queue::{buttons, keys};
use brick_engine::*;

use plumber::level::{load_level, parse_selection};
use plumber::{LaunchError, ASSET_MANIFEST};

const WORLD_WIDTH: f32 = 320.0;
const WORLD_HEIGHT: f32 = 240.0;
/// Pixels scrolled per frame while an arrow key is held.
const PAN_SPEED: f32 = 2.0;
const GHOST_ALPHA: f32 = 100.0 / 255.0;
const SWATCH_POS: Vec2 = Vec2::new(5.0, 5.0);

/// The level was serialized. `a` = number of grid tiles.
pub const EVENT_LEVEL_SAVED: f32 = 10.0;

/// Everything that can be placed, in wheel order.
pub const PALETTE: [&str; 15] = [
    "brick", "ground", "bush1", "bush2", "bush3", "bushes", "random", "castle", "koopa",
    "goomba", "flag", "flower1", "flower2", "flower3", "flower4",
];

/// Arrow keys currently held.
#[derive(Debug, Clone, Copy, Default)]
struct Pan {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
}

impl Pan {
    fn delta(self) -> Vec2 {
        let axis = |neg: bool, pos: bool| pos as i32 as f32 - neg as i32 as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)) * PAN_SPEED
    }

    fn set(&mut self, key_code: u32, held: bool) {
        match key_code {
            keys::LEFT => self.left = held,
            keys::RIGHT => self.right = held,
            keys::UP => self.up = held,
            keys::DOWN => self.down = held,
            _ => {}
        }
    }
}

pub struct LevelEditor {
    tilemap: Tilemap,
    sprites: AssetRegistry,
    camera: Camera2D,
    selected: usize,
    pan: Pan,
    /// Last pointer position in display pixels.
    pointer: Vec2,
    painting: bool,
    erasing: bool,
    on_grid: bool,
    saved: Option<String>,
}

impl LevelEditor {
    /// `""` opens a blank level; `"1"` to `"3"` open a built-in one.
    pub fn select(selection: &str) -> Result<Self, LaunchError> {
        let tilemap = if selection.trim().is_empty() {
            Tilemap::default()
        } else {
            load_level(parse_selection(selection)?)?
        };
        Self::with_tilemap(tilemap, ASSET_MANIFEST)
    }

    pub fn with_tilemap(tilemap: Tilemap, manifest: &str) -> Result<Self, LaunchError> {
        let sprites = AssetRegistry::from_json(manifest)?;
        sprites.require_sprites(PALETTE)?;
        tilemap.check_sprites(&sprites)?;
        Ok(Self {
            tilemap,
            sprites,
            camera: Camera2D::new(WORLD_WIDTH, WORLD_HEIGHT),
            selected: 0,
            pan: Pan::default(),
            pointer: Vec2::ZERO,
            painting: false,
            erasing: false,
            on_grid: true,
            saved: None,
        })
    }

    pub fn tilemap(&self) -> &Tilemap {
        &self.tilemap
    }

    pub fn selected(&self) -> &'static str {
        PALETTE[self.selected]
    }

    pub fn is_on_grid(&self) -> bool {
        self.on_grid
    }

    pub fn scroll(&self) -> Vec2 {
        self.camera.offset()
    }

    /// Write the level to disk.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), LevelError> {
        self.tilemap.save(path)
    }

    fn cycle(&mut self, step: isize) {
        let n = PALETTE.len() as isize;
        self.selected = (self.selected as isize + step).rem_euclid(n) as usize;
    }

    fn pointer_world(&self) -> Vec2 {
        self.camera.screen_to_world(self.pointer)
    }

    fn hovered_cell(&self) -> Cell {
        self.tilemap.cell_at(self.pointer_world())
    }

    fn save(&mut self, ctx: &mut EngineContext) {
        match self.tilemap.to_json() {
            Ok(json) => {
                log::info!(
                    "level saved: {} tiles, {} off-grid",
                    self.tilemap.tile_count(),
                    self.tilemap.offgrid().len()
                );
                self.saved = Some(json);
                ctx.emit_event(GameEvent::new(EVENT_LEVEL_SAVED, self.tilemap.tile_count() as f32));
            }
            Err(e) => log::error!("level save failed: {}", e),
        }
    }

    fn handle_input(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y, button } => {
                    self.pointer = Vec2::new(x, y);
                    match button {
                        buttons::LEFT => {
                            self.painting = true;
                            if !self.on_grid {
                                let pos = self.pointer_world();
                                self.tilemap.add_offgrid(self.selected(), pos);
                            }
                        }
                        buttons::RIGHT => self.erasing = true,
                        _ => {}
                    }
                }
                InputEvent::PointerUp { x, y, button } => {
                    self.pointer = Vec2::new(x, y);
                    match button {
                        buttons::LEFT => self.painting = false,
                        buttons::RIGHT => self.erasing = false,
                        _ => {}
                    }
                }
                InputEvent::PointerMove { x, y } => self.pointer = Vec2::new(x, y),
                InputEvent::Wheel { delta } => {
                    if delta < 0.0 {
                        self.cycle(-1);
                    } else if delta > 0.0 {
                        self.cycle(1);
                    }
                }
                InputEvent::KeyDown { key_code } => match key_code {
                    keys::G => {
                        self.on_grid = !self.on_grid;
                        log::debug!("grid snap {}", if self.on_grid { "on" } else { "off" });
                    }
                    keys::S => self.save(ctx),
                    _ => self.pan.set(key_code, true),
                },
                InputEvent::KeyUp { key_code } => self.pan.set(key_code, false),
            }
        }
    }
}

impl Game for LevelEditor {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut EngineContext) {
        log::info!(
            "editing level: {} tiles, {} off-grid, palette of {}",
            self.tilemap.tile_count(),
            self.tilemap.offgrid().len(),
            PALETTE.len()
        );
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        self.handle_input(ctx, input);
        self.camera.pan(self.pan.delta());

        let cell = self.hovered_cell();
        if self.painting && self.on_grid {
            self.tilemap.set_tile(cell, self.selected());
        }
        if self.erasing {
            self.tilemap.remove_tile(cell);
            let point = self.pointer_world();
            self.tilemap.remove_offgrid_at(point, &self.sprites);
        }
    }

    fn render(&self, ctx: &mut RenderContext) {
        let buf = &mut *ctx.render_buffer;
        let offset = self.camera.offset();
        self.tilemap.render(buf, offset, self.camera.viewport(), &self.sprites);

        let Ok(sprite) = self.sprites.sprite(self.selected()) else {
            return;
        };
        let ghost = if self.on_grid {
            let (x, y) = self.hovered_cell();
            let ts = self.tilemap.tile_size();
            Vec2::new(x as f32 * ts, y as f32 * ts) - offset
        } else {
            self.pointer
        };
        buf.push(RenderInstance::sprite(sprite, ghost.x, ghost.y).with_alpha(GHOST_ALPHA));
        buf.push(RenderInstance::sprite(sprite, SWATCH_POS.x, SWATCH_POS.y).with_alpha(GHOST_ALPHA));
    }

    fn snapshot(&self) -> Option<String> {
        self.saved.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank() -> LevelEditor {
        let mut editor = LevelEditor::select("").unwrap();
        editor.init(&mut EngineContext::new());
        editor
    }

    fn frame(editor: &mut LevelEditor, ctx: &mut EngineContext, events: &[InputEvent]) {
        let mut input = InputQueue::new();
        for event in events {
            input.push(*event);
        }
        editor.update(ctx, &input);
    }

    fn down(x: f32, y: f32, button: u32) -> InputEvent {
        InputEvent::PointerDown { x, y, button }
    }

    fn up(x: f32, y: f32, button: u32) -> InputEvent {
        InputEvent::PointerUp { x, y, button }
    }

    #[test]
    fn wheel_cycles_palette_with_wrap() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        assert_eq!(editor.selected(), "brick");

        frame(&mut editor, &mut ctx, &[InputEvent::Wheel { delta: -1.0 }]);
        assert_eq!(editor.selected(), "flower4");
        frame(&mut editor, &mut ctx, &[InputEvent::Wheel { delta: 1.0 }]);
        frame(&mut editor, &mut ctx, &[InputEvent::Wheel { delta: 3.0 }]);
        assert_eq!(editor.selected(), "ground");
    }

    #[test]
    fn held_left_button_paints_every_hovered_cell() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();

        frame(&mut editor, &mut ctx, &[down(20.0, 20.0, buttons::LEFT)]);
        frame(&mut editor, &mut ctx, &[InputEvent::PointerMove { x: 40.0, y: 20.0 }]);
        frame(&mut editor, &mut ctx, &[up(40.0, 20.0, buttons::LEFT)]);
        frame(&mut editor, &mut ctx, &[InputEvent::PointerMove { x: 60.0, y: 20.0 }]);

        let map = editor.tilemap();
        assert_eq!(map.tile((1, 1)).unwrap().kind, "brick");
        assert_eq!(map.tile((2, 1)).unwrap().kind, "brick");
        assert!(map.tile((3, 1)).is_none());
        assert_eq!(map.tile_count(), 2);
    }

    #[test]
    fn off_grid_press_places_one_tile() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        frame(&mut editor, &mut ctx, &[InputEvent::KeyDown { key_code: keys::G }]);
        assert!(!editor.is_on_grid());

        frame(&mut editor, &mut ctx, &[down(10.5, 12.0, buttons::LEFT)]);
        frame(&mut editor, &mut ctx, &[InputEvent::PointerMove { x: 30.0, y: 12.0 }]);

        let map = editor.tilemap();
        assert_eq!(map.tile_count(), 0);
        assert_eq!(map.offgrid().len(), 1);
        assert_eq!(map.offgrid()[0].position(), Vec2::new(10.5, 12.0));
    }

    #[test]
    fn right_button_erases_cell_and_offgrid() {
        let mut map = Tilemap::default();
        map.set_tile((1, 1), "ground");
        map.add_offgrid("bush1", Vec2::new(16.0, 10.0));
        map.add_offgrid("bush2", Vec2::new(200.0, 10.0));
        let mut editor = LevelEditor::with_tilemap(map, ASSET_MANIFEST).unwrap();
        let mut ctx = EngineContext::new();

        frame(&mut editor, &mut ctx, &[down(20.0, 20.0, buttons::RIGHT)]);
        let map = editor.tilemap();
        assert!(map.tile((1, 1)).is_none());
        assert_eq!(map.offgrid().len(), 1);
        assert_eq!(map.offgrid()[0].kind, "bush2");
    }

    #[test]
    fn arrows_pan_two_pixels_per_frame() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        frame(&mut editor, &mut ctx, &[InputEvent::KeyDown { key_code: keys::RIGHT }]);
        for _ in 0..7 {
            frame(&mut editor, &mut ctx, &[]);
        }
        frame(&mut editor, &mut ctx, &[InputEvent::KeyUp { key_code: keys::RIGHT }]);
        assert_eq!(editor.scroll(), Vec2::new(16.0, 0.0));

        frame(&mut editor, &mut ctx, &[down(4.0, 4.0, buttons::LEFT)]);
        assert_eq!(editor.tilemap().tile((1, 0)).unwrap().kind, "brick");
    }

    #[test]
    fn s_saves_and_exposes_snapshot() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        assert!(editor.snapshot().is_none());

        frame(&mut editor, &mut ctx, &[down(0.0, 0.0, buttons::LEFT)]);
        frame(&mut editor, &mut ctx, &[InputEvent::KeyDown { key_code: keys::S }]);

        assert_eq!(ctx.events, vec![GameEvent::new(EVENT_LEVEL_SAVED, 1.0)]);
        let json = editor.snapshot().unwrap();
        let reloaded = Tilemap::from_json(&json).unwrap();
        assert_eq!(reloaded.tile((0, 0)).unwrap().kind, "brick");
    }

    #[test]
    fn select_opens_blank_or_builtin() {
        assert_eq!(LevelEditor::select("").unwrap().tilemap().tile_count(), 0);
        assert!(LevelEditor::select("2").unwrap().tilemap().tile_count() > 0);
        assert!(matches!(
            LevelEditor::select("9"),
            Err(LaunchError::Level(LevelError::InvalidSelection(_)))
        ));
    }

    #[test]
    fn save_to_disk_round_trips() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        frame(&mut editor, &mut ctx, &[down(40.0, 40.0, buttons::LEFT)]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.json");
        editor.save_to(&path).unwrap();

        let mut loaded = Tilemap::default();
        loaded.load(&path).unwrap();
        assert_eq!(loaded.tile((2, 2)).unwrap().kind, "brick");
    }

    #[test]
    fn ghost_and_swatch_are_translucent() {
        let mut editor = blank();
        let mut ctx = EngineContext::new();
        frame(&mut editor, &mut ctx, &[InputEvent::PointerMove { x: 37.0, y: 21.0 }]);

        let mut buf = RenderBuffer::new();
        editor.render(&mut RenderContext { render_buffer: &mut buf });
        assert_eq!(buf.instance_count(), 2);
        let ghost = buf.instances[0];
        let swatch = buf.instances[1];
        assert_eq!((ghost.x, ghost.y), (32.0, 16.0));
        assert_eq!((swatch.x, swatch.y), (5.0, 5.0));
        assert!((ghost.alpha - GHOST_ALPHA).abs() < 1e-6);
    }
}
