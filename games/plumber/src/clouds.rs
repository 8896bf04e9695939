use glam::Vec2;
use rand::rngs::SmallRng;
use rand::Rng;

use brick_engine::{AssetRegistry, RenderBuffer, RenderInstance};

pub const CLOUD_COUNT: usize = 6;
/// Clouds are scattered over this square before wrapping.
const SCATTER: f32 = 99999.0;

/// One parallax cloud. `depth` scales how much of the camera scroll it follows.
#[derive(Debug, Clone)]
pub struct Cloud {
    pub pos: Vec2,
    pub sprite: String,
    pub speed: f32,
    pub depth: f32,
}

impl Cloud {
    fn update(&mut self) {
        self.pos.x += self.speed;
    }

    /// Display position after parallax, wrapped so the cloud keeps coming back.
    fn screen_pos(&self, offset: Vec2, viewport: Vec2, size: Vec2) -> Vec2 {
        let p = self.pos - offset * self.depth;
        Vec2::new(
            p.x.rem_euclid(viewport.x + size.x) - size.x,
            p.y.rem_euclid(viewport.y + size.y) - size.y,
        )
    }
}

/// Background cloud layer, drawn back to front by depth.
#[derive(Debug, Clone, Default)]
pub struct Clouds {
    clouds: Vec<Cloud>,
}

impl Clouds {
    pub fn new(sprites: &[&str], count: usize, rng: &mut SmallRng) -> Self {
        if sprites.is_empty() {
            return Self::default();
        }
        let mut clouds: Vec<Cloud> = (0..count)
            .map(|_| Cloud {
                pos: Vec2::new(rng.gen_range(0.0..SCATTER), rng.gen_range(0.0..SCATTER)),
                sprite: sprites[rng.gen_range(0..sprites.len())].to_string(),
                speed: rng.gen::<f32>() * 0.05 + 0.05,
                depth: rng.gen::<f32>() * 0.6 + 0.2,
            })
            .collect();
        clouds.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        Self { clouds }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cloud> {
        self.clouds.iter()
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }

    pub fn update(&mut self) {
        for cloud in &mut self.clouds {
            cloud.update();
        }
    }

    pub fn render(&self, buf: &mut RenderBuffer, offset: Vec2, viewport: Vec2, sprites: &AssetRegistry) {
        for cloud in &self.clouds {
            let Ok(sprite) = sprites.sprite(&cloud.sprite) else {
                continue;
            };
            let p = cloud.screen_pos(offset, viewport, sprite.size);
            buf.push(RenderInstance::sprite(sprite, p.x, p.y));
        }
    }
}
