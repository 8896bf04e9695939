use bytemuck::{Pod, Zeroable};

use crate::components::sprite::SpriteComponent;

/// Instance flag: mirror the sprite horizontally.
pub const FLAG_FLIP_X: u32 = 1;
/// Instance flag: ignore the atlas and fill the quad with solid black.
pub const FLAG_SOLID: u32 = 2;

/// Per-instance render data read by the host renderer.
/// Must match the host protocol: 9 floats = 36 bytes stride.
///
/// Positions are the top-left corner in display pixels (camera scroll already applied).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Atlas column.
    pub sprite_col: f32,
    /// Atlas row.
    pub atlas_row: f32,
    /// UV cell span (1.0 = single cell, 2.0 = 2x2 block).
    pub cell_span: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Bit set of `FLAG_*` values, stored as a float for the flat buffer.
    pub flags: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 9;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    /// A textured sprite with its top-left corner at (x, y).
    pub fn sprite(sprite: &SpriteComponent, x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            width: sprite.size.x,
            height: sprite.size.y,
            sprite_col: sprite.col,
            atlas_row: sprite.row,
            cell_span: sprite.cell_span,
            alpha: 1.0,
            flags: 0.0,
        }
    }

    /// An untextured black square.
    pub fn solid(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            alpha: 1.0,
            flags: FLAG_SOLID as f32,
            ..Default::default()
        }
    }

    pub fn flipped(mut self, flip: bool) -> Self {
        let bits = self.flag_bits();
        let bits = if flip { bits | FLAG_FLIP_X } else { bits & !FLAG_FLIP_X };
        self.flags = bits as f32;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn flag_bits(&self) -> u32 {
        self.flags as u32
    }
}

/// Render buffer for one frame: instances in draw order (back-to-front).
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
    dropped: usize,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(2048)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.dropped = 0;
    }

    /// Append an instance. Instances past the capacity are counted and dropped,
    /// since the host buffer has a fixed size.
    pub fn push(&mut self, instance: RenderInstance) {
        if self.instances.len() < self.capacity {
            self.instances.push(instance);
        } else {
            self.dropped += 1;
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Raw pointer to instance data for host reads.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    #[test]
    fn render_instance_is_9_floats() {
        assert_eq!(std::mem::size_of::<RenderInstance>(), 36);
        assert_eq!(RenderInstance::FLOATS, 9);
    }

    #[test]
    fn flip_toggles_only_its_bit() {
        let inst = RenderInstance::solid(0.0, 0.0, 16.0, 16.0).flipped(true);
        assert_eq!(inst.flag_bits(), FLAG_SOLID | FLAG_FLIP_X);
        let inst = inst.flipped(false);
        assert_eq!(inst.flag_bits(), FLAG_SOLID);
    }

    #[test]
    fn sprite_instance_takes_sprite_size() {
        let sprite = SpriteComponent::new(2.0, 3.0, Vec2::new(16.0, 32.0));
        let inst = RenderInstance::sprite(&sprite, 5.0, 6.0);
        assert_eq!((inst.width, inst.height), (16.0, 32.0));
        assert_eq!((inst.sprite_col, inst.atlas_row), (2.0, 3.0));
    }

    #[test]
    fn overflow_is_dropped_not_grown() {
        let mut buf = RenderBuffer::with_capacity(2);
        for _ in 0..5 {
            buf.push(RenderInstance::default());
        }
        assert_eq!(buf.instance_count(), 2);
        assert_eq!(buf.dropped(), 3);
        buf.clear();
        assert_eq!(buf.dropped(), 0);
    }
}
