use glam::Vec2;

/// A single image: one cell (or block of cells) in the sprite atlas plus its pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteComponent {
    /// Column in the atlas grid.
    pub col: f32,
    /// Row in the atlas grid.
    pub row: f32,
    /// Number of atlas cells this sprite spans (1.0 = single cell, 2.0 = 2x2 block).
    pub cell_span: f32,
    /// Drawn size in world pixels.
    pub size: Vec2,
}

impl SpriteComponent {
    pub fn new(col: f32, row: f32, size: Vec2) -> Self {
        Self {
            col,
            row,
            cell_span: 1.0,
            size,
        }
    }

    pub fn with_span(mut self, cell_span: f32) -> Self {
        self.cell_span = cell_span;
        self
    }
}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            col: 0.0,
            row: 0.0,
            cell_span: 1.0,
            size: Vec2::splat(16.0),
        }
    }
}
